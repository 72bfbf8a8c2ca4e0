use crate::models::{Achievement, GardenAction, UserProfile, ACHIEVEMENTS};

fn earned(achievement: &Achievement, profile: &UserProfile, action: GardenAction) -> bool {
    let plant_count = profile.plants.len();
    match (achievement.id, action) {
        ("first-bud", GardenAction::PlantAdded) => plant_count >= 1,
        ("urban-jungle", GardenAction::PlantAdded) => plant_count >= 3,
        ("botanist", GardenAction::PlantAdded) => plant_count >= 5,
        ("water-guardian", GardenAction::Watered) => true,
        _ => false,
    }
}

/// Achievements `action` unlocks that the profile does not already hold.
///
/// `profile` must already reflect the action (the new plant is in the list).
/// The caller records the returned ids.
pub fn check_new_achievements(
    profile: &UserProfile,
    action: GardenAction,
) -> Vec<&'static Achievement> {
    ACHIEVEMENTS
        .iter()
        .filter(|a| !profile.has_achievement(a.id))
        .filter(|a| earned(a, profile, action))
        .collect()
}

/// Record newly unlocked achievements on the profile and return them.
pub fn unlock(profile: &mut UserProfile, action: GardenAction) -> Vec<&'static Achievement> {
    let unlocked = check_new_achievements(profile, action);
    for achievement in &unlocked {
        tracing::info!(achievement = achievement.id, "achievement unlocked");
        profile.unlocked_achievements.push(achievement.id.to_string());
    }
    unlocked
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Plant, SunTolerance};

    fn profile_with(count: usize) -> UserProfile {
        let mut profile = UserProfile::new("Ana");
        for i in 0..count {
            profile.plants.push(
                Plant::new(
                    format!("Plant {}", i),
                    "Species",
                    5,
                    SunTolerance::Partial,
                    10.0,
                    30.0,
                ),
            );
        }
        profile
    }

    fn ids(list: &[&'static Achievement]) -> Vec<&'static str> {
        list.iter().map(|a| a.id).collect()
    }

    #[test]
    fn first_plant_unlocks_first_bud() {
        let profile = profile_with(1);
        assert_eq!(
            ids(&check_new_achievements(&profile, GardenAction::PlantAdded)),
            vec!["first-bud"]
        );
    }

    #[test]
    fn already_unlocked_are_not_returned_again() {
        let mut profile = profile_with(3);
        profile.unlocked_achievements.push("first-bud".into());
        assert_eq!(
            ids(&check_new_achievements(&profile, GardenAction::PlantAdded)),
            vec!["urban-jungle"]
        );
    }

    #[test]
    fn five_plants_can_unlock_several_at_once() {
        let profile = profile_with(5);
        assert_eq!(
            ids(&check_new_achievements(&profile, GardenAction::PlantAdded)),
            vec!["first-bud", "urban-jungle", "botanist"]
        );
    }

    #[test]
    fn watering_only_unlocks_water_guardian() {
        let profile = profile_with(5);
        assert_eq!(
            ids(&check_new_achievements(&profile, GardenAction::Watered)),
            vec!["water-guardian"]
        );
    }

    #[test]
    fn unlock_records_ids_once() {
        let mut profile = profile_with(1);
        assert_eq!(unlock(&mut profile, GardenAction::Watered).len(), 1);
        assert!(unlock(&mut profile, GardenAction::Watered).is_empty());
        assert_eq!(profile.unlocked_achievements, vec!["water-guardian"]);
    }
}
