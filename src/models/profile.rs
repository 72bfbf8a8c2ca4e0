use super::plant::Plant;
use crate::error::{PlantOpsError, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DwellingType {
    #[serde(rename = "Casa", alias = "House")]
    House,
    #[serde(rename = "Apartamento", alias = "Apartment")]
    Apartment,
}

impl DwellingType {
    pub fn as_str(&self) -> &'static str {
        match self {
            DwellingType::House => "House",
            DwellingType::Apartment => "Apartment",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "house" | "casa" => Some(DwellingType::House),
            "apartment" | "apartamento" | "flat" => Some(DwellingType::Apartment),
            _ => None,
        }
    }
}

impl std::fmt::Display for DwellingType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserLocation {
    pub latitude: f64,
    pub longitude: f64,
    pub city: String,
}

/// Everything the app persists: one serialized blob per installation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dwelling_type: Option<DwellingType>,
    #[serde(default)]
    pub location: Option<UserLocation>,
    #[serde(default)]
    pub plants: Vec<Plant>,
    #[serde(default)]
    pub unlocked_achievements: Vec<String>,
}

impl UserProfile {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            name: name.into(),
            dwelling_type: None,
            location: None,
            plants: Vec::new(),
            unlocked_achievements: Vec::new(),
        }
    }

    pub fn with_location(mut self, location: UserLocation) -> Self {
        self.location = Some(location);
        self
    }

    pub fn with_dwelling(mut self, dwelling: DwellingType) -> Self {
        self.dwelling_type = Some(dwelling);
        self
    }

    pub fn plant(&self, id: &str) -> Option<&Plant> {
        self.plants.iter().find(|p| p.id == id)
    }

    pub fn plant_mut(&mut self, id: &str) -> Option<&mut Plant> {
        self.plants.iter_mut().find(|p| p.id == id)
    }

    pub fn has_achievement(&self, id: &str) -> bool {
        self.unlocked_achievements.iter().any(|a| a == id)
    }

    /// Structural checks the scheduling engine relies on but never performs.
    pub fn validate(&self) -> Result<()> {
        if self.id.trim().is_empty() {
            return Err(PlantOpsError::InvalidData("profile id is empty".into()));
        }
        if self.name.trim().is_empty() {
            return Err(PlantOpsError::InvalidData("profile name is empty".into()));
        }
        if let Some(ref loc) = self.location {
            if !loc.latitude.is_finite() || !loc.longitude.is_finite() {
                return Err(PlantOpsError::InvalidData(
                    "location coordinates must be finite".into(),
                ));
            }
        }
        for plant in &self.plants {
            validate_plant(plant)?;
        }
        Ok(())
    }
}

fn validate_plant(plant: &Plant) -> Result<()> {
    let invalid = |reason: &str| {
        Err(PlantOpsError::InvalidData(format!(
            "plant '{}': {}",
            plant.id, reason
        )))
    };

    if plant.id.trim().is_empty() {
        return invalid("id is empty");
    }
    if plant.common_name.trim().is_empty() {
        return invalid("common name is empty");
    }
    if plant.watering_frequency_days < 1 {
        return invalid("watering frequency must be at least one day");
    }
    if !plant.min_temp.is_finite() || !plant.max_temp.is_finite() {
        return invalid("temperature bounds must be finite");
    }
    Ok(())
}

/// Only plain web URLs are rendered or exported.
pub fn is_safe_url(url: &str) -> bool {
    reqwest::Url::parse(url)
        .map(|u| matches!(u.scheme(), "http" | "https"))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SunTolerance;

    fn sample_profile() -> UserProfile {
        let mut profile = UserProfile::new("Ana").with_location(UserLocation {
            latitude: -23.55,
            longitude: -46.63,
            city: "São Paulo".to_string(),
        });
        profile.plants.push(
            Plant::new("Jade", "Crassula ovata", 10, SunTolerance::FullSun, 5.0, 35.0)
                .with_id("jade"),
        );
        profile
    }

    #[test]
    fn valid_profile_passes() {
        assert!(sample_profile().validate().is_ok());
    }

    #[test]
    fn zero_frequency_rejected() {
        let mut profile = sample_profile();
        profile.plants[0].watering_frequency_days = 0;
        assert!(matches!(
            profile.validate(),
            Err(PlantOpsError::InvalidData(_))
        ));
    }

    #[test]
    fn non_finite_temperature_rejected() {
        let mut profile = sample_profile();
        profile.plants[0].min_temp = f64::NAN;
        assert!(profile.validate().is_err());
    }

    #[test]
    fn empty_name_rejected() {
        let mut profile = sample_profile();
        profile.name = "  ".to_string();
        assert!(profile.validate().is_err());
    }

    #[test]
    fn stored_photo_and_missing_scientific_name_are_accepted() {
        let mut profile = sample_profile();
        profile.plants[0].scientific_name = String::new();
        profile.plants[0].image_url = Some("data:image/jpeg;base64,AAAA".to_string());
        assert!(profile.validate().is_ok());
    }

    #[test]
    fn safe_url_schemes() {
        assert!(is_safe_url("https://picsum.photos/400/400"));
        assert!(is_safe_url("http://example.com/a.png"));
        assert!(!is_safe_url("javascript:alert(1)"));
        assert!(!is_safe_url("ftp://example.com"));
        assert!(!is_safe_url(""));
    }

    #[test]
    fn dwelling_type_from_str() {
        assert_eq!(DwellingType::from_str("Casa"), Some(DwellingType::House));
        assert_eq!(
            DwellingType::from_str("apartment"),
            Some(DwellingType::Apartment)
        );
        assert_eq!(DwellingType::from_str("boat"), None);
    }

    #[test]
    fn profile_blob_accepts_missing_optional_fields() {
        let json = r#"{"id":"u1","name":"Ana","location":null,"plants":[],"unlockedAchievements":[]}"#;
        let profile: UserProfile = serde_json::from_str(json).unwrap();
        assert!(profile.location.is_none());
        assert!(profile.dwelling_type.is_none());
        assert!(profile.validate().is_ok());
    }

    #[test]
    fn plant_lookup() {
        let mut profile = sample_profile();
        assert!(profile.plant("jade").is_some());
        assert!(profile.plant("missing").is_none());
        profile.plant_mut("jade").unwrap().watering_frequency_days = 12;
        assert_eq!(profile.plant("jade").unwrap().watering_frequency_days, 12);
    }
}
