use crate::db::Database;
use crate::error::Result;
use crate::models::UserProfile;
use chrono::Utc;
use rusqlite::params;
use tracing::warn;

const PROFILE_KEY: &str = "user_profile";
const BACKUP_PREFIX: &str = "user_profile.corrupt.";

// Profile blob queries

impl Database {
    /// Load the stored profile.
    ///
    /// A blob that fails to parse or validate is copied to a
    /// `user_profile.corrupt.<ms>` key and treated as absent, so the caller
    /// can start over without losing the original bytes.
    pub fn load_profile(&self) -> Result<Option<UserProfile>> {
        let raw = self.load_value(PROFILE_KEY)?;
        let Some(raw) = raw else {
            return Ok(None);
        };

        let problem = match serde_json::from_str::<UserProfile>(&raw) {
            Ok(profile) => match profile.validate() {
                Ok(()) => return Ok(Some(profile)),
                Err(e) => e.to_string(),
            },
            Err(e) => format!("not valid JSON: {}", e),
        };

        let backup = format!("{}{}", BACKUP_PREFIX, Utc::now().timestamp_millis());
        self.store_value(&backup, &raw)?;
        warn!(backup = %backup, "Stored profile could not be loaded ({}), kept a copy", problem);
        Ok(None)
    }

    /// Keys of profile blobs set aside by `load_profile`, oldest first.
    pub fn profile_backups(&self) -> Result<Vec<String>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT key FROM profile_store WHERE key LIKE ?1 ORDER BY updated_at, key",
            )?;
            let keys = stmt
                .query_map([format!("{}%", BACKUP_PREFIX)], |row| row.get(0))?
                .collect::<rusqlite::Result<Vec<String>>>()?;
            Ok(keys)
        })
    }

    pub fn save_profile(&self, profile: &UserProfile) -> Result<()> {
        let json = serde_json::to_string(profile)?;
        self.store_value(PROFILE_KEY, &json)?;
        tracing::debug!(plants = profile.plants.len(), "Profile saved");
        Ok(())
    }

    pub fn clear_profile(&self) -> Result<()> {
        self.with_conn(|conn| {
            conn.execute("DELETE FROM profile_store WHERE key = ?1", [PROFILE_KEY])?;
            Ok(())
        })
    }

    fn load_value(&self, key: &str) -> Result<Option<String>> {
        self.with_conn(|conn| {
            conn.query_row(
                "SELECT value FROM profile_store WHERE key = ?1",
                [key],
                |row| row.get(0),
            )
            .optional()
            .map_err(Into::into)
        })
    }

    fn store_value(&self, key: &str, value: &str) -> Result<()> {
        self.with_conn(|conn| {
            conn.execute(
                r#"
                INSERT INTO profile_store (key, value, updated_at)
                VALUES (?1, ?2, ?3)
                ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at
                "#,
                params![key, value, Utc::now().to_rfc3339()],
            )?;
            Ok(())
        })
    }
}

trait OptionalExt<T> {
    fn optional(self) -> rusqlite::Result<Option<T>>;
}

impl<T> OptionalExt<T> for rusqlite::Result<T> {
    fn optional(self) -> rusqlite::Result<Option<T>> {
        match self {
            Ok(v) => Ok(Some(v)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Plant, SunTolerance, UserLocation};

    fn sample_profile() -> UserProfile {
        let mut profile = UserProfile::new("Ana").with_location(UserLocation {
            latitude: -23.55,
            longitude: -46.63,
            city: "São Paulo".into(),
        });
        profile.plants.push(
            Plant::new("Monstera", "Monstera deliciosa", 7, SunTolerance::Partial, 15.0, 32.0)
                .with_category("Tropical"),
        );
        profile
    }

    #[test]
    fn empty_store_has_no_profile() {
        let db = Database::open_in_memory().unwrap();
        assert!(db.load_profile().unwrap().is_none());
    }

    #[test]
    fn save_then_load() {
        let db = Database::open_in_memory().unwrap();
        let profile = sample_profile();
        db.save_profile(&profile).unwrap();
        assert_eq!(db.load_profile().unwrap(), Some(profile));
    }

    #[test]
    fn save_overwrites_previous_blob() {
        let db = Database::open_in_memory().unwrap();
        let mut profile = sample_profile();
        db.save_profile(&profile).unwrap();

        profile.plants.clear();
        profile.unlocked_achievements.push("first-bud".into());
        db.save_profile(&profile).unwrap();

        let loaded = db.load_profile().unwrap().unwrap();
        assert!(loaded.plants.is_empty());
        assert_eq!(loaded.unlocked_achievements, vec!["first-bud"]);
    }

    #[test]
    fn corrupt_blob_is_set_aside() {
        let db = Database::open_in_memory().unwrap();
        db.store_value(PROFILE_KEY, "{not json").unwrap();
        assert!(db.load_profile().unwrap().is_none());

        let backups = db.profile_backups().unwrap();
        assert_eq!(backups.len(), 1);
        assert!(backups[0].starts_with("user_profile.corrupt."));
        assert_eq!(
            db.load_value(&backups[0]).unwrap().as_deref(),
            Some("{not json")
        );
    }

    #[test]
    fn invalid_profile_is_set_aside() {
        let db = Database::open_in_memory().unwrap();
        let mut profile = sample_profile();
        profile.plants[0].watering_frequency_days = 0;
        let raw = serde_json::to_string(&profile).unwrap();
        db.store_value(PROFILE_KEY, &raw).unwrap();

        assert!(db.load_profile().unwrap().is_none());
        let backups = db.profile_backups().unwrap();
        assert_eq!(db.load_value(&backups[0]).unwrap(), Some(raw));
    }

    #[test]
    fn photo_data_url_survives_load() {
        let db = Database::open_in_memory().unwrap();
        let mut profile = sample_profile();
        profile.plants[0].image_url = Some("data:image/jpeg;base64,AAAA".into());
        db.save_profile(&profile).unwrap();

        assert_eq!(db.load_profile().unwrap(), Some(profile));
        assert!(db.profile_backups().unwrap().is_empty());
    }

    #[test]
    fn reads_blob_with_stored_labels() {
        let db = Database::open_in_memory().unwrap();
        let blob = r#"{
            "id": "u1", "name": "Ana", "dwellingType": "Apartamento",
            "plants": [{
                "id": "p1", "scientificName": "Nephrolepis exaltata", "commonName": "Samambaia",
                "category": "Samambaia", "wateringFrequencyDays": 3, "sunTolerance": "Sombra",
                "minTemp": 12, "maxTemp": 30, "lastWatered": 1717236000000,
                "wateringHistory": [1717236000000]
            }],
            "unlockedAchievements": ["first-bud"]
        }"#;
        db.store_value(PROFILE_KEY, blob).unwrap();

        let profile = db.load_profile().unwrap().unwrap();
        assert_eq!(profile.plants[0].sun_tolerance, SunTolerance::Shade);
        assert!(profile.location.is_none());
    }

    #[test]
    fn clear_removes_profile() {
        let db = Database::open_in_memory().unwrap();
        db.save_profile(&sample_profile()).unwrap();
        db.clear_profile().unwrap();
        assert!(db.load_profile().unwrap().is_none());
    }
}
