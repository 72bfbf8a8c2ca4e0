use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SunTolerance {
    #[serde(rename = "Sombra", alias = "Shade")]
    Shade,
    #[serde(rename = "Meia-sombra", alias = "Partial")]
    Partial,
    #[serde(rename = "Sol Pleno", alias = "FullSun")]
    FullSun,
}

impl SunTolerance {
    pub fn as_str(&self) -> &'static str {
        match self {
            SunTolerance::Shade => "Shade",
            SunTolerance::Partial => "Partial Shade",
            SunTolerance::FullSun => "Full Sun",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "shade" | "sombra" => Some(SunTolerance::Shade),
            "partial" | "partial shade" | "partialshade" | "meia-sombra" | "meia sombra" => {
                Some(SunTolerance::Partial)
            }
            "fullsun" | "full sun" | "full-sun" | "sol pleno" => Some(SunTolerance::FullSun),
            _ => None,
        }
    }
}

impl std::fmt::Display for SunTolerance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Behavioral groups derived from a plant's free-text category.
///
/// Matching is a loose, case-insensitive substring test. A category can land
/// in both groups ("cacto tropical") or in neither, in which case every
/// category-gated health rule is skipped.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CareGroup {
    pub succulent: bool,
    pub tropical: bool,
}

const SUCCULENT_MARKERS: &[&str] = &["suculenta", "cacto", "succulent", "cact"];
const TROPICAL_MARKERS: &[&str] = &["tropical", "samambaia", "folhagem", "fern", "foliage"];

impl CareGroup {
    pub fn classify(category: Option<&str>) -> Self {
        let category = category.map(str::to_lowercase).unwrap_or_default();
        Self {
            succulent: SUCCULENT_MARKERS.iter().any(|m| category.contains(m)),
            tropical: TROPICAL_MARKERS.iter().any(|m| category.contains(m)),
        }
    }
}

/// A plant's care profile as stored in the user profile blob.
///
/// Timestamps are milliseconds since the Unix epoch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Plant {
    pub id: String,
    pub scientific_name: String,
    pub common_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub origin: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub care_tips: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fertilizer: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub soil: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub environment_tips: Option<String>,
    pub watering_frequency_days: u32,
    pub sun_tolerance: SunTolerance,
    pub min_temp: f64,
    pub max_temp: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_watered: Option<i64>,
    #[serde(default)]
    pub watering_history: Vec<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

impl Plant {
    pub fn new(
        common_name: impl Into<String>,
        scientific_name: impl Into<String>,
        watering_frequency_days: u32,
        sun_tolerance: SunTolerance,
        min_temp: f64,
        max_temp: f64,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            scientific_name: scientific_name.into(),
            common_name: common_name.into(),
            category: None,
            description: None,
            origin: None,
            care_tips: Vec::new(),
            fertilizer: None,
            soil: None,
            environment_tips: None,
            watering_frequency_days,
            sun_tolerance,
            min_temp,
            max_temp,
            last_watered: None,
            watering_history: Vec::new(),
            image_url: None,
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_care_tips(mut self, tips: &[&str]) -> Self {
        self.care_tips = tips.iter().map(|t| t.to_string()).collect();
        self
    }

    pub fn with_last_watered(mut self, when: DateTime<Utc>) -> Self {
        self.last_watered = Some(when.timestamp_millis());
        self
    }

    pub fn care_group(&self) -> CareGroup {
        CareGroup::classify(self.category.as_deref())
    }

    /// Last watering time, falling back to `now` when none was recorded.
    /// A zero stamp counts as unrecorded.
    pub fn last_watered_at(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        self.last_watered
            .filter(|ms| *ms > 0)
            .and_then(|ms| Utc.timestamp_millis_opt(ms).single())
            .unwrap_or(now)
    }

    /// Watering timestamps in chronological order, using `last_watered` for
    /// profiles that predate the history list.
    pub fn history(&self) -> Vec<DateTime<Utc>> {
        let mut stamps: Vec<i64> = if self.watering_history.is_empty() {
            self.last_watered.into_iter().filter(|ms| *ms > 0).collect()
        } else {
            self.watering_history.clone()
        };
        stamps.sort_unstable();
        stamps
            .into_iter()
            .filter_map(|ms| Utc.timestamp_millis_opt(ms).single())
            .collect()
    }

    pub fn record_watering(&mut self, now: DateTime<Utc>) {
        let ms = now.timestamp_millis();
        self.last_watered = Some(ms);
        self.watering_history.push(ms);
    }
}

pub const DEFAULT_FREQUENCY_DAYS: u32 = 7;
pub const DEFAULT_MIN_TEMP: f64 = 10.0;
pub const DEFAULT_MAX_TEMP: f64 = 35.0;
pub const DEFAULT_CATEGORY: &str = "Geral";
pub const UNKNOWN_SCIENTIFIC_NAME: &str = "Desconhecido";

/// A hand-entered plant. Only the common name is required.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlantDraft {
    pub common_name: String,
    pub scientific_name: Option<String>,
    pub watering_frequency_days: Option<u32>,
    pub sun_tolerance: Option<SunTolerance>,
    pub min_temp: Option<f64>,
    pub max_temp: Option<f64>,
    pub category: Option<String>,
}

impl PlantDraft {
    pub fn new(common_name: impl Into<String>) -> Self {
        Self {
            common_name: common_name.into(),
            ..Self::default()
        }
    }

    /// Fill the gaps with the manual-entry defaults and stamp a first
    /// watering at `now`. Blank strings and a zero frequency count as unset.
    pub fn into_plant(self, now: DateTime<Utc>) -> Option<Plant> {
        let common_name = self.common_name.trim().to_string();
        if common_name.is_empty() {
            return None;
        }
        let non_blank = |s: Option<String>| {
            s.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
        };

        let mut plant = Plant::new(
            common_name,
            non_blank(self.scientific_name).unwrap_or_else(|| UNKNOWN_SCIENTIFIC_NAME.to_string()),
            self.watering_frequency_days
                .filter(|d| *d > 0)
                .unwrap_or(DEFAULT_FREQUENCY_DAYS),
            self.sun_tolerance.unwrap_or(SunTolerance::Partial),
            self.min_temp.filter(|t| t.is_finite()).unwrap_or(DEFAULT_MIN_TEMP),
            self.max_temp.filter(|t| t.is_finite()).unwrap_or(DEFAULT_MAX_TEMP),
        )
        .with_category(non_blank(self.category).unwrap_or_else(|| DEFAULT_CATEGORY.to_string()));
        plant.record_watering(now);
        Some(plant)
    }
}
