use super::HealthRule;
use crate::models::{Alert, AlertLevel, Plant, WeatherSnapshot};

/// Misting rule - tropical foliage suffers in dry air even with moist soil
pub struct MistingRule;

impl HealthRule for MistingRule {
    fn id(&self) -> &'static str {
        "misting"
    }

    fn name(&self) -> &'static str {
        "Leaf Misting"
    }

    fn evaluate(&self, plant: &Plant, weather: &WeatherSnapshot) -> Option<Alert> {
        if plant.care_group().tropical && weather.current.humidity < 40.0 {
            Some(Alert::new(
                AlertLevel::Info,
                "Very dry air: mist the leaves today.",
                &plant.id,
            ))
        } else {
            None
        }
    }
}
