use super::HealthRule;
use crate::models::{Alert, AlertLevel, Plant, WeatherSnapshot};

/// Cold exposure rule - compares the plant's minimum safe temperature with
/// the current reading, then with tomorrow's forecast low.
///
/// Severity levels:
/// - Danger: already below the minimum
/// - Warning: tomorrow's low drops below the minimum
pub struct ColdExposureRule;

impl HealthRule for ColdExposureRule {
    fn id(&self) -> &'static str {
        "cold_exposure"
    }

    fn name(&self) -> &'static str {
        "Cold Exposure"
    }

    fn evaluate(&self, plant: &Plant, weather: &WeatherSnapshot) -> Option<Alert> {
        let temp = weather.current.temperature;

        if temp < plant.min_temp {
            return Some(Alert::new(
                AlertLevel::Danger,
                format!("Excessive cold ({}°C). Bring indoors.", temp),
                &plant.id,
            ));
        }

        let tomorrow = weather.tomorrow()?;
        if tomorrow.temp_min < plant.min_temp {
            return Some(Alert::new(
                AlertLevel::Warning,
                "Cold alert tomorrow. Prepare protection.",
                &plant.id,
            ));
        }

        None
    }
}
