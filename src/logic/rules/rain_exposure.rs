use super::HealthRule;
use crate::models::{Alert, AlertLevel, Plant, WeatherSnapshot};

/// Rain exposure rule - succulents and cacti rot when left out in heavy rain
///
/// Conditions:
/// - Category is succulent-like
/// - Rain chance today >80%
pub struct RainExposureRule;

impl HealthRule for RainExposureRule {
    fn id(&self) -> &'static str {
        "rain_exposure"
    }

    fn name(&self) -> &'static str {
        "Rain Exposure"
    }

    fn evaluate(&self, plant: &Plant, weather: &WeatherSnapshot) -> Option<Alert> {
        if !plant.care_group().succulent || weather.current.rain_chance <= 80.0 {
            return None;
        }

        Some(Alert::new(
            AlertLevel::Danger,
            "Protect from rain now! Rot risk.",
            &plant.id,
        ))
    }
}
