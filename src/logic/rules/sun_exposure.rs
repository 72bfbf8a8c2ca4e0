use super::HealthRule;
use crate::models::{Alert, AlertLevel, Plant, SunTolerance, WeatherSnapshot};

/// Sun exposure rule - shade plants scorch quickly under high UV
///
/// Severity levels:
/// - Warning: UV index 6-8
/// - Danger: UV index 8 and above
pub struct SunExposureRule;

impl HealthRule for SunExposureRule {
    fn id(&self) -> &'static str {
        "sun_exposure"
    }

    fn name(&self) -> &'static str {
        "Sun Exposure"
    }

    fn evaluate(&self, plant: &Plant, weather: &WeatherSnapshot) -> Option<Alert> {
        if plant.sun_tolerance != SunTolerance::Shade {
            return None;
        }

        let uv = weather.current.uv_index;
        if uv >= 8.0 {
            Some(Alert::new(
                AlertLevel::Danger,
                "Critical UV: ensure full shade now.",
                &plant.id,
            ))
        } else if uv >= 6.0 {
            Some(Alert::new(
                AlertLevel::Warning,
                "Strong sun: avoid direct rays.",
                &plant.id,
            ))
        } else {
            None
        }
    }
}
