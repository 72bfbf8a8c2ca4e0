use super::HealthRule;
use crate::models::{Alert, AlertLevel, Plant, WeatherSnapshot};

/// Positive feedback for tropical plants on warm, humid days
pub struct GrowthWeatherRule;

impl HealthRule for GrowthWeatherRule {
    fn id(&self) -> &'static str {
        "growth_weather"
    }

    fn name(&self) -> &'static str {
        "Growth Weather"
    }

    fn evaluate(&self, plant: &Plant, weather: &WeatherSnapshot) -> Option<Alert> {
        let current = &weather.current;
        let ideal = plant.care_group().tropical
            && current.humidity > 70.0
            && current.temperature > 22.0
            && current.temperature < 28.0;

        ideal.then(|| {
            Alert::new(
                AlertLevel::Success,
                "Perfect growth weather today!",
                &plant.id,
            )
        })
    }
}
