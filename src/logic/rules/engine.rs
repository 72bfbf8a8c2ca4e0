use super::{
    cold_exposure::ColdExposureRule, growth_weather::GrowthWeatherRule, misting::MistingRule,
    rain_exposure::RainExposureRule, sun_exposure::SunExposureRule, HealthRule,
};
use crate::models::{Alert, Plant, WeatherSnapshot};

/// Runs every health rule in presentation order. All matching rules fire.
pub struct HealthEvaluator {
    rules: Vec<Box<dyn HealthRule>>,
}

impl HealthEvaluator {
    pub fn new() -> Self {
        let rules: Vec<Box<dyn HealthRule>> = vec![
            Box::new(RainExposureRule),
            Box::new(MistingRule),
            Box::new(SunExposureRule),
            Box::new(ColdExposureRule),
            Box::new(GrowthWeatherRule),
        ];

        Self { rules }
    }

    /// Alerts for one plant. No snapshot means nothing to evaluate.
    pub fn evaluate(&self, plant: &Plant, weather: Option<&WeatherSnapshot>) -> Vec<Alert> {
        let Some(weather) = weather else {
            return Vec::new();
        };

        self.rules
            .iter()
            .filter_map(|rule| rule.evaluate(plant, weather))
            .collect()
    }

    /// Per-plant alerts concatenated in plant order.
    pub fn aggregate(&self, plants: &[Plant], weather: Option<&WeatherSnapshot>) -> Vec<Alert> {
        plants
            .iter()
            .flat_map(|plant| self.evaluate(plant, weather))
            .collect()
    }

    pub fn list_rules(&self) -> Vec<(&'static str, &'static str)> {
        self.rules.iter().map(|r| (r.id(), r.name())).collect()
    }
}

impl Default for HealthEvaluator {
    fn default() -> Self {
        Self::new()
    }
}

pub fn evaluate_health(plant: &Plant, weather: Option<&WeatherSnapshot>) -> Vec<Alert> {
    HealthEvaluator::new().evaluate(plant, weather)
}

pub fn aggregate_alerts(plants: &[Plant], weather: Option<&WeatherSnapshot>) -> Vec<Alert> {
    HealthEvaluator::new().aggregate(plants, weather)
}
