pub mod cold_exposure;
pub mod engine;
pub mod growth_weather;
pub mod misting;
pub mod rain_exposure;
pub mod sun_exposure;

pub use engine::{aggregate_alerts, evaluate_health, HealthEvaluator};

use crate::models::{Alert, Plant, WeatherSnapshot};

/// Trait for daily plant health rules
pub trait HealthRule: Send + Sync {
    /// Unique identifier for this rule
    fn id(&self) -> &'static str;

    /// Human-readable name
    fn name(&self) -> &'static str;

    /// Evaluate the rule and return an alert if conditions are met
    fn evaluate(&self, plant: &Plant, weather: &WeatherSnapshot) -> Option<Alert>;
}
