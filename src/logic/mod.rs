pub mod achievements;
pub mod calculations;
pub mod calendar;
pub mod notifications;
pub mod rules;
pub mod scheduler;
pub mod weather_sync;

pub use rules::HealthEvaluator;
pub use scheduler::compute_schedule;
pub use weather_sync::WeatherSyncService;
