use crate::config::{Config, WeatherProvider};
use crate::datasources::{OpenWeatherMapClient, SimulatedWeather};
use crate::models::WeatherSnapshot;
use chrono::Utc;
use std::sync::Arc;
use tokio::sync::RwLock;

enum Source {
    Simulated(SimulatedWeather),
    OpenWeatherMap(OpenWeatherMapClient),
}

/// Fetches weather from the configured provider and keeps the latest snapshot.
///
/// Fetch failures never propagate: they are logged and the caller gets `None`,
/// which the scheduler treats as "no weather" and falls back to the baseline.
pub struct WeatherSyncService {
    source: Source,
    current: Arc<RwLock<Option<WeatherSnapshot>>>,
}

impl WeatherSyncService {
    pub fn new(config: &Config) -> Self {
        let source = match (config.weather.provider, config.weather.api_key.as_deref()) {
            (WeatherProvider::OpenWeatherMap, Some(key)) if !key.is_empty() => {
                tracing::info!(city = %config.location.city, "OpenWeatherMap weather provider");
                Source::OpenWeatherMap(OpenWeatherMapClient::new(key, config.location.clone()))
            }
            (WeatherProvider::OpenWeatherMap, _) => {
                tracing::warn!("OpenWeatherMap selected without an API key - using simulated weather");
                Source::Simulated(SimulatedWeather::new(config.location.city.clone()))
            }
            (WeatherProvider::Simulated, _) => {
                tracing::info!(city = %config.location.city, "Simulated weather provider");
                Source::Simulated(SimulatedWeather::new(config.location.city.clone()))
            }
        };

        Self {
            source,
            current: Arc::new(RwLock::new(None)),
        }
    }

    pub fn provider_name(&self) -> &'static str {
        match self.source {
            Source::Simulated(_) => WeatherProvider::Simulated.as_str(),
            Source::OpenWeatherMap(_) => WeatherProvider::OpenWeatherMap.as_str(),
        }
    }

    /// Fetch a fresh snapshot. On failure the previous snapshot is dropped
    /// so stale weather never drives the schedule.
    pub async fn refresh(&self) -> Option<WeatherSnapshot> {
        let snapshot = match &self.source {
            Source::Simulated(sim) => Some(sim.snapshot(Utc::now())),
            Source::OpenWeatherMap(client) => match client.fetch_snapshot().await {
                Ok(snapshot) => Some(snapshot),
                Err(e) => {
                    tracing::warn!("Failed to fetch weather: {}", e);
                    None
                }
            },
        };

        if let Some(ref s) = snapshot {
            tracing::debug!(
                city = %s.city,
                temp = s.current.temperature,
                humidity = s.current.humidity,
                uv = s.current.uv_index,
                rain = s.current.rain_chance,
                "Weather updated"
            );
        }

        let mut current = self.current.write().await;
        *current = snapshot.clone();
        snapshot
    }

    pub async fn current(&self) -> Option<WeatherSnapshot> {
        self.current.read().await.clone()
    }

    pub async fn check_connection(&self) -> bool {
        match &self.source {
            Source::Simulated(_) => true,
            Source::OpenWeatherMap(client) => client.test_connection().await.unwrap_or(false),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::WeatherConfig;

    #[tokio::test]
    async fn simulated_provider_always_yields_weather() {
        let service = WeatherSyncService::new(&Config::default());
        assert_eq!(service.provider_name(), "Simulated");
        assert!(service.current().await.is_none());

        let snapshot = service.refresh().await.unwrap();
        assert_eq!(snapshot.forecast.len(), 5);
        assert_eq!(service.current().await, Some(snapshot));
        assert!(service.check_connection().await);
    }

    #[tokio::test]
    async fn missing_api_key_falls_back_to_simulated() {
        let mut config = Config::default();
        config.weather = WeatherConfig {
            provider: WeatherProvider::OpenWeatherMap,
            api_key: None,
        };
        let service = WeatherSyncService::new(&config);
        assert_eq!(service.provider_name(), "Simulated");
    }
}
