use crate::models::{CurrentConditions, DailyForecast, WeatherCondition, WeatherSnapshot};
use chrono::{DateTime, Duration, Utc};
use rand::seq::SliceRandom;
use rand::Rng;

const FORECAST_DAYS: i64 = 5;

/// A canned weather situation the simulator draws from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeatherScenario {
    pub temperature: f64,
    pub condition: WeatherCondition,
    pub uv_index: f64,
    pub rain_chance: f64,
    pub humidity: f64,
}

pub const SCENARIOS: [WeatherScenario; 3] = [
    WeatherScenario {
        temperature: 28.0,
        condition: WeatherCondition::Sunny,
        uv_index: 9.0,
        rain_chance: 5.0,
        humidity: 45.0,
    },
    WeatherScenario {
        temperature: 18.0,
        condition: WeatherCondition::Rainy,
        uv_index: 2.0,
        rain_chance: 90.0,
        humidity: 85.0,
    },
    WeatherScenario {
        temperature: 22.0,
        condition: WeatherCondition::Cloudy,
        uv_index: 4.0,
        rain_chance: 20.0,
        humidity: 60.0,
    },
];

/// Offline weather source for demos and for running without an API key.
pub struct SimulatedWeather {
    city: String,
}

impl SimulatedWeather {
    pub fn new(city: impl Into<String>) -> Self {
        let city = city.into();
        Self {
            city: if city.trim().is_empty() {
                "Unknown location".to_string()
            } else {
                city
            },
        }
    }

    pub fn snapshot(&self, now: DateTime<Utc>) -> WeatherSnapshot {
        self.snapshot_with(&mut rand::thread_rng(), now)
    }

    /// Draw a snapshot from `rng`; a seeded rng gives a reproducible result.
    pub fn snapshot_with<R: Rng>(&self, rng: &mut R, now: DateTime<Utc>) -> WeatherSnapshot {
        let scenario = pick(rng);
        let today = now.date_naive();

        let forecast = (1..=FORECAST_DAYS)
            .map(|offset| {
                let base = pick(rng);
                DailyForecast {
                    date: today + Duration::days(offset),
                    temp_max: base.temperature + rng.gen_range(0..5) as f64,
                    temp_min: base.temperature - rng.gen_range(0..5) as f64,
                    rain_chance: base.rain_chance,
                    uv_index: base.uv_index,
                    condition: base.condition,
                }
            })
            .collect();

        tracing::debug!(city = %self.city, condition = %scenario.condition, "simulated weather");

        WeatherSnapshot {
            fetched_at: now,
            city: self.city.clone(),
            current: CurrentConditions {
                temperature: scenario.temperature,
                humidity: scenario.humidity,
                uv_index: scenario.uv_index,
                rain_chance: scenario.rain_chance,
                condition: scenario.condition,
            },
            forecast,
        }
    }
}

fn pick<R: Rng>(rng: &mut R) -> WeatherScenario {
    *SCENARIOS.choose(rng).unwrap_or(&SCENARIOS[0])
}
