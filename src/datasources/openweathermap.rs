use crate::config::LocationConfig;
use crate::error::{PlantOpsError, Result};
use crate::models::weather::{
    CurrentConditions, DailyForecast, WeatherCondition, WeatherSnapshot,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;

const API_BASE_URL: &str = "https://api.openweathermap.org/data/3.0";
const FORECAST_DAYS: usize = 5;

pub struct OpenWeatherMapClient {
    client: reqwest::Client,
    api_key: String,
    location: LocationConfig,
}

// One Call API response structures
#[derive(Debug, Deserialize)]
struct OwmOneCallResponse {
    current: OwmCurrent,
    #[serde(default)]
    hourly: Vec<OwmHourly>,
    #[serde(default)]
    daily: Vec<OwmDaily>,
}

#[derive(Debug, Deserialize)]
struct OwmCurrent {
    temp: f64,
    humidity: f64,
    #[serde(default)]
    uvi: f64,
    #[serde(default)]
    weather: Vec<OwmWeather>,
}

#[derive(Debug, Deserialize)]
struct OwmHourly {
    #[serde(default)]
    pop: f64, // probability of precipitation, 0.0-1.0
}

#[derive(Debug, Deserialize)]
struct OwmDaily {
    dt: i64,
    temp: OwmDailyTemp,
    #[serde(default)]
    pop: f64,
    #[serde(default)]
    uvi: f64,
    #[serde(default)]
    weather: Vec<OwmWeather>,
}

#[derive(Debug, Deserialize)]
struct OwmDailyTemp {
    min: f64,
    max: f64,
}

#[derive(Debug, Deserialize)]
struct OwmWeather {
    id: u32,
}

impl OpenWeatherMapClient {
    pub fn new(api_key: impl Into<String>, location: LocationConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key: api_key.into(),
            location,
        }
    }

    fn url(&self) -> String {
        format!(
            "{}/onecall?lat={}&lon={}&appid={}&units=metric&exclude=minutely,alerts",
            API_BASE_URL, self.location.latitude, self.location.longitude, self.api_key
        )
    }

    /// Fetch current conditions and the daily forecast
    pub async fn fetch_snapshot(&self) -> Result<WeatherSnapshot> {
        let response = self.client.get(self.url()).send().await.map_err(|e| {
            PlantOpsError::DataSourceUnavailable(format!("OpenWeatherMap: {}", e))
        })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(PlantOpsError::DataSourceUnavailable(format!(
                "OpenWeatherMap returned {}: {}",
                status, body
            )));
        }

        let owm_response: OwmOneCallResponse = response.json().await.map_err(|e| {
            PlantOpsError::DataSourceUnavailable(format!(
                "Failed to parse OpenWeatherMap response: {}",
                e
            ))
        })?;

        Ok(self.convert_response(owm_response, Utc::now()))
    }

    /// Test connection to OpenWeatherMap API
    pub async fn test_connection(&self) -> Result<bool> {
        let response = self.client.get(self.url()).send().await.map_err(|e| {
            PlantOpsError::DataSourceUnavailable(format!("OpenWeatherMap: {}", e))
        })?;

        Ok(response.status().is_success())
    }

    fn convert_response(&self, response: OwmOneCallResponse, now: DateTime<Utc>) -> WeatherSnapshot {
        // Prefer the next hour's precipitation chance; fall back to today's.
        let rain_probability = response
            .hourly
            .first()
            .map(|h| h.pop)
            .or_else(|| response.daily.first().map(|d| d.pop))
            .unwrap_or(0.0);

        let current = CurrentConditions {
            temperature: response.current.temp,
            humidity: response.current.humidity,
            uv_index: response.current.uvi,
            rain_chance: rain_probability * 100.0,
            condition: condition_of(&response.current.weather),
        };

        // daily[0] is today
        let forecast = response
            .daily
            .iter()
            .skip(1)
            .take(FORECAST_DAYS)
            .map(|day| DailyForecast {
                date: DateTime::from_timestamp(day.dt, 0)
                    .unwrap_or(now)
                    .date_naive(),
                temp_max: day.temp.max,
                temp_min: day.temp.min,
                rain_chance: day.pop * 100.0,
                uv_index: day.uvi,
                condition: condition_of(&day.weather),
            })
            .collect();

        WeatherSnapshot {
            fetched_at: now,
            city: self.location.city.clone(),
            current,
            forecast,
        }
    }
}

fn condition_of(weather: &[OwmWeather]) -> WeatherCondition {
    weather
        .first()
        .map(|w| WeatherCondition::from_owm_id(w.id))
        .unwrap_or_default()
}
