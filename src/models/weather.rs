use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Coarse sky condition shown alongside a reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum WeatherCondition {
    #[default]
    Sunny,
    Cloudy,
    Rainy,
    Stormy,
}

impl WeatherCondition {
    /// Map an OpenWeatherMap condition code onto the four display buckets.
    pub fn from_owm_id(id: u32) -> Self {
        match id {
            200..=232 => WeatherCondition::Stormy,
            300..=321 | 500..=531 | 600..=622 => WeatherCondition::Rainy,
            800 => WeatherCondition::Sunny,
            _ => WeatherCondition::Cloudy,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            WeatherCondition::Sunny => "Sunny",
            WeatherCondition::Cloudy => "Cloudy",
            WeatherCondition::Rainy => "Rainy",
            WeatherCondition::Stormy => "Stormy",
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            WeatherCondition::Sunny => "☀",
            WeatherCondition::Cloudy => "☁",
            WeatherCondition::Rainy => "🌧",
            WeatherCondition::Stormy => "⛈",
        }
    }
}

impl std::fmt::Display for WeatherCondition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Conditions right now. Temperatures in °C, percentages in 0-100.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentConditions {
    pub temperature: f64,
    pub humidity: f64,
    pub uv_index: f64,
    pub rain_chance: f64,
    pub condition: WeatherCondition,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyForecast {
    pub date: NaiveDate,
    pub temp_max: f64,
    pub temp_min: f64,
    pub rain_chance: f64,
    pub uv_index: f64,
    pub condition: WeatherCondition,
}

/// A consistent view of current weather plus the coming days, starting
/// with tomorrow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherSnapshot {
    pub fetched_at: DateTime<Utc>,
    pub city: String,
    pub current: CurrentConditions,
    pub forecast: Vec<DailyForecast>,
}

impl WeatherSnapshot {
    /// The first `days` forecast entries (fewer if the forecast is short).
    pub fn next_days(&self, days: usize) -> &[DailyForecast] {
        &self.forecast[..days.min(self.forecast.len())]
    }

    pub fn tomorrow(&self) -> Option<&DailyForecast> {
        self.forecast.first()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(offset: u32, rain: f64) -> DailyForecast {
        DailyForecast {
            date: NaiveDate::from_ymd_opt(2024, 7, 1 + offset).unwrap(),
            temp_max: 30.0,
            temp_min: 18.0,
            rain_chance: rain,
            uv_index: 7.0,
            condition: WeatherCondition::Sunny,
        }
    }

    fn snapshot(forecast: Vec<DailyForecast>) -> WeatherSnapshot {
        WeatherSnapshot {
            fetched_at: Utc::now(),
            city: "Lisbon".to_string(),
            current: CurrentConditions {
                temperature: 24.0,
                humidity: 55.0,
                uv_index: 5.0,
                rain_chance: 10.0,
                condition: WeatherCondition::Cloudy,
            },
            forecast,
        }
    }

    #[test]
    fn weather_condition_from_owm_id() {
        assert_eq!(WeatherCondition::from_owm_id(211), WeatherCondition::Stormy);
        assert_eq!(WeatherCondition::from_owm_id(301), WeatherCondition::Rainy);
        assert_eq!(WeatherCondition::from_owm_id(501), WeatherCondition::Rainy);
        assert_eq!(WeatherCondition::from_owm_id(800), WeatherCondition::Sunny);
        assert_eq!(WeatherCondition::from_owm_id(803), WeatherCondition::Cloudy);
        assert_eq!(WeatherCondition::from_owm_id(741), WeatherCondition::Cloudy);
    }

    #[test]
    fn next_days_truncates_to_available_forecast() {
        let snap = snapshot(vec![day(0, 10.0), day(1, 20.0)]);
        assert_eq!(snap.next_days(3).len(), 2);
        assert_eq!(snap.next_days(1)[0].rain_chance, 10.0);
        assert_eq!(snapshot(Vec::new()).next_days(3).len(), 0);
    }

    #[test]
    fn tomorrow_is_first_entry() {
        let snap = snapshot(vec![day(0, 10.0), day(1, 20.0)]);
        assert_eq!(snap.tomorrow().map(|d| d.rain_chance), Some(10.0));
        assert!(snapshot(Vec::new()).tomorrow().is_none());
    }
}
