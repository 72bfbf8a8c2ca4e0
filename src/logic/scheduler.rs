//! Weather-adjusted watering schedule.
//!
//! The drying factor is built in two explicit phases: independent weather
//! signals are accumulated first, then a rain dominance check may discard
//! all of them in favour of a single authoritative reason. Positive factors
//! bring the next watering forward, negative ones push it back.

use crate::models::{Plant, WateringSchedule, WeatherSnapshot, STANDARD_REASON};
use chrono::{DateTime, Duration, Utc};

/// Forecast days considered for heat waves and incoming rain.
pub const LOOKAHEAD_DAYS: usize = 3;

const MS_PER_DAY: f64 = 86_400_000.0;

pub const REASON_HEAT: &str = "intense heat";
pub const REASON_COLD: &str = "cold slows metabolism";
pub const REASON_DRY_AIR: &str = "dry air";
pub const REASON_HIGH_UV: &str = "high UV";
pub const REASON_RAIN_FORECAST: &str = "rain expected in coming days";
pub const REASON_RAIN_TODAY: &str = "rain today";

/// One weather contribution to the drying factor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DryingSignal {
    pub weight: f64,
    pub label: Option<&'static str>,
}

impl DryingSignal {
    fn labelled(weight: f64, label: &'static str) -> Self {
        Self {
            weight,
            label: Some(label),
        }
    }

    fn silent(weight: f64) -> Self {
        Self {
            weight,
            label: None,
        }
    }
}

/// Rain conditions strong enough to override every other signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RainOverride {
    Forecast,
    Today,
}

impl RainOverride {
    pub fn factor(&self) -> f64 {
        match self {
            RainOverride::Forecast => -3.0,
            RainOverride::Today => -2.0,
        }
    }

    pub fn reason(&self) -> &'static str {
        match self {
            RainOverride::Forecast => REASON_RAIN_FORECAST,
            RainOverride::Today => REASON_RAIN_TODAY,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DryingAssessment {
    pub factor: f64,
    pub reasons: Vec<&'static str>,
    pub rain_override: Option<RainOverride>,
}

/// Phase one: collect every signal the snapshot supports.
pub fn drying_signals(weather: &WeatherSnapshot) -> Vec<DryingSignal> {
    let current = &weather.current;
    let mut signals = Vec::new();

    if current.temperature > 30.0 {
        signals.push(DryingSignal::labelled(1.5, REASON_HEAT));
    } else if current.temperature > 25.0 {
        signals.push(DryingSignal::silent(0.5));
    } else if current.temperature < 15.0 {
        signals.push(DryingSignal::labelled(-1.0, REASON_COLD));
    }

    if current.humidity < 35.0 {
        signals.push(DryingSignal::labelled(1.0, REASON_DRY_AIR));
    } else if current.humidity > 80.0 {
        signals.push(DryingSignal::silent(-0.5));
    }

    if current.uv_index >= 8.0 {
        signals.push(DryingSignal::labelled(0.5, REASON_HIGH_UV));
    }

    for day in weather.next_days(LOOKAHEAD_DAYS) {
        if day.temp_max > 32.0 {
            signals.push(DryingSignal::silent(0.2));
        }
    }

    signals
}

/// Mean rain chance over the look-ahead window. Missing days count as dry.
pub fn lookahead_rain_chance(weather: &WeatherSnapshot) -> f64 {
    let total: f64 = weather
        .next_days(LOOKAHEAD_DAYS)
        .iter()
        .map(|d| d.rain_chance)
        .sum();
    total / LOOKAHEAD_DAYS as f64
}

/// Phase two: fold the signals, then let heavy rain replace the result.
pub fn assess_drying(weather: &WeatherSnapshot) -> DryingAssessment {
    let signals = drying_signals(weather);

    let rain_override = if lookahead_rain_chance(weather) > 60.0 {
        Some(RainOverride::Forecast)
    } else if weather.current.rain_chance > 70.0 {
        Some(RainOverride::Today)
    } else {
        None
    };

    if let Some(rain) = rain_override {
        return DryingAssessment {
            factor: rain.factor(),
            reasons: vec![rain.reason()],
            rain_override,
        };
    }

    let factor = signals.iter().map(|s| s.weight).sum();
    let mut reasons: Vec<&'static str> = Vec::new();
    for label in signals.iter().filter_map(|s| s.label) {
        if !reasons.contains(&label) {
            reasons.push(label);
        }
    }

    DryingAssessment {
        factor,
        reasons,
        rain_override: None,
    }
}

/// Baseline minus drying factor, rounded half up and kept within
/// `[1, 2 * baseline]`.
pub fn adjusted_interval(baseline_days: u32, factor: f64) -> u32 {
    let upper = baseline_days.max(1).saturating_mul(2) as f64;
    let raw = (baseline_days as f64 - factor + 0.5).floor();
    raw.max(1.0).min(upper) as u32
}

/// `start` plus whole days, pinned to the latest representable instant.
fn add_days(start: DateTime<Utc>, days: u32) -> DateTime<Utc> {
    start
        .checked_add_signed(Duration::days(days as i64))
        .unwrap_or(DateTime::<Utc>::MAX_UTC)
}

fn days_until(target: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    ((target - now).num_milliseconds() as f64 / MS_PER_DAY).ceil() as i64
}

fn describe(assessment: &DryingAssessment) -> String {
    let joined = assessment
        .reasons
        .iter()
        .take(2)
        .copied()
        .collect::<Vec<_>>()
        .join(" + ");
    if assessment.factor > 0.0 {
        format!("Earlier: {}", joined)
    } else {
        format!("Delayed: {}", joined)
    }
}

/// Compute when `plant` should next be watered.
///
/// Without a snapshot the baseline frequency applies unchanged.
pub fn compute_schedule(
    plant: &Plant,
    weather: Option<&WeatherSnapshot>,
    now: DateTime<Utc>,
) -> WateringSchedule {
    let last_watered = plant.last_watered_at(now);
    let baseline = plant.watering_frequency_days;

    let Some(weather) = weather else {
        let next_date = add_days(last_watered, baseline);
        return WateringSchedule {
            next_date,
            days_remaining: days_until(next_date, now),
            reason: STANDARD_REASON.to_string(),
            adjusted: false,
        };
    };

    let assessment = assess_drying(weather);
    let interval = adjusted_interval(baseline, assessment.factor);
    let next_date = add_days(last_watered, interval);
    let adjusted = interval.abs_diff(baseline) >= 1;

    let reason = if adjusted && !assessment.reasons.is_empty() {
        describe(&assessment)
    } else {
        STANDARD_REASON.to_string()
    };

    tracing::trace!(
        plant = %plant.id,
        factor = assessment.factor,
        interval,
        adjusted,
        "computed watering schedule"
    );

    WateringSchedule {
        next_date,
        days_remaining: days_until(next_date, now),
        reason,
        adjusted,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        CurrentConditions, DailyForecast, SunTolerance, WeatherCondition, WeatherSnapshot,
    };
    use chrono::{NaiveDate, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 7, 10, 12, 0, 0).unwrap()
    }

    fn plant(frequency: u32, watered_days_ago: i64) -> Plant {
        Plant::new("Peace Lily", "Spathiphyllum", frequency, SunTolerance::Shade, 15.0, 30.0)
            .with_id("lily")
            .with_last_watered(now() - Duration::days(watered_days_ago))
    }

    fn forecast(rain: [f64; 3], temp_max: f64) -> Vec<DailyForecast> {
        rain.iter()
            .enumerate()
            .map(|(i, r)| DailyForecast {
                date: NaiveDate::from_ymd_opt(2024, 7, 11 + i as u32).unwrap(),
                temp_max,
                temp_min: 18.0,
                rain_chance: *r,
                uv_index: 6.0,
                condition: WeatherCondition::Cloudy,
            })
            .collect()
    }

    fn weather(
        temperature: f64,
        humidity: f64,
        uv_index: f64,
        rain_chance: f64,
        forecast: Vec<DailyForecast>,
    ) -> WeatherSnapshot {
        WeatherSnapshot {
            fetched_at: now(),
            city: "Recife".to_string(),
            current: CurrentConditions {
                temperature,
                humidity,
                uv_index,
                rain_chance,
                condition: WeatherCondition::Sunny,
            },
            forecast,
        }
    }

    fn mild() -> WeatherSnapshot {
        weather(20.0, 50.0, 4.0, 10.0, forecast([10.0, 10.0, 10.0], 24.0))
    }

    #[test]
    fn no_weather_uses_baseline() {
        let p = plant(5, 2);
        let schedule = compute_schedule(&p, None, now());
        assert_eq!(schedule.next_date, now() + Duration::days(3));
        assert_eq!(schedule.days_remaining, 3);
        assert_eq!(schedule.reason, STANDARD_REASON);
        assert!(!schedule.adjusted);
    }

    #[test]
    fn missing_last_watered_counts_from_now() {
        let p = Plant::new("Fern", "Nephrolepis", 4, SunTolerance::Shade, 12.0, 30.0);
        let schedule = compute_schedule(&p, None, now());
        assert_eq!(schedule.next_date, now() + Duration::days(4));
        assert_eq!(schedule.days_remaining, 4);
    }

    #[test]
    fn mild_weather_keeps_baseline() {
        let p = plant(7, 1);
        let schedule = compute_schedule(&p, Some(&mild()), now());
        assert!(!schedule.adjusted);
        assert_eq!(schedule.reason, STANDARD_REASON);
        assert_eq!(schedule.next_date, now() + Duration::days(6));
    }

    #[test]
    fn hot_dry_sunny_day_brings_watering_forward() {
        let p = plant(7, 7);
        let w = weather(32.0, 30.0, 9.0, 5.0, forecast([10.0, 10.0, 10.0], 30.0));

        let assessment = assess_drying(&w);
        assert!((assessment.factor - 3.0).abs() < 1e-9);
        assert_eq!(
            assessment.reasons,
            vec![REASON_HEAT, REASON_DRY_AIR, REASON_HIGH_UV]
        );

        let schedule = compute_schedule(&p, Some(&w), now());
        assert_eq!(schedule.next_date, now() - Duration::days(3));
        assert_eq!(schedule.days_remaining, -3);
        assert!(schedule.adjusted);
        assert!(schedule.reason.starts_with("Earlier:"));
        // Only the first two reasons are shown.
        assert_eq!(schedule.reason, "Earlier: intense heat + dry air");
    }

    #[test]
    fn rain_forecast_overrides_every_other_signal() {
        let p = plant(7, 7);
        let w = weather(32.0, 30.0, 9.0, 5.0, forecast([70.0, 80.0, 75.0], 30.0));

        let assessment = assess_drying(&w);
        assert_eq!(assessment.rain_override, Some(RainOverride::Forecast));
        assert_eq!(assessment.factor, -3.0);
        assert_eq!(assessment.reasons, vec![REASON_RAIN_FORECAST]);

        let schedule = compute_schedule(&p, Some(&w), now());
        assert_eq!(schedule.next_date, now() + Duration::days(3));
        assert!(schedule.adjusted);
        assert_eq!(schedule.reason, "Delayed: rain expected in coming days");
    }

    #[test]
    fn rain_today_overrides_when_forecast_is_dry() {
        let p = plant(5, 0);
        let w = weather(32.0, 30.0, 9.0, 85.0, forecast([10.0, 20.0, 30.0], 30.0));

        let assessment = assess_drying(&w);
        assert_eq!(assessment.rain_override, Some(RainOverride::Today));

        let schedule = compute_schedule(&p, Some(&w), now());
        assert_eq!(schedule.next_date, now() + Duration::days(7));
        assert_eq!(schedule.reason, "Delayed: rain today");
    }

    #[test]
    fn forecast_rain_beats_rain_today() {
        let w = weather(20.0, 50.0, 4.0, 90.0, forecast([90.0, 90.0, 90.0], 24.0));
        assert_eq!(
            assess_drying(&w).rain_override,
            Some(RainOverride::Forecast)
        );
    }

    #[test]
    fn rain_average_uses_fixed_three_day_window() {
        // 100 + 100 over three days averages 66.7 even with a short forecast.
        let mut w = mild();
        w.forecast = forecast([100.0, 100.0, 0.0], 24.0);
        w.forecast.truncate(2);
        assert!((lookahead_rain_chance(&w) - 200.0 / 3.0).abs() < 1e-9);
        assert_eq!(
            assess_drying(&w).rain_override,
            Some(RainOverride::Forecast)
        );
    }

    #[test]
    fn cold_humid_weather_delays_watering() {
        let p = plant(4, 0);
        let w = weather(10.0, 90.0, 1.0, 30.0, forecast([20.0, 20.0, 20.0], 14.0));
        let schedule = compute_schedule(&p, Some(&w), now());
        // 4 - (-1.5) = 5.5, rounded half up to 6
        assert_eq!(schedule.next_date, now() + Duration::days(6));
        assert_eq!(schedule.reason, "Delayed: cold slows metabolism");
    }

    #[test]
    fn heat_wave_days_add_up() {
        let w = weather(27.0, 50.0, 4.0, 10.0, forecast([10.0, 10.0, 10.0], 35.0));
        let assessment = assess_drying(&w);
        assert!((assessment.factor - 1.1).abs() < 1e-9);
        assert!(assessment.reasons.is_empty());
    }

    #[test]
    fn adjustment_without_labels_reads_as_standard() {
        let p = plant(7, 0);
        let w = weather(27.0, 50.0, 4.0, 10.0, forecast([10.0, 10.0, 10.0], 35.0));
        let schedule = compute_schedule(&p, Some(&w), now());
        assert!(schedule.adjusted);
        assert_eq!(schedule.reason, STANDARD_REASON);
        assert_eq!(schedule.next_date, now() + Duration::days(6));
    }

    #[test]
    fn interval_is_always_clamped() {
        for baseline in 1..=30u32 {
            for step in -200..=200 {
                let factor = step as f64 * 0.25;
                let interval = adjusted_interval(baseline, factor);
                assert!(interval >= 1, "baseline {} factor {}", baseline, factor);
                assert!(
                    interval <= baseline * 2,
                    "baseline {} factor {}",
                    baseline,
                    factor
                );
            }
        }
    }

    #[test]
    fn interval_rounds_half_up() {
        assert_eq!(adjusted_interval(3, 0.5), 3);
        assert_eq!(adjusted_interval(7, -1.5), 9);
        assert_eq!(adjusted_interval(7, 3.0), 4);
        assert_eq!(adjusted_interval(7, -3.0), 10);
        assert_eq!(adjusted_interval(1, 5.0), 1);
        assert_eq!(adjusted_interval(2, -10.0), 4);
    }

    #[test]
    fn huge_frequency_does_not_overflow_the_clamp() {
        assert_eq!(adjusted_interval(3_000_000_000, 0.0), 3_000_000_000);
        assert_eq!(adjusted_interval(u32::MAX, -10.0), u32::MAX);
    }

    #[test]
    fn far_future_dates_saturate() {
        let p = plant(200_000_000, 0);
        let schedule = compute_schedule(&p, None, now());
        assert_eq!(schedule.next_date, DateTime::<Utc>::MAX_UTC);
        assert!(schedule.days_remaining > 0);

        let adjusted = compute_schedule(&plant(u32::MAX, 0), Some(&mild()), now());
        assert_eq!(adjusted.next_date, DateTime::<Utc>::MAX_UTC);
    }

    #[test]
    fn days_remaining_rounds_up_partial_days() {
        let p = Plant::new("Pothos", "Epipremnum", 3, SunTolerance::Partial, 15.0, 32.0)
            .with_last_watered(now() - Duration::hours(30));
        let schedule = compute_schedule(&p, None, now());
        // 72h - 30h = 42h -> 1.75 days -> 2
        assert_eq!(schedule.days_remaining, 2);
    }

    #[test]
    fn schedule_is_idempotent() {
        let p = plant(6, 2);
        let w = weather(31.0, 33.0, 8.0, 20.0, forecast([10.0, 40.0, 30.0], 33.0));
        let first = compute_schedule(&p, Some(&w), now());
        let second = compute_schedule(&p, Some(&w), now());
        assert_eq!(first, second);
        assert_eq!(compute_schedule(&p, None, now()), compute_schedule(&p, None, now()));
    }
}
