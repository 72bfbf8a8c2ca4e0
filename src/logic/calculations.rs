use crate::logic::scheduler::compute_schedule;
use crate::models::{Plant, WateringSchedule, WeatherSnapshot};
use chrono::{DateTime, Datelike, Duration, Local, NaiveDate, TimeZone, Utc, Weekday};

/// Waterings shown in recent-interval charts.
pub const RECENT_INTERVALS: usize = 5;

#[derive(Debug, Clone)]
pub struct AgendaEntry<'a> {
    pub plant: &'a Plant,
    pub schedule: WateringSchedule,
}

/// Plants grouped by how soon they need water, each bucket soonest first.
#[derive(Debug, Clone, Default)]
pub struct Agenda<'a> {
    pub today: Vec<AgendaEntry<'a>>,
    pub this_week: Vec<AgendaEntry<'a>>,
    pub later: Vec<AgendaEntry<'a>>,
}

impl<'a> Agenda<'a> {
    pub fn build(plants: &'a [Plant], weather: Option<&WeatherSnapshot>, now: DateTime<Utc>) -> Self {
        let mut entries: Vec<AgendaEntry<'a>> = plants
            .iter()
            .map(|plant| AgendaEntry {
                plant,
                schedule: compute_schedule(plant, weather, now),
            })
            .collect();
        entries.sort_by_key(|e| e.schedule.next_date);

        let mut agenda = Agenda::default();
        for entry in entries {
            match entry.schedule.days_remaining {
                d if d <= 0 => agenda.today.push(entry),
                1..=7 => agenda.this_week.push(entry),
                _ => agenda.later.push(entry),
            }
        }
        agenda
    }

    pub fn is_empty(&self) -> bool {
        self.today.is_empty() && self.this_week.is_empty() && self.later.is_empty()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatusCounts {
    pub on_time: usize,
    pub late: usize,
}

impl StatusCounts {
    pub fn total(&self) -> usize {
        self.on_time + self.late
    }

    /// Share of plants on schedule, 0.0 when the garden is empty.
    pub fn on_time_ratio(&self) -> f64 {
        if self.total() == 0 {
            0.0
        } else {
            self.on_time as f64 / self.total() as f64
        }
    }
}

pub fn status_counts(
    plants: &[Plant],
    weather: Option<&WeatherSnapshot>,
    now: DateTime<Utc>,
) -> StatusCounts {
    plants
        .iter()
        .fold(StatusCounts::default(), |mut counts, plant| {
            if compute_schedule(plant, weather, now).is_overdue() {
                counts.late += 1;
            } else {
                counts.on_time += 1;
            }
            counts
        })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayActivity {
    pub date: NaiveDate,
    pub count: usize,
}

impl DayActivity {
    pub fn label(&self) -> &'static str {
        match self.date.weekday() {
            Weekday::Mon => "Mon",
            Weekday::Tue => "Tue",
            Weekday::Wed => "Wed",
            Weekday::Thu => "Thu",
            Weekday::Fri => "Fri",
            Weekday::Sat => "Sat",
            Weekday::Sun => "Sun",
        }
    }
}

/// Waterings per local calendar day over the last seven days, oldest first.
pub fn weekly_activity(plants: &[Plant], now: DateTime<Utc>) -> Vec<DayActivity> {
    weekly_activity_in(plants, now, &Local)
}

pub fn weekly_activity_in<Tz: TimeZone>(
    plants: &[Plant],
    now: DateTime<Utc>,
    tz: &Tz,
) -> Vec<DayActivity> {
    let today = now.with_timezone(tz).date_naive();
    let watered_days: Vec<NaiveDate> = plants
        .iter()
        .flat_map(|p| p.history())
        .map(|dt| dt.with_timezone(tz).date_naive())
        .collect();

    (0..7)
        .rev()
        .map(|back| {
            let date = today - Duration::days(back);
            DayActivity {
                date,
                count: watered_days.iter().filter(|d| **d == date).count(),
            }
        })
        .collect()
}

/// Interval in days leading up to each of the last few waterings.
///
/// The oldest point has no predecessor in the window and reports the
/// baseline frequency instead.
pub fn recent_intervals(plant: &Plant) -> Vec<u32> {
    let history = plant.history();
    let recent = &history[history.len().saturating_sub(RECENT_INTERVALS)..];

    recent
        .iter()
        .enumerate()
        .map(|(idx, stamp)| {
            if idx == 0 {
                return plant.watering_frequency_days;
            }
            let days = (*stamp - recent[idx - 1]).num_milliseconds() as f64 / 86_400_000.0;
            days.round().max(0.0) as u32
        })
        .collect()
}
