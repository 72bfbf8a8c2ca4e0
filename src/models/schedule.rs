use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const STANDARD_REASON: &str = "standard schedule";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WateringSchedule {
    pub next_date: DateTime<Utc>,
    /// Whole days until `next_date`, rounded up. Negative when overdue.
    pub days_remaining: i64,
    pub reason: String,
    pub adjusted: bool,
}

impl WateringSchedule {
    pub fn is_due(&self) -> bool {
        self.days_remaining <= 0
    }

    pub fn is_overdue(&self) -> bool {
        self.days_remaining < 0
    }

    pub fn status_label(&self) -> String {
        match self.days_remaining {
            0 => "Water today".to_string(),
            d if d < 0 => "Overdue".to_string(),
            1 => "1 day".to_string(),
            d => format!("{} days", d),
        }
    }
}
