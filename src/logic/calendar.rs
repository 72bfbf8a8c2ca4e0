//! Calendar reminders for the next watering.
//!
//! Events run 08:00 to 08:30 in the given time zone on the watering date and
//! are emitted as an iCalendar document or as Google/Outlook compose links.

use crate::error::{PlantOpsError, Result};
use crate::models::Plant;
use chrono::{DateTime, Duration, Local, NaiveTime, SecondsFormat, TimeZone, Utc};
use reqwest::Url;

const GOOGLE_RENDER_URL: &str = "https://calendar.google.com/calendar/render";
const OUTLOOK_COMPOSE_URL: &str = "https://outlook.live.com/calendar/0/deeplink/compose";
const EVENT_MINUTES: i64 = 30;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarEvent {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub title: String,
    pub description: String,
}

impl CalendarEvent {
    /// Reminder in the local time zone.
    pub fn for_plant(plant: &Plant, next_date: DateTime<Utc>) -> Self {
        Self::for_plant_in(plant, next_date, &Local)
    }

    pub fn for_plant_in<Tz: TimeZone>(plant: &Plant, next_date: DateTime<Utc>, tz: &Tz) -> Self {
        let day = next_date.with_timezone(tz).date_naive();
        let eight = NaiveTime::from_hms_opt(8, 0, 0).unwrap_or_default();
        let start = tz
            .from_local_datetime(&day.and_time(eight))
            .earliest()
            .map(|dt| dt.with_timezone(&Utc))
            .unwrap_or(next_date);

        Self {
            start,
            end: start
                .checked_add_signed(Duration::minutes(EVENT_MINUTES))
                .unwrap_or(start),
            title: format!("Water: {}", plant.common_name),
            description: format!(
                "PlantOps reminder to water your {} ({}). Check the soil moisture first.",
                plant.common_name, plant.scientific_name
            ),
        }
    }

    pub fn to_ics(&self, now: DateTime<Utc>) -> String {
        let lines = [
            "BEGIN:VCALENDAR".to_string(),
            "VERSION:2.0".to_string(),
            "PRODID:-//PlantOps//Watering//EN".to_string(),
            "CALSCALE:GREGORIAN".to_string(),
            "BEGIN:VEVENT".to_string(),
            format!("UID:{}@plantops", uuid::Uuid::new_v4()),
            format!("DTSTAMP:{}", ics_stamp(now)),
            format!("DTSTART:{}", ics_stamp(self.start)),
            format!("DTEND:{}", ics_stamp(self.end)),
            format!("SUMMARY:{}", escape_text(&self.title)),
            format!("DESCRIPTION:{}", escape_text(&self.description)),
            "STATUS:CONFIRMED".to_string(),
            "END:VEVENT".to_string(),
            "END:VCALENDAR".to_string(),
        ];
        // Every content line, the last included, ends in CRLF.
        let mut doc = lines.join("\r\n");
        doc.push_str("\r\n");
        doc
    }

    pub fn google_url(&self) -> Result<Url> {
        let dates = format!("{}/{}", ics_stamp(self.start), ics_stamp(self.end));
        Url::parse_with_params(
            GOOGLE_RENDER_URL,
            &[
                ("action", "TEMPLATE"),
                ("text", self.title.as_str()),
                ("dates", dates.as_str()),
                ("details", self.description.as_str()),
                ("sf", "true"),
                ("output", "xml"),
            ],
        )
        .map_err(|e| PlantOpsError::InvalidData(format!("calendar url: {}", e)))
    }

    pub fn outlook_url(&self) -> Result<Url> {
        let start = self.start.to_rfc3339_opts(SecondsFormat::Millis, true);
        let end = self.end.to_rfc3339_opts(SecondsFormat::Millis, true);
        Url::parse_with_params(
            OUTLOOK_COMPOSE_URL,
            &[
                ("subject", self.title.as_str()),
                ("body", self.description.as_str()),
                ("startdt", start.as_str()),
                ("enddt", end.as_str()),
            ],
        )
        .map_err(|e| PlantOpsError::InvalidData(format!("calendar url: {}", e)))
    }
}

/// `water_Boston_Fern.ics`. Anything other than letters, digits and `-`
/// becomes a separator, so user-entered names cannot escape the directory.
pub fn ics_file_name(plant: &Plant) -> String {
    let parts: Vec<&str> = plant
        .common_name
        .split(|c: char| !(c.is_alphanumeric() || c == '-'))
        .filter(|p| !p.is_empty())
        .collect();
    if parts.is_empty() {
        return "water_plant.ics".to_string();
    }
    format!("water_{}.ics", parts.join("_"))
}

fn ics_stamp(dt: DateTime<Utc>) -> String {
    dt.format("%Y%m%dT%H%M%SZ").to_string()
}

fn escape_text(s: &str) -> String {
    s.replace('\\', "\\\\")
        .replace(';', "\\;")
        .replace(',', "\\,")
        .replace('\n', "\\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SunTolerance;
    use chrono::FixedOffset;

    fn fern() -> Plant {
        Plant::new("Boston Fern", "Nephrolepis exaltata", 3, SunTolerance::Shade, 12.0, 30.0)
    }

    fn next_date() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 10, 15, 42, 0).unwrap()
    }

    #[test]
    fn event_is_half_an_hour_at_eight() {
        let event = CalendarEvent::for_plant_in(&fern(), next_date(), &Utc);
        assert_eq!(event.start, Utc.with_ymd_and_hms(2024, 6, 10, 8, 0, 0).unwrap());
        assert_eq!(event.end, Utc.with_ymd_and_hms(2024, 6, 10, 8, 30, 0).unwrap());
        assert_eq!(event.title, "Water: Boston Fern");
        assert!(event.description.contains("Nephrolepis exaltata"));
    }

    #[test]
    fn eight_oclock_is_local_to_the_zone() {
        let brt = FixedOffset::west_opt(3 * 3600).unwrap();
        let event = CalendarEvent::for_plant_in(&fern(), next_date(), &brt);
        assert_eq!(event.start, Utc.with_ymd_and_hms(2024, 6, 10, 11, 0, 0).unwrap());
    }

    #[test]
    fn ics_document_layout() {
        let event = CalendarEvent::for_plant_in(&fern(), next_date(), &Utc);
        let now = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
        let ics = event.to_ics(now);

        assert!(ics.starts_with("BEGIN:VCALENDAR\r\nVERSION:2.0\r\n"));
        assert!(ics.ends_with("END:VEVENT\r\nEND:VCALENDAR\r\n"));
        assert!(ics.contains("\r\nDTSTAMP:20240601T120000Z\r\n"));
        assert!(ics.contains("\r\nDTSTART:20240610T080000Z\r\n"));
        assert!(ics.contains("\r\nDTEND:20240610T083000Z\r\n"));
        assert!(ics.contains("\r\nSUMMARY:Water: Boston Fern\r\n"));
        assert!(!ics.replace("\r\n", "").contains('\n'));
    }

    #[test]
    fn ics_escapes_separators() {
        assert_eq!(escape_text("a, b; c"), "a\\, b\\; c");
    }

    #[test]
    fn google_link() {
        let event = CalendarEvent::for_plant_in(&fern(), next_date(), &Utc);
        let url = event.google_url().unwrap();
        assert_eq!(url.host_str(), Some("calendar.google.com"));
        let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        assert!(pairs.contains(&("action".into(), "TEMPLATE".into())));
        assert!(pairs.contains(&("text".into(), "Water: Boston Fern".into())));
        assert!(pairs.contains(&(
            "dates".into(),
            "20240610T080000Z/20240610T083000Z".into()
        )));
    }

    #[test]
    fn outlook_link_uses_iso_timestamps() {
        let event = CalendarEvent::for_plant_in(&fern(), next_date(), &Utc);
        let url = event.outlook_url().unwrap();
        let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        assert!(pairs.contains(&("startdt".into(), "2024-06-10T08:00:00.000Z".into())));
        assert!(pairs.contains(&("enddt".into(), "2024-06-10T08:30:00.000Z".into())));
        assert!(pairs.contains(&("subject".into(), "Water: Boston Fern".into())));
    }

    #[test]
    fn file_name_replaces_whitespace() {
        let mut plant = fern();
        assert_eq!(ics_file_name(&plant), "water_Boston_Fern.ics");
        plant.common_name = "Peace   Lily ".into();
        assert_eq!(ics_file_name(&plant), "water_Peace_Lily.ics");
    }

    #[test]
    fn file_name_strips_path_characters() {
        let mut plant = fern();
        plant.common_name = "../etc/Orquídea: 2".into();
        assert_eq!(ics_file_name(&plant), "water_etc_Orquídea_2.ics");
        plant.common_name = "/\\..".into();
        assert_eq!(ics_file_name(&plant), "water_plant.ics");
    }

    #[test]
    fn event_at_the_end_of_time_does_not_overflow() {
        let event = CalendarEvent::for_plant_in(&fern(), DateTime::<Utc>::MAX_UTC, &Utc);
        assert!(event.end >= event.start);
    }
}
