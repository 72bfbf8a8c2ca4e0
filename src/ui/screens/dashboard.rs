use crate::logic::notifications::Notification;
use crate::models::{Alert, Plant, UserProfile, WateringSchedule, WeatherSnapshot};
use crate::ui::components::{humidity_gauge, nav_bar, rain_gauge, temperature_gauge, uv_gauge};
use crate::ui::Theme;
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph, Widget},
};

pub struct DashboardScreen<'a> {
    pub profile: &'a UserProfile,
    pub weather: Option<&'a WeatherSnapshot>,
    pub alerts: &'a [Alert],
    pub schedules: &'a [(&'a Plant, WateringSchedule)],
    pub notification: Option<&'a Notification>,
    pub status_message: Option<&'a str>,
}

impl<'a> DashboardScreen<'a> {
    pub fn new(
        profile: &'a UserProfile,
        weather: Option<&'a WeatherSnapshot>,
        alerts: &'a [Alert],
        schedules: &'a [(&'a Plant, WateringSchedule)],
    ) -> Self {
        Self {
            profile,
            weather,
            alerts,
            schedules,
            notification: None,
            status_message: None,
        }
    }

    pub fn with_notification(mut self, notification: Option<&'a Notification>) -> Self {
        self.notification = notification;
        self
    }

    pub fn with_status(mut self, status: Option<&'a str>) -> Self {
        self.status_message = status;
        self
    }

    fn plant_name(&self, id: &str) -> &str {
        self.profile
            .plant(id)
            .map(|p| p.common_name.as_str())
            .unwrap_or("?")
    }
}

impl Widget for DashboardScreen<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Header
                Constraint::Length(4), // Gauges row
                Constraint::Length(5), // Forecast
                Constraint::Min(6),    // Alerts and waterings
                Constraint::Length(1), // Status message
                Constraint::Length(1), // Nav bar
            ])
            .split(area);

        self.render_header(chunks[0], buf);
        self.render_gauges(chunks[1], buf);
        self.render_forecast(chunks[2], buf);

        let middle = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
            .split(chunks[3]);

        self.render_alerts(middle[0], buf);
        self.render_waterings(middle[1], buf);

        self.render_status_message(chunks[4], buf);
        Paragraph::new(nav_bar(&[("r", "Refresh")])).render(chunks[5], buf);
    }
}

impl DashboardScreen<'_> {
    fn render_header(&self, area: Rect, buf: &mut Buffer) {
        let city = self
            .weather
            .map(|w| w.city.as_str())
            .or(self.profile.location.as_ref().map(|l| l.city.as_str()))
            .unwrap_or("No location");

        let title = format!(
            "PlantOps - {}'s garden ({}) - {} plant(s)",
            self.profile.name,
            city,
            self.profile.plants.len()
        );

        let block = Block::default()
            .title(Span::styled(title, Theme::title()))
            .borders(Borders::BOTTOM)
            .border_style(Theme::border());

        let info = match self.weather {
            Some(w) => format!(
                "{} {}  -  updated {}",
                w.current.condition.symbol(),
                w.current.condition,
                w.fetched_at
                    .with_timezone(&chrono::Local)
                    .format("%Y-%m-%d %H:%M")
            ),
            None => "Weather unavailable - using standard schedules".to_string(),
        };
        Paragraph::new(Span::styled(info, Theme::dim()))
            .block(block)
            .render(area, buf);
    }

    fn render_gauges(&self, area: Rect, buf: &mut Buffer) {
        let gauge_chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Percentage(25),
                Constraint::Percentage(25),
                Constraint::Percentage(25),
                Constraint::Percentage(25),
            ])
            .split(area);

        let current = self.weather.map(|w| &w.current);

        temperature_gauge("Temperature", current.map(|c| c.temperature))
            .render(gauge_chunks[0], buf);
        humidity_gauge("Humidity", current.map(|c| c.humidity)).render(gauge_chunks[1], buf);
        uv_gauge("UV Index", current.map(|c| c.uv_index)).render(gauge_chunks[2], buf);
        rain_gauge("Rain Chance", current.map(|c| c.rain_chance)).render(gauge_chunks[3], buf);
    }

    fn render_forecast(&self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .title(Span::styled("Forecast", Theme::header()))
            .borders(Borders::ALL)
            .border_style(Theme::border());

        let inner = block.inner(area);
        block.render(area, buf);

        let days = self.weather.map(|w| w.next_days(3)).unwrap_or(&[]);
        if days.is_empty() {
            Paragraph::new(Span::styled("No forecast", Theme::dim())).render(inner, buf);
            return;
        }

        let lines: Vec<Line> = days
            .iter()
            .map(|d| {
                Line::from(vec![
                    Span::styled(d.date.format("%a %d/%m ").to_string(), Theme::dim()),
                    Span::raw(format!("{} ", d.condition.symbol())),
                    Span::styled(
                        format!("{:.0}°", d.temp_min),
                        Style::default().fg(Theme::temp_color(d.temp_min)),
                    ),
                    Span::styled("/", Theme::dim()),
                    Span::styled(
                        format!("{:.0}°C", d.temp_max),
                        Style::default().fg(Theme::temp_color(d.temp_max)),
                    ),
                    Span::styled(
                        format!("  rain {:.0}%", d.rain_chance),
                        Style::default().fg(Theme::WATER),
                    ),
                    Span::styled(
                        format!("  UV {:.0}", d.uv_index),
                        Style::default().fg(Theme::uv_color(d.uv_index)),
                    ),
                ])
            })
            .collect();

        Paragraph::new(lines).render(inner, buf);
    }

    fn render_alerts(&self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .title(Span::styled(
                format!("Plant Alerts ({})", self.alerts.len()),
                Theme::header(),
            ))
            .borders(Borders::ALL)
            .border_style(Theme::border());

        let inner = block.inner(area);
        block.render(area, buf);

        if self.alerts.is_empty() {
            let msg = if self.weather.is_some() {
                "All plants are comfortable"
            } else {
                "No weather, no alerts"
            };
            Paragraph::new(Span::styled(msg, Theme::dim())).render(inner, buf);
            return;
        }

        let items: Vec<ListItem> = self
            .alerts
            .iter()
            .map(|a| {
                let level_style = Style::default().fg(a.level.color());
                let title_line = Line::from(vec![
                    Span::styled(format!("{} ", a.level.symbol()), level_style),
                    Span::styled(self.plant_name(&a.plant_id).to_string(), Theme::header()),
                ]);
                let message_line = Line::from(vec![
                    Span::raw("  "),
                    Span::styled(a.message.as_str(), level_style),
                ]);
                ListItem::new(vec![title_line, message_line])
            })
            .collect();

        List::new(items).render(inner, buf);
    }

    fn render_waterings(&self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .title(Span::styled("Next Waterings", Theme::header()))
            .borders(Borders::ALL)
            .border_style(Theme::border());

        let inner = block.inner(area);
        block.render(area, buf);

        if self.schedules.is_empty() {
            Paragraph::new(Span::styled("No plants yet", Theme::dim())).render(inner, buf);
            return;
        }

        let mut upcoming: Vec<&(&Plant, WateringSchedule)> = self.schedules.iter().collect();
        upcoming.sort_by_key(|(_, s)| s.next_date);

        let items: Vec<ListItem> = upcoming
            .iter()
            .map(|(plant, schedule)| {
                let mut spans = vec![
                    Span::styled(
                        format!("{:<12}", schedule.status_label()),
                        Theme::due_style(schedule.days_remaining),
                    ),
                    Span::styled(plant.common_name.as_str(), Theme::normal()),
                ];
                if schedule.adjusted {
                    spans.push(Span::styled(" *", Theme::highlight()));
                }
                ListItem::new(Line::from(spans))
            })
            .collect();

        List::new(items).render(inner, buf);
    }

    fn render_status_message(&self, area: Rect, buf: &mut Buffer) {
        if let Some(msg) = self.status_message {
            let style = if msg.contains("failed") || msg.contains("unavailable") {
                Theme::warning()
            } else {
                Theme::success()
            };
            Paragraph::new(Span::styled(msg, style)).render(area, buf);
        } else if let Some(n) = self.notification {
            let line = Line::from(vec![
                Span::styled(
                    format!("{} {}: ", n.level.symbol(), n.title),
                    Style::default().fg(n.level.color()),
                ),
                Span::styled(n.body.as_str(), Theme::normal()),
            ]);
            Paragraph::new(line).render(area, buf);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AlertLevel, SunTolerance};
    use chrono::Utc;

    fn buffer_text(buf: &Buffer) -> String {
        let area = buf.area;
        let mut out = String::new();
        for y in area.top()..area.bottom() {
            for x in area.left()..area.right() {
                out.push_str(buf[(x, y)].symbol());
            }
            out.push('\n');
        }
        out
    }

    #[test]
    fn renders_without_weather() {
        let mut profile = UserProfile::new("Ana");
        let plant = Plant::new("Pothos", "Epipremnum aureum", 5, SunTolerance::Partial, 15.0, 32.0)
            .with_id("p1")
            .with_last_watered(Utc::now());
        profile.plants.push(plant.clone());

        let schedule = crate::logic::compute_schedule(&plant, None, Utc::now());
        let schedules = vec![(&plant, schedule)];
        let alerts = vec![Alert::new(AlertLevel::Warning, "Strong sun: avoid direct rays.", "p1")];

        let area = Rect::new(0, 0, 100, 30);
        let mut buf = Buffer::empty(area);
        DashboardScreen::new(&profile, None, &alerts, &schedules).render(area, &mut buf);

        let text = buffer_text(&buf);
        assert!(text.contains("Ana's garden"));
        assert!(text.contains("Weather unavailable"));
        assert!(text.contains("Strong sun"));
        assert!(text.contains("Pothos"));
        assert!(text.contains("[3]Agenda"));
    }
}
