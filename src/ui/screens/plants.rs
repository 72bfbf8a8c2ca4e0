use crate::logic::calculations::recent_intervals;
use crate::models::{is_safe_url, Alert, Plant, WateringSchedule};
use crate::ui::components::{nav_bar, InputWidget};
use crate::ui::Theme;
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph, Widget, Wrap},
};

pub struct PlantsScreen<'a> {
    pub schedules: &'a [(&'a Plant, WateringSchedule)],
    pub alerts: &'a [Alert],
    pub selected_index: usize,
    pub input: Option<&'a str>,
    pub suggestions: &'a [&'static str],
}

impl<'a> PlantsScreen<'a> {
    pub fn new(schedules: &'a [(&'a Plant, WateringSchedule)], alerts: &'a [Alert]) -> Self {
        Self {
            schedules,
            alerts,
            selected_index: 0,
            input: None,
            suggestions: &[],
        }
    }

    pub fn with_selection(mut self, index: usize) -> Self {
        self.selected_index = index;
        self
    }

    /// Show the add-plant prompt with the current buffer.
    pub fn adding(mut self, input: Option<&'a str>, suggestions: &'a [&'static str]) -> Self {
        self.input = input;
        self.suggestions = suggestions;
        self
    }
}

impl Widget for PlantsScreen<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let input_height = if self.input.is_some() { 4 } else { 0 };
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),            // Title
                Constraint::Min(10),              // Content
                Constraint::Length(input_height), // Add prompt
                Constraint::Length(1),            // Nav
            ])
            .split(area);

        let title = Line::from(vec![
            Span::styled("Plants", Theme::title()),
            Span::styled(format!(" ({})", self.schedules.len()), Theme::dim()),
        ]);
        Paragraph::new(title).render(chunks[0], buf);

        let content = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
            .split(chunks[1]);

        self.render_list(content[0], buf);
        self.render_details(content[1], buf);

        if let Some(value) = self.input {
            self.render_input(chunks[2], buf, value);
        }

        let nav = if self.input.is_some() {
            Line::from(vec![
                Span::styled("[Enter]", Theme::nav_key()),
                Span::styled("Add ", Theme::nav_label()),
                Span::styled("[Esc]", Theme::nav_key()),
                Span::styled("Cancel", Theme::nav_label()),
            ])
        } else {
            nav_bar(&[
                ("↑↓", "Select"),
                ("a", "Add"),
                ("w", "Water"),
                ("d", "Remove"),
                ("e", "Export .ics"),
            ])
        };
        Paragraph::new(nav).render(chunks[3], buf);
    }
}

impl PlantsScreen<'_> {
    fn render_list(&self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .title("Garden")
            .borders(Borders::ALL)
            .border_style(Theme::border());

        let inner = block.inner(area);
        block.render(area, buf);

        if self.schedules.is_empty() {
            Paragraph::new(Span::styled("No plants yet - press 'a' to add one", Theme::dim()))
                .wrap(Wrap { trim: true })
                .render(inner, buf);
            return;
        }

        let items: Vec<ListItem> = self
            .schedules
            .iter()
            .enumerate()
            .map(|(i, (plant, schedule))| {
                let style = if i == self.selected_index {
                    Theme::selected()
                } else {
                    Style::default()
                };

                let worst = self
                    .alerts
                    .iter()
                    .filter(|a| a.plant_id == plant.id)
                    .map(|a| a.level)
                    .max();

                let mut spans = vec![Span::styled(plant.common_name.as_str(), Theme::normal())];
                if let Some(level) = worst {
                    spans.push(Span::styled(
                        format!(" {}", level.symbol()),
                        Style::default().fg(level.color()),
                    ));
                }
                spans.push(Span::raw("  "));
                spans.push(Span::styled(
                    schedule.status_label(),
                    Theme::due_style(schedule.days_remaining),
                ));

                ListItem::new(Line::from(spans)).style(style)
            })
            .collect();

        List::new(items).render(inner, buf);
    }

    fn render_details(&self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .title("Details")
            .borders(Borders::ALL)
            .border_style(Theme::border());

        let inner = block.inner(area);
        block.render(area, buf);

        let Some((plant, schedule)) = self.schedules.get(self.selected_index) else {
            Paragraph::new(Span::styled("Select a plant to view details", Theme::dim()))
                .render(inner, buf);
            return;
        };

        let mut lines = vec![
            Line::from(vec![
                Span::styled(plant.common_name.as_str(), Theme::header()),
                Span::styled(format!("  {}", plant.scientific_name), Theme::dim()),
            ]),
            Line::from(vec![]),
            Line::from(vec![
                Span::styled("Category: ", Theme::dim()),
                Span::styled(plant.category.as_deref().unwrap_or("-"), Theme::normal()),
                Span::styled("  Light: ", Theme::dim()),
                Span::styled(plant.sun_tolerance.as_str(), Theme::normal()),
            ]),
            Line::from(vec![
                Span::styled("Comfort: ", Theme::dim()),
                Span::styled(
                    format!("{:.0}°C to {:.0}°C", plant.min_temp, plant.max_temp),
                    Theme::normal(),
                ),
                Span::styled("  Every ", Theme::dim()),
                Span::styled(
                    format!("{} day(s)", plant.watering_frequency_days),
                    Theme::normal(),
                ),
            ]),
            Line::from(vec![]),
            Line::from(vec![
                Span::styled("Next watering: ", Theme::dim()),
                Span::styled(
                    schedule
                        .next_date
                        .with_timezone(&chrono::Local)
                        .format("%a %d %b")
                        .to_string(),
                    Theme::highlight(),
                ),
                Span::styled(
                    format!("  ({})", schedule.status_label()),
                    Theme::due_style(schedule.days_remaining),
                ),
            ]),
            Line::from(vec![
                Span::styled("Why: ", Theme::dim()),
                Span::styled(
                    schedule.reason.as_str(),
                    if schedule.adjusted {
                        Theme::highlight()
                    } else {
                        Theme::normal()
                    },
                ),
            ]),
        ];

        if let Some(url) = plant.image_url.as_deref().filter(|u| is_safe_url(u)) {
            lines.push(Line::from(vec![
                Span::styled("Photo: ", Theme::dim()),
                Span::styled(url, Theme::normal()),
            ]));
        }

        let intervals = recent_intervals(plant);
        if !intervals.is_empty() {
            let text: Vec<String> = intervals.iter().map(|d| format!("{}d", d)).collect();
            lines.push(Line::from(vec![
                Span::styled("Recent intervals: ", Theme::dim()),
                Span::styled(text.join(" > "), Style::default().fg(Theme::WATER)),
            ]));
        }

        let alerts: Vec<&Alert> = self
            .alerts
            .iter()
            .filter(|a| a.plant_id == plant.id)
            .collect();
        if !alerts.is_empty() {
            lines.push(Line::from(vec![]));
            lines.push(Line::from(vec![Span::styled("Alerts:", Theme::dim())]));
            for alert in alerts {
                lines.push(Line::from(vec![
                    Span::styled(
                        format!("  {} ", alert.level.symbol()),
                        Style::default().fg(alert.level.color()),
                    ),
                    Span::styled(
                        alert.message.as_str(),
                        Style::default().fg(alert.level.color()),
                    ),
                ]));
            }
        }

        if !plant.care_tips.is_empty() {
            lines.push(Line::from(vec![]));
            lines.push(Line::from(vec![Span::styled("Care tips:", Theme::dim())]));
            for tip in &plant.care_tips {
                lines.push(Line::from(vec![Span::styled(
                    format!("  - {}", tip),
                    Theme::normal(),
                )]));
            }
        }

        Paragraph::new(lines)
            .wrap(Wrap { trim: true })
            .render(inner, buf);
    }

    fn render_input(&self, area: Rect, buf: &mut Buffer, value: &str) {
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(3), Constraint::Length(1)])
            .split(area);

        InputWidget::new("Add plant", value)
            .placeholder("common or scientific name")
            .focused(true)
            .render(rows[0], buf);

        let hint = format!("Known: {}", self.suggestions.join(", "));
        Paragraph::new(Span::styled(hint, Theme::dim())).render(rows[1], buf);
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
    fn renders_selected_plant_details() {
        let plant = Plant::new("Jade Plant", "Crassula ovata", 14, SunTolerance::FullSun, 5.0, 35.0)
            .with_id("jade")
            .with_category("Suculenta")
            .with_care_tips(&["Let the soil dry out."])
            .with_last_watered(Utc::now());
        let schedule = crate::logic::compute_schedule(&plant, None, Utc::now());
        let schedules = vec![(&plant, schedule)];
        let alerts = vec![Alert::new(
            AlertLevel::Danger,
            "Protect from rain now! Rot risk.",
            "jade",
        )];

        let area = Rect::new(0, 0, 120, 30);
        let mut buf = Buffer::empty(area);
        PlantsScreen::new(&schedules, &alerts).render(area, &mut buf);

        let text = buffer_text(&buf);
        assert!(text.contains("Crassula ovata"));
        assert!(text.contains("standard schedule"));
        assert!(text.contains("Rot risk"));
        assert!(text.contains("Let the soil dry out."));
        assert!(text.contains("[w]Water"));
    }

    #[test]
    fn only_web_photo_links_are_shown() {
        let now = Utc::now();
        let mut web = Plant::new("Pothos", "Epipremnum aureum", 5, SunTolerance::Partial, 15.0, 32.0)
            .with_last_watered(now);
        web.image_url = Some("https://example.com/pothos.png".into());
        let mut camera = web.clone();
        camera.image_url = Some("data:image/jpeg;base64,AAAA".into());

        for (plant, shown) in [(&web, true), (&camera, false)] {
            let schedules = vec![(plant, crate::logic::compute_schedule(plant, None, now))];
            let area = Rect::new(0, 0, 120, 30);
            let mut buf = Buffer::empty(area);
            PlantsScreen::new(&schedules, &[]).render(area, &mut buf);
            let text = buffer_text(&buf);
            assert_eq!(text.contains("Photo:"), shown);
            assert!(!text.contains("data:image"));
        }
    }

    #[test]
    fn add_prompt_replaces_nav() {
        let schedules: Vec<(&Plant, WateringSchedule)> = Vec::new();
        let area = Rect::new(0, 0, 80, 20);
        let mut buf = Buffer::empty(area);
        PlantsScreen::new(&schedules, &[])
            .adding(Some("fer"), &["Boston Fern"])
            .render(area, &mut buf);

        let text = buffer_text(&buf);
        assert!(text.contains("Add plant"));
        assert!(text.contains("Known: Boston Fern"));
        assert!(text.contains("[Enter]Add"));
    }
}
