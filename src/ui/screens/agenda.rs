use crate::logic::calculations::{Agenda, AgendaEntry, DayActivity, StatusCounts};
use crate::ui::components::nav_bar;
use crate::ui::Theme;
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
};

const BAR_WIDTH: usize = 20;

pub struct AgendaScreen<'a> {
    pub agenda: &'a Agenda<'a>,
    pub status: StatusCounts,
    pub activity: &'a [DayActivity],
}

impl<'a> AgendaScreen<'a> {
    pub fn new(agenda: &'a Agenda<'a>, status: StatusCounts, activity: &'a [DayActivity]) -> Self {
        Self {
            agenda,
            status,
            activity,
        }
    }
}

impl Widget for AgendaScreen<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1), // Title
                Constraint::Min(10),   // Content
                Constraint::Length(1), // Nav
            ])
            .split(area);

        Paragraph::new(Span::styled("Watering Agenda", Theme::title())).render(chunks[0], buf);

        let content = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
            .split(chunks[1]);

        self.render_agenda(content[0], buf);

        let stats = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(5), Constraint::Min(9)])
            .split(content[1]);
        self.render_status(stats[0], buf);
        self.render_activity(stats[1], buf);

        Paragraph::new(nav_bar(&[("r", "Refresh")])).render(chunks[2], buf);
    }
}

impl AgendaScreen<'_> {
    fn render_agenda(&self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .title("Upcoming")
            .borders(Borders::ALL)
            .border_style(Theme::border());

        let inner = block.inner(area);
        block.render(area, buf);

        if self.agenda.is_empty() {
            Paragraph::new(Span::styled("Nothing to water", Theme::dim())).render(inner, buf);
            return;
        }

        let mut lines = Vec::new();
        section(&mut lines, "Today", &self.agenda.today, Theme::warning());
        section(&mut lines, "This week", &self.agenda.this_week, Theme::highlight());
        section(&mut lines, "Later", &self.agenda.later, Theme::success());

        Paragraph::new(lines).render(inner, buf);
    }

    fn render_status(&self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .title("Status")
            .borders(Borders::ALL)
            .border_style(Theme::border());

        let inner = block.inner(area);
        block.render(area, buf);

        let lines = vec![
            Line::from(vec![
                Span::styled("On time: ", Theme::dim()),
                Span::styled(self.status.on_time.to_string(), Theme::success()),
                Span::styled("  Late: ", Theme::dim()),
                Span::styled(
                    self.status.late.to_string(),
                    if self.status.late > 0 {
                        Theme::error()
                    } else {
                        Theme::normal()
                    },
                ),
            ]),
            Line::from(vec![Span::styled(
                format!("{:.0}% on schedule", self.status.on_time_ratio() * 100.0),
                Theme::normal(),
            )]),
        ];
        Paragraph::new(lines).render(inner, buf);
    }

    fn render_activity(&self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .title("Waterings, last 7 days")
            .borders(Borders::ALL)
            .border_style(Theme::border());

        let inner = block.inner(area);
        block.render(area, buf);

        let max = self.activity.iter().map(|d| d.count).max().unwrap_or(0).max(1);
        let lines: Vec<Line> = self
            .activity
            .iter()
            .map(|day| {
                let filled = day.count * BAR_WIDTH / max;
                Line::from(vec![
                    Span::styled(format!("{} ", day.label()), Theme::dim()),
                    Span::styled("█".repeat(filled), Style::default().fg(Theme::WATER)),
                    Span::styled(format!(" {}", day.count), Theme::normal()),
                ])
            })
            .collect();
        Paragraph::new(lines).render(inner, buf);
    }
}

fn section<'a>(lines: &mut Vec<Line<'a>>, title: &'a str, entries: &'a [AgendaEntry<'a>], style: Style) {
    if entries.is_empty() {
        return;
    }
    if !lines.is_empty() {
        lines.push(Line::from(vec![]));
    }
    lines.push(Line::from(vec![Span::styled(
        format!("{} ({})", title, entries.len()),
        style,
    )]));
    for entry in entries {
        lines.push(Line::from(vec![
            Span::styled(
                format!(
                    "  {:<10}",
                    entry
                        .schedule
                        .next_date
                        .with_timezone(&chrono::Local)
                        .format("%a %d/%m")
                ),
                Theme::dim(),
            ),
            Span::styled(entry.plant.common_name.as_str(), Theme::normal()),
            Span::styled(
                format!("  {}", entry.schedule.status_label()),
                Theme::due_style(entry.schedule.days_remaining),
            ),
            Span::styled(
                if entry.schedule.adjusted {
                    format!("  {}", entry.schedule.reason)
                } else {
                    String::new()
                },
                Theme::dim(),
            ),
        ]));
    }
}
