use crate::ui::Theme;
use ratatui::text::{Line, Span};

/// Bottom key bar: screen switches first, then the screen's own actions.
pub fn nav_bar<'a>(actions: &[(&'a str, &'a str)]) -> Line<'a> {
    let mut spans = vec![
        Span::styled("[1]", Theme::nav_key()),
        Span::styled("Dashboard ", Theme::nav_label()),
        Span::styled("[2]", Theme::nav_key()),
        Span::styled("Plants ", Theme::nav_label()),
        Span::styled("[3]", Theme::nav_key()),
        Span::styled("Agenda ", Theme::nav_label()),
    ];

    for (key, label) in actions {
        spans.push(Span::styled(format!("[{}]", key), Theme::nav_key()));
        spans.push(Span::styled(format!("{} ", label), Theme::nav_label()));
    }

    spans.push(Span::styled("[q]", Theme::nav_key()));
    spans.push(Span::styled("Quit", Theme::nav_label()));
    Line::from(spans)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn includes_screen_actions() {
        let line = nav_bar(&[("r", "Refresh")]);
        let text: String = line.spans.iter().map(|s| s.content.as_ref()).collect();
        assert_eq!(text, "[1]Dashboard [2]Plants [3]Agenda [r]Refresh [q]Quit");
    }
}
