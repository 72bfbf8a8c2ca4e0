use crate::ui::Theme;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
};

/// Single-line text entry with a block cursor at the end.
pub struct InputWidget<'a> {
    label: &'a str,
    value: &'a str,
    placeholder: Option<&'a str>,
    focused: bool,
}

impl<'a> InputWidget<'a> {
    pub fn new(label: &'a str, value: &'a str) -> Self {
        Self {
            label,
            value,
            placeholder: None,
            focused: false,
        }
    }

    pub fn focused(mut self, focused: bool) -> Self {
        self.focused = focused;
        self
    }

    pub fn placeholder(mut self, hint: &'a str) -> Self {
        self.placeholder = Some(hint);
        self
    }
}

impl Widget for InputWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let border_style = if self.focused {
            Theme::border_focused()
        } else {
            Theme::border()
        };

        let block = Block::default()
            .title(self.label)
            .borders(Borders::ALL)
            .border_style(border_style);

        let inner = block.inner(area);
        block.render(area, buf);

        let mut spans = Vec::new();
        if self.value.is_empty() {
            if let Some(hint) = self.placeholder {
                if !self.focused {
                    spans.push(Span::styled(hint, Theme::dim()));
                }
            }
        } else {
            spans.push(Span::styled(self.value, Theme::normal()));
        }
        if self.focused {
            spans.push(Span::styled(" ", Theme::selected()));
            if self.value.is_empty() {
                if let Some(hint) = self.placeholder {
                    spans.push(Span::styled(format!(" {}", hint), Theme::dim()));
                }
            }
        }

        Paragraph::new(Line::from(spans)).render(inner, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(buf: &Buffer, y: u16, width: u16) -> String {
        (1..width - 1).map(|x| buf[(x, y)].symbol().to_string()).collect()
    }

    #[test]
    fn shows_value() {
        let area = Rect::new(0, 0, 20, 3);
        let mut buf = Buffer::empty(area);
        InputWidget::new("Plant", "fern").focused(true).render(area, &mut buf);
        assert!(row(&buf, 1, 20).starts_with("fern"));
    }

    #[test]
    fn shows_placeholder_when_empty() {
        let area = Rect::new(0, 0, 20, 3);
        let mut buf = Buffer::empty(area);
        InputWidget::new("Plant", "")
            .placeholder("e.g. pothos")
            .render(area, &mut buf);
        assert!(row(&buf, 1, 20).starts_with("e.g. pothos"));
    }
}
