use ratatui::{
    layout::{Alignment, Rect},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::tui::theme::Theme;

pub fn render(frame: &mut Frame, area: Rect, theme: &Theme, flash: Option<&str>) {
    if let Some(message) = flash {
        let paragraph = Paragraph::new(Span::styled(message, theme.accent()))
            .alignment(Alignment::Center);
        frame.render_widget(paragraph, area);
        return;
    }

    let hints = [
        ("[←→]", " tab  "),
        ("[/]", " search  "),
        ("[c]", " category  "),
        ("[m]", " member  "),
        ("[p/a/x]", " status  "),
        ("[D]", " delete  "),
        ("[t]", " theme  "),
        ("[?]", " help  "),
        ("[Esc]", " quit"),
    ];

    let mut spans = Vec::new();
    for (key, label) in &hints {
        spans.push(Span::styled(*key, theme.accent()));
        spans.push(Span::styled(*label, theme.dim()));
    }

    let paragraph = Paragraph::new(Line::from(spans)).alignment(Alignment::Center);
    frame.render_widget(paragraph, area);
}
