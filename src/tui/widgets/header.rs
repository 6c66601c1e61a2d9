use chrono::Local;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::Modifier,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
    Frame,
};

use crate::models::{Category, RequestStats, RequestStatus};
use crate::tui::theme::Theme;

pub fn render(frame: &mut Frame, area: Rect, theme: &Theme, stats: &RequestStats) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(theme.border(true))
        .style(theme.base());
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Length(1), Constraint::Min(0)])
        .split(inner);

    let title = Line::from(vec![
        Span::styled("  ♡ Prayer Tracker", theme.accent().add_modifier(Modifier::BOLD)),
        Span::styled("  ·  Supporting your group through prayer", theme.dim()),
    ]);
    let date = Local::now().format("%A, %b %d, %Y  ").to_string();
    frame.render_widget(Paragraph::new(title), rows[0]);
    frame.render_widget(
        Paragraph::new(Span::styled(date, theme.dim())).alignment(Alignment::Right),
        rows[0],
    );

    let cells = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(1, 4); 4])
        .split(rows[2]);

    let counters = [
        (stats.total, "Total Requests", theme.bold()),
        (stats.praying, "Actively Praying", theme.status(RequestStatus::Praying)),
        (stats.answered, "Answered", theme.status(RequestStatus::Answered)),
        (stats.this_week, "This Week", theme.category(Category::Praise)),
    ];

    for (cell, (count, label, style)) in cells.iter().zip(counters) {
        let text = vec![
            Line::from(Span::styled(count.to_string(), style.add_modifier(Modifier::BOLD))),
            Line::from(Span::styled(label, theme.dim())),
        ];
        frame.render_widget(Paragraph::new(text).alignment(Alignment::Center), *cell);
    }
}
