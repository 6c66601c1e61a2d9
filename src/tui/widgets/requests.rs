use ratatui::{
    layout::Rect,
    style::Modifier,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, List, ListItem, ListState, Paragraph},
    Frame,
};

use crate::models::{Category, PrayerRequest};
use crate::tui::theme::Theme;
use crate::utils::format::{format_short, truncate};

pub fn render(
    frame: &mut Frame,
    area: Rect,
    theme: &Theme,
    requests: &[&PrayerRequest],
    selected: usize,
    empty_message: &str,
) {
    let block = Block::default()
        .title(Span::styled(" Requests ", theme.accent()))
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(theme.border(true))
        .style(theme.surface());

    if requests.is_empty() {
        let text = vec![
            Line::from(""),
            Line::from(Span::styled(format!("  {}", empty_message), theme.dim())),
        ];
        frame.render_widget(Paragraph::new(text).block(block), area);
        return;
    }

    // borders + "  " prefix
    let width = area.width.saturating_sub(6) as usize;

    let items: Vec<ListItem> = requests
        .iter()
        .map(|r| {
            let title = Line::from(vec![
                Span::styled(format!("{} ", r.status.icon()), theme.status(r.status)),
                Span::styled(r.member_name.clone(), theme.bold()),
                Span::styled(
                    if r.is_highlighted() { " ★" } else { "" },
                    theme.category(Category::Praise),
                ),
                Span::styled(
                    format!("  {} {}", r.category.icon(), r.category.display_name()),
                    theme.category(r.category),
                ),
                Span::styled(format!("  · {}", format_short(&r.date_added)), theme.dim()),
            ]);
            let details = Line::from(Span::raw(format!("   {}", truncate(&r.details, width))));
            ListItem::new(vec![title, details])
        })
        .collect();

    let list = List::new(items)
        .block(block)
        .highlight_style(theme.accent().add_modifier(Modifier::REVERSED))
        .highlight_symbol("▌");

    let mut state = ListState::default();
    state.select(Some(selected.min(requests.len() - 1)));
    frame.render_stateful_widget(list, area, &mut state);
}
