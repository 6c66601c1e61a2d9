use ratatui::{
    layout::Rect,
    style::Modifier,
    text::{Line, Span},
    widgets::{Block, Borders, Tabs},
    Frame,
};

use crate::tui::theme::Theme;
use crate::views::Tab;

pub fn render(frame: &mut Frame, area: Rect, theme: &Theme, current: Tab, counts: [usize; 5]) {
    let titles: Vec<Line> = Tab::all()
        .iter()
        .zip(counts)
        .enumerate()
        .map(|(i, (tab, count))| {
            Line::from(vec![
                Span::styled(format!("{} ", i + 1), theme.dim()),
                Span::raw(format!("{} ({})", tab.title(), count)),
            ])
        })
        .collect();

    let selected = Tab::all().iter().position(|t| *t == current).unwrap_or(0);

    let tabs = Tabs::new(titles)
        .block(
            Block::default()
                .borders(Borders::BOTTOM)
                .border_style(theme.border(false)),
        )
        .style(theme.dim())
        .highlight_style(theme.accent().add_modifier(Modifier::BOLD | Modifier::UNDERLINED))
        .select(selected)
        .divider(Span::styled(" │ ", theme.dim()));

    frame.render_widget(tabs, area);
}
