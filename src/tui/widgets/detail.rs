use ratatui::{
    layout::Rect,
    style::Modifier,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph, Wrap},
    Frame,
};

use crate::models::PrayerRequest;
use crate::tui::theme::Theme;
use crate::utils::format::format_short;

pub fn render(frame: &mut Frame, area: Rect, theme: &Theme, request: Option<&PrayerRequest>) {
    let block = Block::default()
        .title(Span::styled(" Details ", theme.accent()))
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(theme.border(false))
        .style(theme.surface());

    let Some(r) = request else {
        frame.render_widget(Paragraph::new("").block(block), area);
        return;
    };

    let mut lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            format!(" {}", r.member_name),
            theme.bold().add_modifier(Modifier::BOLD),
        )),
        Line::from(vec![
            Span::styled(
                format!(" {} {}", r.category.icon(), r.category.display_name()),
                theme.category(r.category),
            ),
            Span::styled("  ·  ", theme.dim()),
            Span::styled(format!("{} {}", r.status.icon(), r.status), theme.status(r.status)),
        ]),
        Line::from(""),
        Line::from(Span::raw(format!(" {}", r.details))),
    ];

    if let Some(notes) = &r.notes {
        lines.push(Line::from(""));
        lines.push(Line::from(vec![
            Span::styled(" Notes: ", theme.bold()),
            Span::styled(notes.clone(), theme.dim()),
        ]));
    }

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        format!(" Added {}", format_short(&r.date_added)),
        theme.dim(),
    )));
    if let Some(answered) = &r.answer_date {
        lines.push(Line::from(Span::styled(
            format!(" Answered {}", format_short(answered)),
            theme.status(r.status),
        )));
    }
    lines.push(Line::from(Span::styled(format!(" {}", r.id), theme.dim())));

    let paragraph = Paragraph::new(lines).block(block).wrap(Wrap { trim: false });
    frame.render_widget(paragraph, area);
}
