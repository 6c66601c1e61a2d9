use ratatui::style::{Color, Modifier, Style};

use crate::models::{Category, RequestStatus};

/// Colour palette for one of the two display modes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Theme {
    pub bg: Color,
    pub surface: Color,
    pub border: Color,
    pub border_focus: Color,
    pub text: Color,
    pub text_dim: Color,
    pub accent: Color,
    pub praying: Color,
    pub answered: Color,
    pub archived: Color,
    pub praise: Color,
    pub red: Color,
}

impl Theme {
    pub fn light() -> Self {
        Self {
            bg: Color::Rgb(246, 244, 239),
            surface: Color::Rgb(255, 253, 248),
            border: Color::Rgb(214, 206, 190),
            border_focus: Color::Rgb(96, 120, 180),
            text: Color::Rgb(40, 38, 34),
            text_dim: Color::Rgb(120, 114, 102),
            accent: Color::Rgb(96, 120, 180),
            praying: Color::Rgb(70, 110, 190),
            answered: Color::Rgb(60, 140, 80),
            archived: Color::Rgb(130, 124, 112),
            praise: Color::Rgb(196, 140, 40),
            red: Color::Rgb(180, 60, 50),
        }
    }

    pub fn dark() -> Self {
        Self {
            bg: Color::Rgb(18, 18, 24),
            surface: Color::Rgb(28, 28, 36),
            border: Color::Rgb(52, 52, 66),
            border_focus: Color::Rgb(140, 160, 220),
            text: Color::Rgb(226, 224, 232),
            text_dim: Color::Rgb(124, 122, 138),
            accent: Color::Rgb(140, 160, 220),
            praying: Color::Rgb(120, 150, 230),
            answered: Color::Rgb(92, 168, 110),
            archived: Color::Rgb(120, 118, 130),
            praise: Color::Rgb(222, 176, 74),
            red: Color::Rgb(210, 96, 80),
        }
    }

    pub fn for_mode(dark: bool) -> Self {
        if dark { Self::dark() } else { Self::light() }
    }

    pub fn base(&self) -> Style {
        Style::default().fg(self.text).bg(self.bg)
    }

    pub fn surface(&self) -> Style {
        Style::default().fg(self.text).bg(self.surface)
    }

    pub fn dim(&self) -> Style {
        Style::default().fg(self.text_dim)
    }

    pub fn accent(&self) -> Style {
        Style::default().fg(self.accent)
    }

    pub fn bold(&self) -> Style {
        Style::default().fg(self.text).add_modifier(Modifier::BOLD)
    }

    pub fn red(&self) -> Style {
        Style::default().fg(self.red)
    }

    pub fn border(&self, focused: bool) -> Style {
        if focused {
            Style::default().fg(self.border_focus)
        } else {
            Style::default().fg(self.border)
        }
    }

    pub fn status(&self, status: RequestStatus) -> Style {
        let color = match status {
            RequestStatus::Praying => self.praying,
            RequestStatus::Answered => self.answered,
            RequestStatus::Archived => self.archived,
        };
        Style::default().fg(color)
    }

    pub fn category(&self, category: Category) -> Style {
        match category {
            Category::Praise => Style::default().fg(self.praise),
            _ => self.dim(),
        }
    }
}
