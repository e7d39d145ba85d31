//! Color palettes for the light and dark themes

use ratatui::style::{Color, Modifier, Style};

use crate::Theme;

/// Colors every widget draws with
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub background: Color,
    pub text: Color,
    pub muted: Color,
    pub accent: Color,
    pub border: Color,
    pub focus: Color,
    pub error: Color,
    pub success: Color,
    pub warning: Color,
    pub selection: Color,
}

impl Palette {
    pub fn for_theme(theme: Theme) -> Self {
        match theme {
            Theme::Light => Self {
                background: Color::White,
                text: Color::Black,
                muted: Color::DarkGray,
                accent: Color::Blue,
                border: Color::Gray,
                focus: Color::Magenta,
                error: Color::Red,
                success: Color::Green,
                warning: Color::Rgb(180, 110, 0),
                selection: Color::Rgb(200, 220, 255),
            },
            Theme::Dark => Self {
                background: Color::Black,
                text: Color::White,
                muted: Color::Gray,
                accent: Color::Cyan,
                border: Color::DarkGray,
                focus: Color::Yellow,
                error: Color::LightRed,
                success: Color::LightGreen,
                warning: Color::Yellow,
                selection: Color::Rgb(40, 60, 90),
            },
        }
    }

    /// Base style for a screen area
    pub fn base(&self) -> Style {
        Style::default().fg(self.text).bg(self.background)
    }

    pub fn title(&self) -> Style {
        Style::default()
            .fg(self.accent)
            .add_modifier(Modifier::BOLD)
    }

    pub fn border_style(&self, focused: bool) -> Style {
        if focused {
            Style::default()
                .fg(self.focus)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(self.border)
        }
    }

    pub fn selected(&self) -> Style {
        Style::default()
            .fg(self.text)
            .bg(self.selection)
            .add_modifier(Modifier::BOLD)
    }
}
