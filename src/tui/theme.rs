// Colour palette for the TUI

use crate::logging::LogLevel;
use ratatui::style::{Color, Modifier, Style};

#[derive(Debug, Clone)]
pub struct Theme {
    pub fg: Color,
    pub muted: Color,
    pub border: Color,
    pub border_focused: Color,
    pub title: Color,
    pub highlight: Color,
    pub selected_bg: Color,
    pub key: Color,
    pub error_bg: Color,
    pub success_bg: Color,
    pub banner_fg: Color,
    pub private_ip: Color,
    pub public_ip: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self::dark()
    }
}

impl Theme {
    pub fn dark() -> Self {
        Self {
            fg: Color::White,
            muted: Color::DarkGray,
            border: Color::Gray,
            border_focused: Color::Cyan,
            title: Color::Cyan,
            highlight: Color::Yellow,
            selected_bg: Color::Rgb(40, 44, 52),
            key: Color::Cyan,
            error_bg: Color::Red,
            success_bg: Color::Green,
            banner_fg: Color::Black,
            private_ip: Color::Blue,
            public_ip: Color::LightRed,
        }
    }

    pub fn title_style(&self) -> Style {
        Style::default().fg(self.title).add_modifier(Modifier::BOLD)
    }

    pub fn selected_style(&self) -> Style {
        Style::default()
            .bg(self.selected_bg)
            .add_modifier(Modifier::BOLD)
    }

    pub fn log_level(&self, level: LogLevel) -> Color {
        match level {
            LogLevel::Error => Color::Red,
            LogLevel::Warn => Color::Yellow,
            LogLevel::Info => Color::Green,
            LogLevel::Debug => Color::Blue,
            LogLevel::Trace => self.muted,
        }
    }
}
