use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::BorderType;

pub struct Theme;

impl Theme {
    pub const BG_DARK: Color = Color::Rgb(16, 18, 24);
    pub const BG_SURFACE: Color = Color::Rgb(24, 27, 36);
    pub const BG_ELEVATED: Color = Color::Rgb(34, 38, 50);

    pub const TEXT_PRIMARY: Color = Color::Rgb(226, 228, 236);
    pub const TEXT_SECONDARY: Color = Color::Rgb(150, 156, 175);
    pub const TEXT_MUTED: Color = Color::Rgb(96, 102, 120);

    pub const BORDER_DIM: Color = Color::Rgb(60, 66, 84);

    pub const ACCENT_TEAL: Color = Color::Rgb(72, 200, 190);
    pub const ACCENT_AMBER: Color = Color::Rgb(240, 180, 70);
    pub const ACCENT_GREEN: Color = Color::Rgb(110, 210, 120);
    pub const ACCENT_ORANGE: Color = Color::Rgb(245, 140, 60);
    pub const ACCENT_RED: Color = Color::Rgb(235, 90, 90);
    pub const ACCENT_PURPLE: Color = Color::Rgb(170, 130, 240);

    pub fn border() -> Style {
        Style::default().fg(Self::BORDER_DIM)
    }

    pub fn border_focused() -> Style {
        Style::default().fg(Self::ACCENT_TEAL)
    }

    pub fn border_type() -> BorderType {
        BorderType::Plain
    }

    pub fn border_type_focused() -> BorderType {
        BorderType::Rounded
    }

    pub fn panel_bg() -> Style {
        Style::default().bg(Self::BG_SURFACE)
    }

    pub fn panel_bg_focused() -> Style {
        Style::default().bg(Self::BG_ELEVATED)
    }

    pub fn title() -> Style {
        Style::default()
            .fg(Self::TEXT_PRIMARY)
            .add_modifier(Modifier::BOLD)
    }

    pub fn heading() -> Style {
        Style::default()
            .fg(Self::ACCENT_TEAL)
            .add_modifier(Modifier::BOLD)
    }

    pub fn text() -> Style {
        Style::default().fg(Self::TEXT_PRIMARY)
    }

    pub fn secondary() -> Style {
        Style::default().fg(Self::TEXT_SECONDARY)
    }

    pub fn muted() -> Style {
        Style::default().fg(Self::TEXT_MUTED)
    }

    pub fn key_hint() -> Style {
        Style::default()
            .fg(Self::ACCENT_AMBER)
            .add_modifier(Modifier::BOLD)
    }

    pub fn selected() -> Style {
        Style::default()
            .fg(Self::BG_DARK)
            .bg(Self::ACCENT_TEAL)
            .add_modifier(Modifier::BOLD)
    }

    pub fn price() -> Style {
        Style::default().fg(Self::ACCENT_AMBER)
    }

    pub fn free() -> Style {
        Style::default()
            .fg(Self::ACCENT_GREEN)
            .add_modifier(Modifier::BOLD)
    }

    pub fn success() -> Style {
        Style::default().fg(Self::ACCENT_GREEN)
    }

    pub fn error() -> Style {
        Style::default().fg(Self::ACCENT_RED)
    }

    pub fn info() -> Style {
        Style::default().fg(Self::ACCENT_TEAL)
    }

    pub fn input_text() -> Style {
        Style::default().fg(Self::TEXT_PRIMARY)
    }

    pub fn status_bar() -> Style {
        Style::default().fg(Self::TEXT_PRIMARY).bg(Self::BG_ELEVATED)
    }

    pub fn header() -> Style {
        Style::default().bg(Self::BG_ELEVATED)
    }

    /// Capacity bar colour: red from 90%, orange from 70%, green below.
    pub fn capacity(percent: u16) -> Color {
        if percent >= 90 {
            Self::ACCENT_RED
        } else if percent >= 70 {
            Self::ACCENT_ORANGE
        } else {
            Self::ACCENT_GREEN
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capacity_thresholds() {
        assert_eq!(Theme::capacity(95), Theme::ACCENT_RED);
        assert_eq!(Theme::capacity(90), Theme::ACCENT_RED);
        assert_eq!(Theme::capacity(84), Theme::ACCENT_ORANGE);
        assert_eq!(Theme::capacity(70), Theme::ACCENT_ORANGE);
        assert_eq!(Theme::capacity(69), Theme::ACCENT_GREEN);
    }
}
