use crate::ui::theme::Theme;
use crate::ui::views::hint_line;
use ratatui::prelude::*;
use ratatui::widgets::Paragraph;

pub fn render(frame: &mut Frame, area: Rect, path: &str) {
    let lines = vec![
        Line::default(),
        Line::from(Span::styled(
            "404",
            Style::default().fg(Theme::ACCENT_RED).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled("Page Not Found", Theme::heading())),
        Line::default(),
        Line::from(Span::styled(
            format!("Nothing lives at {}", path),
            Theme::secondary(),
        )),
        Line::default(),
        hint_line(&[("Enter", "go home"), ("e", "browse events")]),
    ];
    frame.render_widget(Paragraph::new(lines).alignment(Alignment::Center), area);
}
