use crate::app::state::*;
use crate::ui::theme::Theme;
use ratatui::prelude::*;
use ratatui::widgets::Paragraph;
use unicode_width::UnicodeWidthStr;

const SPINNER: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

pub fn spinner_frame(tick: u64) -> &'static str {
    SPINNER[(tick % SPINNER.len() as u64) as usize]
}

pub fn render(frame: &mut Frame, area: Rect, state: &AppState) {
    let mut parts: Vec<Span> = Vec::new();

    // Current path
    parts.push(Span::styled(
        format!(" {} ", state.route.to_path()),
        Style::default().fg(Theme::BG_DARK).bg(Theme::ACCENT_TEAL),
    ));

    if state.is_loading() {
        parts.push(Span::styled(
            format!(" {} Loading... ", spinner_frame(state.tick_count)),
            Style::default().fg(Theme::ACCENT_AMBER).bg(Theme::BG_ELEVATED),
        ));
    }

    parts.push(Span::styled(
        format!(" {} ", state.status_line()),
        Theme::status_bar(),
    ));

    let hint = match state.focus {
        Focus::Command => "Enter run · Esc cancel",
        Focus::View => "/ command · ? help · Ctrl+C quit",
    };
    // Pad to fill remaining space
    let used: usize = parts.iter().map(|s| s.content.width()).sum();
    let remaining = (area.width as usize).saturating_sub(used + hint.width() + 2);
    parts.push(Span::styled(" ".repeat(remaining), Theme::status_bar()));
    parts.push(Span::styled(
        format!(" {} ", hint),
        Style::default().fg(Theme::TEXT_SECONDARY).bg(Theme::BG_ELEVATED),
    ));

    frame.render_widget(Paragraph::new(Line::from(parts)), area);
}
