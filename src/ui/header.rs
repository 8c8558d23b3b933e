use crate::app::route::Route;
use crate::app::state::AppState;
use crate::ui::theme::Theme;
use ratatui::prelude::*;
use ratatui::widgets::Paragraph;
use unicode_width::UnicodeWidthStr;

/// Navigation entries: label and whether the current route belongs to it.
fn nav_items(route: &Route) -> [(&'static str, bool); 4] {
    [
        ("Home", matches!(route, Route::Home)),
        (
            "Events",
            matches!(route, Route::Events { .. } | Route::EventDetail(_) | Route::Rsvp(_)),
        ),
        ("Create", matches!(route, Route::CreateEvent | Route::EditEvent(_))),
        ("Dashboard", matches!(route, Route::Dashboard | Route::Ticket(_))),
    ]
}

pub fn render(frame: &mut Frame, area: Rect, state: &AppState) {
    let bg = Theme::header();

    let mut left = vec![Span::styled(
        " ◆ eventdeck ",
        Style::default()
            .fg(Theme::ACCENT_TEAL)
            .bg(Theme::BG_ELEVATED)
            .add_modifier(Modifier::BOLD),
    )];
    left.push(Span::styled("│", Style::default().fg(Theme::BORDER_DIM).bg(Theme::BG_ELEVATED)));

    for (label, active) in nav_items(&state.route) {
        let style = if active {
            Style::default()
                .fg(Theme::ACCENT_AMBER)
                .bg(Theme::BG_ELEVATED)
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
        } else {
            Style::default().fg(Theme::TEXT_SECONDARY).bg(Theme::BG_ELEVATED)
        };
        left.push(Span::styled(format!(" {} ", label), style));
    }

    let right = match &state.user {
        Some(user) => vec![
            Span::styled("● ", Style::default().fg(Theme::ACCENT_GREEN).bg(Theme::BG_ELEVATED)),
            Span::styled(
                format!("{} ", user.name),
                Style::default().fg(Theme::TEXT_PRIMARY).bg(Theme::BG_ELEVATED),
            ),
        ],
        None => vec![Span::styled(
            "Login · Register ",
            Style::default().fg(Theme::TEXT_SECONDARY).bg(Theme::BG_ELEVATED),
        )],
    };

    // Pad between the nav and the user badge
    let used: usize = left
        .iter()
        .chain(right.iter())
        .map(|s| s.content.width())
        .sum();
    let gap = (area.width as usize).saturating_sub(used);
    left.push(Span::styled(" ".repeat(gap), bg));
    left.extend(right);

    frame.render_widget(Paragraph::new(Line::from(left)).style(bg), area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nav_highlights_section() {
        let active: Vec<&str> = nav_items(&Route::Ticket("r".into()))
            .iter()
            .filter(|(_, on)| *on)
            .map(|(label, _)| *label)
            .collect();
        assert_eq!(active, vec!["Dashboard"]);
        assert!(nav_items(&Route::Login).iter().all(|(_, on)| !on));
    }
}
