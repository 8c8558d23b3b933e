use crate::api::models::Event;
use crate::app::state::{AppState, Remote};
use crate::ui::theme::Theme;
use crate::ui::views::{
    capacity_gauge, format_date, format_time, hint_line, price_span, render_message,
};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};

/// What the viewer can do with this event.
fn actions(state: &AppState, event: &Event) -> Vec<(&'static str, &'static str)> {
    let mut keys = Vec::new();
    if state.rsvp_for(&event.id).is_some() {
        keys.push(("t", "view ticket"));
        keys.push(("c", "cancel RSVP"));
    } else if !event.is_full() {
        keys.push(("r", "RSVP"));
    }
    if state.is_organizer(event) {
        keys.push(("e", "edit"));
        keys.push(("d", "delete"));
    }
    keys.push(("Esc", "back"));
    keys
}

pub fn render(frame: &mut Frame, area: Rect, state: &AppState) {
    let event = match &state.detail {
        Remote::Ready(event) => event,
        Remote::Failed(_) => {
            render_message(
                frame,
                area,
                state,
                "Event Not Found. The event may have been removed. Press Enter to browse events.",
                false,
            );
            return;
        }
        Remote::Idle | Remote::Loading => {
            render_message(frame, area, state, "Loading event...", true);
            return;
        }
    };
    let cfg = &state.config.ui;

    let [top, gauge_area, body, hints] = Layout::vertical([
        Constraint::Length(3),
        Constraint::Length(1),
        Constraint::Min(4),
        Constraint::Length(1),
    ])
    .areas(area);

    let header = vec![
        Line::from(vec![
            Span::styled(event.title.clone(), Theme::heading()),
            Span::styled(format!("  [{}]", event.category), Theme::muted()),
        ]),
        Line::from(vec![
            Span::styled("Organized by ", Theme::muted()),
            Span::styled(event.organizer.name.clone(), Theme::text()),
        ]),
    ];
    frame.render_widget(Paragraph::new(header), top);
    frame.render_widget(capacity_gauge(event), gauge_area);

    let [info, side] = Layout::horizontal([Constraint::Percentage(65), Constraint::Percentage(35)])
        .spacing(2)
        .areas(body);

    let same_day = event.starts_at.date() == event.ends_at.date();
    let when = if same_day {
        format!(
            "{}, {} - {}",
            format_date(cfg, event.starts_at),
            format_time(cfg, event.starts_at),
            format_time(cfg, event.ends_at)
        )
    } else {
        format!(
            "{} {} to {} {}",
            format_date(cfg, event.starts_at),
            format_time(cfg, event.starts_at),
            format_date(cfg, event.ends_at),
            format_time(cfg, event.ends_at)
        )
    };

    let mut lines = vec![
        Line::from(vec![
            Span::styled("When   ", Theme::muted()),
            Span::styled(when, Theme::text()),
        ]),
        Line::from(vec![
            Span::styled("Where  ", Theme::muted()),
            Span::styled(event.location.clone(), Theme::text()),
        ]),
    ];
    if !event.tags.is_empty() {
        let tags: Vec<String> = event.tags.iter().map(|t| format!("#{}", t)).collect();
        lines.push(Line::from(vec![
            Span::styled("Tags   ", Theme::muted()),
            Span::styled(tags.join(" "), Style::default().fg(Theme::ACCENT_PURPLE)),
        ]));
    }
    lines.push(Line::default());
    lines.push(Line::from(Span::styled("About this event", Theme::title())));
    lines.push(Line::from(Span::styled(event.description.clone(), Theme::text())));
    frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: true }), info);

    let mut panel = vec![
        Line::from(Span::styled("Price", Theme::muted())),
        Line::from(price_span(event)),
        Line::default(),
        Line::from(Span::styled("Availability", Theme::muted())),
        Line::from(Span::styled(
            format!("{} spots remaining", event.available_spots()),
            Theme::text(),
        )),
        Line::default(),
    ];
    if let Some(rsvp) = state.rsvp_for(&event.id) {
        panel.push(Line::from(Span::styled("✔ You're attending!", Theme::success())));
        panel.push(Line::from(Span::styled(
            format!("Ticket {}", rsvp.ticket_number),
            Theme::secondary(),
        )));
    } else if event.is_full() {
        panel.push(Line::from(Span::styled("This event is full", Theme::error())));
    } else if !state.is_authenticated() {
        panel.push(Line::from(Span::styled("Log in to RSVP", Theme::secondary())));
    }
    if state.is_organizer(event) {
        panel.push(Line::default());
        panel.push(Line::from(Span::styled("You are the organizer", Theme::info())));
    }
    let block = Block::default()
        .borders(Borders::LEFT)
        .border_style(Theme::border());
    frame.render_widget(Paragraph::new(panel).block(block), side);

    frame.render_widget(Paragraph::new(hint_line(&actions(state, event))), hints);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::models::PublicUser;
    use crate::api::seed::seed_events;
    use crate::config::AppConfig;
    use crate::session::Session;

    #[test]
    fn test_actions_for_organizer_and_full_event() {
        let session = Session {
            token: "t".into(),
            user: PublicUser {
                id: "2".into(),
                name: "Jane Smith".into(),
                email: "jane@example.com".into(),
                avatar_url: String::new(),
            },
        };
        let state = AppState::new(AppConfig::default(), Some(session));
        let events = seed_events();

        let keys: Vec<&str> = actions(&state, &events[1]).iter().map(|(k, _)| *k).collect();
        assert_eq!(keys, vec!["r", "e", "d", "Esc"]);

        let mut full = events[0].clone();
        full.attendee_count = full.capacity;
        let keys: Vec<&str> = actions(&state, &full).iter().map(|(k, _)| *k).collect();
        assert_eq!(keys, vec!["Esc"]);
    }
}
