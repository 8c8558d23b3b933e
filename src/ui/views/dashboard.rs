use crate::app::state::{AppState, DashboardTab};
use crate::ui::theme::Theme;
use crate::ui::views::{format_short_date, hint_line, price_span, truncate};
use chrono::{Local, NaiveDateTime};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Tabs};

/// RSVP'd events that have not started yet.
fn upcoming_rsvps(state: &AppState, now: NaiveDateTime) -> usize {
    state
        .rsvp_events()
        .iter()
        .filter(|(_, event)| event.starts_at > now)
        .count()
}

fn stat_card<'a>(title: &'a str, value: usize, caption: &'a str, color: Color) -> Paragraph<'a> {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(Theme::border_type())
        .border_style(Style::default().fg(color));
    Paragraph::new(vec![
        Line::from(Span::styled(title, Style::default().fg(color).add_modifier(Modifier::BOLD))),
        Line::from(Span::styled(value.to_string(), Theme::title())),
        Line::from(Span::styled(caption, Theme::muted())),
    ])
    .block(block)
}

pub fn render(frame: &mut Frame, area: Rect, state: &AppState) {
    let [welcome, stats, tabs_area, list_area, hints] = Layout::vertical([
        Constraint::Length(2),
        Constraint::Length(5),
        Constraint::Length(2),
        Constraint::Min(3),
        Constraint::Length(1),
    ])
    .areas(area);

    let name = state.user.as_ref().map(|u| u.name.as_str()).unwrap_or("there");
    frame.render_widget(
        Paragraph::new(Line::from(vec![
            Span::styled(format!("Welcome back, {}!", name), Theme::heading()),
            Span::styled("  Manage your events and RSVPs", Theme::secondary()),
        ])),
        welcome,
    );

    let cards: [Rect; 3] = Layout::horizontal([Constraint::Ratio(1, 3); 3])
        .spacing(1)
        .areas(stats);
    let now = Local::now().naive_local();
    frame.render_widget(
        stat_card(
            "My Events",
            state.user_events.len(),
            "Events you've organized",
            Theme::ACCENT_TEAL,
        ),
        cards[0],
    );
    frame.render_widget(
        stat_card(
            "My RSVPs",
            state.user_rsvps.len(),
            "Events you're attending",
            Theme::ACCENT_PURPLE,
        ),
        cards[1],
    );
    frame.render_widget(
        stat_card(
            "Upcoming",
            upcoming_rsvps(state, now),
            "Events coming soon",
            Theme::ACCENT_AMBER,
        ),
        cards[2],
    );

    let selected_tab = match state.dashboard_tab {
        DashboardTab::MyEvents => 0,
        DashboardTab::MyRsvps => 1,
    };
    let tabs = Tabs::new(vec!["My Events", "My RSVPs"])
        .select(selected_tab)
        .style(Theme::secondary())
        .highlight_style(Theme::key_hint().add_modifier(Modifier::UNDERLINED))
        .divider("│");
    frame.render_widget(tabs, tabs_area);

    let width = list_area.width as usize;
    let (items, empty, keys): (Vec<ListItem>, &str, &[(&str, &str)]) = match state.dashboard_tab {
        DashboardTab::MyEvents => (
            state
                .user_events
                .iter()
                .map(|event| {
                    ListItem::new(Line::from(vec![
                        Span::styled(format!("{:<34}", truncate(&event.title, 32)), Theme::text()),
                        Span::styled(
                            format!("{:<14}", format_short_date(&state.config.ui, event.starts_at)),
                            Theme::secondary(),
                        ),
                        Span::styled(
                            format!("{:>5}/{:<6}", event.attendee_count, event.capacity),
                            Style::default().fg(Theme::capacity(event.fill_percent())),
                        ),
                        price_span(event),
                    ]))
                })
                .collect(),
            "You haven't created any events yet. Press n to create your first event.",
            &[
                ("Enter", "view"),
                ("e", "edit"),
                ("d", "delete"),
                ("n", "new event"),
                ("Tab", "switch tab"),
            ],
        ),
        DashboardTab::MyRsvps => (
            state
                .rsvp_events()
                .iter()
                .map(|(rsvp, event)| {
                    ListItem::new(Line::from(vec![
                        Span::styled(format!("{:<34}", truncate(&event.title, 32)), Theme::text()),
                        Span::styled(
                            format!("{:<14}", format_short_date(&state.config.ui, event.starts_at)),
                            Theme::secondary(),
                        ),
                        Span::styled(
                            format!(
                                "{:<20}",
                                truncate(&event.location, width.saturating_sub(70).max(10))
                            ),
                            Theme::muted(),
                        ),
                        Span::styled(rsvp.ticket_number.clone(), Theme::key_hint()),
                    ]))
                })
                .collect(),
            "You haven't RSVP'd to any events yet. Browse events with /events.",
            &[
                ("Enter", "ticket"),
                ("v", "view event"),
                ("c", "cancel RSVP"),
                ("n", "new event"),
                ("Tab", "switch tab"),
            ],
        ),
    };

    frame.render_widget(Paragraph::new(hint_line(keys)), hints);

    if items.is_empty() {
        frame.render_widget(Paragraph::new(Span::styled(empty, Theme::muted())), list_area);
        return;
    }
    let len = items.len();
    let list = List::new(items)
        .highlight_style(Theme::selected())
        .highlight_symbol("▶ ");
    let mut list_state = ListState::default().with_selected(Some(state.selected.min(len - 1)));
    frame.render_stateful_widget(list, list_area, &mut list_state);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::models::{Rsvp, RsvpDetails, RsvpStatus};
    use crate::api::seed::seed_events;
    use crate::config::AppConfig;
    use chrono::{NaiveDate, Utc};

    #[test]
    fn test_upcoming_counts_future_events() {
        let mut state = AppState::new(AppConfig::default(), None);
        state.events = seed_events();
        for (id, event_id) in [("r1", "1"), ("r2", "2")] {
            state.user_rsvps.push(Rsvp {
                id: id.into(),
                event_id: event_id.into(),
                user_id: "2".into(),
                status: RsvpStatus::Confirmed,
                ticket_number: "TCKT-100000".into(),
                created_at: Utc::now(),
                details: RsvpDetails::default(),
            });
        }
        let now = NaiveDate::from_ymd_opt(2025, 6, 1)
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .unwrap();
        assert_eq!(upcoming_rsvps(&state, now), 1);
    }
}
