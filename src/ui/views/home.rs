use crate::app::state::{AppState, UPCOMING_LIMIT};
use crate::catalog::{self, CATEGORY_TILES};
use crate::ui::theme::Theme;
use crate::ui::views::{
    format_short_date, hint_line, price_span, render_message, spots_label, truncate,
};
use chrono::Local;
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};

pub fn render(frame: &mut Frame, area: Rect, state: &AppState) {
    let [hero, body, hints] = Layout::vertical([
        Constraint::Length(3),
        Constraint::Min(6),
        Constraint::Length(1),
    ])
    .areas(area);

    let hero_lines = vec![
        Line::from(Span::styled("Discover Amazing Events", Theme::heading())),
        Line::from(Span::styled(
            "Find and join events that match your interests, \
             from tech conferences to music festivals.",
            Theme::secondary(),
        )),
    ];
    frame.render_widget(Paragraph::new(hero_lines).wrap(Wrap { trim: true }), hero);

    frame.render_widget(
        Paragraph::new(hint_line(&[
            ("↑↓", "select"),
            ("Enter", "open"),
            ("e", "browse all"),
            ("s", "search"),
        ])),
        hints,
    );

    if !state.events_loaded {
        render_message(frame, body, state, "Loading events...", state.is_loading());
        return;
    }

    let [left, right] =
        Layout::horizontal([Constraint::Percentage(65), Constraint::Percentage(35)])
            .spacing(2)
            .areas(body);

    let now = Local::now().naive_local();
    let featured = catalog::featured(&state.events);
    let upcoming = catalog::upcoming(&state.events, now, UPCOMING_LIMIT);
    let mut index = 0;
    let width = left.width as usize;

    let mut lines = vec![Line::from(Span::styled("★ Featured Event", Theme::heading()))];
    match featured {
        Some(event) => {
            let selected = state.selected == index;
            index += 1;
            let title_style = if selected { Theme::selected() } else { Theme::title() };
            lines.push(Line::from(Span::styled(
                format!(" {} ", truncate(&event.title, width.saturating_sub(2))),
                title_style,
            )));
            lines.push(Line::from(vec![
                Span::styled(
                    format!(
                        " {} · {} · ",
                        format_short_date(&state.config.ui, event.starts_at),
                        event.location
                    ),
                    Theme::secondary(),
                ),
                price_span(event),
            ]));
            lines.push(Line::from(Span::styled(
                format!(" {}", truncate(&event.description, width.saturating_sub(2))),
                Theme::muted(),
            )));
        }
        None => lines.push(Line::from(Span::styled(" No events yet", Theme::muted()))),
    }

    lines.push(Line::default());
    lines.push(Line::from(Span::styled("Upcoming Events", Theme::heading())));
    if upcoming.is_empty() {
        lines.push(Line::from(Span::styled(" No upcoming events", Theme::muted())));
    }
    for event in &upcoming {
        let selected = state.selected == index;
        index += 1;
        let marker = if selected { "▶ " } else { "  " };
        let title_style = if selected { Theme::selected() } else { Theme::text() };
        lines.push(Line::from(vec![
            Span::styled(marker, Theme::key_hint()),
            Span::styled(truncate(&event.title, 32), title_style),
            Span::styled(
                format!("  {}  ", format_short_date(&state.config.ui, event.starts_at)),
                Theme::secondary(),
            ),
            price_span(event),
            Span::styled(format!("  {}", spots_label(event)), Theme::muted()),
        ]));
    }
    frame.render_widget(Paragraph::new(lines), left);

    let block = Block::default()
        .title(" Browse by Category ")
        .title_style(Theme::title())
        .borders(Borders::ALL)
        .border_type(Theme::border_type())
        .border_style(Theme::border());
    let mut tiles = Vec::new();
    for (name, icon) in CATEGORY_TILES {
        let selected = state.selected == index;
        index += 1;
        let count = state.events.iter().filter(|e| e.category == *name).count();
        let style = if selected { Theme::selected() } else { Theme::text() };
        tiles.push(Line::from(vec![
            Span::raw(format!(" {} ", icon)),
            Span::styled(format!("{:<12}", name), style),
            Span::styled(format!(" {}", count), Theme::muted()),
        ]));
    }
    frame.render_widget(Paragraph::new(tiles).block(block), right);
}
