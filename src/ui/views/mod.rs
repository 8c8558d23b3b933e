//! One module per route. Shared formatting helpers live here.

mod dashboard;
mod detail;
mod events;
mod forms;
mod home;
mod not_found;
mod ticket;

use crate::api::models::Event;
use crate::app::route::Route;
use crate::app::state::AppState;
use crate::config::model::UiConfig;
use crate::ui::status_bar::spinner_frame;
use crate::ui::theme::Theme;
use chrono::NaiveDateTime;
use ratatui::prelude::*;
use ratatui::widgets::block::Padding;
use ratatui::widgets::{Block, Borders, Gauge, Paragraph};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

pub fn render(frame: &mut Frame, area: Rect, state: &AppState) {
    let block = view_block(state.route.title());
    let inner = block.inner(area);
    frame.render_widget(block, area);

    match &state.route {
        Route::Home => home::render(frame, inner, state),
        Route::Events { .. } => events::render(frame, inner, state),
        Route::EventDetail(_) => detail::render(frame, inner, state),
        Route::CreateEvent | Route::EditEvent(_) => forms::render_event_form(frame, inner, state),
        Route::Rsvp(_) => forms::render_rsvp(frame, inner, state),
        Route::Ticket(_) => ticket::render(frame, inner, state),
        Route::Dashboard => dashboard::render(frame, inner, state),
        Route::Login => forms::render_login(frame, inner, state),
        Route::Register => forms::render_register(frame, inner, state),
        Route::Profile => forms::render_profile(frame, inner, state),
        Route::NotFound(path) => not_found::render(frame, inner, path),
    }
}

fn view_block(title: &str) -> Block<'_> {
    Block::default()
        .title(format!(" {} ", title))
        .title_style(Theme::title())
        .borders(Borders::ALL)
        .border_type(Theme::border_type())
        .border_style(Theme::border())
        .padding(Padding::new(2, 2, 1, 0))
        .style(Theme::panel_bg())
}

pub(crate) fn format_date(cfg: &UiConfig, at: NaiveDateTime) -> String {
    at.format(&cfg.date_format).to_string()
}

pub(crate) fn format_short_date(cfg: &UiConfig, at: NaiveDateTime) -> String {
    at.format(&cfg.short_date_format).to_string()
}

pub(crate) fn format_time(cfg: &UiConfig, at: NaiveDateTime) -> String {
    at.format(&cfg.time_format).to_string()
}

pub(crate) fn format_price(price: f64) -> String {
    if price <= 0.0 {
        "Free".to_string()
    } else {
        format!("${:.2}", price)
    }
}

pub(crate) fn price_span(event: &Event) -> Span<'static> {
    if event.is_free() {
        Span::styled("Free", Theme::free())
    } else {
        Span::styled(format_price(event.price), Theme::price())
    }
}

pub(crate) fn spots_label(event: &Event) -> String {
    match event.available_spots() {
        0 => "Sold out".to_string(),
        1 => "1 spot left".to_string(),
        n => format!("{} spots left", n),
    }
}

/// Capacity bar coloured by how full the event is.
pub(crate) fn capacity_gauge(event: &Event) -> Gauge<'static> {
    let pct = event.fill_percent();
    Gauge::default()
        .gauge_style(Style::default().fg(Theme::capacity(pct)).bg(Theme::BG_ELEVATED))
        .percent(pct)
        .label(format!(
            "{}/{} attending ({}%)",
            event.attendee_count, event.capacity, pct
        ))
}

/// Centred one-line message, with a spinner while `loading`.
pub(crate) fn render_message(
    frame: &mut Frame,
    area: Rect,
    state: &AppState,
    text: &str,
    loading: bool,
) {
    let line = if loading {
        Line::from(vec![
            Span::styled(format!("{} ", spinner_frame(state.tick_count)), Theme::key_hint()),
            Span::styled(text.to_string(), Theme::secondary()),
        ])
    } else {
        Line::from(Span::styled(text.to_string(), Theme::secondary()))
    };
    let y = area.y + area.height / 3;
    if y < area.bottom() {
        frame.render_widget(
            Paragraph::new(line).alignment(Alignment::Center),
            Rect::new(area.x, y, area.width, 1),
        );
    }
}

/// `key label` pairs rendered as a hint line.
pub(crate) fn hint_line(pairs: &[(&str, &str)]) -> Line<'static> {
    let mut spans = Vec::new();
    for (key, label) in pairs {
        spans.push(Span::styled(key.to_string(), Theme::key_hint()));
        spans.push(Span::styled(format!(" {}  ", label), Theme::secondary()));
    }
    Line::from(spans)
}

pub(crate) fn truncate(text: &str, max: usize) -> String {
    if text.width() <= max {
        return text.to_string();
    }
    let mut out = String::new();
    let mut width = 0;
    for c in text.chars() {
        let w = c.width().unwrap_or(0);
        if width + w > max.saturating_sub(1) {
            out.push('…');
            return out;
        }
        width += w;
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::seed::seed_events;

    #[test]
    fn test_formats() {
        let cfg = UiConfig::default();
        let events = seed_events();
        let event = &events[0];
        assert_eq!(format_date(&cfg, event.starts_at), "Saturday, March 15, 2025");
        assert_eq!(format_short_date(&cfg, event.starts_at), "Mar 15, 2025");
        assert_eq!(format_time(&cfg, event.starts_at), "9:00 AM");
        assert_eq!(format_price(0.0), "Free");
        assert_eq!(format_price(149.5), "$149.50");
    }

    #[test]
    fn test_spots_label() {
        let mut event = seed_events()[3].clone();
        assert_eq!(spots_label(&event), "8 spots left");
        event.attendee_count = 49;
        assert_eq!(spots_label(&event), "1 spot left");
        event.attendee_count = 50;
        assert_eq!(spots_label(&event), "Sold out");
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("Wellness Retreat", 40), "Wellness Retreat");
        assert_eq!(truncate("Wellness Retreat", 6), "Welln…");
        assert_eq!(truncate("Music", 5), "Music");
    }
}
