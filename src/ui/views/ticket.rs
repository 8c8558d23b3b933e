use crate::app::state::{AppState, Remote};
use crate::ui::layout::centered;
use crate::ui::theme::Theme;
use crate::ui::views::{format_date, format_price, format_time, hint_line, render_message};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Paragraph};

pub fn render(frame: &mut Frame, area: Rect, state: &AppState) {
    let ticket = match &state.ticket {
        Remote::Ready(ticket) => ticket,
        Remote::Failed(reason) => {
            let text = format!("Ticket Not Found. {} Press Enter for your dashboard.", reason);
            render_message(frame, area, state, &text, false);
            return;
        }
        Remote::Idle | Remote::Loading => {
            render_message(frame, area, state, "Loading ticket...", true);
            return;
        }
    };
    let cfg = &state.config.ui;
    let (rsvp, event) = (&ticket.rsvp, &ticket.event);

    let card = centered(area, 62, 18);
    let block = Block::default()
        .title(" 🎟  Event Ticket ")
        .title_style(Theme::heading())
        .borders(Borders::ALL)
        .border_type(Theme::border_type_focused())
        .border_style(Style::default().fg(Theme::ACCENT_TEAL))
        .style(Style::default().bg(Theme::BG_ELEVATED));

    let row = |label: &str, value: String| {
        Line::from(vec![
            Span::styled(format!(" {:<12}", label), Theme::muted()),
            Span::styled(value, Theme::text()),
        ])
    };

    let guests = match rsvp.details.additional_guests {
        0 => "Just you".to_string(),
        1 => "You + 1 guest".to_string(),
        n => format!("You + {} guests", n),
    };

    let mut lines = vec![
        Line::from(Span::styled(format!(" {}", event.title), Theme::title())),
        Line::default(),
        Line::from(vec![
            Span::styled(" Ticket No.  ", Theme::muted()),
            Span::styled(rsvp.ticket_number.clone(), Theme::key_hint()),
        ]),
        Line::from(vec![
            Span::styled(" Status      ", Theme::muted()),
            Span::styled(rsvp.status.to_string(), Theme::success()),
        ]),
        row("Date", format_date(cfg, event.starts_at)),
        row(
            "Time",
            format!("{} - {}", format_time(cfg, event.starts_at), format_time(cfg, event.ends_at)),
        ),
        row("Location", event.location.clone()),
        row("Price", format_price(event.price)),
        Line::from(Span::styled(" ┄".repeat(20), Style::default().fg(Theme::BORDER_DIM))),
        row("Attendee", rsvp.details.name.clone()),
        row("Email", rsvp.details.email.clone()),
        row("Guests", guests),
    ];
    if !rsvp.details.phone.is_empty() {
        lines.push(row("Phone", rsvp.details.phone.clone()));
    }
    if !rsvp.details.special_requests.is_empty() {
        lines.push(row("Requests", rsvp.details.special_requests.clone()));
    }
    lines.push(row(
        "Booked",
        rsvp.created_at.format("%b %-d, %Y %H:%M UTC").to_string(),
    ));

    frame.render_widget(Paragraph::new(lines).block(block), card);

    let hints_area = Rect::new(area.x, area.bottom().saturating_sub(1), area.width, 1);
    frame.render_widget(
        Paragraph::new(hint_line(&[
            ("v", "view event"),
            ("c", "cancel RSVP"),
            ("d", "dashboard"),
            ("Esc", "back"),
        ])),
        hints_area,
    );
}
