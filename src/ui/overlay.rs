//! Popups drawn over the current view: toasts, the confirmation modal and
//! the help screen.

use crate::app::commands::HELP_LINES;
use crate::app::state::*;
use crate::ui::layout::centered;
use crate::ui::theme::Theme;
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};
use unicode_width::UnicodeWidthStr;

const TOAST_WIDTH: u16 = 44;
const MAX_TOASTS: usize = 4;

pub fn render_toasts(frame: &mut Frame, area: Rect, state: &AppState) {
    let width = TOAST_WIDTH.min(area.width);
    let mut y = area.y;

    // Newest first
    for toast in state.toasts.iter().rev().take(MAX_TOASTS) {
        let (icon, style) = match toast.kind {
            ToastKind::Success => ("✔", Theme::success()),
            ToastKind::Error => ("✖", Theme::error()),
            ToastKind::Info => ("ℹ", Theme::info()),
        };
        let text_width = toast.message.width() as u16 + 4;
        let lines = text_width.div_ceil(width.saturating_sub(2).max(1));
        let height = lines + 2;
        if y + height > area.bottom() {
            break;
        }

        let rect = Rect::new(area.right().saturating_sub(width + 1), y, width, height);
        frame.render_widget(Clear, rect);
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(Theme::border_type_focused())
            .border_style(style)
            .style(Style::default().bg(Theme::BG_SURFACE));
        let body = Paragraph::new(Line::from(vec![
            Span::styled(format!("{} ", icon), style.add_modifier(Modifier::BOLD)),
            Span::styled(toast.message.as_str(), Theme::text()),
        ]))
        .wrap(Wrap { trim: true })
        .block(block);
        frame.render_widget(body, rect);
        y += height;
    }
}

pub fn render_confirm(frame: &mut Frame, area: Rect, confirm: &Confirm) {
    let (title, question) = match confirm {
        Confirm::DeleteEvent { title, .. } => (
            " Delete Event ",
            format!(
                "Are you sure you want to delete \"{}\"? This action cannot be undone.",
                title
            ),
        ),
        Confirm::CancelRsvp { title, .. } => (
            " Cancel RSVP ",
            format!("Are you sure you want to cancel your RSVP for \"{}\"?", title),
        ),
    };

    let popup = centered(area, 56, 8);
    frame.render_widget(Clear, popup);
    let block = Block::default()
        .title(title)
        .title_style(Style::default().fg(Theme::ACCENT_RED).add_modifier(Modifier::BOLD))
        .borders(Borders::ALL)
        .border_type(Theme::border_type_focused())
        .border_style(Style::default().fg(Theme::ACCENT_RED))
        .style(Style::default().bg(Theme::BG_SURFACE));

    let lines = vec![
        Line::from(Span::styled(question, Theme::text())),
        Line::default(),
        Line::from(vec![
            Span::styled(" y", Theme::key_hint()),
            Span::styled(" Confirm   ", Theme::secondary()),
            Span::styled("n/Esc", Theme::key_hint()),
            Span::styled(" Keep it", Theme::secondary()),
        ]),
    ];
    frame.render_widget(
        Paragraph::new(lines).wrap(Wrap { trim: true }).block(block),
        popup,
    );
}

/// Keys per view, shown above the command list.
const KEY_LINES: &[(&str, &str)] = &[
    ("↑↓ / j k", "move selection"),
    ("Enter", "open / submit"),
    ("Esc", "back"),
    ("Tab", "next field or tab"),
    ("←→", "page (events), cycle choice (forms)"),
    ("s c x", "sort, category, clear filters (events)"),
    ("r t c", "RSVP, ticket, cancel RSVP (event)"),
    ("e d", "edit, delete (your events)"),
    ("n", "new event (dashboard)"),
    ("Ctrl+T", "switch profile tab"),
];

pub fn render_help(frame: &mut Frame, area: Rect) {
    let height = (KEY_LINES.len() + HELP_LINES.len() + 6) as u16;
    let popup = centered(area, 64, height);
    frame.render_widget(Clear, popup);

    let block = Block::default()
        .title(" Help · any key to close ")
        .title_style(Theme::title())
        .borders(Borders::ALL)
        .border_type(Theme::border_type_focused())
        .border_style(Style::default().fg(Theme::ACCENT_TEAL))
        .style(Style::default().bg(Theme::BG_SURFACE));

    let mut lines = vec![Line::from(Span::styled("Keys", Theme::heading()))];
    for (keys, what) in KEY_LINES {
        lines.push(Line::from(vec![
            Span::styled(format!("  {:<10}", keys), Theme::key_hint()),
            Span::styled(*what, Theme::secondary()),
        ]));
    }
    lines.push(Line::default());
    lines.push(Line::from(Span::styled("Commands", Theme::heading())));
    for line in HELP_LINES {
        lines.push(Line::from(Span::styled(format!("  {}", line), Theme::text())));
    }

    frame.render_widget(Paragraph::new(lines).block(block), popup);
}
