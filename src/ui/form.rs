use crate::forms::{Field, FieldKind, Form};
use crate::ui::theme::Theme;
use ratatui::prelude::*;
use ratatui::widgets::Paragraph;

const LABEL_WIDTH: u16 = 20;

/// Rows a field occupies: value line plus an optional error line.
fn field_height(field: &Field) -> u16 {
    if field.error.is_some() {
        2
    } else {
        1
    }
}

/// First field to draw so the focused one stays on screen.
fn scroll_start(form: &Form, height: u16) -> usize {
    let mut start = 0;
    loop {
        let used: u16 = form.fields[start..=form.focused.min(form.fields.len() - 1)]
            .iter()
            .map(|f| field_height(f) + 1)
            .sum();
        if used <= height || start >= form.focused {
            return start;
        }
        start += 1;
    }
}

/// Draw a form. The cursor is placed on the focused text field when
/// `active` is set.
pub fn render(frame: &mut Frame, area: Rect, form: &Form, active: bool, submitting: bool) {
    if form.fields.is_empty() || area.height == 0 {
        return;
    }
    let value_x = area.x + LABEL_WIDTH.min(area.width);
    let value_width = area.width.saturating_sub(LABEL_WIDTH + 1);

    let mut y = area.y;
    for (i, field) in form.fields.iter().enumerate().skip(scroll_start(form, area.height)) {
        if y + field_height(field) > area.bottom() {
            break;
        }
        let focused = active && i == form.focused;

        let marker = if field.required { "*" } else { " " };
        let label_style = if focused {
            Style::default().fg(Theme::ACCENT_TEAL).add_modifier(Modifier::BOLD)
        } else {
            Theme::secondary()
        };
        let label = Line::from(vec![
            Span::styled(field.label, label_style),
            Span::styled(marker, Style::default().fg(Theme::ACCENT_RED)),
        ]);
        let label_rect = Rect::new(area.x, y, LABEL_WIDTH.min(area.width), 1);
        frame.render_widget(Paragraph::new(label), label_rect);

        let value_rect = Rect::new(value_x, y, value_width, 1);
        let bg = if focused { Theme::BG_ELEVATED } else { Theme::BG_SURFACE };
        let line = match field.kind {
            FieldKind::Choice(_) => Line::from(vec![
                Span::styled("‹ ", Style::default().fg(Theme::ACCENT_AMBER).bg(bg)),
                Span::styled(
                    field.input.text.as_str(),
                    Style::default().fg(Theme::TEXT_PRIMARY).bg(bg),
                ),
                Span::styled(" ›", Style::default().fg(Theme::ACCENT_AMBER).bg(bg)),
            ]),
            _ if field.input.text.is_empty() => Line::from(Span::styled(
                field.placeholder,
                Style::default().fg(Theme::TEXT_MUTED).bg(bg),
            )),
            _ => Line::from(Span::styled(
                field.display_text(),
                Style::default().fg(Theme::TEXT_PRIMARY).bg(bg),
            )),
        };

        // Scroll long values so the cursor stays visible
        let cursor_col = match field.kind {
            FieldKind::Secret => field.input.text[..field.input.cursor].chars().count(),
            _ => field.input.cursor_col(),
        } as u16;
        let scroll = cursor_col.saturating_sub(value_width.saturating_sub(1));
        frame.render_widget(
            Paragraph::new(line).style(Style::default().bg(bg)).scroll((0, scroll)),
            value_rect,
        );
        if focused && !matches!(field.kind, FieldKind::Choice(_)) && value_width > 0 {
            frame.set_cursor_position((value_x + cursor_col - scroll, y));
        }
        y += 1;

        if let Some(error) = &field.error {
            frame.render_widget(
                Paragraph::new(Span::styled(format!("↳ {}", error), Theme::error())),
                Rect::new(value_x, y, value_width, 1),
            );
            y += 1;
        }
        y += 1;
    }

    if submitting && y < area.bottom() {
        frame.render_widget(
            Paragraph::new(Span::styled("Submitting...", Theme::muted())),
            Rect::new(value_x, y, value_width, 1),
        );
    }
}

/// Key hints shown under a form.
pub fn hints(submit: &str) -> Line<'static> {
    Line::from(vec![
        Span::styled("Tab/↑↓", Theme::key_hint()),
        Span::styled(" field  ", Theme::secondary()),
        Span::styled("Enter", Theme::key_hint()),
        Span::styled(format!(" {}  ", submit), Theme::secondary()),
        Span::styled("Esc", Theme::key_hint()),
        Span::styled(" back", Theme::secondary()),
    ])
}
