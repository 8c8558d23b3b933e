use crate::app::route::Route;
use crate::app::state::{AppState, Focus, ProfileTab, Remote};
use crate::forms::Form;
use crate::ui::form;
use crate::ui::theme::Theme;
use crate::ui::views::{
    capacity_gauge, format_date, format_time, hint_line, price_span, render_message,
};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Paragraph, Tabs, Wrap};

/// Heading, form body and hint line, stacked.
fn render_form_page(
    frame: &mut Frame,
    area: Rect,
    state: &AppState,
    heading: Vec<Line<'static>>,
    form: &Form,
    submit: &str,
) {
    let heading_height = heading.len() as u16 + 1;
    let [head, body, hints] = Layout::vertical([
        Constraint::Length(heading_height),
        Constraint::Min(3),
        Constraint::Length(1),
    ])
    .areas(area);

    frame.render_widget(Paragraph::new(heading).wrap(Wrap { trim: true }), head);
    let active = state.focus == Focus::View && state.confirm.is_none() && !state.help_visible;
    form::render(frame, body, form, active, state.submitting);
    let hint = if form.has_errors() {
        Line::from(Span::styled("Please fix the highlighted fields", Theme::error()))
    } else {
        form::hints(submit)
    };
    frame.render_widget(Paragraph::new(hint), hints);
}

pub fn render_event_form(frame: &mut Frame, area: Rect, state: &AppState) {
    let editing = matches!(state.route, Route::EditEvent(_));
    if editing && state.form.fields.is_empty() {
        let loading = !matches!(state.detail, Remote::Failed(_));
        let text = if loading { "Loading event..." } else { "Event Not Found" };
        render_message(frame, area, state, text, loading);
        return;
    }
    let (title, subtitle, submit) = if editing {
        ("Edit Event", "Update the details of your event.", "update event")
    } else {
        (
            "Create New Event",
            "Fill in the details to create your event. Dates use YYYY-MM-DD HH:MM.",
            "create event",
        )
    };
    let heading = vec![
        Line::from(Span::styled(title, Theme::heading())),
        Line::from(Span::styled(subtitle, Theme::secondary())),
    ];
    render_form_page(frame, area, state, heading, &state.form, submit);
}

pub fn render_rsvp(frame: &mut Frame, area: Rect, state: &AppState) {
    let event = match &state.detail {
        Remote::Ready(event) if !state.form.fields.is_empty() => event,
        Remote::Failed(_) => {
            render_message(frame, area, state, "Event Not Found", false);
            return;
        }
        _ => {
            render_message(frame, area, state, "Loading event...", true);
            return;
        }
    };
    let cfg = &state.config.ui;

    let [main, side] = Layout::horizontal([Constraint::Min(40), Constraint::Length(34)])
        .spacing(2)
        .areas(area);

    let heading = vec![
        Line::from(Span::styled(format!("RSVP for {}", event.title), Theme::heading())),
        Line::from(Span::styled(
            "Complete the form below to reserve your spot.",
            Theme::secondary(),
        )),
    ];
    render_form_page(frame, main, state, heading, &state.form, "confirm RSVP");

    let block = Block::default()
        .title(" Event Summary ")
        .title_style(Theme::title())
        .borders(Borders::ALL)
        .border_type(Theme::border_type())
        .border_style(Theme::border());
    let inner = block.inner(side);
    frame.render_widget(block, side);

    let [info, gauge] = Layout::vertical([Constraint::Min(6), Constraint::Length(1)]).areas(inner);
    let lines = vec![
        Line::from(Span::styled(event.title.clone(), Theme::title())),
        Line::from(Span::styled(format_date(cfg, event.starts_at), Theme::text())),
        Line::from(Span::styled(
            format!("{} - {}", format_time(cfg, event.starts_at), format_time(cfg, event.ends_at)),
            Theme::secondary(),
        )),
        Line::from(Span::styled(event.location.clone(), Theme::secondary())),
        Line::default(),
        Line::from(vec![Span::styled("Price: ", Theme::muted()), price_span(event)]),
        Line::from(Span::styled(
            format!("{} spots remaining", event.available_spots()),
            Theme::text(),
        )),
    ];
    frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: true }), info);
    frame.render_widget(capacity_gauge(event), gauge);
}

pub fn render_login(frame: &mut Frame, area: Rect, state: &AppState) {
    let heading = vec![
        Line::from(Span::styled("Log in to your account", Theme::heading())),
        Line::from(Span::styled(
            "Demo accounts: john@example.com / jane@example.com, password \"password123\"",
            Theme::muted(),
        )),
    ];
    let [body, footer] = Layout::vertical([Constraint::Min(4), Constraint::Length(1)]).areas(area);
    render_form_page(frame, body, state, heading, &state.form, "log in");
    frame.render_widget(
        Paragraph::new(hint_line(&[("Ctrl+R", "create an account instead")])),
        footer,
    );
}

pub fn render_register(frame: &mut Frame, area: Rect, state: &AppState) {
    let heading = vec![
        Line::from(Span::styled("Create your account", Theme::heading())),
        Line::from(Span::styled("Passwords need at least 6 characters.", Theme::muted())),
    ];
    let [body, footer] = Layout::vertical([Constraint::Min(4), Constraint::Length(1)]).areas(area);
    render_form_page(frame, body, state, heading, &state.form, "sign up");
    frame.render_widget(
        Paragraph::new(hint_line(&[("Ctrl+L", "log in instead")])),
        footer,
    );
}

pub fn render_profile(frame: &mut Frame, area: Rect, state: &AppState) {
    let [tabs_area, body, footer] = Layout::vertical([
        Constraint::Length(2),
        Constraint::Min(4),
        Constraint::Length(1),
    ])
    .areas(area);

    let selected = match state.profile_tab {
        ProfileTab::Profile => 0,
        ProfileTab::Password => 1,
    };
    frame.render_widget(
        Tabs::new(vec!["Profile Information", "Change Password"])
            .select(selected)
            .style(Theme::secondary())
            .highlight_style(Theme::key_hint().add_modifier(Modifier::UNDERLINED))
            .divider("│"),
        tabs_area,
    );

    match state.profile_tab {
        ProfileTab::Profile => {
            let email = state.user.as_ref().map(|u| u.email.clone()).unwrap_or_default();
            let heading = vec![
                Line::from(Span::styled("Profile Information", Theme::heading())),
                Line::from(Span::styled(format!("Signed in as {}", email), Theme::muted())),
            ];
            render_form_page(frame, body, state, heading, &state.form, "save changes");
        }
        ProfileTab::Password => {
            let heading = vec![Line::from(Span::styled("Change Password", Theme::heading()))];
            render_form_page(frame, body, state, heading, &state.password_form, "update password");
        }
    }
    frame.render_widget(
        Paragraph::new(hint_line(&[("Ctrl+T", "switch tab")])),
        footer,
    );
}
