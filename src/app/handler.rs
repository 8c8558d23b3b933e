use crate::api::error::ServiceError;
use crate::api::manager::{ApiRequest, ApiResponse};
use crate::api::models::{AuthSession, Event, Organizer};
use crate::app::action::Action;
use crate::app::commands::{self, ParsedCommand};
use crate::app::event::AppEvent;
use crate::app::route::Route;
use crate::app::state::*;
use crate::catalog::{EventQuery, PageInfo};
use crate::forms::{self, validate, FieldKind, Form};
use crate::session::Session;
use chrono::Local;
use crossterm::event::{Event as CEvent, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use std::time::Instant;
use tracing::{debug, info, warn};

const MAX_HISTORY: usize = 50;

pub fn handle_event(state: &mut AppState, event: AppEvent) -> Vec<Action> {
    match event {
        AppEvent::Terminal(cevent) => {
            state.dirty = true;
            handle_terminal(state, cevent)
        }
        AppEvent::Api(response) => {
            state.dirty = true;
            handle_response(state, response)
        }
        AppEvent::Tick => handle_tick(state),
    }
}

/// Initial requests: open the start route and, for a remembered session,
/// load the user's events and RSVPs.
pub fn startup(state: &mut AppState, initial: Route) -> Vec<Action> {
    let mut actions = open_route(state, initial);
    if !state.events_loaded && !has_request(&actions, |r| matches!(r, ApiRequest::FetchEvents)) {
        actions.push(request(state, ApiRequest::FetchEvents));
    }
    if state.route != Route::Dashboard {
        actions.extend(fetch_user_data(state));
    }
    actions
}

fn has_request(actions: &[Action], pred: impl Fn(&ApiRequest) -> bool) -> bool {
    actions.iter().any(|a| matches!(a, Action::Api(r) if pred(r)))
}

fn request(state: &mut AppState, req: ApiRequest) -> Action {
    state.pending_requests += 1;
    Action::Api(req)
}

fn fetch_user_data(state: &mut AppState) -> Vec<Action> {
    let Some(user_id) = state.user_id().map(str::to_string) else {
        return vec![];
    };
    vec![
        request(state, ApiRequest::FetchUserEvents { user_id: user_id.clone() }),
        request(state, ApiRequest::FetchUserRsvps { user_id }),
    ]
}

fn handle_tick(state: &mut AppState) -> Vec<Action> {
    state.tick_count = state.tick_count.wrapping_add(1);
    if state.expire_toasts(Instant::now()) {
        state.dirty = true;
    }
    // Keep the spinner moving.
    if state.is_loading() {
        state.dirty = true;
    }
    vec![]
}

// --- Navigation ---

/// Go to a route, remembering the current one for "back".
pub fn navigate(state: &mut AppState, route: Route) -> Vec<Action> {
    if state.route != route {
        state.history.push(state.route.clone());
        if state.history.len() > MAX_HISTORY {
            state.history.remove(0);
        }
    }
    open_route(state, route)
}

fn go_back(state: &mut AppState) -> Vec<Action> {
    let route = state.history.pop().unwrap_or_default();
    open_route(state, route)
}

fn open_route(state: &mut AppState, route: Route) -> Vec<Action> {
    let route = if route.is_protected() && !state.is_authenticated() {
        debug!(path = %route, "protected route, redirecting to login");
        state.redirect_after_login = Some(route);
        Route::Login
    } else {
        route
    };
    let route = match route {
        Route::Login | Route::Register if state.is_authenticated() => Route::Dashboard,
        other => other,
    };

    debug!(path = %route, "navigate");
    state.route = route.clone();
    state.selected = 0;
    state.confirm = None;
    state.submitting = false;
    state.focus = Focus::View;
    state.form = Form::default();
    state.dirty = true;

    let mut actions = Vec::new();
    match route {
        Route::Home => {
            if !state.events_loaded {
                actions.push(request(state, ApiRequest::FetchEvents));
            }
        }
        Route::Events { search, category } => {
            state.update_query(|q| {
                q.search = search;
                q.category = (!category.is_empty()).then_some(category);
            });
            if !state.events_loaded {
                actions.push(request(state, ApiRequest::FetchEvents));
            }
        }
        Route::EventDetail(id) | Route::EditEvent(id) | Route::Rsvp(id) => {
            state.detail = match state.cached_event(&id) {
                Some(event) => Remote::Ready(event.clone()),
                None => Remote::Loading,
            };
            let opened = state.route.clone();
            actions.extend(prepare_event_view(state));
            // A redirect already issued its own requests.
            if state.route == opened {
                actions.push(request(state, ApiRequest::FetchEvent { id }));
            }
        }
        Route::CreateEvent => {
            state.form = forms::event_form(None, Local::now().naive_local());
        }
        Route::Ticket(id) => {
            state.ticket = Remote::Loading;
            actions.push(request(state, ApiRequest::FetchTicket { id }));
        }
        Route::Dashboard => {
            if !state.events_loaded {
                actions.push(request(state, ApiRequest::FetchEvents));
            }
            actions.extend(fetch_user_data(state));
        }
        Route::Login => state.form = forms::login_form(),
        Route::Register => state.form = forms::register_form(),
        Route::Profile => {
            state.profile_tab = ProfileTab::Profile;
            state.form = forms::profile_form(state.user.as_ref());
            state.password_form = forms::password_form();
        }
        Route::NotFound(_) => {}
    }
    actions
}

/// Build the form for the edit and RSVP routes once their event is known,
/// and bounce away when the action is not allowed.
fn prepare_event_view(state: &mut AppState) -> Vec<Action> {
    let Some(event) = state.detail.ready().cloned() else {
        return vec![];
    };
    if !state.form.fields.is_empty() {
        return vec![];
    }
    match state.route.clone() {
        Route::EditEvent(id) => {
            if !state.is_organizer(&event) {
                state.toast_error("You can only edit your own events");
                return replace_route(state, Route::EventDetail(id));
            }
            state.form = forms::event_form(Some(&event), Local::now().naive_local());
            vec![]
        }
        Route::Rsvp(id) => {
            if let Some(rsvp) = state.rsvp_for(&id) {
                let ticket = Route::Ticket(rsvp.id.clone());
                state.toast_info(ServiceError::AlreadyRsvped.to_string());
                return replace_route(state, ticket);
            }
            if event.is_full() {
                state.toast_error(ServiceError::CapacityReached.to_string());
                return replace_route(state, Route::EventDetail(id));
            }
            state.form = forms::rsvp_form(state.user.as_ref());
            vec![]
        }
        _ => vec![],
    }
}

/// Navigate without leaving the current route in history.
fn replace_route(state: &mut AppState, route: Route) -> Vec<Action> {
    open_route(state, route)
}

fn events_route(query: &EventQuery) -> Route {
    Route::Events {
        search: query.search.clone(),
        category: query.category.clone().unwrap_or_default(),
    }
}

/// Show the listing with the current filters.
fn show_events(state: &mut AppState) -> Vec<Action> {
    let route = events_route(&state.query);
    if matches!(state.route, Route::Events { .. }) {
        state.route = route;
        return vec![];
    }
    navigate(state, route)
}

// --- Service responses ---

fn handle_response(state: &mut AppState, response: ApiResponse) -> Vec<Action> {
    state.pending_requests = state.pending_requests.saturating_sub(1);

    match response {
        ApiResponse::LoggedIn(result) => on_auth(state, result, "Login successful!"),
        ApiResponse::Registered(result) => on_auth(state, result, "Registration successful!"),
        ApiResponse::ProfileUpdated(result) => {
            state.submitting = false;
            match result {
                Ok(user) => {
                    for event in state
                        .events
                        .iter_mut()
                        .chain(state.user_events.iter_mut())
                        .filter(|e| e.organizer.id == user.id)
                    {
                        event.organizer.name = user.name.clone();
                    }
                    state.user = Some(user.clone());
                    state.toast_success("Profile updated successfully");
                    match state.token.clone() {
                        Some(token) => vec![Action::SaveSession(Session { token, user })],
                        None => vec![],
                    }
                }
                Err(e) => {
                    if e == ServiceError::EmailTaken {
                        state.form.apply_errors(&[("email", e.to_string())]);
                    }
                    state.toast_error(e.to_string());
                    vec![]
                }
            }
        }
        ApiResponse::PasswordChanged(result) => {
            state.submitting = false;
            match result {
                Ok(()) => {
                    state.password_form = forms::password_form();
                    state.toast_success("Password updated successfully");
                }
                Err(e) => {
                    if e == ServiceError::WrongCurrentPassword {
                        state
                            .password_form
                            .apply_errors(&[("current_password", e.to_string())]);
                    }
                    state.toast_error(e.to_string());
                }
            }
            vec![]
        }
        ApiResponse::Events(result) => {
            match result {
                Ok(events) => {
                    state.events = events;
                    state.events_loaded = true;
                }
                Err(e) => {
                    warn!(error = %e, "fetching events failed");
                    state.toast_error("Error fetching events");
                }
            }
            vec![]
        }
        ApiResponse::Event { id, result } => {
            let current = matches!(
                &state.route,
                Route::EventDetail(r) | Route::EditEvent(r) | Route::Rsvp(r) if *r == id
            );
            match result {
                Ok(event) => {
                    state.replace_event(&event);
                    if current {
                        state.detail = Remote::Ready(event);
                        return prepare_event_view(state);
                    }
                }
                Err(e) => {
                    if current {
                        state.detail = Remote::Failed(e.to_string());
                        state.toast_error("Error fetching event details");
                    }
                }
            }
            vec![]
        }
        ApiResponse::UserEvents(result) => {
            match result {
                Ok(events) => state.user_events = events,
                Err(_) => state.toast_error("Error fetching your events"),
            }
            vec![]
        }
        ApiResponse::UserRsvps(result) => {
            match result {
                Ok(rsvps) => state.user_rsvps = rsvps,
                Err(_) => state.toast_error("Error fetching your RSVPs"),
            }
            vec![]
        }
        ApiResponse::EventCreated(result) => {
            state.submitting = false;
            match result {
                Ok(event) => {
                    info!(event_id = %event.id, "event created");
                    state.events.push(event.clone());
                    state.user_events.push(event.clone());
                    state.toast_success("Event created successfully!");
                    replace_route(state, Route::EventDetail(event.id))
                }
                Err(e) => {
                    state.toast_error(e.to_string());
                    vec![]
                }
            }
        }
        ApiResponse::EventUpdated { id, result } => {
            state.submitting = false;
            match result {
                Ok(event) => {
                    state.replace_event(&event);
                    state.toast_success("Event updated successfully!");
                    replace_route(state, Route::EventDetail(id))
                }
                Err(e) => {
                    state.toast_error(e.to_string());
                    vec![]
                }
            }
        }
        ApiResponse::EventDeleted { id, result } => {
            state.submitting = false;
            match result {
                Ok(()) => {
                    state.remove_event(&id);
                    state.history.retain(|r| !route_mentions_event(r, &id));
                    state.toast_success("Event deleted successfully!");
                    if state.route == Route::Dashboard {
                        let len = state.dashboard_len();
                        state.selected = state.selected.min(len.saturating_sub(1));
                        vec![]
                    } else {
                        replace_route(state, Route::Dashboard)
                    }
                }
                Err(e) => {
                    state.toast_error(e.to_string());
                    vec![]
                }
            }
        }
        ApiResponse::Rsvped { event_id, result } => {
            state.submitting = false;
            match result {
                Ok((rsvp, event)) => {
                    debug!(event_id = %event_id, ticket = %rsvp.ticket_number, "rsvp stored");
                    state.replace_event(&event);
                    let ticket = Route::Ticket(rsvp.id.clone());
                    state.user_rsvps.push(rsvp);
                    state.toast_success("RSVP successful!");
                    replace_route(state, ticket)
                }
                Err(e) => {
                    state.toast_error(e.to_string());
                    vec![]
                }
            }
        }
        ApiResponse::RsvpCancelled { rsvp_id, event_id, result } => {
            state.submitting = false;
            match result {
                Ok(event) => {
                    state.replace_event(&event);
                    state.user_rsvps.retain(|r| r.id != rsvp_id);
                    state.toast_success("RSVP cancelled successfully");
                    if state.route == Route::Ticket(rsvp_id) {
                        replace_route(state, Route::EventDetail(event_id))
                    } else {
                        if state.route == Route::Dashboard {
                            let len = state.dashboard_len();
                            state.selected = state.selected.min(len.saturating_sub(1));
                        }
                        vec![]
                    }
                }
                Err(e) => {
                    state.toast_error(e.to_string());
                    vec![]
                }
            }
        }
        ApiResponse::Ticket { id, result } => {
            if state.route == Route::Ticket(id) {
                state.ticket = match result {
                    Ok(ticket) => Remote::Ready(ticket),
                    Err(e) => Remote::Failed(e.to_string()),
                };
            }
            vec![]
        }
    }
}

fn route_mentions_event(route: &Route, id: &str) -> bool {
    matches!(
        route,
        Route::EventDetail(r) | Route::EditEvent(r) | Route::Rsvp(r) if r == id
    )
}

fn on_auth(
    state: &mut AppState,
    result: Result<AuthSession, ServiceError>,
    success: &str,
) -> Vec<Action> {
    state.submitting = false;
    match result {
        Ok(auth) => {
            info!(user_id = %auth.user.id, "signed in");
            state.user = Some(auth.user.clone());
            state.token = Some(auth.token.clone());
            state.toast_success(success);

            let mut actions = vec![Action::SaveSession(Session::from(auth))];
            let target = state.redirect_after_login.take().unwrap_or(Route::Home);
            if target != Route::Dashboard {
                actions.extend(fetch_user_data(state));
            }
            actions.extend(replace_route(state, target));
            actions
        }
        Err(e) => {
            state.form.clear_secrets();
            state.toast_error(e.to_string());
            vec![]
        }
    }
}

fn logout(state: &mut AppState) -> Vec<Action> {
    info!("logged out");
    state.user = None;
    state.token = None;
    state.user_events.clear();
    state.user_rsvps.clear();
    state.ticket = Remote::Idle;
    state.history.clear();
    state.redirect_after_login = None;
    state.toast_info("You have been logged out");
    let mut actions = vec![Action::ClearSession];
    actions.extend(open_route(state, Route::Home));
    actions
}

fn refresh(state: &mut AppState) -> Vec<Action> {
    let mut actions = vec![request(state, ApiRequest::FetchEvents)];
    actions.extend(fetch_user_data(state));
    match state.route.clone() {
        Route::EventDetail(id) | Route::EditEvent(id) | Route::Rsvp(id) => {
            actions.push(request(state, ApiRequest::FetchEvent { id }));
        }
        Route::Ticket(id) => {
            actions.push(request(state, ApiRequest::FetchTicket { id }));
        }
        _ => {}
    }
    actions
}

// --- Terminal input ---

fn handle_terminal(state: &mut AppState, event: CEvent) -> Vec<Action> {
    match event {
        CEvent::Key(key) if key.kind == KeyEventKind::Press => handle_key(state, key),
        CEvent::Resize(_, _) => {
            state.dirty = true;
            vec![]
        }
        _ => vec![],
    }
}

fn handle_key(state: &mut AppState, key: KeyEvent) -> Vec<Action> {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

    // Global keybindings
    if ctrl && key.code == KeyCode::Char('c') {
        return vec![Action::Quit];
    }

    if state.help_visible {
        state.help_visible = false;
        return vec![];
    }

    if let Some(confirm) = state.confirm.clone() {
        return handle_confirm_key(state, key, confirm);
    }

    if ctrl && key.code == KeyCode::Char('g') {
        open_command_line(state, "/");
        return vec![];
    }

    match state.focus {
        Focus::Command => handle_command_key(state, key),
        Focus::View if is_form_route(&state.route) => handle_form_key(state, key),
        Focus::View => handle_view_key(state, key),
    }
}

fn open_command_line(state: &mut AppState, prefix: &str) {
    state.focus = Focus::Command;
    state.input.set_text(prefix);
}

fn is_form_route(route: &Route) -> bool {
    matches!(
        route,
        Route::CreateEvent
            | Route::EditEvent(_)
            | Route::Rsvp(_)
            | Route::Login
            | Route::Register
            | Route::Profile
    )
}

fn handle_confirm_key(state: &mut AppState, key: KeyEvent, confirm: Confirm) -> Vec<Action> {
    match key.code {
        KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => {
            state.confirm = None;
            state.submitting = true;
            let req = match confirm {
                Confirm::DeleteEvent { id, .. } => ApiRequest::DeleteEvent { id },
                Confirm::CancelRsvp { rsvp_id, event_id, .. } => {
                    ApiRequest::CancelRsvp { rsvp_id, event_id }
                }
            };
            vec![request(state, req)]
        }
        KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
            state.confirm = None;
            vec![]
        }
        _ => vec![],
    }
}

fn handle_command_key(state: &mut AppState, key: KeyEvent) -> Vec<Action> {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    match key.code {
        KeyCode::Enter => {
            let text = state.input.take_text();
            state.focus = Focus::View;
            if text.trim().is_empty() || text.trim() == "/" {
                return vec![];
            }
            run_command(state, &text)
        }
        KeyCode::Esc => {
            state.input.clear();
            state.focus = Focus::View;
            vec![]
        }
        KeyCode::Backspace => {
            if state.input.text.is_empty() {
                state.focus = Focus::View;
            } else {
                state.input.delete_back();
            }
            vec![]
        }
        KeyCode::Delete => {
            state.input.delete_forward();
            vec![]
        }
        KeyCode::Left => {
            state.input.move_left();
            vec![]
        }
        KeyCode::Right => {
            state.input.move_right();
            vec![]
        }
        KeyCode::Home => {
            state.input.move_home();
            vec![]
        }
        KeyCode::End => {
            state.input.move_end();
            vec![]
        }
        KeyCode::Up => {
            state.input.history_up();
            vec![]
        }
        KeyCode::Down => {
            state.input.history_down();
            vec![]
        }
        KeyCode::Char('w') if ctrl => {
            state.input.delete_word_back();
            vec![]
        }
        KeyCode::Char(c) if !ctrl => {
            state.input.insert_char(c);
            vec![]
        }
        _ => vec![],
    }
}

pub fn run_command(state: &mut AppState, text: &str) -> Vec<Action> {
    let Some(cmd) = commands::parse_command(text) else {
        match commands::usage(text) {
            Some(usage) => state.toast_error(format!("Usage: {}", usage)),
            None => state.toast_error(format!("Unknown command: {}", text.trim())),
        }
        return vec![];
    };
    debug!(?cmd, "command");

    match cmd {
        ParsedCommand::Go { path } => navigate(state, Route::parse(&path)),
        ParsedCommand::Home => navigate(state, Route::Home),
        ParsedCommand::Events => show_events(state),
        ParsedCommand::Search { text } => {
            state.update_query(|q| q.search = text);
            show_events(state)
        }
        ParsedCommand::Category { name } => {
            state.update_query(|q| q.category = name);
            show_events(state)
        }
        ParsedCommand::Date { date } => {
            state.update_query(|q| q.date = date);
            show_events(state)
        }
        ParsedCommand::Price { min, max } => {
            state.update_query(|q| {
                q.min_price = min;
                q.max_price = max;
            });
            show_events(state)
        }
        ParsedCommand::Sort { order } => {
            state.update_query(|q| q.sort = order);
            show_events(state)
        }
        ParsedCommand::Page { page } => {
            let total = state.filtered_events().len();
            state.page = PageInfo::new(total, state.config.ui.events_per_page, page).page;
            state.selected = 0;
            show_events(state)
        }
        ParsedCommand::ClearFilters => {
            state.update_query(|q| *q = EventQuery::default());
            show_events(state)
        }
        ParsedCommand::Event { id } => navigate(state, Route::EventDetail(id)),
        ParsedCommand::Create => navigate(state, Route::CreateEvent),
        ParsedCommand::Dashboard => navigate(state, Route::Dashboard),
        ParsedCommand::Profile => navigate(state, Route::Profile),
        ParsedCommand::Login => navigate(state, Route::Login),
        ParsedCommand::Register => navigate(state, Route::Register),
        ParsedCommand::Logout => {
            if state.is_authenticated() {
                logout(state)
            } else {
                state.toast_info("You are not signed in");
                vec![]
            }
        }
        ParsedCommand::Refresh => refresh(state),
        ParsedCommand::Help => {
            state.help_visible = true;
            vec![]
        }
        ParsedCommand::Quit => vec![Action::Quit],
    }
}

// --- Forms ---

fn active_form(state: &mut AppState) -> &mut Form {
    if state.route == Route::Profile && state.profile_tab == ProfileTab::Password {
        &mut state.password_form
    } else {
        &mut state.form
    }
}

fn handle_form_key(state: &mut AppState, key: KeyEvent) -> Vec<Action> {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

    match key.code {
        KeyCode::Esc => return go_back(state),
        KeyCode::Enter => return submit_form(state),
        KeyCode::Char('t') if ctrl && state.route == Route::Profile => {
            state.profile_tab = match state.profile_tab {
                ProfileTab::Profile => ProfileTab::Password,
                ProfileTab::Password => ProfileTab::Profile,
            };
            return vec![];
        }
        KeyCode::Char('r') if ctrl && state.route == Route::Login => {
            return replace_route(state, Route::Register);
        }
        KeyCode::Char('l') if ctrl && state.route == Route::Register => {
            return replace_route(state, Route::Login);
        }
        _ => {}
    }

    let form = active_form(state);
    let on_choice = matches!(form.focused_field().map(|f| f.kind), Some(FieldKind::Choice(_)));
    match key.code {
        KeyCode::Tab | KeyCode::Down => form.focus_next(),
        KeyCode::BackTab | KeyCode::Up => form.focus_prev(),
        KeyCode::Left if on_choice => form.cycle_choice(false),
        KeyCode::Right | KeyCode::Char(' ') if on_choice => form.cycle_choice(true),
        KeyCode::Left => form.edit(|i| i.move_left()),
        KeyCode::Right => form.edit(|i| i.move_right()),
        KeyCode::Home => form.edit(|i| i.move_home()),
        KeyCode::End => form.edit(|i| i.move_end()),
        KeyCode::Backspace => form.edit(|i| i.delete_back()),
        KeyCode::Delete => form.edit(|i| i.delete_forward()),
        KeyCode::Char('w') if ctrl => form.edit(|i| i.delete_word_back()),
        KeyCode::Char(c) if !ctrl => form.edit(|i| i.insert_char(c)),
        _ => {}
    }
    vec![]
}

fn submit_form(state: &mut AppState) -> Vec<Action> {
    if state.submitting {
        return vec![];
    }

    let req = match state.route.clone() {
        Route::CreateEvent => {
            let Some(user) = state.user.clone() else {
                return vec![];
            };
            match validate::validate_event(&state.form) {
                Ok(draft) => ApiRequest::CreateEvent {
                    draft,
                    organizer: Organizer { id: user.id, name: user.name },
                },
                Err(errors) => return reject(&mut state.form, &errors),
            }
        }
        Route::EditEvent(id) => match validate::validate_event(&state.form) {
            Ok(draft) => ApiRequest::UpdateEvent { id, draft },
            Err(errors) => return reject(&mut state.form, &errors),
        },
        Route::Rsvp(event_id) => {
            let (Some(user_id), Some(event)) =
                (state.user_id().map(str::to_string), state.detail.ready().cloned())
            else {
                state.toast_info("Event details are still loading");
                return vec![];
            };
            match validate::validate_rsvp(&state.form, &event) {
                Ok(details) => ApiRequest::Rsvp { event_id, user_id, details },
                Err(errors) => return reject(&mut state.form, &errors),
            }
        }
        Route::Login => match validate::validate_login(&state.form) {
            Ok((email, password)) => ApiRequest::Login { email, password },
            Err(errors) => return reject(&mut state.form, &errors),
        },
        Route::Register => match validate::validate_register(&state.form) {
            Ok((name, email, password)) => ApiRequest::Register { name, email, password },
            Err(errors) => return reject(&mut state.form, &errors),
        },
        Route::Profile => {
            let Some(user_id) = state.user_id().map(str::to_string) else {
                return vec![];
            };
            match state.profile_tab {
                ProfileTab::Profile => match validate::validate_profile(&state.form) {
                    Ok((name, email)) => ApiRequest::UpdateProfile { user_id, name, email },
                    Err(errors) => return reject(&mut state.form, &errors),
                },
                ProfileTab::Password => {
                    match validate::validate_password_change(&state.password_form) {
                        Ok((current, new)) => ApiRequest::ChangePassword { user_id, current, new },
                        Err(errors) => return reject(&mut state.password_form, &errors),
                    }
                }
            }
        }
        _ => return vec![],
    };

    active_form(state).clear_errors();
    state.submitting = true;
    vec![request(state, req)]
}

fn reject(form: &mut Form, errors: &forms::FieldErrors) -> Vec<Action> {
    debug!(count = errors.len(), "form rejected");
    form.apply_errors(errors);
    vec![]
}

// --- Views ---

fn handle_view_key(state: &mut AppState, key: KeyEvent) -> Vec<Action> {
    match key.code {
        KeyCode::Char('/') => {
            open_command_line(state, "/");
            return vec![];
        }
        KeyCode::Char('?') => {
            state.help_visible = true;
            return vec![];
        }
        KeyCode::Esc | KeyCode::Backspace => return go_back(state),
        _ => {}
    }

    match state.route.clone() {
        Route::Home => handle_home_key(state, key),
        Route::Events { .. } => handle_events_key(state, key),
        Route::EventDetail(id) => handle_detail_key(state, key, id),
        Route::Ticket(id) => handle_ticket_key(state, key, id),
        Route::Dashboard => handle_dashboard_key(state, key),
        Route::NotFound(_) => match key.code {
            KeyCode::Enter => navigate(state, Route::Home),
            KeyCode::Char('e') => show_events(state),
            _ => vec![],
        },
        _ => vec![],
    }
}

fn handle_home_key(state: &mut AppState, key: KeyEvent) -> Vec<Action> {
    let items = state.home_items(Local::now().naive_local());
    match key.code {
        KeyCode::Down | KeyCode::Right | KeyCode::Char('j') => state.select_next(items.len()),
        KeyCode::Up | KeyCode::Left | KeyCode::Char('k') => state.select_prev(),
        KeyCode::Enter => {
            return match items.get(state.selected) {
                Some(HomeItem::Event(id)) => navigate(state, Route::EventDetail(id.clone())),
                Some(HomeItem::Category(name)) => navigate(
                    state,
                    Route::Events {
                        search: String::new(),
                        category: name.to_string(),
                    },
                ),
                None => vec![],
            };
        }
        KeyCode::Char('e') => return show_events(state),
        KeyCode::Char('s') => open_command_line(state, "/search "),
        KeyCode::Char('d') => return navigate(state, Route::Dashboard),
        _ => {}
    }
    vec![]
}

fn handle_events_key(state: &mut AppState, key: KeyEvent) -> Vec<Action> {
    let on_page = state.page_events().len();
    let info = state.page_info();
    match key.code {
        KeyCode::Down | KeyCode::Char('j') => state.select_next(on_page),
        KeyCode::Up | KeyCode::Char('k') => state.select_prev(),
        KeyCode::Right | KeyCode::PageDown | KeyCode::Char(']') => {
            if info.page < info.total_pages {
                state.page = info.page + 1;
                state.selected = 0;
            }
        }
        KeyCode::Left | KeyCode::PageUp | KeyCode::Char('[') => {
            if info.page > 1 {
                state.page = info.page - 1;
                state.selected = 0;
            }
        }
        KeyCode::Enter => {
            let id = state.page_events().get(state.selected).map(|e| e.id.clone());
            if let Some(id) = id {
                return navigate(state, Route::EventDetail(id));
            }
        }
        KeyCode::Char('s') => {
            state.update_query(|q| q.sort = q.sort.next());
        }
        KeyCode::Char('c') => {
            let categories = state.categories();
            let next = match &state.query.category {
                None => categories.first().cloned(),
                Some(current) => categories
                    .iter()
                    .position(|c| c == current)
                    .and_then(|i| categories.get(i + 1).cloned()),
            };
            state.update_query(|q| q.category = next);
            return show_events(state);
        }
        KeyCode::Char('x') => {
            state.update_query(|q| *q = EventQuery::default());
            return show_events(state);
        }
        KeyCode::Char('f') => open_command_line(state, "/search "),
        _ => {}
    }
    vec![]
}

fn handle_detail_key(state: &mut AppState, key: KeyEvent, id: String) -> Vec<Action> {
    let Some(event) = state.detail.ready().cloned() else {
        return match key.code {
            KeyCode::Enter => show_events(state),
            _ => vec![],
        };
    };
    let rsvp_id = state.rsvp_for(&id).map(|r| r.id.clone());

    match key.code {
        KeyCode::Char('r') | KeyCode::Enter => {
            if let Some(rsvp_id) = rsvp_id {
                return navigate(state, Route::Ticket(rsvp_id));
            }
            if event.is_full() {
                state.toast_error(ServiceError::CapacityReached.to_string());
                return vec![];
            }
            navigate(state, Route::Rsvp(id))
        }
        KeyCode::Char('t') => match rsvp_id {
            Some(rsvp_id) => navigate(state, Route::Ticket(rsvp_id)),
            None => vec![],
        },
        KeyCode::Char('c') => {
            if let Some(rsvp_id) = rsvp_id {
                state.confirm = Some(Confirm::CancelRsvp {
                    rsvp_id,
                    event_id: id,
                    title: event.title,
                });
            }
            vec![]
        }
        KeyCode::Char('e') if state.is_organizer(&event) => navigate(state, Route::EditEvent(id)),
        KeyCode::Char('d') if state.is_organizer(&event) => {
            state.confirm = Some(Confirm::DeleteEvent { id, title: event.title });
            vec![]
        }
        _ => vec![],
    }
}

fn handle_ticket_key(state: &mut AppState, key: KeyEvent, id: String) -> Vec<Action> {
    let Some(ticket) = state.ticket.ready().cloned() else {
        return match key.code {
            KeyCode::Enter => navigate(state, Route::Dashboard),
            _ => vec![],
        };
    };
    match key.code {
        KeyCode::Char('v') | KeyCode::Enter => navigate(state, Route::EventDetail(ticket.event.id)),
        KeyCode::Char('d') => navigate(state, Route::Dashboard),
        KeyCode::Char('c') => {
            state.confirm = Some(Confirm::CancelRsvp {
                rsvp_id: id,
                event_id: ticket.event.id,
                title: ticket.event.title,
            });
            vec![]
        }
        _ => vec![],
    }
}

fn handle_dashboard_key(state: &mut AppState, key: KeyEvent) -> Vec<Action> {
    let len = state.dashboard_len();
    match key.code {
        KeyCode::Tab | KeyCode::Left | KeyCode::Right => {
            state.dashboard_tab = match state.dashboard_tab {
                DashboardTab::MyEvents => DashboardTab::MyRsvps,
                DashboardTab::MyRsvps => DashboardTab::MyEvents,
            };
            state.selected = 0;
            vec![]
        }
        KeyCode::Down | KeyCode::Char('j') => {
            state.select_next(len);
            vec![]
        }
        KeyCode::Up | KeyCode::Char('k') => {
            state.select_prev();
            vec![]
        }
        KeyCode::Char('n') => navigate(state, Route::CreateEvent),
        _ => match state.dashboard_tab {
            DashboardTab::MyEvents => {
                let Some(event) = state.user_events.get(state.selected).cloned() else {
                    return vec![];
                };
                my_event_key(state, key, event)
            }
            DashboardTab::MyRsvps => {
                let Some((rsvp_id, event_id, title)) = state
                    .rsvp_events()
                    .get(state.selected)
                    .map(|(r, e)| (r.id.clone(), e.id.clone(), e.title.clone()))
                else {
                    return vec![];
                };
                match key.code {
                    KeyCode::Enter => navigate(state, Route::Ticket(rsvp_id)),
                    KeyCode::Char('v') => navigate(state, Route::EventDetail(event_id)),
                    KeyCode::Char('c') => {
                        state.confirm = Some(Confirm::CancelRsvp { rsvp_id, event_id, title });
                        vec![]
                    }
                    _ => vec![],
                }
            }
        },
    }
}

fn my_event_key(state: &mut AppState, key: KeyEvent, event: Event) -> Vec<Action> {
    match key.code {
        KeyCode::Enter | KeyCode::Char('v') => navigate(state, Route::EventDetail(event.id)),
        KeyCode::Char('e') => navigate(state, Route::EditEvent(event.id)),
        KeyCode::Char('d') => {
            state.confirm = Some(Confirm::DeleteEvent {
                id: event.id,
                title: event.title,
            });
            vec![]
        }
        _ => vec![],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::models::{PublicUser, Rsvp, RsvpDetails, RsvpStatus};
    use crate::api::seed::seed_events;
    use crate::config::AppConfig;
    use chrono::Utc;

    fn key(code: KeyCode) -> AppEvent {
        AppEvent::Terminal(CEvent::Key(KeyEvent::new(code, KeyModifiers::NONE)))
    }

    fn type_text(state: &mut AppState, text: &str) {
        for c in text.chars() {
            handle_event(state, key(KeyCode::Char(c)));
        }
    }

    fn jane() -> PublicUser {
        PublicUser {
            id: "2".into(),
            name: "Jane Smith".into(),
            email: "jane@example.com".into(),
            avatar_url: "https://i.pravatar.cc/150?img=5".into(),
        }
    }

    fn signed_in() -> AppState {
        let session = Session { token: "mock-jwt-token-x".into(), user: jane() };
        let mut state = AppState::new(AppConfig::default(), Some(session));
        state.events = seed_events();
        state.events_loaded = true;
        state
    }

    fn requests(actions: &[Action]) -> Vec<&ApiRequest> {
        actions
            .iter()
            .filter_map(|a| match a {
                Action::Api(r) => Some(r),
                _ => None,
            })
            .collect()
    }

    fn rsvp(id: &str, event_id: &str) -> Rsvp {
        Rsvp {
            id: id.into(),
            event_id: event_id.into(),
            user_id: "2".into(),
            status: RsvpStatus::Confirmed,
            ticket_number: "TCKT-555555".into(),
            created_at: Utc::now(),
            details: RsvpDetails::default(),
        }
    }

    #[test]
    fn test_startup_fetches_events_and_user_data() {
        let session = Session { token: "t".into(), user: jane() };
        let mut state = AppState::new(AppConfig::default(), Some(session));
        let actions = startup(&mut state, Route::Home);
        let reqs = requests(&actions);
        assert_eq!(reqs.len(), 3);
        assert!(matches!(reqs[0], ApiRequest::FetchEvents));
        assert_eq!(state.pending_requests, 3);

        let mut anon = AppState::new(AppConfig::default(), None);
        let actions = startup(&mut anon, Route::Home);
        assert_eq!(requests(&actions).len(), 1);
    }

    #[test]
    fn test_protected_route_redirects_then_resumes() {
        let mut state = AppState::new(AppConfig::default(), None);
        state.events = seed_events();
        state.events_loaded = true;

        navigate(&mut state, Route::Dashboard);
        assert_eq!(state.route, Route::Login);
        assert_eq!(state.redirect_after_login, Some(Route::Dashboard));

        type_text(&mut state, "jane@example.com");
        handle_event(&mut state, key(KeyCode::Tab));
        type_text(&mut state, "password123");
        let actions = handle_event(&mut state, key(KeyCode::Enter));
        assert!(matches!(
            requests(&actions)[..],
            [ApiRequest::Login { ref email, ref password }]
                if email == "jane@example.com" && password == "password123"
        ));
        assert!(state.submitting);

        let auth = AuthSession { user: jane(), token: "mock-jwt-token-1".into() };
        let actions = handle_event(&mut state, AppEvent::Api(ApiResponse::LoggedIn(Ok(auth))));
        assert!(matches!(actions[0], Action::SaveSession(_)));
        assert_eq!(state.route, Route::Dashboard);
        assert!(state.is_authenticated());
        assert_eq!(state.toasts.last().map(|t| t.message.as_str()), Some("Login successful!"));
        // Dashboard loads the user's events and RSVPs.
        assert_eq!(requests(&actions).len(), 2);
    }

    #[test]
    fn test_plain_login_lands_on_home() {
        let mut state = AppState::new(AppConfig::default(), None);
        navigate(&mut state, Route::Login);
        assert_eq!(state.redirect_after_login, None);
        let auth = AuthSession { user: jane(), token: "mock-jwt-token-2".into() };
        let actions = handle_event(&mut state, AppEvent::Api(ApiResponse::LoggedIn(Ok(auth))));
        assert!(matches!(actions[0], Action::SaveSession(_)));
        assert_eq!(state.route, Route::Home);
        assert!(state.is_authenticated());
    }

    #[test]
    fn test_login_validation_blocks_request() {
        let mut state = AppState::new(AppConfig::default(), None);
        navigate(&mut state, Route::Login);
        type_text(&mut state, "not-an-email");
        let actions = handle_event(&mut state, key(KeyCode::Enter));
        assert!(actions.is_empty());
        assert_eq!(state.form.error("email"), Some("Please enter a valid email"));
        assert_eq!(state.form.error("password"), Some("Password is required"));
    }

    #[test]
    fn test_login_failure_toasts_error() {
        let mut state = AppState::new(AppConfig::default(), None);
        navigate(&mut state, Route::Login);
        state.pending_requests = 1;
        handle_event(
            &mut state,
            AppEvent::Api(ApiResponse::LoggedIn(Err(ServiceError::InvalidPassword))),
        );
        assert_eq!(state.route, Route::Login);
        assert_eq!(state.pending_requests, 0);
        let toast = state.toasts.last().unwrap();
        assert_eq!(toast.kind, ToastKind::Error);
        assert_eq!(toast.message, "Invalid password");
    }

    #[test]
    fn test_rsvp_response_patches_caches_and_opens_ticket() {
        let mut state = signed_in();
        navigate(&mut state, Route::Rsvp("3".into()));
        assert!(!state.form.fields.is_empty());
        assert_eq!(state.form.value("name"), "Jane Smith");

        let actions = handle_event(&mut state, key(KeyCode::Enter));
        assert!(matches!(requests(&actions)[..], [ApiRequest::Rsvp { .. }]));

        let mut event = state.events[2].clone();
        event.attendee_count += 1;
        let actions = handle_event(
            &mut state,
            AppEvent::Api(ApiResponse::Rsvped {
                event_id: "3".into(),
                result: Ok((rsvp("r9", "3"), event)),
            }),
        );
        assert_eq!(state.route, Route::Ticket("r9".into()));
        assert_eq!(state.events[2].attendee_count, 144);
        assert_eq!(state.user_rsvps.len(), 1);
        assert!(matches!(requests(&actions)[..], [ApiRequest::FetchTicket { .. }]));
    }

    #[test]
    fn test_rsvp_route_for_existing_rsvp_goes_to_ticket() {
        let mut state = signed_in();
        state.user_rsvps.push(rsvp("r1", "1"));
        navigate(&mut state, Route::Rsvp("1".into()));
        assert_eq!(state.route, Route::Ticket("r1".into()));
    }

    #[test]
    fn test_edit_requires_organizer() {
        let mut state = signed_in();
        // Event 1 belongs to John.
        navigate(&mut state, Route::EditEvent("1".into()));
        assert_eq!(state.route, Route::EventDetail("1".into()));
        assert_eq!(
            state.toasts.last().map(|t| t.message.as_str()),
            Some("You can only edit your own events")
        );

        navigate(&mut state, Route::EditEvent("2".into()));
        assert_eq!(state.route, Route::EditEvent("2".into()));
        assert_eq!(state.form.value("title"), "Summer Music Festival");
    }

    #[test]
    fn test_create_event_flow() {
        let mut state = signed_in();
        navigate(&mut state, Route::CreateEvent);
        let actions = handle_event(&mut state, key(KeyCode::Enter));
        assert!(actions.is_empty());
        assert_eq!(state.form.error("title"), Some("Title is required"));
        assert_eq!(state.form.focused, 0);

        type_text(&mut state, "Board Game Night");
        state.form.set_value("description", "Bring your favourite games and friends.");
        state.form.set_value("location", "Community Hall");
        let actions = handle_event(&mut state, key(KeyCode::Enter));
        let reqs = requests(&actions);
        match reqs[..] {
            [ApiRequest::CreateEvent { draft, organizer }] => {
                assert_eq!(draft.title, "Board Game Night");
                assert_eq!(organizer.id, "2");
            }
            _ => panic!("unexpected requests: {:?}", reqs),
        }

        let mut created = state.events[1].clone();
        created.id = "new".into();
        handle_event(&mut state, AppEvent::Api(ApiResponse::EventCreated(Ok(created))));
        assert_eq!(state.events.len(), 5);
        assert_eq!(state.user_events.len(), 1);
        assert_eq!(state.route, Route::EventDetail("new".into()));
    }

    #[test]
    fn test_delete_confirm_and_response() {
        let mut state = signed_in();
        state.user_events = vec![state.events[1].clone(), state.events[3].clone()];
        state.user_rsvps.push(rsvp("r1", "2"));
        navigate(&mut state, Route::EventDetail("2".into()));

        handle_event(&mut state, key(KeyCode::Char('d')));
        assert!(matches!(state.confirm, Some(Confirm::DeleteEvent { .. })));
        let actions = handle_event(&mut state, key(KeyCode::Char('y')));
        assert!(matches!(
            requests(&actions)[..],
            [ApiRequest::DeleteEvent { ref id }] if id == "2"
        ));
        assert!(state.confirm.is_none());

        handle_event(
            &mut state,
            AppEvent::Api(ApiResponse::EventDeleted { id: "2".into(), result: Ok(()) }),
        );
        assert_eq!(state.route, Route::Dashboard);
        assert!(state.cached_event("2").is_none());
        assert!(state.user_rsvps.is_empty());
        assert_eq!(state.user_events.len(), 1);
        assert!(!state.history.iter().any(|r| route_mentions_event(r, "2")));
    }

    #[test]
    fn test_cancel_from_ticket_returns_to_event() {
        let mut state = signed_in();
        state.user_rsvps.push(rsvp("r1", "4"));
        navigate(&mut state, Route::Ticket("r1".into()));

        let mut event = state.events[3].clone();
        event.attendee_count -= 1;
        handle_event(
            &mut state,
            AppEvent::Api(ApiResponse::RsvpCancelled {
                rsvp_id: "r1".into(),
                event_id: "4".into(),
                result: Ok(event),
            }),
        );
        assert_eq!(state.route, Route::EventDetail("4".into()));
        assert!(state.user_rsvps.is_empty());
        assert_eq!(state.events[3].attendee_count, 41);
    }

    #[test]
    fn test_search_command_filters_and_routes() {
        let mut state = signed_in();
        state.page = 4;
        let actions = run_command(&mut state, "/search music");
        assert!(actions.is_empty());
        assert_eq!(
            state.route,
            Route::Events { search: "music".into(), category: String::new() }
        );
        assert_eq!(state.page, 1);
        assert_eq!(state.filtered_events().len(), 1);

        run_command(&mut state, "/category Music");
        assert_eq!(state.route.to_path(), "/events?search=music&category=Music");

        run_command(&mut state, "/clear");
        assert_eq!(state.filtered_events().len(), 4);
    }

    #[test]
    fn test_unknown_command_toasts() {
        let mut state = signed_in();
        run_command(&mut state, "/frobnicate");
        assert_eq!(
            state.toasts.last().map(|t| t.message.as_str()),
            Some("Unknown command: /frobnicate")
        );
    }

    #[test]
    fn test_bad_arguments_show_usage() {
        let mut state = signed_in();
        run_command(&mut state, "/price 10");
        assert_eq!(
            state.toasts.last().map(|t| t.message.as_str()),
            Some("Usage: /price <min> <max>")
        );
        assert_eq!(state.query.min_price, 0.0);
    }

    #[test]
    fn test_logout() {
        let mut state = signed_in();
        state.user_rsvps.push(rsvp("r1", "1"));
        navigate(&mut state, Route::Dashboard);
        let actions = run_command(&mut state, "/logout");
        assert!(matches!(actions[0], Action::ClearSession));
        assert!(!state.is_authenticated());
        assert!(state.user_rsvps.is_empty());
        assert_eq!(state.route, Route::Home);
        assert_eq!(
            state.toasts.last().map(|t| t.message.as_str()),
            Some("You have been logged out")
        );
    }

    #[test]
    fn test_command_line_typing() {
        let mut state = signed_in();
        handle_event(&mut state, key(KeyCode::Char('/')));
        assert_eq!(state.focus, Focus::Command);
        type_text(&mut state, "event 3");
        let actions = handle_event(&mut state, key(KeyCode::Enter));
        assert_eq!(state.focus, Focus::View);
        assert_eq!(state.route, Route::EventDetail("3".into()));
        assert!(matches!(requests(&actions)[..], [ApiRequest::FetchEvent { ref id }] if id == "3"));
    }

    #[test]
    fn test_events_paging_keys() {
        let mut state = signed_in();
        state.config.ui.events_per_page = 3;
        navigate(&mut state, Route::events());
        handle_event(&mut state, key(KeyCode::Right));
        assert_eq!(state.page, 2);
        handle_event(&mut state, key(KeyCode::Right));
        assert_eq!(state.page, 2);
        handle_event(&mut state, key(KeyCode::Enter));
        // Page two holds the latest event.
        assert_eq!(state.route, Route::EventDetail("2".into()));
    }

    #[test]
    fn test_stale_event_response_only_patches_cache() {
        let mut state = signed_in();
        navigate(&mut state, Route::EventDetail("1".into()));
        navigate(&mut state, Route::Home);
        let mut event = state.events[0].clone();
        event.title = "Renamed".into();
        handle_event(
            &mut state,
            AppEvent::Api(ApiResponse::Event { id: "1".into(), result: Ok(event) }),
        );
        assert_eq!(state.route, Route::Home);
        assert_eq!(state.events[0].title, "Renamed");
    }

    #[test]
    fn test_tick_expires_toasts() {
        let mut state = signed_in();
        state.config.ui.toast_secs = 0;
        state.toast_info("bye");
        state.dirty = false;
        handle_event(&mut state, AppEvent::Tick);
        assert!(state.toasts.is_empty());
        assert!(state.dirty);
    }
}
