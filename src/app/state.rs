use crate::api::models::{Event, PublicUser, Rsvp, Ticket};
use crate::app::route::Route;
use crate::catalog::{self, EventQuery, PageInfo, CATEGORY_TILES};
use crate::config::AppConfig;
use crate::forms::{self, Form, InputState};
use crate::session::Session;
use chrono::NaiveDateTime;
use std::time::{Duration, Instant};

/// How many upcoming events the home view lists.
pub const UPCOMING_LIMIT: usize = 4;

/// Data fetched for one view.
#[derive(Debug, Clone, PartialEq)]
pub enum Remote<T> {
    Idle,
    Loading,
    Ready(T),
    Failed(String),
}

impl<T> Remote<T> {
    pub fn ready(&self) -> Option<&T> {
        match self {
            Remote::Ready(v) => Some(v),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Error,
    Info,
}

#[derive(Debug, Clone)]
pub struct Toast {
    pub kind: ToastKind,
    pub message: String,
    pub expires_at: Instant,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    View,
    Command,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DashboardTab {
    MyEvents,
    MyRsvps,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfileTab {
    Profile,
    Password,
}

/// A destructive step waiting for a yes/no.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Confirm {
    DeleteEvent { id: String, title: String },
    CancelRsvp { rsvp_id: String, event_id: String, title: String },
}

/// Selectable entries of the home view, in display order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HomeItem {
    Event(String),
    Category(&'static str),
}

pub struct AppState {
    pub config: AppConfig,
    pub route: Route,
    pub history: Vec<Route>,
    /// Protected route the user was sent away from to log in.
    pub redirect_after_login: Option<Route>,

    pub user: Option<PublicUser>,
    pub token: Option<String>,

    pub events: Vec<Event>,
    pub events_loaded: bool,
    pub user_events: Vec<Event>,
    pub user_rsvps: Vec<Rsvp>,
    pub detail: Remote<Event>,
    pub ticket: Remote<Ticket>,

    pub query: EventQuery,
    pub page: usize,
    pub selected: usize,
    pub dashboard_tab: DashboardTab,
    pub profile_tab: ProfileTab,

    pub form: Form,
    pub password_form: Form,
    pub confirm: Option<Confirm>,
    pub help_visible: bool,

    pub toasts: Vec<Toast>,
    pub pending_requests: usize,
    pub submitting: bool,

    pub input: InputState,
    pub focus: Focus,
    pub tick_count: u64,
    pub should_quit: bool,
    pub dirty: bool,
}

impl AppState {
    pub fn new(config: AppConfig, session: Option<Session>) -> Self {
        let (user, token) = match session {
            Some(s) => (Some(s.user), Some(s.token)),
            None => (None, None),
        };
        Self {
            config,
            route: Route::Home,
            history: Vec::new(),
            redirect_after_login: None,
            user,
            token,
            events: Vec::new(),
            events_loaded: false,
            user_events: Vec::new(),
            user_rsvps: Vec::new(),
            detail: Remote::Idle,
            ticket: Remote::Idle,
            query: EventQuery::default(),
            page: 1,
            selected: 0,
            dashboard_tab: DashboardTab::MyEvents,
            profile_tab: ProfileTab::Profile,
            form: Form::default(),
            password_form: forms::password_form(),
            confirm: None,
            help_visible: false,
            toasts: Vec::new(),
            pending_requests: 0,
            submitting: false,
            input: InputState::new(),
            focus: Focus::View,
            tick_count: 0,
            should_quit: false,
            dirty: true,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.user.is_some() && self.token.is_some()
    }

    pub fn user_id(&self) -> Option<&str> {
        self.user.as_ref().map(|u| u.id.as_str())
    }

    pub fn is_loading(&self) -> bool {
        self.pending_requests > 0
    }

    pub fn is_organizer(&self, event: &Event) -> bool {
        self.user_id() == Some(event.organizer.id.as_str())
    }

    /// The signed-in user's RSVP for an event, if any.
    pub fn rsvp_for(&self, event_id: &str) -> Option<&Rsvp> {
        self.user_rsvps.iter().find(|r| r.event_id == event_id)
    }

    /// Look an event up in the local caches.
    pub fn cached_event(&self, id: &str) -> Option<&Event> {
        self.events
            .iter()
            .chain(self.user_events.iter())
            .find(|e| e.id == id)
    }

    /// Swap a fresh copy of an event into every cache that holds it.
    pub fn replace_event(&mut self, event: &Event) {
        for cached in self
            .events
            .iter_mut()
            .chain(self.user_events.iter_mut())
            .filter(|e| e.id == event.id)
        {
            *cached = event.clone();
        }
        if let Remote::Ready(current) = &mut self.detail {
            if current.id == event.id {
                *current = event.clone();
            }
        }
        if let Remote::Ready(ticket) = &mut self.ticket {
            if ticket.event.id == event.id {
                ticket.event = event.clone();
            }
        }
    }

    pub fn remove_event(&mut self, id: &str) {
        self.events.retain(|e| e.id != id);
        self.user_events.retain(|e| e.id != id);
        self.user_rsvps.retain(|r| r.event_id != id);
        if self.detail.ready().is_some_and(|e| e.id == id) {
            self.detail = Remote::Idle;
        }
    }

    // --- Notifications ---

    pub fn push_toast(&mut self, kind: ToastKind, message: impl Into<String>) {
        let ttl = Duration::from_secs(self.config.ui.toast_secs);
        self.toasts.push(Toast {
            kind,
            message: message.into(),
            expires_at: Instant::now() + ttl,
        });
        self.dirty = true;
    }

    pub fn toast_success(&mut self, message: impl Into<String>) {
        self.push_toast(ToastKind::Success, message);
    }

    pub fn toast_error(&mut self, message: impl Into<String>) {
        self.push_toast(ToastKind::Error, message);
    }

    pub fn toast_info(&mut self, message: impl Into<String>) {
        self.push_toast(ToastKind::Info, message);
    }

    /// Drop expired toasts. Returns whether anything was removed.
    pub fn expire_toasts(&mut self, now: Instant) -> bool {
        let before = self.toasts.len();
        self.toasts.retain(|t| t.expires_at > now);
        before != self.toasts.len()
    }

    // --- Events listing ---

    pub fn filtered_events(&self) -> Vec<&Event> {
        self.query.apply(&self.events)
    }

    pub fn page_info(&self) -> PageInfo {
        PageInfo::new(
            self.filtered_events().len(),
            self.config.ui.events_per_page,
            self.page,
        )
    }

    /// Events shown on the current listing page.
    pub fn page_events(&self) -> Vec<&Event> {
        let all = self.filtered_events();
        self.page_info().slice(&all).to_vec()
    }

    /// Change the filters. Any change sends the listing back to page one.
    pub fn update_query(&mut self, f: impl FnOnce(&mut EventQuery)) {
        let before = self.query.clone();
        f(&mut self.query);
        if self.query != before {
            self.page = 1;
            self.selected = 0;
        }
        self.dirty = true;
    }

    pub fn categories(&self) -> Vec<String> {
        catalog::categories(&self.events)
    }

    // --- Home ---

    pub fn home_items(&self, now: NaiveDateTime) -> Vec<HomeItem> {
        let mut items = Vec::new();
        if let Some(featured) = catalog::featured(&self.events) {
            items.push(HomeItem::Event(featured.id.clone()));
        }
        for event in catalog::upcoming(&self.events, now, UPCOMING_LIMIT) {
            items.push(HomeItem::Event(event.id.clone()));
        }
        for &(name, _) in CATEGORY_TILES {
            items.push(HomeItem::Category(name));
        }
        items
    }

    // --- Dashboard ---

    /// Events the user has RSVP'd to, paired with their RSVP. RSVPs whose
    /// event is not cached are skipped.
    pub fn rsvp_events(&self) -> Vec<(&Rsvp, &Event)> {
        self.user_rsvps
            .iter()
            .filter_map(|r| self.cached_event(&r.event_id).map(|e| (r, e)))
            .collect()
    }

    pub fn dashboard_len(&self) -> usize {
        match self.dashboard_tab {
            DashboardTab::MyEvents => self.user_events.len(),
            DashboardTab::MyRsvps => self.rsvp_events().len(),
        }
    }

    // --- Selection ---

    pub fn select_next(&mut self, len: usize) {
        if len > 0 {
            self.selected = (self.selected + 1).min(len - 1);
        }
        self.dirty = true;
    }

    pub fn select_prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
        self.dirty = true;
    }

    pub fn status_line(&self) -> String {
        let who = match &self.user {
            Some(u) => format!("Signed in as {}", u.name),
            None => "Not signed in".to_string(),
        };
        format!("{} | {} events", who, self.events.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::seed::seed_events;
    use chrono::{NaiveDate, Utc};
    use crate::api::models::{RsvpDetails, RsvpStatus};

    fn state() -> AppState {
        let mut state = AppState::new(AppConfig::default(), None);
        state.events = seed_events();
        state.events_loaded = true;
        state
    }

    #[test]
    fn test_query_change_resets_page() {
        let mut state = state();
        state.page = 3;
        state.update_query(|q| q.search = "music".into());
        assert_eq!(state.page, 1);
        assert_eq!(state.filtered_events().len(), 1);

        state.page = 2;
        state.update_query(|q| q.search = "music".into());
        assert_eq!(state.page, 2);
        assert_eq!(state.page_info().page, 1);
    }

    #[test]
    fn test_page_events_respects_config() {
        let mut state = state();
        state.config.ui.events_per_page = 3;
        state.page = 2;
        let page = state.page_events();
        assert_eq!(page.len(), 1);
        assert_eq!(state.page_info().summary(), "Showing 4-4 of 4 events");
    }

    #[test]
    fn test_replace_event_updates_all_caches() {
        let mut state = state();
        state.user_events = vec![state.events[0].clone()];
        state.detail = Remote::Ready(state.events[0].clone());
        let mut updated = state.events[0].clone();
        updated.attendee_count = 321;
        state.replace_event(&updated);
        assert_eq!(state.events[0].attendee_count, 321);
        assert_eq!(state.user_events[0].attendee_count, 321);
        assert_eq!(state.detail.ready().map(|e| e.attendee_count), Some(321));
    }

    #[test]
    fn test_remove_event_drops_related_rsvps() {
        let mut state = state();
        state.user_rsvps.push(Rsvp {
            id: "r1".into(),
            event_id: "2".into(),
            user_id: "1".into(),
            status: RsvpStatus::Confirmed,
            ticket_number: "TCKT-123456".into(),
            created_at: Utc::now(),
            details: RsvpDetails::default(),
        });
        assert!(state.rsvp_for("2").is_some());
        assert_eq!(state.rsvp_events().len(), 1);
        state.remove_event("2");
        assert!(state.rsvp_for("2").is_none());
        assert_eq!(state.events.len(), 3);
    }

    #[test]
    fn test_toasts_expire() {
        let mut state = state();
        state.toast_info("hello");
        assert!(!state.expire_toasts(Instant::now()));
        assert!(state.expire_toasts(Instant::now() + Duration::from_secs(60)));
        assert!(state.toasts.is_empty());
    }

    #[test]
    fn test_home_items() {
        let state = state();
        let now = NaiveDate::from_ymd_opt(2025, 5, 1)
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .unwrap();
        let items = state.home_items(now);
        assert_eq!(items[0], HomeItem::Event("4".into()));
        assert_eq!(items[1], HomeItem::Event("4".into()));
        assert_eq!(items[2], HomeItem::Event("2".into()));
        assert_eq!(items[3], HomeItem::Category("Technology"));
        assert_eq!(items.len(), 3 + CATEGORY_TILES.len());
    }
}
