//! In-app navigation targets and their path form.
//!
//! Paths look like the web routes they stand in for: `/events/3/rsvp`,
//! `/events?search=jazz&category=Music`.

use std::fmt;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Route {
    #[default]
    Home,
    /// Listing, optionally pre-filtered from the query string.
    Events { search: String, category: String },
    EventDetail(String),
    CreateEvent,
    EditEvent(String),
    Rsvp(String),
    Ticket(String),
    Dashboard,
    Login,
    Register,
    Profile,
    NotFound(String),
}

impl Route {
    pub fn events() -> Self {
        Route::Events {
            search: String::new(),
            category: String::new(),
        }
    }

    /// Parse a path with optional query string. Unknown paths become
    /// [`Route::NotFound`].
    pub fn parse(input: &str) -> Self {
        let input = input.trim();
        let (path, query) = match input.split_once('?') {
            Some((p, q)) => (p, Some(q)),
            None => (input, None),
        };
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

        match segments.as_slice() {
            [] => Route::Home,
            ["events"] => {
                let mut search = String::new();
                let mut category = String::new();
                for (key, value) in query.map(parse_query).unwrap_or_default() {
                    match key.as_str() {
                        "search" => search = value,
                        "category" => category = value,
                        _ => {}
                    }
                }
                Route::Events { search, category }
            }
            ["events", id] => Route::EventDetail(decode(id)),
            ["events", id, "edit"] => Route::EditEvent(decode(id)),
            ["events", id, "rsvp"] => Route::Rsvp(decode(id)),
            ["create-event"] => Route::CreateEvent,
            ["tickets", id] => Route::Ticket(decode(id)),
            ["dashboard"] => Route::Dashboard,
            ["login"] => Route::Login,
            ["register"] => Route::Register,
            ["profile"] => Route::Profile,
            _ => Route::NotFound(input.to_string()),
        }
    }

    pub fn to_path(&self) -> String {
        match self {
            Route::Home => "/".to_string(),
            Route::Events { search, category } => {
                let mut params = Vec::new();
                if !search.is_empty() {
                    params.push(format!("search={}", urlencoding::encode(search)));
                }
                if !category.is_empty() {
                    params.push(format!("category={}", urlencoding::encode(category)));
                }
                if params.is_empty() {
                    "/events".to_string()
                } else {
                    format!("/events?{}", params.join("&"))
                }
            }
            Route::EventDetail(id) => format!("/events/{}", id),
            Route::CreateEvent => "/create-event".to_string(),
            Route::EditEvent(id) => format!("/events/{}/edit", id),
            Route::Rsvp(id) => format!("/events/{}/rsvp", id),
            Route::Ticket(id) => format!("/tickets/{}", id),
            Route::Dashboard => "/dashboard".to_string(),
            Route::Login => "/login".to_string(),
            Route::Register => "/register".to_string(),
            Route::Profile => "/profile".to_string(),
            Route::NotFound(path) => path.clone(),
        }
    }

    /// Routes that need a signed-in user.
    pub fn is_protected(&self) -> bool {
        matches!(
            self,
            Route::CreateEvent
                | Route::EditEvent(_)
                | Route::Rsvp(_)
                | Route::Ticket(_)
                | Route::Dashboard
                | Route::Profile
        )
    }

    /// Short label for the header breadcrumb.
    pub fn title(&self) -> &'static str {
        match self {
            Route::Home => "Home",
            Route::Events { .. } => "Events",
            Route::EventDetail(_) => "Event",
            Route::CreateEvent => "Create Event",
            Route::EditEvent(_) => "Edit Event",
            Route::Rsvp(_) => "RSVP",
            Route::Ticket(_) => "Ticket",
            Route::Dashboard => "Dashboard",
            Route::Login => "Log In",
            Route::Register => "Sign Up",
            Route::Profile => "Profile",
            Route::NotFound(_) => "Not Found",
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_path())
    }
}

fn decode(raw: &str) -> String {
    let spaced = raw.replace('+', " ");
    match urlencoding::decode(&spaced) {
        Ok(decoded) => decoded.into_owned(),
        Err(_) => spaced,
    }
}

fn parse_query(query: &str) -> Vec<(String, String)> {
    query
        .split('&')
        .filter(|pair| !pair.is_empty())
        .map(|pair| match pair.split_once('=') {
            Some((k, v)) => (decode(k), decode(v)),
            None => (decode(pair), String::new()),
        })
        .collect()
}
