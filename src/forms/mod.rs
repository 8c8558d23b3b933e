//! Form model: labelled fields with cursor editing, keyboard focus, and
//! per-field error messages. Field sets for every editable view live here;
//! the rules that check them are in [`validate`].

pub mod input;
pub mod validate;

use crate::api::models::{Event, PublicUser};
use chrono::{Duration, NaiveDateTime, Timelike};
pub use input::InputState;
pub use validate::FieldErrors;

/// Categories offered by the event form.
pub const EVENT_CATEGORIES: &[&str] = &[
    "Technology",
    "Business",
    "Music",
    "Arts",
    "Sports",
    "Health",
    "Education",
    "Social",
    "Food",
    "Other",
];

/// How date fields are typed and shown.
pub const DATE_INPUT_FORMAT: &str = "%Y-%m-%d %H:%M";

pub const DEFAULT_IMAGE_URL: &str = "https://images.unsplash.com/photo-1511578314322-379afb476865";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    /// Rendered masked.
    Secret,
    /// Cycles through fixed options instead of taking typed input.
    Choice(&'static [&'static str]),
}

#[derive(Debug, Clone)]
pub struct Field {
    pub key: &'static str,
    pub label: &'static str,
    pub input: InputState,
    pub kind: FieldKind,
    pub required: bool,
    pub placeholder: &'static str,
    pub error: Option<String>,
}

impl Field {
    pub fn text(key: &'static str, label: &'static str) -> Self {
        Self {
            key,
            label,
            input: InputState::new(),
            kind: FieldKind::Text,
            required: false,
            placeholder: "",
            error: None,
        }
    }

    pub fn secret(key: &'static str, label: &'static str) -> Self {
        Self {
            kind: FieldKind::Secret,
            ..Self::text(key, label)
        }
    }

    pub fn choice(
        key: &'static str,
        label: &'static str,
        options: &'static [&'static str],
    ) -> Self {
        let mut field = Self {
            kind: FieldKind::Choice(options),
            ..Self::text(key, label)
        };
        if let Some(first) = options.first() {
            field.input.set_text(*first);
        }
        field
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn placeholder(mut self, placeholder: &'static str) -> Self {
        self.placeholder = placeholder;
        self
    }

    pub fn value(mut self, value: impl Into<String>) -> Self {
        self.input.set_text(value);
        self
    }

    pub fn display_text(&self) -> String {
        match self.kind {
            FieldKind::Secret => "•".repeat(self.input.text.chars().count()),
            _ => self.input.text.clone(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Form {
    pub fields: Vec<Field>,
    pub focused: usize,
}

impl Form {
    pub fn new(fields: Vec<Field>) -> Self {
        Self { fields, focused: 0 }
    }

    pub fn value(&self, key: &str) -> &str {
        self.fields
            .iter()
            .find(|f| f.key == key)
            .map(|f| f.input.text.as_str())
            .unwrap_or("")
    }

    #[cfg(test)]
    pub fn set_value(&mut self, key: &str, value: impl Into<String>) {
        if let Some(field) = self.fields.iter_mut().find(|f| f.key == key) {
            field.input.set_text(value);
        }
    }

    pub fn error(&self, key: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|f| f.key == key)
            .and_then(|f| f.error.as_deref())
    }

    pub fn has_errors(&self) -> bool {
        self.fields.iter().any(|f| f.error.is_some())
    }

    pub fn focused_field(&self) -> Option<&Field> {
        self.fields.get(self.focused)
    }

    pub fn focus_next(&mut self) {
        if !self.fields.is_empty() {
            self.focused = (self.focused + 1) % self.fields.len();
        }
    }

    pub fn focus_prev(&mut self) {
        if !self.fields.is_empty() {
            self.focused = (self.focused + self.fields.len() - 1) % self.fields.len();
        }
    }

    /// Edit the focused text field. Editing clears that field's error.
    pub fn edit(&mut self, f: impl FnOnce(&mut InputState)) {
        if let Some(field) = self.fields.get_mut(self.focused) {
            if matches!(field.kind, FieldKind::Choice(_)) {
                return;
            }
            f(&mut field.input);
            field.error = None;
        }
    }

    /// Step the focused choice field. No-op on text fields.
    pub fn cycle_choice(&mut self, forward: bool) {
        let Some(field) = self.fields.get_mut(self.focused) else {
            return;
        };
        let FieldKind::Choice(options) = field.kind else {
            return;
        };
        if options.is_empty() {
            return;
        }
        let current = options.iter().position(|o| *o == field.input.text).unwrap_or(0);
        let next = if forward {
            (current + 1) % options.len()
        } else {
            (current + options.len() - 1) % options.len()
        };
        field.input.set_text(options[next]);
        field.error = None;
    }

    /// Replace all errors and move focus to the first failing field.
    pub fn apply_errors(&mut self, errors: &[(&str, String)]) {
        self.clear_errors();
        for (key, message) in errors {
            if let Some(field) = self.fields.iter_mut().find(|f| f.key == *key) {
                field.error = Some(message.clone());
            }
        }
        if let Some(idx) = self.fields.iter().position(|f| f.error.is_some()) {
            self.focused = idx;
        }
    }

    pub fn clear_errors(&mut self) {
        for field in &mut self.fields {
            field.error = None;
        }
    }

    pub fn clear_secrets(&mut self) {
        for field in self.fields.iter_mut().filter(|f| f.kind == FieldKind::Secret) {
            field.input.clear();
        }
    }
}

/// Create/edit form. A new event starts at the next full hour and runs two
/// hours.
pub fn event_form(event: Option<&Event>, now: NaiveDateTime) -> Form {
    let start = now
        .with_minute(0)
        .and_then(|t| t.with_second(0))
        .and_then(|t| t.with_nanosecond(0))
        .unwrap_or(now)
        + Duration::hours(1);
    let (starts_at, ends_at) = match event {
        Some(e) => (e.starts_at, e.ends_at),
        None => (start, start + Duration::hours(2)),
    };

    let mut category = Field::choice("category", "Category", EVENT_CATEGORIES);
    if let Some(e) = event {
        category.input.set_text(e.category.clone());
    }

    Form::new(vec![
        Field::text("title", "Event Title")
            .required()
            .placeholder("Enter event title")
            .value(event.map(|e| e.title.clone()).unwrap_or_default()),
        Field::text("description", "Description")
            .required()
            .placeholder("Describe your event in detail")
            .value(event.map(|e| e.description.clone()).unwrap_or_default()),
        category,
        Field::text("starts_at", "Start Date & Time")
            .required()
            .placeholder("YYYY-MM-DD HH:MM")
            .value(starts_at.format(DATE_INPUT_FORMAT).to_string()),
        Field::text("ends_at", "End Date & Time")
            .required()
            .placeholder("YYYY-MM-DD HH:MM")
            .value(ends_at.format(DATE_INPUT_FORMAT).to_string()),
        Field::text("location", "Location")
            .required()
            .placeholder("Enter event location")
            .value(event.map(|e| e.location.clone()).unwrap_or_default()),
        Field::text("image_url", "Image URL")
            .required()
            .value(event.map_or(DEFAULT_IMAGE_URL.to_string(), |e| e.image_url.clone())),
        Field::text("capacity", "Capacity")
            .required()
            .value(event.map_or(100, |e| e.capacity).to_string()),
        Field::text("price", "Price ($)")
            .placeholder("0 for free events")
            .value(event.map_or("0".to_string(), |e| format_price_input(e.price))),
        Field::text("tags", "Tags")
            .placeholder("Comma separated, e.g. tech, networking")
            .value(
                event
                    .map(|e| e.tags.iter().cloned().collect::<Vec<_>>().join(", "))
                    .unwrap_or_default(),
            ),
    ])
}

fn format_price_input(price: f64) -> String {
    if price.fract() == 0.0 {
        format!("{}", price as i64)
    } else {
        format!("{:.2}", price)
    }
}

/// RSVP form, prefilled from the signed-in user.
pub fn rsvp_form(user: Option<&PublicUser>) -> Form {
    Form::new(vec![
        Field::text("name", "Full Name")
            .required()
            .value(user.map(|u| u.name.clone()).unwrap_or_default()),
        Field::text("email", "Email Address")
            .required()
            .value(user.map(|u| u.email.clone()).unwrap_or_default()),
        Field::text("phone", "Phone Number").placeholder("Optional"),
        Field::text("additional_guests", "Additional Guests").value("0"),
        Field::text("special_requests", "Special Requests")
            .placeholder("Dietary restrictions, accessibility needs, etc."),
    ])
}

pub fn login_form() -> Form {
    Form::new(vec![
        Field::text("email", "Email Address")
            .required()
            .placeholder("you@example.com"),
        Field::secret("password", "Password").required(),
    ])
}

pub fn register_form() -> Form {
    Form::new(vec![
        Field::text("name", "Full Name").required(),
        Field::text("email", "Email Address")
            .required()
            .placeholder("you@example.com"),
        Field::secret("password", "Password").required(),
        Field::secret("confirm_password", "Confirm Password").required(),
    ])
}

pub fn profile_form(user: Option<&PublicUser>) -> Form {
    Form::new(vec![
        Field::text("name", "Full Name")
            .required()
            .value(user.map(|u| u.name.clone()).unwrap_or_default()),
        Field::text("email", "Email Address")
            .required()
            .value(user.map(|u| u.email.clone()).unwrap_or_default()),
        Field::text("phone", "Phone Number").placeholder("Optional"),
    ])
}

pub fn password_form() -> Form {
    Form::new(vec![
        Field::secret("current_password", "Current Password").required(),
        Field::secret("new_password", "New Password").required(),
        Field::secret("confirm_password", "Confirm New Password").required(),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::seed::seed_events;
    use chrono::NaiveDate;

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 6, 1)
            .and_then(|d| d.and_hms_opt(14, 37, 12))
            .unwrap()
    }

    #[test]
    fn test_new_event_form_defaults() {
        let form = event_form(None, now());
        assert_eq!(form.value("starts_at"), "2025-06-01 15:00");
        assert_eq!(form.value("ends_at"), "2025-06-01 17:00");
        assert_eq!(form.value("category"), "Technology");
        assert_eq!(form.value("capacity"), "100");
        assert_eq!(form.value("image_url"), DEFAULT_IMAGE_URL);
    }

    #[test]
    fn test_edit_form_prefills() {
        let events = seed_events();
        let form = event_form(Some(&events[1]), now());
        assert_eq!(form.value("title"), "Summer Music Festival");
        assert_eq!(form.value("category"), "Music");
        assert_eq!(form.value("price"), "149.50");
        assert_eq!(form.value("tags"), "festival, music, summer");
        assert_eq!(form.value("starts_at"), "2025-07-10 12:00");
    }

    #[test]
    fn test_editing_clears_field_error() {
        let mut form = login_form();
        form.apply_errors(&[("password", "Password is required".to_string())]);
        assert_eq!(form.focused, 1);
        assert!(form.has_errors());
        form.edit(|i| i.insert_char('x'));
        assert_eq!(form.error("password"), None);
        assert_eq!(form.value("password"), "x");
    }

    #[test]
    fn test_focus_wraps() {
        let mut form = register_form();
        form.focus_prev();
        assert_eq!(form.focused, 3);
        form.focus_next();
        assert_eq!(form.focused, 0);
    }

    #[test]
    fn test_choice_cycles_and_ignores_typing() {
        let mut form = event_form(None, now());
        form.focused = 2;
        form.edit(|i| i.insert_char('z'));
        assert_eq!(form.value("category"), "Technology");
        form.cycle_choice(true);
        assert_eq!(form.value("category"), "Business");
        form.cycle_choice(false);
        form.cycle_choice(false);
        assert_eq!(form.value("category"), "Other");
    }

    #[test]
    fn test_secret_masking() {
        let form = Form::new(vec![Field::secret("p", "P").value("abc")]);
        assert_eq!(form.fields[0].display_text(), "•••");
    }
}
