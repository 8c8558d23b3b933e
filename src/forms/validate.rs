//! Field rules for each form. A passing form yields the typed payload for its
//! service call; a failing one yields the message for every bad field.

use crate::api::models::{Event, EventDraft, RsvpDetails};
use crate::forms::{Form, DATE_INPUT_FORMAT};
use chrono::NaiveDateTime;
use regex::Regex;
use std::collections::BTreeSet;
use std::sync::LazyLock;

/// `(field key, message)` for every failing field, in form order.
pub type FieldErrors = Vec<(&'static str, String)>;

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email regex"));
static PHONE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\+?[\d\s\-()]{10,15}$").expect("valid phone regex"));
static URL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^https?://.+\..+").expect("valid url regex"));

pub const MIN_DESCRIPTION_LEN: usize = 20;
pub const MIN_PASSWORD_LEN: usize = 6;

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

pub fn is_valid_phone(phone: &str) -> bool {
    PHONE_RE.is_match(phone)
}

pub fn is_valid_url(url: &str) -> bool {
    URL_RE.is_match(url)
}

fn check_email(form: &Form, key: &'static str, errors: &mut FieldErrors) {
    let email = form.value(key).trim();
    if email.is_empty() {
        errors.push((key, "Email is required".into()));
    } else if !is_valid_email(email) {
        errors.push((key, "Please enter a valid email".into()));
    }
}

fn check_phone(form: &Form, key: &'static str, errors: &mut FieldErrors) {
    let phone = form.value(key);
    if !phone.is_empty() && !is_valid_phone(phone) {
        errors.push((key, "Please enter a valid phone number".into()));
    }
}

fn check_required(form: &Form, key: &'static str, message: &str, errors: &mut FieldErrors) {
    if form.value(key).trim().is_empty() {
        errors.push((key, message.to_string()));
    }
}

fn parse_date(
    form: &Form,
    key: &'static str,
    errors: &mut FieldErrors,
) -> Option<NaiveDateTime> {
    match NaiveDateTime::parse_from_str(form.value(key).trim(), DATE_INPUT_FORMAT) {
        Ok(date) => Some(date),
        Err(_) => {
            errors.push((key, "Enter a date as YYYY-MM-DD HH:MM".into()));
            None
        }
    }
}

/// Split a comma-separated tag list, dropping blanks.
pub fn parse_tags(raw: &str) -> BTreeSet<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

pub fn validate_event(form: &Form) -> Result<EventDraft, FieldErrors> {
    let mut errors = FieldErrors::new();

    check_required(form, "title", "Title is required", &mut errors);

    let description = form.value("description");
    if description.trim().is_empty() {
        errors.push(("description", "Description is required".into()));
    } else if description.chars().count() < MIN_DESCRIPTION_LEN {
        errors.push((
            "description",
            format!("Description must be at least {} characters", MIN_DESCRIPTION_LEN),
        ));
    }

    let starts_at = parse_date(form, "starts_at", &mut errors);
    let ends_at = parse_date(form, "ends_at", &mut errors);

    check_required(form, "location", "Location is required", &mut errors);

    let image_url = form.value("image_url").trim();
    if image_url.is_empty() {
        errors.push(("image_url", "Image URL is required".into()));
    } else if !is_valid_url(image_url) {
        errors.push(("image_url", "Please enter a valid URL".into()));
    }

    let capacity = match form.value("capacity").trim().parse::<i64>() {
        Ok(n) if n > 0 => u32::try_from(n).ok(),
        _ => None,
    };
    if capacity.is_none() {
        errors.push(("capacity", "Capacity must be greater than 0".into()));
    }

    if let (Some(start), Some(end)) = (starts_at, ends_at) {
        if end <= start {
            errors.push(("ends_at", "End date must be after start date".into()));
        }
    }

    let price_raw = form.value("price").trim();
    let price = if price_raw.is_empty() {
        Some(0.0)
    } else {
        price_raw.parse::<f64>().ok().filter(|p| p.is_finite())
    };
    match price {
        Some(p) if p < 0.0 => errors.push(("price", "Price cannot be negative".into())),
        None => errors.push(("price", "Price must be a number".into())),
        _ => {}
    }

    match (errors.is_empty(), starts_at, ends_at, capacity, price) {
        (true, Some(starts_at), Some(ends_at), Some(capacity), Some(price)) => Ok(EventDraft {
            title: form.value("title").trim().to_string(),
            description: description.trim().to_string(),
            starts_at,
            ends_at,
            location: form.value("location").trim().to_string(),
            image_url: image_url.to_string(),
            capacity,
            category: form.value("category").to_string(),
            price,
            tags: parse_tags(form.value("tags")),
        }),
        _ => Err(errors),
    }
}

pub fn validate_rsvp(form: &Form, event: &Event) -> Result<RsvpDetails, FieldErrors> {
    let mut errors = FieldErrors::new();

    check_required(form, "name", "Name is required", &mut errors);
    check_email(form, "email", &mut errors);
    check_phone(form, "phone", &mut errors);

    let guests_raw = form.value("additional_guests").trim();
    let additional_guests = if guests_raw.is_empty() {
        Some(0)
    } else {
        guests_raw.parse::<u32>().ok()
    };
    match additional_guests {
        Some(guests) => {
            let available = event.available_spots();
            if guests.saturating_add(1) > available {
                let noun = if available == 1 { "spot" } else { "spots" };
                errors.push((
                    "additional_guests",
                    format!("Only {} {} available", available, noun),
                ));
            }
        }
        None => errors.push(("additional_guests", "Guests must be a whole number".into())),
    }

    if !errors.is_empty() {
        return Err(errors);
    }
    Ok(RsvpDetails {
        name: form.value("name").trim().to_string(),
        email: form.value("email").trim().to_string(),
        phone: form.value("phone").trim().to_string(),
        additional_guests: additional_guests.unwrap_or(0),
        special_requests: form.value("special_requests").trim().to_string(),
    })
}

/// Returns `(email, password)`.
pub fn validate_login(form: &Form) -> Result<(String, String), FieldErrors> {
    let mut errors = FieldErrors::new();
    check_email(form, "email", &mut errors);
    if form.value("password").is_empty() {
        errors.push(("password", "Password is required".into()));
    }
    if !errors.is_empty() {
        return Err(errors);
    }
    Ok((
        form.value("email").trim().to_string(),
        form.value("password").to_string(),
    ))
}

fn check_new_password(
    form: &Form,
    key: &'static str,
    confirm_key: &'static str,
    required_message: &str,
    errors: &mut FieldErrors,
) {
    let password = form.value(key);
    if password.is_empty() {
        errors.push((key, required_message.to_string()));
    } else if password.chars().count() < MIN_PASSWORD_LEN {
        errors.push((
            key,
            format!("Password must be at least {} characters", MIN_PASSWORD_LEN),
        ));
    }
    if password != form.value(confirm_key) {
        errors.push((confirm_key, "Passwords do not match".into()));
    }
}

/// Returns `(name, email, password)`.
pub fn validate_register(form: &Form) -> Result<(String, String, String), FieldErrors> {
    let mut errors = FieldErrors::new();
    check_required(form, "name", "Name is required", &mut errors);
    check_email(form, "email", &mut errors);
    check_new_password(
        form,
        "password",
        "confirm_password",
        "Password is required",
        &mut errors,
    );
    if !errors.is_empty() {
        return Err(errors);
    }
    Ok((
        form.value("name").trim().to_string(),
        form.value("email").trim().to_string(),
        form.value("password").to_string(),
    ))
}

/// Returns `(name, email)`. The phone number is checked but not stored.
pub fn validate_profile(form: &Form) -> Result<(String, String), FieldErrors> {
    let mut errors = FieldErrors::new();
    check_required(form, "name", "Name is required", &mut errors);
    check_email(form, "email", &mut errors);
    check_phone(form, "phone", &mut errors);
    if !errors.is_empty() {
        return Err(errors);
    }
    Ok((
        form.value("name").trim().to_string(),
        form.value("email").trim().to_string(),
    ))
}

/// Returns `(current, new)`.
pub fn validate_password_change(form: &Form) -> Result<(String, String), FieldErrors> {
    let mut errors = FieldErrors::new();
    if form.value("current_password").is_empty() {
        errors.push(("current_password", "Current password is required".into()));
    }
    check_new_password(
        form,
        "new_password",
        "confirm_password",
        "New password is required",
        &mut errors,
    );
    if !errors.is_empty() {
        return Err(errors);
    }
    Ok((
        form.value("current_password").to_string(),
        form.value("new_password").to_string(),
    ))
}
