//! Domain records exchanged between the mock service and the client.
//!
//! Identifiers are opaque strings: seed records use short numeric ids, records
//! created at runtime get a UUID.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// A stored user account. Only lives inside the mock store; the client sees
/// [`PublicUser`].
#[derive(Debug, Clone)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    pub password: String,
    pub avatar_url: String,
}

impl User {
    pub fn to_public(&self) -> PublicUser {
        PublicUser {
            id: self.id.clone(),
            name: self.name.clone(),
            email: self.email.clone(),
            avatar_url: self.avatar_url.clone(),
        }
    }
}

/// A user record with the password stripped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicUser {
    pub id: String,
    pub name: String,
    pub email: String,
    pub avatar_url: String,
}

/// Result of a successful login or registration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthSession {
    pub user: PublicUser,
    pub token: String,
}

/// Denormalized organizer reference carried on every event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Organizer {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    pub id: String,
    pub title: String,
    pub description: String,
    pub starts_at: NaiveDateTime,
    pub ends_at: NaiveDateTime,
    pub location: String,
    pub image_url: String,
    pub organizer: Organizer,
    pub capacity: u32,
    pub attendee_count: u32,
    pub category: String,
    pub price: f64,
    pub tags: BTreeSet<String>,
}

impl Event {
    /// Seats still open. Zero when an edit pushed capacity below the count.
    pub fn available_spots(&self) -> u32 {
        self.capacity.saturating_sub(self.attendee_count)
    }

    pub fn is_full(&self) -> bool {
        self.attendee_count >= self.capacity
    }

    /// Fill ratio in percent, capped at 100.
    pub fn fill_percent(&self) -> u16 {
        if self.capacity == 0 {
            return 100;
        }
        let pct = (self.attendee_count as f64 / self.capacity as f64 * 100.0).round();
        pct.min(100.0) as u16
    }

    pub fn fill_ratio(&self) -> f64 {
        if self.capacity == 0 {
            return 0.0;
        }
        self.attendee_count as f64 / self.capacity as f64
    }

    pub fn is_free(&self) -> bool {
        self.price <= 0.0
    }
}

/// Editable part of an event, as submitted by the create/edit form.
#[derive(Debug, Clone, PartialEq)]
pub struct EventDraft {
    pub title: String,
    pub description: String,
    pub starts_at: NaiveDateTime,
    pub ends_at: NaiveDateTime,
    pub location: String,
    pub image_url: String,
    pub capacity: u32,
    pub category: String,
    pub price: f64,
    pub tags: BTreeSet<String>,
}

#[cfg(test)]
impl EventDraft {
    pub fn from_event(event: &Event) -> Self {
        Self {
            title: event.title.clone(),
            description: event.description.clone(),
            starts_at: event.starts_at,
            ends_at: event.ends_at,
            location: event.location.clone(),
            image_url: event.image_url.clone(),
            capacity: event.capacity,
            category: event.category.clone(),
            price: event.price,
            tags: event.tags.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RsvpStatus {
    Confirmed,
}

impl std::fmt::Display for RsvpStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RsvpStatus::Confirmed => write!(f, "confirmed"),
        }
    }
}

/// Attendee contact fields submitted with an RSVP.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RsvpDetails {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub additional_guests: u32,
    pub special_requests: String,
}

/// An RSVP doubles as the attendee's ticket.
#[derive(Debug, Clone, PartialEq)]
pub struct Rsvp {
    pub id: String,
    pub event_id: String,
    pub user_id: String,
    pub status: RsvpStatus,
    pub ticket_number: String,
    pub created_at: DateTime<Utc>,
    pub details: RsvpDetails,
}

/// A ticket together with the event it admits to.
#[derive(Debug, Clone, PartialEq)]
pub struct Ticket {
    pub rsvp: Rsvp,
    pub event: Event,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn event(capacity: u32, attendee_count: u32) -> Event {
        let start = NaiveDate::from_ymd_opt(2025, 3, 15)
            .and_then(|d| d.and_hms_opt(9, 0, 0))
            .unwrap();
        Event {
            id: "e".into(),
            title: "t".into(),
            description: "d".into(),
            starts_at: start,
            ends_at: start,
            location: "l".into(),
            image_url: "https://x.y".into(),
            organizer: Organizer { id: "1".into(), name: "n".into() },
            capacity,
            attendee_count,
            category: "Music".into(),
            price: 0.0,
            tags: BTreeSet::new(),
        }
    }

    #[test]
    fn test_available_spots_saturates() {
        assert_eq!(event(10, 4).available_spots(), 6);
        assert_eq!(event(3, 5).available_spots(), 0);
        assert!(event(3, 5).is_full());
        assert!(!event(3, 2).is_full());
    }

    #[test]
    fn test_fill_percent() {
        assert_eq!(event(500, 320).fill_percent(), 64);
        assert_eq!(event(50, 42).fill_percent(), 84);
        assert_eq!(event(3, 5).fill_percent(), 100);
        assert_eq!(event(0, 0).fill_percent(), 100);
    }
}
