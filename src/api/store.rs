//! In-memory backing store for the mock service.
//!
//! `Backend` owns the user, event, and RSVP collections. Every operation
//! validates before it mutates, so a failed call leaves the store untouched.

use crate::api::error::{ServiceError, ServiceResult};
use crate::api::models::*;
use crate::api::seed;
use chrono::Utc;
use tracing::{debug, info};

#[derive(Debug)]
pub struct Backend {
    users: Vec<User>,
    events: Vec<Event>,
    rsvps: Vec<Rsvp>,
}

impl Default for Backend {
    fn default() -> Self {
        Self::seeded()
    }
}

impl Backend {
    /// Store preloaded with the demo users and events.
    pub fn seeded() -> Self {
        Self {
            users: seed::seed_users(),
            events: seed::seed_events(),
            rsvps: Vec::new(),
        }
    }

    #[cfg(test)]
    pub fn empty() -> Self {
        Self {
            users: Vec::new(),
            events: Vec::new(),
            rsvps: Vec::new(),
        }
    }

    // --- Auth ---

    pub fn login(&self, email: &str, password: &str) -> ServiceResult<AuthSession> {
        let user = self
            .users
            .iter()
            .find(|u| u.email == email)
            .ok_or(ServiceError::UserNotFound)?;

        if user.password != password {
            return Err(ServiceError::InvalidPassword);
        }

        info!(user_id = %user.id, "login");
        Ok(AuthSession {
            user: user.to_public(),
            token: seed::new_token(),
        })
    }

    pub fn register(
        &mut self,
        name: &str,
        email: &str,
        password: &str,
    ) -> ServiceResult<AuthSession> {
        if self.users.iter().any(|u| u.email == email) {
            return Err(ServiceError::EmailTaken);
        }

        let user = User {
            id: seed::new_id(),
            name: name.to_string(),
            email: email.to_string(),
            password: password.to_string(),
            avatar_url: seed::random_avatar_url(),
        };
        let public = user.to_public();
        info!(user_id = %user.id, "registered user");
        self.users.push(user);

        Ok(AuthSession {
            user: public,
            token: seed::new_token(),
        })
    }

    pub fn update_profile(
        &mut self,
        user_id: &str,
        name: &str,
        email: &str,
    ) -> ServiceResult<PublicUser> {
        if self.users.iter().any(|u| u.email == email && u.id != user_id) {
            return Err(ServiceError::EmailTaken);
        }
        let user = self
            .users
            .iter_mut()
            .find(|u| u.id == user_id)
            .ok_or(ServiceError::UserNotFound)?;

        user.name = name.to_string();
        user.email = email.to_string();
        let public = user.to_public();

        // Organizer names are denormalized onto events.
        for event in self.events.iter_mut().filter(|e| e.organizer.id == user_id) {
            event.organizer.name = public.name.clone();
        }
        Ok(public)
    }

    pub fn change_password(
        &mut self,
        user_id: &str,
        current: &str,
        new: &str,
    ) -> ServiceResult<()> {
        let user = self
            .users
            .iter_mut()
            .find(|u| u.id == user_id)
            .ok_or(ServiceError::UserNotFound)?;

        if user.password != current {
            return Err(ServiceError::WrongCurrentPassword);
        }
        user.password = new.to_string();
        Ok(())
    }

    // --- Events ---

    pub fn all_events(&self) -> Vec<Event> {
        self.events.clone()
    }

    pub fn event(&self, id: &str) -> ServiceResult<Event> {
        self.events
            .iter()
            .find(|e| e.id == id)
            .cloned()
            .ok_or(ServiceError::EventNotFound)
    }

    pub fn user_events(&self, user_id: &str) -> Vec<Event> {
        self.events
            .iter()
            .filter(|e| e.organizer.id == user_id)
            .cloned()
            .collect()
    }

    pub fn user_rsvps(&self, user_id: &str) -> Vec<Rsvp> {
        self.rsvps
            .iter()
            .filter(|r| r.user_id == user_id)
            .cloned()
            .collect()
    }

    pub fn create_event(&mut self, draft: EventDraft, organizer: Organizer) -> Event {
        let event = Event {
            id: seed::new_id(),
            title: draft.title,
            description: draft.description,
            starts_at: draft.starts_at,
            ends_at: draft.ends_at,
            location: draft.location,
            image_url: draft.image_url,
            organizer,
            capacity: draft.capacity,
            attendee_count: 0,
            category: draft.category,
            price: draft.price,
            tags: draft.tags,
        };
        info!(event_id = %event.id, title = %event.title, "created event");
        self.events.push(event.clone());
        event
    }

    /// Replace the editable fields. Id, organizer and attendee count are kept;
    /// capacity may drop below the current count.
    pub fn update_event(&mut self, id: &str, draft: EventDraft) -> ServiceResult<Event> {
        let event = self
            .events
            .iter_mut()
            .find(|e| e.id == id)
            .ok_or(ServiceError::EventNotFound)?;

        event.title = draft.title;
        event.description = draft.description;
        event.starts_at = draft.starts_at;
        event.ends_at = draft.ends_at;
        event.location = draft.location;
        event.image_url = draft.image_url;
        event.capacity = draft.capacity;
        event.category = draft.category;
        event.price = draft.price;
        event.tags = draft.tags;

        debug!(event_id = %id, "updated event");
        Ok(event.clone())
    }

    /// Remove an event along with every RSVP that points at it.
    pub fn delete_event(&mut self, id: &str) -> ServiceResult<()> {
        let index = self
            .events
            .iter()
            .position(|e| e.id == id)
            .ok_or(ServiceError::EventNotFound)?;

        self.events.remove(index);
        let before = self.rsvps.len();
        self.rsvps.retain(|r| r.event_id != id);
        info!(event_id = %id, removed_rsvps = before - self.rsvps.len(), "deleted event");
        Ok(())
    }

    // --- RSVPs ---

    pub fn rsvp(
        &mut self,
        event_id: &str,
        user_id: &str,
        details: RsvpDetails,
    ) -> ServiceResult<(Rsvp, Event)> {
        let event = self
            .events
            .iter_mut()
            .find(|e| e.id == event_id)
            .ok_or(ServiceError::EventNotFound)?;

        if self
            .rsvps
            .iter()
            .any(|r| r.event_id == event_id && r.user_id == user_id)
        {
            return Err(ServiceError::AlreadyRsvped);
        }

        if event.attendee_count >= event.capacity {
            return Err(ServiceError::CapacityReached);
        }

        let rsvp = Rsvp {
            id: seed::new_id(),
            event_id: event_id.to_string(),
            user_id: user_id.to_string(),
            status: RsvpStatus::Confirmed,
            ticket_number: seed::generate_ticket_number(),
            created_at: Utc::now(),
            details,
        };

        event.attendee_count += 1;
        let event = event.clone();
        info!(event_id, user_id, ticket = %rsvp.ticket_number, "rsvp confirmed");
        self.rsvps.push(rsvp.clone());

        Ok((rsvp, event))
    }

    pub fn cancel_rsvp(&mut self, rsvp_id: &str, event_id: &str) -> ServiceResult<Event> {
        let rsvp_index = self
            .rsvps
            .iter()
            .position(|r| r.id == rsvp_id)
            .ok_or(ServiceError::RsvpNotFound)?;

        let event = self
            .events
            .iter_mut()
            .find(|e| e.id == event_id)
            .ok_or(ServiceError::EventNotFound)?;

        event.attendee_count = event.attendee_count.saturating_sub(1);
        let event = event.clone();
        self.rsvps.remove(rsvp_index);
        info!(rsvp_id, event_id, "rsvp cancelled");

        Ok(event)
    }

    pub fn ticket(&self, id: &str) -> ServiceResult<Ticket> {
        let rsvp = self
            .rsvps
            .iter()
            .find(|r| r.id == id)
            .ok_or(ServiceError::TicketNotFound)?;

        let event = self
            .events
            .iter()
            .find(|e| e.id == rsvp.event_id)
            .ok_or(ServiceError::TicketEventMissing)?;

        Ok(Ticket {
            rsvp: rsvp.clone(),
            event: event.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::collections::BTreeSet;

    fn draft(capacity: u32) -> EventDraft {
        let start = NaiveDate::from_ymd_opt(2030, 1, 10)
            .and_then(|d| d.and_hms_opt(10, 0, 0))
            .unwrap();
        let end = NaiveDate::from_ymd_opt(2030, 1, 10)
            .and_then(|d| d.and_hms_opt(12, 0, 0))
            .unwrap();
        EventDraft {
            title: "Rust Meetup".into(),
            description: "An evening of talks about systems programming.".into(),
            starts_at: start,
            ends_at: end,
            location: "Hall B".into(),
            image_url: "https://example.com/rust.png".into(),
            capacity,
            category: "Technology".into(),
            price: 0.0,
            tags: BTreeSet::from(["rust".to_string()]),
        }
    }

    fn organizer() -> Organizer {
        Organizer { id: "1".into(), name: "John Doe".into() }
    }

    fn details(name: &str) -> RsvpDetails {
        RsvpDetails {
            name: name.into(),
            email: format!("{}@example.com", name),
            ..Default::default()
        }
    }

    #[test]
    fn test_login_errors() {
        let store = Backend::seeded();
        assert_eq!(
            store.login("nobody@example.com", "x").unwrap_err(),
            ServiceError::UserNotFound
        );
        assert_eq!(
            store.login("john@example.com", "wrong").unwrap_err(),
            ServiceError::InvalidPassword
        );
        let session = store.login("john@example.com", "password123").unwrap();
        assert_eq!(session.user.name, "John Doe");
        assert!(session.token.starts_with("mock-jwt-token-"));
    }

    #[test]
    fn test_register_rejects_duplicate_email() {
        let mut store = Backend::seeded();
        assert_eq!(
            store.register("Johnny", "john@example.com", "secret1").unwrap_err(),
            ServiceError::EmailTaken
        );
        let session = store.register("Ada", "ada@example.com", "secret1").unwrap();
        assert!(session.user.avatar_url.starts_with("https://i.pravatar.cc/150?img="));
        assert!(store.login("ada@example.com", "secret1").is_ok());
    }

    #[test]
    fn test_rsvp_increments_and_assigns_ticket() {
        let mut store = Backend::seeded();
        let (rsvp, event) = store.rsvp("3", "2", details("jane")).unwrap();
        assert_eq!(event.attendee_count, 144);
        assert_eq!(rsvp.status, RsvpStatus::Confirmed);
        assert!(rsvp.ticket_number.starts_with("TCKT-"));
        assert_eq!(store.event("3").unwrap().attendee_count, 144);
        assert_eq!(store.user_rsvps("2").len(), 1);
    }

    #[test]
    fn test_duplicate_rsvp_rejected() {
        let mut store = Backend::seeded();
        store.rsvp("1", "2", details("jane")).unwrap();
        let err = store.rsvp("1", "2", details("jane")).unwrap_err();
        assert_eq!(err, ServiceError::AlreadyRsvped);
        assert_eq!(err.to_string(), "You have already RSVP'd to this event");
        assert_eq!(store.event("1").unwrap().attendee_count, 321);
    }

    #[test]
    fn test_rsvp_rejected_at_capacity() {
        let mut store = Backend::empty();
        let event = store.create_event(draft(1), organizer());
        store.rsvp(&event.id, "a", details("a")).unwrap();
        let err = store.rsvp(&event.id, "b", details("b")).unwrap_err();
        assert_eq!(err, ServiceError::CapacityReached);
        assert_eq!(store.event(&event.id).unwrap().attendee_count, 1);
        assert!(store.user_rsvps("b").is_empty());
    }

    #[test]
    fn test_rsvp_unknown_event() {
        let mut store = Backend::seeded();
        assert_eq!(
            store.rsvp("missing", "1", details("x")).unwrap_err(),
            ServiceError::EventNotFound
        );
    }

    #[test]
    fn test_cancel_rsvp_decrements() {
        let mut store = Backend::seeded();
        let (rsvp, _) = store.rsvp("4", "1", details("john")).unwrap();
        let event = store.cancel_rsvp(&rsvp.id, "4").unwrap();
        assert_eq!(event.attendee_count, 42);
        assert!(store.user_rsvps("1").is_empty());
        assert_eq!(
            store.cancel_rsvp(&rsvp.id, "4").unwrap_err(),
            ServiceError::RsvpNotFound
        );
    }

    #[test]
    fn test_cancel_never_goes_negative() {
        let mut store = Backend::empty();
        let event = store.create_event(draft(5), organizer());
        let (rsvp, _) = store.rsvp(&event.id, "u", details("u")).unwrap();
        // An edit can't touch the count, so fake drift directly.
        store.events[0].attendee_count = 0;
        let event = store.cancel_rsvp(&rsvp.id, &event.id).unwrap();
        assert_eq!(event.attendee_count, 0);
    }

    #[test]
    fn test_delete_event_cascades_rsvps() {
        let mut store = Backend::seeded();
        let (rsvp, _) = store.rsvp("2", "1", details("john")).unwrap();
        store.rsvp("1", "1", details("john")).unwrap();
        store.delete_event("2").unwrap();

        assert_eq!(store.event("2").unwrap_err(), ServiceError::EventNotFound);
        assert_eq!(store.ticket(&rsvp.id).unwrap_err(), ServiceError::TicketNotFound);
        assert_eq!(store.user_rsvps("1").len(), 1);
        assert_eq!(store.delete_event("2").unwrap_err(), ServiceError::EventNotFound);
    }

    #[test]
    fn test_update_preserves_count_and_organizer() {
        let mut store = Backend::seeded();
        let mut edit = EventDraft::from_event(&store.event("1").unwrap());
        edit.title = "Tech Conference 2026".into();
        edit.capacity = 100;
        let updated = store.update_event("1", edit).unwrap();
        assert_eq!(updated.title, "Tech Conference 2026");
        assert_eq!(updated.attendee_count, 320);
        assert_eq!(updated.capacity, 100);
        assert_eq!(updated.organizer.id, "1");
        assert!(updated.is_full());
    }

    #[test]
    fn test_create_event_starts_empty() {
        let mut store = Backend::seeded();
        let event = store.create_event(draft(30), organizer());
        assert_eq!(event.attendee_count, 0);
        assert_eq!(store.user_events("1").len(), 3);
        assert_eq!(store.all_events().len(), 5);
    }

    #[test]
    fn test_ticket_lookup() {
        let mut store = Backend::seeded();
        let (rsvp, _) = store.rsvp("1", "2", details("jane")).unwrap();
        let ticket = store.ticket(&rsvp.id).unwrap();
        assert_eq!(ticket.event.id, "1");
        assert_eq!(ticket.rsvp.ticket_number, rsvp.ticket_number);
        assert_eq!(store.ticket("nope").unwrap_err(), ServiceError::TicketNotFound);
    }

    #[test]
    fn test_ticket_with_missing_event() {
        let mut store = Backend::seeded();
        let (rsvp, _) = store.rsvp("1", "2", details("jane")).unwrap();
        store.events.retain(|e| e.id != "1");
        assert_eq!(
            store.ticket(&rsvp.id).unwrap_err(),
            ServiceError::TicketEventMissing
        );
    }

    #[test]
    fn test_update_profile_renames_organizer() {
        let mut store = Backend::seeded();
        let user = store.update_profile("1", "Johnny Doe", "john@example.com").unwrap();
        assert_eq!(user.name, "Johnny Doe");
        assert!(store.user_events("1").iter().all(|e| e.organizer.name == "Johnny Doe"));
        assert_eq!(
            store.update_profile("1", "J", "jane@example.com").unwrap_err(),
            ServiceError::EmailTaken
        );
    }

    #[test]
    fn test_change_password() {
        let mut store = Backend::seeded();
        assert_eq!(
            store.change_password("2", "nope", "newpass").unwrap_err(),
            ServiceError::WrongCurrentPassword
        );
        store.change_password("2", "password123", "newpass").unwrap();
        assert!(store.login("jane@example.com", "newpass").is_ok());
    }
}
