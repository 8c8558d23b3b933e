//! Seed records and random identifiers for the mock store.
//!
//! Ticket numbers take the form `TCKT-NNNNNN` with six random digits; new
//! accounts get a random pravatar avatar.

use crate::api::models::{Event, Organizer, User};
use chrono::{NaiveDate, NaiveDateTime};
use rand::RngExt;
use std::collections::BTreeSet;

/// Generate a ticket number like `TCKT-482913`.
pub fn generate_ticket_number() -> String {
    let mut rng = rand::rng();
    let num: u32 = rng.random_range(100_000..1_000_000);
    format!("TCKT-{}", num)
}

/// Random avatar for a freshly registered user.
pub fn random_avatar_url() -> String {
    let mut rng = rand::rng();
    let img: u8 = rng.random_range(0..70);
    format!("https://i.pravatar.cc/150?img={}", img)
}

pub fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

pub fn new_token() -> String {
    format!("mock-jwt-token-{}", uuid::Uuid::new_v4())
}

pub fn seed_users() -> Vec<User> {
    vec![
        User {
            id: "1".into(),
            name: "John Doe".into(),
            email: "john@example.com".into(),
            password: "password123".into(),
            avatar_url: "https://i.pravatar.cc/150?img=1".into(),
        },
        User {
            id: "2".into(),
            name: "Jane Smith".into(),
            email: "jane@example.com".into(),
            password: "password123".into(),
            avatar_url: "https://i.pravatar.cc/150?img=5".into(),
        },
    ]
}

fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, m, d)
        .and_then(|date| date.and_hms_opt(h, min, 0))
        .unwrap_or_default()
}

fn tags(list: &[&str]) -> BTreeSet<String> {
    list.iter().map(|t| t.to_string()).collect()
}

pub fn seed_events() -> Vec<Event> {
    vec![
        Event {
            id: "1".into(),
            title: "Tech Conference 2025".into(),
            description: "Join us for the biggest tech conference of the year, featuring keynotes \
                          from industry leaders, hands-on workshops, and networking opportunities."
                .into(),
            starts_at: at(2025, 3, 15, 9, 0),
            ends_at: at(2025, 3, 17, 18, 0),
            location: "San Francisco Convention Center".into(),
            image_url: "https://images.unsplash.com/photo-1540575467063-178a50c2df87".into(),
            organizer: Organizer { id: "1".into(), name: "John Doe".into() },
            capacity: 500,
            attendee_count: 320,
            category: "Technology".into(),
            price: 199.99,
            tags: tags(&["tech", "conference", "networking"]),
        },
        Event {
            id: "2".into(),
            title: "Summer Music Festival".into(),
            description: "Experience three days of amazing music across five stages with over 40 \
                          artists. Camping options available."
                .into(),
            starts_at: at(2025, 7, 10, 12, 0),
            ends_at: at(2025, 7, 12, 23, 0),
            location: "Riverfront Park".into(),
            image_url: "https://images.unsplash.com/photo-1470229722913-7c0e2dbbafd3".into(),
            organizer: Organizer { id: "2".into(), name: "Jane Smith".into() },
            capacity: 5000,
            attendee_count: 2100,
            category: "Music".into(),
            price: 149.50,
            tags: tags(&["music", "festival", "summer"]),
        },
        Event {
            id: "3".into(),
            title: "Startup Pitch Night".into(),
            description: "Watch 10 promising startups pitch their ideas to a panel of venture \
                          capitalists. Networking reception to follow."
                .into(),
            starts_at: at(2025, 4, 25, 18, 0),
            ends_at: at(2025, 4, 25, 21, 30),
            location: "Innovation Hub".into(),
            image_url: "https://images.unsplash.com/photo-1551818255-e6e10975bc17".into(),
            organizer: Organizer { id: "1".into(), name: "John Doe".into() },
            capacity: 200,
            attendee_count: 143,
            category: "Business".into(),
            price: 0.0,
            tags: tags(&["startup", "pitch", "networking"]),
        },
        Event {
            id: "4".into(),
            title: "Wellness Retreat".into(),
            description: "A weekend of yoga, meditation, and mindfulness workshops led by \
                          certified instructors. All levels welcome."
                .into(),
            starts_at: at(2025, 5, 20, 8, 0),
            ends_at: at(2025, 5, 22, 17, 0),
            location: "Mountain View Resort".into(),
            image_url: "https://images.unsplash.com/photo-1545205597-3d9d02c29597".into(),
            organizer: Organizer { id: "2".into(), name: "Jane Smith".into() },
            capacity: 50,
            attendee_count: 42,
            category: "Health".into(),
            price: 299.99,
            tags: tags(&["wellness", "yoga", "retreat"]),
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ticket_number_format() {
        for _ in 0..50 {
            let t = generate_ticket_number();
            let digits = t.strip_prefix("TCKT-").unwrap();
            assert_eq!(digits.len(), 6);
            let n: u32 = digits.parse().unwrap();
            assert!((100_000..1_000_000).contains(&n));
        }
    }

    #[test]
    fn test_seed_counts_within_capacity() {
        for event in seed_events() {
            assert!(event.attendee_count <= event.capacity, "{}", event.title);
            assert!(event.starts_at < event.ends_at, "{}", event.title);
        }
    }

    #[test]
    fn test_seed_organizers_exist() {
        let users = seed_users();
        for event in seed_events() {
            let user = users.iter().find(|u| u.id == event.organizer.id).unwrap();
            assert_eq!(user.name, event.organizer.name);
        }
    }
}
