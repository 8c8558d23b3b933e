//! Browsing over the cached event list: filtering, ordering, paging, and the
//! home-page selections.

use crate::api::models::Event;
use chrono::{NaiveDate, NaiveDateTime};
use std::cmp::Ordering;

pub const DEFAULT_MAX_PRICE: f64 = 500.0;

/// Category tiles on the home view, in display order.
pub const CATEGORY_TILES: &[(&str, &str)] = &[
    ("Technology", "💻"),
    ("Music", "🎵"),
    ("Business", "💼"),
    ("Health", "🧘"),
    ("Arts", "🎨"),
    ("Sports", "⚽"),
];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortOrder {
    #[default]
    DateAsc,
    DateDesc,
    PriceAsc,
    PriceDesc,
}

impl SortOrder {
    pub fn from_key(key: &str) -> Option<Self> {
        match key.to_lowercase().as_str() {
            "date" | "date-asc" => Some(SortOrder::DateAsc),
            "date-desc" => Some(SortOrder::DateDesc),
            "price" | "price-asc" => Some(SortOrder::PriceAsc),
            "price-desc" => Some(SortOrder::PriceDesc),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            SortOrder::DateAsc => "Date (earliest)",
            SortOrder::DateDesc => "Date (latest)",
            SortOrder::PriceAsc => "Price (low to high)",
            SortOrder::PriceDesc => "Price (high to low)",
        }
    }

    pub fn next(self) -> Self {
        match self {
            SortOrder::DateAsc => SortOrder::DateDesc,
            SortOrder::DateDesc => SortOrder::PriceAsc,
            SortOrder::PriceAsc => SortOrder::PriceDesc,
            SortOrder::PriceDesc => SortOrder::DateAsc,
        }
    }

    fn compare(self, a: &Event, b: &Event) -> Ordering {
        match self {
            SortOrder::DateAsc => a.starts_at.cmp(&b.starts_at),
            SortOrder::DateDesc => b.starts_at.cmp(&a.starts_at),
            SortOrder::PriceAsc => a.price.total_cmp(&b.price),
            SortOrder::PriceDesc => b.price.total_cmp(&a.price),
        }
    }
}

/// Active filters of the events listing.
#[derive(Debug, Clone, PartialEq)]
pub struct EventQuery {
    pub search: String,
    pub category: Option<String>,
    pub date: Option<NaiveDate>,
    pub min_price: f64,
    pub max_price: f64,
    pub sort: SortOrder,
}

impl Default for EventQuery {
    fn default() -> Self {
        Self {
            search: String::new(),
            category: None,
            date: None,
            min_price: 0.0,
            max_price: DEFAULT_MAX_PRICE,
            sort: SortOrder::default(),
        }
    }
}

impl EventQuery {
    pub fn matches(&self, event: &Event) -> bool {
        let needle = self.search.trim().to_lowercase();
        if !needle.is_empty()
            && !event.title.to_lowercase().contains(&needle)
            && !event.description.to_lowercase().contains(&needle)
            && !event.location.to_lowercase().contains(&needle)
        {
            return false;
        }
        if let Some(category) = &self.category {
            if &event.category != category {
                return false;
            }
        }
        if let Some(date) = self.date {
            if event.starts_at.date() != date {
                return false;
            }
        }
        event.price >= self.min_price && event.price <= self.max_price
    }

    /// Matching events in the selected order. Ties keep list order.
    pub fn apply<'a>(&self, events: &'a [Event]) -> Vec<&'a Event> {
        let mut out: Vec<&Event> = events.iter().filter(|e| self.matches(e)).collect();
        out.sort_by(|a, b| self.sort.compare(a, b));
        out
    }

    pub fn is_filtered(&self) -> bool {
        !self.search.trim().is_empty()
            || self.category.is_some()
            || self.date.is_some()
            || self.min_price > 0.0
            || self.max_price < DEFAULT_MAX_PRICE
    }
}

/// One page of a result list. Pages are 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageInfo {
    pub page: usize,
    pub total_pages: usize,
    pub total: usize,
    /// Index range into the full result list.
    pub start: usize,
    pub end: usize,
}

impl PageInfo {
    /// The requested page is clamped to the valid range.
    pub fn new(total: usize, per_page: usize, page: usize) -> Self {
        let per_page = per_page.max(1);
        let total_pages = total.div_ceil(per_page).max(1);
        let page = page.clamp(1, total_pages);
        let start = ((page - 1) * per_page).min(total);
        let end = (start + per_page).min(total);
        Self {
            page,
            total_pages,
            total,
            start,
            end,
        }
    }

    /// "Showing a-b of n".
    pub fn summary(&self) -> String {
        if self.total == 0 {
            return "Showing 0 of 0 events".to_string();
        }
        format!("Showing {}-{} of {} events", self.start + 1, self.end, self.total)
    }

    pub fn slice<'a, T>(&self, items: &'a [T]) -> &'a [T] {
        &items[self.start.min(items.len())..self.end.min(items.len())]
    }
}

/// Distinct categories in first-seen order.
pub fn categories(events: &[Event]) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for event in events {
        if !out.iter().any(|c| c == &event.category) {
            out.push(event.category.clone());
        }
    }
    out
}

/// The event closest to selling out.
pub fn featured(events: &[Event]) -> Option<&Event> {
    events.iter().fold(None, |best: Option<&Event>, e| match best {
        Some(b) if b.fill_ratio() >= e.fill_ratio() => Some(b),
        _ => Some(e),
    })
}

/// Up to `limit` events starting after `now`, soonest first.
pub fn upcoming(events: &[Event], now: NaiveDateTime, limit: usize) -> Vec<&Event> {
    let mut out: Vec<&Event> = events.iter().filter(|e| e.starts_at > now).collect();
    out.sort_by_key(|e| e.starts_at);
    out.truncate(limit);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::seed::seed_events;

    fn at(y: i32, m: u32, d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .unwrap()
    }

    fn ids(events: &[&Event]) -> Vec<String> {
        events.iter().map(|e| e.id.clone()).collect()
    }

    #[test]
    fn test_default_query_sorts_by_date() {
        let events = seed_events();
        let result = EventQuery::default().apply(&events);
        assert_eq!(ids(&result), ["1", "3", "4", "2"]);
    }

    #[test]
    fn test_search_is_case_insensitive_over_fields() {
        let events = seed_events();
        let query = EventQuery {
            search: "SAN FRANCISCO".into(),
            ..Default::default()
        };
        assert_eq!(ids(&query.apply(&events)), ["1"]);

        let query = EventQuery {
            search: "Venture".into(),
            ..Default::default()
        };
        assert_eq!(ids(&query.apply(&events)), ["3"]);
    }

    #[test]
    fn test_category_date_and_price_filters() {
        let events = seed_events();
        let query = EventQuery {
            category: Some("Music".into()),
            ..Default::default()
        };
        assert_eq!(ids(&query.apply(&events)), ["2"]);

        let query = EventQuery {
            date: NaiveDate::from_ymd_opt(2025, 4, 25),
            ..Default::default()
        };
        assert_eq!(ids(&query.apply(&events)), ["3"]);

        let query = EventQuery {
            min_price: 100.0,
            max_price: 200.0,
            ..Default::default()
        };
        assert_eq!(ids(&query.apply(&events)), ["1", "2"]);
        assert!(query.is_filtered());
        assert!(!EventQuery::default().is_filtered());
    }

    #[test]
    fn test_sort_orders() {
        let events = seed_events();
        let by = |sort| EventQuery { sort, ..Default::default() };
        assert_eq!(ids(&by(SortOrder::DateDesc).apply(&events)), ["2", "4", "3", "1"]);
        assert_eq!(ids(&by(SortOrder::PriceAsc).apply(&events)), ["3", "2", "1", "4"]);
        assert_eq!(ids(&by(SortOrder::PriceDesc).apply(&events)), ["4", "1", "2", "3"]);
    }

    #[test]
    fn test_page_info() {
        let info = PageInfo::new(30, 12, 1);
        assert_eq!((info.start, info.end, info.total_pages), (0, 12, 3));
        assert_eq!(info.summary(), "Showing 1-12 of 30 events");

        let last = PageInfo::new(30, 12, 3);
        assert_eq!(last.summary(), "Showing 25-30 of 30 events");

        let clamped = PageInfo::new(30, 12, 9);
        assert_eq!(clamped.page, 3);

        let empty = PageInfo::new(0, 12, 4);
        assert_eq!((empty.page, empty.total_pages), (1, 1));
        assert_eq!(empty.summary(), "Showing 0 of 0 events");
        let items: Vec<u8> = Vec::new();
        assert!(empty.slice(&items).is_empty());
    }

    #[test]
    fn test_categories_first_seen() {
        let mut events = seed_events();
        events.push(events[0].clone());
        assert_eq!(categories(&events), ["Technology", "Music", "Business", "Health"]);
    }

    #[test]
    fn test_featured_and_upcoming() {
        let events = seed_events();
        // 42/50 is the fullest seed event.
        assert_eq!(featured(&events).map(|e| e.id.as_str()), Some("4"));
        assert!(featured(&[]).is_none());

        let soon = upcoming(&events, at(2025, 5, 1), 4);
        assert_eq!(ids(&soon), ["4", "2"]);
        assert_eq!(upcoming(&events, at(2025, 1, 1), 2).len(), 2);
        assert!(upcoming(&events, at(2026, 1, 1), 4).is_empty());
    }

    #[test]
    fn test_sort_keys() {
        assert_eq!(SortOrder::from_key("price"), Some(SortOrder::PriceAsc));
        assert_eq!(SortOrder::from_key("date-asc"), Some(SortOrder::DateAsc));
        assert_eq!(SortOrder::from_key("x"), None);
        assert_eq!(SortOrder::PriceDesc.next(), SortOrder::DateAsc);
    }
}
