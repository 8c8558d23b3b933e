//! Async facade over the mock store.
//!
//! Each call waits out a fixed artificial delay, then runs one store
//! operation under a single lock acquisition.

use crate::api::error::{ServiceError, ServiceResult};
use crate::api::models::*;
use crate::api::store::Backend;
use crate::config::ApiConfig;
use std::sync::{Arc, Mutex};
use std::time::Duration;

#[derive(Debug, Clone, Copy)]
struct Latency {
    list: Duration,
    fetch: Duration,
    mutate: Duration,
    auth: Duration,
}

impl From<&ApiConfig> for Latency {
    fn from(cfg: &ApiConfig) -> Self {
        Self {
            list: Duration::from_millis(cfg.list_latency_ms),
            fetch: Duration::from_millis(cfg.fetch_latency_ms),
            mutate: Duration::from_millis(cfg.mutate_latency_ms),
            auth: Duration::from_millis(cfg.auth_latency_ms),
        }
    }
}

/// Cheap to clone; all clones share one [`Backend`].
#[derive(Debug, Clone)]
pub struct MockApi {
    backend: Arc<Mutex<Backend>>,
    latency: Latency,
}

impl MockApi {
    pub fn new(backend: Backend, config: &ApiConfig) -> Self {
        Self {
            backend: Arc::new(Mutex::new(backend)),
            latency: Latency::from(config),
        }
    }

    async fn call<T>(
        &self,
        delay: Duration,
        op: impl FnOnce(&mut Backend) -> ServiceResult<T>,
    ) -> ServiceResult<T> {
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        let mut backend = self.backend.lock().map_err(|_| ServiceError::Unavailable)?;
        op(&mut backend)
    }

    pub async fn login(&self, email: String, password: String) -> ServiceResult<AuthSession> {
        self.call(self.latency.auth, |b| b.login(&email, &password)).await
    }

    pub async fn register(
        &self,
        name: String,
        email: String,
        password: String,
    ) -> ServiceResult<AuthSession> {
        self.call(self.latency.auth, |b| b.register(&name, &email, &password))
            .await
    }

    pub async fn update_profile(
        &self,
        user_id: String,
        name: String,
        email: String,
    ) -> ServiceResult<PublicUser> {
        self.call(self.latency.mutate, |b| b.update_profile(&user_id, &name, &email))
            .await
    }

    pub async fn change_password(
        &self,
        user_id: String,
        current: String,
        new: String,
    ) -> ServiceResult<()> {
        self.call(self.latency.mutate, |b| b.change_password(&user_id, &current, &new))
            .await
    }

    pub async fn all_events(&self) -> ServiceResult<Vec<Event>> {
        self.call(self.latency.list, |b| Ok(b.all_events())).await
    }

    pub async fn event(&self, id: String) -> ServiceResult<Event> {
        self.call(self.latency.fetch, |b| b.event(&id)).await
    }

    pub async fn user_events(&self, user_id: String) -> ServiceResult<Vec<Event>> {
        self.call(self.latency.list, |b| Ok(b.user_events(&user_id))).await
    }

    pub async fn user_rsvps(&self, user_id: String) -> ServiceResult<Vec<Rsvp>> {
        self.call(self.latency.list, |b| Ok(b.user_rsvps(&user_id))).await
    }

    pub async fn create_event(
        &self,
        draft: EventDraft,
        organizer: Organizer,
    ) -> ServiceResult<Event> {
        self.call(self.latency.mutate, |b| Ok(b.create_event(draft, organizer)))
            .await
    }

    pub async fn update_event(&self, id: String, draft: EventDraft) -> ServiceResult<Event> {
        self.call(self.latency.mutate, |b| b.update_event(&id, draft)).await
    }

    pub async fn delete_event(&self, id: String) -> ServiceResult<()> {
        self.call(self.latency.mutate, |b| b.delete_event(&id)).await
    }

    pub async fn rsvp(
        &self,
        event_id: String,
        user_id: String,
        details: RsvpDetails,
    ) -> ServiceResult<(Rsvp, Event)> {
        self.call(self.latency.mutate, |b| b.rsvp(&event_id, &user_id, details))
            .await
    }

    pub async fn cancel_rsvp(&self, rsvp_id: String, event_id: String) -> ServiceResult<Event> {
        self.call(self.latency.mutate, |b| b.cancel_rsvp(&rsvp_id, &event_id))
            .await
    }

    pub async fn ticket(&self, id: String) -> ServiceResult<Ticket> {
        self.call(self.latency.fetch, |b| b.ticket(&id)).await
    }
}
