use crate::api::client::MockApi;
use crate::api::error::ServiceResult;
use crate::api::models::*;
use crate::app::event::AppEvent;
use tokio::sync::mpsc;
use tracing::debug;

/// A call the client wants made against the mock service.
#[derive(Debug, Clone)]
pub enum ApiRequest {
    Login { email: String, password: String },
    Register { name: String, email: String, password: String },
    UpdateProfile { user_id: String, name: String, email: String },
    ChangePassword { user_id: String, current: String, new: String },
    FetchEvents,
    FetchEvent { id: String },
    FetchUserEvents { user_id: String },
    FetchUserRsvps { user_id: String },
    CreateEvent { draft: EventDraft, organizer: Organizer },
    UpdateEvent { id: String, draft: EventDraft },
    DeleteEvent { id: String },
    Rsvp { event_id: String, user_id: String, details: RsvpDetails },
    CancelRsvp { rsvp_id: String, event_id: String },
    FetchTicket { id: String },
}

/// Outcome of an [`ApiRequest`], carrying whatever the handler needs to
/// patch its caches.
#[derive(Debug)]
pub enum ApiResponse {
    LoggedIn(ServiceResult<AuthSession>),
    Registered(ServiceResult<AuthSession>),
    ProfileUpdated(ServiceResult<PublicUser>),
    PasswordChanged(ServiceResult<()>),
    Events(ServiceResult<Vec<Event>>),
    Event { id: String, result: ServiceResult<Event> },
    UserEvents(ServiceResult<Vec<Event>>),
    UserRsvps(ServiceResult<Vec<Rsvp>>),
    EventCreated(ServiceResult<Event>),
    EventUpdated { id: String, result: ServiceResult<Event> },
    EventDeleted { id: String, result: ServiceResult<()> },
    Rsvped { event_id: String, result: ServiceResult<(Rsvp, Event)> },
    RsvpCancelled { rsvp_id: String, event_id: String, result: ServiceResult<Event> },
    Ticket { id: String, result: ServiceResult<Ticket> },
}

/// Runs requests against the mock service on background tasks and feeds the
/// results back into the event loop.
pub struct ApiManager {
    api: MockApi,
    event_tx: mpsc::UnboundedSender<AppEvent>,
}

impl ApiManager {
    pub fn new(api: MockApi, event_tx: mpsc::UnboundedSender<AppEvent>) -> Self {
        Self { api, event_tx }
    }

    pub fn dispatch(&self, request: ApiRequest) {
        debug!(?request, "dispatching api request");
        let api = self.api.clone();
        let tx = self.event_tx.clone();
        tokio::spawn(async move {
            let response = execute(&api, request).await;
            let _ = tx.send(AppEvent::Api(response));
        });
    }
}

/// Run one request to completion.
pub async fn execute(api: &MockApi, request: ApiRequest) -> ApiResponse {
    match request {
        ApiRequest::Login { email, password } => {
            ApiResponse::LoggedIn(api.login(email, password).await)
        }
        ApiRequest::Register { name, email, password } => {
            ApiResponse::Registered(api.register(name, email, password).await)
        }
        ApiRequest::UpdateProfile { user_id, name, email } => {
            ApiResponse::ProfileUpdated(api.update_profile(user_id, name, email).await)
        }
        ApiRequest::ChangePassword { user_id, current, new } => {
            ApiResponse::PasswordChanged(api.change_password(user_id, current, new).await)
        }
        ApiRequest::FetchEvents => ApiResponse::Events(api.all_events().await),
        ApiRequest::FetchEvent { id } => {
            let result = api.event(id.clone()).await;
            ApiResponse::Event { id, result }
        }
        ApiRequest::FetchUserEvents { user_id } => {
            ApiResponse::UserEvents(api.user_events(user_id).await)
        }
        ApiRequest::FetchUserRsvps { user_id } => {
            ApiResponse::UserRsvps(api.user_rsvps(user_id).await)
        }
        ApiRequest::CreateEvent { draft, organizer } => {
            ApiResponse::EventCreated(api.create_event(draft, organizer).await)
        }
        ApiRequest::UpdateEvent { id, draft } => {
            let result = api.update_event(id.clone(), draft).await;
            ApiResponse::EventUpdated { id, result }
        }
        ApiRequest::DeleteEvent { id } => {
            let result = api.delete_event(id.clone()).await;
            ApiResponse::EventDeleted { id, result }
        }
        ApiRequest::Rsvp { event_id, user_id, details } => {
            let result = api.rsvp(event_id.clone(), user_id, details).await;
            ApiResponse::Rsvped { event_id, result }
        }
        ApiRequest::CancelRsvp { rsvp_id, event_id } => {
            let result = api.cancel_rsvp(rsvp_id.clone(), event_id.clone()).await;
            ApiResponse::RsvpCancelled { rsvp_id, event_id, result }
        }
        ApiRequest::FetchTicket { id } => {
            let result = api.ticket(id.clone()).await;
            ApiResponse::Ticket { id, result }
        }
    }
}
