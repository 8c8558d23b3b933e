use crate::api::manager::ApiRequest;
use crate::session::Session;

/// Side effects requested by the handler and carried out by the main loop.
#[derive(Debug, Clone)]
pub enum Action {
    Api(ApiRequest),
    SaveSession(Session),
    ClearSession,
    Quit,
}
