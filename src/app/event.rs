use crate::api::manager::ApiResponse;
use crossterm::event::Event as CrosstermEvent;

#[derive(Debug)]
pub enum AppEvent {
    /// Terminal input event
    Terminal(CrosstermEvent),

    /// A mock service call finished
    Api(ApiResponse),

    /// Tick for UI refresh
    Tick,
}
