use thiserror::Error;

/// Failures reported by the mock service. Every variant is terminal for the
/// attempted call; the display text is shown to the user as-is.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ServiceError {
    #[error("User not found")]
    UserNotFound,
    #[error("Invalid password")]
    InvalidPassword,
    #[error("Email already registered")]
    EmailTaken,
    #[error("Current password is incorrect")]
    WrongCurrentPassword,
    #[error("Event not found")]
    EventNotFound,
    #[error("You have already RSVP'd to this event")]
    AlreadyRsvped,
    #[error("This event has reached its capacity")]
    CapacityReached,
    #[error("RSVP not found")]
    RsvpNotFound,
    #[error("Ticket not found")]
    TicketNotFound,
    #[error("Associated event not found")]
    TicketEventMissing,
    #[error("Mock service unavailable")]
    Unavailable,
}

pub type ServiceResult<T> = Result<T, ServiceError>;
