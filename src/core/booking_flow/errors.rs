use crate::core::booking_flow::draft::IncompleteBookingError;
use crate::core::booking_flow::step::Step;
use crate::core::client::ValidationError;
use crate::core::ports::TransportError;
use crate::core::slot::SlotKey;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FlowError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Incomplete(#[from] IncompleteBookingError),

    #[error("slot {0} was taken by another booking")]
    SlotConflict(SlotKey),

    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error("operation belongs to step {expected}, flow is at {actual}")]
    WrongStep { expected: Step, actual: Step },

    #[error("unknown or inactive selection: {0}")]
    UnknownSelection(String),

    #[error("availability has not been fetched for the selected professional and date")]
    AvailabilityStale,

    #[error("a request for this step is already in flight")]
    Busy,

    #[error("result arrived after the flow moved on")]
    Superseded,
}

impl FlowError {
    /// Text suitable for showing to the client.
    pub fn user_message(&self) -> String {
        match self {
            FlowError::Validation(err) => err
                .errors
                .values()
                .cloned()
                .collect::<Vec<_>>()
                .join(". "),
            FlowError::SlotConflict(_) => {
                "That time was just taken. Please pick another time.".to_string()
            }
            FlowError::Transport(_) => {
                "Could not reach the server. Please try again.".to_string()
            }
            FlowError::AvailabilityStale => "Loading available times.".to_string(),
            FlowError::Busy => "Please wait, your request is being processed.".to_string(),
            FlowError::Incomplete(_)
            | FlowError::WrongStep { .. }
            | FlowError::UnknownSelection(_)
            | FlowError::Superseded => "Something went wrong. Please start your booking again.".to_string(),
        }
    }
}
