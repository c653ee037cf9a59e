use crate::core::booking::decider::reserve::decide::DecideError;
use crate::core::ports::EventStoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApplicationError {
    #[error(transparent)]
    EventStore(#[from] EventStoreError),

    #[error("domain rejected: {0}")]
    Domain(#[from] DecideError),

    #[error("booking {0} not found")]
    NotFound(String),

    #[error("unexpected: {0}")]
    Unexpected(String),
}
