// Ports define what the core needs from the outside world, without implementing it.
//
// Purpose
// - Describe catalog reads, availability, the reservation authority, notifications, the clock
//   and event persistence as traits.
//
// Boundaries
// - No concrete input or output here. Adapters implement these traits.
//
// Testing guidance
// - In-memory implementations live in adapters::in_memory; the HTTP client in adapters::http.

use crate::core::booking::confirmed::ConfirmedBooking;
use crate::core::booking_flow::draft::CompleteBooking;
use crate::core::catalog::{Professional, Service};
use crate::core::client::ValidationError;
use crate::core::notification::BookingSummary;
use crate::core::slot::{SlotKey, TimeLabel};
use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    #[error("server unreachable: {0}")]
    Unreachable(String),

    #[error("request timed out")]
    Timeout,

    #[error("unexpected status {0}")]
    Status(u16),

    #[error("could not decode response: {0}")]
    Decode(String),

    #[error("backend error: {0}")]
    Backend(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommitError {
    #[error("slot {0} is already taken")]
    SlotTaken(SlotKey),

    /// The authority refused the booking itself. Nothing was stored.
    #[error("booking rejected: {0}")]
    Rejected(ValidationError),

    #[error(transparent)]
    Transport(#[from] TransportError),
}

#[async_trait]
pub trait CatalogSource: Send + Sync {
    async fn list_services(&self) -> Result<Vec<Service>, TransportError>;
    async fn list_professionals(&self) -> Result<Vec<Professional>, TransportError>;
}

#[async_trait]
pub trait AvailabilitySource: Send + Sync {
    async fn available_slots(
        &self,
        professional_id: &str,
        date: NaiveDate,
    ) -> Result<Vec<TimeLabel>, TransportError>;
}

/// The single authority on who holds a slot.
///
/// `commit` must check and insert atomically per (professional, date, time) across all callers.
#[async_trait]
pub trait ReservationCoordinator: Send + Sync {
    async fn commit(&self, booking: &CompleteBooking) -> Result<ConfirmedBooking, CommitError>;

    /// Active (non-cancelled) booking currently holding the slot, if any.
    async fn find_booking(&self, key: &SlotKey) -> Result<Option<ConfirmedBooking>, TransportError>;
}

#[async_trait]
pub trait BookingNotifier: Send + Sync {
    async fn send_booking_confirmation(&self, summary: &BookingSummary) -> anyhow::Result<()>;
}

#[async_trait]
pub trait WorkingHoursSource: Send + Sync {
    async fn grid_for(&self, professional_id: &str, date: NaiveDate) -> anyhow::Result<Vec<TimeLabel>>;
}

pub trait Clock: Send + Sync {
    fn now(&self) -> NaiveDateTime;

    fn today(&self) -> NaiveDate {
        self.now().date()
    }
}

#[derive(Debug, Error)]
pub enum EventStoreError {
    #[error("version mismatch: expected {expected}, actual {actual}")]
    VersionMismatch { expected: i64, actual: i64 },

    #[error("backend error: {0}")]
    Backend(String),
}

#[derive(Debug, Clone)]
pub struct LoadedStream<E> {
    pub events: Vec<E>,
    pub version: i64,
}

#[async_trait]
pub trait EventStore<Event: Clone + Send + Sync + 'static>: Send + Sync {
    async fn load(&self, stream_id: &str) -> Result<LoadedStream<Event>, EventStoreError>;
    async fn append(
        &self,
        stream_id: &str,
        expected_version: i64,
        new_events: &[Event],
    ) -> Result<(), EventStoreError>;
}
