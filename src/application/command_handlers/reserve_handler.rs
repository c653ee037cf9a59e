// Reservation command handler: the single authority on who holds a slot.
//
// Responsibilities
// - As a coordinator, check the booking policy first when one is attached. A refused booking
//   never reaches the event store.
// - Load the slot stream for (professional, date, time) and fold it into state.
// - Call the decider with the command.
// - Append new events with optimistic concurrency. Two commits racing on one slot append
//   at the same expected version; the loser gets VersionMismatch and reports SlotTaken.
// - Project appended events inline. A projection failure is logged, never undoes the commit.

use crate::application::booking_policy::BookingPolicy;
use crate::application::errors::ApplicationError;
use crate::application::projector::repository::{BookingProjectionRepository, WatermarkRepository};
use crate::application::projector::runner::Projector;
use crate::core::booking::confirmed::ConfirmedBooking;
use crate::core::booking::decider::reserve::command::ReserveSlot;
use crate::core::booking::decider::reserve::decide::{DecideError, decide_reserve};
use crate::core::booking::event::BookingEvent;
use crate::core::booking::evolve::evolve;
use crate::core::booking::state::SlotState;
use crate::core::booking_flow::draft::CompleteBooking;
use crate::core::ports::{
    CommitError, EventStore, EventStoreError, ReservationCoordinator, TransportError,
};
use crate::core::slot::SlotKey;
use async_trait::async_trait;
use chrono::Utc;
use std::sync::Arc;
use tracing::{debug, info, warn};
use uuid::Uuid;

pub struct ReserveSlotHandler<TEventStore, TRepository, TWatermarkRepository>
where
    TEventStore: EventStore<BookingEvent> + Send + Sync + 'static,
    TRepository: BookingProjectionRepository,
    TWatermarkRepository: WatermarkRepository,
{
    event_store: Arc<TEventStore>,
    projector: Arc<Projector<TRepository, TWatermarkRepository>>,
    policy: Option<Arc<BookingPolicy>>,
}

impl<TEventStore, TRepository, TWatermarkRepository>
    ReserveSlotHandler<TEventStore, TRepository, TWatermarkRepository>
where
    TEventStore: EventStore<BookingEvent> + Send + Sync + 'static,
    TRepository: BookingProjectionRepository,
    TWatermarkRepository: WatermarkRepository,
{
    pub fn new(
        event_store: Arc<TEventStore>,
        projector: Arc<Projector<TRepository, TWatermarkRepository>>,
    ) -> Self {
        Self {
            event_store,
            projector,
            policy: None,
        }
    }

    pub fn with_policy(mut self, policy: Arc<BookingPolicy>) -> Self {
        self.policy = Some(policy);
        self
    }

    pub async fn handle(&self, command: ReserveSlot) -> Result<ConfirmedBooking, ApplicationError> {
        let stream_id = command.slot_key().stream_id();
        let stream = self.event_store.load(&stream_id).await?;
        let state = stream.events.iter().cloned().fold(SlotState::Free, evolve);

        let events = decide_reserve(&state, command)?;
        self.event_store
            .append(&stream_id, stream.version, &events)
            .await?;
        project(&self.projector, &stream_id, stream.version, &events).await;

        events
            .into_iter()
            .fold(state, evolve)
            .active_booking()
            .cloned()
            .ok_or_else(|| ApplicationError::Unexpected("reserved slot has no booking".into()))
    }

    /// Active booking currently holding the slot, read from the slot stream itself.
    pub async fn current_holder(&self, key: &SlotKey) -> Result<Option<ConfirmedBooking>, ApplicationError> {
        let stream = self.event_store.load(&key.stream_id()).await?;
        Ok(stream
            .events
            .into_iter()
            .fold(SlotState::Free, evolve)
            .active_booking()
            .cloned())
    }
}

/// Feed appended events to the projector, numbering them after `base_version`.
pub(crate) async fn project<TRepository, TWatermarkRepository>(
    projector: &Projector<TRepository, TWatermarkRepository>,
    stream_id: &str,
    base_version: i64,
    events: &[BookingEvent],
) where
    TRepository: BookingProjectionRepository,
    TWatermarkRepository: WatermarkRepository,
{
    for (offset, event) in events.iter().enumerate() {
        let version = base_version + offset as i64 + 1;
        if let Err(err) = projector.apply_one(stream_id, version, event).await {
            warn!(stream_id, version, error = %err, "projection failed, read model is behind");
        }
    }
}

#[async_trait]
impl<TEventStore, TRepository, TWatermarkRepository> ReservationCoordinator
    for ReserveSlotHandler<TEventStore, TRepository, TWatermarkRepository>
where
    TEventStore: EventStore<BookingEvent> + Send + Sync + 'static,
    TRepository: BookingProjectionRepository,
    TWatermarkRepository: WatermarkRepository,
{
    async fn commit(&self, booking: &CompleteBooking) -> Result<ConfirmedBooking, CommitError> {
        let key = booking.slot_key();
        if let Some(policy) = &self.policy {
            policy.check(booking).await?;
        }
        let command = ReserveSlot {
            booking_id: Uuid::now_v7().to_string(),
            service_id: booking.service_id.clone(),
            professional_id: booking.professional_id.clone(),
            date: booking.date,
            time: booking.time,
            client: booking.client.clone(),
            notes: booking.notes.clone(),
            user_id: booking.user_id.clone(),
            reserved_at: Utc::now().timestamp_millis(),
        };
        match self.handle(command).await {
            Ok(confirmed) => {
                info!(booking_id = %confirmed.id, slot = %key, "slot reserved");
                Ok(confirmed)
            }
            Err(ApplicationError::Domain(DecideError::SlotTaken))
            | Err(ApplicationError::EventStore(EventStoreError::VersionMismatch { .. })) => {
                debug!(slot = %key, "reservation lost the slot");
                Err(CommitError::SlotTaken(key))
            }
            Err(err) => Err(CommitError::Transport(TransportError::Backend(err.to_string()))),
        }
    }

    async fn find_booking(&self, key: &SlotKey) -> Result<Option<ConfirmedBooking>, TransportError> {
        self.current_holder(key)
            .await
            .map_err(|err| TransportError::Backend(err.to_string()))
    }
}
