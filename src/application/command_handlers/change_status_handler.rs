// Lifecycle command handler: confirm, complete or cancel a booking.
//
// Responsibilities
// - Locate the slot stream of the booking through the read model.
// - Fold the stream, decide the status change, append with optimistic concurrency.
// - Project the change inline so the slot frees up for availability as soon as it is cancelled.

use crate::application::command_handlers::reserve_handler::project;
use crate::application::errors::ApplicationError;
use crate::application::projector::repository::{BookingProjectionRepository, WatermarkRepository};
use crate::application::projector::runner::Projector;
use crate::application::query_handlers::bookings_queries::BookingQueries;
use crate::core::booking::confirmed::ConfirmedBooking;
use crate::core::booking::decider::change_status::command::ChangeBookingStatus;
use crate::core::booking::decider::change_status::decide::decide_change_status;
use crate::core::booking::event::BookingEvent;
use crate::core::booking::evolve::evolve;
use crate::core::booking::state::SlotState;
use crate::core::ports::EventStore;
use std::sync::Arc;
use tracing::info;

pub struct ChangeBookingStatusHandler<TEventStore, TQueries, TRepository, TWatermarkRepository>
where
    TEventStore: EventStore<BookingEvent> + Send + Sync + 'static,
    TQueries: BookingQueries,
    TRepository: BookingProjectionRepository,
    TWatermarkRepository: WatermarkRepository,
{
    event_store: Arc<TEventStore>,
    queries: Arc<TQueries>,
    projector: Arc<Projector<TRepository, TWatermarkRepository>>,
}

impl<TEventStore, TQueries, TRepository, TWatermarkRepository>
    ChangeBookingStatusHandler<TEventStore, TQueries, TRepository, TWatermarkRepository>
where
    TEventStore: EventStore<BookingEvent> + Send + Sync + 'static,
    TQueries: BookingQueries,
    TRepository: BookingProjectionRepository,
    TWatermarkRepository: WatermarkRepository,
{
    pub fn new(
        event_store: Arc<TEventStore>,
        queries: Arc<TQueries>,
        projector: Arc<Projector<TRepository, TWatermarkRepository>>,
    ) -> Self {
        Self {
            event_store,
            queries,
            projector,
        }
    }

    pub async fn handle(&self, command: ChangeBookingStatus) -> Result<ConfirmedBooking, ApplicationError> {
        let view = self
            .queries
            .get_booking(&command.booking_id)
            .await
            .map_err(|err| ApplicationError::Unexpected(err.to_string()))?
            .ok_or_else(|| ApplicationError::NotFound(command.booking_id.clone()))?;
        let stream_id = view.slot_key().stream_id();

        let stream = self.event_store.load(&stream_id).await?;
        let state = stream.events.iter().cloned().fold(SlotState::Free, evolve);

        let booking_id = command.booking_id.clone();
        let target = command.status;
        let events = decide_change_status(&state, command)?;
        self.event_store
            .append(&stream_id, stream.version, &events)
            .await?;
        project(&self.projector, &stream_id, stream.version, &events).await;
        info!(%booking_id, status = %target, "booking status changed");

        let next = events.into_iter().fold(state, evolve);
        next.booking(&booking_id)
            .cloned()
            .ok_or(ApplicationError::NotFound(booking_id))
    }
}
