// Evolve function: combine a prior slot state with a new event to produce the next state.
//
// Boundaries
// - No input or output. No side effects.

use crate::core::booking::confirmed::{BookingStatus, ConfirmedBooking};
use crate::core::booking::event::BookingEvent;
use crate::core::booking::state::SlotState;

pub fn evolve(state: SlotState, event: BookingEvent) -> SlotState {
    match (state, event) {
        (_, BookingEvent::BookingReservedV1(e)) => SlotState::Booked(ConfirmedBooking {
            id: e.booking_id,
            service_id: e.service_id,
            professional_id: e.professional_id,
            date: e.date,
            time: e.time,
            client: e.client,
            notes: e.notes,
            user_id: e.user_id,
            status: BookingStatus::Pending,
        }),
        (SlotState::Booked(mut booking), BookingEvent::BookingStatusChangedV1(e))
            if booking.id == e.booking_id =>
        {
            booking.status = e.to;
            SlotState::Booked(booking)
        }
        (state, _) => state,
    }
}
