// Pure decision function for reserving a slot.
//
// Responsibilities
// - Free slot, or a slot whose latest booking was cancelled: emit BookingReservedV1.
// - Slot held by a pending, confirmed or completed booking: reject with SlotTaken.
// - Never perform input or output.

use crate::core::booking::{
    confirmed::BookingStatus,
    decider::reserve::command::ReserveSlot,
    event::{BookingEvent, v1::booking_reserved::BookingReservedV1},
    state::SlotState,
};

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum DecideError {
    #[error("slot is already taken")]
    SlotTaken,

    #[error("booking not found")]
    BookingNotFound,

    #[error("cannot move booking from {from} to {to}")]
    InvalidTransition { from: BookingStatus, to: BookingStatus },
}

pub fn decide_reserve(state: &SlotState, command: ReserveSlot) -> Result<Vec<BookingEvent>, DecideError> {
    if state.active_booking().is_some() {
        return Err(DecideError::SlotTaken);
    }
    let event = BookingReservedV1 {
        booking_id: command.booking_id,
        service_id: command.service_id,
        professional_id: command.professional_id,
        date: command.date,
        time: command.time,
        client: command.client,
        notes: command.notes,
        user_id: command.user_id,
        reserved_at: command.reserved_at,
    };
    Ok(vec![BookingEvent::BookingReservedV1(event)])
}
