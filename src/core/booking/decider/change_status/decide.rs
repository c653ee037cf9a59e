// Pure decision function for booking lifecycle moves (confirm, complete, cancel).

use crate::core::booking::{
    decider::{change_status::command::ChangeBookingStatus, reserve::decide::DecideError},
    event::{BookingEvent, v1::booking_status_changed::BookingStatusChangedV1},
    state::SlotState,
};

pub fn decide_change_status(
    state: &SlotState,
    command: ChangeBookingStatus,
) -> Result<Vec<BookingEvent>, DecideError> {
    let booking = state
        .booking(&command.booking_id)
        .ok_or(DecideError::BookingNotFound)?;
    if !booking.status.can_transition_to(command.status) {
        return Err(DecideError::InvalidTransition {
            from: booking.status,
            to: command.status,
        });
    }
    Ok(vec![BookingEvent::BookingStatusChangedV1(BookingStatusChangedV1 {
        booking_id: command.booking_id,
        from: booking.status,
        to: command.status,
        changed_at: command.changed_at,
    })])
}
