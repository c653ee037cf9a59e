// SlotState is the state of one slot stream after folding its events.
//
// Notes
// - A slot keeps only its latest booking. A cancelled booking no longer holds the slot,
//   so a later reservation replaces it.

use crate::core::booking::confirmed::ConfirmedBooking;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SlotState {
    #[default]
    Free,
    Booked(ConfirmedBooking),
}

impl SlotState {
    /// Booking that currently holds the slot.
    pub fn active_booking(&self) -> Option<&ConfirmedBooking> {
        match self {
            SlotState::Booked(booking) if booking.status.is_active() => Some(booking),
            _ => None,
        }
    }

    pub fn booking(&self, booking_id: &str) -> Option<&ConfirmedBooking> {
        match self {
            SlotState::Booked(booking) if booking.id == booking_id => Some(booking),
            _ => None,
        }
    }
}
