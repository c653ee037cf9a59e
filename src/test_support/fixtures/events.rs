// Shared test fixture for BookingReservedV1.

use crate::core::booking::event::v1::booking_reserved::BookingReservedV1;
use crate::test_support::fixtures::commands::ReserveSlotBuilder;

/// Builder function returning a canonical event instance for tests.
pub fn make_booking_reserved_v1_event() -> BookingReservedV1 {
    let command = ReserveSlotBuilder::new().build();
    BookingReservedV1 {
        booking_id: command.booking_id,
        service_id: command.service_id,
        professional_id: command.professional_id,
        date: command.date,
        time: command.time,
        client: command.client,
        notes: command.notes,
        user_id: command.user_id,
        reserved_at: command.reserved_at,
    }
}
