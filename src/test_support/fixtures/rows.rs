use crate::core::booking::confirmed::BookingStatus;
use crate::core::booking::projector::model::BookingRow;
use crate::core::client::ClientContact;
use crate::core::slot::{SlotKey, TimeLabel};
use chrono::NaiveDate;

pub fn make_booking_row(
    booking_id: &str,
    professional_id: &str,
    date: NaiveDate,
    time: TimeLabel,
    status: BookingStatus,
) -> BookingRow {
    BookingRow {
        booking_id: booking_id.to_string(),
        stream_id: SlotKey::new(professional_id, date, time).stream_id(),
        service_id: "svc-haircut".to_string(),
        professional_id: professional_id.to_string(),
        date,
        time,
        client: ClientContact {
            name: "Juan Perez".to_string(),
            email: "juan@example.com".to_string(),
            phone: "+56 9 1234 5678".to_string(),
        },
        notes: None,
        user_id: None,
        status,
        reserved_at: 1_749_000_000_000,
        updated_at: 1_749_000_000_000,
        last_event_id: None,
    }
}
