// Read model row for a single booking, with last_event_id for idempotency.
//
// Purpose
// - Fast lookups by booking id, date and professional without replaying slot streams.
// - stream_id points back to the slot stream so commands can find the aggregate.

use crate::core::booking::confirmed::{BookingStatus, ConfirmedBooking};
use crate::core::client::ClientContact;
use crate::core::slot::TimeLabel;
use chrono::NaiveDate;

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct BookingRow {
    pub booking_id: String,
    pub stream_id: String,
    pub service_id: String,
    pub professional_id: String,
    pub date: NaiveDate,
    pub time: TimeLabel,
    pub client: ClientContact,
    pub notes: Option<String>,
    pub user_id: Option<String>,
    pub status: BookingStatus,
    pub reserved_at: i64,
    pub updated_at: i64,
    pub last_event_id: Option<String>,
}

impl From<BookingRow> for ConfirmedBooking {
    fn from(row: BookingRow) -> Self {
        ConfirmedBooking {
            id: row.booking_id,
            service_id: row.service_id,
            professional_id: row.professional_id,
            date: row.date,
            time: row.time,
            client: row.client,
            notes: row.notes,
            user_id: row.user_id,
            status: row.status,
        }
    }
}
