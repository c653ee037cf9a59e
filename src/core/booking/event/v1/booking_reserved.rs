// Event payload: BookingReservedV1.
//
// Purpose
// - Record that a slot was reserved for a client. The booking starts out pending.
//
// Timestamps
// - reserved_at is epoch milliseconds.

use chrono::NaiveDate;

use crate::core::client::ClientContact;
use crate::core::slot::TimeLabel;

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize, PartialEq, Eq)]
pub struct BookingReservedV1 {
    pub booking_id: String,
    pub service_id: String,
    pub professional_id: String,
    pub date: NaiveDate,
    pub time: TimeLabel,
    pub client: ClientContact,
    pub notes: Option<String>,
    pub user_id: Option<String>,
    pub reserved_at: i64,
}
