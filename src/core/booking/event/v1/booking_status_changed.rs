// Event payload: BookingStatusChangedV1. Records a lifecycle move (confirm, complete, cancel).

use crate::core::booking::confirmed::BookingStatus;

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize, PartialEq, Eq)]
pub struct BookingStatusChangedV1 {
    pub booking_id: String,
    pub from: BookingStatus,
    pub to: BookingStatus,
    pub changed_at: i64,
}
