use crate::core::booking::confirmed::BookingStatus;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeBookingStatus {
    pub booking_id: String,
    pub status: BookingStatus,
    pub changed_at: i64,
}
