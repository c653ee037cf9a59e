// Read side of the reservation authority, served from the booking projection.
//
// Purpose
// - Abstract data access so that different storage backends can implement it.

use crate::core::booking::confirmed::{BookingStatus, ConfirmedBooking};
use crate::core::booking::projector::model::BookingRow;
use crate::core::client::ClientContact;
use crate::core::slot::{SlotKey, TimeLabel};
use async_trait::async_trait;
use chrono::NaiveDate;

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct BookingView {
    pub booking_id: String,
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
}

impl BookingView {
    pub fn slot_key(&self) -> SlotKey {
        SlotKey::new(self.professional_id.clone(), self.date, self.time)
    }
}

impl From<BookingRow> for BookingView {
    fn from(row: BookingRow) -> Self {
        Self {
            booking_id: row.booking_id,
            service_id: row.service_id,
            professional_id: row.professional_id,
            date: row.date,
            time: row.time,
            client: row.client,
            notes: row.notes,
            user_id: row.user_id,
            status: row.status,
            reserved_at: row.reserved_at,
            updated_at: row.updated_at,
        }
    }
}

impl From<BookingView> for ConfirmedBooking {
    fn from(view: BookingView) -> Self {
        Self {
            id: view.booking_id,
            service_id: view.service_id,
            professional_id: view.professional_id,
            date: view.date,
            time: view.time,
            client: view.client,
            notes: view.notes,
            user_id: view.user_id,
            status: view.status,
        }
    }
}

#[async_trait]
pub trait BookingQueries: Send + Sync {
    async fn get_booking(&self, booking_id: &str) -> anyhow::Result<Option<BookingView>>;

    /// Every booking on a date, ordered by time then professional.
    async fn list_by_date(&self, date: NaiveDate) -> anyhow::Result<Vec<BookingView>>;

    /// Every booking of a professional, ordered by date and time.
    async fn list_by_professional(&self, professional_id: &str) -> anyhow::Result<Vec<BookingView>>;

    /// Times held by non-cancelled bookings.
    async fn reserved_times(
        &self,
        professional_id: &str,
        date: NaiveDate,
    ) -> anyhow::Result<Vec<TimeLabel>>;
}
