// Command data type for reserving a slot.
//
// Responsibilities
// - Carry a complete booking plus the identifiers and timestamp assigned by the authority.
// - Stay independent of the transport (HTTP or in-process).

use crate::core::client::ClientContact;
use crate::core::slot::{SlotKey, TimeLabel};
use chrono::NaiveDate;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReserveSlot {
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

impl ReserveSlot {
    pub fn slot_key(&self) -> SlotKey {
        SlotKey::new(self.professional_id.clone(), self.date, self.time)
    }
}
