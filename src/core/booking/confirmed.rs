// A booking committed by the reservation authority, and its status lifecycle.
//
// Lifecycle
// - pending -> confirmed -> completed
// - pending | confirmed -> cancelled
// - completed and cancelled are terminal.

use crate::core::client::ClientContact;
use crate::core::slot::{SlotKey, TimeLabel};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BookingStatus {
    Pending,
    Confirmed,
    Completed,
    Cancelled,
}

impl BookingStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, BookingStatus::Completed | BookingStatus::Cancelled)
    }

    /// Holds the slot: anything but cancelled.
    pub fn is_active(&self) -> bool {
        !matches!(self, BookingStatus::Cancelled)
    }

    pub fn can_transition_to(&self, next: BookingStatus) -> bool {
        use BookingStatus::*;
        matches!(
            (self, next),
            (Pending, Confirmed) | (Confirmed, Completed) | (Pending, Cancelled) | (Confirmed, Cancelled)
        )
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            BookingStatus::Pending => "pending",
            BookingStatus::Confirmed => "confirmed",
            BookingStatus::Completed => "completed",
            BookingStatus::Cancelled => "cancelled",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfirmedBooking {
    pub id: String,
    pub service_id: String,
    pub professional_id: String,
    pub date: NaiveDate,
    pub time: TimeLabel,
    pub client: ClientContact,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub user_id: Option<String>,
    pub status: BookingStatus,
}

impl ConfirmedBooking {
    pub fn slot_key(&self) -> SlotKey {
        SlotKey::new(self.professional_id.clone(), self.date, self.time)
    }
}
