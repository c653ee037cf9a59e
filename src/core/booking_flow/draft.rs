// Working record of one booking session, and the payload handed to the reservation authority.

use crate::core::client::ClientContact;
use crate::core::slot::{SlotKey, TimeLabel};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DraftBooking {
    pub service_id: Option<String>,
    pub professional_id: Option<String>,
    pub date: Option<NaiveDate>,
    pub time: Option<TimeLabel>,
    pub client_name: Option<String>,
    pub client_email: Option<String>,
    pub client_phone: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("booking is incomplete, missing: {}", .missing.join(", "))]
pub struct IncompleteBookingError {
    pub missing: Vec<&'static str>,
}

impl DraftBooking {
    pub fn is_empty(&self) -> bool {
        *self == DraftBooking::default()
    }

    pub fn set_client(&mut self, contact: ClientContact) {
        self.client_name = Some(contact.name);
        self.client_email = Some(contact.email);
        self.client_phone = Some(contact.phone);
    }

    /// Every field a confirmed booking needs, or the list of what is missing.
    pub fn complete(&self, user_id: Option<&str>) -> Result<CompleteBooking, IncompleteBookingError> {
        let mut missing = Vec::new();
        if is_blank(&self.service_id) {
            missing.push("service_id");
        }
        if is_blank(&self.professional_id) {
            missing.push("professional_id");
        }
        if self.date.is_none() {
            missing.push("date");
        }
        if self.time.is_none() {
            missing.push("time");
        }
        if is_blank(&self.client_name) {
            missing.push("client_name");
        }
        if is_blank(&self.client_email) {
            missing.push("client_email");
        }
        if is_blank(&self.client_phone) {
            missing.push("client_phone");
        }

        match (
            &self.service_id,
            &self.professional_id,
            self.date,
            self.time,
            &self.client_name,
            &self.client_email,
            &self.client_phone,
        ) {
            (Some(service_id), Some(professional_id), Some(date), Some(time), Some(name), Some(email), Some(phone))
                if missing.is_empty() =>
            {
                Ok(CompleteBooking {
                    service_id: service_id.clone(),
                    professional_id: professional_id.clone(),
                    date,
                    time,
                    client: ClientContact {
                        name: name.clone(),
                        email: email.clone(),
                        phone: phone.clone(),
                    },
                    notes: self.notes.clone(),
                    user_id: user_id.map(str::to_string),
                })
            }
            _ => Err(IncompleteBookingError { missing }),
        }
    }
}

fn is_blank(value: &Option<String>) -> bool {
    value.as_deref().is_none_or(|v| v.trim().is_empty())
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompleteBooking {
    pub service_id: String,
    pub professional_id: String,
    pub date: NaiveDate,
    pub time: TimeLabel,
    pub client: ClientContact,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub user_id: Option<String>,
}

impl CompleteBooking {
    pub fn slot_key(&self) -> SlotKey {
        SlotKey::new(self.professional_id.clone(), self.date, self.time)
    }
}
