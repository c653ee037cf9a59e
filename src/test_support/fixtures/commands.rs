// Shared test fixtures for the ReserveSlot command and the complete booking a flow commits.
// The canonical values live in commands/json/reserve_slot.json.

use crate::core::booking::decider::reserve::command::ReserveSlot;
use crate::core::booking_flow::draft::CompleteBooking;
use crate::core::client::ClientContact;
use crate::core::slot::TimeLabel;
use chrono::NaiveDate;
use serde::Deserialize;
use std::fs;

// JSON -> DTO (transport shape)
#[derive(Debug, Clone, Deserialize)]
pub struct ReserveSlotDto {
    pub booking_id: String,
    pub service_id: String,
    pub professional_id: String,
    pub date: NaiveDate,
    pub time: TimeLabel,
    pub client: ClientContact,
}

fn load_dto() -> ReserveSlotDto {
    let json_str = fs::read_to_string("./src/test_support/fixtures/commands/json/reserve_slot.json").unwrap();
    serde_json::from_str(&json_str).unwrap()
}

pub struct ReserveSlotBuilder {
    inner: ReserveSlot,
}

impl Default for ReserveSlotBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[allow(dead_code)]
impl ReserveSlotBuilder {
    pub fn new() -> Self {
        let dto = load_dto();
        Self {
            inner: ReserveSlot {
                booking_id: dto.booking_id,
                service_id: dto.service_id,
                professional_id: dto.professional_id,
                date: dto.date,
                time: dto.time,
                client: dto.client,
                notes: None,
                user_id: None,
                reserved_at: 1_749_000_000_000,
            },
        }
    }

    pub fn booking_id(mut self, v: impl Into<String>) -> Self {
        self.inner.booking_id = v.into();
        self
    }

    pub fn professional_id(mut self, v: impl Into<String>) -> Self {
        self.inner.professional_id = v.into();
        self
    }

    pub fn time(mut self, v: TimeLabel) -> Self {
        self.inner.time = v;
        self
    }

    pub fn notes(mut self, v: impl Into<String>) -> Self {
        self.inner.notes = Some(v.into());
        self
    }

    pub fn user_id(mut self, v: impl Into<String>) -> Self {
        self.inner.user_id = Some(v.into());
        self
    }

    pub fn build(self) -> ReserveSlot {
        self.inner
    }
}

/// The booking a finished flow would hand to the coordinator for the canonical slot.
pub fn make_complete_booking() -> CompleteBooking {
    let dto = load_dto();
    CompleteBooking {
        service_id: dto.service_id,
        professional_id: dto.professional_id,
        date: dto.date,
        time: dto.time,
        client: dto.client,
        notes: None,
        user_id: None,
    }
}
