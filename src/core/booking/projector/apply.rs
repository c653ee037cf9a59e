// Translate a slot event into booking read model mutations.
//
// Responsibilities
// - Upsert a full row on reservation, patch the status on lifecycle events.
// - Stamp last_event_id as "stream_id:version".

use crate::core::booking::confirmed::BookingStatus;
use crate::core::booking::{event::BookingEvent, projector::model::BookingRow};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mutation {
    Upsert(BookingRow),
    SetStatus {
        booking_id: String,
        status: BookingStatus,
        updated_at: i64,
        last_event_id: String,
    },
}

pub fn apply(stream_id: &str, version: i64, event: &BookingEvent) -> Vec<Mutation> {
    let stream_key = format!("{stream_id}:{version}");
    match event {
        BookingEvent::BookingReservedV1(details) => vec![Mutation::Upsert(BookingRow {
            booking_id: details.booking_id.clone(),
            stream_id: stream_id.to_string(),
            service_id: details.service_id.clone(),
            professional_id: details.professional_id.clone(),
            date: details.date,
            time: details.time,
            client: details.client.clone(),
            notes: details.notes.clone(),
            user_id: details.user_id.clone(),
            status: BookingStatus::Pending,
            reserved_at: details.reserved_at,
            updated_at: details.reserved_at,
            last_event_id: Some(stream_key),
        })],
        BookingEvent::BookingStatusChangedV1(change) => vec![Mutation::SetStatus {
            booking_id: change.booking_id.clone(),
            status: change.to,
            updated_at: change.changed_at,
            last_event_id: stream_key,
        }],
    }
}
