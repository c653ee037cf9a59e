// Root event enumeration for a slot stream and re-exports of versioned payloads.
//
// Versioning and evolution
// - Prefer additive changes. If a breaking change is needed, add a new version and a new variant.
// - Do not change the meaning of historical events.

pub mod v1 {
    pub mod booking_reserved;
    pub mod booking_status_changed;
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize, PartialEq, Eq)]
#[serde(tag = "type")]
pub enum BookingEvent {
    BookingReservedV1(v1::booking_reserved::BookingReservedV1),
    BookingStatusChangedV1(v1::booking_status_changed::BookingStatusChangedV1),
}

impl BookingEvent {
    pub fn booking_id(&self) -> &str {
        match self {
            BookingEvent::BookingReservedV1(e) => &e.booking_id,
            BookingEvent::BookingStatusChangedV1(e) => &e.booking_id,
        }
    }
}
