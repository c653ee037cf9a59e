// Repository traits for projection persistence and projector watermark tracking.
//
// Purpose
// - BookingProjectionRepository: upsert booking rows and patch their status.
// - WatermarkRepository: track the last processed event for idempotency.

use crate::core::booking::confirmed::BookingStatus;
use crate::core::booking::projector::model::BookingRow;
use async_trait::async_trait;

#[async_trait]
pub trait BookingProjectionRepository: Send + Sync {
    async fn upsert(&self, row: BookingRow) -> anyhow::Result<()>;
    async fn set_status(
        &self,
        booking_id: &str,
        status: BookingStatus,
        updated_at: i64,
        last_event_id: &str,
    ) -> anyhow::Result<()>;
}

#[async_trait]
pub trait WatermarkRepository: Send + Sync {
    async fn get(&self, name: &str) -> anyhow::Result<Option<String>>;
    async fn set(&self, name: &str, last: &str) -> anyhow::Result<()>;
}
