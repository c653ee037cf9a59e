// Keeps the booking read model in step with the slot streams.
//
// A reservation inserts a booking row and a status change patches the row it names. After
// the rows, the watermark under the projector's name moves to "stream_id:version".

use crate::application::projector::repository::{BookingProjectionRepository, WatermarkRepository};
use crate::core::booking::event::BookingEvent;
use crate::core::booking::projector::apply::{Mutation, apply};
use std::sync::Arc;
use tracing::debug;

pub struct Projector<TRepository, TWatermarkRepository>
where
    TRepository: BookingProjectionRepository,
    TWatermarkRepository: WatermarkRepository,
{
    pub name: String,
    pub repository: Arc<TRepository>,
    pub watermark_repository: Arc<TWatermarkRepository>,
}

impl<TRepository, TWatermarkRepository> Projector<TRepository, TWatermarkRepository>
where
    TRepository: BookingProjectionRepository,
    TWatermarkRepository: WatermarkRepository,
{
    pub fn new(
        name: impl Into<String>,
        repository: Arc<TRepository>,
        watermark: Arc<TWatermarkRepository>,
    ) -> Self {
        Self {
            name: name.into(),
            repository,
            watermark_repository: watermark,
        }
    }

    pub async fn apply_one(
        &self,
        stream_id: &str,
        version: i64,
        event: &BookingEvent,
    ) -> anyhow::Result<()> {
        for mutation in apply(stream_id, version, event) {
            match mutation {
                Mutation::Upsert(row) => self.repository.upsert(row).await?,
                Mutation::SetStatus {
                    booking_id,
                    status,
                    updated_at,
                    last_event_id,
                } => {
                    self.repository
                        .set_status(&booking_id, status, updated_at, &last_event_id)
                        .await?
                }
            }
        }
        self.watermark_repository
            .set(&self.name, &format!("{stream_id}:{version}"))
            .await?;
        debug!(projector = %self.name, stream_id, version, "booking event projected");
        Ok(())
    }
}

#[cfg(test)]
mod booking_projector_runner_tests {
    use super::*;
    use crate::adapters::in_memory::in_memory_projections::InMemoryProjections;
    use crate::application::query_handlers::bookings_queries::BookingQueries;
    use crate::core::booking::confirmed::BookingStatus;
    use crate::core::booking::event::v1::booking_reserved::BookingReservedV1;
    use crate::core::booking::event::v1::booking_status_changed::BookingStatusChangedV1;
    use crate::test_support::fixtures::events::make_booking_reserved_v1_event;
    use rstest::{fixture, rstest};

    const STREAM: &str = "Slot-pro-alex-2025-06-10-14:00";

    #[fixture]
    fn before_each() -> (BookingReservedV1, InMemoryProjections) {
        (make_booking_reserved_v1_event(), InMemoryProjections::new())
    }

    #[rstest]
    #[tokio::test]
    async fn it_should_apply_mutations_to_the_repository(
        before_each: (BookingReservedV1, InMemoryProjections),
    ) {
        let (event, store) = before_each;
        let store = Arc::new(store);
        let projector = Projector::new("bookings", store.clone(), store.clone());
        projector
            .apply_one(STREAM, 1, &BookingEvent::BookingReservedV1(event.clone()))
            .await
            .expect("InMemoryProjections > upsert failed");
        assert_eq!(
            store.get("bookings").await.unwrap(),
            Some(format!("{STREAM}:1"))
        );
        let view = store.get_booking(&event.booking_id).await.unwrap().unwrap();
        assert_eq!(view.status, BookingStatus::Pending);
    }

    #[rstest]
    #[tokio::test]
    async fn it_should_patch_the_status_of_a_projected_booking(
        before_each: (BookingReservedV1, InMemoryProjections),
    ) {
        let (event, store) = before_each;
        let store = Arc::new(store);
        let projector = Projector::new("bookings", store.clone(), store.clone());
        projector
            .apply_one(STREAM, 1, &BookingEvent::BookingReservedV1(event.clone()))
            .await
            .unwrap();
        let change = BookingStatusChangedV1 {
            booking_id: event.booking_id.clone(),
            from: BookingStatus::Pending,
            to: BookingStatus::Cancelled,
            changed_at: event.reserved_at + 1,
        };
        projector
            .apply_one(STREAM, 2, &BookingEvent::BookingStatusChangedV1(change))
            .await
            .unwrap();
        let view = store.get_booking(&event.booking_id).await.unwrap().unwrap();
        assert_eq!(view.status, BookingStatus::Cancelled);
        assert_eq!(view.updated_at, event.reserved_at + 1);
    }

    #[rstest]
    #[tokio::test]
    async fn it_should_fail_if_the_repository_is_offline(
        before_each: (BookingReservedV1, InMemoryProjections),
    ) {
        let (event, mut store) = before_each;
        store.toggle_offline();
        let store = Arc::new(store);
        let projector = Projector::new("bookings", store.clone(), store);
        let result = projector
            .apply_one(STREAM, 1, &BookingEvent::BookingReservedV1(event))
            .await;
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("Projections repository offline"));
    }

    #[rstest]
    #[tokio::test]
    async fn it_should_fail_if_the_watermark_repository_is_offline(
        before_each: (BookingReservedV1, InMemoryProjections),
    ) {
        let (event, store) = before_each;
        let mut watermark_repository = InMemoryProjections::new();
        watermark_repository.toggle_offline();
        let projector = Projector::new(
            "bookings",
            Arc::new(store),
            Arc::new(watermark_repository),
        );
        let result = projector
            .apply_one(STREAM, 1, &BookingEvent::BookingReservedV1(event))
            .await;
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("Watermark repository offline"));
    }
}
