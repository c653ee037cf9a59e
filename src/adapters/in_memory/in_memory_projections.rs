// In memory booking projection repository, watermark repository and query side.
//
// Purpose
// - Exercise projectors and serve lookups without a database.
//
// Responsibilities
// - Store booking rows keyed by booking id.
// - Track the last processed event per projector.

use crate::application::projector::repository::{BookingProjectionRepository, WatermarkRepository};
use crate::application::query_handlers::bookings_queries::{BookingQueries, BookingView};
use crate::core::booking::confirmed::BookingStatus;
use crate::core::booking::projector::model::BookingRow;
use crate::core::slot::TimeLabel;
use chrono::NaiveDate;
use std::collections::HashMap;
use tokio::sync::RwLock;

#[derive(Default)]
pub struct InMemoryProjections {
    rows: RwLock<HashMap<String, BookingRow>>,
    watermark: RwLock<HashMap<String, String>>,
    is_offline: bool,
}

impl InMemoryProjections {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn toggle_offline(&mut self) {
        self.is_offline = !self.is_offline;
    }

    fn ensure_online(&self, what: &str) -> anyhow::Result<()> {
        if self.is_offline {
            return Err(anyhow::anyhow!("{what} offline"));
        }
        Ok(())
    }

    async fn select<F>(&self, filter: F) -> anyhow::Result<Vec<BookingView>>
    where
        F: Fn(&BookingRow) -> bool,
    {
        self.ensure_online("Projections repository")?;
        let guard = self.rows.read().await;
        let mut items: Vec<BookingRow> = guard.values().filter(|row| filter(row)).cloned().collect();
        items.sort_by(|a, b| {
            (a.date, a.time, &a.professional_id, a.reserved_at)
                .cmp(&(b.date, b.time, &b.professional_id, b.reserved_at))
        });
        Ok(items.into_iter().map(BookingView::from).collect())
    }
}

#[async_trait::async_trait]
impl BookingProjectionRepository for InMemoryProjections {
    async fn upsert(&self, row: BookingRow) -> anyhow::Result<()> {
        self.ensure_online("Projections repository")?;
        self.rows.write().await.insert(row.booking_id.clone(), row);
        Ok(())
    }

    async fn set_status(
        &self,
        booking_id: &str,
        status: BookingStatus,
        updated_at: i64,
        last_event_id: &str,
    ) -> anyhow::Result<()> {
        self.ensure_online("Projections repository")?;
        let mut guard = self.rows.write().await;
        let row = guard
            .get_mut(booking_id)
            .ok_or_else(|| anyhow::anyhow!("booking row {booking_id} not projected"))?;
        row.status = status;
        row.updated_at = updated_at;
        row.last_event_id = Some(last_event_id.to_string());
        Ok(())
    }
}

#[async_trait::async_trait]
impl WatermarkRepository for InMemoryProjections {
    async fn get(&self, name: &str) -> anyhow::Result<Option<String>> {
        self.ensure_online("Watermark repository")?;
        Ok(self.watermark.read().await.get(name).cloned())
    }

    async fn set(&self, name: &str, last: &str) -> anyhow::Result<()> {
        self.ensure_online("Watermark repository")?;
        self.watermark
            .write()
            .await
            .insert(name.to_string(), last.to_string());
        Ok(())
    }
}

#[async_trait::async_trait]
impl BookingQueries for InMemoryProjections {
    async fn get_booking(&self, booking_id: &str) -> anyhow::Result<Option<BookingView>> {
        self.ensure_online("Projections repository")?;
        Ok(self
            .rows
            .read()
            .await
            .get(booking_id)
            .cloned()
            .map(BookingView::from))
    }

    async fn list_by_date(&self, date: NaiveDate) -> anyhow::Result<Vec<BookingView>> {
        self.select(|row| row.date == date).await
    }

    async fn list_by_professional(&self, professional_id: &str) -> anyhow::Result<Vec<BookingView>> {
        self.select(|row| row.professional_id == professional_id).await
    }

    async fn reserved_times(
        &self,
        professional_id: &str,
        date: NaiveDate,
    ) -> anyhow::Result<Vec<TimeLabel>> {
        let views = self
            .select(|row| row.professional_id == professional_id && row.date == date && row.status.is_active())
            .await?;
        Ok(views.into_iter().map(|view| view.time).collect())
    }
}
