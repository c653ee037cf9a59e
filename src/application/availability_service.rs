// Availability served by the reservation authority.
//
// Purpose
// - Combine the professional's slot grid, the reserved times from the read model and the clock
//   into the bookable labels for one date.
//
// Notes
// - The result is advisory. Only the reserve handler decides who gets a slot.

use crate::application::query_handlers::bookings_queries::BookingQueries;
use crate::core::availability::resolve_available_slots;
use crate::core::ports::{AvailabilitySource, Clock, TransportError, WorkingHoursSource};
use crate::core::slot::{Slot, SlotKey, TimeLabel};
use async_trait::async_trait;
use chrono::{Duration, NaiveDate};
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::error;

pub struct AvailabilityService<TQueries, THours>
where
    TQueries: BookingQueries,
    THours: WorkingHoursSource,
{
    queries: Arc<TQueries>,
    hours: Arc<THours>,
    clock: Arc<dyn Clock>,
    min_lead: Duration,
}

impl<TQueries, THours> AvailabilityService<TQueries, THours>
where
    TQueries: BookingQueries,
    THours: WorkingHoursSource,
{
    pub fn new(queries: Arc<TQueries>, hours: Arc<THours>, clock: Arc<dyn Clock>, min_lead: Duration) -> Self {
        Self {
            queries,
            hours,
            clock,
            min_lead,
        }
    }

    pub async fn available_slots(&self, professional_id: &str, date: NaiveDate) -> anyhow::Result<Vec<TimeLabel>> {
        let grid = self.hours.grid_for(professional_id, date).await?;
        let reserved = self.queries.reserved_times(professional_id, date).await?;
        Ok(resolve_available_slots(
            &grid,
            &reserved,
            date,
            self.clock.now(),
            self.min_lead,
        ))
    }

    /// The whole grid for the date, each label flagged with whether it can still be booked.
    pub async fn slot_board(&self, professional_id: &str, date: NaiveDate) -> anyhow::Result<Vec<Slot>> {
        let grid: BTreeSet<TimeLabel> = self
            .hours
            .grid_for(professional_id, date)
            .await?
            .into_iter()
            .collect();
        let open: BTreeSet<TimeLabel> = self
            .available_slots(professional_id, date)
            .await?
            .into_iter()
            .collect();
        Ok(grid
            .into_iter()
            .map(|time| Slot {
                key: SlotKey::new(professional_id, date, time),
                available: open.contains(&time),
            })
            .collect())
    }
}

#[async_trait]
impl<TQueries, THours> AvailabilitySource for AvailabilityService<TQueries, THours>
where
    TQueries: BookingQueries,
    THours: WorkingHoursSource,
{
    async fn available_slots(&self, professional_id: &str, date: NaiveDate) -> Result<Vec<TimeLabel>, TransportError> {
        AvailabilityService::available_slots(self, professional_id, date)
            .await
            .map_err(|err| {
                error!(professional_id, %date, error = %err, "availability lookup failed");
                TransportError::Backend(err.to_string())
            })
    }
}
