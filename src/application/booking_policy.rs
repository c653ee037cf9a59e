// Booking policy checked by the reservation authority before a slot is reserved.
//
// Purpose
// - Reject bookings the flow would never produce: unknown service, unknown or inactive
//   professional, a date outside the working-hours policy, a time off the professional's grid
//   or earlier than now plus the minimum lead.
//
// Notes
// - Every problem is reported per field in one ValidationError. Source failures are transport
//   errors, never rejections.

use crate::core::availability::WorkingHours;
use crate::core::booking_flow::draft::CompleteBooking;
use crate::core::client::{Field, ValidationError};
use crate::core::ports::{CatalogSource, Clock, CommitError, TransportError, WorkingHoursSource};
use chrono::Duration;
use std::sync::Arc;
use tracing::{debug, error};

pub struct BookingPolicy {
    catalog: Arc<dyn CatalogSource>,
    grid: Arc<dyn WorkingHoursSource>,
    hours: WorkingHours,
    clock: Arc<dyn Clock>,
    min_lead: Duration,
}

impl BookingPolicy {
    pub fn new(
        catalog: Arc<dyn CatalogSource>,
        grid: Arc<dyn WorkingHoursSource>,
        hours: WorkingHours,
        clock: Arc<dyn Clock>,
        min_lead: Duration,
    ) -> Self {
        Self {
            catalog,
            grid,
            hours,
            clock,
            min_lead,
        }
    }

    pub async fn check(&self, booking: &CompleteBooking) -> Result<(), CommitError> {
        let mut problems = ValidationError::default();

        let services = self.catalog.list_services().await?;
        if !services.iter().any(|s| s.id == booking.service_id) {
            problems.merge(ValidationError::single(
                Field::Service,
                format!("unknown service {}", booking.service_id),
            ));
        }
        let professionals = self.catalog.list_professionals().await?;
        if !professionals
            .iter()
            .any(|p| p.id == booking.professional_id && p.active)
        {
            problems.merge(ValidationError::single(
                Field::Professional,
                format!("unknown or inactive professional {}", booking.professional_id),
            ));
        }

        let now = self.clock.now();
        match self.hours.check_date(booking.date, now.date()) {
            Err(date_problem) => problems.merge(date_problem),
            Ok(()) => {
                let grid = self
                    .grid
                    .grid_for(&booking.professional_id, booking.date)
                    .await
                    .map_err(|err| {
                        error!(error = %err, professional_id = %booking.professional_id, "working hours lookup failed");
                        TransportError::Backend(err.to_string())
                    })?;
                if !grid.contains(&booking.time) {
                    problems.merge(ValidationError::single(
                        Field::Time,
                        format!("{} is not a bookable time", booking.time),
                    ));
                } else if booking.time.on(booking.date) < now + self.min_lead {
                    problems.merge(ValidationError::single(
                        Field::Time,
                        format!("{} is too soon to book", booking.time),
                    ));
                }
            }
        }

        if problems.is_empty() {
            return Ok(());
        }
        debug!(slot = %booking.slot_key(), %problems, "booking refused by policy");
        Err(CommitError::Rejected(problems))
    }
}
