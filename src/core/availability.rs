// Availability resolution.
//
// Purpose
// - WorkingHours: the salon-wide slot grid and the date policy (closed weekday, booking horizon).
// - resolve_available_slots: pure reconciliation of a slot grid against reserved times and the clock.
//
// Boundaries
// - No input or output. Callers fetch the grid and the reserved times and pass them in.

use crate::core::client::{Field, ValidationError};
use crate::core::slot::TimeLabel;
use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime, Weekday};
use std::collections::BTreeSet;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkingHours {
    pub opening: NaiveTime,
    /// Last bookable label, inclusive.
    pub closing: NaiveTime,
    pub slot_minutes: u32,
    pub closed_weekday: Option<Weekday>,
    pub horizon_days: u32,
}

impl Default for WorkingHours {
    fn default() -> Self {
        Self {
            opening: NaiveTime::from_hms_opt(9, 0, 0).unwrap_or_default(),
            closing: NaiveTime::from_hms_opt(18, 0, 0).unwrap_or_default(),
            slot_minutes: 60,
            closed_weekday: Some(Weekday::Sun),
            horizon_days: 30,
        }
    }
}

impl WorkingHours {
    /// Full grid of labels for a weekday. Empty on the closed weekday.
    pub fn grid_for(&self, weekday: Weekday) -> Vec<TimeLabel> {
        if self.closed_weekday == Some(weekday) || self.slot_minutes == 0 {
            return Vec::new();
        }
        let step = Duration::minutes(i64::from(self.slot_minutes));
        let mut labels = Vec::new();
        let mut current = self.opening;
        while current <= self.closing {
            labels.push(TimeLabel::from(current));
            let (next, wrapped) = current.overflowing_add_signed(step);
            if wrapped != 0 || next <= current {
                break;
            }
            current = next;
        }
        labels
    }

    /// Dates offered to the client: `horizon_days` days starting today, minus the closed weekday.
    pub fn offered_dates(&self, today: NaiveDate) -> Vec<NaiveDate> {
        today
            .iter_days()
            .take(self.horizon_days as usize)
            .filter(|d| Some(d.weekday()) != self.closed_weekday)
            .collect()
    }

    pub fn check_date(&self, date: NaiveDate, today: NaiveDate) -> Result<(), ValidationError> {
        if date < today {
            return Err(ValidationError::single(Field::Date, "date is in the past"));
        }
        if Some(date.weekday()) == self.closed_weekday {
            return Err(ValidationError::single(
                Field::Date,
                "the salon is closed on that day",
            ));
        }
        let last = today + Duration::days(i64::from(self.horizon_days.saturating_sub(1)));
        if date > last {
            return Err(ValidationError::single(
                Field::Date,
                format!("bookings open at most {} days ahead", self.horizon_days),
            ));
        }
        Ok(())
    }
}

/// Bookable labels for one professional on one date.
///
/// Starts from `grid`, drops every label in `reserved`, and drops labels earlier than
/// `now + min_lead` (which empties past dates and trims today). The result is sorted,
/// deduplicated and always a subset of `grid`.
pub fn resolve_available_slots(
    grid: &[TimeLabel],
    reserved: &[TimeLabel],
    date: NaiveDate,
    now: NaiveDateTime,
    min_lead: Duration,
) -> Vec<TimeLabel> {
    let reserved: BTreeSet<TimeLabel> = reserved.iter().copied().collect();
    let earliest = now + min_lead;
    grid.iter()
        .copied()
        .filter(|label| !reserved.contains(label))
        .filter(|label| label.on(date) >= earliest)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}
