// Availability fetched for one (professional, date), with an explicit stale flag.
//
// Invariants
// - Slots are only served while the cache is fresh and keyed to the asked-for pair.
// - in_flight holds the generation of the outstanding fetch, if any.

use crate::core::slot::TimeLabel;
use chrono::NaiveDate;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotCache {
    key: Option<(String, NaiveDate)>,
    slots: Vec<TimeLabel>,
    stale: bool,
    in_flight: Option<u64>,
}

impl Default for SlotCache {
    fn default() -> Self {
        Self {
            key: None,
            slots: Vec::new(),
            stale: true,
            in_flight: None,
        }
    }
}

impl SlotCache {
    pub fn invalidate(&mut self) {
        self.key = None;
        self.slots.clear();
        self.stale = true;
        self.in_flight = None;
    }

    /// Invalidates unless the cache already holds the given pair.
    pub fn keep_only(&mut self, professional_id: Option<&str>, date: Option<NaiveDate>) {
        let matches = match (&self.key, professional_id, date) {
            (Some((pid, d)), Some(wanted_pid), Some(wanted_date)) => pid == wanted_pid && *d == wanted_date,
            _ => false,
        };
        if !matches {
            self.invalidate();
        }
    }

    pub fn is_fresh_for(&self, professional_id: &str, date: NaiveDate) -> bool {
        !self.stale
            && self
                .key
                .as_ref()
                .is_some_and(|(pid, d)| pid == professional_id && *d == date)
    }

    pub fn is_stale(&self) -> bool {
        self.stale
    }

    pub fn in_flight(&self) -> Option<u64> {
        self.in_flight
    }

    pub fn mark_in_flight(&mut self, generation: u64) {
        self.in_flight = Some(generation);
    }

    pub fn clear_in_flight(&mut self) {
        self.in_flight = None;
    }

    pub fn fill(&mut self, professional_id: &str, date: NaiveDate, slots: Vec<TimeLabel>) {
        self.key = Some((professional_id.to_string(), date));
        self.slots = slots;
        self.stale = false;
        self.in_flight = None;
    }

    pub fn slots(&self) -> &[TimeLabel] {
        &self.slots
    }
}
