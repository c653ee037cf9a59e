// In memory working hours: the salon-wide grid plus per-professional overrides by weekday.
//
// An override replaces the grid for that weekday, the closed weekday included.

use crate::core::availability::WorkingHours;
use crate::core::ports::WorkingHoursSource;
use crate::core::slot::TimeLabel;
use async_trait::async_trait;
use chrono::{Datelike, NaiveDate, Weekday};
use std::collections::HashMap;
use tokio::sync::RwLock;

pub struct InMemoryWorkingHours {
    default: WorkingHours,
    overrides: RwLock<HashMap<(String, Weekday), Vec<TimeLabel>>>,
    is_offline: bool,
}

impl InMemoryWorkingHours {
    pub fn new(default: WorkingHours) -> Self {
        Self {
            default,
            overrides: RwLock::new(HashMap::new()),
            is_offline: false,
        }
    }

    /// Salon-wide policy the grid is derived from.
    pub fn defaults(&self) -> &WorkingHours {
        &self.default
    }

    pub fn toggle_offline(&mut self) {
        self.is_offline = !self.is_offline;
    }

    pub async fn set_override(&self, professional_id: &str, weekday: Weekday, labels: Vec<TimeLabel>) {
        self.overrides
            .write()
            .await
            .insert((professional_id.to_string(), weekday), labels);
    }
}

#[async_trait]
impl WorkingHoursSource for InMemoryWorkingHours {
    async fn grid_for(&self, professional_id: &str, date: NaiveDate) -> anyhow::Result<Vec<TimeLabel>> {
        if self.is_offline {
            return Err(anyhow::anyhow!("Working hours offline"));
        }
        let key = (professional_id.to_string(), date.weekday());
        if let Some(labels) = self.overrides.read().await.get(&key) {
            return Ok(labels.clone());
        }
        Ok(self.default.grid_for(date.weekday()))
    }
}
