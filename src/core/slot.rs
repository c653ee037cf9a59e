// Slot value types.
//
// Purpose
// - TimeLabel: a time-of-day label such as "14:00", ordered by time of day.
// - SlotKey: the (professional, date, time) tuple a booking occupies.
// - Slot: a key plus an availability flag, used transiently when presenting choices.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid time label '{0}', expected HH:MM")]
pub struct TimeLabelError(pub String);

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimeLabel(NaiveTime);

impl TimeLabel {
    pub fn new(hour: u32, minute: u32) -> Option<Self> {
        NaiveTime::from_hms_opt(hour, minute, 0).map(Self)
    }

    pub fn time(&self) -> NaiveTime {
        self.0
    }

    pub fn on(&self, date: NaiveDate) -> NaiveDateTime {
        date.and_time(self.0)
    }
}

impl From<NaiveTime> for TimeLabel {
    fn from(value: NaiveTime) -> Self {
        // Labels are minute-granular.
        Self(value.with_second(0).and_then(|t| t.with_nanosecond(0)).unwrap_or(value))
    }
}

impl FromStr for TimeLabel {
    type Err = TimeLabelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NaiveTime::parse_from_str(s.trim(), "%H:%M")
            .map(Self)
            .map_err(|_| TimeLabelError(s.to_string()))
    }
}

impl fmt::Display for TimeLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%H:%M"))
    }
}

impl Serialize for TimeLabel {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for TimeLabel {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SlotKey {
    pub professional_id: String,
    pub date: NaiveDate,
    pub time: TimeLabel,
}

impl SlotKey {
    pub fn new(professional_id: impl Into<String>, date: NaiveDate, time: TimeLabel) -> Self {
        Self {
            professional_id: professional_id.into(),
            date,
            time,
        }
    }

    /// Event stream holding every reservation ever made for this tuple.
    pub fn stream_id(&self) -> String {
        format!(
            "Slot-{}-{}-{}",
            self.professional_id,
            self.date.format("%Y-%m-%d"),
            self.time
        )
    }
}

impl fmt::Display for SlotKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.professional_id, self.date, self.time)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slot {
    pub key: SlotKey,
    pub available: bool,
}
