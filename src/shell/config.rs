// Application configuration read from the environment.
//
// Every key has a default. A value that does not parse is logged and replaced by its default,
// so a typo never keeps the server from starting.

use crate::core::availability::WorkingHours;
use crate::core::booking_flow::machine::FlowSettings;
use chrono::{Duration, NaiveTime, Weekday};
use std::net::SocketAddr;
use std::str::FromStr;
use tracing::warn;

const DEFAULT_SALON_NAME: &str = "La Tribu";
const DEFAULT_OPENING_HOUR: u32 = 9;
const DEFAULT_CLOSING_HOUR: u32 = 18;
const DEFAULT_SLOT_MINUTES: u32 = 60;
const DEFAULT_HORIZON_DAYS: u32 = 30;
const DEFAULT_CURRENCY_CODE: &str = "CLP";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub bind_addr: SocketAddr,
    pub salon_name: String,
    pub opening_hour: u32,
    pub closing_hour: u32,
    pub slot_minutes: u32,
    pub closed_weekday: Option<Weekday>,
    pub horizon_days: u32,
    pub min_lead_minutes: u32,
    pub currency_code: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let bind_addr = parse_or(&lookup, "BIND_ADDR", || {
            SocketAddr::from(([0, 0, 0, 0], 8080))
        });
        let salon_name = lookup("SALON_NAME")
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| DEFAULT_SALON_NAME.to_string());

        let mut opening_hour = parse_or(&lookup, "OPENING_HOUR", || DEFAULT_OPENING_HOUR);
        let mut closing_hour = parse_or(&lookup, "CLOSING_HOUR", || DEFAULT_CLOSING_HOUR);
        if opening_hour > 23 || closing_hour > 23 || closing_hour <= opening_hour {
            warn!(
                opening_hour,
                closing_hour, "invalid opening hours, using {DEFAULT_OPENING_HOUR}-{DEFAULT_CLOSING_HOUR}"
            );
            opening_hour = DEFAULT_OPENING_HOUR;
            closing_hour = DEFAULT_CLOSING_HOUR;
        }

        let mut slot_minutes = parse_or(&lookup, "SLOT_MINUTES", || DEFAULT_SLOT_MINUTES);
        if slot_minutes == 0 {
            warn!("SLOT_MINUTES must be positive, using {DEFAULT_SLOT_MINUTES}");
            slot_minutes = DEFAULT_SLOT_MINUTES;
        }

        let closed_weekday = match lookup("CLOSED_WEEKDAY").map(|s| s.trim().to_string()) {
            None => Some(Weekday::Sun),
            Some(raw) if raw.eq_ignore_ascii_case("none") || raw.is_empty() => None,
            Some(raw) => match raw.parse::<Weekday>() {
                Ok(day) => Some(day),
                Err(_) => {
                    warn!(value = %raw, "invalid CLOSED_WEEKDAY, using Sun");
                    Some(Weekday::Sun)
                }
            },
        };

        let mut horizon_days = parse_or(&lookup, "BOOKING_HORIZON_DAYS", || DEFAULT_HORIZON_DAYS);
        if horizon_days == 0 {
            warn!("BOOKING_HORIZON_DAYS must be positive, using {DEFAULT_HORIZON_DAYS}");
            horizon_days = DEFAULT_HORIZON_DAYS;
        }

        let min_lead_minutes = parse_or(&lookup, "MIN_LEAD_MINUTES", || 0);
        let currency_code = lookup("CURRENCY_CODE")
            .map(|s| s.trim().to_ascii_uppercase())
            .filter(|s| s.len() == 3 && s.chars().all(|c| c.is_ascii_alphabetic()))
            .unwrap_or_else(|| DEFAULT_CURRENCY_CODE.to_string());

        Self {
            bind_addr,
            salon_name,
            opening_hour,
            closing_hour,
            slot_minutes,
            closed_weekday,
            horizon_days,
            min_lead_minutes,
            currency_code,
        }
    }

    pub fn working_hours(&self) -> WorkingHours {
        let defaults = WorkingHours::default();
        WorkingHours {
            opening: NaiveTime::from_hms_opt(self.opening_hour, 0, 0).unwrap_or(defaults.opening),
            closing: NaiveTime::from_hms_opt(self.closing_hour, 0, 0).unwrap_or(defaults.closing),
            slot_minutes: self.slot_minutes,
            closed_weekday: self.closed_weekday,
            horizon_days: self.horizon_days,
        }
    }

    pub fn min_lead(&self) -> Duration {
        Duration::minutes(i64::from(self.min_lead_minutes))
    }

    pub fn flow_settings(&self) -> FlowSettings {
        FlowSettings {
            hours: self.working_hours(),
            salon_name: self.salon_name.clone(),
        }
    }
}

fn parse_or<T, F, D>(lookup: &F, key: &str, default: D) -> T
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
    D: FnOnce() -> T,
{
    match lookup(key) {
        None => default(),
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            warn!(key, value = %raw, "invalid configuration value, using default");
            default()
        }),
    }
}
