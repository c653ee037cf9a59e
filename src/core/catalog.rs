// Service catalog as seen by the booking flow. Read-only here; management happens elsewhere.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Amount in minor currency units (whole pesos for CLP).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Price(pub i64);

impl Price {
    pub fn format(&self, currency_code: &str) -> String {
        match currency_code {
            "CLP" => format!("${}", group_digits(self.0, '.')),
            code => {
                let sign = if self.0 < 0 { "-" } else { "" };
                let abs = self.0.unsigned_abs();
                format!(
                    "{sign}{code} {}.{:02}",
                    group_digits((abs / 100) as i64, ','),
                    abs % 100
                )
            }
        }
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format("CLP"))
    }
}

fn group_digits(value: i64, separator: char) -> String {
    let digits = value.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(separator);
        }
        grouped.push(ch);
    }
    if value < 0 {
        grouped.insert(0, '-');
    }
    grouped
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Service {
    pub id: String,
    pub name: String,
    pub price: Price,
    pub duration_minutes: u32,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Professional {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub specialties: Vec<String>,
    #[serde(default = "active_by_default")]
    pub active: bool,
}

fn active_by_default() -> bool {
    true
}

/// Snapshot of the catalog, cached for one booking session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    pub services: Vec<Service>,
    pub professionals: Vec<Professional>,
}

impl Catalog {
    pub fn new(services: Vec<Service>, professionals: Vec<Professional>) -> Self {
        Self {
            services,
            professionals,
        }
    }

    pub fn service(&self, id: &str) -> Option<&Service> {
        self.services.iter().find(|s| s.id == id)
    }

    pub fn professional(&self, id: &str) -> Option<&Professional> {
        self.professionals.iter().find(|p| p.id == id)
    }

    pub fn bookable_professionals(&self) -> impl Iterator<Item = &Professional> {
        self.professionals.iter().filter(|p| p.active)
    }
}
