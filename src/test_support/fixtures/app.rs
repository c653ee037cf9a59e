// In-process reservation authority wired the way the binary wires it, on a fixed clock.

use crate::adapters::clock::FixedClock;
use crate::adapters::in_memory::in_memory_catalog::InMemoryCatalog;
use crate::adapters::in_memory::in_memory_working_hours::InMemoryWorkingHours;
use crate::core::availability::WorkingHours;
use crate::core::booking_flow::machine::FlowSettings;
use crate::core::client::{ClientDetailsInput, ClientProfile, SessionContext};
use crate::shell::state::{AppState, BookingEventStore};
use crate::test_support::fixtures::catalog::make_catalog;
use chrono::{Duration, NaiveDate};
use std::sync::Arc;

pub struct TestApp {
    pub state: AppState,
    pub event_store: Arc<BookingEventStore>,
    pub clock: Arc<FixedClock>,
    pub settings: FlowSettings,
}

/// Monday 2025-06-09 08:00.
pub fn make_clock() -> Arc<FixedClock> {
    Arc::new(FixedClock::at(
        NaiveDate::from_ymd_opt(2025, 6, 9).unwrap().and_hms_opt(8, 0, 0).unwrap(),
    ))
}

pub fn make_app(hours: WorkingHours) -> TestApp {
    let catalog = make_catalog();
    let event_store = Arc::new(BookingEventStore::new());
    let clock = make_clock();
    let state = AppState::from_parts(
        event_store.clone(),
        Arc::new(InMemoryCatalog::new(catalog.services, catalog.professionals)),
        Arc::new(InMemoryWorkingHours::new(hours.clone())),
        clock.clone(),
        Duration::zero(),
    );
    TestApp {
        state,
        event_store,
        clock,
        settings: FlowSettings {
            hours,
            ..FlowSettings::default()
        },
    }
}

pub fn identified_session() -> SessionContext {
    SessionContext::Authenticated(ClientProfile {
        user_id: "user-fixed-0001".into(),
        display_name: Some("Maria Lopez".into()),
        email: "maria@example.com".into(),
        phone: Some("+56 9 8765 4321".into()),
    })
}

pub fn client_details(name: &str, email: &str) -> ClientDetailsInput {
    ClientDetailsInput {
        name: name.into(),
        email: email.into(),
        phone: "+56 9 1234 5678".into(),
        notes: None,
    }
}
