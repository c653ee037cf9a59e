use crate::adapters::in_memory::in_memory_catalog::InMemoryCatalog;
use crate::adapters::in_memory::in_memory_event_store::InMemoryEventStore;
use crate::adapters::in_memory::in_memory_projections::InMemoryProjections;
use crate::adapters::in_memory::in_memory_working_hours::InMemoryWorkingHours;
use crate::application::availability_service::AvailabilityService;
use crate::application::booking_policy::BookingPolicy;
use crate::application::command_handlers::change_status_handler::ChangeBookingStatusHandler;
use crate::application::command_handlers::reserve_handler::ReserveSlotHandler;
use crate::application::projector::runner::Projector;
use crate::application::query_handlers::bookings_queries::BookingQueries;
use crate::core::booking::event::BookingEvent;
use crate::core::ports::{CatalogSource, Clock};
use crate::shell::config::AppConfig;
use chrono::Duration;
use std::sync::Arc;

pub type BookingEventStore = InMemoryEventStore<BookingEvent>;

#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<dyn CatalogSource>,
    pub queries: Arc<dyn BookingQueries>,
    pub availability: Arc<AvailabilityService<InMemoryProjections, InMemoryWorkingHours>>,
    pub reserve_handler: Arc<ReserveSlotHandler<BookingEventStore, InMemoryProjections, InMemoryProjections>>,
    pub change_status_handler: Arc<
        ChangeBookingStatusHandler<BookingEventStore, InMemoryProjections, InMemoryProjections, InMemoryProjections>,
    >,
    pub currency_code: String,
}

impl AppState {
    pub fn in_memory(config: &AppConfig, clock: Arc<dyn Clock>) -> Self {
        Self::from_parts(
            Arc::new(BookingEventStore::new()),
            Arc::new(InMemoryCatalog::with_defaults()),
            Arc::new(InMemoryWorkingHours::new(config.working_hours())),
            clock,
            config.min_lead(),
        )
        .with_currency(&config.currency_code)
    }

    pub fn from_parts(
        event_store: Arc<BookingEventStore>,
        catalog: Arc<dyn CatalogSource>,
        hours: Arc<InMemoryWorkingHours>,
        clock: Arc<dyn Clock>,
        min_lead: Duration,
    ) -> Self {
        let projections = Arc::new(InMemoryProjections::new());
        let projector = Arc::new(Projector::new(
            "bookings",
            projections.clone(),
            projections.clone(),
        ));
        let policy = Arc::new(BookingPolicy::new(
            catalog.clone(),
            hours.clone(),
            hours.defaults().clone(),
            clock.clone(),
            min_lead,
        ));
        let reserve_handler = Arc::new(
            ReserveSlotHandler::new(event_store.clone(), projector.clone()).with_policy(policy),
        );
        let change_status_handler = Arc::new(ChangeBookingStatusHandler::new(
            event_store,
            projections.clone(),
            projector,
        ));
        let availability = Arc::new(AvailabilityService::new(
            projections.clone(),
            hours,
            clock,
            min_lead,
        ));
        AppState {
            catalog,
            queries: projections,
            availability,
            reserve_handler,
            change_status_handler,
            currency_code: "CLP".to_string(),
        }
    }

    pub fn with_currency(mut self, currency_code: &str) -> Self {
        self.currency_code = currency_code.to_string();
        self
    }
}
