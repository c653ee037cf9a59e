// Crate entry point. Declares the module tree so tests and the binary can reach it.
//
// Layers
// - core: pure domain (booking flow state machine, availability, reservation aggregate, ports).
// - application: command handlers, booking policy, projector runner, query traits, availability service.
// - adapters: in-memory implementations, HTTP inbound handlers and outbound client, notifications.
// - shell: configuration, app state and router wiring for the binary.

pub mod core {
    pub mod availability;
    pub mod booking;
    pub mod booking_flow;
    pub mod catalog;
    pub mod client;
    pub mod notification;
    pub mod ports;
    pub mod slot;
}

pub mod application {
    pub mod availability_service;
    pub mod booking_policy;
    pub mod errors;
    pub mod command_handlers {
        pub mod change_status_handler;
        pub mod reserve_handler;
    }
    pub mod projector {
        pub mod repository;
        pub mod runner;
    }
    pub mod query_handlers {
        pub mod bookings_queries;
    }
}

pub mod adapters {
    pub mod clock;
    pub mod notifications;
    pub mod in_memory {
        pub mod in_memory_catalog;
        pub mod in_memory_event_store;
        pub mod in_memory_notifier;
        pub mod in_memory_projections;
        pub mod in_memory_working_hours;
    }
    pub mod http {
        pub mod client;
        pub mod inbound;
    }
}

pub mod shell;


#[cfg(test)]
pub mod tests {
    pub mod e2e {
        pub mod booking_flow_tests;
        pub mod concurrent_commit_tests;
        pub mod http_round_trip_tests;
    }
}
