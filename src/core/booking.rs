// Reservation aggregate: one event stream per (professional, date, time) slot.
//
// Structure
// - confirmed.rs: ConfirmedBooking and its status lifecycle
// - state.rs: slot state after folding events
// - event.rs + event/: root event enum and versioned payloads
// - evolve.rs: pure state transitions
// - decider/: pure decision logic per command
// - projector/: mapping from events to booking read model mutations

pub mod confirmed;
pub mod event;
pub mod evolve;
pub mod state;
pub mod decider {
    pub mod change_status {
        pub mod command;
        pub mod decide;
    }
    pub mod reserve {
        pub mod command;
        pub mod decide;
    }
}
pub mod projector {
    pub mod apply;
    pub mod model;
}
