// Composition root for the reservation authority.
//
// Responsibilities
// - Read configuration from the environment.
// - Instantiate the in-memory infrastructure and wire it into the handlers.
// - Build the axum router served by the binary.

pub mod config;
pub mod http;
pub mod state;
