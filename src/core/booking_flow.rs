// Booking wizard: an owned state machine that accumulates a draft booking step by step.
//
// Layout
// - step / transitions: the step identifiers and the (step, event, client kind) -> step table.
// - draft: the working record and its completeness check.
// - slot_cache: fetched availability with an explicit stale flag and in-flight marker.
// - machine: BookingFlow, the operations callers drive.

pub mod draft;
pub mod errors;
pub mod machine;
pub mod slot_cache;
pub mod step;
pub mod transitions;
