//! Service unit abstractions.
//!
//! - [`UnitSpec`] — configuration bundle for one managed service: launch
//!   command, dependencies, restart/backoff policies, readiness probe, and
//!   timeouts
//! - [`UnitState`] — the unit lifecycle state machine

mod spec;
mod state;

pub use spec::UnitSpec;
pub use state::UnitState;
