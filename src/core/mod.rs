//! Runtime core: orchestration and lifecycle.
//!
//! The public API from this module is [`Supervisor`] (orchestration, control
//! surface) and [`HealthBoard`] (the aggregate health view).
//!
//! Internal modules:
//! - [`actor`]: per-unit loop — dependency wait, launch, readiness polling,
//!   exit monitoring, restart policy;
//! - [`board`]: per-unit state channels used both for dependency gating and
//!   as the external status surface;
//! - [`supervisor`]: graph validation, actor spawning, shutdown ordering;
//! - [`shutdown`]: cross-platform OS signal handling.

mod actor;
mod board;
mod shutdown;
mod supervisor;

pub use board::HealthBoard;
pub use supervisor::Supervisor;
