//! Restart and backoff policies.
//!
//! This module groups the knobs that control **if/when** a failed unit is
//! restarted and **how long** to wait between attempts.
//!
//! ## Contents
//! - [`RestartPolicy`] when to restart a unit (never / on-failure / always)
//! - [`BackoffPolicy`] how restart delays evolve (first / factor / max + jitter)
//! - [`JitterPolicy`]  randomization strategy to avoid thundering herd
//!
//! ## Quick wiring
//! ```text
//! UnitSpec { restart: RestartPolicy, backoff: BackoffPolicy, .. }
//!      └─► core::actor::UnitActor uses:
//!           - restart to decide retry/terminal-fail
//!           - backoff.next(retry) to schedule the next attempt
//! ```
//!
//! ## Defaults
//! - `RestartPolicy::OnFailure { max_retries: 3 }`
//! - `BackoffPolicy::default()` → first=500ms, factor=2.0, max=60s, jitter=None

mod backoff;
mod jitter;
mod restart;

pub use backoff::BackoffPolicy;
pub use jitter::JitterPolicy;
pub use restart::RestartPolicy;
