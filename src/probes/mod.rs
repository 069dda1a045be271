//! Readiness probes.
//!
//! A probe answers one question: can this service accept work *right now*?
//! That is distinct from the process merely having started — a database may be
//! up for seconds before it accepts connections.
//!
//! ## Contents
//! - [`Probe`] — trait for one readiness test, pluggable per unit
//! - [`ProbeFn`] — closure-backed probe (HTTP pings, scripts, test fakes)
//! - [`TcpProbe`] — network-port reachability check
//! - [`wait_until_healthy`] — polling loop with attempt/overall timeouts
//! - [`ProbeReport`] — transient result of the latest polling run

mod probe;
mod tcp;
mod wait;

pub use probe::{Probe, ProbeFn, ProbeRef};
pub use tcp::TcpProbe;
pub use wait::{wait_until_healthy, ProbeReport};
