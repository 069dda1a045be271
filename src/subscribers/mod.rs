//! Event subscribers.
//!
//! Subscribers observe the lifecycle events broadcast through the
//! [`Bus`](crate::events::Bus): logging, metrics, alerting, status pages.
//!
//! ```text
//! UnitActor ── publish(Event) ──► Bus ──► supervisor listener ──► SubscriberSet
//!                                                           ┌─────────┼─────────┐
//!                                                           ▼         ▼         ▼
//!                                                      [queue S1] [queue S2] [queue SN]
//!                                                           ▼         ▼         ▼
//!                                                     s1.on_event  s2.on_event ...
//! ```
//!
//! ## Contents
//! - [`Subscribe`] — trait for custom event handlers
//! - [`SubscriberSet`] — non-blocking fan-out with per-subscriber queues
//! - [`LogWriter`] — built-in stdout logger (feature `logging`)

mod set;
mod subscriber;

#[cfg(feature = "logging")]
mod log;

pub use set::SubscriberSet;
pub use subscriber::Subscribe;

#[cfg(feature = "logging")]
pub use log::LogWriter;
