//! Event subscriber trait.
//!
//! [`Subscribe`] is the extension point for plugging custom event handlers
//! into the runtime. Each subscriber gets a dedicated worker task and a
//! bounded queue; a slow subscriber only affects its own queue, and panics are
//! isolated and reported as [`EventKind::SubscriberPanicked`](crate::EventKind).
//!
//! ## Example
//! ```rust
//! use async_trait::async_trait;
//! use stackvisor::{Event, EventKind, Subscribe};
//!
//! struct Metrics;
//!
//! #[async_trait]
//! impl Subscribe for Metrics {
//!     async fn on_event(&self, ev: &Event) {
//!         if matches!(ev.kind, EventKind::UnitFailed) {
//!             // bump a failure counter, fire an alert, ...
//!         }
//!     }
//!
//!     fn name(&self) -> &'static str { "metrics" }
//! }
//! ```

use async_trait::async_trait;

use crate::events::Event;

/// Event subscriber for runtime observability.
///
/// Implementations should use async I/O and handle their own errors; events
/// are delivered in FIFO order per subscriber, from a dedicated worker task.
#[async_trait]
pub trait Subscribe: Send + Sync + 'static {
    /// Processes a single event.
    async fn on_event(&self, event: &Event);

    /// Returns the subscriber name used in logs and panic events.
    ///
    /// Prefer short, descriptive names; the default `type_name` is verbose.
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }

    /// Returns the preferred queue capacity for this subscriber (clamped to
    /// ≥ 1 by the runtime). On overflow the newest event is dropped for this
    /// subscriber only. Default: 1024.
    fn queue_capacity(&self) -> usize {
        1024
    }
}
