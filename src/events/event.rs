//! Lifecycle events emitted by the supervisor and unit actors.
//!
//! [`EventKind`] classifies events into unit lifecycle, restart scheduling,
//! and shutdown categories; [`Event`] carries the metadata (timestamp, unit
//! name, attempt number, delay, reason).
//!
//! ## Ordering
//! Every event gets a globally unique, monotonically increasing sequence
//! number (`seq`). Consumers that receive events out of order can restore the
//! original order from it.

use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::sync::Arc;
use std::time::{Duration, SystemTime};

/// Global sequence counter for event ordering.
static EVENT_SEQ: AtomicU64 = AtomicU64::new(0);

/// Classification of runtime events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    // === Unit lifecycle ===
    /// A unit entered the dependency wait.
    ///
    /// Sets: `unit`, `attempt`.
    UnitWaiting,

    /// A unit was launched and is polling its readiness probe.
    ///
    /// Sets: `unit`, `attempt`.
    UnitStarting,

    /// A unit's readiness probe passed; the unit is serving.
    ///
    /// Sets: `unit`, `attempt`.
    UnitRunning,

    /// A unit stopped gracefully (shutdown or cancellation).
    ///
    /// Sets: `unit`.
    UnitStopped,

    /// A unit's attempt failed (launch error, probe timeout, dependency
    /// failure, unexpected exit). Terminal only once the restart budget is
    /// spent.
    ///
    /// Sets: `unit`, `attempt`, `reason`.
    UnitFailed,

    // === Restart scheduling ===
    /// A restart was scheduled after a failure.
    ///
    /// Sets: `unit`, `attempt` (the failed attempt), `delay_ms`, `reason`.
    BackoffScheduled,

    /// A manual restart override was requested for a unit.
    ///
    /// Sets: `unit`.
    RestartRequested,

    // === Shutdown ===
    /// Shutdown began (operator call or OS signal).
    ShutdownRequested,

    /// All units stopped within their grace periods.
    AllStoppedWithin,

    /// Some unit did not stop within its grace period.
    ///
    /// Sets: `reason` (stuck unit names).
    GraceExceeded,

    // === Subscriber plumbing ===
    /// A subscriber panicked while processing an event.
    ///
    /// Sets: `unit` (subscriber name), `reason`.
    SubscriberPanicked,
}

/// Runtime event with optional metadata.
///
/// - `seq`: monotonic global sequence for ordering
/// - `at`: wall-clock timestamp (for logs)
/// - remaining fields are set depending on the [`EventKind`]
#[derive(Clone, Debug)]
pub struct Event {
    /// Globally unique, monotonically increasing sequence number.
    pub seq: u64,
    /// Wall-clock timestamp.
    pub at: SystemTime,
    /// Event classification.
    pub kind: EventKind,
    /// Unit (or subscriber) name, if applicable.
    pub unit: Option<Arc<str>>,
    /// Launch attempt number (1-based, monotonic per unit actor).
    pub attempt: Option<u32>,
    /// Backoff delay before the next attempt, in milliseconds.
    pub delay_ms: Option<u32>,
    /// Human-readable reason (failure message, stuck unit list, ...).
    pub reason: Option<Arc<str>>,
}

impl Event {
    /// Creates an event of the given kind with the current timestamp and the
    /// next global sequence number.
    pub fn now(kind: EventKind) -> Self {
        Self {
            seq: EVENT_SEQ.fetch_add(1, AtomicOrdering::Relaxed),
            at: SystemTime::now(),
            kind,
            unit: None,
            attempt: None,
            delay_ms: None,
            reason: None,
        }
    }

    /// Attaches a unit name.
    #[inline]
    pub fn with_unit(mut self, unit: impl Into<Arc<str>>) -> Self {
        self.unit = Some(unit.into());
        self
    }

    /// Attaches an attempt number.
    #[inline]
    pub fn with_attempt(mut self, attempt: u32) -> Self {
        self.attempt = Some(attempt);
        self
    }

    /// Attaches a backoff delay (stored as milliseconds).
    #[inline]
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay_ms = Some(delay.as_millis().min(u128::from(u32::MAX)) as u32);
        self
    }

    /// Attaches a human-readable reason.
    #[inline]
    pub fn with_reason(mut self, reason: impl Into<Arc<str>>) -> Self {
        self.reason = Some(reason.into());
        self
    }
}
