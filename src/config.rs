//! Global runtime configuration.
//!
//! [`Config`] centralizes supervisor-wide settings and the defaults inherited
//! by [`UnitSpec`](crate::UnitSpec). It is loaded once at supervisor
//! construction; reconfiguration requires a new supervisor (no hot reload).
//!
//! [`UnitTimeouts`] groups the three independent timeout levels applied to a
//! unit's startup, plus the probe poll interval. Exceeding any of them counts
//! as that unit's startup failing and feeds restart-policy evaluation.

use std::time::Duration;

use crate::policies::{BackoffPolicy, RestartPolicy};

/// Per-unit timeout levels.
///
/// The three deadlines are independent:
/// - `probe_attempt`: budget for a single probe check,
/// - `dependency_wait`: overall budget for all dependencies to become healthy,
/// - `startup`: overall budget from launch until the unit's own probe passes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct UnitTimeouts {
    /// Delay between readiness probe polls.
    pub poll_interval: Duration,
    /// Budget for one probe attempt; a slow probe counts as unhealthy.
    pub probe_attempt: Duration,
    /// Overall budget for the dependency wait.
    pub dependency_wait: Duration,
    /// Overall budget from launch until the unit's own probe passes.
    pub startup: Duration,
}

impl Default for UnitTimeouts {
    /// Returns:
    /// - `poll_interval = 250ms`
    /// - `probe_attempt = 1s`
    /// - `dependency_wait = 60s`
    /// - `startup = 30s`
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_millis(250),
            probe_attempt: Duration::from_secs(1),
            dependency_wait: Duration::from_secs(60),
            startup: Duration::from_secs(30),
        }
    }
}

/// Global configuration for the supervisor runtime.
///
/// Defines:
/// - **Shutdown behavior**: per-unit grace before forced termination
/// - **Restart accounting**: stability window that clears the retry counter
/// - **Event system**: bus capacity for event delivery
/// - **Unit defaults**: restart policy, backoff strategy, timeouts
#[derive(Clone, Debug)]
pub struct Config {
    /// Grace given to each unit to stop on its own before the stop is forced.
    ///
    /// On shutdown the process receives a graceful terminate request; after
    /// `grace` it is killed.
    pub grace: Duration,

    /// Continuous `Running` time after which a unit's retry counter resets.
    ///
    /// Prevents an old flapping history from exhausting the restart budget
    /// after a long healthy run.
    pub stability_window: Duration,

    /// Capacity of the event bus broadcast ring buffer.
    ///
    /// Slow subscribers that lag behind more than `bus_capacity` events skip
    /// the oldest items. Minimum value is 1 (enforced by the bus).
    pub bus_capacity: usize,

    /// Default restart policy for units (overridable per unit).
    pub restart: RestartPolicy,

    /// Default backoff policy for restart delays (overridable per unit).
    pub backoff: BackoffPolicy,

    /// Default per-unit timeouts (overridable per unit).
    pub timeouts: UnitTimeouts,
}

impl Default for Config {
    /// Default configuration:
    ///
    /// - `grace = 10s`
    /// - `stability_window = 30s`
    /// - `bus_capacity = 1024`
    /// - `restart = RestartPolicy::OnFailure { max_retries: 3 }`
    /// - `backoff = BackoffPolicy::default()` (500ms doubling, capped at 60s)
    /// - `timeouts = UnitTimeouts::default()`
    fn default() -> Self {
        Self {
            grace: Duration::from_secs(10),
            stability_window: Duration::from_secs(30),
            bus_capacity: 1024,
            restart: RestartPolicy::default(),
            backoff: BackoffPolicy::default(),
            timeouts: UnitTimeouts::default(),
        }
    }
}
