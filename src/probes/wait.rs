//! Polling loop: wait until a probe reports healthy.
//!
//! [`wait_until_healthy`] is the sole suspending operation of the probe layer.
//! It polls a [`Probe`] at a fixed interval, bounds every single check with a
//! per-attempt timeout, and gives up when the overall deadline passes. The
//! loop is cancellable at every suspension point.
//!
//! ```text
//! loop {
//!   ├─► timeout(probe_attempt, probe.check())
//!   │      ├─ Ok(true)          ─► return ProbeReport (healthy)
//!   │      └─ Ok(false)/Err(_)  ─► consecutive_failures += 1
//!   ├─► overall deadline passed ─► Err(ProbeTimeout)
//!   └─► sleep(poll_interval, clamped to the remaining budget)  (cancellable)
//! }
//! ```
//!
//! The last pause is clamped so a final attempt runs at the deadline; even a
//! budget shorter than the poll interval gets two attempts (one immediately,
//! one at the deadline).

use std::time::{Duration, SystemTime};

use tokio::time::{self, Instant};
use tokio_util::sync::CancellationToken;

use crate::error::UnitError;
use crate::probes::probe::Probe;

/// Transient result of the latest polling run for one unit.
///
/// Recomputed on every poll; never persisted across supervisor restarts.
#[derive(Debug, Clone)]
pub struct ProbeReport {
    /// Name of the probed unit.
    pub unit: String,
    /// Whether the last check passed.
    pub healthy: bool,
    /// Wall-clock time of the last check.
    pub last_checked_at: SystemTime,
    /// Failed checks since the last healthy one.
    pub consecutive_failures: u32,
}

/// Polls `probe` until it reports healthy, the deadline passes, or `token`
/// is cancelled.
///
/// ### Timeouts
/// - `timeout`: overall budget for the whole wait.
/// - `probe_attempt`: budget for one check; an overrunning check counts as a
///   failed attempt (the service is not accepting work promptly).
/// - `poll_interval`: pause between attempts.
///
/// ### Returns
/// - `Ok(report)` once a check passes; the report carries how many failures
///   preceded it.
/// - `Err(UnitError::ProbeTimeout)` when the overall budget elapses.
/// - `Err(UnitError::Canceled)` when `token` fires during the wait.
pub async fn wait_until_healthy(
    probe: &dyn Probe,
    unit: &str,
    timeout: Duration,
    poll_interval: Duration,
    probe_attempt: Duration,
    token: &CancellationToken,
) -> Result<ProbeReport, UnitError> {
    let deadline = Instant::now() + timeout;
    let mut consecutive_failures: u32 = 0;

    loop {
        if token.is_cancelled() {
            return Err(UnitError::Canceled);
        }

        let healthy = matches!(
            time::timeout(probe_attempt, probe.check()).await,
            Ok(true)
        );
        if healthy {
            return Ok(ProbeReport {
                unit: unit.to_string(),
                healthy: true,
                last_checked_at: SystemTime::now(),
                consecutive_failures,
            });
        }
        consecutive_failures = consecutive_failures.saturating_add(1);

        let now = Instant::now();
        if now >= deadline {
            return Err(UnitError::ProbeTimeout { timeout });
        }
        // Clamp the last pause so the final attempt runs at the deadline
        // instead of giving up one interval early.
        let pause = poll_interval.min(deadline - now);
        tokio::select! {
            _ = time::sleep(pause) => {}
            _ = token.cancelled() => return Err(UnitError::Canceled),
        }
    }
}
