//! Backoff policy for restart delays.
//!
//! [`BackoffPolicy`] controls how restart delays grow after repeated failures:
//! the delay before retry `n` is `first × factor^n`, clamped to `max`, with
//! jitter applied last. The base delay is derived purely from the retry
//! number, so jittered output never feeds back into later calculations.
//!
//! # Example
//! ```rust
//! use std::time::Duration;
//! use stackvisor::{BackoffPolicy, JitterPolicy};
//!
//! let backoff = BackoffPolicy {
//!     first: Duration::from_millis(500),
//!     max: Duration::from_secs(60),
//!     factor: 2.0,
//!     jitter: JitterPolicy::None,
//! };
//!
//! assert_eq!(backoff.next(0), Duration::from_millis(500));
//! assert_eq!(backoff.next(1), Duration::from_secs(1));
//! assert_eq!(backoff.next(2), Duration::from_secs(2));
//! // 500ms × 2^20 far exceeds the cap → clamped.
//! assert_eq!(backoff.next(20), Duration::from_secs(60));
//! ```

use std::time::Duration;

use crate::policies::jitter::JitterPolicy;

/// Restart backoff policy: exponential growth with a hard cap.
#[derive(Clone, Copy, Debug)]
pub struct BackoffPolicy {
    /// Delay before the first retry.
    pub first: Duration,
    /// Maximum delay cap.
    pub max: Duration,
    /// Multiplicative growth factor (`>= 1.0` recommended).
    pub factor: f64,
    /// Jitter applied to the computed delay.
    pub jitter: JitterPolicy,
}

impl Default for BackoffPolicy {
    /// Returns exponential backoff with:
    /// - `first = 500ms`
    /// - `factor = 2.0`
    /// - `max = 60s`
    /// - `jitter = None`
    fn default() -> Self {
        Self {
            first: Duration::from_millis(500),
            max: Duration::from_secs(60),
            factor: 2.0,
            jitter: JitterPolicy::None,
        }
    }
}

impl BackoffPolicy {
    /// Computes the delay before retry number `retry` (0-indexed).
    ///
    /// Overflowing or non-finite intermediate values clamp to
    /// [`max`](BackoffPolicy::max); with `jitter = None` the sequence is
    /// non-decreasing for any `factor >= 1.0`.
    pub fn next(&self, retry: u32) -> Duration {
        let cap = self.max.as_secs_f64();
        let exponent = retry.min(i32::MAX as u32) as i32;
        let raw = self.first.as_secs_f64() * self.factor.powi(exponent);

        let base = if raw.is_finite() && raw >= 0.0 && raw <= cap {
            Duration::from_secs_f64(raw)
        } else {
            self.max
        };

        self.jitter.apply(base)
    }
}
