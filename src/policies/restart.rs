//! Restart policies for unit actors.
//!
//! [`RestartPolicy`] determines whether a unit is restarted after a failure
//! (launch error, probe timeout, dependency-wait timeout, unexpected exit).
//!
//! - [`RestartPolicy::Never`] — one failure is terminal.
//! - [`RestartPolicy::OnFailure`] — retry up to `max_retries` times; a unit is
//!   attempted at most `max_retries + 1` times before turning
//!   [`Failed`](crate::UnitState::Failed).
//! - [`RestartPolicy::Always`] — no retry limit; the unit only stops through
//!   explicit shutdown. Typical for long-running services such as a database
//!   or reverse proxy.
//!
//! The retry counter resets after the unit stays `Running` for the configured
//! [`stability window`](crate::Config::stability_window), so an old flapping
//! history does not exhaust the budget after a long healthy run.

/// Policy controlling whether a unit is restarted after a failure.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RestartPolicy {
    /// Never restart: the first failure is terminal.
    Never,
    /// Restart on failure, at most `max_retries` times (default, with 3).
    OnFailure {
        /// Retry budget; the unit is attempted `max_retries + 1` times total.
        max_retries: u32,
    },
    /// Always restart, with backoff but without a retry limit.
    Always,
}

impl RestartPolicy {
    /// Returns `true` if another restart is permitted after `retries_done`
    /// completed retries.
    pub fn permits_retry(&self, retries_done: u32) -> bool {
        match self {
            RestartPolicy::Never => false,
            RestartPolicy::OnFailure { max_retries } => retries_done < *max_retries,
            RestartPolicy::Always => true,
        }
    }
}

impl Default for RestartPolicy {
    /// Returns `RestartPolicy::OnFailure { max_retries: 3 }`.
    fn default() -> Self {
        RestartPolicy::OnFailure { max_retries: 3 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_never_forbids_retry() {
        assert!(!RestartPolicy::Never.permits_retry(0));
    }

    #[test]
    fn test_on_failure_budget_is_exact() {
        let p = RestartPolicy::OnFailure { max_retries: 2 };
        assert!(p.permits_retry(0));
        assert!(p.permits_retry(1));
        assert!(!p.permits_retry(2));
    }

    #[test]
    fn test_always_never_exhausts() {
        assert!(RestartPolicy::Always.permits_retry(u32::MAX - 1));
    }
}
