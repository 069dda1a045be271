//! Error types used by the stackvisor runtime and unit actors.
//!
//! Three enums cover the error taxonomy:
//!
//! - [`ConfigError`] — configuration problems (duplicate unit, unknown or
//!   cyclic dependency). Fatal at [`Supervisor::start`](crate::Supervisor::start),
//!   surfaced before any process is launched.
//! - [`UnitError`] — failures of a single unit's startup or runtime. Handled
//!   locally via restart policy first; only an exhausted policy makes the
//!   failure user-visible.
//! - [`RuntimeError`] — errors raised by the supervisor itself.
//!
//! All types provide `as_label()` for logs/metrics; [`UnitError::is_retryable`]
//! drives restart-policy evaluation.

use std::time::Duration;
use thiserror::Error;

/// Errors detected while validating the unit configuration.
///
/// Any of these aborts [`Supervisor::start`](crate::Supervisor::start) before
/// a single launch call: startup is all-or-nothing at the configuration stage.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// A unit name was declared more than once.
    #[error("duplicate unit '{name}'")]
    DuplicateUnit {
        /// The redeclared unit name.
        name: String,
    },

    /// A unit depends on a name that was never declared.
    #[error("unit '{unit}' depends on undeclared unit '{dependency}'")]
    UnknownDependency {
        /// The unit holding the dangling reference.
        unit: String,
        /// The dependency name that was never declared.
        dependency: String,
    },

    /// The dependency graph contains a cycle.
    #[error("dependency cycle: {}", cycle.join(" -> "))]
    CyclicDependency {
        /// One closed walk through the cycle, first node repeated last.
        cycle: Vec<String>,
    },
}

impl ConfigError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            ConfigError::DuplicateUnit { .. } => "config_duplicate_unit",
            ConfigError::UnknownDependency { .. } => "config_unknown_dependency",
            ConfigError::CyclicDependency { .. } => "config_cyclic_dependency",
        }
    }
}

/// Failures of one unit's startup or runtime.
///
/// Retryable variants feed into [`RestartPolicy`](crate::RestartPolicy)
/// evaluation; the rest are terminal for the unit.
#[non_exhaustive]
#[derive(Error, Debug, Clone)]
pub enum UnitError {
    /// The external launcher failed to create the process.
    ///
    /// Treated identically to a probe timeout for restart purposes.
    #[error("launch failed: {error}")]
    Launch {
        /// The underlying launcher error message.
        error: String,
    },

    /// The unit's own readiness probe never passed within the startup timeout.
    #[error("readiness probe gave no healthy result within {timeout:?}")]
    ProbeTimeout {
        /// The configured startup timeout that elapsed.
        timeout: Duration,
    },

    /// The dependency wait exceeded its overall timeout.
    #[error("dependencies not healthy within {timeout:?}")]
    DependencyTimeout {
        /// The configured dependency-wait timeout that elapsed.
        timeout: Duration,
    },

    /// A prerequisite ended permanently [`Failed`](crate::UnitState::Failed).
    ///
    /// Propagates forward: the dependent fails immediately, without retries
    /// and without waiting out its dependency timeout.
    #[error("dependency '{dependency}' failed permanently")]
    DependencyFailed {
        /// Name of the failed prerequisite.
        dependency: String,
    },

    /// A `Running` unit's process terminated without an explicit shutdown.
    #[error("process exited unexpectedly with status {code}")]
    UnexpectedExit {
        /// Raw exit code (`-1` when terminated by a signal).
        code: i32,
    },

    /// Startup was canceled by the supervisor (shutdown or manual restart).
    #[error("startup canceled")]
    Canceled,
}

impl UnitError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            UnitError::Launch { .. } => "unit_launch_failed",
            UnitError::ProbeTimeout { .. } => "unit_probe_timeout",
            UnitError::DependencyTimeout { .. } => "unit_dependency_timeout",
            UnitError::DependencyFailed { .. } => "unit_dependency_failed",
            UnitError::UnexpectedExit { .. } => "unit_unexpected_exit",
            UnitError::Canceled => "unit_canceled",
        }
    }

    /// Indicates whether the failure is subject to restart-policy evaluation.
    ///
    /// `DependencyFailed` is terminal (retrying a dependent of a permanently
    /// failed prerequisite cannot succeed) and `Canceled` is a graceful stop.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            UnitError::Launch { .. }
                | UnitError::ProbeTimeout { .. }
                | UnitError::DependencyTimeout { .. }
                | UnitError::UnexpectedExit { .. }
        )
    }
}

/// Errors produced by the supervisor runtime.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum RuntimeError {
    /// Unit configuration failed validation; nothing was launched.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// `start()` was called on a supervisor that already started.
    ///
    /// Reconfiguration requires a new supervisor; unit sets are not
    /// hot-reloaded.
    #[error("supervisor already started")]
    AlreadyStarted,

    /// An operation that requires a started supervisor was called too early.
    #[error("supervisor not started")]
    NotStarted,

    /// A control-surface call arrived after `shutdown()` completed.
    ///
    /// A shut-down supervisor never launches anything again; units stay
    /// `Stopped`.
    #[error("supervisor already shut down")]
    ShutDown,

    /// A control-surface call referenced a unit that was never configured.
    #[error("unknown unit '{name}'")]
    UnknownUnit {
        /// The unrecognized unit name.
        name: String,
    },

    /// Startup completed with some units permanently failed.
    ///
    /// Independent branches still started; only the listed units and their
    /// transitive dependents are down. Details are available through
    /// [`Supervisor::status`](crate::Supervisor::status).
    #[error("startup finished with failed units: {failed:?}")]
    StartupFailed {
        /// Names of units that ended `Failed`, in startup order.
        failed: Vec<String>,
    },

    /// Shutdown grace was exceeded; some units had to be left behind.
    #[error("shutdown grace {grace:?} exceeded; stuck: {stuck:?}")]
    GraceExceeded {
        /// The per-unit grace that was exceeded.
        grace: Duration,
        /// Units that did not stop in time.
        stuck: Vec<String>,
    },
}

impl RuntimeError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            RuntimeError::Config(e) => e.as_label(),
            RuntimeError::AlreadyStarted => "runtime_already_started",
            RuntimeError::NotStarted => "runtime_not_started",
            RuntimeError::ShutDown => "runtime_shut_down",
            RuntimeError::UnknownUnit { .. } => "runtime_unknown_unit",
            RuntimeError::StartupFailed { .. } => "runtime_startup_failed",
            RuntimeError::GraceExceeded { .. } => "runtime_grace_exceeded",
        }
    }
}
