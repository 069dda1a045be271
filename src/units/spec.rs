//! Unit specification for supervised execution.
//!
//! [`UnitSpec`] bundles everything the supervisor needs to manage one
//! service: the launch command, the dependency list, restart/backoff
//! policies, the readiness probe, and the timeout levels.
//!
//! Policies and timeouts default to sensible values and can be overridden
//! per unit with chained setters, or inherited from a global
//! [`Config`](crate::Config) via [`UnitSpec::with_defaults`].

use crate::config::{Config, UnitTimeouts};
use crate::launch::CommandSpec;
use crate::policies::{BackoffPolicy, RestartPolicy};
use crate::probes::ProbeRef;

/// Specification of one managed service unit.
///
/// ## Example
/// ```
/// use stackvisor::{CommandSpec, Config, RestartPolicy, TcpProbe, UnitSpec};
///
/// let cfg = Config::default();
/// let cache = UnitSpec::with_defaults(
///     "cache",
///     CommandSpec::new("redis-server"),
///     TcpProbe::arc("127.0.0.1:6379"),
///     &cfg,
/// )
/// .with_restart(RestartPolicy::Always);
///
/// let app = UnitSpec::new(
///     "app",
///     CommandSpec::new("gunicorn").arg("myapp:app"),
///     TcpProbe::arc("127.0.0.1:8000"),
/// )
/// .depends_on(["cache"]);
///
/// assert_eq!(app.dependencies(), ["cache"]);
/// ```
#[derive(Clone)]
pub struct UnitSpec {
    name: String,
    command: CommandSpec,
    dependencies: Vec<String>,
    restart: RestartPolicy,
    backoff: BackoffPolicy,
    probe: ProbeRef,
    timeouts: UnitTimeouts,
}

impl UnitSpec {
    /// Creates a spec with default policies and timeouts and no dependencies.
    pub fn new(name: impl Into<String>, command: CommandSpec, probe: ProbeRef) -> Self {
        Self {
            name: name.into(),
            command,
            dependencies: Vec::new(),
            restart: RestartPolicy::default(),
            backoff: BackoffPolicy::default(),
            probe,
            timeouts: UnitTimeouts::default(),
        }
    }

    /// Creates a spec inheriting restart/backoff/timeouts from `cfg`.
    pub fn with_defaults(
        name: impl Into<String>,
        command: CommandSpec,
        probe: ProbeRef,
        cfg: &Config,
    ) -> Self {
        Self {
            name: name.into(),
            command,
            dependencies: Vec::new(),
            restart: cfg.restart,
            backoff: cfg.backoff,
            probe,
            timeouts: cfg.timeouts,
        }
    }

    /// Declares units that must be healthy before this one starts.
    pub fn depends_on(mut self, deps: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.dependencies.extend(deps.into_iter().map(Into::into));
        self
    }

    /// Overrides the restart policy.
    pub fn with_restart(mut self, restart: RestartPolicy) -> Self {
        self.restart = restart;
        self
    }

    /// Overrides the backoff policy.
    pub fn with_backoff(mut self, backoff: BackoffPolicy) -> Self {
        self.backoff = backoff;
        self
    }

    /// Overrides the timeout levels.
    pub fn with_timeouts(mut self, timeouts: UnitTimeouts) -> Self {
        self.timeouts = timeouts;
        self
    }

    /// Returns the unit name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the launch command.
    pub fn command(&self) -> &CommandSpec {
        &self.command
    }

    /// Returns the declared dependency names.
    pub fn dependencies(&self) -> &[String] {
        &self.dependencies
    }

    /// Returns the restart policy.
    pub fn restart(&self) -> RestartPolicy {
        self.restart
    }

    /// Returns the backoff policy.
    pub fn backoff(&self) -> BackoffPolicy {
        self.backoff
    }

    /// Returns the readiness probe.
    pub fn probe(&self) -> &ProbeRef {
        &self.probe
    }

    /// Returns the timeout levels.
    pub fn timeouts(&self) -> UnitTimeouts {
        self.timeouts
    }
}
