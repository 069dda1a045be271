//! Unit lifecycle state machine.
//!
//! States and transitions (mutated only by the unit's own actor — single
//! writer):
//!
//! ```text
//! Pending ──► WaitingOnDependencies ──► Starting ──► Running ──► Stopped
//!                  │        ▲              │            │
//!                  │        └── restart ───┼────────────┘ (unexpected exit,
//!                  │                       │              policy permits)
//!                  ▼                       ▼
//!                Failed ◄──────────────────┘
//! ```
//!
//! - `WaitingOnDependencies → Starting`: every dependency reached `Running`
//!   (which implies its probe passed at least once).
//! - `WaitingOnDependencies → Failed`: a dependency failed permanently, the
//!   dependency wait timed out with the restart budget spent, or the policy
//!   is `Never`.
//! - `Starting → Failed`: launch error or readiness timeout, budget spent.
//! - `Running → WaitingOnDependencies`: unexpected exit, restart permitted.
//! - `Running → Stopped`: supervisor-initiated graceful shutdown.
//!
//! `Failed` and `Stopped` are terminal; a unit leaves `Failed` only through
//! the manual [`restart_unit`](crate::Supervisor::restart_unit) override,
//! which recreates the unit's actor.

/// Lifecycle state of one managed unit.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UnitState {
    /// Declared but not yet processed by the supervisor.
    Pending,
    /// Startup began; blocked until all dependencies are healthy.
    WaitingOnDependencies,
    /// Launched; waiting for the unit's own readiness probe to pass.
    Starting,
    /// Probe passed; the process is serving.
    Running,
    /// Terminal: restart budget spent, dependency failed, or policy `Never`.
    Failed,
    /// Terminal: stopped by the supervisor (shutdown or cancellation).
    Stopped,
}

impl UnitState {
    /// Returns `true` for the terminal states `Failed` and `Stopped`.
    pub fn is_terminal(&self) -> bool {
        matches!(self, UnitState::Failed | UnitState::Stopped)
    }

    /// Returns a short stable label (snake_case) for logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            UnitState::Pending => "pending",
            UnitState::WaitingOnDependencies => "waiting_on_dependencies",
            UnitState::Starting => "starting",
            UnitState::Running => "running",
            UnitState::Failed => "failed",
            UnitState::Stopped => "stopped",
        }
    }
}
