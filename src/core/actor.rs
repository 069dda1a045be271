//! UnitActor: per-unit supervision loop.
//!
//! One actor owns one unit's lifecycle end to end:
//!
//! ```text
//! loop {
//!   ├─► WaitingOnDependencies
//!   │      └─► watch each dependency until Running
//!   │            ├─ dep Failed          ─► DependencyFailed ─► Failed (terminal)
//!   │            └─ dep-wait timeout    ─► restart policy
//!   ├─► Starting: launcher.launch(command)
//!   │      └─► poll readiness probe (races early process exit)
//!   ├─► Running: monitor exit
//!   │      ├─ cancellation     ─► terminate(grace) ─► Stopped
//!   │      └─ unexpected exit  ─► restart policy
//!   └─► restart policy: backoff sleep (cancellable) or terminal Failed
//! }
//! ```
//!
//! ## Rules
//! - Attempts run sequentially within one actor; the attempt counter is
//!   monotonic and increments on every launch.
//! - The actor is the **only** writer of its unit's state on the board.
//! - Cancellation is honored at every suspension point (dependency wait,
//!   probe polling, exit monitoring, backoff sleep); a cancelled unit ends
//!   `Stopped`, never `Failed`.
//! - The retry counter clears once the unit stays `Running` for the
//!   stability window.

use std::sync::Arc;
use std::time::Duration;

use tokio::select;
use tokio::time::{self, Instant};
use tokio_util::sync::CancellationToken;

use crate::core::board::HealthBoard;
use crate::error::UnitError;
use crate::events::{Bus, Event, EventKind};
use crate::launch::{Launcher, ProcessHandle};
use crate::probes::wait_until_healthy;
use crate::units::{UnitSpec, UnitState};

/// Supervisor-wide parameters an actor needs beyond its own spec.
#[derive(Clone, Copy)]
pub(crate) struct UnitActorParams {
    /// Grace before a terminate request escalates to a forced kill.
    pub grace: Duration,
    /// Continuous `Running` time after which the retry counter resets.
    pub stability_window: Duration,
}

/// Supervises one unit: dependency gating, launch, readiness, restarts.
pub(crate) struct UnitActor {
    spec: UnitSpec,
    params: UnitActorParams,
    bus: Bus,
    board: Arc<HealthBoard>,
    launcher: Arc<dyn Launcher>,
}

impl UnitActor {
    pub(crate) fn new(
        spec: UnitSpec,
        params: UnitActorParams,
        bus: Bus,
        board: Arc<HealthBoard>,
        launcher: Arc<dyn Launcher>,
    ) -> Self {
        Self {
            spec,
            params,
            bus,
            board,
            launcher,
        }
    }

    fn name(&self) -> &str {
        self.spec.name()
    }

    /// Runs the actor until graceful stop or restart-policy exhaustion.
    pub(crate) async fn run(self, stop: CancellationToken) {
        let mut retries: u32 = 0;
        let mut attempt: u32 = 0;

        loop {
            if stop.is_cancelled() {
                self.enter_stopped();
                return;
            }
            attempt += 1;

            match self.start_once(&stop, attempt).await {
                Ok(handle) => {
                    let running_since = Instant::now();
                    match self.monitor(handle, &stop).await {
                        Monitored::Stopped => {
                            self.enter_stopped();
                            return;
                        }
                        Monitored::Exited(code) => {
                            if running_since.elapsed() >= self.params.stability_window {
                                retries = 0;
                            }
                            let err = UnitError::UnexpectedExit { code };
                            self.publish_failed(attempt, &err);
                            if !self.schedule_retry(&stop, &mut retries, attempt, &err).await {
                                return;
                            }
                        }
                    }
                }
                Err(UnitError::Canceled) => {
                    self.enter_stopped();
                    return;
                }
                Err(err) if err.is_retryable() => {
                    self.publish_failed(attempt, &err);
                    if !self.schedule_retry(&stop, &mut retries, attempt, &err).await {
                        return;
                    }
                }
                Err(err) => {
                    // DependencyFailed: a dependent of a permanently failed
                    // prerequisite cannot recover by retrying.
                    self.publish_failed(attempt, &err);
                    self.board.set(self.name(), UnitState::Failed);
                    return;
                }
            }
        }
    }

    /// One startup pass: dependency wait → launch → readiness → `Running`.
    async fn start_once(
        &self,
        stop: &CancellationToken,
        attempt: u32,
    ) -> Result<Box<dyn ProcessHandle>, UnitError> {
        self.board.set(self.name(), UnitState::WaitingOnDependencies);
        self.publish(EventKind::UnitWaiting, attempt);
        self.wait_for_dependencies(stop).await?;

        self.board.set(self.name(), UnitState::Starting);
        self.publish(EventKind::UnitStarting, attempt);
        let mut handle = self
            .launcher
            .launch(self.spec.command())
            .await
            .map_err(|e| UnitError::Launch {
                error: e.to_string(),
            })?;

        let timeouts = self.spec.timeouts();
        let ready = wait_until_healthy(
            self.spec.probe().as_ref(),
            self.name(),
            timeouts.startup,
            timeouts.poll_interval,
            timeouts.probe_attempt,
            stop,
        );
        tokio::pin!(ready);

        let outcome = select! {
            res = &mut ready => res.map(|_report| ()),
            code = handle.wait() => Err(UnitError::UnexpectedExit {
                code: code.unwrap_or(-1),
            }),
        };
        if let Err(err) = outcome {
            // Launched but never became ready: reap the process before the
            // restart decision, except when it already exited on its own.
            if !matches!(err, UnitError::UnexpectedExit { .. }) {
                let _ = handle.terminate(self.params.grace).await;
            }
            return Err(err);
        }

        self.board.set(self.name(), UnitState::Running);
        self.publish(EventKind::UnitRunning, attempt);
        Ok(handle)
    }

    /// Blocks until every dependency reports `Running`.
    ///
    /// A dependency reaching `Running` has by construction passed its own
    /// readiness probe at least once — that is the ordering guarantee the
    /// whole design rests on.
    async fn wait_for_dependencies(&self, stop: &CancellationToken) -> Result<(), UnitError> {
        if self.spec.dependencies().is_empty() {
            return Ok(());
        }
        let timeout = self.spec.timeouts().dependency_wait;
        let deadline = Instant::now() + timeout;

        for dep in self.spec.dependencies() {
            // The graph was validated up front; a missing channel cannot
            // happen for a started supervisor.
            let Some(mut rx) = self.board.watch(dep) else {
                continue;
            };
            loop {
                match *rx.borrow_and_update() {
                    UnitState::Running => break,
                    UnitState::Failed => {
                        return Err(UnitError::DependencyFailed {
                            dependency: dep.clone(),
                        })
                    }
                    _ => {}
                }
                select! {
                    changed = rx.changed() => {
                        if changed.is_err() {
                            return Err(UnitError::DependencyFailed {
                                dependency: dep.clone(),
                            });
                        }
                    }
                    _ = time::sleep_until(deadline) => {
                        return Err(UnitError::DependencyTimeout { timeout })
                    }
                    _ = stop.cancelled() => return Err(UnitError::Canceled),
                }
            }
        }
        Ok(())
    }

    /// Watches a running process until it exits or the actor is cancelled.
    async fn monitor(&self, mut handle: Box<dyn ProcessHandle>, stop: &CancellationToken) -> Monitored {
        select! {
            res = handle.wait() => Monitored::Exited(res.unwrap_or(-1)),
            _ = stop.cancelled() => {
                let _ = handle.terminate(self.params.grace).await;
                Monitored::Stopped
            }
        }
    }

    /// Applies the restart policy after a failed attempt.
    ///
    /// Returns `true` when the supervision loop should run another attempt;
    /// on `false` the unit has reached a terminal state.
    async fn schedule_retry(
        &self,
        stop: &CancellationToken,
        retries: &mut u32,
        attempt: u32,
        err: &UnitError,
    ) -> bool {
        if !self.spec.restart().permits_retry(*retries) {
            self.board.set(self.name(), UnitState::Failed);
            return false;
        }

        let delay = self.spec.backoff().next(*retries);
        *retries += 1;
        self.bus.publish(
            Event::now(EventKind::BackoffScheduled)
                .with_unit(self.name())
                .with_attempt(attempt)
                .with_delay(delay)
                .with_reason(err.to_string()),
        );

        select! {
            _ = time::sleep(delay) => true,
            _ = stop.cancelled() => {
                self.enter_stopped();
                false
            }
        }
    }

    fn enter_stopped(&self) {
        self.board.set(self.name(), UnitState::Stopped);
        self.bus
            .publish(Event::now(EventKind::UnitStopped).with_unit(self.name()));
    }

    fn publish(&self, kind: EventKind, attempt: u32) {
        self.bus.publish(
            Event::now(kind)
                .with_unit(self.name())
                .with_attempt(attempt),
        );
    }

    fn publish_failed(&self, attempt: u32, err: &UnitError) {
        self.bus.publish(
            Event::now(EventKind::UnitFailed)
                .with_unit(self.name())
                .with_attempt(attempt)
                .with_reason(err.to_string()),
        );
    }
}

/// Result of watching one running process.
enum Monitored {
    /// The process exited on its own with this code.
    Exited(i32),
    /// The actor was cancelled and the process was terminated gracefully.
    Stopped,
}
