//! Supervisor: validates the unit graph, spawns unit actors, and owns the
//! control surface.
//!
//! ## Key responsibilities
//! - validate the dependency graph **before** any launch (all-or-nothing
//!   configuration check)
//! - spawn one [`UnitActor`](crate::core::actor::UnitActor) per unit; actors
//!   in unrelated branches start concurrently while dependents gate on the
//!   [`HealthBoard`]
//! - fan out lifecycle events to subscribers via [`SubscriberSet`]
//! - stop units in reverse startup order on [`shutdown`](Supervisor::shutdown)
//!   (dependents before dependencies), with per-unit grace
//! - expose the status surface ([`status`](Supervisor::status)) and the manual
//!   [`restart_unit`](Supervisor::restart_unit) override
//!
//! ## Startup flow
//! ```text
//! start(units):
//!   DependencyGraph::startup_order()    ─► ConfigError? return, launch nothing
//!   HealthBoard::new(all Pending)
//!   for unit in startup order: spawn UnitActor (child cancellation token)
//!   await: every unit Running at least once, or terminal
//!     └─ any Failed ─► Err(StartupFailed { failed })   (other branches kept)
//! ```
//!
//! ## Shutdown flow
//! ```text
//! shutdown():
//!   publish ShutdownRequested
//!   for unit in REVERSE startup order:
//!     cancel actor ─► actor terminates process (grace, then kill) ─► Stopped
//!     join with budget; overrun ─► stuck
//!   stuck empty ─► AllStoppedWithin : GraceExceeded
//! ```

use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, OnceLock};
use std::time::Duration;

use futures::future::join_all;
use tokio::sync::{watch, RwLock};
use tokio::task::JoinHandle;
use tokio::time;
use tokio_util::sync::CancellationToken;

use crate::config::Config;
use crate::core::actor::{UnitActor, UnitActorParams};
use crate::core::board::HealthBoard;
use crate::core::shutdown::wait_for_shutdown_signal;
use crate::error::RuntimeError;
use crate::events::{Bus, Event, EventKind};
use crate::graph::DependencyGraph;
use crate::launch::{Launcher, ProcessLauncher};
use crate::subscribers::{Subscribe, SubscriberSet};
use crate::units::{UnitSpec, UnitState};

/// Handle to one spawned unit actor.
struct UnitHandle {
    join: JoinHandle<()>,
    stop: CancellationToken,
}

/// State that exists only after a successful `start()`.
struct Started {
    board: Arc<HealthBoard>,
    order: Vec<String>,
    specs: HashMap<String, UnitSpec>,
    actors: RwLock<HashMap<String, UnitHandle>>,
    runtime_token: CancellationToken,
    shutdown_done: AtomicBool,
}

/// Orchestrates unit actors, event delivery, and ordered shutdown.
///
/// Construct inside a tokio runtime (subscriber workers are spawned eagerly).
/// A supervisor starts exactly once; reconfiguring the unit set means
/// creating a new supervisor.
pub struct Supervisor {
    cfg: Config,
    bus: Bus,
    subs: Arc<SubscriberSet>,
    launcher: Arc<dyn Launcher>,
    started: OnceLock<Started>,
}

impl Supervisor {
    /// Creates a supervisor with the given config and subscribers, launching
    /// real OS processes via [`ProcessLauncher`].
    pub fn new(cfg: Config, subscribers: Vec<Arc<dyn Subscribe>>) -> Self {
        let bus = Bus::new(cfg.bus_capacity);
        let subs = Arc::new(SubscriberSet::new(subscribers, bus.clone()));
        Self {
            cfg,
            bus,
            subs,
            launcher: Arc::new(ProcessLauncher::new()),
            started: OnceLock::new(),
        }
    }

    /// Replaces the process launcher (tests inject fakes here).
    pub fn with_launcher(mut self, launcher: Arc<dyn Launcher>) -> Self {
        self.launcher = launcher;
        self
    }

    /// Starts every unit, gated on dependencies, and resolves once each unit
    /// has reached `Running` at least once or ended terminal.
    ///
    /// - Configuration errors (duplicate unit, unknown dependency, cycle)
    ///   abort before a single launch.
    /// - Units sharing no dependency path start concurrently; a failure in
    ///   one branch marks that unit and its transitive dependents `Failed`
    ///   but never halts unrelated branches.
    /// - Returns `Err(RuntimeError::StartupFailed)` listing units that ended
    ///   `Failed` after their restart budget; details stay readable through
    ///   [`status`](Self::status).
    ///
    /// Cancellation: a concurrent [`shutdown`](Self::shutdown) interrupts the
    /// startup; units that never launched end `Stopped`, not `Failed`.
    pub async fn start(&self, units: Vec<UnitSpec>) -> Result<(), RuntimeError> {
        let mut graph = DependencyGraph::new();
        for unit in &units {
            graph.add_unit(unit.name(), unit.dependencies().iter().cloned())?;
        }
        let order = graph.startup_order()?;

        let board = Arc::new(HealthBoard::new(&order));
        let specs: HashMap<String, UnitSpec> = units
            .into_iter()
            .map(|u| (u.name().to_string(), u))
            .collect();

        let started = Started {
            board,
            order,
            specs,
            actors: RwLock::new(HashMap::new()),
            runtime_token: CancellationToken::new(),
            shutdown_done: AtomicBool::new(false),
        };
        if self.started.set(started).is_err() {
            return Err(RuntimeError::AlreadyStarted);
        }
        let started = self.started.get().expect("just set");

        self.subscriber_listener();

        {
            let mut actors = started.actors.write().await;
            for name in &started.order {
                let spec = started.specs[name].clone();
                actors.insert(name.clone(), self.spawn_actor(started, spec));
            }
        }

        let waits = started
            .order
            .iter()
            .map(|name| first_outcome(started.board.watch(name).expect("unit on board")));
        let outcomes = join_all(waits).await;

        let failed: Vec<String> = started
            .order
            .iter()
            .zip(&outcomes)
            .filter(|(_, state)| matches!(state, UnitState::Failed))
            .map(|(name, _)| name.clone())
            .collect();
        if failed.is_empty() {
            Ok(())
        } else {
            Err(RuntimeError::StartupFailed { failed })
        }
    }

    /// Starts the units, waits for an OS termination signal, then shuts down.
    pub async fn run(&self, units: Vec<UnitSpec>) -> Result<(), RuntimeError> {
        self.start(units).await?;
        let _ = wait_for_shutdown_signal().await;
        self.shutdown().await
    }

    /// Stops all units in reverse startup order (dependents first).
    ///
    /// Each unit gets the configured grace to stop on its own before its
    /// process is killed. Idempotent: a second call observes the shutdown
    /// already done and returns `Ok(())` without touching anything.
    pub async fn shutdown(&self) -> Result<(), RuntimeError> {
        let Some(started) = self.started.get() else {
            return Ok(());
        };
        if started.shutdown_done.swap(true, Ordering::SeqCst) {
            return Ok(());
        }
        // Cancelling the runtime token up front covers actors spawned
        // concurrently with this sweep: their child tokens are born
        // cancelled, so they stop before launching anything.
        started.runtime_token.cancel();
        self.bus.publish(Event::now(EventKind::ShutdownRequested));

        // Budget per unit: the actor itself escalates terminate → kill after
        // `grace`, so the join must be allowed to outlast one full escalation.
        let grace = self.cfg.grace;
        let join_budget = grace.saturating_mul(2) + Duration::from_secs(1);

        let mut stuck = Vec::new();
        for name in started.order.iter().rev() {
            let handle = { started.actors.write().await.remove(name) };
            let Some(handle) = handle else { continue };
            handle.stop.cancel();
            if time::timeout(join_budget, handle.join).await.is_err() {
                stuck.push(name.clone());
            }
        }

        if stuck.is_empty() {
            self.bus.publish(Event::now(EventKind::AllStoppedWithin));
            Ok(())
        } else {
            self.bus.publish(
                Event::now(EventKind::GraceExceeded).with_reason(format!("{stuck:?}")),
            );
            Err(RuntimeError::GraceExceeded { grace, stuck })
        }
    }

    /// Manual override: recreates `name`'s actor, re-entering the state
    /// machine at `WaitingOnDependencies` with a cleared retry budget.
    ///
    /// This is the only way a unit leaves the terminal `Failed` state.
    ///
    /// Rejected with [`RuntimeError::ShutDown`] once [`shutdown`](Self::shutdown)
    /// has run: a shut-down supervisor never launches anything again.
    pub async fn restart_unit(&self, name: &str) -> Result<(), RuntimeError> {
        let started = self.started.get().ok_or(RuntimeError::NotStarted)?;
        if started.shutdown_done.load(Ordering::SeqCst) {
            return Err(RuntimeError::ShutDown);
        }
        let spec = started
            .specs
            .get(name)
            .cloned()
            .ok_or_else(|| RuntimeError::UnknownUnit {
                name: name.to_string(),
            })?;

        self.bus
            .publish(Event::now(EventKind::RestartRequested).with_unit(name));

        let old = { started.actors.write().await.remove(name) };
        if let Some(handle) = old {
            handle.stop.cancel();
            let _ = handle.join.await;
        }
        let fresh = self.spawn_actor(started, spec);
        started.actors.write().await.insert(name.to_string(), fresh);
        Ok(())
    }

    /// Status surface: current mapping of unit name → state.
    ///
    /// Empty before [`start`](Self::start). The snapshot is consistent at the
    /// moment of the call; it is rebuilt from the per-unit channels, never
    /// cached.
    pub fn status(&self) -> BTreeMap<String, UnitState> {
        self.started
            .get()
            .map(|s| s.board.snapshot())
            .unwrap_or_default()
    }

    /// Returns the aggregate health board, if started.
    pub fn board(&self) -> Option<&HealthBoard> {
        self.started.get().map(|s| &*s.board)
    }

    /// Subscribes to the bus and forwards events to the subscriber set.
    fn subscriber_listener(&self) {
        let mut rx = self.bus.subscribe();
        let subs = Arc::clone(&self.subs);
        tokio::spawn(async move {
            loop {
                match rx.recv().await {
                    Ok(ev) => subs.emit(&ev),
                    Err(tokio::sync::broadcast::error::RecvError::Lagged(_)) => continue,
                    Err(tokio::sync::broadcast::error::RecvError::Closed) => break,
                }
            }
        });
    }

    /// Spawns one unit actor under a child token of the runtime token.
    fn spawn_actor(&self, started: &Started, spec: UnitSpec) -> UnitHandle {
        let stop = started.runtime_token.child_token();
        let actor = UnitActor::new(
            spec,
            UnitActorParams {
                grace: self.cfg.grace,
                stability_window: self.cfg.stability_window,
            },
            self.bus.clone(),
            Arc::clone(&started.board),
            Arc::clone(&self.launcher),
        );
        let join = tokio::spawn(actor.run(stop.clone()));
        UnitHandle { join, stop }
    }
}

/// Resolves with the first `Running` or terminal state a unit reaches.
async fn first_outcome(mut rx: watch::Receiver<UnitState>) -> UnitState {
    loop {
        let state = *rx.borrow_and_update();
        if matches!(state, UnitState::Running) || state.is_terminal() {
            return state;
        }
        if rx.changed().await.is_err() {
            return *rx.borrow();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::UnitTimeouts;
    use crate::error::ConfigError;
    use crate::launch::{CommandSpec, ProcessHandle};
    use crate::policies::{BackoffPolicy, JitterPolicy, RestartPolicy};
    use crate::probes::{ProbeFn, ProbeRef};
    use async_trait::async_trait;
    use std::sync::atomic::AtomicBool;
    use std::sync::Mutex;
    use tokio::time::Instant;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    // ---- fake launcher -------------------------------------------------

    #[derive(Clone, Copy)]
    enum Behavior {
        /// Run until terminated.
        RunForever,
        /// Exit on its own with the given code after the delay.
        ExitAfter(Duration, i32),
        /// Launch itself fails.
        FailToLaunch,
    }

    struct FakeLauncher {
        behaviors: HashMap<String, Behavior>,
        launches: Mutex<Vec<String>>,
    }

    impl FakeLauncher {
        fn new(behaviors: impl IntoIterator<Item = (&'static str, Behavior)>) -> Arc<Self> {
            Arc::new(Self {
                behaviors: behaviors
                    .into_iter()
                    .map(|(n, b)| (n.to_string(), b))
                    .collect(),
                launches: Mutex::new(Vec::new()),
            })
        }

        fn quiet() -> Arc<Self> {
            Self::new([])
        }

        fn launches(&self) -> Vec<String> {
            self.launches.lock().unwrap().clone()
        }

        fn count(&self, name: &str) -> usize {
            self.launches().iter().filter(|n| *n == name).count()
        }
    }

    #[async_trait]
    impl Launcher for FakeLauncher {
        async fn launch(&self, command: &CommandSpec) -> std::io::Result<Box<dyn ProcessHandle>> {
            let name = command.program().to_string();
            let behavior = self
                .behaviors
                .get(&name)
                .copied()
                .unwrap_or(Behavior::RunForever);
            self.launches.lock().unwrap().push(name);
            match behavior {
                Behavior::FailToLaunch => Err(std::io::Error::other("launcher refused")),
                other => Ok(Box::new(FakeHandle {
                    behavior: other,
                    terminated: CancellationToken::new(),
                    launched_at: Instant::now(),
                })),
            }
        }
    }

    struct FakeHandle {
        behavior: Behavior,
        terminated: CancellationToken,
        launched_at: Instant,
    }

    #[async_trait]
    impl ProcessHandle for FakeHandle {
        async fn wait(&mut self) -> std::io::Result<i32> {
            match self.behavior {
                Behavior::ExitAfter(delay, code) => {
                    tokio::select! {
                        _ = time::sleep_until(self.launched_at + delay) => Ok(code),
                        _ = self.terminated.cancelled() => Ok(0),
                    }
                }
                _ => {
                    self.terminated.cancelled().await;
                    Ok(0)
                }
            }
        }

        async fn terminate(&mut self, _grace: Duration) -> std::io::Result<()> {
            self.terminated.cancel();
            Ok(())
        }
    }

    // ---- spec/config helpers -------------------------------------------

    fn healthy() -> ProbeRef {
        ProbeFn::arc(|| async { true })
    }

    fn never_healthy() -> ProbeRef {
        ProbeFn::arc(|| async { false })
    }

    fn flag_probe(flag: Arc<AtomicBool>) -> ProbeRef {
        ProbeFn::arc(move || {
            let flag = Arc::clone(&flag);
            async move { flag.load(Ordering::SeqCst) }
        })
    }

    fn fast_timeouts() -> UnitTimeouts {
        UnitTimeouts {
            poll_interval: ms(5),
            probe_attempt: ms(50),
            dependency_wait: ms(1000),
            startup: ms(60),
        }
    }

    fn fast_backoff() -> BackoffPolicy {
        BackoffPolicy {
            first: ms(5),
            max: Duration::from_secs(60),
            factor: 1.0,
            jitter: JitterPolicy::None,
        }
    }

    fn unit(name: &str, probe: ProbeRef) -> UnitSpec {
        UnitSpec::new(name, CommandSpec::new(name), probe)
            .with_timeouts(fast_timeouts())
            .with_backoff(fast_backoff())
    }

    fn supervisor(launcher: Arc<FakeLauncher>) -> Supervisor {
        supervisor_with(launcher, Duration::from_secs(60))
    }

    fn supervisor_with(launcher: Arc<FakeLauncher>, stability_window: Duration) -> Supervisor {
        let cfg = Config {
            grace: ms(200),
            stability_window,
            ..Config::default()
        };
        Supervisor::new(cfg, Vec::new()).with_launcher(launcher)
    }

    async fn wait_for_state(sup: &Supervisor, name: &str, want: UnitState) {
        let deadline = Instant::now() + Duration::from_secs(5);
        loop {
            if sup.status().get(name) == Some(&want) {
                return;
            }
            assert!(
                Instant::now() < deadline,
                "unit '{name}' never reached {want:?}, status: {:?}",
                sup.status()
            );
            time::sleep(ms(5)).await;
        }
    }

    // ---- scenarios ------------------------------------------------------

    #[tokio::test(flavor = "multi_thread")]
    async fn test_stack_starts_in_dependency_order() {
        let launcher = FakeLauncher::quiet();
        let sup = supervisor(Arc::clone(&launcher));

        sup.start(vec![
            unit("db", healthy()),
            unit("cache", healthy()),
            unit("app", healthy()).depends_on(["db", "cache"]),
            unit("proxy", healthy()).depends_on(["app"]),
        ])
        .await
        .unwrap();

        let status = sup.status();
        for name in ["db", "cache", "app", "proxy"] {
            assert_eq!(status[name], UnitState::Running, "unit {name}");
        }

        // The launch log is the ordering witness: dependents never launch
        // before their prerequisites are running.
        let launches = launcher.launches();
        let pos = |n: &str| launches.iter().position(|x| x == n).unwrap();
        assert!(pos("db") < pos("app"));
        assert!(pos("cache") < pos("app"));
        assert!(pos("app") < pos("proxy"));

        sup.shutdown().await.unwrap();
        for (_, state) in sup.status() {
            assert_eq!(state, UnitState::Stopped);
        }
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_ordering_holds_across_concurrent_branches() {
        let launcher = FakeLauncher::quiet();
        let sup = supervisor(Arc::clone(&launcher));

        // Two independent branches plus one unit joining them.
        sup.start(vec![
            unit("a1", healthy()),
            unit("a2", healthy()).depends_on(["a1"]),
            unit("b1", healthy()),
            unit("b2", healthy()).depends_on(["b1"]),
            unit("top", healthy()).depends_on(["a2", "b2"]),
        ])
        .await
        .unwrap();

        let launches = launcher.launches();
        let pos = |n: &str| launches.iter().position(|x| x == n).unwrap();
        assert!(pos("a1") < pos("a2"));
        assert!(pos("b1") < pos("b2"));
        assert!(pos("a2") < pos("top"));
        assert!(pos("b2") < pos("top"));

        sup.shutdown().await.unwrap();
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_probe_failure_exhausts_retries_and_propagates() {
        let launcher = FakeLauncher::quiet();
        let sup = supervisor(Arc::clone(&launcher));

        let err = sup
            .start(vec![
                unit("db", healthy()),
                unit("app", never_healthy())
                    .depends_on(["db"])
                    .with_restart(RestartPolicy::OnFailure { max_retries: 2 }),
                unit("proxy", healthy()).depends_on(["app"]),
            ])
            .await
            .unwrap_err();

        match err {
            RuntimeError::StartupFailed { failed } => {
                assert!(failed.contains(&"app".to_string()));
                assert!(failed.contains(&"proxy".to_string()));
                assert!(!failed.contains(&"db".to_string()));
            }
            other => panic!("expected StartupFailed, got {other:?}"),
        }

        // Initial attempt + 2 retries, then terminal.
        assert_eq!(launcher.count("app"), 3);
        // The dependent fails by propagation, without ever launching.
        assert_eq!(launcher.count("proxy"), 0);

        let status = sup.status();
        assert_eq!(status["db"], UnitState::Running);
        assert_eq!(status["app"], UnitState::Failed);
        assert_eq!(status["proxy"], UnitState::Failed);

        sup.shutdown().await.unwrap();
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_cycle_rejected_before_any_launch() {
        let launcher = FakeLauncher::quiet();
        let sup = supervisor(Arc::clone(&launcher));

        let err = sup
            .start(vec![
                unit("a", healthy()).depends_on(["b"]),
                unit("b", healthy()).depends_on(["a"]),
            ])
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            RuntimeError::Config(ConfigError::CyclicDependency { .. })
        ));
        assert!(launcher.launches().is_empty());
        assert!(sup.status().is_empty());
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_duplicate_unit_rejected_before_any_launch() {
        let launcher = FakeLauncher::quiet();
        let sup = supervisor(Arc::clone(&launcher));

        let err = sup
            .start(vec![unit("db", healthy()), unit("db", healthy())])
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            RuntimeError::Config(ConfigError::DuplicateUnit { .. })
        ));
        assert!(launcher.launches().is_empty());
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_unexpected_exit_restarts_under_always_policy() {
        let launcher = FakeLauncher::new([("db", Behavior::ExitAfter(ms(20), 1))]);
        let sup = supervisor(Arc::clone(&launcher));

        sup.start(vec![unit("db", healthy())
            .with_restart(RestartPolicy::Always)
            .with_backoff(BackoffPolicy {
                first: ms(10),
                max: Duration::from_secs(60),
                factor: 2.0,
                jitter: JitterPolicy::None,
            })])
            .await
            .unwrap();

        // Crash → backoff → relaunch, repeatedly; never terminal.
        time::sleep(ms(300)).await;
        assert!(launcher.count("db") >= 3, "launches: {:?}", launcher.launches());
        assert_ne!(sup.status()["db"], UnitState::Failed);

        sup.shutdown().await.unwrap();
        assert_eq!(sup.status()["db"], UnitState::Stopped);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_stability_window_resets_retry_budget() {
        let launcher = FakeLauncher::new([("db", Behavior::ExitAfter(ms(30), 1))]);
        // Every 30ms run counts as stable, so the single-retry budget never
        // accumulates across crashes.
        let sup = supervisor_with(Arc::clone(&launcher), ms(1));

        sup.start(vec![unit("db", healthy())
            .with_restart(RestartPolicy::OnFailure { max_retries: 1 })])
            .await
            .unwrap();

        time::sleep(ms(300)).await;
        assert!(launcher.count("db") >= 3, "launches: {:?}", launcher.launches());
        assert_ne!(sup.status()["db"], UnitState::Failed);

        sup.shutdown().await.unwrap();
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_launch_error_feeds_restart_policy() {
        let launcher = FakeLauncher::new([("app", Behavior::FailToLaunch)]);
        let sup = supervisor(Arc::clone(&launcher));

        let err = sup
            .start(vec![unit("app", healthy())
                .with_restart(RestartPolicy::OnFailure { max_retries: 1 })])
            .await
            .unwrap_err();

        assert!(matches!(err, RuntimeError::StartupFailed { .. }));
        assert_eq!(launcher.count("app"), 2);
        assert_eq!(sup.status()["app"], UnitState::Failed);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_never_policy_fails_on_first_error() {
        let launcher = FakeLauncher::quiet();
        let sup = supervisor(Arc::clone(&launcher));

        let err = sup
            .start(vec![unit("app", never_healthy()).with_restart(RestartPolicy::Never)])
            .await
            .unwrap_err();

        assert!(matches!(err, RuntimeError::StartupFailed { .. }));
        assert_eq!(launcher.count("app"), 1);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_dependency_wait_timeout_fails_startup() {
        let launcher = FakeLauncher::quiet();
        let sup = Arc::new(supervisor(Arc::clone(&launcher)));

        // db is merely slow, not broken: it keeps retrying under Always and
        // comes up only after app has already given up on waiting for it.
        let db_ready = Arc::new(AtomicBool::new(false));
        let impatient = UnitTimeouts {
            dependency_wait: ms(40),
            ..fast_timeouts()
        };
        let units = vec![
            unit("db", flag_probe(Arc::clone(&db_ready))).with_restart(RestartPolicy::Always),
            unit("app", healthy())
                .depends_on(["db"])
                .with_timeouts(impatient)
                .with_restart(RestartPolicy::Never),
        ];
        let starter = {
            let sup = Arc::clone(&sup);
            tokio::spawn(async move { sup.start(units).await })
        };

        wait_for_state(&sup, "app", UnitState::Failed).await;
        assert_eq!(launcher.count("app"), 0);

        db_ready.store(true, Ordering::SeqCst);
        match starter.await.unwrap() {
            Err(RuntimeError::StartupFailed { failed }) => {
                assert_eq!(failed, vec!["app".to_string()]);
            }
            other => panic!("expected StartupFailed, got {other:?}"),
        }
        assert_eq!(sup.status()["db"], UnitState::Running);

        sup.shutdown().await.unwrap();
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_shutdown_during_startup_stops_pending_units() {
        let launcher = FakeLauncher::quiet();
        let sup = Arc::new(supervisor(Arc::clone(&launcher)));

        // db keeps retrying forever; app can never leave the dependency wait.
        let units = vec![
            unit("db", never_healthy()).with_restart(RestartPolicy::Always),
            unit("app", healthy()).depends_on(["db"]),
        ];
        let starter = {
            let sup = Arc::clone(&sup);
            tokio::spawn(async move { sup.start(units).await })
        };

        time::sleep(ms(50)).await;
        sup.shutdown().await.unwrap();

        // Cancellation is not a failure: interrupted units end Stopped.
        starter.await.unwrap().unwrap();
        let status = sup.status();
        assert_eq!(status["db"], UnitState::Stopped);
        assert_eq!(status["app"], UnitState::Stopped);
        assert_eq!(launcher.count("app"), 0);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_shutdown_is_idempotent() {
        let launcher = FakeLauncher::quiet();
        let sup = supervisor(Arc::clone(&launcher));

        sup.start(vec![unit("db", healthy())]).await.unwrap();
        sup.shutdown().await.unwrap();
        let after_first = sup.status();
        sup.shutdown().await.unwrap();
        assert_eq!(sup.status(), after_first);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_shutdown_without_start_is_a_noop() {
        let sup = supervisor(FakeLauncher::quiet());
        sup.shutdown().await.unwrap();
        assert!(sup.status().is_empty());
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_second_start_is_rejected() {
        let sup = supervisor(FakeLauncher::quiet());
        sup.start(vec![unit("db", healthy())]).await.unwrap();
        let err = sup.start(vec![unit("db", healthy())]).await.unwrap_err();
        assert!(matches!(err, RuntimeError::AlreadyStarted));
        sup.shutdown().await.unwrap();
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_manual_restart_recovers_failed_unit() {
        let launcher = FakeLauncher::quiet();
        let sup = supervisor(Arc::clone(&launcher));

        let ready = Arc::new(AtomicBool::new(false));
        let err = sup
            .start(vec![unit("app", flag_probe(Arc::clone(&ready)))
                .with_restart(RestartPolicy::OnFailure { max_retries: 1 })])
            .await
            .unwrap_err();
        assert!(matches!(err, RuntimeError::StartupFailed { .. }));
        assert_eq!(sup.status()["app"], UnitState::Failed);

        // Operator fixes the service, then overrides the terminal state.
        ready.store(true, Ordering::SeqCst);
        sup.restart_unit("app").await.unwrap();
        wait_for_state(&sup, "app", UnitState::Running).await;

        sup.shutdown().await.unwrap();
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_restart_after_shutdown_is_rejected() {
        let launcher = FakeLauncher::quiet();
        let sup = supervisor(Arc::clone(&launcher));

        sup.start(vec![unit("db", healthy())]).await.unwrap();
        sup.shutdown().await.unwrap();
        assert_eq!(sup.status()["db"], UnitState::Stopped);
        let launches_before = launcher.launches().len();

        // A shut-down supervisor must not resurrect units it can no longer
        // stop.
        let err = sup.restart_unit("db").await.unwrap_err();
        assert!(matches!(err, RuntimeError::ShutDown));
        time::sleep(ms(50)).await;
        assert_eq!(sup.status()["db"], UnitState::Stopped);
        assert_eq!(launcher.launches().len(), launches_before);
        sup.shutdown().await.unwrap();
        assert_eq!(sup.status()["db"], UnitState::Stopped);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_restart_of_unknown_unit_errors() {
        let sup = supervisor(FakeLauncher::quiet());
        assert!(matches!(
            sup.restart_unit("ghost").await,
            Err(RuntimeError::NotStarted)
        ));

        sup.start(vec![unit("db", healthy())]).await.unwrap();
        assert!(matches!(
            sup.restart_unit("ghost").await,
            Err(RuntimeError::UnknownUnit { .. })
        ));
        sup.shutdown().await.unwrap();
    }
}
