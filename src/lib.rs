//! # stackvisor
//!
//! **Stackvisor** is a readiness-gated service supervisor for Rust.
//!
//! It starts a set of dependent services (a database, a cache, an application
//! server, a reverse proxy, ...) in dependency order, gates each service's
//! startup on its prerequisites passing a health probe, restarts failed
//! services under bounded backoff, and exposes an aggregate health view. The
//! supervised processes themselves are opaque: the crate owns orchestration,
//! not the services' business logic.
//!
//! ## Architecture
//! ```text
//!     ┌──────────────┐   ┌──────────────┐   ┌──────────────┐
//!     │   UnitSpec   │   │   UnitSpec   │   │   UnitSpec   │
//!     │  (db, [])    │   │(app,[db,..]) │   │(proxy,[app]) │
//!     └──────┬───────┘   └──────┬───────┘   └──────┬───────┘
//!            ▼                  ▼                  ▼
//! ┌───────────────────────────────────────────────────────────────┐
//! │  Supervisor                                                   │
//! │  - DependencyGraph (validate, topological startup order)      │
//! │  - HealthBoard (per-unit state, watch-channel gating)         │
//! │  - Bus (broadcast lifecycle events)                           │
//! │  - SubscriberSet (fans out to user subscribers)               │
//! └──────┬──────────────────┬──────────────────┬──────────────────┘
//!        ▼                  ▼                  ▼
//!     ┌──────────────┐   ┌──────────────┐   ┌──────────────┐
//!     │  UnitActor   │   │  UnitActor   │   │  UnitActor   │
//!     │ wait deps →  │   │ wait deps →  │   │ wait deps →  │
//!     │ launch →     │   │ launch →     │   │ launch →     │
//!     │ probe → run  │   │ probe → run  │   │ probe → run  │
//!     └──────────────┘   └──────────────┘   └──────────────┘
//! ```
//!
//! ## Lifecycle
//! ```text
//! UnitSpec ──► Supervisor::start() ──► UnitActor::run()
//!
//! loop {
//!   ├─► WaitingOnDependencies: watch each dep until Running
//!   │      └─ dep Failed ─► DependencyFailed ─► Failed (propagates)
//!   ├─► Starting: launcher.launch(command)
//!   │      └─► poll readiness probe until healthy (or timeout / early exit)
//!   ├─► Running: monitor process exit
//!   │      ├─ cancellation ─► terminate(grace) ─► Stopped
//!   │      └─ unexpected exit ─► restart policy
//!   └─► restart policy:
//!        ├─ Never                    ─► Failed
//!        ├─ OnFailure, retries left  ─► backoff sleep ─► re-enter loop
//!        ├─ OnFailure, exhausted     ─► Failed
//!        └─ Always                   ─► backoff sleep ─► re-enter loop
//! }
//! ```
//!
//! ## Example
//! ```no_run
//! use stackvisor::{
//!     CommandSpec, Config, RestartPolicy, Supervisor, TcpProbe, UnitSpec,
//! };
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let cfg = Config::default();
//!     let sup = Supervisor::new(cfg, Vec::new());
//!
//!     let db = UnitSpec::new(
//!         "db",
//!         CommandSpec::new("postgres").arg("-D").arg("/var/lib/pg"),
//!         TcpProbe::arc("127.0.0.1:5432"),
//!     );
//!     let app = UnitSpec::new(
//!         "app",
//!         CommandSpec::new("gunicorn").arg("myapp:app"),
//!         TcpProbe::arc("127.0.0.1:8000"),
//!     )
//!     .depends_on(["db"])
//!     .with_restart(RestartPolicy::Always);
//!
//!     // Start everything, wait for SIGINT/SIGTERM, then stop in reverse order.
//!     sup.run(vec![db, app]).await?;
//!     Ok(())
//! }
//! ```

mod config;
mod core;
mod error;
mod events;
mod graph;
mod launch;
mod policies;
mod probes;
mod subscribers;
mod units;

// ---- Public re-exports ----

pub use config::{Config, UnitTimeouts};
pub use crate::core::{HealthBoard, Supervisor};
pub use error::{ConfigError, RuntimeError, UnitError};
pub use events::{Bus, Event, EventKind};
pub use graph::DependencyGraph;
pub use launch::{CommandSpec, Launcher, ProcessHandle, ProcessLauncher};
pub use policies::{BackoffPolicy, JitterPolicy, RestartPolicy};
pub use probes::{wait_until_healthy, Probe, ProbeFn, ProbeRef, ProbeReport, TcpProbe};
pub use subscribers::{Subscribe, SubscriberSet};
pub use units::{UnitSpec, UnitState};

// Optional: a simple built-in stdout event logger (demo/reference).
// Enable with: `--features logging`
#[cfg(feature = "logging")]
pub use subscribers::LogWriter;
