//! External process collaborator.
//!
//! The supervisor never interprets what a service *does*; it only needs to
//! launch it, wait for its exit, and terminate it. This module defines that
//! seam:
//!
//! - [`CommandSpec`] — opaque launch description (program, args, env, cwd)
//! - [`Launcher`] / [`ProcessHandle`] — the collaborator traits
//! - [`ProcessLauncher`] — production implementation over [`tokio::process`]
//!
//! Tests inject a fake [`Launcher`] through
//! [`Supervisor::with_launcher`](crate::Supervisor::with_launcher), so no
//! real processes are spawned when exercising orchestration logic.

mod command;
mod process;

pub use command::CommandSpec;
pub use process::ProcessLauncher;

use std::time::Duration;

use async_trait::async_trait;

/// Handle to one launched process.
///
/// Implementations must make [`wait`](ProcessHandle::wait) cancel-safe: the
/// supervisor races it against probe polls and cancellation, and may call it
/// again after a lost race.
#[async_trait]
pub trait ProcessHandle: Send {
    /// Suspends until the process exits; returns the exit code (`-1` when the
    /// process was terminated by a signal).
    async fn wait(&mut self) -> std::io::Result<i32>;

    /// Requests a graceful stop, escalating to a forced kill once `grace`
    /// elapses. Returns after the process is gone.
    async fn terminate(&mut self, grace: Duration) -> std::io::Result<()>;
}

/// Creates processes from a [`CommandSpec`].
#[async_trait]
pub trait Launcher: Send + Sync + 'static {
    /// Launches the described process and returns a handle to it.
    async fn launch(&self, command: &CommandSpec) -> std::io::Result<Box<dyn ProcessHandle>>;
}
