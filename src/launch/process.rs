//! OS-process launcher backed by [`tokio::process`].

use std::time::Duration;

use async_trait::async_trait;
use tokio::process::{Child, Command};

use crate::launch::{CommandSpec, Launcher, ProcessHandle};

/// Production [`Launcher`]: spawns real OS processes.
///
/// Children are spawned with `kill_on_drop`, so a crashed supervisor does not
/// leak orphans. Graceful termination sends `SIGTERM` on Unix and waits up to
/// the grace period before escalating to `SIGKILL`; on other platforms only
/// the forced kill is available.
#[derive(Debug, Default, Clone)]
pub struct ProcessLauncher;

impl ProcessLauncher {
    /// Creates a new launcher.
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Launcher for ProcessLauncher {
    async fn launch(&self, command: &CommandSpec) -> std::io::Result<Box<dyn ProcessHandle>> {
        let mut cmd = Command::new(command.program());
        cmd.args(command.argv());
        for (key, value) in command.environment() {
            cmd.env(key, value);
        }
        if let Some(dir) = command.working_dir() {
            cmd.current_dir(dir);
        }
        cmd.kill_on_drop(true);
        let child = cmd.spawn()?;
        Ok(Box::new(ChildHandle { child }))
    }
}

/// Handle over one spawned child process.
struct ChildHandle {
    child: Child,
}

impl ChildHandle {
    #[cfg(unix)]
    fn send_sigterm(&self) {
        use nix::sys::signal::{kill, Signal};
        use nix::unistd::Pid;

        if let Some(pid) = self.child.id() {
            let _ = kill(Pid::from_raw(pid as i32), Signal::SIGTERM);
        }
    }
}

#[async_trait]
impl ProcessHandle for ChildHandle {
    async fn wait(&mut self) -> std::io::Result<i32> {
        let status = self.child.wait().await?;
        Ok(status.code().unwrap_or(-1))
    }

    async fn terminate(&mut self, grace: Duration) -> std::io::Result<()> {
        if self.child.try_wait()?.is_some() {
            return Ok(());
        }

        #[cfg(unix)]
        {
            self.send_sigterm();
            if tokio::time::timeout(grace, self.child.wait()).await.is_ok() {
                return Ok(());
            }
        }
        #[cfg(not(unix))]
        let _ = grace;

        self.child.start_kill()?;
        self.child.wait().await?;
        Ok(())
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_wait_returns_exit_code() {
        let launcher = ProcessLauncher::new();
        let cmd = CommandSpec::new("sh").arg("-c").arg("exit 7");
        let mut handle = launcher.launch(&cmd).await.unwrap();
        assert_eq!(handle.wait().await.unwrap(), 7);
    }

    #[tokio::test]
    async fn test_terminate_stops_long_running_child() {
        let launcher = ProcessLauncher::new();
        let cmd = CommandSpec::new("sleep").arg("600");
        let mut handle = launcher.launch(&cmd).await.unwrap();
        handle
            .terminate(Duration::from_millis(500))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_launch_of_missing_program_errors() {
        let launcher = ProcessLauncher::new();
        let cmd = CommandSpec::new("/no/such/binary-stackvisor");
        assert!(launcher.launch(&cmd).await.is_err());
    }
}
