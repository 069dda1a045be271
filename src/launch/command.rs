//! Opaque launch specification.

use std::path::PathBuf;

/// Description of how to start one service process.
///
/// The supervisor treats this as opaque data: only the
/// [`Launcher`](crate::Launcher) interprets it. Built with chained setters,
/// mirroring `std::process::Command`:
///
/// ```
/// use stackvisor::CommandSpec;
///
/// let cmd = CommandSpec::new("redis-server")
///     .arg("--port")
///     .arg("6379")
///     .env("REDIS_LOG", "warning")
///     .current_dir("/var/lib/redis");
/// assert_eq!(cmd.program(), "redis-server");
/// ```
#[derive(Debug, Clone)]
pub struct CommandSpec {
    program: String,
    args: Vec<String>,
    env: Vec<(String, String)>,
    cwd: Option<PathBuf>,
}

impl CommandSpec {
    /// Creates a spec for `program` with no arguments.
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            env: Vec::new(),
            cwd: None,
        }
    }

    /// Appends one argument.
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Appends several arguments.
    pub fn args(mut self, args: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Sets one environment variable for the child.
    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.push((key.into(), value.into()));
        self
    }

    /// Sets the child's working directory.
    pub fn current_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cwd = Some(dir.into());
        self
    }

    /// Returns the program name/path.
    pub fn program(&self) -> &str {
        &self.program
    }

    /// Returns the argument list.
    pub fn argv(&self) -> &[String] {
        &self.args
    }

    /// Returns the extra environment variables.
    pub fn environment(&self) -> &[(String, String)] {
        &self.env
    }

    /// Returns the working directory, if set.
    pub fn working_dir(&self) -> Option<&PathBuf> {
        self.cwd.as_ref()
    }
}
