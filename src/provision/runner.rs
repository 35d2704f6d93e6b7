//! Running the package-manager executable out of process.

use std::collections::HashMap;
use std::fmt;
use std::io::Read;
use std::path::PathBuf;
use std::process::{Child, Command, Stdio};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::debug;

/// Shared flag a host sets to stop a running tool.
///
/// Clones observe the same flag.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken(Arc<AtomicBool>);

impl CancellationToken {
    /// Create an unset token.
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    /// Whether cancellation was requested.
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// One invocation of the tool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolInvocation {
    /// Executable to run.
    pub program: PathBuf,

    /// Arguments, without the program.
    pub args: Vec<String>,

    /// Working directory (the project).
    pub cwd: PathBuf,

    /// Extra environment variables, merged with the inherited environment.
    pub env: HashMap<String, String>,
}

impl ToolInvocation {
    /// Create an invocation with no arguments.
    pub fn new(program: impl Into<PathBuf>, cwd: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            cwd: cwd.into(),
            env: HashMap::new(),
        }
    }

    /// Append arguments.
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Set an environment variable.
    pub fn env(mut self, key: &str, value: &str) -> Self {
        self.env.insert(key.to_string(), value.to_string());
        self
    }
}

impl fmt::Display for ToolInvocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program.display())?;
        for arg in &self.args {
            if arg.contains(' ') {
                write!(f, " \"{}\"", arg)?;
            } else {
                write!(f, " {}", arg)?;
            }
        }
        Ok(())
    }
}

/// Captured result of a finished invocation.
#[derive(Debug, Clone)]
pub struct ToolOutput {
    /// Exit code (None if killed by signal).
    pub exit_code: Option<i32>,

    /// Standard output.
    pub stdout: String,

    /// Standard error.
    pub stderr: String,

    /// Execution duration.
    pub duration: Duration,

    /// Whether the tool exited with code 0.
    pub success: bool,
}

impl ToolOutput {
    /// Create a success result.
    pub fn success(stdout: impl Into<String>) -> Self {
        Self {
            exit_code: Some(0),
            stdout: stdout.into(),
            stderr: String::new(),
            duration: Duration::ZERO,
            success: true,
        }
    }

    /// Create a failure result.
    pub fn failure(exit_code: Option<i32>, stderr: impl Into<String>) -> Self {
        Self {
            exit_code,
            stdout: String::new(),
            stderr: stderr.into(),
            duration: Duration::ZERO,
            success: false,
        }
    }

    /// Best description of why the invocation failed.
    ///
    /// Prefers stderr, then stdout, then the exit status.
    pub fn diagnostic(&self) -> String {
        let stderr = self.stderr.trim();
        if !stderr.is_empty() {
            return stderr.to_string();
        }
        let stdout = self.stdout.trim();
        if !stdout.is_empty() {
            return stdout.to_string();
        }
        match self.exit_code {
            Some(code) => format!("exited with code {}", code),
            None => "terminated by signal".to_string(),
        }
    }
}

/// Reasons an invocation produced no output at all.
#[derive(Debug, Error)]
pub enum RunToolError {
    /// The process could not be started or waited on.
    #[error("Failed to run {command}: {source}")]
    Launch {
        command: String,
        #[source]
        source: std::io::Error,
    },

    /// The cancellation token fired while the process was running.
    #[error("{command} was cancelled")]
    Cancelled { command: String },
}

/// Runs tool invocations.
pub trait ToolRunner {
    /// Run `invocation` to completion, or until `cancel` fires.
    fn run_tool(
        &self,
        invocation: &ToolInvocation,
        cancel: &CancellationToken,
    ) -> Result<ToolOutput, RunToolError>;
}

/// Runs invocations as child processes.
#[derive(Debug, Clone)]
pub struct ProcessRunner {
    poll_interval: Duration,
}

impl Default for ProcessRunner {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_millis(50),
        }
    }
}

impl ProcessRunner {
    /// Create a runner with the default poll interval.
    pub fn new() -> Self {
        Self::default()
    }

    /// How often the child is checked for exit and cancellation.
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }
}

fn drain<R: Read + Send + 'static>(pipe: Option<R>) -> JoinHandle<String> {
    thread::spawn(move || {
        let mut bytes = Vec::new();
        if let Some(mut pipe) = pipe {
            if let Err(e) = pipe.read_to_end(&mut bytes) {
                debug!("Stopped reading tool output: {}", e);
            }
        }
        String::from_utf8_lossy(&bytes).into_owned()
    })
}

fn stop(child: &mut Child) {
    let _ = child.kill();
    let _ = child.wait();
}

impl ToolRunner for ProcessRunner {
    fn run_tool(
        &self,
        invocation: &ToolInvocation,
        cancel: &CancellationToken,
    ) -> Result<ToolOutput, RunToolError> {
        let command = invocation.to_string();
        debug!("Running {} in {}", command, invocation.cwd.display());

        if cancel.is_cancelled() {
            return Err(RunToolError::Cancelled { command });
        }

        let start = Instant::now();
        let mut child = Command::new(&invocation.program)
            .args(&invocation.args)
            .current_dir(&invocation.cwd)
            .envs(&invocation.env)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|source| RunToolError::Launch {
                command: command.clone(),
                source,
            })?;

        let stdout_handle = drain(child.stdout.take());
        let stderr_handle = drain(child.stderr.take());

        let status = loop {
            if cancel.is_cancelled() {
                debug!("Cancelling {}", command);
                stop(&mut child);
                // Grandchildren may still hold the pipes open; leave the
                // reader threads to finish on their own.
                return Err(RunToolError::Cancelled { command });
            }
            match child.try_wait() {
                Ok(Some(status)) => break status,
                Ok(None) => thread::sleep(self.poll_interval),
                Err(source) => {
                    stop(&mut child);
                    return Err(RunToolError::Launch { command, source });
                }
            }
        };

        let stdout = stdout_handle.join().unwrap_or_default();
        let stderr = stderr_handle.join().unwrap_or_default();
        let duration = start.elapsed();
        debug!(
            "{} exited with {:?} after {:?}",
            command,
            status.code(),
            duration
        );

        Ok(ToolOutput {
            exit_code: status.code(),
            stdout,
            stderr,
            duration,
            success: status.success(),
        })
    }
}
