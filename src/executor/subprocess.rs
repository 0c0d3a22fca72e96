//! Subprocess execution for the external service-management tools.
//!
//! Provides a builder for running `systemctl`/`journalctl` invocations with:
//! - No shell interpretation (direct exec)
//! - Captured stdout/stderr
//! - An optional bounded wait that kills the process on expiry

use std::process::{Command, Output, Stdio};
use std::time::{Duration, Instant};

use tracing::{debug, warn};

use crate::error::{Error, ProcessErrorKind, Result};

/// Result of a subprocess execution.
///
/// A non-zero exit is reported here rather than as an error; callers decide
/// how to classify exit codes (`status` maps 2/3/4 to dedicated conditions).
#[derive(Debug, Clone)]
pub struct SubprocessResult {
    /// Whether the command exited successfully (exit code 0).
    pub success: bool,
    /// The exit code, if available.
    pub exit_code: Option<i32>,
    /// Captured stdout as a string.
    pub stdout: String,
    /// Captured stderr as a string.
    pub stderr: String,
}

impl SubprocessResult {
    fn from_output(output: Output) -> Self {
        Self {
            success: output.status.success(),
            exit_code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        }
    }

    /// Combined stdout and stderr, in that order.
    ///
    /// The external tools write diagnostics to stderr and payload to stdout;
    /// callers that want "whatever the tool printed" use this.
    pub fn combined(&self) -> String {
        let mut out = String::with_capacity(self.stdout.len() + self.stderr.len());
        out.push_str(&self.stdout);
        out.push_str(&self.stderr);
        out
    }
}

/// Builder for subprocess execution.
pub struct SubprocessBuilder {
    program: String,
    args: Vec<String>,
    timeout: Option<Duration>,
}

impl SubprocessBuilder {
    /// Create a new subprocess builder.
    pub fn new(program: &str) -> Self {
        Self {
            program: program.to_string(),
            args: Vec::new(),
            timeout: None,
        }
    }

    /// Add arguments to the command.
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.args.extend(args.into_iter().map(|s| s.as_ref().to_string()));
        self
    }

    /// Add a single argument.
    pub fn arg(mut self, arg: &str) -> Self {
        self.args.push(arg.to_string());
        self
    }

    /// Set a bounded wait for the command. Without one, a hung tool blocks
    /// the caller indefinitely.
    pub fn timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Execute the command and wait for completion.
    ///
    /// With a timeout configured, the process is polled and killed once the
    /// deadline passes, returning a timeout error.
    pub fn run(self) -> Result<SubprocessResult> {
        debug!(
            program = %self.program,
            args = ?self.args,
            "Executing subprocess"
        );

        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args);
        cmd.stdout(Stdio::piped());
        cmd.stderr(Stdio::piped());

        let mut child = cmd.spawn().map_err(|e| Error::Process {
            kind: ProcessErrorKind::SpawnFailed {
                program: self.program.clone(),
                message: e.to_string(),
            },
        })?;

        let start = Instant::now();

        if let Some(timeout) = self.timeout {
            let poll_interval = Duration::from_millis(100);

            loop {
                match child.try_wait() {
                    Ok(Some(_status)) => break,
                    Ok(None) => {
                        if start.elapsed() > timeout {
                            warn!(
                                program = %self.program,
                                timeout_secs = timeout.as_secs(),
                                "Process timed out, killing"
                            );
                            if let Err(e) = child.kill() {
                                warn!(error = %e, "Failed to kill timed-out process");
                            }
                            // Reap the zombie process
                            let _ = child.wait();
                            return Err(Error::Process {
                                kind: ProcessErrorKind::Timeout {
                                    program: self.program,
                                    timeout_secs: timeout.as_secs(),
                                },
                            });
                        }
                        std::thread::sleep(poll_interval);
                    }
                    Err(e) => {
                        return Err(Error::Process {
                            kind: ProcessErrorKind::SpawnFailed {
                                program: self.program,
                                message: format!("failed to check process status: {}", e),
                            },
                        });
                    }
                }
            }
        }

        let output = child.wait_with_output().map_err(|e| Error::Process {
            kind: ProcessErrorKind::SpawnFailed {
                program: self.program.clone(),
                message: format!("failed to collect output: {}", e),
            },
        })?;
        let result = SubprocessResult::from_output(output);

        debug!(
            success = result.success,
            exit_code = ?result.exit_code,
            duration_ms = start.elapsed().as_millis(),
            "Subprocess completed"
        );

        Ok(result)
    }
}
