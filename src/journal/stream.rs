//! Follow-mode journal streaming.

use std::io::{BufRead, BufReader, Lines};
use std::process::{Child, ChildStdout, Command, Stdio};

use tracing::{debug, warn};

use crate::error::{Error, ProcessErrorKind, Result};
use crate::journal::JournalMsg;

/// Live follow-mode stream of journal entries.
///
/// The caller owns the underlying process until [`close`](Self::close) is
/// invoked: iterate to consume entries, then call `close` to terminate and
/// reap the tool. When the tool exits on its own (log rotation, crash) the
/// pipe reaches end-of-file and iteration stops, but `close` is still
/// required to reap the process; dropping the stream unclosed kills and
/// reaps it as a safety net.
pub struct JournalStream {
    child: Child,
    lines: Lines<BufReader<ChildStdout>>,
    closed: bool,
}

impl JournalStream {
    pub(crate) fn spawn(program: &str, args: &[String]) -> Result<Self> {
        debug!(program = %program, args = ?args, "Starting journal stream");

        let mut child = Command::new(program)
            .args(args)
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| Error::Process {
                kind: ProcessErrorKind::SpawnFailed {
                    program: program.to_string(),
                    message: e.to_string(),
                },
            })?;

        let stdout = match child.stdout.take() {
            Some(stdout) => stdout,
            None => {
                let _ = child.kill();
                let _ = child.wait();
                return Err(Error::Process {
                    kind: ProcessErrorKind::SpawnFailed {
                        program: program.to_string(),
                        message: "stdout pipe unavailable".to_string(),
                    },
                });
            }
        };

        Ok(Self {
            child,
            lines: BufReader::new(stdout).lines(),
            closed: false,
        })
    }

    /// Terminate the tool if it is still running and reap it.
    ///
    /// Idempotent; must be called (or the stream dropped) to release the
    /// process.
    pub fn close(&mut self) -> Result<()> {
        if self.closed {
            return Ok(());
        }
        self.closed = true;

        if self.child.try_wait()?.is_none() {
            debug!("Killing journal stream process");
            self.child.kill()?;
        }
        self.child.wait()?;
        Ok(())
    }
}

impl Iterator for JournalStream {
    type Item = Result<JournalMsg>;

    /// The next decoded entry, blocking until the tool emits one. `None`
    /// once the pipe reaches end-of-file.
    fn next(&mut self) -> Option<Self::Item> {
        loop {
            match self.lines.next()? {
                Ok(line) if line.trim().is_empty() => continue,
                Ok(line) => return Some(JournalMsg::decode(&line)),
                Err(e) => return Some(Err(Error::Io(e))),
            }
        }
    }
}

impl Drop for JournalStream {
    fn drop(&mut self) {
        if !self.closed {
            if let Err(e) = self.close() {
                warn!(error = %e, "Failed to close journal stream on drop");
            }
        }
    }
}
