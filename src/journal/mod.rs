//! Journal Reader: a facade over the `journalctl` executable.
//!
//! Two retrieval modes share one argument-building policy: a one-shot
//! query decoding the N most recent entries, and a follow-mode stream
//! tailing the log until closed.

mod message;
mod stream;

pub use message::JournalMsg;
pub use stream::JournalStream;

use std::time::Duration;

use tracing::debug;

use crate::error::{Error, ProcessErrorKind, Result};
use crate::executor::SubprocessBuilder;

const JOURNALCTL_EXEC: &str = "journalctl";

/// Default entry count when none is requested.
const DEFAULT_LINES: u32 = 20;

/// Query options shared by one-shot and follow-mode retrieval.
#[derive(Debug, Clone, Default)]
pub struct JournalOptions {
    /// Show entries from the specified unit only (`-u`).
    pub unit: Option<String>,

    /// Number of entries to show (`-n`); defaults to 20.
    pub lines: Option<u32>,

    /// Show entries not older than the specified date (`--since`).
    pub since: Option<String>,

    /// Resume token appended verbatim as a trailing argument; callers
    /// supply the complete flag form, e.g. `--after-cursor=<cursor>`.
    pub after_cursor: Option<String>,
}

impl JournalOptions {
    fn to_args(&self) -> Vec<String> {
        let mut args = Vec::new();

        if let Some(unit) = &self.unit {
            args.push("-u".to_string());
            args.push(unit.clone());
        }

        args.push("-n".to_string());
        args.push(self.lines.unwrap_or(DEFAULT_LINES).to_string());

        if let Some(since) = &self.since {
            args.push("--since".to_string());
            args.push(since.clone());
        }

        if let Some(cursor) = &self.after_cursor {
            args.push(cursor.clone());
        }

        args
    }
}

/// Facade over the log-query tool.
#[derive(Debug, Clone)]
pub struct JournalReader {
    user: bool,
    program: String,
    timeout: Option<Duration>,
}

impl JournalReader {
    /// Reader over the system journal.
    pub fn system() -> Self {
        Self {
            user: false,
            program: JOURNALCTL_EXEC.to_string(),
            timeout: None,
        }
    }

    /// Reader over the invoking user's journal (`--user`).
    pub fn user() -> Self {
        Self {
            user: true,
            ..Self::system()
        }
    }

    /// Override the log-query executable (tests point this at a fake).
    pub fn program(mut self, program: impl Into<String>) -> Self {
        self.program = program.into();
        self
    }

    /// Bound the wait for one-shot queries. By default `get` blocks until
    /// the tool exits.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Whether this reader queries the user journal.
    pub fn is_user(&self) -> bool {
        self.user
    }

    /// One-shot retrieval of journal entries.
    ///
    /// Runs the tool to completion, then decodes stdout line by line.
    /// Per-line decode failures are collected and joined with any non-zero
    /// exit into a single error; `Ok` means every line decoded and the tool
    /// exited cleanly.
    pub fn get(&self, options: &JournalOptions) -> Result<Vec<JournalMsg>> {
        let args = self.build_args(options, false);
        let result = SubprocessBuilder::new(&self.program)
            .args(&args)
            .timeout(self.timeout)
            .run()?;

        let mut msgs = Vec::new();
        let mut errors = Vec::new();

        for (idx, line) in result.stdout.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            match JournalMsg::decode(line) {
                Ok(msg) => msgs.push(msg),
                Err(e) => errors.push(format!("line {}: {}", idx + 1, e)),
            }
        }

        if !result.success {
            if errors.is_empty() {
                return Err(Error::Process {
                    kind: ProcessErrorKind::ExitedNonZero {
                        program: self.program.clone(),
                        code: result.exit_code,
                        output: result.combined(),
                    },
                });
            }
            errors.push(format!(
                "{} exited with code {:?}: {}",
                self.program,
                result.exit_code,
                result.stderr.trim()
            ));
        }

        if !errors.is_empty() {
            return Err(Error::Decode {
                message: errors.join("; "),
            });
        }

        debug!(count = msgs.len(), "Fetched journal entries");
        Ok(msgs)
    }

    /// Follow-mode retrieval: forces the follow flag and returns a live
    /// stream over the tool's stdout. See [`JournalStream`] for the
    /// ownership contract.
    pub fn stream(&self, options: &JournalOptions) -> Result<JournalStream> {
        let args = self.build_args(options, true);
        JournalStream::spawn(&self.program, &args)
    }

    fn build_args(&self, options: &JournalOptions, follow: bool) -> Vec<String> {
        let mut args = options.to_args();
        if follow {
            args.push("-f".to_string());
        }
        args.push("--output".to_string());
        args.push("json".to_string());
        if self.user {
            args.push("--user".to_string());
        }
        args
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_args() {
        let options = JournalOptions {
            unit: Some("X".to_string()),
            ..Default::default()
        };
        let args = JournalReader::system().build_args(&options, false);
        assert_eq!(args, ["-u", "X", "-n", "20", "--output", "json"]);
        assert!(!args.contains(&"-f".to_string()));
        assert!(!args.contains(&"--since".to_string()));
    }

    #[test]
    fn test_full_args_order() {
        let options = JournalOptions {
            unit: Some("nginx".to_string()),
            lines: Some(50),
            since: Some("2024-01-01".to_string()),
            after_cursor: Some("--after-cursor=s=abc".to_string()),
        };
        let args = JournalReader::user().build_args(&options, true);
        assert_eq!(
            args,
            [
                "-u",
                "nginx",
                "-n",
                "50",
                "--since",
                "2024-01-01",
                "--after-cursor=s=abc",
                "-f",
                "--output",
                "json",
                "--user",
            ]
        );
    }

    #[test]
    fn test_user_flag_appended_in_user_scope() {
        let args = JournalReader::user().build_args(&JournalOptions::default(), false);
        assert_eq!(args.last().map(String::as_str), Some("--user"));
    }
}
