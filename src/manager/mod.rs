//! Unit Manager: a facade over the `systemctl` executable.
//!
//! Each operation maps 1:1 to one subprocess invocation and returns either
//! the captured combined output or a parsed structure. No state is held
//! between calls beyond the immutable scope configuration.

mod scope;
mod unit;

pub use scope::{Scope, SYSTEM_UNIT_DIR};
pub use unit::Unit;

use std::collections::HashMap;
use std::fs::{self, OpenOptions};
use std::time::Duration;

use tracing::{debug, info};

use crate::error::{Error, ProcessErrorKind, Result, UnitStatusKind};
use crate::executor::SubprocessBuilder;
use crate::journal::JournalReader;
use crate::service_file::ServiceDefinition;

const SYSTEMCTL_EXEC: &str = "systemctl";

/// Facade over the service-control tool.
///
/// Safe to share across operations: every call spawns its own process and
/// the scope configuration is immutable after construction.
#[derive(Debug, Clone)]
pub struct UnitManager {
    scope: Scope,
    program: String,
    timeout: Option<Duration>,
}

impl UnitManager {
    /// Manager for the system instance, writing unit files under
    /// `/etc/systemd/system/`.
    pub fn system() -> Self {
        Self::with_scope(Scope::system())
    }

    /// Manager for the invoking user's instance; commands get `--user` and
    /// unit files live under the per-user directory.
    pub fn user() -> Self {
        Self::with_scope(Scope::user())
    }

    /// Manager with an explicit scope.
    pub fn with_scope(scope: Scope) -> Self {
        Self {
            scope,
            program: SYSTEMCTL_EXEC.to_string(),
            timeout: None,
        }
    }

    /// Override the service-control executable (tests point this at a fake).
    pub fn program(mut self, program: impl Into<String>) -> Self {
        self.program = program.into();
        self
    }

    /// Bound the wait for each invocation. By default calls block until the
    /// tool exits.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// The scope this manager operates in.
    pub fn scope(&self) -> &Scope {
        &self.scope
    }

    /// List service units, optionally filtered by a name glob pattern.
    pub fn list(&self, pattern: Option<&str>) -> Result<Vec<Unit>> {
        let mut args = vec!["list-units", "--type=service", "--all"];
        if let Some(pattern) = pattern {
            args.push(pattern);
        }
        args.extend(["--output", "json"]);

        let result = self.builder(&args).run()?;
        if !result.success {
            return Err(self.exit_error(result.exit_code, result.combined()));
        }

        let units: Vec<Unit> = serde_json::from_str(&result.stdout)?;
        debug!(count = units.len(), "Listed units");
        Ok(units)
    }

    /// Start a unit.
    pub fn start(&self, name: &str) -> Result<String> {
        info!(unit = %name, "Starting unit");
        self.exec(&["start", name])
    }

    /// Stop a unit.
    pub fn stop(&self, name: &str) -> Result<String> {
        info!(unit = %name, "Stopping unit");
        self.exec(&["stop", name])
    }

    /// Restart a unit.
    pub fn restart(&self, name: &str) -> Result<String> {
        info!(unit = %name, "Restarting unit");
        self.exec(&["restart", name])
    }

    /// Enable a unit to start with the system.
    pub fn enable(&self, name: &str) -> Result<String> {
        info!(unit = %name, "Enabling unit");
        self.exec(&["enable", name])
    }

    /// Disable a unit from autostart.
    pub fn disable(&self, name: &str) -> Result<String> {
        info!(unit = %name, "Disabling unit");
        self.exec(&["disable", name])
    }

    /// Query the status of a unit.
    ///
    /// Exit codes 2, 3 and 4 are the tool's documented status conditions and
    /// map to [`UnitStatusKind`]; the captured output stays accessible on
    /// the error. Any other non-zero exit is a generic process error.
    pub fn status(&self, name: &str) -> Result<String> {
        let result = self.builder(&["status", name]).run()?;
        let output = result.combined();

        if result.success {
            return Ok(output);
        }

        let kind = match result.exit_code {
            Some(2) => UnitStatusKind::UnitUnused,
            Some(3) => UnitStatusKind::UnitNotActive,
            Some(4) => UnitStatusKind::NoSuchUnit,
            _ => return Err(self.exit_error(result.exit_code, output)),
        };

        Err(Error::UnitStatus { kind, output })
    }

    /// Show unit properties as a key/value map.
    ///
    /// Output lines are split on the first `=`; lines without one are
    /// skipped.
    pub fn show(&self, name: &str) -> Result<HashMap<String, String>> {
        let output = self.exec(&["show", name])?;
        Ok(parse_properties(&output))
    }

    /// Reload the service manager configuration.
    pub fn daemon_reload(&self) -> Result<String> {
        info!("Reloading daemon configuration");
        self.exec(&["daemon-reload"])
    }

    /// Reset the "failed" state of all units.
    pub fn reset_failed(&self) -> Result<String> {
        self.exec(&["reset-failed"])
    }

    /// Delete the unit file for `name` from the scope directory, then
    /// reload the daemon. A failed deletion is returned as-is and the
    /// reload is never attempted.
    pub fn remove(&self, name: &str) -> Result<String> {
        let path = self.scope.unit_path(name);
        info!(path = %path.display(), "Removing unit file");
        fs::remove_file(&path)?;
        self.daemon_reload()
    }

    /// Render `definition` into a unit file at
    /// `{scope dir}/{name}.service`, creating or truncating it.
    ///
    /// Validation and render errors propagate; a render failure can leave
    /// the file truncated (no rollback).
    pub fn save_service(&self, name: &str, definition: &ServiceDefinition) -> Result<()> {
        definition.validate()?;

        let path = self.scope.unit_path(name);
        info!(path = %path.display(), "Writing unit file");

        let mut file = OpenOptions::new()
            .create(true)
            .truncate(true)
            .write(true)
            .open(&path)?;

        definition.write_to(&mut file)
    }

    /// A journal reader scoped like this manager, inheriting its bounded
    /// wait when one is configured.
    pub fn journal(&self) -> JournalReader {
        let reader = if self.scope.is_user() {
            JournalReader::user()
        } else {
            JournalReader::system()
        };
        match self.timeout {
            Some(timeout) => reader.timeout(timeout),
            None => reader,
        }
    }

    fn builder(&self, args: &[&str]) -> SubprocessBuilder {
        let mut builder = SubprocessBuilder::new(&self.program)
            .args(args)
            .timeout(self.timeout);
        if self.scope.is_user() {
            builder = builder.arg("--user");
        }
        builder
    }

    fn exec(&self, args: &[&str]) -> Result<String> {
        let result = self.builder(args).run()?;
        if !result.success {
            return Err(self.exit_error(result.exit_code, result.combined()));
        }
        Ok(result.combined())
    }

    fn exit_error(&self, code: Option<i32>, output: String) -> Error {
        Error::Process {
            kind: ProcessErrorKind::ExitedNonZero {
                program: self.program.clone(),
                code,
                output,
            },
        }
    }
}

fn parse_properties(output: &str) -> HashMap<String, String> {
    let mut props = HashMap::new();
    for line in output.lines() {
        let Some((key, value)) = line.split_once('=') else {
            continue;
        };
        props.insert(key.to_string(), value.to_string());
    }
    props
}
