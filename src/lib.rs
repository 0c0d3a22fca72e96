//! unitctl: a programmatic facade over `systemctl` and `journalctl`.
//!
//! Translates function calls into subprocess invocations of the host
//! service-control and log-query tools and parses their output back into
//! typed structures. Managers and readers hold only immutable scope
//! configuration; every operation spawns its own process.

pub mod error;
pub mod executor;
pub mod journal;
pub mod manager;
pub mod service_file;

pub use error::{Error, ProcessErrorKind, Result, UnitStatusKind, ValidationErrorKind};
pub use journal::{JournalMsg, JournalOptions, JournalReader, JournalStream};
pub use manager::{Scope, Unit, UnitManager};
pub use service_file::{normalize_unit_name, ServiceDefinition};
