//! Unit listing row.

use serde::Deserialize;

/// One row of `list-units --output json`: a read-only snapshot of a unit
/// known to the service manager.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct Unit {
    /// Unit name, e.g. `nginx.service`.
    pub unit: String,
    /// Load state (`loaded`, `not-found`, `error`, ...).
    pub load: String,
    /// Active state (`active`, `inactive`, `failed`, ...).
    pub active: String,
    /// Sub state (`running`, `dead`, `exited`, ...).
    pub sub: String,
    /// Human-readable description.
    pub description: String,
}
