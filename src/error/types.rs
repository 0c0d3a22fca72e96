//! Error types for the unitctl library.

use thiserror::Error;

/// Main error type for unitctl operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Subprocess execution errors.
    #[error("process error: {kind}")]
    Process { kind: ProcessErrorKind },

    /// Classified `systemctl status` exit-code conditions.
    ///
    /// The captured combined output of the status invocation is preserved
    /// on the error so callers can still inspect it.
    #[error("{kind}")]
    UnitStatus { kind: UnitStatusKind, output: String },

    /// Malformed or unexpectedly shaped tool output.
    #[error("decode error: {message}")]
    Decode { message: String },

    /// Service definition validation errors.
    #[error("validation error: {kind}")]
    Validation { kind: ValidationErrorKind },

    /// Unit-file template errors.
    #[error("template error: {message}")]
    Template { message: String },

    /// I/O errors.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Subprocess error kinds.
#[derive(Error, Debug)]
pub enum ProcessErrorKind {
    #[error("failed to spawn {program}: {message}")]
    SpawnFailed { program: String, message: String },

    #[error("{program} exited with code {code:?}: {output}")]
    ExitedNonZero {
        program: String,
        code: Option<i32>,
        output: String,
    },

    #[error("{program} timed out after {timeout_secs} seconds")]
    Timeout { program: String, timeout_secs: u64 },
}

/// Documented `systemctl status` exit-code conditions.
///
/// Exit codes 2, 3 and 4 carry these meanings; any other non-zero exit is
/// a generic [`ProcessErrorKind::ExitedNonZero`].
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnitStatusKind {
    #[error("unit unused")]
    UnitUnused,

    #[error("unit is not active")]
    UnitNotActive,

    #[error("no such unit")]
    NoSuchUnit,
}

/// Validation error kinds.
#[derive(Error, Debug)]
pub enum ValidationErrorKind {
    #[error("missing required field: {field}")]
    MissingField { field: &'static str },
}

/// Result type alias for unitctl operations.
pub type Result<T> = std::result::Result<T, Error>;
