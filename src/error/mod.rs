//! Error types for the unitctl library.
//!
//! Provides a unified error handling system using thiserror.

mod types;

pub use types::*;
