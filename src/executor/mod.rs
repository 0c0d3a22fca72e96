//! Subprocess executor module.
//!
//! Handles spawning the external tools and capturing their output.

mod subprocess;

pub use subprocess::{SubprocessBuilder, SubprocessResult};
