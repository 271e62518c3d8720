//! Shared types for the cofounder equity allocation system
//!
//! Holds the identifiers, roster records, error types and logging helpers
//! used by every crate in the workspace.

pub mod errors;
pub mod logging;
pub mod types;

pub use errors::*;
pub use types::*;
