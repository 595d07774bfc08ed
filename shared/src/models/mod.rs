//! Data models
//!
//! Shared between the ticketing service and the interactive shell.
//! Timestamps are `i64` Unix millis.

pub mod parking_spot;
pub mod ticket;

// Re-exports
pub use parking_spot::*;
pub use ticket::*;
