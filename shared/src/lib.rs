//! Shared types for the parking lot system
//!
//! Models and time helpers used by the ticketing service and its front ends.

pub mod models;
pub mod types;
pub mod util;

// Re-exports
pub use models::{ParkingSpot, Ticket, TicketCreate, UnknownCategory, VehicleCategory};
pub use serde::{Deserialize, Serialize};
pub use types::Timestamp;
