//! Parking Module
//!
//! Spot allocation and the ticket lifecycle (entry → exit).

mod allocator;
mod error;
mod manager;

#[cfg(test)]
mod tests;

pub use allocator::SpotAllocator;
pub use error::{ParkingError, ParkingResult};
pub use manager::{ParkingEntry, TicketManager};
