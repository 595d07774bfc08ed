//! Storage Module
//!
//! [`ParkingStore`] is the data-access contract the ticketing core consumes.
//! [`LotStorage`] implements it on top of an embedded redb database.

mod lot_storage;
#[cfg(test)]
pub(crate) mod test_support;

pub use lot_storage::LotStorage;

use shared::models::{ParkingSpot, Ticket, TicketCreate, VehicleCategory};
use thiserror::Error;

/// Storage errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(#[from] redb::DatabaseError),

    #[error("Transaction error: {0}")]
    Transaction(#[from] redb::TransactionError),

    #[error("Table error: {0}")]
    Table(#[from] redb::TableError),

    #[error("Storage error: {0}")]
    Storage(#[from] redb::StorageError),

    #[error("Commit error: {0}")]
    Commit(#[from] redb::CommitError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Spot not found: {category} #{id}")]
    SpotNotFound { category: VehicleCategory, id: u32 },

    #[error("Ticket not found: {0}")]
    TicketNotFound(i64),

    #[error("Vehicle {0} already has an open ticket")]
    DuplicateOpenTicket(String),

    #[error("Ticket {0} is still open")]
    TicketStillOpen(i64),

    #[error("Rollback failed after {cause}: {rollback}")]
    RollbackFailed {
        cause: String,
        rollback: Box<StorageError>,
    },
}

pub type StorageResult<T> = Result<T, StorageError>;

/// Data access used by the allocator and the ticket manager
///
/// All calls are synchronous and each write is durable when it returns.
pub trait ParkingStore {
    /// Lowest-numbered available spot of `category`, if any
    fn find_available_spot(&self, category: VehicleCategory) -> StorageResult<Option<u32>>;

    /// Number of available spots of `category`
    fn count_available(&self, category: VehicleCategory) -> StorageResult<usize>;

    /// Persist the availability flag of an existing spot
    fn save_spot_state(&self, spot: &ParkingSpot) -> StorageResult<()>;

    /// The open ticket of a vehicle, if it is parked
    fn find_open_ticket(&self, vehicle_reg_number: &str) -> StorageResult<Option<Ticket>>;

    /// Whether any ticket other than `excluding` was ever recorded for the vehicle
    fn has_any_prior_ticket(
        &self,
        vehicle_reg_number: &str,
        excluding: Option<i64>,
    ) -> StorageResult<bool>;

    /// Persist a new open ticket and assign its id
    fn create_ticket(&self, data: TicketCreate) -> StorageResult<Ticket>;

    /// Overwrite an existing ticket
    fn update_ticket(&self, ticket: &Ticket) -> StorageResult<()>;

    /// Persist a closed ticket and free its spot in one write
    ///
    /// Either both changes land or neither does.
    fn close_ticket(&self, ticket: &Ticket) -> StorageResult<()>;

    /// Remove a ticket and its index entries
    fn delete_ticket(&self, id: i64) -> StorageResult<()>;
}
