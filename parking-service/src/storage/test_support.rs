//! Failure injection for tests above the storage layer

use super::{LotStorage, ParkingStore, StorageError, StorageResult};
use shared::models::{ParkingSpot, Ticket, TicketCreate, VehicleCategory};
use std::cell::Cell;

/// Delegates to a [`LotStorage`] but can be told to fail writes
///
/// A failing `close_ticket` leaves the inner store untouched, like an
/// aborted redb transaction.
pub(crate) struct FlakyStore {
    pub(crate) inner: LotStorage,
    pub(crate) fail_update_ticket: Cell<bool>,
    pub(crate) fail_save_spot: Cell<bool>,
    pub(crate) fail_delete_ticket: Cell<bool>,
}

impl FlakyStore {
    pub(crate) fn new(inner: LotStorage) -> Self {
        Self {
            inner,
            fail_update_ticket: Cell::new(false),
            fail_save_spot: Cell::new(false),
            fail_delete_ticket: Cell::new(false),
        }
    }
}

impl ParkingStore for FlakyStore {
    fn find_available_spot(&self, category: VehicleCategory) -> StorageResult<Option<u32>> {
        self.inner.find_available_spot(category)
    }

    fn count_available(&self, category: VehicleCategory) -> StorageResult<usize> {
        self.inner.count_available(category)
    }

    fn save_spot_state(&self, spot: &ParkingSpot) -> StorageResult<()> {
        if self.fail_save_spot.get() {
            return Err(StorageError::SpotNotFound {
                category: spot.category,
                id: spot.id,
            });
        }
        self.inner.save_spot_state(spot)
    }

    fn find_open_ticket(&self, vehicle_reg_number: &str) -> StorageResult<Option<Ticket>> {
        self.inner.find_open_ticket(vehicle_reg_number)
    }

    fn has_any_prior_ticket(
        &self,
        vehicle_reg_number: &str,
        excluding: Option<i64>,
    ) -> StorageResult<bool> {
        self.inner.has_any_prior_ticket(vehicle_reg_number, excluding)
    }

    fn create_ticket(&self, data: TicketCreate) -> StorageResult<Ticket> {
        self.inner.create_ticket(data)
    }

    fn update_ticket(&self, ticket: &Ticket) -> StorageResult<()> {
        if self.fail_update_ticket.get() {
            return Err(StorageError::TicketNotFound(ticket.id));
        }
        self.inner.update_ticket(ticket)
    }

    fn close_ticket(&self, ticket: &Ticket) -> StorageResult<()> {
        if self.fail_update_ticket.get() {
            return Err(StorageError::TicketNotFound(ticket.id));
        }
        if self.fail_save_spot.get() {
            return Err(StorageError::SpotNotFound {
                category: ticket.category,
                id: ticket.spot_id,
            });
        }
        self.inner.close_ticket(ticket)
    }

    fn delete_ticket(&self, id: i64) -> StorageResult<()> {
        if self.fail_delete_ticket.get() {
            return Err(StorageError::TicketNotFound(id));
        }
        self.inner.delete_ticket(id)
    }
}
