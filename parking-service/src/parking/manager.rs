//! TicketManager - ticket lifecycle for entering and exiting vehicles
//!
//! # Entry Flow
//!
//! ```text
//! process_entry(reg, category, now)
//!     ├─ 1. Reject if the vehicle already has an open ticket
//!     ├─ 2. Find the lowest free spot (LotFull if none)
//!     ├─ 3. Recurring check (display only)
//!     ├─ 4. Create the open ticket, then reserve the spot
//!     │     (ticket removed again if the reservation fails)
//!     └─ 5. Return ticket + recurring flag
//! ```
//!
//! # Exit Flow
//!
//! ```text
//! process_exit(reg, now)
//!     ├─ 1. Load the open ticket (VehicleNotParked if none)
//!     ├─ 2. Set exit time
//!     ├─ 3. Recurring check (any other ticket for this vehicle)
//!     ├─ 4. Compute fare
//!     └─ 5. Persist ticket + release spot in one store write
//!           (ticket stays open and spot occupied on failure)
//! ```

use super::allocator::SpotAllocator;
use super::error::{ParkingError, ParkingResult};
use crate::pricing::FareCalculator;
use crate::storage::{ParkingStore, StorageError};
use shared::models::{Ticket, TicketCreate, VehicleCategory};
use shared::types::Timestamp;

/// Result of a successful entry
#[derive(Debug, Clone, PartialEq)]
pub struct ParkingEntry {
    pub ticket: Ticket,
    /// The vehicle has parked here before (discount will apply at exit)
    pub is_recurring: bool,
}

/// Ticket lifecycle manager
///
/// Owns its store; nothing here is global.
pub struct TicketManager<S: ParkingStore> {
    store: S,
    calculator: FareCalculator,
}

impl<S: ParkingStore> std::fmt::Debug for TicketManager<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TicketManager")
            .field("store", &"<ParkingStore>")
            .field("calculator", &self.calculator)
            .finish()
    }
}

impl<S: ParkingStore> TicketManager<S> {
    pub fn new(store: S, calculator: FareCalculator) -> Self {
        Self { store, calculator }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn allocator(&self) -> SpotAllocator<'_, S> {
        SpotAllocator::new(&self.store)
    }

    /// Open a ticket for an entering vehicle
    ///
    /// On any error the lot is left as it was: no ticket, no reserved spot.
    pub fn process_entry(
        &self,
        vehicle_reg_number: &str,
        category: VehicleCategory,
        now: Timestamp,
    ) -> ParkingResult<ParkingEntry> {
        if self.store.find_open_ticket(vehicle_reg_number)?.is_some() {
            return Err(ParkingError::VehicleAlreadyParked(
                vehicle_reg_number.to_string(),
            ));
        }

        let allocator = self.allocator();
        let spot = allocator
            .next_available_spot(category)?
            .ok_or(ParkingError::LotFull(category))?;

        let is_recurring = self.store.has_any_prior_ticket(vehicle_reg_number, None)?;

        let ticket = self.store.create_ticket(TicketCreate {
            spot_id: spot.id,
            category,
            vehicle_reg_number: vehicle_reg_number.to_string(),
            entry_time: now,
        })?;

        if let Err(e) = allocator.reserve_spot(&spot) {
            // 回滚: 车位未占用则票据作废
            return Err(match self.store.delete_ticket(ticket.id) {
                Ok(()) => e,
                Err(rollback) => StorageError::RollbackFailed {
                    cause: e.to_string(),
                    rollback: Box::new(rollback),
                }
                .into(),
            });
        }

        Ok(ParkingEntry {
            ticket,
            is_recurring,
        })
    }

    /// Close the open ticket of an exiting vehicle and release its spot
    ///
    /// Closing the ticket and releasing the spot is a single store write. If
    /// it fails, `PersistenceFailure` is returned, the ticket stays open and
    /// the spot occupied, so the exit can simply be retried.
    pub fn process_exit(&self, vehicle_reg_number: &str, now: Timestamp) -> ParkingResult<Ticket> {
        let mut ticket = self
            .store
            .find_open_ticket(vehicle_reg_number)?
            .ok_or_else(|| ParkingError::VehicleNotParked(vehicle_reg_number.to_string()))?;

        ticket.exit_time = Some(now);

        let is_recurring = self
            .store
            .has_any_prior_ticket(vehicle_reg_number, Some(ticket.id))?;

        ticket.price = self.calculator.compute_fare(
            ticket.entry_time,
            ticket.exit_time,
            ticket.category,
            is_recurring,
        )?;

        self.store.close_ticket(&ticket)?;

        Ok(ticket)
    }
}
