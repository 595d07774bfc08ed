//! redb-based storage for the parking lot
//!
//! # Tables
//!
//! | Table | Key | Value | Purpose |
//! |-------|-----|-------|---------|
//! | `spots` | `(category, spot_id)` | `ParkingSpot` | Spot pool and availability |
//! | `tickets` | `ticket_id` | `Ticket` | Every ticket ever issued |
//! | `open_tickets` | `vehicle_reg_number` | `ticket_id` | Parked vehicles |
//! | `vehicle_tickets` | `(vehicle_reg_number, ticket_id)` | `()` | History index (recurring check) |
//! | `sequence_counter` | `"ticket_id"` | `i64` | Last issued ticket id |
//!
//! Every mutating call runs in its own write transaction.

use super::{ParkingStore, StorageError, StorageResult};
use redb::{
    Database, ReadableDatabase, ReadableTable, ReadableTableMetadata, TableDefinition,
    WriteTransaction,
};
use shared::models::{ParkingSpot, Ticket, TicketCreate, VehicleCategory};
use std::path::Path;
use std::sync::Arc;

/// Spot pool: key = (category code, spot id), value = JSON-serialized ParkingSpot
const SPOTS_TABLE: TableDefinition<(&str, u32), &[u8]> = TableDefinition::new("spots");

/// Tickets: key = ticket id, value = JSON-serialized Ticket
const TICKETS_TABLE: TableDefinition<i64, &[u8]> = TableDefinition::new("tickets");

/// Open tickets: key = vehicle reg number, value = ticket id
const OPEN_TICKETS_TABLE: TableDefinition<&str, i64> = TableDefinition::new("open_tickets");

/// Ticket history per vehicle: key = (vehicle reg number, ticket id)
const VEHICLE_TICKETS_TABLE: TableDefinition<(&str, i64), ()> =
    TableDefinition::new("vehicle_tickets");

/// Counters
const SEQUENCE_TABLE: TableDefinition<&str, i64> = TableDefinition::new("sequence_counter");

const TICKET_ID_KEY: &str = "ticket_id";

/// Parking lot storage backed by redb
#[derive(Clone)]
pub struct LotStorage {
    db: Arc<Database>,
}

impl std::fmt::Debug for LotStorage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LotStorage").field("db", &"<redb>").finish()
    }
}

impl LotStorage {
    /// Open or create the database at the given path
    pub fn open(path: impl AsRef<Path>) -> StorageResult<Self> {
        let path = path.as_ref();
        let db = Database::create(path)?;
        Self::init(db)
            .inspect(|_| tracing::info!(path = %path.display(), "Parking database opened"))
    }

    /// Open an in-memory database (for testing)
    #[cfg(test)]
    pub fn open_in_memory() -> StorageResult<Self> {
        let db = Database::builder().create_with_backend(redb::backends::InMemoryBackend::new())?;
        Self::init(db)
    }

    /// Create all tables if they don't exist
    fn init(db: Database) -> StorageResult<Self> {
        let write_txn = db.begin_write()?;
        {
            let _ = write_txn.open_table(SPOTS_TABLE)?;
            let _ = write_txn.open_table(TICKETS_TABLE)?;
            let _ = write_txn.open_table(OPEN_TICKETS_TABLE)?;
            let _ = write_txn.open_table(VEHICLE_TICKETS_TABLE)?;

            let mut seq_table = write_txn.open_table(SEQUENCE_TABLE)?;
            if seq_table.get(TICKET_ID_KEY)?.is_none() {
                seq_table.insert(TICKET_ID_KEY, 0i64)?;
            }
        }
        write_txn.commit()?;

        Ok(Self { db: Arc::new(db) })
    }

    // ========== Spot Pool ==========

    /// Seed the spot pool of an empty lot
    ///
    /// Spot ids start at 1 within each category. A lot that already has spots
    /// is left untouched. Returns the number of spots created.
    pub fn seed_spots(&self, pool: &[(VehicleCategory, u32)]) -> StorageResult<usize> {
        let txn = self.db.begin_write()?;
        let created = {
            let mut table = txn.open_table(SPOTS_TABLE)?;
            if table.len()? > 0 {
                0
            } else {
                let mut created = 0;
                for (category, count) in pool {
                    for id in 1..=*count {
                        let spot = ParkingSpot::new(id, *category, true);
                        let value = serde_json::to_vec(&spot)?;
                        table.insert((category.code(), id), value.as_slice())?;
                        created += 1;
                    }
                }
                created
            }
        };
        txn.commit()?;

        if created > 0 {
            tracing::info!(spots = created, "Parking lot initialized");
        }
        Ok(created)
    }

    /// Get a spot by category and id
    pub fn get_spot(&self, category: VehicleCategory, id: u32) -> StorageResult<Option<ParkingSpot>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(SPOTS_TABLE)?;
        match table.get((category.code(), id))? {
            Some(value) => Ok(Some(serde_json::from_slice(value.value())?)),
            None => Ok(None),
        }
    }

    /// All spots of a category, ordered by id
    pub fn spots(&self, category: VehicleCategory) -> StorageResult<Vec<ParkingSpot>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(SPOTS_TABLE)?;

        let mut spots = Vec::new();
        for result in table.range((category.code(), 0u32)..=(category.code(), u32::MAX))? {
            let (_key, value) = result?;
            spots.push(serde_json::from_slice::<ParkingSpot>(value.value())?);
        }
        Ok(spots)
    }

    // ========== Tickets ==========

    /// Get a ticket by id
    pub fn get_ticket(&self, id: i64) -> StorageResult<Option<Ticket>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(TICKETS_TABLE)?;
        match table.get(id)? {
            Some(value) => Ok(Some(serde_json::from_slice(value.value())?)),
            None => Ok(None),
        }
    }

    /// All tickets of a vehicle, oldest first
    pub fn tickets_for_vehicle(&self, vehicle_reg_number: &str) -> StorageResult<Vec<Ticket>> {
        let read_txn = self.db.begin_read()?;
        let index = read_txn.open_table(VEHICLE_TICKETS_TABLE)?;
        let tickets = read_txn.open_table(TICKETS_TABLE)?;

        let mut result = Vec::new();
        for entry in index.range((vehicle_reg_number, i64::MIN)..=(vehicle_reg_number, i64::MAX))? {
            let (key, _value) = entry?;
            let (_, ticket_id) = key.value();
            if let Some(value) = tickets.get(ticket_id)? {
                result.push(serde_json::from_slice::<Ticket>(value.value())?);
            }
        }
        Ok(result)
    }

    /// Increment and return the ticket id counter (within transaction)
    fn next_ticket_id(&self, txn: &WriteTransaction) -> StorageResult<i64> {
        let mut table = txn.open_table(SEQUENCE_TABLE)?;
        let current = table
            .get(TICKET_ID_KEY)?
            .map(|guard| guard.value())
            .unwrap_or(0);
        let next = current + 1;
        table.insert(TICKET_ID_KEY, next)?;
        Ok(next)
    }

    /// Overwrite an existing spot row (within transaction)
    fn store_spot(&self, txn: &WriteTransaction, spot: &ParkingSpot) -> StorageResult<()> {
        let mut table = txn.open_table(SPOTS_TABLE)?;
        let key = (spot.category.code(), spot.id);
        if table.get(key)?.is_none() {
            return Err(StorageError::SpotNotFound {
                category: spot.category,
                id: spot.id,
            });
        }
        let value = serde_json::to_vec(spot)?;
        table.insert(key, value.as_slice())?;
        Ok(())
    }

    /// Write a ticket row (within transaction)
    fn store_ticket(&self, txn: &WriteTransaction, ticket: &Ticket) -> StorageResult<()> {
        let mut table = txn.open_table(TICKETS_TABLE)?;
        let value = serde_json::to_vec(ticket)?;
        table.insert(ticket.id, value.as_slice())?;
        Ok(())
    }

    /// Drop the open-ticket index entry if it still points at `ticket_id` (within transaction)
    fn clear_open_ticket(
        &self,
        txn: &WriteTransaction,
        vehicle_reg_number: &str,
        ticket_id: i64,
    ) -> StorageResult<()> {
        let mut table = txn.open_table(OPEN_TICKETS_TABLE)?;
        let current = table.get(vehicle_reg_number)?.map(|guard| guard.value());
        if current == Some(ticket_id) {
            table.remove(vehicle_reg_number)?;
        }
        Ok(())
    }
}

impl ParkingStore for LotStorage {
    fn find_available_spot(&self, category: VehicleCategory) -> StorageResult<Option<u32>> {
        Ok(self
            .spots(category)?
            .into_iter()
            .find(|spot| spot.available)
            .map(|spot| spot.id))
    }

    fn count_available(&self, category: VehicleCategory) -> StorageResult<usize> {
        Ok(self
            .spots(category)?
            .iter()
            .filter(|spot| spot.available)
            .count())
    }

    fn save_spot_state(&self, spot: &ParkingSpot) -> StorageResult<()> {
        let txn = self.db.begin_write()?;
        self.store_spot(&txn, spot)?;
        txn.commit()?;

        tracing::debug!(
            category = %spot.category,
            spot_id = spot.id,
            available = spot.available,
            "Spot state saved"
        );
        Ok(())
    }

    fn find_open_ticket(&self, vehicle_reg_number: &str) -> StorageResult<Option<Ticket>> {
        let ticket_id = {
            let read_txn = self.db.begin_read()?;
            let table = read_txn.open_table(OPEN_TICKETS_TABLE)?;
            table.get(vehicle_reg_number)?.map(|guard| guard.value())
        };
        match ticket_id {
            Some(id) => self.get_ticket(id),
            None => Ok(None),
        }
    }

    fn has_any_prior_ticket(
        &self,
        vehicle_reg_number: &str,
        excluding: Option<i64>,
    ) -> StorageResult<bool> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(VEHICLE_TICKETS_TABLE)?;
        for entry in table.range((vehicle_reg_number, i64::MIN)..=(vehicle_reg_number, i64::MAX))? {
            let (key, _value) = entry?;
            let (_, ticket_id) = key.value();
            if Some(ticket_id) != excluding {
                return Ok(true);
            }
        }
        Ok(false)
    }

    fn create_ticket(&self, data: TicketCreate) -> StorageResult<Ticket> {
        let txn = self.db.begin_write()?;
        {
            let table = txn.open_table(OPEN_TICKETS_TABLE)?;
            if table.get(data.vehicle_reg_number.as_str())?.is_some() {
                return Err(StorageError::DuplicateOpenTicket(data.vehicle_reg_number));
            }
        }

        let id = self.next_ticket_id(&txn)?;
        let ticket = data.into_ticket(id);
        self.store_ticket(&txn, &ticket)?;
        {
            let reg = ticket.vehicle_reg_number.as_str();
            txn.open_table(OPEN_TICKETS_TABLE)?.insert(reg, id)?;
            txn.open_table(VEHICLE_TICKETS_TABLE)?.insert((reg, id), ())?;
        }
        txn.commit()?;

        tracing::debug!(
            ticket_id = ticket.id,
            vehicle = %ticket.vehicle_reg_number,
            spot_id = ticket.spot_id,
            "Ticket created"
        );
        Ok(ticket)
    }

    fn update_ticket(&self, ticket: &Ticket) -> StorageResult<()> {
        let txn = self.db.begin_write()?;
        {
            let table = txn.open_table(TICKETS_TABLE)?;
            if table.get(ticket.id)?.is_none() {
                return Err(StorageError::TicketNotFound(ticket.id));
            }
        }

        self.store_ticket(&txn, ticket)?;
        if ticket.is_open() {
            txn.open_table(OPEN_TICKETS_TABLE)?
                .insert(ticket.vehicle_reg_number.as_str(), ticket.id)?;
        } else {
            self.clear_open_ticket(&txn, &ticket.vehicle_reg_number, ticket.id)?;
        }
        txn.commit()?;

        tracing::debug!(ticket_id = ticket.id, open = ticket.is_open(), "Ticket updated");
        Ok(())
    }

    fn close_ticket(&self, ticket: &Ticket) -> StorageResult<()> {
        if ticket.is_open() {
            return Err(StorageError::TicketStillOpen(ticket.id));
        }

        let txn = self.db.begin_write()?;
        {
            let table = txn.open_table(TICKETS_TABLE)?;
            if table.get(ticket.id)?.is_none() {
                return Err(StorageError::TicketNotFound(ticket.id));
            }
        }

        // 票据与车位同一事务提交
        self.store_ticket(&txn, ticket)?;
        self.clear_open_ticket(&txn, &ticket.vehicle_reg_number, ticket.id)?;
        self.store_spot(&txn, &ticket.spot().freed())?;
        txn.commit()?;

        tracing::debug!(
            ticket_id = ticket.id,
            spot_id = ticket.spot_id,
            price = ticket.price,
            "Ticket closed, spot freed"
        );
        Ok(())
    }

    fn delete_ticket(&self, id: i64) -> StorageResult<()> {
        let txn = self.db.begin_write()?;
        let ticket: Ticket = {
            let mut table = txn.open_table(TICKETS_TABLE)?;
            let removed = table.remove(id)?;
            match removed {
                Some(value) => serde_json::from_slice(value.value())?,
                None => return Err(StorageError::TicketNotFound(id)),
            }
        };

        self.clear_open_ticket(&txn, &ticket.vehicle_reg_number, id)?;
        txn.open_table(VEHICLE_TICKETS_TABLE)?
            .remove((ticket.vehicle_reg_number.as_str(), id))?;
        txn.commit()?;

        tracing::debug!(ticket_id = id, "Ticket deleted");
        Ok(())
    }
}
