use super::*;
use crate::pricing::FareCalculator;
use crate::storage::test_support::FlakyStore;
use crate::storage::{LotStorage, ParkingStore, StorageError};
use shared::models::VehicleCategory;

const T0: i64 = 1_700_000_000_000;
const MINUTE: i64 = 60 * 1000;
const HOUR: i64 = 60 * MINUTE;

fn create_test_storage() -> LotStorage {
    let storage = LotStorage::open_in_memory().unwrap();
    storage
        .seed_spots(&[(VehicleCategory::Car, 3), (VehicleCategory::Bike, 2)])
        .unwrap();
    storage
}

fn create_test_manager() -> TicketManager<LotStorage> {
    TicketManager::new(create_test_storage(), FareCalculator::default())
}

fn create_flaky_manager() -> TicketManager<FlakyStore> {
    TicketManager::new(FlakyStore::new(create_test_storage()), FareCalculator::default())
}

fn spot_state(storage: &LotStorage, category: VehicleCategory, id: u32) -> bool {
    storage.get_spot(category, id).unwrap().unwrap().available
}

mod test_flows;
