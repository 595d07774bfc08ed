//! Spot Allocator
//!
//! Lookup and state changes are separate calls: `next_available_spot` never
//! reserves. Between the lookup and `reserve_spot` another caller could pick
//! the same spot; the service assumes a single operator and does not guard
//! against that.

use super::error::ParkingResult;
use crate::storage::ParkingStore;
use shared::models::{ParkingSpot, VehicleCategory};

pub struct SpotAllocator<'a, S: ParkingStore> {
    store: &'a S,
}

impl<'a, S: ParkingStore> SpotAllocator<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Lowest-numbered free spot of `category`
    ///
    /// `Ok(None)` means the category is full; `Err` means the lookup itself
    /// failed.
    pub fn next_available_spot(
        &self,
        category: VehicleCategory,
    ) -> ParkingResult<Option<ParkingSpot>> {
        let spot = self
            .store
            .find_available_spot(category)?
            .map(|id| ParkingSpot::new(id, category, true));
        Ok(spot)
    }

    pub fn count_available(&self, category: VehicleCategory) -> ParkingResult<usize> {
        Ok(self.store.count_available(category)?)
    }

    /// Mark the spot occupied
    pub fn reserve_spot(&self, spot: &ParkingSpot) -> ParkingResult<ParkingSpot> {
        let occupied = spot.occupied();
        self.store.save_spot_state(&occupied)?;
        Ok(occupied)
    }

    /// Mark the spot free
    pub fn release_spot(&self, spot: &ParkingSpot) -> ParkingResult<ParkingSpot> {
        let freed = spot.freed();
        self.store.save_spot_state(&freed)?;
        Ok(freed)
    }
}
