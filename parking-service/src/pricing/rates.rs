//! Hourly rate table

use super::calculator::{FareError, FareResult};
use shared::models::VehicleCategory;
use std::collections::BTreeMap;

/// Default CAR rate (currency unit per hour)
pub const CAR_RATE_PER_HOUR: f64 = 1.5;

/// Default BIKE rate (currency unit per hour)
pub const BIKE_RATE_PER_HOUR: f64 = 1.0;

/// Fixed mapping category → hourly rate
///
/// Built once at start-up; there is no way to change a rate afterwards.
/// Every rate is finite and not negative.
#[derive(Debug, Clone, PartialEq)]
pub struct RateTable {
    rates: BTreeMap<VehicleCategory, f64>,
}

impl RateTable {
    pub fn new(rates: impl IntoIterator<Item = (VehicleCategory, f64)>) -> FareResult<Self> {
        let rates = rates
            .into_iter()
            .map(|(category, rate)| {
                if rate.is_finite() && rate >= 0.0 {
                    Ok((category, rate))
                } else {
                    Err(FareError::InvalidRate { category, rate })
                }
            })
            .collect::<FareResult<_>>()?;
        Ok(Self { rates })
    }

    /// Hourly rate for `category`, `None` if the table has no entry for it
    pub fn rate_for(&self, category: VehicleCategory) -> Option<f64> {
        self.rates.get(&category).copied()
    }
}

impl Default for RateTable {
    fn default() -> Self {
        Self {
            rates: BTreeMap::from([
                (VehicleCategory::Car, CAR_RATE_PER_HOUR),
                (VehicleCategory::Bike, BIKE_RATE_PER_HOUR),
            ]),
        }
    }
}
