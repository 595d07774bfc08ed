//! Fare Calculator
//!
//! Time-based fare with a free half hour and a recurring-customer discount.
//! Uses rust_decimal for precise calculations, returns f64.

use super::rates::RateTable;
use rust_decimal::prelude::*;
use shared::models::VehicleCategory;
use shared::types::{MILLIS_PER_HOUR, Timestamp};
use thiserror::Error;

/// Rounding strategy for monetary values (2 decimal places, half-up)
const DECIMAL_PLACES: u32 = 2;

/// Free parking allowance (0.5h)
const FREE_TIME_MILLIS: i64 = MILLIS_PER_HOUR / 2;

/// Share of the fare paid by recurring customers, in percent (5% off)
const RECURRING_PERCENT: i64 = 95;

/// Fare errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FareError {
    #[error("Invalid interval: exit time {exit_time:?} is before entry time {entry_time}")]
    InvalidInterval {
        entry_time: Timestamp,
        exit_time: Option<Timestamp>,
    },

    #[error("No hourly rate for category {0}")]
    UnknownCategory(VehicleCategory),

    #[error("Invalid hourly rate {rate} for category {category}")]
    InvalidRate { category: VehicleCategory, rate: f64 },

    #[error("Fare out of range")]
    Overflow,
}

pub type FareResult<T> = Result<T, FareError>;

/// Convert Decimal back to f64 for storage, rounded to 2 decimal places
#[inline]
fn to_f64(value: Decimal) -> f64 {
    value
        .round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
        .to_f64()
        .unwrap_or_default()
}

/// Billable time after the free allowance, never negative
fn billable_millis(duration_millis: i64) -> i64 {
    if duration_millis < FREE_TIME_MILLIS {
        0
    } else {
        duration_millis - FREE_TIME_MILLIS
    }
}

/// Pure fare function over a fixed [`RateTable`]
#[derive(Debug, Clone, Default)]
pub struct FareCalculator {
    rates: RateTable,
}

impl FareCalculator {
    pub fn new(rates: RateTable) -> Self {
        Self { rates }
    }

    pub fn rates(&self) -> &RateTable {
        &self.rates
    }

    /// Compute the fare for one parking session
    ///
    /// price = max(0, hours - 0.5) × rate × (0.95 if recurring), rounded
    /// half-up to cents. The duration is fractional, not truncated to whole
    /// hours.
    pub fn compute_fare(
        &self,
        entry_time: Timestamp,
        exit_time: Option<Timestamp>,
        category: VehicleCategory,
        is_recurring: bool,
    ) -> FareResult<f64> {
        let invalid = || FareError::InvalidInterval {
            entry_time,
            exit_time,
        };
        let exit = exit_time.ok_or_else(invalid)?;
        if exit < entry_time {
            return Err(invalid());
        }
        let duration_millis = exit.checked_sub(entry_time).ok_or_else(invalid)?;

        let rate = self
            .rates
            .rate_for(category)
            .ok_or(FareError::UnknownCategory(category))?;
        let rate_decimal =
            Decimal::from_f64(rate).ok_or(FareError::InvalidRate { category, rate })?;

        let multiplier = if is_recurring {
            Decimal::new(RECURRING_PERCENT, 2)
        } else {
            Decimal::ONE
        };

        // Divide by the hour last so exact cent midpoints stay exact
        let price = Decimal::from(billable_millis(duration_millis))
            .checked_mul(rate_decimal)
            .and_then(|p| p.checked_mul(multiplier))
            .and_then(|p| p.checked_div(Decimal::from(MILLIS_PER_HOUR)))
            .ok_or(FareError::Overflow)?;
        Ok(to_f64(price))
    }
}
