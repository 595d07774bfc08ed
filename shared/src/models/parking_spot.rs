//! Parking Spot Model

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Vehicle category (车位类型)
///
/// Closed set: every spot and every rate belongs to exactly one of these.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VehicleCategory {
    Car,
    Bike,
}

/// Raw category value that is not part of [`VehicleCategory`]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown vehicle category: {0}")]
pub struct UnknownCategory(pub String);

impl VehicleCategory {
    pub const ALL: [VehicleCategory; 2] = [VehicleCategory::Car, VehicleCategory::Bike];

    /// Storage / wire code
    pub fn code(&self) -> &'static str {
        match self {
            VehicleCategory::Car => "CAR",
            VehicleCategory::Bike => "BIKE",
        }
    }

    /// Map a vehicle type menu selection (1 = CAR, 2 = BIKE)
    pub fn from_selection(selection: u32) -> Result<Self, UnknownCategory> {
        match selection {
            1 => Ok(VehicleCategory::Car),
            2 => Ok(VehicleCategory::Bike),
            other => Err(UnknownCategory(other.to_string())),
        }
    }
}

impl fmt::Display for VehicleCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for VehicleCategory {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "CAR" => Ok(VehicleCategory::Car),
            "BIKE" => Ok(VehicleCategory::Bike),
            _ => Err(UnknownCategory(s.to_string())),
        }
    }
}

/// Parking spot entity (车位)
///
/// Identity is `(category, id)`: ids are positive and unique per category.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct ParkingSpot {
    pub id: u32,
    pub category: VehicleCategory,
    pub available: bool,
}

impl ParkingSpot {
    pub fn new(id: u32, category: VehicleCategory, available: bool) -> Self {
        Self {
            id,
            category,
            available,
        }
    }

    /// Same spot, marked occupied
    pub fn occupied(self) -> Self {
        Self {
            available: false,
            ..self
        }
    }

    /// Same spot, marked free
    pub fn freed(self) -> Self {
        Self {
            available: true,
            ..self
        }
    }
}
