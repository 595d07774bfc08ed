//! Ticket Model

use super::parking_spot::{ParkingSpot, VehicleCategory};
use crate::types::Timestamp;
use serde::{Deserialize, Serialize};

/// Parking ticket entity (停车票)
///
/// One parking session for one vehicle. Open while `exit_time` is `None`;
/// closed tickets stay in storage as history.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Ticket {
    pub id: i64,
    /// Spot held by this ticket (unique within `category`)
    pub spot_id: u32,
    pub category: VehicleCategory,
    pub vehicle_reg_number: String,
    /// Entry time (Unix millis)
    pub entry_time: Timestamp,
    /// Exit time (Unix millis), absent while the vehicle is parked
    pub exit_time: Option<Timestamp>,
    /// Fare in currency unit, 0 while open
    pub price: f64,
}

impl Ticket {
    pub fn is_open(&self) -> bool {
        self.exit_time.is_none()
    }

    /// The spot this ticket occupies, as an occupied spot
    pub fn spot(&self) -> ParkingSpot {
        ParkingSpot::new(self.spot_id, self.category, false)
    }
}

/// Create ticket payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TicketCreate {
    pub spot_id: u32,
    pub category: VehicleCategory,
    pub vehicle_reg_number: String,
    pub entry_time: Timestamp,
}

impl TicketCreate {
    pub fn into_ticket(self, id: i64) -> Ticket {
        Ticket {
            id,
            spot_id: self.spot_id,
            category: self.category,
            vehicle_reg_number: self.vehicle_reg_number,
            entry_time: self.entry_time,
            exit_time: None,
            price: 0.0,
        }
    }
}
