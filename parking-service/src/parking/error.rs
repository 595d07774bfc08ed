use crate::pricing::FareError;
use crate::storage::StorageError;
use shared::models::{UnknownCategory, VehicleCategory};
use shared::types::Timestamp;
use thiserror::Error;

/// Entry/exit outcomes other than success
///
/// All variants are recoverable by the caller; none of them is fatal.
#[derive(Debug, Error)]
pub enum ParkingError {
    #[error("Invalid interval: exit time {exit_time:?} is before entry time {entry_time}")]
    InvalidInterval {
        entry_time: Timestamp,
        exit_time: Option<Timestamp>,
    },

    #[error("Unknown vehicle category: {0}")]
    UnknownCategory(String),

    #[error("No {0} spot available, parking slots might be full")]
    LotFull(VehicleCategory),

    #[error("Vehicle {0} is already parked")]
    VehicleAlreadyParked(String),

    #[error("Vehicle {0} is not parked")]
    VehicleNotParked(String),

    #[error("Persistence failure: {0}")]
    PersistenceFailure(#[from] StorageError),

    /// Rate or fare outside what the calculator can represent
    #[error("Fare calculation failed: {0}")]
    FareFailed(FareError),
}

impl From<FareError> for ParkingError {
    fn from(err: FareError) -> Self {
        match err {
            FareError::InvalidInterval {
                entry_time,
                exit_time,
            } => ParkingError::InvalidInterval {
                entry_time,
                exit_time,
            },
            FareError::UnknownCategory(category) => {
                ParkingError::UnknownCategory(category.to_string())
            }
            other @ (FareError::InvalidRate { .. } | FareError::Overflow) => {
                ParkingError::FareFailed(other)
            }
        }
    }
}

impl From<UnknownCategory> for ParkingError {
    fn from(err: UnknownCategory) -> Self {
        ParkingError::UnknownCategory(err.0)
    }
}

pub type ParkingResult<T> = Result<T, ParkingError>;
