use async_trait::async_trait;

use super::domain::{TripRecord, Vehicle};

/// Read-only source of the current vehicle roster.
#[async_trait]
pub trait VehicleRepository: Send + Sync {
    async fn roster(&self) -> Result<Vec<Vehicle>, RepositoryError>;
}

/// Error enumeration for roster failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("roster unavailable: {0}")]
    Unavailable(String),
    #[error("roster data malformed: {0}")]
    Malformed(String),
}

/// Outbound hook receiving confirmed trips (e.g. the trip persistence service).
#[async_trait]
pub trait TripLedger: Send + Sync {
    async fn record(&self, trip: TripRecord) -> Result<TripRecord, LedgerError>;
}

/// Trip submission error.
#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    #[error("trip rejected: {0}")]
    Rejected(String),
    #[error("ledger unavailable: {0}")]
    Unavailable(String),
}
