use super::domain::VehicleId;
use super::repository::LedgerError;

/// Failures raised by scoring, ranking, and session transitions.
#[derive(Debug, thiserror::Error)]
pub enum AllocationError {
    #[error("unrecognized {field} '{value}'")]
    InvalidParameters { field: &'static str, value: String },
    #[error("no active vehicles are available for this trip")]
    NoEligibleVehicles,
    #[error("vehicle {0} is not among the current alternatives")]
    UnknownAlternative(VehicleId),
    #[error("no recommendation has been scored yet")]
    NotScored,
    #[error("session is closed")]
    SessionClosed,
    #[error("trip submission failed: {0}")]
    SubmissionFailed(#[source] LedgerError),
}

impl AllocationError {
    pub(crate) fn invalid(field: &'static str, value: &str) -> Self {
        Self::InvalidParameters {
            field,
            value: value.to_string(),
        }
    }
}
