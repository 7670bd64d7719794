//! Risk-scored vehicle allocation for a requested trip.
//!
//! Every active roster vehicle is scored with a fixed points model, the candidates are ranked
//! by ascending breakdown risk, and the winner is explained through six named factors. A
//! [`RecommendationSession`] holds the live result and exposes the operator transitions:
//! swapping in an alternative, simulating a different load, confirming the trip to the
//! [`TripLedger`], or abandoning the request.

pub mod domain;
pub mod error;
pub mod explain;
pub mod ranking;
pub mod repository;
pub mod roster;
pub mod router;
pub mod scoring;
pub mod service;
pub mod session;
pub mod simulation;
pub mod views;

#[cfg(test)]
mod tests;

pub use domain::{
    Factor, ImpactLevel, RecommendationResult, RiskBand, RouteProfile, ScoredVehicle, SessionId,
    Terrain, TripParameters, TripRecord, TripRequest, TripStatus, Vehicle, VehicleId,
    VehicleStatus, Weather,
};
pub use error::AllocationError;
pub use explain::{build_factors, FactorKind};
pub use ranking::{rank, Ranking, ALTERNATIVE_LIMIT};
pub use repository::{LedgerError, RepositoryError, TripLedger, VehicleRepository};
pub use roster::{RosterImportError, RosterImporter};
pub use router::allocation_router;
pub use scoring::{breakdown, score, AdjustmentKind, RiskAdjustment, RiskBreakdown};
pub use service::{AllocationServiceError, TripAllocationService};
pub use session::{recommend, RecommendationSession, ScoredTrip, SessionPhase, SessionState};
pub use simulation::{simulate_risk, Simulation};
pub use views::{CandidateView, SessionView};
