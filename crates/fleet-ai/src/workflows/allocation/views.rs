use serde::Serialize;

use super::domain::{
    Factor, RiskBand, ScoredVehicle, SessionId, TripParameters, TripRecord, VehicleId,
};
use super::session::{RecommendationSession, SessionPhase};

/// Candidate as presented to operators.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CandidateView {
    pub vehicle_id: VehicleId,
    pub name: String,
    pub category: String,
    pub calculated_risk: u8,
    pub risk_band: RiskBand,
    pub confidence: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub simulated_risk: Option<u8>,
    pub health_score: u8,
    pub telemetry_completeness: u8,
    pub anomalies: Vec<String>,
}

impl From<&ScoredVehicle> for CandidateView {
    fn from(scored: &ScoredVehicle) -> Self {
        Self {
            vehicle_id: scored.id().clone(),
            name: scored.vehicle.name.clone(),
            category: scored.vehicle.category.clone(),
            calculated_risk: scored.calculated_risk,
            risk_band: scored.risk_band(),
            confidence: scored.confidence,
            simulated_risk: scored.simulated_risk,
            health_score: scored.vehicle.health_score,
            telemetry_completeness: scored.vehicle.telemetry_completeness,
            anomalies: scored.vehicle.anomalies.clone(),
        }
    }
}

/// Snapshot of a recommendation session for API responses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionView {
    pub session_id: SessionId,
    pub phase: SessionPhase,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trip: Option<TripParameters>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recommended: Option<CandidateView>,
    pub alternatives: Vec<CandidateView>,
    pub factors: Vec<Factor>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confirmed_trip: Option<TripRecord>,
}

impl From<&RecommendationSession> for SessionView {
    fn from(session: &RecommendationSession) -> Self {
        let result = session.result();

        Self {
            session_id: session.id().clone(),
            phase: session.phase(),
            trip: session.trip().cloned(),
            recommended: result.map(|result| CandidateView::from(&result.recommended)),
            alternatives: result
                .map(|result| result.alternatives.iter().map(CandidateView::from).collect())
                .unwrap_or_default(),
            factors: result
                .map(|result| result.factors.clone())
                .unwrap_or_default(),
            confirmed_trip: session.confirmed_trip().cloned(),
        }
    }
}
