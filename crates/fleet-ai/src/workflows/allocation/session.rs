use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::config::DispatchConfig;

use super::domain::{
    RecommendationResult, SessionId, TripParameters, TripRecord, TripStatus, Vehicle, VehicleId,
};
use super::error::AllocationError;
use super::explain::build_factors;
use super::ranking::{rank, sort_by_risk};
use super::repository::TripLedger;
use super::scoring;
use super::simulation::{simulate_risk, Simulation};

/// Scores the active part of `roster`, ranks it, and explains the winner.
pub fn recommend(
    trip: &TripParameters,
    roster: &[Vehicle],
) -> Result<RecommendationResult, AllocationError> {
    let candidates = roster
        .iter()
        .filter(|vehicle| vehicle.is_eligible())
        .map(|vehicle| scoring::score(vehicle, trip))
        .collect();
    let ranking = rank(candidates)?;
    let factors = build_factors(&ranking.recommended, trip);

    Ok(RecommendationResult {
        recommended: ranking.recommended,
        alternatives: ranking.alternatives,
        factors,
    })
}

/// Trip conditions together with the recommendation scored under them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoredTrip {
    pub trip: TripParameters,
    pub result: RecommendationResult,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    Empty,
    Scored(ScoredTrip),
    Confirmed(TripRecord),
    Abandoned,
}

/// Coarse lifecycle marker exposed to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionPhase {
    Empty,
    Scored,
    Simulated,
    Confirmed,
    Abandoned,
}

impl SessionPhase {
    pub const fn label(self) -> &'static str {
        match self {
            SessionPhase::Empty => "empty",
            SessionPhase::Scored => "scored",
            SessionPhase::Simulated => "simulated",
            SessionPhase::Confirmed => "confirmed",
            SessionPhase::Abandoned => "abandoned",
        }
    }
}

/// Holds the single live recommendation for one trip request.
#[derive(Debug, Clone)]
pub struct RecommendationSession {
    id: SessionId,
    state: SessionState,
}

impl RecommendationSession {
    pub fn new(id: SessionId) -> Self {
        Self {
            id,
            state: SessionState::Empty,
        }
    }

    pub fn id(&self) -> &SessionId {
        &self.id
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn phase(&self) -> SessionPhase {
        match &self.state {
            SessionState::Empty => SessionPhase::Empty,
            SessionState::Scored(scored) if scored.result.recommended.simulated_risk.is_some() => {
                SessionPhase::Simulated
            }
            SessionState::Scored(_) => SessionPhase::Scored,
            SessionState::Confirmed(_) => SessionPhase::Confirmed,
            SessionState::Abandoned => SessionPhase::Abandoned,
        }
    }

    pub fn trip(&self) -> Option<&TripParameters> {
        match &self.state {
            SessionState::Scored(scored) => Some(&scored.trip),
            _ => None,
        }
    }

    pub fn result(&self) -> Option<&RecommendationResult> {
        match &self.state {
            SessionState::Scored(scored) => Some(&scored.result),
            _ => None,
        }
    }

    pub fn confirmed_trip(&self) -> Option<&TripRecord> {
        match &self.state {
            SessionState::Confirmed(record) => Some(record),
            _ => None,
        }
    }

    /// Scores `roster` under `trip`, replacing any previous recommendation wholesale.
    pub fn score(
        &mut self,
        trip: TripParameters,
        roster: &[Vehicle],
    ) -> Result<&RecommendationResult, AllocationError> {
        if self.is_closed() {
            return Err(AllocationError::SessionClosed);
        }

        let result = match recommend(&trip, roster) {
            Ok(result) => result,
            Err(err) => {
                warn!(session = %self.id, route = %trip.route, error = %err, "scoring failed");
                self.state = SessionState::Empty;
                return Err(err);
            }
        };

        info!(
            session = %self.id,
            route = %trip.route,
            vehicle = %result.recommended.id(),
            risk = result.recommended.calculated_risk,
            alternatives = result.alternatives.len(),
            "recommendation scored"
        );

        self.state = SessionState::Scored(ScoredTrip { trip, result });
        self.result().ok_or(AllocationError::NotScored)
    }

    /// Promotes an alternative to the recommendation and re-sorts the displaced vehicle in.
    pub fn swap(&mut self, vehicle_id: &VehicleId) -> Result<&RecommendationResult, AllocationError> {
        let session = self.id.clone();
        let ScoredTrip { trip, result } = self.scored_mut()?;

        if result.recommended.id() != vehicle_id {
            let position = result
                .alternatives
                .iter()
                .position(|candidate| candidate.id() == vehicle_id)
                .ok_or_else(|| AllocationError::UnknownAlternative(vehicle_id.clone()))?;

            let chosen = result.alternatives.remove(position);
            let mut displaced = std::mem::replace(&mut result.recommended, chosen);
            displaced.simulated_risk = None;
            result.alternatives.push(displaced);
            sort_by_risk(&mut result.alternatives);
        }

        result.recommended.simulated_risk = None;
        result.factors = build_factors(&result.recommended, trip);

        debug!(
            session = %session,
            vehicle = %vehicle_id,
            risk = result.recommended.calculated_risk,
            "recommended vehicle swapped"
        );

        Ok(&*result)
    }

    /// Attaches a what-if risk for `hypothetical_load` to the recommended vehicle.
    pub fn simulate(&mut self, hypothetical_load: u32) -> Result<Simulation, AllocationError> {
        let ScoredTrip { trip, result } = self.scored_mut()?;

        let simulated_risk = simulate_risk(&result.recommended, trip, hypothetical_load);
        result.recommended.simulated_risk = Some(simulated_risk);

        Ok(Simulation {
            vehicle_id: result.recommended.id().clone(),
            trip_load_weight: trip.load_weight,
            hypothetical_load,
            calculated_risk: result.recommended.calculated_risk,
            simulated_risk,
        })
    }

    /// Submits the recommended vehicle's trip. On failure the session keeps its recommendation.
    pub async fn confirm<L>(
        &mut self,
        ledger: &L,
        requested_at: DateTime<Utc>,
        dispatch: &DispatchConfig,
    ) -> Result<TripRecord, AllocationError>
    where
        L: TripLedger + ?Sized,
    {
        let ScoredTrip { trip, result } = self.scored_mut()?;
        let recommended = &result.recommended;

        let record = TripRecord {
            route: trip.route.clone(),
            vehicle: recommended.id().clone(),
            driver: recommended
                .vehicle
                .driver
                .clone()
                .unwrap_or_else(|| dispatch.default_driver.clone()),
            status: TripStatus::InProgress,
            load_weight: trip.load_weight,
            start_time: requested_at,
            expected_end: requested_at + dispatch.trip_duration(),
            breakdown_risk: recommended.calculated_risk,
            ai_confidence: recommended.confidence,
            predicted_issues: Vec::new(),
            progress: 0,
        };

        let stored = match ledger.record(record).await {
            Ok(stored) => stored,
            Err(err) => {
                warn!(session = %self.id, error = %err, "trip submission failed");
                return Err(AllocationError::SubmissionFailed(err));
            }
        };

        info!(
            session = %self.id,
            vehicle = %stored.vehicle,
            driver = %stored.driver,
            "trip confirmed"
        );
        self.state = SessionState::Confirmed(stored.clone());
        Ok(stored)
    }

    /// Discards the recommendation without side effects.
    pub fn abandon(&mut self) -> Result<(), AllocationError> {
        if self.is_closed() {
            return Err(AllocationError::SessionClosed);
        }
        debug!(session = %self.id, "session abandoned");
        self.state = SessionState::Abandoned;
        Ok(())
    }

    fn is_closed(&self) -> bool {
        matches!(
            self.state,
            SessionState::Confirmed(_) | SessionState::Abandoned
        )
    }

    fn scored_mut(&mut self) -> Result<&mut ScoredTrip, AllocationError> {
        match &mut self.state {
            SessionState::Scored(scored) => Ok(scored),
            SessionState::Empty => Err(AllocationError::NotScored),
            SessionState::Confirmed(_) | SessionState::Abandoned => {
                Err(AllocationError::SessionClosed)
            }
        }
    }
}
