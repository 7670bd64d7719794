use serde::{Deserialize, Serialize};

use super::domain::{ScoredVehicle, TripParameters, VehicleId};
use super::scoring::clamp_risk;

/// Outcome of a what-if load change for the recommended vehicle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Simulation {
    pub vehicle_id: VehicleId,
    pub trip_load_weight: u32,
    pub hypothetical_load: u32,
    pub calculated_risk: u8,
    pub simulated_risk: u8,
}

/// Risk shifts one point per 1000 kg of difference from the trip's load, within 5..=95.
pub fn simulate_risk(scored: &ScoredVehicle, trip: &TripParameters, hypothetical_load: u32) -> u8 {
    let load_delta = (f64::from(hypothetical_load) - f64::from(trip.load_weight)) / 1000.0;
    clamp_risk(f64::from(scored.calculated_risk) + load_delta)
}
