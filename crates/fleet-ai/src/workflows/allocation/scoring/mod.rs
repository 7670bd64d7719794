//! Additive breakdown-risk model.
//!
//! Every term is a fixed number of points added to the roster's baseline risk, so the result
//! is independent of evaluation order and reproducible from the breakdown alone.

mod rules;

pub use rules::AdjustmentKind;
pub(crate) use rules::HEAVY_LOAD_KG;

use super::domain::{ScoredVehicle, TripParameters, Vehicle};
use serde::{Deserialize, Serialize};

pub const MIN_RISK: u8 = 5;
pub const MAX_RISK: u8 = 95;
pub const MAX_CONFIDENCE: i32 = 95;

/// Single surcharge applied on top of the baseline risk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskAdjustment {
    pub kind: AdjustmentKind,
    pub points: i32,
    pub notes: String,
}

/// Audit trail for one vehicle under one set of trip conditions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskBreakdown {
    pub base_risk: u8,
    pub adjustments: Vec<RiskAdjustment>,
    pub raw_risk: i32,
    pub calculated_risk: u8,
    pub confidence: i32,
}

pub fn breakdown(vehicle: &Vehicle, trip: &TripParameters) -> RiskBreakdown {
    let adjustments = rules::adjustments(vehicle, trip);
    let raw_risk = i32::from(vehicle.breakdown_risk)
        + adjustments
            .iter()
            .map(|adjustment| adjustment.points)
            .sum::<i32>();
    let calculated_risk = clamp_risk(f64::from(raw_risk));
    let confidence = confidence(vehicle.telemetry_completeness, calculated_risk);

    RiskBreakdown {
        base_risk: vehicle.breakdown_risk,
        adjustments,
        raw_risk,
        calculated_risk,
        confidence,
    }
}

pub fn score(vehicle: &Vehicle, trip: &TripParameters) -> ScoredVehicle {
    let RiskBreakdown {
        calculated_risk,
        confidence,
        ..
    } = breakdown(vehicle, trip);

    ScoredVehicle {
        vehicle: vehicle.clone(),
        calculated_risk,
        confidence,
        simulated_risk: None,
    }
}

fn confidence(telemetry_completeness: u8, calculated_risk: u8) -> i32 {
    let raw = f64::from(telemetry_completeness) - f64::from(calculated_risk) * 0.3;
    round_half_up(raw.min(f64::from(MAX_CONFIDENCE))) as i32
}

pub(crate) fn clamp_risk(value: f64) -> u8 {
    round_half_up(value.clamp(f64::from(MIN_RISK), f64::from(MAX_RISK))) as u8
}

/// Rounds ties toward positive infinity (`-2.5 -> -2`, `2.5 -> 3`).
pub(crate) fn round_half_up(value: f64) -> f64 {
    let floor = value.floor();
    if value - floor >= 0.5 {
        floor + 1.0
    } else {
        floor
    }
}
