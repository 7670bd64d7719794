use super::super::domain::{Terrain, TripParameters, Vehicle, Weather};
use super::RiskAdjustment;
use serde::{Deserialize, Serialize};

pub(crate) const HEAVY_LOAD_KG: u32 = 15_000;
pub(crate) const OVERWEIGHT_LOAD_KG: u32 = 20_000;
pub(crate) const TELEMETRY_GAP_THRESHOLD: u8 = 80;

/// Conditions that add points to a vehicle's base breakdown risk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdjustmentKind {
    HeavyLoad,
    OverweightLoad,
    Terrain,
    Weather,
    TelemetryGap,
}

pub(crate) fn adjustments(vehicle: &Vehicle, trip: &TripParameters) -> Vec<RiskAdjustment> {
    let mut applied = Vec::new();

    // Both load thresholds stack.
    if trip.load_weight > HEAVY_LOAD_KG {
        applied.push(RiskAdjustment {
            kind: AdjustmentKind::HeavyLoad,
            points: 10,
            notes: format!("load {} kg above {} kg", trip.load_weight, HEAVY_LOAD_KG),
        });
    }
    if trip.load_weight > OVERWEIGHT_LOAD_KG {
        applied.push(RiskAdjustment {
            kind: AdjustmentKind::OverweightLoad,
            points: 15,
            notes: format!("load {} kg above {} kg", trip.load_weight, OVERWEIGHT_LOAD_KG),
        });
    }

    let terrain_points = match trip.terrain {
        Terrain::Highway => 0,
        Terrain::Mixed => 5,
        Terrain::Mountain => 10,
    };
    if terrain_points > 0 {
        applied.push(RiskAdjustment {
            kind: AdjustmentKind::Terrain,
            points: terrain_points,
            notes: format!("{} terrain", trip.terrain.label()),
        });
    }

    let weather_points = match trip.weather {
        Weather::Clear | Weather::Fog => 0,
        Weather::Rain => 8,
        Weather::Storm => 15,
    };
    if weather_points > 0 {
        applied.push(RiskAdjustment {
            kind: AdjustmentKind::Weather,
            points: weather_points,
            notes: format!("{} forecast", trip.weather.label()),
        });
    }

    if vehicle.telemetry_completeness < TELEMETRY_GAP_THRESHOLD {
        applied.push(RiskAdjustment {
            kind: AdjustmentKind::TelemetryGap,
            points: 10,
            notes: format!(
                "telemetry {}% below {}%",
                vehicle.telemetry_completeness, TELEMETRY_GAP_THRESHOLD
            ),
        });
    }

    applied
}
