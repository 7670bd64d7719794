use super::domain::{Factor, ImpactLevel, ScoredVehicle, Terrain, TripParameters, Weather};
use super::scoring::HEAVY_LOAD_KG;

const WELL_INSTRUMENTED_PCT: u8 = 90;

/// Explanation dimensions, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FactorKind {
    VehicleHealth,
    LoadCapacity,
    TerrainType,
    WeatherConditions,
    TelemetryQuality,
    PastPerformance,
}

impl FactorKind {
    pub const ALL: [FactorKind; 6] = [
        FactorKind::VehicleHealth,
        FactorKind::LoadCapacity,
        FactorKind::TerrainType,
        FactorKind::WeatherConditions,
        FactorKind::TelemetryQuality,
        FactorKind::PastPerformance,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            FactorKind::VehicleHealth => "Vehicle Health",
            FactorKind::LoadCapacity => "Load Capacity",
            FactorKind::TerrainType => "Terrain Type",
            FactorKind::WeatherConditions => "Weather Conditions",
            FactorKind::TelemetryQuality => "Telemetry Quality",
            FactorKind::PastPerformance => "Past Performance",
        }
    }
}

/// Builds the six explanation factors for `scored` under `trip`.
pub fn build_factors(scored: &ScoredVehicle, trip: &TripParameters) -> Vec<Factor> {
    FactorKind::ALL
        .iter()
        .map(|kind| factor(*kind, scored, trip))
        .collect()
}

fn factor(kind: FactorKind, scored: &ScoredVehicle, trip: &TripParameters) -> Factor {
    let vehicle = &scored.vehicle;
    let (impact, value) = match kind {
        FactorKind::VehicleHealth => (ImpactLevel::High, format!("{}%", vehicle.health_score)),
        FactorKind::LoadCapacity => {
            let impact = if trip.load_weight > HEAVY_LOAD_KG {
                ImpactLevel::Medium
            } else {
                ImpactLevel::Low
            };
            (impact, format!("{} kg", trip.load_weight))
        }
        FactorKind::TerrainType => {
            let impact = match trip.terrain {
                Terrain::Highway => ImpactLevel::Low,
                Terrain::Mixed | Terrain::Mountain => ImpactLevel::Medium,
            };
            (impact, trip.terrain.label().to_string())
        }
        FactorKind::WeatherConditions => {
            let impact = match trip.weather {
                Weather::Clear => ImpactLevel::Low,
                Weather::Rain | Weather::Fog | Weather::Storm => ImpactLevel::High,
            };
            (impact, trip.weather.label().to_string())
        }
        FactorKind::TelemetryQuality => {
            let impact = if vehicle.telemetry_completeness > WELL_INSTRUMENTED_PCT {
                ImpactLevel::Low
            } else {
                ImpactLevel::Medium
            };
            (impact, format!("{}%", vehicle.telemetry_completeness))
        }
        FactorKind::PastPerformance => {
            (ImpactLevel::Medium, format!("{} trips", vehicle.total_trips))
        }
    };

    Factor {
        name: kind.label().to_string(),
        impact,
        value,
    }
}
