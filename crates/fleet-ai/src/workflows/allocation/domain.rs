use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::error::AllocationError;

/// Identifier wrapper for roster vehicles.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VehicleId(pub String);

impl fmt::Display for VehicleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifier wrapper for a recommendation session held by the allocation service.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(pub String);

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Operational state reported by the roster. Only `Active` vehicles are eligible for trips.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VehicleStatus {
    Active,
    Maintenance,
    Inactive,
}

impl VehicleStatus {
    pub const fn label(self) -> &'static str {
        match self {
            VehicleStatus::Active => "active",
            VehicleStatus::Maintenance => "maintenance",
            VehicleStatus::Inactive => "inactive",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "active" => Some(Self::Active),
            "maintenance" => Some(Self::Maintenance),
            "inactive" => Some(Self::Inactive),
            _ => None,
        }
    }
}

/// Roster snapshot of a single vehicle. Field names follow the roster provider's camelCase shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Vehicle {
    pub id: VehicleId,
    pub name: String,
    #[serde(rename = "type")]
    pub category: String,
    pub status: VehicleStatus,
    pub health_score: u8,
    pub breakdown_risk: u8,
    pub telemetry_completeness: u8,
    #[serde(default)]
    pub total_trips: u32,
    #[serde(default)]
    pub anomalies: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub driver: Option<String>,
}

impl Vehicle {
    pub fn is_eligible(&self) -> bool {
        self.status == VehicleStatus::Active
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Terrain {
    Highway,
    Mixed,
    Mountain,
}

impl Terrain {
    pub const fn label(self) -> &'static str {
        match self {
            Terrain::Highway => "highway",
            Terrain::Mixed => "mixed",
            Terrain::Mountain => "mountain",
        }
    }
}

impl FromStr for Terrain {
    type Err = AllocationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "highway" => Ok(Self::Highway),
            "mixed" => Ok(Self::Mixed),
            "mountain" => Ok(Self::Mountain),
            _ => Err(AllocationError::invalid("terrain", value)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Weather {
    Clear,
    Rain,
    Fog,
    Storm,
}

impl Weather {
    pub const fn label(self) -> &'static str {
        match self {
            Weather::Clear => "clear",
            Weather::Rain => "rain",
            Weather::Fog => "fog",
            Weather::Storm => "storm",
        }
    }
}

impl FromStr for Weather {
    type Err = AllocationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "clear" => Ok(Self::Clear),
            "rain" => Ok(Self::Rain),
            "fog" => Ok(Self::Fog),
            "storm" => Ok(Self::Storm),
            _ => Err(AllocationError::invalid("weather", value)),
        }
    }
}

/// Raw trip request as submitted by callers, before category validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TripRequest {
    pub route: String,
    #[serde(default)]
    pub distance: u32,
    pub load_weight: u32,
    pub terrain: String,
    pub weather: String,
}

/// Validated trip conditions. Immutable once scoring starts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TripParameters {
    pub route: String,
    pub distance: u32,
    pub load_weight: u32,
    pub terrain: Terrain,
    pub weather: Weather,
}

impl TryFrom<TripRequest> for TripParameters {
    type Error = AllocationError;

    fn try_from(request: TripRequest) -> Result<Self, Self::Error> {
        let route = request.route.trim().to_string();
        if route.is_empty() {
            return Err(AllocationError::invalid("route", &request.route));
        }

        Ok(Self {
            route,
            distance: request.distance,
            load_weight: request.load_weight,
            terrain: request.terrain.parse()?,
            weather: request.weather.parse()?,
        })
    }
}

/// Route reference carrying the fixed conditions a trip inherits when planned on it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteProfile {
    pub id: String,
    pub name: String,
    pub distance: u32,
    pub terrain: Terrain,
}

impl RouteProfile {
    pub fn plan(&self, load_weight: u32, weather: Weather) -> TripParameters {
        TripParameters {
            route: self.id.clone(),
            distance: self.distance,
            load_weight,
            terrain: self.terrain,
            weather,
        }
    }
}

/// Display band for a risk percentage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskBand {
    Low,
    Medium,
    High,
}

impl RiskBand {
    pub const fn from_risk(risk: u8) -> Self {
        if risk < 30 {
            RiskBand::Low
        } else if risk < 60 {
            RiskBand::Medium
        } else {
            RiskBand::High
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            RiskBand::Low => "low",
            RiskBand::Medium => "medium",
            RiskBand::High => "high",
        }
    }
}

/// A roster vehicle annotated with its risk under one set of trip conditions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoredVehicle {
    pub vehicle: Vehicle,
    pub calculated_risk: u8,
    /// Unclamped below; a strongly degraded vehicle can report a negative value.
    pub confidence: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub simulated_risk: Option<u8>,
}

impl ScoredVehicle {
    pub fn id(&self) -> &VehicleId {
        &self.vehicle.id
    }

    pub fn risk_band(&self) -> RiskBand {
        RiskBand::from_risk(self.calculated_risk)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImpactLevel {
    Low,
    Medium,
    High,
}

impl ImpactLevel {
    pub const fn label(self) -> &'static str {
        match self {
            ImpactLevel::Low => "low",
            ImpactLevel::Medium => "medium",
            ImpactLevel::High => "high",
        }
    }
}

/// Named explanation dimension shown alongside a recommendation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Factor {
    pub name: String,
    pub impact: ImpactLevel,
    pub value: String,
}

/// Ranking output plus the explanation for the current recommendation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecommendationResult {
    pub recommended: ScoredVehicle,
    pub alternatives: Vec<ScoredVehicle>,
    pub factors: Vec<Factor>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TripStatus {
    #[serde(rename = "in-progress")]
    InProgress,
}

/// Finalized trip handed to the trip ledger on confirmation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TripRecord {
    pub route: String,
    pub vehicle: VehicleId,
    pub driver: String,
    pub status: TripStatus,
    pub load_weight: u32,
    pub start_time: DateTime<Utc>,
    pub expected_end: DateTime<Utc>,
    pub breakdown_risk: u8,
    pub ai_confidence: i32,
    pub predicted_issues: Vec<String>,
    pub progress: u8,
}
