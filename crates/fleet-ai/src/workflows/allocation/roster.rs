use std::io::Read;
use std::path::Path;

use serde::{Deserialize, Deserializer};

use super::domain::{Vehicle, VehicleId, VehicleStatus};

#[derive(Debug)]
pub enum RosterImportError {
    Io(std::io::Error),
    Csv(csv::Error),
    InvalidStatus { vehicle: VehicleId, value: String },
    OutOfRange {
        vehicle: VehicleId,
        field: &'static str,
        value: u8,
    },
    DuplicateVehicle(VehicleId),
}

const MAX_PERCENT: u8 = 100;

impl std::fmt::Display for RosterImportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RosterImportError::Io(err) => write!(f, "failed to read roster export: {}", err),
            RosterImportError::Csv(err) => write!(f, "invalid roster CSV data: {}", err),
            RosterImportError::InvalidStatus { vehicle, value } => {
                write!(f, "vehicle {} has unrecognized status '{}'", vehicle, value)
            }
            RosterImportError::OutOfRange {
                vehicle,
                field,
                value,
            } => write!(
                f,
                "vehicle {} has {} {} outside 0-{}",
                vehicle, field, value, MAX_PERCENT
            ),
            RosterImportError::DuplicateVehicle(vehicle) => {
                write!(f, "vehicle {} appears more than once", vehicle)
            }
        }
    }
}

impl std::error::Error for RosterImportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RosterImportError::Io(err) => Some(err),
            RosterImportError::Csv(err) => Some(err),
            RosterImportError::InvalidStatus { .. }
            | RosterImportError::OutOfRange { .. }
            | RosterImportError::DuplicateVehicle(_) => None,
        }
    }
}

impl From<std::io::Error> for RosterImportError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<csv::Error> for RosterImportError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

/// Loads a vehicle roster from a fleet-management CSV export, preserving row order.
pub struct RosterImporter;

impl RosterImporter {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Vec<Vehicle>, RosterImportError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Vec<Vehicle>, RosterImportError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);
        let mut vehicles: Vec<Vehicle> = Vec::new();

        for record in csv_reader.deserialize::<RosterRow>() {
            let vehicle = record?.into_vehicle()?;
            if vehicles.iter().any(|existing| existing.id == vehicle.id) {
                return Err(RosterImportError::DuplicateVehicle(vehicle.id));
            }
            vehicles.push(vehicle);
        }

        Ok(vehicles)
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RosterRow {
    id: String,
    name: String,
    #[serde(rename = "type")]
    category: String,
    status: String,
    health_score: u8,
    breakdown_risk: u8,
    telemetry_completeness: u8,
    #[serde(default)]
    total_trips: u32,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    anomalies: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    location: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    driver: Option<String>,
}

impl RosterRow {
    fn into_vehicle(self) -> Result<Vehicle, RosterImportError> {
        let id = VehicleId(self.id);
        let status =
            VehicleStatus::parse(&self.status).ok_or_else(|| RosterImportError::InvalidStatus {
                vehicle: id.clone(),
                value: self.status.clone(),
            })?;
        for (field, value) in [
            ("healthScore", self.health_score),
            ("breakdownRisk", self.breakdown_risk),
            ("telemetryCompleteness", self.telemetry_completeness),
        ] {
            if value > MAX_PERCENT {
                return Err(RosterImportError::OutOfRange {
                    vehicle: id,
                    field,
                    value,
                });
            }
        }
        let anomalies = self
            .anomalies
            .map(|raw| {
                raw.split(';')
                    .map(str::trim)
                    .filter(|entry| !entry.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();

        Ok(Vehicle {
            id,
            name: self.name,
            category: self.category,
            status,
            health_score: self.health_score,
            breakdown_risk: self.breakdown_risk,
            telemetry_completeness: self.telemetry_completeness,
            total_trips: self.total_trips,
            anomalies,
            location: self.location,
            driver: self.driver,
        })
    }
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}
