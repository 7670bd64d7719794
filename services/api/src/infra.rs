use async_trait::async_trait;
use fleet_ai::workflows::allocation::{
    LedgerError, RepositoryError, RouteProfile, Terrain, TripLedger, TripRecord, Vehicle,
    VehicleId, VehicleRepository, VehicleStatus, Weather,
};
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Fixed roster snapshot served to every scoring request.
#[derive(Clone)]
pub(crate) struct InMemoryVehicleRepository {
    vehicles: Arc<Vec<Vehicle>>,
}

impl InMemoryVehicleRepository {
    pub(crate) fn new(vehicles: Vec<Vehicle>) -> Self {
        Self {
            vehicles: Arc::new(vehicles),
        }
    }
}

#[async_trait]
impl VehicleRepository for InMemoryVehicleRepository {
    async fn roster(&self) -> Result<Vec<Vehicle>, RepositoryError> {
        Ok(self.vehicles.as_ref().clone())
    }
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryTripLedger {
    trips: Arc<Mutex<Vec<TripRecord>>>,
}

impl InMemoryTripLedger {
    pub(crate) fn trips(&self) -> Vec<TripRecord> {
        self.trips.lock().expect("ledger mutex poisoned").clone()
    }
}

#[async_trait]
impl TripLedger for InMemoryTripLedger {
    async fn record(&self, trip: TripRecord) -> Result<TripRecord, LedgerError> {
        let mut guard = self.trips.lock().expect("ledger mutex poisoned");
        if guard
            .iter()
            .any(|existing| existing.vehicle == trip.vehicle && existing.progress < 100)
        {
            return Err(LedgerError::Rejected(format!(
                "vehicle {} already has a trip in progress",
                trip.vehicle
            )));
        }
        guard.push(trip.clone());
        Ok(trip)
    }
}

struct SampleVehicle {
    id: &'static str,
    name: &'static str,
    category: &'static str,
    status: VehicleStatus,
    health_score: u8,
    breakdown_risk: u8,
    telemetry_completeness: u8,
    total_trips: u32,
    anomalies: &'static [&'static str],
    location: &'static str,
    driver: Option<&'static str>,
}

const SAMPLE_FLEET: [SampleVehicle; 5] = [
    SampleVehicle {
        id: "VH001",
        name: "Tata Ultra T.7",
        category: "Heavy Truck",
        status: VehicleStatus::Active,
        health_score: 87,
        breakdown_risk: 23,
        telemetry_completeness: 95,
        total_trips: 234,
        anomalies: &["High RPM fluctuation"],
        location: "Mumbai Depot",
        driver: Some("DRV001"),
    },
    SampleVehicle {
        id: "VH002",
        name: "Ashok Leyland 3118",
        category: "Medium Truck",
        status: VehicleStatus::Active,
        health_score: 92,
        breakdown_risk: 12,
        telemetry_completeness: 98,
        total_trips: 189,
        anomalies: &[],
        location: "Delhi Hub",
        driver: Some("DRV002"),
    },
    SampleVehicle {
        id: "VH003",
        name: "Mahindra Blazo X",
        category: "Heavy Truck",
        status: VehicleStatus::Maintenance,
        health_score: 45,
        breakdown_risk: 78,
        telemetry_completeness: 67,
        total_trips: 312,
        anomalies: &["Engine overheating", "Low oil pressure", "Sensor malfunction"],
        location: "Bangalore Service Center",
        driver: None,
    },
    SampleVehicle {
        id: "VH004",
        name: "BharatBenz 2823R",
        category: "Heavy Truck",
        status: VehicleStatus::Active,
        health_score: 95,
        breakdown_risk: 8,
        telemetry_completeness: 99,
        total_trips: 156,
        anomalies: &[],
        location: "Chennai Depot",
        driver: Some("DRV003"),
    },
    SampleVehicle {
        id: "VH005",
        name: "Eicher Pro 6031",
        category: "Medium Truck",
        status: VehicleStatus::Active,
        health_score: 71,
        breakdown_risk: 35,
        telemetry_completeness: 82,
        total_trips: 267,
        anomalies: &["Irregular fuel consumption"],
        location: "Pune Hub",
        driver: Some("DRV004"),
    },
];

/// Demo roster used when no CSV export is configured.
pub(crate) fn sample_fleet() -> Vec<Vehicle> {
    SAMPLE_FLEET
        .iter()
        .map(|sample| Vehicle {
            id: VehicleId(sample.id.to_string()),
            name: sample.name.to_string(),
            category: sample.category.to_string(),
            status: sample.status,
            health_score: sample.health_score,
            breakdown_risk: sample.breakdown_risk,
            telemetry_completeness: sample.telemetry_completeness,
            total_trips: sample.total_trips,
            anomalies: sample.anomalies.iter().map(|a| a.to_string()).collect(),
            location: Some(sample.location.to_string()),
            driver: sample.driver.map(str::to_string),
        })
        .collect()
}

pub(crate) fn sample_routes() -> Vec<RouteProfile> {
    [
        ("RT001", "Mumbai - Delhi Express", 1420, Terrain::Highway),
        ("RT002", "Bangalore - Chennai Route", 350, Terrain::Highway),
        ("RT003", "Delhi - Jaipur Highway", 280, Terrain::Highway),
        ("RT004", "Mumbai - Pune Express", 150, Terrain::Highway),
        ("RT005", "Kolkata - Bhubaneswar", 445, Terrain::Mixed),
    ]
    .into_iter()
    .map(|(id, name, distance, terrain)| RouteProfile {
        id: id.to_string(),
        name: name.to_string(),
        distance,
        terrain,
    })
    .collect()
}

pub(crate) fn find_route(raw: &str) -> Result<RouteProfile, String> {
    let wanted = raw.trim();
    sample_routes()
        .into_iter()
        .find(|route| route.id.eq_ignore_ascii_case(wanted))
        .ok_or_else(|| {
            let known: Vec<String> = sample_routes().into_iter().map(|route| route.id).collect();
            format!("unknown route '{raw}' (expected one of {})", known.join(", "))
        })
}

pub(crate) fn parse_weather(raw: &str) -> Result<Weather, String> {
    raw.parse::<Weather>().map_err(|err| err.to_string())
}

pub(crate) fn parse_terrain(raw: &str) -> Result<Terrain, String> {
    raw.parse::<Terrain>().map_err(|err| err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sample_fleet_has_one_vehicle_in_maintenance() {
        let fleet = sample_fleet();
        assert_eq!(fleet.len(), 5);
        let inactive: Vec<_> = fleet
            .iter()
            .filter(|vehicle| !vehicle.is_eligible())
            .map(|vehicle| vehicle.id.0.as_str())
            .collect();
        assert_eq!(inactive, vec!["VH003"]);
    }

    #[test]
    fn route_lookup_is_case_insensitive() {
        let route = find_route("rt005").expect("route");
        assert_eq!(route.terrain, Terrain::Mixed);
        assert_eq!(route.distance, 445);

        let error = find_route("RT999").expect_err("unknown");
        assert!(error.contains("RT001"));
    }

    #[test]
    fn weather_parser_reports_bad_values() {
        assert_eq!(parse_weather("Storm"), Ok(Weather::Storm));
        assert_eq!(
            parse_weather("hail"),
            Err("unrecognized weather 'hail'".to_string())
        );
    }

    #[tokio::test]
    async fn ledger_rejects_second_open_trip_for_vehicle() {
        use chrono::Utc;
        use fleet_ai::workflows::allocation::TripStatus;

        let ledger = InMemoryTripLedger::default();
        let now = Utc::now();
        let trip = TripRecord {
            route: "RT004".to_string(),
            vehicle: VehicleId("VH002".to_string()),
            driver: "DRV002".to_string(),
            status: TripStatus::InProgress,
            load_weight: 9_000,
            start_time: now,
            expected_end: now + chrono::Duration::hours(24),
            breakdown_risk: 12,
            ai_confidence: 94,
            predicted_issues: Vec::new(),
            progress: 0,
        };

        ledger.record(trip.clone()).await.expect("first trip");
        let error = ledger.record(trip).await.expect_err("duplicate");

        assert!(matches!(error, LedgerError::Rejected(_)));
        assert_eq!(ledger.trips().len(), 1);
    }
}
