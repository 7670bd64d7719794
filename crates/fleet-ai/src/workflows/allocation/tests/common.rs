use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::response::Response;
use chrono::{DateTime, TimeZone, Utc};
use serde_json::Value;

use crate::config::DispatchConfig;
use crate::workflows::allocation::domain::{
    Terrain, TripParameters, TripRecord, TripRequest, Vehicle, VehicleId, VehicleStatus, Weather,
};
use crate::workflows::allocation::repository::{
    LedgerError, RepositoryError, TripLedger, VehicleRepository,
};
use crate::workflows::allocation::TripAllocationService;

pub(super) fn vehicle(id: &str, breakdown_risk: u8, telemetry_completeness: u8) -> Vehicle {
    Vehicle {
        id: VehicleId(id.to_string()),
        name: format!("Vehicle {id}"),
        category: "Heavy Truck".to_string(),
        status: VehicleStatus::Active,
        health_score: 80,
        breakdown_risk,
        telemetry_completeness,
        total_trips: 100,
        anomalies: Vec::new(),
        location: None,
        driver: None,
    }
}

fn roster_vehicle(
    id: &str,
    name: &str,
    category: &str,
    status: VehicleStatus,
    (health_score, breakdown_risk, telemetry_completeness): (u8, u8, u8),
    total_trips: u32,
    anomalies: &[&str],
    driver: Option<&str>,
) -> Vehicle {
    Vehicle {
        id: VehicleId(id.to_string()),
        name: name.to_string(),
        category: category.to_string(),
        status,
        health_score,
        breakdown_risk,
        telemetry_completeness,
        total_trips,
        anomalies: anomalies.iter().map(|entry| entry.to_string()).collect(),
        location: None,
        driver: driver.map(str::to_string),
    }
}

/// Five-vehicle depot roster; VH003 is in the workshop.
pub(super) fn fleet() -> Vec<Vehicle> {
    vec![
        roster_vehicle(
            "VH001",
            "Tata Ultra T.7",
            "Heavy Truck",
            VehicleStatus::Active,
            (87, 23, 95),
            234,
            &["High RPM fluctuation"],
            Some("DRV001"),
        ),
        roster_vehicle(
            "VH002",
            "Ashok Leyland 3118",
            "Medium Truck",
            VehicleStatus::Active,
            (92, 12, 98),
            189,
            &[],
            Some("DRV002"),
        ),
        roster_vehicle(
            "VH003",
            "Mahindra Blazo X",
            "Heavy Truck",
            VehicleStatus::Maintenance,
            (45, 78, 67),
            312,
            &["Engine overheating", "Low oil pressure", "Sensor malfunction"],
            None,
        ),
        roster_vehicle(
            "VH004",
            "BharatBenz 2823R",
            "Heavy Truck",
            VehicleStatus::Active,
            (95, 8, 99),
            156,
            &[],
            Some("DRV003"),
        ),
        roster_vehicle(
            "VH005",
            "Eicher Pro 6031",
            "Medium Truck",
            VehicleStatus::Active,
            (71, 35, 82),
            267,
            &["Irregular fuel consumption"],
            None,
        ),
    ]
}

pub(super) fn trip(load_weight: u32, terrain: Terrain, weather: Weather) -> TripParameters {
    TripParameters {
        route: "RT001".to_string(),
        distance: 1420,
        load_weight,
        terrain,
        weather,
    }
}

pub(super) fn highway_trip() -> TripParameters {
    trip(12_000, Terrain::Highway, Weather::Clear)
}

pub(super) fn trip_request() -> TripRequest {
    TripRequest {
        route: "RT001".to_string(),
        distance: 1420,
        load_weight: 12_000,
        terrain: "highway".to_string(),
        weather: "clear".to_string(),
    }
}

pub(super) fn dispatch() -> DispatchConfig {
    DispatchConfig::default()
}

pub(super) fn requested_at() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 7, 20, 8, 30, 0)
        .single()
        .expect("valid timestamp")
}

pub(super) fn id(raw: &str) -> VehicleId {
    VehicleId(raw.to_string())
}

pub(super) struct MemoryRepository {
    vehicles: Vec<Vehicle>,
}

impl MemoryRepository {
    pub(super) fn new(vehicles: Vec<Vehicle>) -> Self {
        Self { vehicles }
    }
}

#[async_trait]
impl VehicleRepository for MemoryRepository {
    async fn roster(&self) -> Result<Vec<Vehicle>, RepositoryError> {
        Ok(self.vehicles.clone())
    }
}

pub(super) struct UnavailableRepository;

#[async_trait]
impl VehicleRepository for UnavailableRepository {
    async fn roster(&self) -> Result<Vec<Vehicle>, RepositoryError> {
        Err(RepositoryError::Unavailable("fleet database offline".to_string()))
    }
}

#[derive(Default, Clone)]
pub(super) struct MemoryLedger {
    trips: Arc<Mutex<Vec<TripRecord>>>,
}

impl MemoryLedger {
    pub(super) fn trips(&self) -> Vec<TripRecord> {
        self.trips.lock().expect("ledger mutex poisoned").clone()
    }
}

#[async_trait]
impl TripLedger for MemoryLedger {
    async fn record(&self, trip: TripRecord) -> Result<TripRecord, LedgerError> {
        self.trips
            .lock()
            .expect("ledger mutex poisoned")
            .push(trip.clone());
        Ok(trip)
    }
}

/// Rejects the first `failures` submissions, then stores trips.
pub(super) struct FlakyLedger {
    failures: AtomicUsize,
    inner: MemoryLedger,
}

impl FlakyLedger {
    pub(super) fn new(failures: usize) -> Self {
        Self {
            failures: AtomicUsize::new(failures),
            inner: MemoryLedger::default(),
        }
    }

    pub(super) fn trips(&self) -> Vec<TripRecord> {
        self.inner.trips()
    }
}

#[async_trait]
impl TripLedger for FlakyLedger {
    async fn record(&self, trip: TripRecord) -> Result<TripRecord, LedgerError> {
        let remaining = self.failures.load(Ordering::SeqCst);
        if remaining > 0 {
            self.failures.store(remaining - 1, Ordering::SeqCst);
            return Err(LedgerError::Unavailable("trip service timeout".to_string()));
        }
        self.inner.record(trip).await
    }
}

pub(super) fn build_service() -> (
    TripAllocationService<MemoryRepository, MemoryLedger>,
    Arc<MemoryLedger>,
) {
    build_service_with(dispatch())
}

pub(super) fn build_service_with(
    dispatch: DispatchConfig,
) -> (
    TripAllocationService<MemoryRepository, MemoryLedger>,
    Arc<MemoryLedger>,
) {
    let repository = Arc::new(MemoryRepository::new(fleet()));
    let ledger = Arc::new(MemoryLedger::default());
    let service = TripAllocationService::new(repository, ledger.clone(), dispatch);
    (service, ledger)
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 16 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
