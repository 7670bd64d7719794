use crate::cli::ServeArgs;
use crate::infra::{sample_fleet, AppState, InMemoryTripLedger, InMemoryVehicleRepository};
use crate::routes::with_allocation_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use fleet_ai::config::AppConfig;
use fleet_ai::error::AppError;
use fleet_ai::telemetry;
use fleet_ai::workflows::allocation::{RosterImporter, TripAllocationService};
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::info;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry, config.environment)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let roster = match &config.dispatch.vehicle_roster {
        Some(path) => {
            let vehicles = RosterImporter::from_path(path)?;
            info!(path = %path.display(), vehicles = vehicles.len(), "vehicle roster imported");
            vehicles
        }
        None => sample_fleet(),
    };

    let repository = Arc::new(InMemoryVehicleRepository::new(roster));
    let ledger = Arc::new(InMemoryTripLedger::default());
    let allocation_service = Arc::new(TripAllocationService::new(
        repository,
        ledger,
        config.dispatch.clone(),
    ));

    let app = with_allocation_routes(allocation_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "fleet allocation service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
