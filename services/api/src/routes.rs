use crate::infra::{sample_routes, AppState};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use fleet_ai::workflows::allocation::{
    allocation_router, RouteProfile, TripAllocationService, TripLedger, VehicleRepository,
};
use serde_json::json;
use std::sync::Arc;

pub(crate) fn with_allocation_routes<R, L>(
    service: Arc<TripAllocationService<R, L>>,
) -> axum::Router
where
    R: VehicleRepository + 'static,
    L: TripLedger + 'static,
{
    allocation_router(service)
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
        .route("/api/v1/routes", axum::routing::get(routes_endpoint))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

/// Route catalogue operators pick from before requesting a recommendation.
pub(crate) async fn routes_endpoint() -> Json<Vec<RouteProfile>> {
    Json(sample_routes())
}
