use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Router,
};
use chrono::Utc;
use serde::Deserialize;
use serde_json::json;

use super::domain::{SessionId, TripRequest, VehicleId};
use super::error::AllocationError;
use super::repository::{TripLedger, VehicleRepository};
use super::service::{AllocationServiceError, TripAllocationService};

#[derive(Debug, Deserialize)]
pub struct SwapRequest {
    pub vehicle_id: VehicleId,
}

#[derive(Debug, Deserialize)]
pub struct SimulateRequest {
    pub load_weight: u32,
}

/// Router builder exposing the recommendation session endpoints.
pub fn allocation_router<R, L>(service: Arc<TripAllocationService<R, L>>) -> Router
where
    R: VehicleRepository + 'static,
    L: TripLedger + 'static,
{
    Router::new()
        .route("/api/v1/allocations", post(open_handler::<R, L>))
        .route(
            "/api/v1/allocations/:session_id",
            get(session_handler::<R, L>).delete(abandon_handler::<R, L>),
        )
        .route(
            "/api/v1/allocations/:session_id/trip",
            put(rescore_handler::<R, L>),
        )
        .route(
            "/api/v1/allocations/:session_id/swap",
            post(swap_handler::<R, L>),
        )
        .route(
            "/api/v1/allocations/:session_id/simulate",
            post(simulate_handler::<R, L>),
        )
        .route(
            "/api/v1/allocations/:session_id/confirm",
            post(confirm_handler::<R, L>),
        )
        .with_state(service)
}

pub(crate) async fn open_handler<R, L>(
    State(service): State<Arc<TripAllocationService<R, L>>>,
    axum::Json(request): axum::Json<TripRequest>,
) -> Response
where
    R: VehicleRepository + 'static,
    L: TripLedger + 'static,
{
    match service.open(request).await {
        Ok(view) => (StatusCode::CREATED, axum::Json(view)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn session_handler<R, L>(
    State(service): State<Arc<TripAllocationService<R, L>>>,
    Path(session_id): Path<String>,
) -> Response
where
    R: VehicleRepository + 'static,
    L: TripLedger + 'static,
{
    match service.get(&SessionId(session_id)).await {
        Ok(view) => (StatusCode::OK, axum::Json(view)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn rescore_handler<R, L>(
    State(service): State<Arc<TripAllocationService<R, L>>>,
    Path(session_id): Path<String>,
    axum::Json(request): axum::Json<TripRequest>,
) -> Response
where
    R: VehicleRepository + 'static,
    L: TripLedger + 'static,
{
    match service.rescore(&SessionId(session_id), request).await {
        Ok(view) => (StatusCode::OK, axum::Json(view)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn swap_handler<R, L>(
    State(service): State<Arc<TripAllocationService<R, L>>>,
    Path(session_id): Path<String>,
    axum::Json(request): axum::Json<SwapRequest>,
) -> Response
where
    R: VehicleRepository + 'static,
    L: TripLedger + 'static,
{
    match service
        .swap(&SessionId(session_id), &request.vehicle_id)
        .await
    {
        Ok(view) => (StatusCode::OK, axum::Json(view)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn simulate_handler<R, L>(
    State(service): State<Arc<TripAllocationService<R, L>>>,
    Path(session_id): Path<String>,
    axum::Json(request): axum::Json<SimulateRequest>,
) -> Response
where
    R: VehicleRepository + 'static,
    L: TripLedger + 'static,
{
    match service
        .simulate(&SessionId(session_id), request.load_weight)
        .await
    {
        Ok(simulation) => (StatusCode::OK, axum::Json(simulation)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn confirm_handler<R, L>(
    State(service): State<Arc<TripAllocationService<R, L>>>,
    Path(session_id): Path<String>,
) -> Response
where
    R: VehicleRepository + 'static,
    L: TripLedger + 'static,
{
    match service.confirm(&SessionId(session_id), Utc::now()).await {
        Ok(record) => (StatusCode::CREATED, axum::Json(record)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn abandon_handler<R, L>(
    State(service): State<Arc<TripAllocationService<R, L>>>,
    Path(session_id): Path<String>,
) -> Response
where
    R: VehicleRepository + 'static,
    L: TripLedger + 'static,
{
    match service.abandon(&SessionId(session_id)).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(error) => error_response(error),
    }
}

impl AllocationServiceError {
    /// HTTP status and stable machine-readable kind for this error.
    pub fn status(&self) -> (StatusCode, &'static str) {
        match self {
            AllocationServiceError::Allocation(AllocationError::InvalidParameters { .. }) => {
                (StatusCode::UNPROCESSABLE_ENTITY, "invalid_parameters")
            }
            AllocationServiceError::Allocation(AllocationError::NoEligibleVehicles) => {
                (StatusCode::CONFLICT, "no_eligible_vehicles")
            }
            AllocationServiceError::Allocation(AllocationError::UnknownAlternative(_)) => {
                (StatusCode::BAD_REQUEST, "unknown_alternative")
            }
            AllocationServiceError::Allocation(AllocationError::NotScored) => {
                (StatusCode::CONFLICT, "not_scored")
            }
            AllocationServiceError::Allocation(AllocationError::SessionClosed) => {
                (StatusCode::CONFLICT, "session_closed")
            }
            AllocationServiceError::Allocation(AllocationError::SubmissionFailed(_)) => {
                (StatusCode::BAD_GATEWAY, "submission_failed")
            }
            AllocationServiceError::Repository(_) => {
                (StatusCode::SERVICE_UNAVAILABLE, "roster_unavailable")
            }
            AllocationServiceError::SessionNotFound(_) => {
                (StatusCode::NOT_FOUND, "session_not_found")
            }
        }
    }
}

fn error_response(error: AllocationServiceError) -> Response {
    let (status, kind) = error.status();
    let payload = json!({
        "error": error.to_string(),
        "kind": kind,
    });
    (status, axum::Json(payload)).into_response()
}
