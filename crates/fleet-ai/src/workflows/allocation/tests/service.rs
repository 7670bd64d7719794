use std::sync::Arc;

use crate::config::DispatchConfig;

use super::common::{
    build_service, build_service_with, dispatch, id, requested_at, trip_request, MemoryLedger,
    MemoryRepository, UnavailableRepository,
};
use crate::workflows::allocation::{
    AllocationError, AllocationServiceError, SessionId, SessionPhase, TripAllocationService,
    Vehicle,
};

#[tokio::test]
async fn open_scores_roster_and_registers_session() {
    let (service, _) = build_service();

    let view = service.open(trip_request()).await.expect("open");

    assert_eq!(view.session_id, SessionId("alloc-000001".to_string()));
    assert_eq!(view.phase, SessionPhase::Scored);
    let recommended = view.recommended.expect("recommended");
    assert_eq!(recommended.vehicle_id, id("VH004"));
    assert_eq!(view.alternatives.len(), 3);
    assert_eq!(view.factors.len(), 6);

    let fetched = service.get(&view.session_id).await.expect("get");
    assert_eq!(fetched.recommended.map(|c| c.vehicle_id), Some(id("VH004")));
}

#[tokio::test]
async fn session_ids_are_sequential() {
    let (service, _) = build_service();

    let first = service.open(trip_request()).await.expect("first");
    let second = service.open(trip_request()).await.expect("second");

    assert_eq!(first.session_id.0, "alloc-000001");
    assert_eq!(second.session_id.0, "alloc-000002");
}

#[tokio::test]
async fn invalid_categories_are_rejected_before_scoring() {
    let (service, _) = build_service();
    let mut request = trip_request();
    request.terrain = "desert".to_string();

    let error = service.open(request).await.expect_err("invalid terrain");

    assert!(matches!(
        error,
        AllocationServiceError::Allocation(AllocationError::InvalidParameters {
            field: "terrain",
            ..
        })
    ));
}

#[tokio::test]
async fn category_parsing_ignores_case() {
    let (service, _) = build_service();
    let mut request = trip_request();
    request.terrain = " Mountain ".to_string();
    request.weather = "RAIN".to_string();

    let view = service.open(request).await.expect("open");

    let recommended = view.recommended.expect("recommended");
    assert_eq!(recommended.calculated_risk, 26);
}

#[tokio::test]
async fn unavailable_roster_surfaces_repository_error() {
    let service = TripAllocationService::new(
        Arc::new(UnavailableRepository),
        Arc::new(MemoryLedger::default()),
        dispatch(),
    );

    let error = service.open(trip_request()).await.expect_err("offline");

    assert!(matches!(error, AllocationServiceError::Repository(_)));
}

#[tokio::test]
async fn empty_roster_opens_nothing() {
    let service = TripAllocationService::new(
        Arc::new(MemoryRepository::new(Vec::<Vehicle>::new())),
        Arc::new(MemoryLedger::default()),
        dispatch(),
    );

    let error = service.open(trip_request()).await.expect_err("empty");

    assert!(matches!(
        error,
        AllocationServiceError::Allocation(AllocationError::NoEligibleVehicles)
    ));
}

#[tokio::test]
async fn unknown_session_is_not_found() {
    let (service, _) = build_service();
    let missing = SessionId("alloc-999999".to_string());

    let error = service.get(&missing).await.expect_err("missing");

    assert!(matches!(error, AllocationServiceError::SessionNotFound(ref session) if session == &missing));
}

#[tokio::test]
async fn swap_simulate_and_confirm_through_service() {
    let (service, ledger) = build_service();
    let view = service.open(trip_request()).await.expect("open");

    let swapped = service
        .swap(&view.session_id, &id("VH001"))
        .await
        .expect("swap");
    assert_eq!(
        swapped.recommended.map(|candidate| candidate.vehicle_id),
        Some(id("VH001"))
    );

    let simulation = service
        .simulate(&view.session_id, 20_000)
        .await
        .expect("simulate");
    assert_eq!(simulation.vehicle_id, id("VH001"));
    assert_eq!(simulation.simulated_risk, 31);
    let simulated = service.get(&view.session_id).await.expect("get");
    assert_eq!(simulated.phase, SessionPhase::Simulated);

    let record = service
        .confirm(&view.session_id, requested_at())
        .await
        .expect("confirm");
    assert_eq!(record.vehicle, id("VH001"));
    assert_eq!(record.driver, "DRV001");
    assert_eq!(record.breakdown_risk, 23);
    assert_eq!(ledger.trips(), vec![record.clone()]);

    let confirmed = service.get(&view.session_id).await.expect("get");
    assert_eq!(confirmed.phase, SessionPhase::Confirmed);
    assert_eq!(confirmed.confirmed_trip, Some(record));
    assert!(confirmed.recommended.is_none());
}

#[tokio::test]
async fn rescore_applies_new_conditions() {
    let (service, _) = build_service();
    let view = service.open(trip_request()).await.expect("open");
    let mut request = trip_request();
    request.load_weight = 21_000;

    let rescored = service
        .rescore(&view.session_id, request)
        .await
        .expect("rescore");

    assert_eq!(rescored.trip.map(|trip| trip.load_weight), Some(21_000));
    let recommended = rescored.recommended.expect("recommended");
    assert_eq!(recommended.calculated_risk, 33);
}

#[tokio::test]
async fn abandon_removes_session() {
    let (service, ledger) = build_service();
    let view = service.open(trip_request()).await.expect("open");

    service.abandon(&view.session_id).await.expect("abandon");

    assert!(matches!(
        service.get(&view.session_id).await,
        Err(AllocationServiceError::SessionNotFound(_))
    ));
    assert!(ledger.trips().is_empty());
}

#[tokio::test]
async fn registry_is_capped_at_max_sessions() {
    let (service, _) = build_service_with(DispatchConfig {
        max_sessions: 2,
        ..dispatch()
    });

    let first = service.open(trip_request()).await.expect("first");
    let second = service.open(trip_request()).await.expect("second");
    let third = service.open(trip_request()).await.expect("third");

    assert_eq!(service.session_count(), 2);
    assert!(matches!(
        service.get(&first.session_id).await,
        Err(AllocationServiceError::SessionNotFound(_))
    ));
    service.get(&second.session_id).await.expect("second kept");
    service.get(&third.session_id).await.expect("third kept");
}

#[tokio::test]
async fn least_recently_used_session_is_evicted_first() {
    let (service, _) = build_service_with(DispatchConfig {
        max_sessions: 2,
        ..dispatch()
    });

    let first = service.open(trip_request()).await.expect("first");
    let second = service.open(trip_request()).await.expect("second");
    service
        .simulate(&first.session_id, 14_000)
        .await
        .expect("touch first");
    service.open(trip_request()).await.expect("third");

    service.get(&first.session_id).await.expect("recently used");
    assert!(matches!(
        service.get(&second.session_id).await,
        Err(AllocationServiceError::SessionNotFound(_))
    ));
}

#[tokio::test]
async fn idle_sessions_are_dropped_on_open() {
    let (service, ledger) = build_service_with(DispatchConfig {
        session_idle_minutes: 0,
        ..dispatch()
    });

    let confirmed = service.open(trip_request()).await.expect("first");
    service
        .confirm(&confirmed.session_id, requested_at())
        .await
        .expect("confirm");
    let pending = service.open(trip_request()).await.expect("second");

    assert_eq!(service.session_count(), 1);
    assert!(matches!(
        service.get(&confirmed.session_id).await,
        Err(AllocationServiceError::SessionNotFound(_))
    ));
    assert_eq!(ledger.trips().len(), 1);
    assert_eq!(pending.session_id.0, "alloc-000002");
}

#[tokio::test]
async fn default_limits_keep_recent_sessions() {
    let (service, _) = build_service();

    for _ in 0..5 {
        service.open(trip_request()).await.expect("open");
    }

    assert_eq!(service.session_count(), 5);
}
