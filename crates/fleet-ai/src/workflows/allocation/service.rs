use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Instant;

use chrono::{DateTime, Utc};
use tokio::sync::Mutex as SessionLock;
use tracing::{debug, info};

use crate::config::DispatchConfig;

use super::domain::{SessionId, TripParameters, TripRecord, TripRequest, VehicleId};
use super::error::AllocationError;
use super::repository::{RepositoryError, TripLedger, VehicleRepository};
use super::session::RecommendationSession;
use super::simulation::Simulation;
use super::views::SessionView;

type SessionHandle = Arc<SessionLock<RecommendationSession>>;

struct SessionEntry {
    handle: SessionHandle,
    last_used: Instant,
    /// Logical access order; larger is more recent.
    touched: u64,
}

/// Service composing the roster, the trip ledger, and the live recommendation sessions.
///
/// Each session sits behind its own async lock which is held for the whole operation,
/// including the ledger call on confirmation, so requests against one session run one at a
/// time while separate sessions proceed independently.
///
/// Opening a session first drops sessions idle past `DispatchConfig::session_idle_minutes`,
/// then the least recently used ones until the registry is below `max_sessions`.
pub struct TripAllocationService<R, L> {
    repository: Arc<R>,
    ledger: Arc<L>,
    dispatch: DispatchConfig,
    sessions: Mutex<HashMap<SessionId, SessionEntry>>,
    sequence: AtomicU64,
    clock: AtomicU64,
}

impl<R, L> TripAllocationService<R, L>
where
    R: VehicleRepository + 'static,
    L: TripLedger + 'static,
{
    pub fn new(repository: Arc<R>, ledger: Arc<L>, dispatch: DispatchConfig) -> Self {
        Self {
            repository,
            ledger,
            dispatch,
            sessions: Mutex::new(HashMap::new()),
            sequence: AtomicU64::new(1),
            clock: AtomicU64::new(0),
        }
    }

    /// Validate the trip, score the current roster, and register a new session.
    pub async fn open(&self, request: TripRequest) -> Result<SessionView, AllocationServiceError> {
        let trip = TripParameters::try_from(request)?;
        let roster = self.repository.roster().await?;

        let mut session = RecommendationSession::new(self.next_session_id());
        session.score(trip, &roster)?;

        let view = SessionView::from(&session);
        let entry = SessionEntry {
            handle: Arc::new(SessionLock::new(session)),
            last_used: Instant::now(),
            touched: self.tick(),
        };
        let evicted = {
            let mut registry = self.registry();
            let evicted = self.evict(&mut registry);
            registry.insert(view.session_id.clone(), entry);
            evicted
        };
        if evicted > 0 {
            debug!(evicted, "allocation sessions evicted");
        }
        info!(session = %view.session_id, roster = roster.len(), "allocation session opened");

        Ok(view)
    }

    /// Re-score an existing session under new trip conditions.
    pub async fn rescore(
        &self,
        session_id: &SessionId,
        request: TripRequest,
    ) -> Result<SessionView, AllocationServiceError> {
        let trip = TripParameters::try_from(request)?;
        let handle = self.handle(session_id)?;
        let mut session = handle.lock().await;

        let roster = self.repository.roster().await?;
        session.score(trip, &roster)?;
        Ok(SessionView::from(&*session))
    }

    pub async fn get(&self, session_id: &SessionId) -> Result<SessionView, AllocationServiceError> {
        let handle = self.handle(session_id)?;
        let session = handle.lock().await;
        Ok(SessionView::from(&*session))
    }

    pub async fn swap(
        &self,
        session_id: &SessionId,
        vehicle_id: &VehicleId,
    ) -> Result<SessionView, AllocationServiceError> {
        let handle = self.handle(session_id)?;
        let mut session = handle.lock().await;
        session.swap(vehicle_id)?;
        Ok(SessionView::from(&*session))
    }

    pub async fn simulate(
        &self,
        session_id: &SessionId,
        hypothetical_load: u32,
    ) -> Result<Simulation, AllocationServiceError> {
        let handle = self.handle(session_id)?;
        let mut session = handle.lock().await;
        Ok(session.simulate(hypothetical_load)?)
    }

    /// Submit the recommended vehicle's trip to the ledger.
    pub async fn confirm(
        &self,
        session_id: &SessionId,
        requested_at: DateTime<Utc>,
    ) -> Result<TripRecord, AllocationServiceError> {
        let handle = self.handle(session_id)?;
        let mut session = handle.lock().await;
        let record = session
            .confirm(self.ledger.as_ref(), requested_at, &self.dispatch)
            .await?;
        Ok(record)
    }

    /// Discard the session and drop it from the registry.
    pub async fn abandon(&self, session_id: &SessionId) -> Result<(), AllocationServiceError> {
        let handle = self.handle(session_id)?;
        handle.lock().await.abandon()?;
        self.registry().remove(session_id);
        debug!(session = %session_id, "allocation session removed");
        Ok(())
    }

    pub fn dispatch(&self) -> &DispatchConfig {
        &self.dispatch
    }

    /// Number of sessions currently held.
    pub fn session_count(&self) -> usize {
        self.registry().len()
    }

    fn handle(&self, session_id: &SessionId) -> Result<SessionHandle, AllocationServiceError> {
        let touched = self.tick();
        let mut registry = self.registry();
        let entry = registry
            .get_mut(session_id)
            .ok_or_else(|| AllocationServiceError::SessionNotFound(session_id.clone()))?;
        entry.last_used = Instant::now();
        entry.touched = touched;
        Ok(entry.handle.clone())
    }

    /// Makes room for one more session. Returns how many were dropped.
    fn evict(&self, registry: &mut HashMap<SessionId, SessionEntry>) -> usize {
        let before = registry.len();
        let idle_timeout = self.dispatch.session_idle_timeout();
        let now = Instant::now();
        registry.retain(|_, entry| now.duration_since(entry.last_used) < idle_timeout);

        while !registry.is_empty() && registry.len() >= self.dispatch.max_sessions {
            let oldest = registry
                .iter()
                .min_by_key(|(_, entry)| entry.touched)
                .map(|(id, _)| id.clone());
            match oldest {
                Some(id) => {
                    registry.remove(&id);
                }
                None => break,
            }
        }

        before - registry.len()
    }

    fn tick(&self) -> u64 {
        self.clock.fetch_add(1, Ordering::Relaxed)
    }

    fn registry(&self) -> std::sync::MutexGuard<'_, HashMap<SessionId, SessionEntry>> {
        self.sessions.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn next_session_id(&self) -> SessionId {
        let id = self.sequence.fetch_add(1, Ordering::Relaxed);
        SessionId(format!("alloc-{id:06}"))
    }
}

/// Error raised by the allocation service.
#[derive(Debug, thiserror::Error)]
pub enum AllocationServiceError {
    #[error(transparent)]
    Allocation(#[from] AllocationError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error("session {0} not found")]
    SessionNotFound(SessionId),
}
