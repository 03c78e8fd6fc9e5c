use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use uuid::Uuid;

use crate::error::DashboardError;
use crate::models::session::{CodingSession, InterviewSession};
use crate::store::record_store::{CODING_SESSIONS, INTERVIEW_SESSIONS, RecordStore};

#[derive(Debug, Default)]
struct StoreState {
    user_id: Option<Uuid>,
    interviews: Vec<InterviewSession>,
    coding: Vec<CodingSession>,
    epoch: u64,
    loads_in_flight: usize,
    settled: bool,
}

impl StoreState {
    fn reset(&mut self, user_id: Option<Uuid>) {
        self.user_id = user_id;
        self.interviews.clear();
        self.coding.clear();
        self.loads_in_flight = 0;
        self.settled = false;
        self.epoch += 1;
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionSnapshot {
    pub interviews: Vec<InterviewSession>,
    pub coding: Vec<CodingSession>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// The fetched lists replaced the in-memory ones
    Applied { interviews: usize, coding: usize },
    /// The user changed or the store was disposed while the fetch was running
    Discarded,
}

// Clones share one state. No lock is held across a remote call; instead every
// user binding gets an epoch, and results arriving under an older epoch are dropped.
#[derive(Clone)]
pub struct SessionStore {
    remote: Arc<dyn RecordStore>,
    state: Arc<Mutex<StoreState>>,
}

impl SessionStore {
    pub fn new(remote: Arc<dyn RecordStore>) -> Self {
        Self {
            remote,
            state: Arc::new(Mutex::new(StoreState::default())),
        }
    }

    fn lock(&self) -> MutexGuard<'_, StoreState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub(crate) fn remote(&self) -> &Arc<dyn RecordStore> {
        &self.remote
    }

    fn bind(&self, user_id: Uuid) {
        let mut state = self.lock();
        if state.user_id != Some(user_id) {
            log::info!("Session store bound to user {}", user_id);
            state.reset(Some(user_id));
        }
    }

    /// Binds the store to `user_id` right away, dropping whatever was held for a previous
    /// user, and returns the first load. The store reports loading until that load settles.
    pub fn initialize(
        &self,
        user_id: Uuid,
    ) -> impl Future<Output = Result<LoadOutcome, DashboardError>> + Send + use<> {
        self.bind(user_id);
        let store = self.clone();
        async move { store.load(user_id).await }
    }

    pub fn dispose(&self) {
        let mut state = self.lock();
        if let Some(user_id) = state.user_id {
            log::info!("Session store released user {}", user_id);
        }
        state.reset(None);
    }

    /// Replaces both lists only when both fetches succeed. Overlapping loads: last to complete wins.
    pub async fn load(&self, user_id: Uuid) -> Result<LoadOutcome, DashboardError> {
        let epoch = {
            let mut state = self.lock();
            if state.user_id != Some(user_id) {
                log::debug!("Ignoring load for {} while bound to {:?}", user_id, state.user_id);
                return Ok(LoadOutcome::Discarded);
            }
            state.loads_in_flight += 1;
            state.epoch
        };

        let remote = &self.remote;
        let fetched = tokio::try_join!(
            async {
                remote
                    .list_interview_sessions(user_id)
                    .await
                    .map_err(|e| DashboardError::fetch(INTERVIEW_SESSIONS, e))
            },
            async {
                remote
                    .list_coding_sessions(user_id)
                    .await
                    .map_err(|e| DashboardError::fetch(CODING_SESSIONS, e))
            },
        );

        let mut state = self.lock();
        if state.epoch != epoch {
            log::debug!("Discarding load result for {} from a previous session", user_id);
            return match fetched {
                Ok(_) => Ok(LoadOutcome::Discarded),
                Err(e) => Err(e),
            };
        }
        state.loads_in_flight = state.loads_in_flight.saturating_sub(1);
        state.settled = true;

        match fetched {
            Ok((mut interviews, mut coding)) => {
                interviews.retain(|s| s.user_id == user_id);
                coding.retain(|s| s.user_id == user_id);
                log::debug!(
                    "Loaded {} interview sessions and {} coding sessions",
                    interviews.len(),
                    coding.len()
                );
                let outcome = LoadOutcome::Applied {
                    interviews: interviews.len(),
                    coding: coding.len(),
                };
                state.interviews = interviews;
                state.coding = coding;
                Ok(outcome)
            }
            Err(e) => {
                log::error!("Error loading data: {}", e);
                Err(e)
            }
        }
    }

    /// Removes the local entry only after the remote delete succeeds, even when the
    /// remote row was already gone. Returns whether a local entry was removed.
    pub async fn delete_interview(&self, id: Uuid) -> Result<bool, DashboardError> {
        let (user_id, epoch) = {
            let state = self.lock();
            let user_id = state.user_id.ok_or(DashboardError::NotSignedIn)?;
            (user_id, state.epoch)
        };

        let rows = match self.remote.delete_interview_session(id, user_id).await {
            Ok(rows) => rows,
            Err(e) => {
                let err = DashboardError::write(INTERVIEW_SESSIONS, e);
                log::error!("Error deleting interview session {}: {}", id, err);
                return Err(err);
            }
        };
        if rows == 0 {
            log::warn!("Interview session {} was already gone from {}", id, INTERVIEW_SESSIONS);
        }

        let mut state = self.lock();
        if state.epoch != epoch {
            return Ok(false);
        }
        let before = state.interviews.len();
        state
            .interviews
            .retain(|s| !(s.id == id && s.user_id == user_id));
        Ok(state.interviews.len() < before)
    }

    pub(crate) fn prepend_coding_session(&self, session: CodingSession) -> bool {
        let mut state = self.lock();
        if state.user_id != Some(session.user_id) {
            return false;
        }
        state.coding.insert(0, session);
        true
    }

    pub fn user_id(&self) -> Option<Uuid> {
        self.lock().user_id
    }

    pub fn is_loading(&self) -> bool {
        let state = self.lock();
        state.loads_in_flight > 0 || (state.user_id.is_some() && !state.settled)
    }

    pub fn interview_sessions(&self) -> Vec<InterviewSession> {
        self.lock().interviews.clone()
    }

    pub fn coding_sessions(&self) -> Vec<CodingSession> {
        self.lock().coding.clone()
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        let state = self.lock();
        SessionSnapshot {
            interviews: state.interviews.clone(),
            coding: state.coding.clone(),
        }
    }
}
