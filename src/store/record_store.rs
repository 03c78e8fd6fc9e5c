use anyhow::Result;
use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};
use uuid::Uuid;

use crate::models::session::{CodingSession, InterviewSession};

pub const INTERVIEW_SESSIONS: &str = "interview_sessions";
pub const CODING_SESSIONS: &str = "coding_sessions";

#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Interview sessions owned by `user_id`, `created_at` descending.
    async fn list_interview_sessions(&self, user_id: Uuid) -> Result<Vec<InterviewSession>>;

    /// Coding sessions owned by `user_id`, `created_at` descending.
    async fn list_coding_sessions(&self, user_id: Uuid) -> Result<Vec<CodingSession>>;

    /// Deletes the row matching both `id` and `user_id`. Returns the number of rows removed,
    /// which is zero when the session belongs to someone else.
    async fn delete_interview_session(&self, id: Uuid, user_id: Uuid) -> Result<u64>;

    async fn insert_coding_session(&self, session: &CodingSession) -> Result<()>;
}

#[derive(Default)]
pub struct MemoryStore {
    interviews: Mutex<Vec<InterviewSession>>,
    coding: Mutex<Vec<CodingSession>>,
    fail_fetch: AtomicBool,
    fail_writes: AtomicBool,
}

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(PoisonError::into_inner)
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    pub fn with_sessions(interviews: Vec<InterviewSession>, coding: Vec<CodingSession>) -> Self {
        let store = Self::new();
        *lock(&store.interviews) = interviews;
        *lock(&store.coding) = coding;
        store
    }

    #[cfg(test)]
    pub fn add_interview(&self, session: InterviewSession) {
        lock(&self.interviews).push(session);
    }

    #[cfg(test)]
    pub fn set_fail_fetch(&self, fail: bool) {
        self.fail_fetch.store(fail, Ordering::SeqCst);
    }

    #[cfg(test)]
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    #[cfg(test)]
    pub fn interview_count(&self) -> usize {
        lock(&self.interviews).len()
    }

    #[cfg(test)]
    pub fn coding_snapshot(&self) -> Vec<CodingSession> {
        lock(&self.coding).clone()
    }

    fn check_fetch(&self, collection: &str) -> Result<()> {
        if self.fail_fetch.load(Ordering::SeqCst) {
            anyhow::bail!("{} unavailable", collection);
        }
        Ok(())
    }

    fn check_write(&self, collection: &str) -> Result<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            anyhow::bail!("{} rejected the write", collection);
        }
        Ok(())
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn list_interview_sessions(&self, user_id: Uuid) -> Result<Vec<InterviewSession>> {
        self.check_fetch(INTERVIEW_SESSIONS)?;
        let mut rows: Vec<InterviewSession> = lock(&self.interviews)
            .iter()
            .filter(|s| s.user_id == user_id)
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(rows)
    }

    async fn list_coding_sessions(&self, user_id: Uuid) -> Result<Vec<CodingSession>> {
        self.check_fetch(CODING_SESSIONS)?;
        let mut rows: Vec<CodingSession> = lock(&self.coding)
            .iter()
            .filter(|s| s.user_id == user_id)
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(rows)
    }

    async fn delete_interview_session(&self, id: Uuid, user_id: Uuid) -> Result<u64> {
        self.check_write(INTERVIEW_SESSIONS)?;
        let mut rows = lock(&self.interviews);
        let before = rows.len();
        rows.retain(|s| !(s.id == id && s.user_id == user_id));
        Ok((before - rows.len()) as u64)
    }

    async fn insert_coding_session(&self, session: &CodingSession) -> Result<()> {
        self.check_write(CODING_SESSIONS)?;
        lock(&self.coding).push(session.clone());
        Ok(())
    }
}
