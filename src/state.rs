//! Application state: the in-memory session store and the model client.
//!
//! Each browser session owns one `SessionState` behind its own mutex, so
//! actions of a session run one at a time (including the model call) while
//! other sessions proceed independently. Nothing is persisted; sessions idle
//! longer than the store's TTL are dropped the next time a session is created.

use std::{
    collections::HashMap,
    sync::Arc,
    time::{Duration, Instant},
};
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info, instrument};
use uuid::Uuid;

use crate::openai::InterviewModel;
use crate::session::SessionState;

pub type SessionHandle = Arc<Mutex<SessionState>>;

/// How long an HTTP session may sit unused before it is evicted.
pub const SESSION_IDLE_TTL: Duration = Duration::from_secs(30 * 60);

struct SessionEntry {
    handle: SessionHandle,
    last_seen: Instant,
}

#[derive(Clone)]
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<Uuid, SessionEntry>>>,
    idle_ttl: Duration,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::with_ttl(SESSION_IDLE_TTL)
    }
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_ttl(idle_ttl: Duration) -> Self {
        Self { sessions: Arc::new(RwLock::new(HashMap::new())), idle_ttl }
    }

    /// Look up a session, creating a fresh default state when the id is
    /// missing, unknown or expired. Always succeeds.
    #[instrument(level = "debug", skip(self))]
    pub async fn get_or_init(&self, id: Option<Uuid>) -> (Uuid, SessionHandle) {
        self.get_or_init_at(id, Instant::now()).await
    }

    async fn get_or_init_at(&self, id: Option<Uuid>, now: Instant) -> (Uuid, SessionHandle) {
        let mut sessions = self.sessions.write().await;

        if let Some(id) = id {
            if let Some(entry) = sessions.get_mut(&id) {
                if now.saturating_duration_since(entry.last_seen) <= self.idle_ttl {
                    entry.last_seen = now;
                    return (id, entry.handle.clone());
                }
            }
        }

        // Sweep expired entries only when creating.
        let before = sessions.len();
        let ttl = self.idle_ttl;
        sessions.retain(|_, e| now.saturating_duration_since(e.last_seen) <= ttl);
        let evicted = before - sessions.len();
        if evicted > 0 {
            debug!(target: "game", evicted, remaining = sessions.len(), "Idle sessions evicted");
        }

        let id = id.unwrap_or_else(Uuid::new_v4);
        let handle: SessionHandle = Arc::new(Mutex::new(SessionState::new()));
        sessions.insert(id, SessionEntry { handle: handle.clone(), last_seen: now });
        info!(target: "game", session = %id, "Session created");
        (id, handle)
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }
}

#[derive(Clone)]
pub struct AppState {
    pub sessions: SessionStore,
    pub model: Arc<dyn InterviewModel>,
}

impl AppState {
    pub fn new(model: Arc<dyn InterviewModel>) -> Self {
        Self { sessions: SessionStore::new(), model }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn unknown_or_missing_ids_get_fresh_sessions() {
        let store = SessionStore::new();
        let (a, _) = store.get_or_init(None).await;
        let (b, _) = store.get_or_init(None).await;
        assert_ne!(a, b);

        let chosen = Uuid::new_v4();
        let (c, _) = store.get_or_init(Some(chosen)).await;
        assert_eq!(c, chosen);
        assert_eq!(store.len().await, 3);
    }

    #[tokio::test]
    async fn same_id_returns_same_state() {
        let store = SessionStore::new();
        let (id, handle) = store.get_or_init(None).await;
        handle.lock().await.next();

        let (again, handle2) = store.get_or_init(Some(id)).await;
        assert_eq!(again, id);
        assert_eq!(handle2.lock().await.current_index(), 1);
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn idle_sessions_are_evicted_on_next_creation() {
        let ttl = Duration::from_secs(60);
        let store = SessionStore::with_ttl(ttl);
        let t0 = Instant::now();
        for _ in 0..100 {
            store.get_or_init_at(None, t0).await;
        }
        let (old, handle) = store.get_or_init_at(None, t0).await;
        handle.lock().await.next();
        assert_eq!(store.len().await, 101);

        let later = t0 + ttl + Duration::from_secs(1);
        store.get_or_init_at(None, later).await;
        assert_eq!(store.len().await, 1);

        // The expired id comes back as a fresh game.
        let (again, handle) = store.get_or_init_at(Some(old), later).await;
        assert_eq!(again, old);
        assert_eq!(handle.lock().await.current_index(), 0);
        assert_eq!(store.len().await, 2);
    }

    #[tokio::test]
    async fn active_sessions_survive_sweeps() {
        let ttl = Duration::from_secs(60);
        let store = SessionStore::with_ttl(ttl);
        let t0 = Instant::now();
        let (active, handle) = store.get_or_init_at(None, t0).await;
        handle.lock().await.next();
        store.get_or_init_at(None, t0).await;

        // Touching the session refreshes its deadline.
        store.get_or_init_at(Some(active), t0 + Duration::from_secs(50)).await;
        store.get_or_init_at(None, t0 + Duration::from_secs(100)).await;

        assert_eq!(store.len().await, 2);
        let (_, handle) = store.get_or_init_at(Some(active), t0 + Duration::from_secs(100)).await;
        assert_eq!(handle.lock().await.current_index(), 1);
    }
}
