pub mod layer;

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use tokio::sync::Mutex;
use tracing::debug;
use uuid::Uuid;

pub use layer::{session_layer, ClientSession, SESSION_COOKIE};

pub const DEFAULT_SESSION_TTL: Duration = Duration::from_secs(24 * 60 * 60);
const MAX_SESSIONS: u64 = 100_000;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionState {
    /// `None` until the first article view in this session.
    pub pageviews_remaining: Option<i64>,
}

/// The mutex is the critical section for every read-modify-write of a session.
pub type SessionHandle = Arc<Mutex<SessionState>>;

#[derive(Clone)]
pub struct SessionStore {
    sessions: Cache<Uuid, SessionHandle>,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new(DEFAULT_SESSION_TTL)
    }
}

impl SessionStore {
    /// Sessions idle for longer than `ttl` are dropped along with their quota.
    pub fn new(ttl: Duration) -> Self {
        let sessions = Cache::builder()
            .max_capacity(MAX_SESSIONS)
            .time_to_idle(ttl)
            .build();

        Self { sessions }
    }

    pub async fn get(&self, id: &Uuid) -> Option<SessionHandle> {
        self.sessions.get(id).await
    }

    pub async fn create(&self) -> (Uuid, SessionHandle) {
        let id = Uuid::new_v4();
        let handle = SessionHandle::default();
        self.sessions.insert(id, Arc::clone(&handle)).await;

        debug!("Created session {}", id);
        (id, handle)
    }

    /// Snapshot of a session's state, for inspection outside the request path.
    pub async fn state(&self, id: &Uuid) -> Option<SessionState> {
        let handle = self.get(id).await?;
        let state = handle.lock().await;
        Some(state.clone())
    }

}
