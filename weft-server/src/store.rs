//! Session store.
//!
//! Sessions are shared as `Arc<Mutex<Session>>`. Holding a session's mutex
//! is what serializes dispatch and rendering for that session; the map's
//! `RwLock` is only held long enough to look an entry up or change the map,
//! so requests for different sessions never wait on each other.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{Mutex, OwnedMutexGuard, RwLock};
use tokio::task::JoinHandle;
use weft_kernel::{Session, SessionConfig, SessionId};

use crate::app::App;
use crate::error::ServerError;

pub struct SessionStore {
    sessions: RwLock<HashMap<SessionId, Arc<Mutex<Session>>>>,
    config: SessionConfig,
}

impl SessionStore {
    pub fn new(config: SessionConfig) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            config,
        }
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Create a session, let `app` build its tree and register it.
    /// Returns the session already locked.
    pub async fn create(&self, app: &dyn App) -> Result<OwnedMutexGuard<Session>, ServerError> {
        let mut session = Session::new(self.config);
        app.build(&mut session)?;
        if session.root().is_none() {
            return Err(ServerError::MissingRoot);
        }

        let id = session.id();
        let shared = Arc::new(Mutex::new(session));
        let guard = Arc::clone(&shared).lock_owned().await;
        self.sessions.write().await.insert(id, shared);
        Ok(guard)
    }

    /// Raw lookup, including expired sessions.
    pub async fn lookup(&self, id: SessionId) -> Option<Arc<Mutex<Session>>> {
        self.sessions.read().await.get(&id).cloned()
    }

    /// Lock a live session. Expired sessions are evicted and reported absent.
    pub async fn acquire(&self, id: SessionId) -> Option<OwnedMutexGuard<Session>> {
        let shared = self.lookup(id).await?;
        let guard = shared.lock_owned().await;
        if guard.is_expired() {
            drop(guard);
            self.remove(id).await;
            tracing::info!(session = %id, "session expired");
            return None;
        }
        Some(guard)
    }

    pub async fn remove(&self, id: SessionId) -> bool {
        self.sessions.write().await.remove(&id).is_some()
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }

    /// Evict expired sessions. Sessions busy with a request are skipped
    /// since they are in use. Returns the number evicted.
    pub async fn reap(&self) -> usize {
        let snapshot: Vec<(SessionId, Arc<Mutex<Session>>)> = self
            .sessions
            .read()
            .await
            .iter()
            .map(|(id, s)| (*id, Arc::clone(s)))
            .collect();

        let expired: Vec<SessionId> = snapshot
            .into_iter()
            .filter(|(_, s)| s.try_lock().is_ok_and(|session| session.is_expired()))
            .map(|(id, _)| id)
            .collect();
        if expired.is_empty() {
            return 0;
        }

        let mut sessions = self.sessions.write().await;
        for id in &expired {
            sessions.remove(id);
        }
        expired.len()
    }

    /// Run [`reap`](Self::reap) every `interval` until the task is aborted.
    pub fn spawn_reaper(self: Arc<Self>, interval: Duration) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                let evicted = self.reap().await;
                if evicted > 0 {
                    let remaining = self.len().await;
                    tracing::info!(evicted, remaining, "reaped expired sessions");
                }
            }
        })
    }
}
