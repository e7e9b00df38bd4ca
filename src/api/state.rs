use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::services::{
    stores::{CatalogStore, ContentStore, MemoryStore},
    HistoryDispatcher, HistoryWriterHandle, MixerSession, RecommendationEngine, SubmissionSink,
};

/// Lifetime of a mixer session unless overridden with `with_session_ttl`
pub const DEFAULT_SESSION_TTL: Duration = Duration::from_secs(3600);

/// Shared application state. Every collaborator is injected, nothing is global.
#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<dyn CatalogStore>,
    pub content: Arc<dyn ContentStore>,
    pub history: Arc<dyn SubmissionSink>,
    pub engine: RecommendationEngine,
    pub sessions: Arc<RwLock<HashMap<Uuid, MixerSession>>>,
    pub session_ttl: Duration,
}

impl AppState {
    pub fn new(
        catalog: Arc<dyn CatalogStore>,
        content: Arc<dyn ContentStore>,
        history: Arc<dyn SubmissionSink>,
        engine: RecommendationEngine,
    ) -> Self {
        Self {
            catalog,
            content,
            history,
            engine,
            sessions: Arc::new(RwLock::new(HashMap::new())),
            session_ttl: DEFAULT_SESSION_TTL,
        }
    }

    pub fn with_session_ttl(mut self, session_ttl: Duration) -> Self {
        self.session_ttl = session_ttl;
        self
    }

    /// State backed entirely by one in-memory store. Must be called inside a tokio runtime.
    pub fn in_memory(
        store: MemoryStore,
        engine: RecommendationEngine,
    ) -> (Self, HistoryWriterHandle) {
        let (dispatcher, handle) = HistoryDispatcher::spawn(Arc::new(store.clone()));
        let state = Self::new(
            Arc::new(store.clone()),
            Arc::new(store),
            Arc::new(dispatcher),
            engine,
        );
        (state, handle)
    }

    /// Drops sessions that have outlived `session_ttl` at `now`, returning how many were removed
    pub async fn prune_expired_sessions(&self, now: DateTime<Utc>) -> usize {
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, session| !session.is_expired(now, self.session_ttl));
        before - sessions.len()
    }
}
