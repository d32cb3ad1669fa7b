//! The session table owned by the serving layer.

use std::collections::HashMap;
use std::sync::Arc;

use ho_core::PlayerId;
use ho_simulation::SimConfig;
use tokio::sync::RwLock;
use tracing::{info, warn};

use crate::error::{ServerError, ServerResult};
use crate::session::{Connection, Session, SessionId, SessionInfo};

/// All live sessions. Sessions share nothing, so the table lock is only held
/// long enough to look one up; the session's own lock does the rest.
#[derive(Debug)]
pub struct SessionRegistry {
    sessions: RwLock<HashMap<SessionId, Arc<Session>>>,
    config: SimConfig,
}

impl Default for SessionRegistry {
    fn default() -> Self {
        Self::new(SimConfig::default())
    }
}

impl SessionRegistry {
    /// Create an empty registry. New sessions start from `config`, each with
    /// a seed of its own.
    pub fn new(config: SimConfig) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            config,
        }
    }

    /// Create a session with a fresh world.
    pub async fn create(&self) -> ServerResult<SessionId> {
        let id = SessionId::new();
        let (hi, lo) = id.0.as_u64_pair();
        self.create_with(id, self.config.clone().with_seed(hi ^ lo))
            .await
    }

    /// Create a session under a chosen identifier and configuration.
    pub async fn create_with(&self, id: SessionId, config: SimConfig) -> ServerResult<SessionId> {
        let session = Arc::new(Session::new(id, config)?);
        self.sessions.write().await.insert(id, session);
        Ok(id)
    }

    /// Look up a session.
    pub async fn get(&self, id: SessionId) -> ServerResult<Arc<Session>> {
        self.sessions
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or(ServerError::SessionNotFound(id))
    }

    /// Join a session, returning the new player and their connection.
    pub async fn join(&self, id: SessionId) -> ServerResult<(PlayerId, Connection)> {
        self.get(id).await?.join().await
    }

    /// Route one inbound message to its session.
    pub async fn handle_message(
        &self,
        id: SessionId,
        player: PlayerId,
        text: &str,
    ) -> ServerResult<bool> {
        self.get(id).await?.handle_message(player, text).await
    }

    /// Remove a player from a session.
    pub async fn disconnect(&self, id: SessionId, player: PlayerId) -> ServerResult<bool> {
        Ok(self.get(id).await?.disconnect(player).await)
    }

    /// Summaries of every session, oldest first.
    pub async fn list(&self) -> Vec<SessionInfo> {
        let mut infos = Vec::new();
        for session in self.snapshot_sessions().await {
            infos.push(session.info().await);
        }
        infos.sort_by_key(|i| (i.created_at, i.id));
        infos
    }

    /// Drop a session. Returns `false` if it did not exist.
    pub async fn remove(&self, id: SessionId) -> bool {
        self.sessions.write().await.remove(&id).is_some()
    }

    /// Drop every session with no players. Returns how many were removed.
    pub async fn remove_empty(&self) -> usize {
        let mut empty = Vec::new();
        for session in self.snapshot_sessions().await {
            if session.player_count().await == 0 {
                empty.push(session.id());
            }
        }
        let mut sessions = self.sessions.write().await;
        for id in &empty {
            sessions.remove(id);
        }
        if !empty.is_empty() {
            info!(removed = empty.len(), "removed empty sessions");
        }
        empty.len()
    }

    /// Advance every session by one tick. A session that fails is logged and
    /// skipped; the others still tick.
    pub async fn tick_all(&self) -> usize {
        let mut ticked = 0;
        for session in self.snapshot_sessions().await {
            match session.tick().await {
                Ok(_) => ticked += 1,
                Err(e) => warn!(session = %session.id(), error = %e, "tick failed"),
            }
        }
        ticked
    }

    /// Number of sessions.
    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    /// Return `true` if no sessions are registered.
    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }

    async fn snapshot_sessions(&self) -> Vec<Arc<Session>> {
        self.sessions.read().await.values().cloned().collect()
    }
}
