//! One running session: a simulation plus the connections watching it.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use ho_core::PlayerId;
use ho_simulation::{Command, SimConfig, Simulation};
use serde::{Deserialize, Serialize};
use tokio::sync::{Mutex, mpsc};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::error::{ServerError, ServerResult};
use crate::message::{Outbound, ServerMessage};

/// Unique identifier of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SessionId(pub Uuid);

impl SessionId {
    /// Generate a new random session ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Receiving half handed to the transport for one connection.
pub type Connection = mpsc::UnboundedReceiver<Outbound>;

/// Everything that must change together. Ticks, commands, joins, and
/// disconnects all go through the one lock around this.
#[derive(Debug)]
struct SessionState {
    sim: Simulation,
    connections: BTreeMap<PlayerId, mpsc::UnboundedSender<Outbound>>,
}

/// A live session.
#[derive(Debug)]
pub struct Session {
    id: SessionId,
    created_at: DateTime<Utc>,
    state: Mutex<SessionState>,
}

/// Summary of a session for listings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionInfo {
    /// Session identifier.
    pub id: SessionId,
    /// When the session was created.
    pub created_at: DateTime<Utc>,
    /// Connected players.
    pub players: usize,
    /// Ticks simulated so far.
    pub tick: u64,
}

impl Session {
    /// Generate a world and start a session around it.
    pub fn new(id: SessionId, config: SimConfig) -> ServerResult<Self> {
        let mut sim = Simulation::generate(config)?;
        sim.init()?;
        info!(session = %id, "session created");
        Ok(Self {
            id,
            created_at: Utc::now(),
            state: Mutex::new(SessionState {
                sim,
                connections: BTreeMap::new(),
            }),
        })
    }

    /// Session identifier.
    pub fn id(&self) -> SessionId {
        self.id
    }

    /// Creation time.
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Add a player and open their connection. The welcome message is the
    /// first thing the connection receives.
    pub async fn join(&self) -> ServerResult<(PlayerId, Connection)> {
        let mut state = self.state.lock().await;
        let player = state.sim.join();
        let (tx, rx) = mpsc::unbounded_channel();
        let welcome = ServerMessage::Welcome { player_id: player }.encode()?;
        // Cannot fail: the receiver is still in hand.
        let _ = tx.send(welcome);
        state.connections.insert(player, tx);
        Ok((player, rx))
    }

    /// Decode and apply one inbound message from a player.
    pub async fn handle_message(&self, player: PlayerId, text: &str) -> ServerResult<bool> {
        let command = Command::from_json(text).inspect_err(|e| {
            warn!(session = %self.id, %player, error = %e, "undecodable message");
        })?;
        self.apply(player, command).await
    }

    /// Apply a decoded command.
    pub async fn apply(&self, player: PlayerId, command: Command) -> ServerResult<bool> {
        let mut state = self.state.lock().await;
        if state.sim.world().player(player).is_none() {
            return Err(ServerError::PlayerNotFound {
                session: self.id,
                player,
            });
        }
        Ok(state.sim.apply(player, command))
    }

    /// Remove a player and close their connection.
    pub async fn disconnect(&self, player: PlayerId) -> bool {
        let mut state = self.state.lock().await;
        state.connections.remove(&player);
        state.sim.leave(player)
    }

    /// Advance one tick and push the new state to every connection.
    /// Connections whose receiver is gone are dropped and their players
    /// removed. Returns the number of connections served.
    pub async fn tick(&self) -> ServerResult<usize> {
        let mut state = self.state.lock().await;
        state.sim.tick()?;

        let snapshot = state.sim.snapshot();
        let message = match ServerMessage::State(snapshot).encode() {
            Ok(message) => message,
            Err(e) => {
                warn!(session = %self.id, error = %e, "failed to encode state");
                return Ok(0);
            }
        };

        let mut closed = Vec::new();
        for (player, tx) in &state.connections {
            if tx.send(message.clone()).is_err() {
                closed.push(*player);
            }
        }
        for player in &closed {
            warn!(session = %self.id, %player, "connection closed, removing player");
            state.connections.remove(player);
            state.sim.leave(*player);
        }

        let served = state.connections.len();
        debug!(session = %self.id, tick = state.sim.current_tick(), served, "tick");
        Ok(served)
    }

    /// Number of players in the world.
    pub async fn player_count(&self) -> usize {
        self.state.lock().await.sim.world().player_count()
    }

    /// Listing summary.
    pub async fn info(&self) -> SessionInfo {
        let state = self.state.lock().await;
        SessionInfo {
            id: self.id,
            created_at: self.created_at,
            players: state.sim.world().player_count(),
            tick: state.sim.current_tick(),
        }
    }

    /// Run a closure against the simulation while holding the session lock.
    pub async fn with_simulation<T>(&self, f: impl FnOnce(&mut Simulation) -> T) -> T {
        let mut state = self.state.lock().await;
        f(&mut state.sim)
    }
}
