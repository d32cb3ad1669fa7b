//! Outbound wire messages.

use std::sync::Arc;

use ho_core::{PlayerId, Snapshot};
use serde::{Deserialize, Serialize};

/// A serialized message queued for one connection. Each tick's state is
/// encoded once and shared by every connection of the session.
pub type Outbound = Arc<str>;

/// Messages pushed from a session to its connections.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    /// First message on every connection: the player's identifier.
    Welcome {
        /// Identifier allocated on join.
        #[serde(rename = "playerId")]
        player_id: PlayerId,
    },
    /// Full world state after a tick.
    State(Snapshot),
}

impl ServerMessage {
    /// Encode as JSON text.
    pub fn encode(&self) -> serde_json::Result<Outbound> {
        serde_json::to_string(self).map(Outbound::from)
    }

    /// Decode JSON text, as a client would.
    pub fn decode(text: &str) -> serde_json::Result<Self> {
        serde_json::from_str(text)
    }
}
