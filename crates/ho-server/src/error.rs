use ho_core::PlayerId;
use ho_simulation::SimError;

use crate::session::SessionId;

/// Alias for `Result<T, ServerError>`.
pub type ServerResult<T> = Result<T, ServerError>;

/// Failures the transport layer has to turn into client-visible rejections.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// No session is registered under this identifier.
    #[error("session not found: {0}")]
    SessionNotFound(SessionId),

    /// The player is not part of the session.
    #[error("player {player} not found in session {session}")]
    PlayerNotFound {
        /// Session that was addressed.
        session: SessionId,
        /// Player that was addressed.
        player: PlayerId,
    },

    /// An inbound message could not be decoded as a command.
    #[error("invalid message: {0}")]
    InvalidMessage(#[from] serde_json::Error),

    /// A configuration value could not be used.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// The session's simulation hit an internal inconsistency.
    #[error(transparent)]
    Simulation(#[from] SimError),
}
