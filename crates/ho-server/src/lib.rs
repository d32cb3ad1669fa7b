//! Session hosting for Holdout.
//!
//! The [`SessionRegistry`] is owned by whoever runs the transport and passed
//! to its handlers. Each [`Session`] serializes ticks, commands, joins, and
//! disconnects behind one lock, and pushes a full state message to every
//! connection after each tick. [`spawn_tick_loop`] drives all sessions at a
//! fixed rate.

/// Tick driver configuration.
pub mod config;
/// Fixed-rate tick task.
pub mod driver;
/// Error types for the server crate.
pub mod error;
/// Outbound wire messages.
pub mod message;
/// Session table.
pub mod registry;
/// A single running session.
pub mod session;

pub use config::DriverConfig;
pub use driver::spawn_tick_loop;
pub use error::{ServerError, ServerResult};
pub use message::{Outbound, ServerMessage};
pub use registry::SessionRegistry;
pub use session::{Connection, Session, SessionId, SessionInfo};
