//! Tick-based session simulation for Holdout.
//!
//! A [`Simulation`] owns one [`ho_core::World`] and advances it one fixed
//! step at a time: zombies chase and hit players, then loot sessions count
//! down and pay out. Player commands are applied between ticks. Nothing in
//! here sleeps or spawns tasks; an external driver decides when to tick.

/// Simulation clock: tick counter and nominal rate.
pub mod clock;
/// Player command wire format and movement rules.
pub mod command;
/// Configuration types for simulation runs.
pub mod config;
/// Mutable context passed to systems each tick.
pub mod context;
/// Crafting and item use.
pub mod crafting;
/// Error types for the simulation crate.
pub mod error;
/// Simulation event types and the event log.
pub mod event;
/// Procedural world generation.
pub mod generator;
/// Loot session state machine.
pub mod looting;
/// Breadth-first pathfinding on the wall grid.
pub mod pathfinding;
/// Top-level simulation orchestrator.
pub mod simulation;
/// The trait that all simulation systems implement.
pub mod system;
/// Zombie pursuit and melee combat.
pub mod zombie;

/// Re-export of [`clock::SimClock`].
pub use clock::SimClock;
/// Re-exports of [`command::Command`] and [`command::Action`].
pub use command::{Action, Command};
/// Re-export of [`config::SimConfig`].
pub use config::SimConfig;
/// Re-export of [`context::SimContext`].
pub use context::SimContext;
/// Re-exports of [`error::SimError`] and [`error::SimResult`].
pub use error::{SimError, SimResult};
/// Re-exports of [`event::EventLog`], [`event::SimEvent`], and [`event::SimEventKind`].
pub use event::{EventLog, SimEvent, SimEventKind};
/// Re-exports of the loot state machine types.
pub use looting::{AbortReason, LootSession, LootSystem, LootTarget};
/// Re-export of [`pathfinding::NavGrid`].
pub use pathfinding::NavGrid;
/// Re-export of [`simulation::Simulation`].
pub use simulation::Simulation;
/// Re-export of [`system::System`].
pub use system::System;
/// Re-export of [`zombie::ZombieSystem`].
pub use zombie::ZombieSystem;
