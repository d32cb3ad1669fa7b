//! Core types for Holdout: grid geometry, entities, items, and the world model.
//!
//! Everything here is plain data plus the small amount of behaviour that
//! belongs to a single entity (collision rectangles, loot rolls, inventory
//! bookkeeping). Systems that move things around live in `ho-simulation`.

/// Typed errors for broken static data.
pub mod error;
/// Walls, zombies, players, containers, and the spawn door.
pub mod entity;
/// Points, rectangles, and grid cells.
pub mod geometry;
/// Item catalog, loot tables, and inventories.
pub mod item;
pub mod recipe;
/// Serializable per-tick state broadcast.
pub mod snapshot;
/// The session world aggregate.
pub mod world;

/// Re-export entity types.
pub use entity::{
    Container, ContainerId, Door, Player, PlayerId, Wall, WallMaterial, Zombie, ZombieVariant,
};
/// Re-export error types.
pub use error::{CoreError, CoreResult};
/// Re-export geometry types.
pub use geometry::{Cell, GridSize, Point, Rect, SEGMENT_SIZE};
/// Re-export item types.
pub use item::{Inventory, ItemEffect};
/// Re-export recipe types.
pub use recipe::{Recipe, RecipeBook};
/// Re-export the snapshot type.
pub use snapshot::Snapshot;
/// Re-export the world model.
pub use world::World;
