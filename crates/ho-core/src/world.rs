use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::entity::{Container, ContainerId, Door, Player, PlayerId, Wall, Zombie};
use crate::error::{CoreError, CoreResult};
use crate::geometry::{Cell, GridSize, Point};

/// Default world width in world units.
pub const DEFAULT_WIDTH: u32 = 2400;
/// Default world height in world units.
pub const DEFAULT_HEIGHT: u32 = 1600;

/// The complete state of one session: layout, zombies, players, containers.
///
/// The layout (walls and door) is fixed once generated; only hit points and
/// opened flags change afterwards. Players are keyed in a sorted map so every
/// pass over them visits the same order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct World {
    /// Width in world units.
    pub width: u32,
    /// Height in world units.
    pub height: u32,
    /// Wall segments, in generation order.
    pub walls: Vec<Wall>,
    /// Zombies, in spawn order.
    pub zombies: Vec<Zombie>,
    /// Lootable containers.
    pub containers: Vec<Container>,
    /// Spawn door, if one has been placed.
    pub door: Option<Door>,
    players: BTreeMap<PlayerId, Player>,
    /// Remaining loot ticks per player with an active loot session.
    pub loot_progress: BTreeMap<PlayerId, u32>,
}

impl World {
    /// Create an empty world. Fails if it cannot hold a single grid cell.
    pub fn new(width: u32, height: u32) -> CoreResult<Self> {
        let grid = GridSize::for_world(width, height);
        if grid.width < 1 || grid.height < 1 {
            return Err(CoreError::WorldTooSmall { width, height });
        }
        Ok(Self {
            width,
            height,
            walls: Vec::new(),
            zombies: Vec::new(),
            containers: Vec::new(),
            door: None,
            players: BTreeMap::new(),
            loot_progress: BTreeMap::new(),
        })
    }

    /// Grid dimensions in cells.
    pub fn grid(&self) -> GridSize {
        GridSize::for_world(self.width, self.height)
    }

    /// Width as a float, for coordinate math.
    pub fn width_f(&self) -> f64 {
        f64::from(self.width)
    }

    /// Height as a float, for coordinate math.
    pub fn height_f(&self) -> f64 {
        f64::from(self.height)
    }

    /// Return `true` if the point lies within the world bounds (inclusive).
    pub fn in_bounds(&self, p: Point) -> bool {
        (0.0..=self.width_f()).contains(&p.x) && (0.0..=self.height_f()).contains(&p.y)
    }

    /// Clamp a point into the world bounds.
    pub fn clamp(&self, p: Point) -> Point {
        Point::new(p.x.clamp(0.0, self.width_f()), p.y.clamp(0.0, self.height_f()))
    }

    /// Return `true` if the point touches any wall.
    pub fn hits_wall(&self, p: Point) -> bool {
        self.walls.iter().any(|w| w.overlaps(p))
    }

    /// Cells occupied by walls.
    pub fn wall_cells(&self) -> HashSet<Cell> {
        self.walls.iter().map(Wall::cell).collect()
    }

    /// Add a wall filling a cell.
    pub fn add_wall(&mut self, wall: Wall) {
        self.walls.push(wall);
    }

    // -----------------------------------------------------------------------
    // Players
    // -----------------------------------------------------------------------

    /// Insert a player under a fresh identifier.
    pub fn add_player(&mut self, player: Player) -> PlayerId {
        let id = PlayerId::new();
        self.players.insert(id, player);
        id
    }

    /// Insert a player under a caller-chosen identifier, replacing any existing one.
    pub fn insert_player(&mut self, id: PlayerId, player: Player) {
        self.players.insert(id, player);
    }

    /// Remove a player. Returns the removed state, if the player existed.
    pub fn remove_player(&mut self, id: PlayerId) -> Option<Player> {
        self.loot_progress.remove(&id);
        self.players.remove(&id)
    }

    /// Look up a player.
    pub fn player(&self, id: PlayerId) -> Option<&Player> {
        self.players.get(&id)
    }

    /// Look up a player mutably.
    pub fn player_mut(&mut self, id: PlayerId) -> Option<&mut Player> {
        self.players.get_mut(&id)
    }

    /// All players in identifier order.
    pub fn players(&self) -> impl Iterator<Item = (PlayerId, &Player)> {
        self.players.iter().map(|(id, p)| (*id, p))
    }

    /// All players mutably, in identifier order.
    pub fn players_mut(&mut self) -> impl Iterator<Item = (PlayerId, &mut Player)> {
        self.players.iter_mut().map(|(id, p)| (*id, p))
    }

    /// Number of connected players.
    pub fn player_count(&self) -> usize {
        self.players.len()
    }

    // -----------------------------------------------------------------------
    // Containers
    // -----------------------------------------------------------------------

    /// Find a container by identifier.
    pub fn container(&self, id: ContainerId) -> Option<&Container> {
        self.containers.iter().find(|c| c.id == id)
    }

    /// Find a container by identifier, mutably.
    pub fn container_mut(&mut self, id: ContainerId) -> Option<&mut Container> {
        self.containers.iter_mut().find(|c| c.id == id)
    }
}
