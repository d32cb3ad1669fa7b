use std::fmt;

use rand::Rng;
use rand::seq::IndexedRandom;
use serde::{Deserialize, Serialize};
use uuid::{Builder, Uuid};

use crate::geometry::{Cell, Point, Rect, SEGMENT_SIZE};
use crate::item::{Inventory, roll_container_loot, roll_shelf_loot};

/// Starting and maximum health of a player.
pub const PLAYER_MAX_HEALTH: u32 = 10;

/// Starting health of a zombie. Nothing reduces it yet.
pub const ZOMBIE_MAX_HEALTH: u32 = 2;

/// Unique identifier of a connected player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PlayerId(pub Uuid);

impl PlayerId {
    /// Generate a new random player ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for PlayerId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", &self.0.to_string()[..8])
    }
}

/// Stable identifier of a lootable container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ContainerId(pub Uuid);

impl ContainerId {
    /// Derive an ID from the session RNG so a seed reproduces the whole world.
    pub fn from_rng<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self(Builder::from_random_bytes(rng.random()).into_uuid())
    }
}

impl fmt::Display for ContainerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", &self.0.to_string()[..8])
    }
}

/// What a wall segment is made of.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WallMaterial {
    /// Sturdiest material.
    Steel,
    /// Wooden shelving.
    Wood,
    /// Flimsy plastic racks.
    Plastic,
}

impl WallMaterial {
    /// All materials, in catalog order.
    pub const ALL: [WallMaterial; 3] = [Self::Steel, Self::Wood, Self::Plastic];

    /// Hit points a fresh wall of this material starts with.
    pub fn hit_points(self) -> u32 {
        match self {
            Self::Steel => 30,
            Self::Wood => 20,
            Self::Plastic => 10,
        }
    }

    /// Pick a material uniformly.
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        *Self::ALL.choose(rng).unwrap_or(&Self::Wood)
    }
}

impl fmt::Display for WallMaterial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Steel => write!(f, "steel"),
            Self::Wood => write!(f, "wood"),
            Self::Plastic => write!(f, "plastic"),
        }
    }
}

/// One grid-aligned wall segment. Walls double as searchable shelves.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Wall {
    /// Left edge in world units.
    pub x: f64,
    /// Top edge in world units.
    pub y: f64,
    /// Edge length (always one cell).
    pub size: f64,
    /// Construction material.
    pub material: WallMaterial,
    /// Current hit points.
    pub hp: u32,
    /// Hit points when built.
    pub max_hp: u32,
    /// Whether the shelf has been searched.
    pub opened: bool,
    /// What the search turned up, if anything.
    pub item: Option<String>,
}

impl Wall {
    /// Build a wall filling the given grid cell.
    pub fn at_cell(cell: Cell, material: WallMaterial) -> Self {
        let hp = material.hit_points();
        Self {
            x: f64::from(cell.x) * SEGMENT_SIZE,
            y: f64::from(cell.y) * SEGMENT_SIZE,
            size: SEGMENT_SIZE,
            material,
            hp,
            max_hp: hp,
            opened: false,
            item: None,
        }
    }

    /// Collision rectangle.
    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.size, self.size)
    }

    /// Grid cell this wall occupies.
    pub fn cell(&self) -> Cell {
        Point::new(self.x, self.y).cell()
    }

    /// Return `true` if the point touches the wall.
    pub fn overlaps(&self, p: Point) -> bool {
        self.rect().contains(p)
    }

    /// Mark the shelf searched and roll its contents. The wall is opened
    /// whether or not anything turns up.
    pub fn open<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Option<String> {
        self.opened = true;
        self.item = roll_shelf_loot(rng);
        self.item.clone()
    }
}

/// Zombie flavour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ZombieVariant {
    /// Plain shambler.
    Normal,
    /// Burning variant.
    Fire,
}

/// An AI-controlled zombie.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Zombie {
    /// Horizontal position.
    pub x: f64,
    /// Vertical position.
    pub y: f64,
    /// Horizontal component of the facing direction.
    pub facing_x: f64,
    /// Vertical component of the facing direction.
    pub facing_y: f64,
    /// Remaining health.
    pub health: u32,
    /// Ticks until the zombie may attack again.
    pub attack_cooldown: u32,
    /// Flavour tag.
    pub variant: ZombieVariant,
}

impl Zombie {
    /// Spawn a zombie at the given position.
    pub fn new(x: f64, y: f64, variant: ZombieVariant) -> Self {
        Self {
            x,
            y,
            facing_x: 0.0,
            facing_y: 1.0,
            health: ZOMBIE_MAX_HEALTH,
            attack_cooldown: 0,
            variant,
        }
    }

    /// Current position.
    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }
}

/// A connected player.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    /// Horizontal position.
    pub x: f64,
    /// Vertical position.
    pub y: f64,
    /// Horizontal component of the facing direction, as sent by the client.
    pub facing_x: f64,
    /// Vertical component of the facing direction, as sent by the client.
    pub facing_y: f64,
    /// Remaining health; zero means the player is down.
    pub health: u32,
    /// Ticks of invulnerability left after being hit.
    pub damage_cooldown: u32,
    /// Equipped item, if any.
    pub weapon: Option<String>,
    /// Fire mutation serums consumed.
    pub fire_mutation_points: u32,
    /// Carried items.
    pub inventory: Inventory,
}

impl Player {
    /// Create a fresh player at the given position.
    pub fn new(x: f64, y: f64) -> Self {
        Self {
            x,
            y,
            facing_x: 1.0,
            facing_y: 0.0,
            health: PLAYER_MAX_HEALTH,
            damage_cooldown: 0,
            weapon: None,
            fire_mutation_points: 0,
            inventory: Inventory::new(),
        }
    }

    /// Current position.
    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }

    /// Return `true` while the player has health left.
    pub fn is_alive(&self) -> bool {
        self.health > 0
    }
}

/// A searchable container such as a cardboard box.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Container {
    /// Stable identifier.
    pub id: ContainerId,
    /// Horizontal position.
    pub x: f64,
    /// Vertical position.
    pub y: f64,
    /// Whether the container has been searched.
    pub opened: bool,
    /// What the search turned up.
    pub item: Option<String>,
    /// Container kind, used by clients for rendering.
    #[serde(rename = "type")]
    pub kind: String,
}

impl Container {
    /// Place an unopened cardboard box.
    pub fn new(id: ContainerId, x: f64, y: f64) -> Self {
        Self {
            id,
            x,
            y,
            opened: false,
            item: None,
            kind: "cardboard_box".to_string(),
        }
    }

    /// Current position.
    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }

    /// Mark the container searched and roll its contents. Containers always
    /// yield something.
    pub fn open<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Option<String> {
        self.opened = true;
        self.item = roll_container_loot(rng);
        self.item.clone()
    }
}

/// The spawn door zombies pour in through.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Door {
    /// Horizontal position.
    pub x: f64,
    /// Vertical position.
    pub y: f64,
}

impl Door {
    /// Current position.
    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }
}
