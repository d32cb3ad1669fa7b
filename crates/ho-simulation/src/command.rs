//! Player commands: wire format and movement.

use ho_core::{ContainerId, Player, PlayerId, Point, World};
use serde::{Deserialize, Serialize};

/// Distance covered by one step in a named direction.
pub const DIRECTION_STEP: f64 = 5.0;

/// One inbound player message.
///
/// Facing fields may ride along on any action; each one present overwrites
/// the stored component as-is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Command {
    /// What the player wants to do.
    #[serde(flatten)]
    pub action: Action,
    /// New horizontal facing component.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub facing_x: Option<f64>,
    /// New vertical facing component.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub facing_y: Option<f64>,
}

impl Command {
    /// Wrap an action with no facing update.
    pub fn new(action: Action) -> Self {
        Self {
            action,
            facing_x: None,
            facing_y: None,
        }
    }

    /// Attach a facing vector.
    pub fn with_facing(mut self, x: f64, y: f64) -> Self {
        self.facing_x = Some(x);
        self.facing_y = Some(y);
        self
    }

    /// Decode a JSON message.
    pub fn from_json(text: &str) -> serde_json::Result<Self> {
        serde_json::from_str(text)
    }

    /// Overwrite the player's facing with whichever components are present.
    pub fn apply_facing(&self, player: &mut Player) {
        if let Some(x) = self.facing_x {
            player.facing_x = x;
        }
        if let Some(y) = self.facing_y {
            player.facing_y = y;
        }
    }
}

/// Action tag and its payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Action {
    /// Walk by an explicit delta or one step in a named direction.
    Move {
        /// Horizontal delta.
        #[serde(default, rename = "moveX", skip_serializing_if = "Option::is_none")]
        move_x: Option<f64>,
        /// Vertical delta.
        #[serde(default, rename = "moveY", skip_serializing_if = "Option::is_none")]
        move_y: Option<f64>,
        /// Named direction, used when no delta is given.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        direction: Option<String>,
    },
    /// Begin searching a container, or the nearest shelf if no id is given.
    StartLooting {
        /// Container to search.
        #[serde(default, rename = "containerId", skip_serializing_if = "Option::is_none")]
        container_id: Option<ContainerId>,
    },
    /// Abandon the current search.
    CancelLooting,
    /// Craft a recipe.
    CraftItem {
        /// Recipe identifier.
        item: String,
    },
    /// Use or equip an item.
    UseItem {
        /// Item identifier.
        item: String,
    },
    /// Any tag this server does not understand. Ignored.
    #[serde(other)]
    Unknown,
}

/// Compass directions accepted by `move`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Negative y.
    Up,
    /// Positive y.
    Down,
    /// Negative x.
    Left,
    /// Positive x.
    Right,
}

impl Direction {
    /// Parse a wire name. Unknown names yield `None`.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "up" => Some(Self::Up),
            "down" => Some(Self::Down),
            "left" => Some(Self::Left),
            "right" => Some(Self::Right),
            _ => None,
        }
    }

    /// Displacement of one step.
    pub fn delta(self) -> (f64, f64) {
        match self {
            Self::Up => (0.0, -DIRECTION_STEP),
            Self::Down => (0.0, DIRECTION_STEP),
            Self::Left => (-DIRECTION_STEP, 0.0),
            Self::Right => (DIRECTION_STEP, 0.0),
        }
    }
}

/// Work out the intended displacement of a move. Explicit deltas win over
/// a direction; a missing axis counts as zero.
pub fn resolve_delta(
    move_x: Option<f64>,
    move_y: Option<f64>,
    direction: Option<&str>,
) -> (f64, f64) {
    if move_x.is_some() || move_y.is_some() {
        return (move_x.unwrap_or(0.0), move_y.unwrap_or(0.0));
    }
    direction
        .and_then(Direction::from_name)
        .map_or((0.0, 0.0), Direction::delta)
}

/// Move a player, one axis at a time.
///
/// Each axis is clamped into the world, then kept only if the resulting
/// point is clear of walls, so diagonal input slides along a wall instead
/// of stopping dead. Downed players do not move. Returns `true` if the
/// position changed.
pub fn move_player(world: &mut World, id: PlayerId, dx: f64, dy: f64) -> bool {
    let Some(player) = world.player(id) else {
        return false;
    };
    if !player.is_alive() {
        return false;
    }

    let start = player.position();
    let mut pos = start;

    if dx != 0.0 {
        let x = (pos.x + dx).clamp(0.0, world.width_f());
        if !world.hits_wall(Point::new(x, pos.y)) {
            pos.x = x;
        }
    }
    if dy != 0.0 {
        let y = (pos.y + dy).clamp(0.0, world.height_f());
        if !world.hits_wall(Point::new(pos.x, y)) {
            pos.y = y;
        }
    }

    if pos == start {
        return false;
    }
    if let Some(player) = world.player_mut(id) {
        player.x = pos.x;
        player.y = pos.y;
    }
    true
}
