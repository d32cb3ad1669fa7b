//! Full-state snapshot pushed to every connection once per tick.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::entity::{Container, Door, Player, PlayerId, Wall, Zombie};
use crate::world::World;

/// Everything a client needs to render one tick. There is no delta encoding;
/// each snapshot stands alone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Tick the snapshot was taken after.
    pub tick: u64,
    /// World width in world units.
    pub width: u32,
    /// World height in world units.
    pub height: u32,
    /// Connected players keyed by identifier.
    pub players: BTreeMap<PlayerId, Player>,
    /// Zombies in spawn order.
    pub zombies: Vec<Zombie>,
    /// Wall segments.
    pub walls: Vec<Wall>,
    /// Containers.
    pub containers: Vec<Container>,
    /// Spawn door.
    pub door: Option<Door>,
    /// Remaining loot ticks for each player currently looting.
    pub loot_progress: BTreeMap<PlayerId, u32>,
}

impl Snapshot {
    /// Copy the current state of a world.
    pub fn capture(world: &World, tick: u64) -> Self {
        Self {
            tick,
            width: world.width,
            height: world.height,
            players: world.players().map(|(id, p)| (id, p.clone())).collect(),
            zombies: world.zombies.clone(),
            walls: world.walls.clone(),
            containers: world.containers.clone(),
            door: world.door,
            loot_progress: world.loot_progress.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::{WallMaterial, ZombieVariant};
    use crate::geometry::Cell;

    #[test]
    fn snapshot_serializes_wire_field_names() {
        let mut world = World::new(120, 80).unwrap();
        world.add_wall(Wall::at_cell(Cell::new(1, 0), WallMaterial::Plastic));
        world.zombies.push(Zombie::new(10.0, 10.0, ZombieVariant::Fire));
        world.door = Some(Door { x: 0.0, y: 40.0 });
        let id = world.add_player(Player::new(5.0, 5.0));
        world.loot_progress.insert(id, 12);

        let json = serde_json::to_value(Snapshot::capture(&world, 3)).unwrap();
        assert_eq!(json["tick"], 3);
        assert_eq!(json["width"], 120);
        assert_eq!(json["walls"][0]["material"], "plastic");
        assert_eq!(json["walls"][0]["max_hp"], 10);
        assert_eq!(json["zombies"][0]["variant"], "fire");
        assert_eq!(json["door"]["y"], 40.0);
        let key = id.0.to_string();
        assert_eq!(json["players"][&key]["health"], 10);
        assert_eq!(json["loot_progress"][&key], 12);
    }
}
