//! Zombie pursuit and melee combat.

use std::collections::HashSet;

use ho_core::{Cell, Point, World};
use tracing::debug;

use crate::context::SimContext;
use crate::error::SimResult;
use crate::event::SimEventKind;
use crate::pathfinding::NavGrid;
use crate::system::System;

/// Distance a zombie covers per tick.
pub const ZOMBIE_STEP: f64 = 1.0;
/// Reach of a zombie's attack, center to center.
pub const MELEE_RADIUS: f64 = 20.0;
/// Health removed by one hit.
pub const HIT_DAMAGE: u32 = 1;
/// Ticks a player is immune after taking a hit.
pub const PLAYER_DAMAGE_COOLDOWN: u32 = 30;
/// Ticks a zombie waits between attacks.
pub const ZOMBIE_ATTACK_COOLDOWN: u32 = 60;

/// Moves every zombie toward its nearest player, then resolves melee hits.
///
/// Paths are recomputed from scratch every tick for every zombie, with the
/// other zombies' current cells treated as blocked.
#[derive(Debug, Default)]
pub struct ZombieSystem {
    nav: Option<NavGrid>,
}

impl ZombieSystem {
    /// Create a zombie system. The navigation grid is captured on init.
    pub fn new() -> Self {
        Self::default()
    }

    /// Navigation grid in use, once initialized.
    pub fn nav(&self) -> Option<&NavGrid> {
        self.nav.as_ref()
    }

    fn pursue(nav: &NavGrid, world: &mut World) {
        for idx in 0..world.zombies.len() {
            let origin = world.zombies[idx].position();

            let Some(target) = nearest_player(world, origin) else {
                return;
            };

            let obstacles: HashSet<Cell> = world
                .zombies
                .iter()
                .enumerate()
                .filter(|(other, _)| *other != idx)
                .map(|(_, z)| z.position().cell())
                .collect();

            let path = nav.find_path(origin.cell(), target.cell(), &obstacles);
            let steer_to = match path.get(1) {
                Some(next) => next.center(),
                None => target,
            };

            let dx = steer_to.x - origin.x;
            let dy = steer_to.y - origin.y;
            let dist = dx.hypot(dy);
            if dist == 0.0 {
                continue;
            }

            let (fx, fy) = (dx / dist, dy / dist);
            let candidate = world.clamp(Point::new(
                origin.x + fx * ZOMBIE_STEP,
                origin.y + fy * ZOMBIE_STEP,
            ));
            let blocked = world.hits_wall(candidate);

            let zombie = &mut world.zombies[idx];
            if !blocked {
                zombie.x = candidate.x;
                zombie.y = candidate.y;
            }
            zombie.facing_x = fx;
            zombie.facing_y = fy;
        }
    }

    fn fight(ctx: &mut SimContext<'_>) {
        let world = &mut *ctx.world;

        for zombie in &mut world.zombies {
            zombie.attack_cooldown = zombie.attack_cooldown.saturating_sub(1);
        }
        for (_, player) in world.players_mut() {
            player.damage_cooldown = player.damage_cooldown.saturating_sub(1);
        }

        let ids: Vec<_> = world.players().map(|(id, _)| id).collect();
        let mut hits = Vec::new();
        for idx in 0..world.zombies.len() {
            let origin = world.zombies[idx].position();
            for &id in &ids {
                if world.zombies[idx].attack_cooldown > 0 {
                    break;
                }
                let Some(player) = world.player_mut(id) else {
                    continue;
                };
                if player.position().distance(origin) > MELEE_RADIUS {
                    continue;
                }
                if player.damage_cooldown == 0 {
                    player.health = player.health.saturating_sub(HIT_DAMAGE);
                    player.damage_cooldown = PLAYER_DAMAGE_COOLDOWN;
                    hits.push((id, player.health));
                }
                // Armed per zombie: one hit per pass, whichever player triggered it.
                world.zombies[idx].attack_cooldown = ZOMBIE_ATTACK_COOLDOWN;
            }
        }

        for (player, health) in hits {
            debug!(%player, health, "player hit");
            ctx.emit(
                SimEventKind::PlayerHit { player, health },
                format!("{player} was hit ({health} health left)"),
            );
            if health == 0 {
                ctx.emit(
                    SimEventKind::PlayerDowned { player },
                    format!("{player} went down"),
                );
            }
        }
    }
}

/// Closest player by squared distance. Ties go to the first player in
/// identifier order.
fn nearest_player(world: &World, from: Point) -> Option<Point> {
    let mut best: Option<(f64, Point)> = None;
    for (_, player) in world.players() {
        let pos = player.position();
        let d = pos.distance_sq(from);
        if best.is_none_or(|(bd, _)| d < bd) {
            best = Some((d, pos));
        }
    }
    best.map(|(_, pos)| pos)
}

impl System for ZombieSystem {
    fn name(&self) -> &str {
        "zombies"
    }

    fn init(&mut self, ctx: &mut SimContext<'_>) -> SimResult<()> {
        self.nav = Some(NavGrid::from_world(ctx.world));
        Ok(())
    }

    fn tick(&mut self, ctx: &mut SimContext<'_>) -> SimResult<()> {
        let nav = self
            .nav
            .get_or_insert_with(|| NavGrid::from_world(ctx.world));
        Self::pursue(nav, ctx.world);
        Self::fight(ctx);
        Ok(())
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn std::any::Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::SimClock;
    use crate::event::EventLog;
    use ho_core::{Player, Wall, WallMaterial, Zombie, ZombieVariant};
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn run_tick(system: &mut ZombieSystem, world: &mut World, events: &mut EventLog) {
        let mut clock = SimClock::new(60);
        clock.advance();
        let mut rng = StdRng::seed_from_u64(0);
        let mut ctx = SimContext {
            world,
            clock: &clock,
            events,
            rng: &mut rng,
        };
        system.tick(&mut ctx).unwrap();
    }

    #[test]
    fn zombie_on_player_lands_one_hit() {
        let mut world = World::new(400, 400).unwrap();
        let id = world.add_player(Player::new(100.0, 100.0));
        world
            .zombies
            .push(Zombie::new(100.0, 100.0, ZombieVariant::Normal));
        let mut events = EventLog::new(0);

        run_tick(&mut ZombieSystem::new(), &mut world, &mut events);

        let player = world.player(id).unwrap();
        assert_eq!(player.health, 9);
        assert!(player.damage_cooldown > 0);
        assert!(world.zombies[0].attack_cooldown > 0);
        assert_eq!(events.events_for_player(id).len(), 1);
    }

    #[test]
    fn cooldowns_block_repeat_hits() {
        let mut world = World::new(400, 400).unwrap();
        let id = world.add_player(Player::new(100.0, 100.0));
        world
            .zombies
            .push(Zombie::new(100.0, 100.0, ZombieVariant::Normal));
        let mut system = ZombieSystem::new();
        let mut events = EventLog::new(0);

        for _ in 0..10 {
            run_tick(&mut system, &mut world, &mut events);
        }
        assert_eq!(world.player(id).unwrap().health, 9);
    }

    #[test]
    fn one_zombie_hits_only_one_of_two_players() {
        let mut world = World::new(400, 400).unwrap();
        let a = world.add_player(Player::new(100.0, 100.0));
        let b = world.add_player(Player::new(105.0, 100.0));
        world
            .zombies
            .push(Zombie::new(102.0, 100.0, ZombieVariant::Normal));
        let mut events = EventLog::new(0);

        run_tick(&mut ZombieSystem::new(), &mut world, &mut events);

        let total: u32 = [a, b]
            .iter()
            .map(|id| world.player(*id).unwrap().health)
            .sum();
        assert_eq!(total, 19);
    }

    #[test]
    fn health_floors_at_zero_and_downs_player() {
        let mut world = World::new(400, 400).unwrap();
        let mut p = Player::new(50.0, 50.0);
        p.health = 1;
        let id = world.add_player(p);
        world
            .zombies
            .push(Zombie::new(50.0, 50.0, ZombieVariant::Fire));
        let mut events = EventLog::new(0);

        run_tick(&mut ZombieSystem::new(), &mut world, &mut events);

        assert_eq!(world.player(id).unwrap().health, 0);
        assert!(
            events
                .events()
                .iter()
                .any(|e| e.kind == SimEventKind::PlayerDowned { player: id })
        );
    }

    #[test]
    fn zombie_steps_toward_player() {
        let mut world = World::new(400, 400).unwrap();
        world.add_player(Player::new(300.0, 20.0));
        world
            .zombies
            .push(Zombie::new(20.0, 20.0, ZombieVariant::Normal));

        run_tick(&mut ZombieSystem::new(), &mut world, &mut EventLog::new(0));

        let z = &world.zombies[0];
        assert!((z.x - 21.0).abs() < 1e-9);
        assert!((z.y - 20.0).abs() < 1e-9);
        assert_eq!((z.facing_x, z.facing_y), (1.0, 0.0));
    }

    #[test]
    fn zombie_routes_around_another_zombie() {
        let mut world = World::new(200, 120).unwrap();
        world.add_player(Player::new(180.0, 20.0));
        world
            .zombies
            .push(Zombie::new(20.0, 20.0, ZombieVariant::Normal));
        // Occupies the cell directly east, on the straight corridor.
        world
            .zombies
            .push(Zombie::new(60.0, 20.0, ZombieVariant::Normal));

        run_tick(&mut ZombieSystem::new(), &mut world, &mut EventLog::new(0));

        let z = &world.zombies[0];
        assert!((z.x - 20.0).abs() < 1e-9);
        assert!(z.y > 20.0);
        assert_eq!((z.facing_x, z.facing_y), (0.0, 1.0));
    }

    #[test]
    fn blocked_zombie_still_turns() {
        let mut world = World::new(400, 400).unwrap();
        world.add_wall(Wall::at_cell(Cell::new(1, 0), WallMaterial::Steel));
        // Off-grid target: no path, so the zombie steers straight into the wall.
        world.add_player(Player::new(400.0, 1.0));
        world.zombies.push(Zombie::new(39.5, 1.0, ZombieVariant::Normal));

        run_tick(&mut ZombieSystem::new(), &mut world, &mut EventLog::new(0));

        let z = &world.zombies[0];
        assert_eq!(z.x, 39.5);
        assert_eq!(z.facing_x, 1.0);
    }

    #[test]
    fn no_players_means_no_movement() {
        let mut world = World::new(400, 400).unwrap();
        world
            .zombies
            .push(Zombie::new(20.0, 20.0, ZombieVariant::Normal));
        run_tick(&mut ZombieSystem::new(), &mut world, &mut EventLog::new(0));
        assert_eq!(world.zombies[0].position(), Point::new(20.0, 20.0));
        assert_eq!(world.zombies[0].facing_y, 1.0);
    }
}
