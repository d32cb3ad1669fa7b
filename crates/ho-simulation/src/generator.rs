//! Procedural store layout, door placement, and initial spawns.
//!
//! Every random choice draws from the session RNG, so a seed reproduces the
//! same world. Placement of zombies and containers is rejection-sampled with a
//! bounded number of retries: an entity that cannot find a free spot is
//! dropped rather than stalling session creation.

use std::collections::HashSet;
use std::f64::consts::TAU;

use ho_core::{
    Cell, Container, ContainerId, Door, GridSize, Point, SEGMENT_SIZE, Wall, WallMaterial, World,
    Zombie, ZombieVariant,
};
use rand::Rng;
use tracing::info;

use crate::config::SimConfig;
use crate::error::SimResult;

/// Rejection-sampling attempts per zombie, container, or player spawn.
pub const MAX_PLACEMENT_ATTEMPTS: usize = 20;

/// Minimum spacing between zombies in the initial wave.
pub const ZOMBIE_SPACING: f64 = 10.0;

/// Build a complete world: walls, door, zombie wave, and containers.
pub fn generate_world<R: Rng + ?Sized>(config: &SimConfig, rng: &mut R) -> SimResult<World> {
    let mut world = World::new(config.width, config.height)?;
    world.walls = generate_store_walls(world.grid(), rng);
    let door = place_door(&world, rng);
    world.door = Some(door);
    world.zombies = spawn_zombie_wave(
        &world,
        door,
        config.wave_size,
        config.fire_variant_chance,
        rng,
    );
    world.containers = spawn_containers(&world, config.container_count, rng);

    info!(
        width = world.width,
        height = world.height,
        walls = world.walls.len(),
        zombies = world.zombies.len(),
        containers = world.containers.len(),
        "generated world"
    );
    Ok(world)
}

/// Accumulates wall cells, clamping coordinates into the grid and ignoring
/// cells that are already walled.
struct WallBuilder<'r, R: ?Sized> {
    grid: GridSize,
    cells: HashSet<Cell>,
    walls: Vec<Wall>,
    rng: &'r mut R,
}

impl<R: Rng + ?Sized> WallBuilder<'_, R> {
    fn add(&mut self, gx: i32, gy: i32) {
        let cell = Cell::new(
            gx.clamp(0, self.grid.width - 1),
            gy.clamp(0, self.grid.height - 1),
        );
        if self.cells.insert(cell) {
            let material = WallMaterial::random(&mut *self.rng);
            self.walls.push(Wall::at_cell(cell, material));
        }
    }

    fn vertical(&mut self, gx: i32, gy1: i32, gy2: i32) {
        let gy1 = gy1.clamp(0, self.grid.height - 1);
        let gy2 = gy2.clamp(0, self.grid.height - 1);
        for gy in gy1..=gy2 {
            self.add(gx, gy);
        }
    }

    fn horizontal(&mut self, gy: i32, gx1: i32, gx2: i32) {
        let gx1 = gx1.clamp(0, self.grid.width - 1);
        let gx2 = gx2.clamp(0, self.grid.width - 1);
        for gx in gx1..=gx2 {
            self.add(gx, gy);
        }
    }

    /// Outline a room, leaving a doorway in the middle of its bottom side.
    fn room(&mut self, x: i32, y: i32, w: i32, h: i32) {
        for gx in x..x + w {
            for gy in y..y + h {
                if gx == x + w / 2 && gy == y + h - 1 {
                    continue;
                }
                if gx == x || gx == x + w - 1 || gy == y || gy == y + h - 1 {
                    self.add(gx, gy);
                }
            }
        }
    }
}

/// Generate the hardware-store style maze: aisles of vertical and horizontal
/// shelving, a few shelf blocks, and one or two rooms.
pub fn generate_store_walls<R: Rng + ?Sized>(grid: GridSize, rng: &mut R) -> Vec<Wall> {
    let mut b = WallBuilder {
        grid,
        cells: HashSet::new(),
        walls: Vec::new(),
        rng,
    };
    let (gw, gh) = (grid.width, grid.height);

    let v_spacing = (gw / 4).max(6);
    let v_positions: Vec<i32> = (2..gw - 2).step_by(v_spacing as usize).collect();
    for &gx in &v_positions {
        let mut y = 2;
        while y < gh - 4 {
            let length = 4 + b.rng.random_range(0..=2);
            b.vertical(gx, y, (y + length - 1).min(gh - 4));
            y += length + 3 + b.rng.random_range(0..=1);
        }
    }

    let h_spacing = (gh / 5).max(8);
    for gy in (4..gh - 3).step_by(h_spacing as usize) {
        let mut x = 2;
        while x < gw - 4 {
            let length = 4 + b.rng.random_range(0..=2);
            b.horizontal(gy, x, (x + length - 1).min(gw - 4));
            x += length + 4 + b.rng.random_range(0..=2);
        }
    }

    for &gx in &v_positions {
        if b.rng.random_bool(0.4) {
            let y = 2 + b.rng.random_range(0..=(gh - 8).max(1));
            b.horizontal(y, gx - 1, gx + 1);
            b.horizontal(y + 1, gx - 1, gx + 1);
        }
    }

    let room_count = 1 + b.rng.random_range(0..=1);
    for _ in 0..room_count {
        let rw = (3 + b.rng.random_range(0..=2)).min(gw - 2);
        let rh = (3 + b.rng.random_range(0..=2)).min(gh - 2);
        if rw < 3 || rh < 3 {
            continue;
        }
        let start_x = 1 + b.rng.random_range(0..=gw - rw - 1);
        let start_y = 1 + b.rng.random_range(0..=gh - rh - 1);
        b.room(start_x, start_y, rw, rh);
    }

    b.walls
}

/// Place the spawn door on a random outer edge. Both the door point and the
/// point one cell inside it must be clear of walls; retries until they are.
pub fn place_door<R: Rng + ?Sized>(world: &World, rng: &mut R) -> Door {
    let (w, h) = (world.width_f(), world.height_f());
    loop {
        let (door, inside) = match rng.random_range(0..4) {
            0 => {
                let x = rng.random::<f64>() * w;
                (Point::new(x, 0.0), Point::new(x, SEGMENT_SIZE))
            }
            1 => {
                let x = rng.random::<f64>() * w;
                (Point::new(x, h), Point::new(x, h - SEGMENT_SIZE))
            }
            2 => {
                let y = rng.random::<f64>() * h;
                (Point::new(0.0, y), Point::new(SEGMENT_SIZE, y))
            }
            _ => {
                let y = rng.random::<f64>() * h;
                (Point::new(w, y), Point::new(w - SEGMENT_SIZE, y))
            }
        };
        if !world.hits_wall(door) && !world.hits_wall(inside) {
            return Door {
                x: door.x,
                y: door.y,
            };
        }
    }
}

/// Spawn up to `count` zombies in a ring of half a cell around the door.
/// Positions inside walls or too close to an earlier zombie are rejected;
/// a zombie that finds no spot within the retry budget is skipped.
pub fn spawn_zombie_wave<R: Rng + ?Sized>(
    world: &World,
    door: Door,
    count: usize,
    fire_chance: f64,
    rng: &mut R,
) -> Vec<Zombie> {
    let (w, h) = (world.width_f(), world.height_f());
    let spawn_x = door.x.clamp(1.0, w - 1.0);
    let spawn_y = door.y.clamp(1.0, h - 1.0);
    let mut zombies: Vec<Zombie> = Vec::with_capacity(count);

    for _ in 0..count {
        for _ in 0..=MAX_PLACEMENT_ATTEMPTS {
            let angle = rng.random::<f64>() * TAU;
            let dist = rng.random::<f64>() * (SEGMENT_SIZE / 2.0);
            let pos = Point::new(
                (spawn_x + angle.cos() * dist).clamp(1.0, w - 1.0),
                (spawn_y + angle.sin() * dist).clamp(1.0, h - 1.0),
            );
            let crowded = zombies
                .iter()
                .any(|z| z.position().distance(pos) < ZOMBIE_SPACING);
            if !world.hits_wall(pos) && !crowded {
                let variant = if rng.random_bool(fire_chance.clamp(0.0, 1.0)) {
                    ZombieVariant::Fire
                } else {
                    ZombieVariant::Normal
                };
                zombies.push(Zombie::new(pos.x, pos.y, variant));
                break;
            }
        }
    }
    zombies
}

/// Sample a uniformly random position clear of walls, giving up after the
/// retry budget.
pub fn random_open_position<R: Rng + ?Sized>(world: &World, rng: &mut R) -> Option<Point> {
    (0..=MAX_PLACEMENT_ATTEMPTS).find_map(|_| {
        let p = Point::new(
            rng.random::<f64>() * world.width_f(),
            rng.random::<f64>() * world.height_f(),
        );
        (!world.hits_wall(p)).then_some(p)
    })
}

/// Scatter containers at open positions. Containers that find no spot are skipped.
pub fn spawn_containers<R: Rng + ?Sized>(world: &World, count: usize, rng: &mut R) -> Vec<Container> {
    (0..count)
        .filter_map(|_| {
            let p = random_open_position(world, rng)?;
            Some(Container::new(ContainerId::from_rng(rng), p.x, p.y))
        })
        .collect()
}

/// Pick a spawn point for a joining player: a random open position, or the
/// center of the first free cell when sampling keeps hitting walls.
pub fn player_spawn_point<R: Rng + ?Sized>(world: &World, rng: &mut R) -> Point {
    if let Some(p) = random_open_position(world, rng) {
        return p;
    }
    let grid = world.grid();
    (0..grid.height)
        .flat_map(|y| (0..grid.width).map(move |x| Cell::new(x, y).center()))
        .find(|p| !world.hits_wall(*p))
        .unwrap_or_default()
}
