use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::{debug, info};

use ho_core::{Player, PlayerId, RecipeBook, Snapshot, World};

use crate::clock::SimClock;
use crate::command::{Action, Command, move_player, resolve_delta};
use crate::config::SimConfig;
use crate::context::SimContext;
use crate::crafting;
use crate::error::SimResult;
use crate::event::{EventLog, SimEvent, SimEventKind};
use crate::generator::{generate_world, player_spawn_point};
use crate::looting::LootSystem;
use crate::system::System;
use crate::zombie::ZombieSystem;

/// One session's simulation.
///
/// Owns the world, clock, RNG, event log, recipe book, and the registered
/// systems. Zombies always tick before loot sessions. Commands may arrive
/// between any two ticks; callers serialize access.
pub struct Simulation {
    world: World,
    clock: SimClock,
    rng: StdRng,
    events: EventLog,
    recipes: RecipeBook,
    systems: Vec<Box<dyn System>>,
    initialized: bool,
}

impl std::fmt::Debug for Simulation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Simulation")
            .field("tick", &self.clock.tick())
            .field("players", &self.world.player_count())
            .field("zombies", &self.world.zombies.len())
            .field("systems", &self.systems.len())
            .field("events", &self.events.len())
            .finish()
    }
}

impl Simulation {
    /// Create a simulation around an existing world.
    pub fn new(world: World, config: SimConfig) -> Self {
        let rng = StdRng::seed_from_u64(config.seed);
        Self::from_parts(world, rng, &config)
    }

    /// Generate a fresh world from the configuration and wrap it. The same
    /// RNG stream continues into the simulation, so one seed reproduces both
    /// the layout and every later roll.
    pub fn generate(config: SimConfig) -> SimResult<Self> {
        let mut rng = StdRng::seed_from_u64(config.seed);
        let world = generate_world(&config, &mut rng)?;
        Ok(Self::from_parts(world, rng, &config))
    }

    fn from_parts(world: World, rng: StdRng, config: &SimConfig) -> Self {
        let mut sim = Self {
            world,
            clock: SimClock::new(config.tick_rate),
            rng,
            events: EventLog::new(config.max_events),
            recipes: RecipeBook::standard(),
            systems: Vec::new(),
            initialized: false,
        };
        sim.add_system(ZombieSystem::new());
        sim.add_system(LootSystem::new(config.loot_ticks));
        sim
    }

    /// Replace the recipe book. Takes effect at the next `init`.
    pub fn with_recipes(mut self, recipes: RecipeBook) -> Self {
        self.recipes = recipes;
        self.initialized = false;
        self
    }

    /// Register a system. Systems are ticked in registration order.
    pub fn add_system<S: System + 'static>(&mut self, system: S) {
        self.systems.push(Box::new(system));
    }

    /// Check static data and initialize all registered systems.
    pub fn init(&mut self) -> SimResult<()> {
        if self.initialized {
            return Ok(());
        }
        self.recipes.validate()?;
        for i in 0..self.systems.len() {
            let mut system = std::mem::replace(&mut self.systems[i], Box::new(NoopSystem));
            let mut ctx = SimContext {
                world: &mut self.world,
                clock: &self.clock,
                events: &mut self.events,
                rng: &mut self.rng,
            };
            let result = system.init(&mut ctx);
            self.systems[i] = system;
            result?;
        }
        self.initialized = true;
        Ok(())
    }

    /// Advance the simulation by one tick: zombies, then loot sessions, then
    /// the loot progress view.
    pub fn tick(&mut self) -> SimResult<()> {
        if !self.initialized {
            self.init()?;
        }

        self.clock.advance();

        for i in 0..self.systems.len() {
            let mut system = std::mem::replace(&mut self.systems[i], Box::new(NoopSystem));
            let mut ctx = SimContext {
                world: &mut self.world,
                clock: &self.clock,
                events: &mut self.events,
                rng: &mut self.rng,
            };
            let result = system.tick(&mut ctx);
            self.systems[i] = system;
            result?;
        }

        self.world.loot_progress = self
            .get_system::<LootSystem>()
            .map(LootSystem::progress)
            .unwrap_or_default();
        Ok(())
    }

    /// Advance the simulation by `n` ticks.
    pub fn run(&mut self, n: u64) -> SimResult<()> {
        for _ in 0..n {
            self.tick()?;
        }
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Players
    // -----------------------------------------------------------------------

    /// Add a player at a free spawn point.
    pub fn join(&mut self) -> PlayerId {
        let spawn = player_spawn_point(&self.world, &mut self.rng);
        let id = self.world.add_player(Player::new(spawn.x, spawn.y));
        info!(player = %id, x = spawn.x, y = spawn.y, "player joined");
        self.emit(
            SimEventKind::PlayerJoined { player: id },
            format!("{id} joined"),
        );
        id
    }

    /// Remove a player. Any loot session they had is aborted on the next tick.
    pub fn leave(&mut self, id: PlayerId) -> bool {
        if self.world.remove_player(id).is_none() {
            return false;
        }
        info!(player = %id, "player left");
        self.emit(SimEventKind::PlayerLeft { player: id }, format!("{id} left"));
        true
    }

    /// Apply one player command. Commands from unknown players and commands
    /// that cannot take effect are ignored. Returns `true` if anything changed
    /// beyond the facing vector.
    pub fn apply(&mut self, id: PlayerId, command: Command) -> bool {
        let Some(player) = self.world.player_mut(id) else {
            return false;
        };
        command.apply_facing(player);

        match command.action {
            Action::Move {
                move_x,
                move_y,
                direction,
            } => {
                let (dx, dy) = resolve_delta(move_x, move_y, direction.as_deref());
                move_player(&mut self.world, id, dx, dy)
            }
            Action::StartLooting { container_id } => {
                let Some(loot) = find_system_mut::<LootSystem>(&mut self.systems) else {
                    return false;
                };
                let Some(target) = loot.start(&self.world, id, container_id) else {
                    return false;
                };
                debug!(player = %id, %target, "loot started");
                self.emit(
                    SimEventKind::LootStarted { player: id, target },
                    format!("{id} started searching {target}"),
                );
                true
            }
            Action::CancelLooting => {
                let cancelled = find_system_mut::<LootSystem>(&mut self.systems)
                    .is_some_and(|loot| loot.cancel(id));
                if cancelled {
                    debug!(player = %id, "loot cancelled");
                    self.emit(
                        SimEventKind::LootCancelled { player: id },
                        format!("{id} stopped searching"),
                    );
                }
                cancelled
            }
            Action::CraftItem { item } => self.craft(id, &item),
            Action::UseItem { item } => self.use_item(id, &item),
            Action::Unknown => false,
        }
    }

    /// Craft a recipe for a player. Returns `false`, changing nothing, if the
    /// player, recipe, or ingredients are missing.
    pub fn craft(&mut self, id: PlayerId, recipe: &str) -> bool {
        let Some(player) = self.world.player_mut(id) else {
            return false;
        };
        if !crafting::craft_item(player, &self.recipes, recipe) {
            return false;
        }
        debug!(player = %id, recipe, "item crafted");
        self.emit(
            SimEventKind::ItemCrafted {
                player: id,
                recipe: recipe.to_string(),
            },
            format!("{id} crafted {recipe}"),
        );
        true
    }

    /// Use or equip one unit of an item. Returns `false` if the player holds none.
    pub fn use_item(&mut self, id: PlayerId, item: &str) -> bool {
        let Some(player) = self.world.player_mut(id) else {
            return false;
        };
        if !crafting::use_item(player, item) {
            return false;
        }
        self.emit(
            SimEventKind::ItemUsed {
                player: id,
                item: item.to_string(),
            },
            format!("{id} used {item}"),
        );
        true
    }

    /// Full state after the latest tick.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot::capture(&self.world, self.clock.tick())
    }

    fn emit(&mut self, kind: SimEventKind, description: impl Into<String>) {
        self.events
            .push(SimEvent::new(self.clock.tick(), kind, description));
    }

    // -----------------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------------

    /// The session world.
    pub fn world(&self) -> &World {
        &self.world
    }

    /// The session world, mutably.
    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    /// The session clock.
    pub fn clock(&self) -> &SimClock {
        &self.clock
    }

    /// Events recorded so far.
    pub fn events(&self) -> &EventLog {
        &self.events
    }

    /// Recipes this session crafts from.
    pub fn recipes(&self) -> &RecipeBook {
        &self.recipes
    }

    /// Access a system by downcasting to a concrete type.
    pub fn get_system<T: System + 'static>(&self) -> Option<&T> {
        self.systems
            .iter()
            .find_map(|s| s.as_any().downcast_ref::<T>())
    }

    /// Access a system mutably by downcasting to a concrete type.
    pub fn get_system_mut<T: System + 'static>(&mut self) -> Option<&mut T> {
        find_system_mut(&mut self.systems)
    }

    /// Extract the world, consuming the simulation.
    pub fn into_world(self) -> World {
        self.world
    }

    /// Current tick number.
    pub fn current_tick(&self) -> u64 {
        self.clock.tick()
    }
}

fn find_system_mut<T: System + 'static>(systems: &mut [Box<dyn System>]) -> Option<&mut T> {
    systems
        .iter_mut()
        .find_map(|s| s.as_any_mut().downcast_mut::<T>())
}

/// Placeholder system used during the swap-and-tick pattern.
#[derive(Debug)]
struct NoopSystem;

impl System for NoopSystem {
    fn name(&self) -> &str {
        "noop"
    }
    fn tick(&mut self, _ctx: &mut SimContext<'_>) -> SimResult<()> {
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
    use crate::error::SimError;
    use crate::looting::AbortReason;
    use ho_core::{Container, ContainerId, Recipe, Zombie, ZombieVariant};

    fn empty_sim(loot_ticks: u32) -> Simulation {
        let world = World::new(400, 400).unwrap();
        Simulation::new(world, SimConfig::default().with_loot_ticks(loot_ticks))
    }

    fn place(sim: &mut Simulation, x: f64, y: f64) -> PlayerId {
        let id = sim.join();
        let p = sim.world_mut().player_mut(id).unwrap();
        p.x = x;
        p.y = y;
        id
    }

    #[test]
    fn zombie_and_player_on_same_spot() {
        let mut sim = empty_sim(60);
        let id = place(&mut sim, 100.0, 100.0);
        sim.world_mut()
            .zombies
            .push(Zombie::new(100.0, 100.0, ZombieVariant::Normal));

        sim.tick().unwrap();

        let player = sim.world().player(id).unwrap();
        assert_eq!(player.health, 9);
        assert!(player.damage_cooldown > 0);
        assert!(sim.world().zombies[0].attack_cooldown > 0);
    }

    #[test]
    fn one_tick_loot_of_adjacent_container() {
        let mut sim = empty_sim(1);
        let id = place(&mut sim, 100.0, 100.0);
        let container = ContainerId::from_rng(&mut StdRng::seed_from_u64(5));
        sim.world_mut()
            .containers
            .push(Container::new(container, 100.0, 100.0));

        let cmd = Command::new(Action::StartLooting {
            container_id: Some(container),
        });
        assert!(sim.apply(id, cmd));
        sim.tick().unwrap();

        let c = sim.world().container(container).unwrap();
        assert!(c.opened);
        let item = c.item.clone().unwrap();
        assert!(sim.world().player(id).unwrap().inventory.count(&item) >= 1);
    }

    #[test]
    fn loot_progress_view_tracks_sessions() {
        let mut sim = empty_sim(10);
        let id = place(&mut sim, 100.0, 100.0);
        let container = ContainerId::from_rng(&mut StdRng::seed_from_u64(5));
        sim.world_mut()
            .containers
            .push(Container::new(container, 100.0, 100.0));
        sim.apply(
            id,
            Command::new(Action::StartLooting {
                container_id: Some(container),
            }),
        );

        sim.run(3).unwrap();
        assert_eq!(sim.world().loot_progress.get(&id), Some(&7));
        assert_eq!(sim.snapshot().loot_progress.get(&id), Some(&7));

        assert!(sim.apply(id, Command::new(Action::CancelLooting)));
        sim.tick().unwrap();
        assert!(sim.world().loot_progress.is_empty());
    }

    #[test]
    fn leaving_mid_loot_aborts_session() {
        let mut sim = empty_sim(10);
        let id = place(&mut sim, 100.0, 100.0);
        let container = ContainerId::from_rng(&mut StdRng::seed_from_u64(5));
        sim.world_mut()
            .containers
            .push(Container::new(container, 100.0, 100.0));
        sim.apply(
            id,
            Command::new(Action::StartLooting {
                container_id: Some(container),
            }),
        );

        assert!(sim.leave(id));
        sim.tick().unwrap();

        assert!(!sim.world().container(container).unwrap().opened);
        assert!(sim.events().events().iter().any(|e| e.kind
            == SimEventKind::LootAborted {
                player: id,
                reason: AbortReason::PlayerGone,
            }));
        assert!(!sim.leave(id));
    }

    #[test]
    fn cancel_without_session_is_noop() {
        let mut sim = empty_sim(10);
        let id = place(&mut sim, 100.0, 100.0);
        let before = sim.events().len();
        assert!(!sim.apply(id, Command::new(Action::CancelLooting)));
        assert_eq!(sim.events().len(), before);
    }

    #[test]
    fn craft_and_use_through_commands() {
        let mut sim = empty_sim(10);
        let id = place(&mut sim, 100.0, 100.0);
        {
            let inv = &mut sim.world_mut().player_mut(id).unwrap().inventory;
            inv.add("wood_planks", 3);
            inv.add("nails", 2);
        }

        let craft = Command::from_json(r#"{"action":"craft_item","item":"bow"}"#).unwrap();
        assert!(sim.apply(id, craft));
        let equip = Command::from_json(r#"{"action":"use_item","item":"bow"}"#).unwrap();
        assert!(sim.apply(id, equip));

        let p = sim.world().player(id).unwrap();
        assert_eq!(p.weapon.as_deref(), Some("bow"));
        assert!(p.inventory.is_empty());
    }

    #[test]
    fn commands_for_unknown_players_are_ignored() {
        let mut sim = empty_sim(10);
        let ghost = PlayerId::new();
        let cmd = Command::from_json(r#"{"action":"move","moveX":5}"#).unwrap();
        assert!(!sim.apply(ghost, cmd));
        assert!(!sim.craft(ghost, "bow"));
        assert!(!sim.use_item(ghost, "medkit"));
    }

    #[test]
    fn facing_updates_even_for_ignored_actions() {
        let mut sim = empty_sim(10);
        let id = place(&mut sim, 100.0, 100.0);
        let cmd = Command::from_json(r#"{"action":"wave","facingX":-1,"facingY":0}"#).unwrap();
        assert!(!sim.apply(id, cmd));
        let p = sim.world().player(id).unwrap();
        assert_eq!((p.facing_x, p.facing_y), (-1.0, 0.0));
    }

    #[test]
    fn bad_recipe_data_fails_init() {
        let book = RecipeBook::from_recipes(vec![Recipe::simple(
            "mystery",
            &[("unobtainium", 1)],
        )]);
        let mut sim = empty_sim(10).with_recipes(book);
        assert!(matches!(sim.tick(), Err(SimError::InconsistentData(_))));
        assert_eq!(sim.current_tick(), 0);
    }

    #[test]
    fn generated_sessions_are_reproducible() {
        let config = SimConfig::default().with_seed(99);
        let mut a = Simulation::generate(config.clone()).unwrap();
        let mut b = Simulation::generate(config).unwrap();
        let id = PlayerId(Default::default());
        a.world_mut().insert_player(id, Player::new(600.0, 600.0));
        b.world_mut().insert_player(id, Player::new(600.0, 600.0));
        a.run(30).unwrap();
        b.run(30).unwrap();
        assert_eq!(a.snapshot(), b.snapshot());
        assert_eq!(a.clock().tick(), 30);
    }

    #[test]
    fn systems_are_reachable_by_type() {
        let mut sim = empty_sim(10);
        sim.init().unwrap();
        assert!(sim.get_system::<ZombieSystem>().unwrap().nav().is_some());
        assert_eq!(sim.get_system_mut::<LootSystem>().unwrap().loot_ticks(), 10);
    }
}
