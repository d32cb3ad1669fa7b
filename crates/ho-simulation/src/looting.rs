//! Timed searches of containers and shelves.
//!
//! A loot session is *active* from the moment a player starts searching until
//! it completes, is cancelled, or is aborted because the target was opened by
//! someone else, the player left, or the player walked out of range. Each
//! player has at most one session; starting another replaces the first.

use std::collections::BTreeMap;
use std::fmt;

use ho_core::{ContainerId, Point, PlayerId, World};
use rand::Rng;
use tracing::debug;

use crate::context::SimContext;
use crate::error::SimResult;
use crate::event::SimEventKind;
use crate::system::System;

/// Maximum distance at which a player can search a target.
pub const INTERACTION_RADIUS: f64 = 40.0;

/// Something a player can search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LootTarget {
    /// A container, by identifier.
    Container(ContainerId),
    /// A shelf, by index into the world's wall list.
    Wall(usize),
}

impl LootTarget {
    /// Resolve what a player standing at `from` would search.
    ///
    /// With a container id, that container is chosen if it is unopened and
    /// its center lies within reach. Without one, the first unopened wall in
    /// list order whose nearest edge lies within reach is chosen.
    pub fn find(world: &World, from: Point, container: Option<ContainerId>) -> Option<Self> {
        match container {
            Some(id) => world
                .container(id)
                .filter(|c| !c.opened && c.position().distance(from) <= INTERACTION_RADIUS)
                .map(|_| Self::Container(id)),
            None => world
                .walls
                .iter()
                .position(|w| !w.opened && w.rect().edge_distance(from) <= INTERACTION_RADIUS)
                .map(Self::Wall),
        }
    }

    /// Whether the target has already been searched. A target that no longer
    /// exists counts as opened.
    pub fn is_opened(self, world: &World) -> bool {
        match self {
            Self::Container(id) => world.container(id).is_none_or(|c| c.opened),
            Self::Wall(idx) => world.walls.get(idx).is_none_or(|w| w.opened),
        }
    }

    /// Whether a player at `from` is close enough to keep searching.
    pub fn in_range(self, world: &World, from: Point) -> bool {
        match self {
            Self::Container(id) => world
                .container(id)
                .is_some_and(|c| c.position().distance(from) <= INTERACTION_RADIUS),
            Self::Wall(idx) => world
                .walls
                .get(idx)
                .is_some_and(|w| w.rect().edge_distance(from) <= INTERACTION_RADIUS),
        }
    }

    /// Mark the target opened and roll its contents.
    pub fn open<R: Rng + ?Sized>(self, world: &mut World, rng: &mut R) -> Option<String> {
        match self {
            Self::Container(id) => world.container_mut(id).and_then(|c| c.open(rng)),
            Self::Wall(idx) => world.walls.get_mut(idx).and_then(|w| w.open(rng)),
        }
    }
}

impl fmt::Display for LootTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Container(id) => write!(f, "container {id}"),
            Self::Wall(idx) => write!(f, "shelf #{idx}"),
        }
    }
}

/// Why an active session was dropped without reward.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AbortReason {
    /// The target was opened before the countdown finished.
    TargetOpened,
    /// The player disconnected.
    PlayerGone,
    /// The player moved out of reach.
    OutOfRange,
}

impl fmt::Display for AbortReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TargetOpened => write!(f, "target already opened"),
            Self::PlayerGone => write!(f, "player gone"),
            Self::OutOfRange => write!(f, "out of range"),
        }
    }
}

/// One player's active search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LootSession {
    /// The searching player.
    pub player: PlayerId,
    /// What is being searched.
    pub target: LootTarget,
    /// Ticks left before the target opens.
    pub remaining: u32,
}

enum Step {
    Pending,
    Aborted(AbortReason),
    Completed(Option<String>),
}

/// Counts down active loot sessions and pays out finished ones.
#[derive(Debug)]
pub struct LootSystem {
    sessions: BTreeMap<PlayerId, LootSession>,
    loot_ticks: u32,
}

impl LootSystem {
    /// Create a loot system whose sessions last `loot_ticks` ticks.
    pub fn new(loot_ticks: u32) -> Self {
        Self {
            sessions: BTreeMap::new(),
            loot_ticks: loot_ticks.max(1),
        }
    }

    /// Countdown length for new sessions.
    pub fn loot_ticks(&self) -> u32 {
        self.loot_ticks
    }

    /// Begin a search for `player`, replacing any session already running.
    ///
    /// Returns the chosen target, or `None` (leaving any existing session
    /// alone) if the player is unknown or nothing is in reach.
    pub fn start(
        &mut self,
        world: &World,
        player: PlayerId,
        container: Option<ContainerId>,
    ) -> Option<LootTarget> {
        let from = world.player(player)?.position();
        let target = LootTarget::find(world, from, container)?;
        self.sessions.insert(
            player,
            LootSession {
                player,
                target,
                remaining: self.loot_ticks,
            },
        );
        Some(target)
    }

    /// Drop the player's session. Returns `false` if there was none.
    pub fn cancel(&mut self, player: PlayerId) -> bool {
        self.sessions.remove(&player).is_some()
    }

    /// The player's active session, if any.
    pub fn session(&self, player: PlayerId) -> Option<&LootSession> {
        self.sessions.get(&player)
    }

    /// Number of active sessions.
    pub fn active_count(&self) -> usize {
        self.sessions.len()
    }

    /// Remaining ticks for every active session, keyed by player.
    pub fn progress(&self) -> BTreeMap<PlayerId, u32> {
        self.sessions
            .iter()
            .map(|(id, s)| (*id, s.remaining))
            .collect()
    }

    fn step(session: &mut LootSession, ctx: &mut SimContext<'_>) -> Step {
        if session.target.is_opened(ctx.world) {
            return Step::Aborted(AbortReason::TargetOpened);
        }
        let Some(player) = ctx.world.player(session.player) else {
            return Step::Aborted(AbortReason::PlayerGone);
        };
        if !session.target.in_range(ctx.world, player.position()) {
            return Step::Aborted(AbortReason::OutOfRange);
        }

        session.remaining = session.remaining.saturating_sub(1);
        if session.remaining > 0 {
            return Step::Pending;
        }

        let item = session.target.open(ctx.world, ctx.rng);
        if let (Some(item), Some(player)) = (&item, ctx.world.player_mut(session.player)) {
            player.inventory.add(item.clone(), 1);
        }
        Step::Completed(item)
    }
}

impl System for LootSystem {
    fn name(&self) -> &str {
        "looting"
    }

    fn tick(&mut self, ctx: &mut SimContext<'_>) -> SimResult<()> {
        let mut finished = Vec::new();

        for (id, session) in &mut self.sessions {
            match Self::step(session, ctx) {
                Step::Pending => {}
                Step::Aborted(reason) => {
                    debug!(player = %id, %reason, "loot aborted");
                    ctx.emit(
                        SimEventKind::LootAborted {
                            player: *id,
                            reason,
                        },
                        format!("{id} stopped searching {}: {reason}", session.target),
                    );
                    finished.push(*id);
                }
                Step::Completed(item) => {
                    debug!(player = %id, target = %session.target, ?item, "loot completed");
                    let found = item.as_deref().unwrap_or("nothing").to_string();
                    ctx.emit(
                        SimEventKind::LootCompleted {
                            player: *id,
                            target: session.target,
                            item,
                        },
                        format!("{id} searched {} and found {found}", session.target),
                    );
                    finished.push(*id);
                }
            }
        }

        for id in finished {
            self.sessions.remove(&id);
        }
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
    use ho_core::{Cell, Container, Player, Wall, WallMaterial};
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    struct Harness {
        world: World,
        events: EventLog,
        rng: StdRng,
        clock: SimClock,
    }

    impl Harness {
        fn new() -> Self {
            Self {
                world: World::new(400, 400).unwrap(),
                events: EventLog::new(0),
                rng: StdRng::seed_from_u64(11),
                clock: SimClock::new(60),
            }
        }

        fn container_at(&mut self, x: f64, y: f64) -> ContainerId {
            let id = ContainerId::from_rng(&mut self.rng);
            self.world.containers.push(Container::new(id, x, y));
            id
        }

        fn tick(&mut self, system: &mut LootSystem) {
            self.clock.advance();
            let mut ctx = SimContext {
                world: &mut self.world,
                clock: &self.clock,
                events: &mut self.events,
                rng: &mut self.rng,
            };
            system.tick(&mut ctx).unwrap();
        }
    }

    #[test]
    fn container_at_zero_distance_pays_out() {
        let mut h = Harness::new();
        let player = h.world.add_player(Player::new(100.0, 100.0));
        let container = h.container_at(100.0, 100.0);
        let mut loot = LootSystem::new(1);

        assert_eq!(
            loot.start(&h.world, player, Some(container)),
            Some(LootTarget::Container(container))
        );
        h.tick(&mut loot);

        let c = h.world.container(container).unwrap();
        assert!(c.opened);
        let item = c.item.clone().unwrap();
        assert!(h.world.player(player).unwrap().inventory.count(&item) >= 1);
        assert_eq!(loot.active_count(), 0);
    }

    #[test]
    fn countdown_runs_before_opening() {
        let mut h = Harness::new();
        let player = h.world.add_player(Player::new(100.0, 100.0));
        let container = h.container_at(110.0, 100.0);
        let mut loot = LootSystem::new(3);
        loot.start(&h.world, player, Some(container));

        h.tick(&mut loot);
        h.tick(&mut loot);
        assert_eq!(loot.progress().get(&player), Some(&1));
        assert!(!h.world.container(container).unwrap().opened);

        h.tick(&mut loot);
        assert!(h.world.container(container).unwrap().opened);
        assert!(loot.progress().is_empty());
    }

    #[test]
    fn far_container_cannot_be_started() {
        let mut h = Harness::new();
        let player = h.world.add_player(Player::new(100.0, 100.0));
        let container = h.container_at(200.0, 100.0);
        let mut loot = LootSystem::new(5);
        assert!(loot.start(&h.world, player, Some(container)).is_none());
        assert!(loot.session(player).is_none());
    }

    #[test]
    fn walking_away_aborts() {
        let mut h = Harness::new();
        let player = h.world.add_player(Player::new(100.0, 100.0));
        let container = h.container_at(100.0, 100.0);
        let mut loot = LootSystem::new(5);
        loot.start(&h.world, player, Some(container));

        h.world.player_mut(player).unwrap().x = 300.0;
        h.tick(&mut loot);

        assert!(loot.session(player).is_none());
        assert!(!h.world.container(container).unwrap().opened);
        assert!(h.events.events().iter().any(|e| e.kind
            == SimEventKind::LootAborted {
                player,
                reason: AbortReason::OutOfRange,
            }));
    }

    #[test]
    fn vanished_player_aborts_without_fault() {
        let mut h = Harness::new();
        let player = h.world.add_player(Player::new(100.0, 100.0));
        let container = h.container_at(100.0, 100.0);
        let mut loot = LootSystem::new(5);
        loot.start(&h.world, player, Some(container));

        h.world.remove_player(player);
        h.tick(&mut loot);

        assert_eq!(loot.active_count(), 0);
        assert!(!h.world.container(container).unwrap().opened);
    }

    #[test]
    fn second_looter_is_aborted_when_first_finishes() {
        let mut h = Harness::new();
        let a = h.world.add_player(Player::new(100.0, 100.0));
        let b = h.world.add_player(Player::new(100.0, 100.0));
        let container = h.container_at(100.0, 100.0);
        let mut loot = LootSystem::new(1);
        loot.start(&h.world, a, Some(container));
        loot.start(&h.world, b, Some(container));

        h.tick(&mut loot);
        assert!(h.world.container(container).unwrap().opened);
        assert_eq!(loot.active_count(), 0);

        let credited: u32 = [a, b]
            .iter()
            .map(|id| h.world.player(*id).unwrap().inventory.iter().count() as u32)
            .sum();
        assert_eq!(credited, 1);
    }

    #[test]
    fn shelf_is_found_by_edge_distance_and_opened_once() {
        let mut h = Harness::new();
        h.world
            .add_wall(Wall::at_cell(Cell::new(5, 5), WallMaterial::Plastic));
        h.world
            .add_wall(Wall::at_cell(Cell::new(2, 2), WallMaterial::Wood));
        // Within reach of the second wall only.
        let player = h.world.add_player(Player::new(130.0, 100.0));
        let mut loot = LootSystem::new(1);

        assert_eq!(loot.start(&h.world, player, None), Some(LootTarget::Wall(1)));
        h.tick(&mut loot);
        assert!(h.world.walls[1].opened);
        assert!(!h.world.walls[0].opened);

        assert!(loot.start(&h.world, player, None).is_none());
    }

    #[test]
    fn shelf_search_takes_first_wall_in_list_not_nearest() {
        let mut h = Harness::new();
        h.world
            .add_wall(Wall::at_cell(Cell::new(4, 2), WallMaterial::Steel));
        h.world
            .add_wall(Wall::at_cell(Cell::new(2, 2), WallMaterial::Wood));
        // 30 units from wall 0, 10 units from wall 1.
        let player = h.world.add_player(Player::new(130.0, 100.0));
        let mut loot = LootSystem::new(1);

        assert_eq!(loot.start(&h.world, player, None), Some(LootTarget::Wall(0)));
    }

    #[test]
    fn restart_replaces_session() {
        let mut h = Harness::new();
        let player = h.world.add_player(Player::new(100.0, 100.0));
        let first = h.container_at(100.0, 100.0);
        let second = h.container_at(110.0, 110.0);
        let mut loot = LootSystem::new(10);

        loot.start(&h.world, player, Some(first));
        h.tick(&mut loot);
        loot.start(&h.world, player, Some(second));

        let session = loot.session(player).unwrap();
        assert_eq!(session.target, LootTarget::Container(second));
        assert_eq!(session.remaining, 10);
        assert_eq!(loot.active_count(), 1);
    }

    #[test]
    fn cancel_is_noop_without_session() {
        let mut loot = LootSystem::new(10);
        assert!(!loot.cancel(PlayerId::new()));
    }
}
