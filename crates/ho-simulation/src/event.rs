use ho_core::{ContainerId, PlayerId};

use crate::looting::{AbortReason, LootTarget};

/// What kind of simulation event occurred.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SimEventKind {
    // Lifecycle
    /// A player joined the session.
    PlayerJoined {
        /// The new player.
        player: PlayerId,
    },
    /// A player left the session.
    PlayerLeft {
        /// The departed player.
        player: PlayerId,
    },

    // Combat
    /// A zombie landed a hit.
    PlayerHit {
        /// The player that took damage.
        player: PlayerId,
        /// Health left after the hit.
        health: u32,
    },
    /// A hit brought a player to zero health.
    PlayerDowned {
        /// The downed player.
        player: PlayerId,
    },

    // Looting
    /// A loot countdown began.
    LootStarted {
        /// The looting player.
        player: PlayerId,
        /// What is being searched.
        target: LootTarget,
    },
    /// A loot countdown finished and the target was opened.
    LootCompleted {
        /// The looting player.
        player: PlayerId,
        /// What was searched.
        target: LootTarget,
        /// The item credited, if the roll produced one.
        item: Option<String>,
    },
    /// A loot session ended without reward because its preconditions broke.
    LootAborted {
        /// The looting player.
        player: PlayerId,
        /// Why the session was dropped.
        reason: AbortReason,
    },
    /// The player cancelled their own loot session.
    LootCancelled {
        /// The looting player.
        player: PlayerId,
    },

    // Inventory
    /// A recipe was crafted.
    ItemCrafted {
        /// The crafting player.
        player: PlayerId,
        /// Recipe identifier.
        recipe: String,
    },
    /// An item was used or equipped.
    ItemUsed {
        /// The player using the item.
        player: PlayerId,
        /// Item identifier.
        item: String,
    },
}

impl SimEventKind {
    /// Check whether a given player is involved in this event.
    pub fn involves(&self, id: PlayerId) -> bool {
        match self {
            Self::PlayerJoined { player }
            | Self::PlayerLeft { player }
            | Self::PlayerHit { player, .. }
            | Self::PlayerDowned { player }
            | Self::LootStarted { player, .. }
            | Self::LootCompleted { player, .. }
            | Self::LootAborted { player, .. }
            | Self::LootCancelled { player }
            | Self::ItemCrafted { player, .. }
            | Self::ItemUsed { player, .. } => *player == id,
        }
    }

    /// Check whether the event concerns the given container.
    pub fn involves_container(&self, id: ContainerId) -> bool {
        match self {
            Self::LootStarted { target, .. } | Self::LootCompleted { target, .. } => {
                *target == LootTarget::Container(id)
            }
            _ => false,
        }
    }
}

/// A record of something that happened during simulation.
#[derive(Debug, Clone)]
pub struct SimEvent {
    /// The simulation tick when this event occurred.
    pub tick: u64,
    /// The specific kind of event that occurred.
    pub kind: SimEventKind,
    /// A human-readable description of the event.
    pub description: String,
}

impl SimEvent {
    /// Create a new simulation event with the given tick, kind, and description.
    pub fn new(tick: u64, kind: SimEventKind, description: impl Into<String>) -> Self {
        Self {
            tick,
            kind,
            description: description.into(),
        }
    }
}

/// Accumulates events during a simulation run.
#[derive(Debug, Default)]
pub struct EventLog {
    events: Vec<SimEvent>,
    max_events: usize,
}

impl EventLog {
    /// Create a new event log with the given maximum capacity (0 = unlimited).
    pub fn new(max_events: usize) -> Self {
        Self {
            events: Vec::new(),
            max_events,
        }
    }

    /// Append an event, dropping the oldest events if the log exceeds its capacity.
    pub fn push(&mut self, event: SimEvent) {
        self.events.push(event);
        if self.max_events > 0 && self.events.len() > self.max_events {
            let drain_count = self.events.len() - self.max_events;
            self.events.drain(..drain_count);
        }
    }

    /// Return a slice of all recorded events.
    pub fn events(&self) -> &[SimEvent] {
        &self.events
    }

    /// Return all events that occurred at the given tick.
    pub fn events_at_tick(&self, tick: u64) -> Vec<&SimEvent> {
        self.events.iter().filter(|e| e.tick == tick).collect()
    }

    /// Return all events involving the given player.
    pub fn events_for_player(&self, id: PlayerId) -> Vec<&SimEvent> {
        self.events.iter().filter(|e| e.kind.involves(id)).collect()
    }

    /// Return the number of recorded events.
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Return `true` if no events have been recorded.
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Remove all recorded events.
    pub fn clear(&mut self) {
        self.events.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn event_log_push_and_query() {
        let mut log = EventLog::new(0);
        let id = PlayerId::new();
        log.push(SimEvent::new(1, SimEventKind::PlayerJoined { player: id }, "joined"));
        assert_eq!(log.len(), 1);
        assert_eq!(log.events_at_tick(1).len(), 1);
        assert_eq!(log.events_for_player(id).len(), 1);
        assert!(log.events_for_player(PlayerId::new()).is_empty());
    }

    #[test]
    fn event_log_max_events_trims() {
        let mut log = EventLog::new(2);
        let id = PlayerId::new();
        for i in 0..5 {
            log.push(SimEvent::new(
                i,
                SimEventKind::LootCancelled { player: id },
                "test",
            ));
        }
        assert_eq!(log.len(), 2);
        assert_eq!(log.events()[0].tick, 3);
        assert_eq!(log.events()[1].tick, 4);
    }

    #[test]
    fn loot_events_involve_their_container() {
        let player = PlayerId::new();
        let mut rng = StdRng::seed_from_u64(7);
        let container = ContainerId::from_rng(&mut rng);
        let kind = SimEventKind::LootStarted {
            player,
            target: LootTarget::Container(container),
        };
        assert!(kind.involves(player));
        assert!(kind.involves_container(container));
        assert!(!kind.involves_container(ContainerId::from_rng(&mut rng)));

        let wall = SimEventKind::LootStarted {
            player,
            target: LootTarget::Wall(0),
        };
        assert!(!wall.involves_container(container));
    }

    #[test]
    fn event_log_clear() {
        let mut log = EventLog::new(0);
        log.push(SimEvent::new(
            1,
            SimEventKind::PlayerLeft {
                player: PlayerId::new(),
            },
            "left",
        ));
        log.clear();
        assert!(log.is_empty());
    }
}
