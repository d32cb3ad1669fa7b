use ho_core::World;
use rand::rngs::StdRng;

use crate::clock::SimClock;
use crate::event::{EventLog, SimEvent, SimEventKind};

/// Mutable context passed to each system during a tick.
pub struct SimContext<'a> {
    /// The session world.
    pub world: &'a mut World,
    /// The session clock, already advanced to the current tick.
    pub clock: &'a SimClock,
    /// Event sink.
    pub events: &'a mut EventLog,
    /// Session RNG.
    pub rng: &'a mut StdRng,
}

impl SimContext<'_> {
    /// Emit a simulation event at the current tick.
    pub fn emit(&mut self, kind: SimEventKind, description: impl Into<String>) {
        self.events
            .push(SimEvent::new(self.clock.tick(), kind, description));
    }

    /// Current tick number.
    pub fn tick(&self) -> u64 {
        self.clock.tick()
    }
}
