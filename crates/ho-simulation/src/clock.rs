/// Tracks simulation time: a monotonic tick counter and the nominal rate
/// the external driver advances it at.
#[derive(Debug, Clone)]
pub struct SimClock {
    tick: u64,
    tick_rate: u32,
}

impl SimClock {
    /// Create a clock at tick 0 for the given rate in ticks per second.
    pub fn new(tick_rate: u32) -> Self {
        Self {
            tick: 0,
            tick_rate: tick_rate.max(1),
        }
    }

    /// Advance the clock by one tick. Returns the new tick number.
    pub fn advance(&mut self) -> u64 {
        self.tick += 1;
        self.tick
    }

    /// Return the current tick number.
    pub fn tick(&self) -> u64 {
        self.tick
    }

    /// Return the configured ticks per second.
    pub fn tick_rate(&self) -> u32 {
        self.tick_rate
    }

    /// Simulated seconds elapsed, assuming the driver keeps its rate.
    pub fn elapsed_seconds(&self) -> f64 {
        self.tick as f64 / f64::from(self.tick_rate)
    }
}
