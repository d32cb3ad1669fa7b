use ho_core::world::{DEFAULT_HEIGHT, DEFAULT_WIDTH};

/// Reference simulation rate in ticks per second.
pub const DEFAULT_TICK_RATE: u32 = 60;

/// Configuration for one session's simulation.
#[derive(Debug, Clone)]
pub struct SimConfig {
    /// RNG seed; the same seed reproduces the same world and loot rolls.
    pub seed: u64,
    /// World width in world units.
    pub width: u32,
    /// World height in world units.
    pub height: u32,
    /// Zombies spawned around the door when the world is generated.
    pub wave_size: usize,
    /// Containers scattered through the world.
    pub container_count: usize,
    /// Probability that a spawned zombie is the fire variant.
    pub fire_variant_chance: f64,
    /// Ticks a loot session counts down before it completes.
    pub loot_ticks: u32,
    /// Ticks per second the external driver runs at.
    pub tick_rate: u32,
    /// Maximum event log size (oldest events dropped when exceeded). 0 = unlimited.
    pub max_events: usize,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            wave_size: 5,
            container_count: 3,
            fire_variant_chance: 0.2,
            loot_ticks: 60,
            tick_rate: DEFAULT_TICK_RATE,
            max_events: 1000,
        }
    }
}

impl SimConfig {
    /// Set the RNG seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Set the world size in world units.
    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// Set the number of zombies in the initial wave.
    pub fn with_wave_size(mut self, count: usize) -> Self {
        self.wave_size = count;
        self
    }

    /// Set the number of containers.
    pub fn with_container_count(mut self, count: usize) -> Self {
        self.container_count = count;
        self
    }

    /// Set the fire-variant probability (clamped to 0.0..=1.0).
    pub fn with_fire_variant_chance(mut self, chance: f64) -> Self {
        self.fire_variant_chance = chance.clamp(0.0, 1.0);
        self
    }

    /// Set the loot countdown length. At least one tick.
    pub fn with_loot_ticks(mut self, ticks: u32) -> Self {
        self.loot_ticks = ticks.max(1);
        self
    }

    /// Set the nominal tick rate. At least one tick per second.
    pub fn with_tick_rate(mut self, rate: u32) -> Self {
        self.tick_rate = rate.max(1);
        self
    }

    /// Set the maximum event log size (0 = unlimited).
    pub fn with_max_events(mut self, max: usize) -> Self {
        self.max_events = max;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_default_values() {
        let config = SimConfig::default();
        assert_eq!(config.seed, 42);
        assert_eq!(config.width, 2400);
        assert_eq!(config.height, 1600);
        assert_eq!(config.wave_size, 5);
        assert_eq!(config.container_count, 3);
        assert_eq!(config.tick_rate, 60);
    }

    #[test]
    fn config_builder_chain() {
        let config = SimConfig::default()
            .with_seed(123)
            .with_size(120, 80)
            .with_wave_size(0)
            .with_loot_ticks(5)
            .with_max_events(10);
        assert_eq!(config.seed, 123);
        assert_eq!((config.width, config.height), (120, 80));
        assert_eq!(config.wave_size, 0);
        assert_eq!(config.loot_ticks, 5);
        assert_eq!(config.max_events, 10);
    }

    #[test]
    fn config_clamps_degenerate_values() {
        let config = SimConfig::default()
            .with_loot_ticks(0)
            .with_tick_rate(0)
            .with_fire_variant_chance(3.0);
        assert_eq!(config.loot_ticks, 1);
        assert_eq!(config.tick_rate, 1);
        assert!((config.fire_variant_chance - 1.0).abs() < f64::EPSILON);
    }
}
