use std::time::Duration;

use ho_simulation::config::DEFAULT_TICK_RATE;

use crate::error::{ServerError, ServerResult};

/// Environment variable overriding the tick rate.
pub const TICK_RATE_ENV: &str = "HOLDOUT_TICK_RATE";

/// Settings for the fixed-rate tick driver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DriverConfig {
    /// Ticks per second.
    pub tick_rate: u32,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            tick_rate: DEFAULT_TICK_RATE,
        }
    }
}

impl DriverConfig {
    /// Defaults, with `HOLDOUT_TICK_RATE` applied if set.
    pub fn from_env() -> ServerResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Defaults, with overrides read through `lookup` instead of the process
    /// environment.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> ServerResult<Self> {
        match lookup(TICK_RATE_ENV) {
            Some(raw) => Self::default().with_tick_rate_str(&raw),
            None => Ok(Self::default()),
        }
    }

    /// Set the tick rate. At least one tick per second.
    pub fn with_tick_rate(mut self, rate: u32) -> Self {
        self.tick_rate = rate.max(1);
        self
    }

    fn with_tick_rate_str(self, raw: &str) -> ServerResult<Self> {
        let rate: u32 = raw.trim().parse().map_err(|_| {
            ServerError::InvalidConfig(format!(
                "{TICK_RATE_ENV} must be a positive integer, got {raw:?}"
            ))
        })?;
        if rate == 0 {
            return Err(ServerError::InvalidConfig(format!(
                "{TICK_RATE_ENV} must be at least 1"
            )));
        }
        Ok(self.with_tick_rate(rate))
    }

    /// Time between ticks.
    pub fn tick_interval(&self) -> Duration {
        Duration::from_secs(1) / self.tick_rate.max(1)
    }
}
