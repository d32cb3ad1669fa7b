//! Fixed-rate tick driver.

use std::sync::Arc;

use tokio::task::JoinHandle;
use tokio::time::{MissedTickBehavior, interval};
use tracing::info;

use crate::config::DriverConfig;
use crate::registry::SessionRegistry;

/// Spawn the process-wide tick task. Every registered session is ticked
/// once per interval; late ticks are skipped rather than bunched up.
/// The task runs until aborted through the returned handle.
pub fn spawn_tick_loop(registry: Arc<SessionRegistry>, config: DriverConfig) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = interval(config.tick_interval());
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        info!(tick_rate = config.tick_rate, "tick driver started");

        loop {
            ticker.tick().await;
            registry.tick_all().await;
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use ho_simulation::SimConfig;

    #[tokio::test]
    async fn driver_advances_sessions() {
        let registry = Arc::new(SessionRegistry::new(
            SimConfig::default().with_size(400, 400),
        ));
        let id = registry.create().await.unwrap();
        let handle = spawn_tick_loop(
            Arc::clone(&registry),
            DriverConfig::default().with_tick_rate(200),
        );

        tokio::time::sleep(Duration::from_millis(100)).await;
        handle.abort();

        let session = registry.get(id).await.unwrap();
        assert!(session.info().await.tick > 0);
    }
}
