//! Periodic tick worker.
//!
//! Owns the engine's only background task: a tokio interval that calls
//! [`GameStateManager::tick`] (playtime accrual, sentinel pass, registry
//! reconciliation). The worker is explicitly owned and cancellable; there
//! is no ambient interval left running after shutdown.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::facade::GameStateManager;

/// Handle to the spawned tick task.
pub struct TickWorker {
    handle: JoinHandle<()>,
    shutdown_tx: tokio::sync::watch::Sender<bool>,
}

impl TickWorker {
    /// Default production tick period.
    pub const DEFAULT_PERIOD: Duration = Duration::from_secs(1);

    /// Spawns the tick loop on the current tokio runtime.
    pub fn spawn(manager: Arc<GameStateManager>, period: Duration) -> Self {
        let (shutdown_tx, mut shutdown_rx) = tokio::sync::watch::channel(false);

        let handle = tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            // Ticks drifting under load should not burst-fire playtime.
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    _ = interval.tick() => manager.tick(),
                    _ = shutdown_rx.changed() => break,
                }
            }
            tracing::debug!(target: "engine::ticker", "tick worker stopped");
        });

        Self {
            handle,
            shutdown_tx,
        }
    }

    /// Stops the loop and waits for the task to finish.
    pub async fn shutdown(self) {
        let _ = self.shutdown_tx.send(true);
        let _ = self.handle.await;
    }
}
