use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{MissedTickBehavior, interval};
use tracing::{debug, info, warn};

use super::UrlRegistry;

/// 后台过期扫描任务
pub struct ExpirySweeper;

impl ExpirySweeper {
    /// Starts sweeping on the current tokio runtime.
    ///
    /// The first sweep runs immediately, then once per `period`.
    pub fn spawn(registry: Arc<UrlRegistry>, period: Duration) -> SweeperHandle {
        let (shutdown_tx, mut shutdown_rx) = watch::channel(false);

        let task = tokio::spawn(async move {
            let mut ticker = interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            info!("ExpirySweeper: started, period {:?}", period);

            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        // sweep_expired takes the registry lock and writes the snapshot
                        let registry = registry.clone();
                        match tokio::task::spawn_blocking(move || registry.sweep_expired()).await {
                            Ok(flipped) => {
                                debug!("ExpirySweeper: tick, {} records deactivated", flipped)
                            }
                            Err(e) => warn!("ExpirySweeper: sweep task failed: {}", e),
                        }
                    }
                    _ = shutdown_rx.changed() => break,
                }
            }

            info!("ExpirySweeper: stopped");
        });

        SweeperHandle { shutdown_tx, task }
    }
}

pub struct SweeperHandle {
    shutdown_tx: watch::Sender<bool>,
    task: JoinHandle<()>,
}

impl SweeperHandle {
    /// Stops the loop and waits for the task to finish
    pub async fn shutdown(self) {
        let _ = self.shutdown_tx.send(true);
        let _ = self.task.await;
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}
