//! Countdown tick source background task

use std::{sync::Arc, time::Duration};

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::state::{TickOutcome, TimerController};

/// Handle over a spawned tick source.
///
/// One-shot: created on start, destroyed on completion or cancellation,
/// never reused across runs. Dropping the handle closes the cancellation
/// channel, which the task treats the same as an explicit cancel.
#[derive(Debug)]
pub struct TickerHandle {
    cancel_tx: watch::Sender<bool>,
    task: JoinHandle<()>,
}

impl TickerHandle {
    /// Stop the tick source from delivering any further callbacks
    pub fn cancel(&self) {
        let _ = self.cancel_tx.send(true);
    }

    /// Wait for the task to exit
    pub async fn join(self) {
        let _ = self.task.await;
    }
}

/// Spawn a tick source delivering one tick per second into the controller.
///
/// The task runs until the controller reports the run finished or the
/// handle cancels it. Completion is decided by the controller, never by
/// the task, so a cancelled source can no longer finish a run.
pub fn spawn_ticker(controller: Arc<TimerController>) -> TickerHandle {
    let (cancel_tx, mut cancel_rx) = watch::channel(false);

    let task = tokio::spawn(async move {
        debug!("Tick source started");

        let mut interval = tokio::time::interval(Duration::from_secs(1));
        // The first interval tick completes immediately; consume it so
        // the first delivered tick lands one second after start
        interval.tick().await;

        loop {
            tokio::select! {
                _ = interval.tick() => {
                    if controller.on_tick() == TickOutcome::Finished {
                        debug!("Tick source finished its run");
                        break;
                    }
                }
                changed = cancel_rx.changed() => {
                    // Err means the handle was dropped; either way the
                    // source must stop delivering into discarded state
                    let _ = changed;
                    info!("Tick source cancelled");
                    break;
                }
            }
        }
    });

    TickerHandle { cancel_tx, task }
}
