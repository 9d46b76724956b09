use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{error, info};

use crate::changer::{CycleOutcome, WallpaperChanger};
use crate::config::Interval;
use crate::error::Result;

/// Drives a [`WallpaperChanger`] once or on a fixed interval.
pub struct Scheduler {
    changer: WallpaperChanger,
    interval: Interval,
}

impl Scheduler {
    pub fn new(changer: WallpaperChanger, interval: Interval) -> Self {
        Self { changer, interval }
    }

    pub async fn run_once(&mut self) -> Result<CycleOutcome> {
        self.changer.run_cycle().await
    }

    /// Move the changer onto its own task and return immediately.
    ///
    /// Each cycle finishes and the full interval elapses before the next one
    /// starts. `Interval::Once` runs a single cycle on the task.
    pub fn spawn(self) -> SchedulerHandle {
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let task = match self.interval {
            Interval::Once => {
                let mut changer = self.changer;
                tokio::spawn(async move {
                    if let Err(e) = changer.run_cycle().await {
                        error!("wallpaper cycle error: {e}");
                    }
                })
            }
            Interval::Every(period) => tokio::spawn(run_loop(self.changer, period, shutdown_rx)),
        };
        SchedulerHandle { shutdown_tx, task }
    }
}

async fn run_loop(
    mut changer: WallpaperChanger,
    period: Duration,
    mut shutdown: watch::Receiver<bool>,
) {
    info!(interval_secs = period.as_secs(), "starting wallpaper loop");
    let mut signal_open = true;
    loop {
        // errors here are filesystem or backend trouble; try again next tick
        if let Err(e) = changer.run_cycle().await {
            error!("wallpaper cycle error: {e}");
        }

        let sleep = tokio::time::sleep(period);
        tokio::pin!(sleep);
        loop {
            tokio::select! {
                _ = &mut sleep => break,
                res = shutdown.changed(), if signal_open => match res {
                    Ok(()) => {
                        info!("wallpaper loop stopped");
                        return;
                    }
                    // handle dropped without stop(): keep running on schedule
                    Err(_) => signal_open = false,
                },
            }
        }
    }
}

/// Dropping the handle detaches the loop; it then runs until the process exits.
#[must_use = "dropping the handle detaches the loop; call stop() to end it"]
pub struct SchedulerHandle {
    shutdown_tx: watch::Sender<bool>,
    task: JoinHandle<()>,
}

impl SchedulerHandle {
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Signal the loop to stop (interrupting any sleep) and wait for it.
    /// A cycle already in progress is allowed to finish.
    pub async fn stop(self) {
        let _ = self.shutdown_tx.send(true);
        if let Err(e) = self.task.await {
            error!("wallpaper task failed: {e}");
        }
    }
}
