//! Periodic auto-retry of waiting peers.
//!
//! [`RetryScheduler`] owns the one process-wide timer that drives
//! [`MatchEngine::sweep`]. It is started once next to the engine and
//! stopped once at shutdown; connections never create timers.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};

use super::MatchEngine;
use crate::error::LobbyError;

/// Handle to the running sweep timer.
#[derive(Debug)]
pub struct RetryScheduler {
    engine: Arc<MatchEngine>,
    shutdown: watch::Sender<bool>,
    handle: JoinHandle<()>,
}

impl RetryScheduler {
    /// Spawns the sweep task, firing every `period` (first tick after one
    /// full period).
    ///
    /// Must be called from within a tokio runtime.
    ///
    /// # Errors
    ///
    /// Returns [`LobbyError::Config`] if `period` is too large to schedule,
    /// and [`LobbyError::SchedulerRunning`] if another scheduler is already
    /// attached to `engine`.
    pub fn start(engine: Arc<MatchEngine>, period: Duration) -> Result<Self, LobbyError> {
        let period = period.max(Duration::from_millis(1));
        let first_tick = Instant::now().checked_add(period).ok_or_else(|| {
            LobbyError::Config(format!("retry interval {period:?} is out of range"))
        })?;
        if !engine.attach_scheduler() {
            return Err(LobbyError::SchedulerRunning);
        }
        let (shutdown, mut shutdown_rx) = watch::channel(false);
        let sweeper = Arc::clone(&engine);

        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval_at(first_tick, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        let pairs = sweeper.sweep().await;
                        if pairs > 0 {
                            tracing::info!(pairs, "retry sweep matched waiting peers");
                        }
                    }
                    changed = shutdown_rx.changed() => {
                        if changed.is_err() || *shutdown_rx.borrow() {
                            break;
                        }
                    }
                }
            }
            tracing::debug!("retry scheduler stopped");
        });

        tracing::info!(?period, "retry scheduler started");
        Ok(Self {
            engine,
            shutdown,
            handle,
        })
    }

    /// Stops the timer and waits for an in-flight sweep to finish.
    pub async fn stop(self) {
        let _ = self.shutdown.send(true);
        if let Err(err) = self.handle.await {
            tracing::warn!(error = %err, "retry scheduler task ended abnormally");
        }
        self.engine.detach_scheduler();
    }
}
