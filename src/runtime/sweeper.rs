//! Background task that expires lapsed seat offers.
//!
//! Without the sweeper an expired offer only disappears when its holder tries
//! to accept it, so the freed seat stays with that user until then. The
//! sweeper runs [`BookingService::sweep_expired_notifications`] on a fixed
//! interval, which purges lapsed offers and notifies the next waiter.

use std::time::Duration;

use tokio::sync::{oneshot, watch};
use tokio::time::MissedTickBehavior;

use crate::config::SweepConfig;
use crate::core::{BookingService, NotificationGateway, SessionStore};
use crate::runtime::Spawn;

/// Periodic expiry sweep over one booking service.
pub struct ExpirySweeper<S: ?Sized, N> {
    service: BookingService<S, N>,
    interval: Duration,
}

impl<S, N> ExpirySweeper<S, N>
where
    S: SessionStore + ?Sized,
    N: NotificationGateway,
{
    /// Sweep `service` every `interval`.
    pub fn new(service: BookingService<S, N>, interval: Duration) -> Self {
        Self { service, interval }
    }

    /// Sweeper described by `cfg`, or `None` when the sweep is disabled.
    pub fn from_config(service: BookingService<S, N>, cfg: &SweepConfig) -> Option<Self> {
        (cfg.enabled && cfg.interval_secs > 0)
            .then(|| Self::new(service, Duration::from_secs(cfg.interval_secs)))
    }

    /// Start sweeping on `spawner`. The first sweep runs immediately.
    pub fn start<Sp: Spawn>(self, spawner: &Sp) -> SweeperHandle {
        let (stop_tx, mut stop_rx) = watch::channel(false);
        let (done_tx, done_rx) = oneshot::channel();
        let Self { service, interval } = self;

        spawner.spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            tracing::info!(interval_ms = interval.as_millis(), "expiry sweeper started");
            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        if let Err(e) = service.sweep_expired_notifications().await {
                            tracing::warn!("expiry sweep failed: {}", e);
                        }
                    }
                    changed = stop_rx.changed() => {
                        if changed.is_err() || *stop_rx.borrow() {
                            break;
                        }
                    }
                }
            }
            tracing::info!("expiry sweeper stopped");
            let _ = done_tx.send(());
        });

        SweeperHandle {
            stop: stop_tx,
            done: done_rx,
        }
    }
}

/// Control handle of a running sweeper.
///
/// Dropping the handle also stops the sweeper.
pub struct SweeperHandle {
    stop: watch::Sender<bool>,
    done: oneshot::Receiver<()>,
}

impl SweeperHandle {
    /// Signal the sweeper to stop and wait until its loop has exited.
    pub async fn shutdown(self) {
        let _ = self.stop.send(true);
        let _ = self.done.await;
    }
}
