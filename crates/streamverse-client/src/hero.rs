//! Rotating hero trailer on the landing page.

use std::time::Duration;

use streamverse_shared::constants::TRAILER_ROTATION_SECS;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

pub const TRAILERS: [&str; 3] = [
    "/videos/trailer1.mp4",
    "/videos/trailer2.mp4",
    "/videos/trailer3.mp4",
];

/// Cycles through [`TRAILERS`] every `period` until stopped or dropped.
pub struct TrailerRotation {
    index: watch::Receiver<usize>,
    cancel: CancellationToken,
    handle: JoinHandle<()>,
}

impl TrailerRotation {
    /// A zero `period` falls back to the default rotation period.
    pub fn start(period: Duration, parent: &CancellationToken) -> Self {
        let period = if period.is_zero() {
            tracing::warn!("trailer period must be positive, using default");
            Duration::from_secs(TRAILER_ROTATION_SECS)
        } else {
            period
        };
        let (tx, index) = watch::channel(0usize);
        let cancel = parent.child_token();
        let token = cancel.clone();

        let handle = tokio::spawn(async move {
            let mut ticker = interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                tokio::select! {
                    _ = token.cancelled() => break,
                    _ = ticker.tick() => {
                        tx.send_modify(|i| *i = (*i + 1) % TRAILERS.len());
                    }
                }
            }
            tracing::trace!("trailer rotation stopped");
        });

        Self {
            index,
            cancel,
            handle,
        }
    }

    pub fn current(&self) -> &'static str {
        TRAILERS[*self.index.borrow() % TRAILERS.len()]
    }

    pub fn subscribe(&self) -> watch::Receiver<usize> {
        self.index.clone()
    }

    pub fn stop(&self) {
        self.cancel.cancel();
    }

    pub fn is_running(&self) -> bool {
        !self.handle.is_finished()
    }
}

impl Drop for TrailerRotation {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}
