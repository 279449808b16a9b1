use std::time::Duration;

use tokio_util::sync::CancellationToken;

use crate::gallery::{GalleryAction, GalleryState};
use crate::store::Store;

fn wall_clock_ms() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Cancellable repeating timer driving a gallery's auto-advance.
///
/// Owned by the gallery's lifecycle: dropping (or cancelling) the handle
/// stops the task. Each tick dispatches `CycleNext`, so the defer-to-recent-
/// interaction check lives in the reducer, not here.
pub struct CycleTimer {
    cancel: CancellationToken,
}

impl CycleTimer {
    pub fn start(store: Store<GalleryState, GalleryAction>, interval: Duration) -> Self {
        Self::start_with_clock(store, interval, wall_clock_ms)
    }

    /// Injectable clock variant for deterministic tests.
    pub fn start_with_clock(
        store: Store<GalleryState, GalleryAction>,
        interval: Duration,
        now_ms: fn() -> i64,
    ) -> Self {
        let cancel = CancellationToken::new();
        let token = cancel.clone();
        let interval_ms = interval.as_millis() as i64;

        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
            // The first tick of a tokio interval fires immediately; consume
            // it so the gallery does not advance on mount.
            ticker.tick().await;

            loop {
                tokio::select! {
                    _ = token.cancelled() => break,
                    _ = ticker.tick() => {
                        store.dispatch(GalleryAction::CycleNext {
                            at_ms: now_ms(),
                            interval_ms,
                        });
                    }
                }
            }
        });

        Self { cancel }
    }

    pub fn cancel(&self) {
        self.cancel.cancel();
    }
}

impl Drop for CycleTimer {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}
