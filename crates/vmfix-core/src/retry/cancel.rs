//! Cancellation token checked between attempts and during pauses.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Granularity of the cancellable sleep.
const SLEEP_SLICE: Duration = Duration::from_millis(50);

/// Shared flag that aborts a running retry loop. Clones share the same flag.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation. Every clone observes it.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Sleeps for `delay`, waking early if `token` is cancelled.
/// Returns false when the sleep was cut short by cancellation.
pub(crate) fn pause(delay: Duration, token: Option<&CancelToken>) -> bool {
    let token = match token {
        Some(t) => t,
        None => {
            if !delay.is_zero() {
                std::thread::sleep(delay);
            }
            return true;
        }
    };

    // No deadline: the delay is past what `Instant` can represent.
    let deadline = Instant::now().checked_add(delay);
    loop {
        if token.is_cancelled() {
            return false;
        }
        let now = Instant::now();
        let left = match deadline {
            Some(d) if now >= d => return true,
            Some(d) => d - now,
            None => SLEEP_SLICE,
        };
        std::thread::sleep(left.min(SLEEP_SLICE));
    }
}
