//! Debouncing for search-as-you-type.
//!
//! Each [`Debouncer::settle`] call bumps a shared generation counter and
//! sleeps; it settles only if no newer call bumped the counter meanwhile.
//! A burst of keystrokes therefore issues a single listing request.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Trailing-edge debounce: of a burst of calls, only the last one settles.
#[derive(Debug, Clone)]
pub struct Debouncer {
    delay: Duration,
    generation: Arc<AtomicU64>,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            generation: Arc::new(AtomicU64::new(0)),
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Wait out the delay. Returns `false` if a newer call arrived meanwhile,
    /// in which case the caller should drop its work.
    pub async fn settle(&self) -> bool {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        self.generation.load(Ordering::SeqCst) == generation
    }

    /// Invalidate any call currently waiting.
    pub fn cancel(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn only_last_call_in_burst_settles() {
        let debouncer = Debouncer::new(Duration::from_millis(300));

        let first = tokio::spawn({
            let d = debouncer.clone();
            async move { d.settle().await }
        });
        tokio::time::sleep(Duration::from_millis(100)).await;
        let second = tokio::spawn({
            let d = debouncer.clone();
            async move { d.settle().await }
        });

        assert!(!first.await.unwrap());
        assert!(second.await.unwrap());
    }

    #[tokio::test(start_paused = true)]
    async fn spaced_calls_both_settle() {
        let debouncer = Debouncer::new(Duration::from_millis(50));
        assert!(debouncer.settle().await);
        assert!(debouncer.settle().await);
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_drops_waiting_call() {
        let debouncer = Debouncer::new(Duration::from_millis(50));
        let waiting = tokio::spawn({
            let d = debouncer.clone();
            async move { d.settle().await }
        });
        tokio::time::sleep(Duration::from_millis(10)).await;
        debouncer.cancel();
        assert!(!waiting.await.unwrap());
    }
}
