//! Cross-component loading notifications.
//!
//! A narrow publish/subscribe channel: components report when a keyed load
//! starts and finishes, and anyone holding a subscription hears about it.
//! Instances are injected (`Arc<ContentLoadingBus>`), never global.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::broadcast;
use tokio::sync::broadcast::error::{RecvError, TryRecvError};

const DEFAULT_CAPACITY: usize = 64;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadingEvent {
    Started(String),
    Finished(String),
    /// The last pending load finished.
    AllSettled,
}

#[derive(Debug)]
pub struct ContentLoadingBus {
    sender: broadcast::Sender<LoadingEvent>,
    pending: Mutex<HashMap<String, usize>>,
}

impl Default for ContentLoadingBus {
    fn default() -> Self {
        Self::new()
    }
}

impl ContentLoadingBus {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self {
            sender,
            pending: Mutex::new(HashMap::new()),
        }
    }

    pub fn subscribe(&self) -> LoadingSubscription {
        LoadingSubscription {
            receiver: self.sender.subscribe(),
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }

    fn publish(&self, event: LoadingEvent) {
        // No subscribers is fine.
        let _ = self.sender.send(event);
    }

    pub fn start(&self, key: &str) {
        {
            let mut pending = self.pending.lock().unwrap_or_else(PoisonError::into_inner);
            *pending.entry(key.to_string()).or_insert(0) += 1;
        }
        self.publish(LoadingEvent::Started(key.to_string()));
    }

    /// Unmatched finishes are ignored.
    pub fn finish(&self, key: &str) {
        let settled = {
            let mut pending = self.pending.lock().unwrap_or_else(PoisonError::into_inner);
            match pending.get_mut(key) {
                Some(count) if *count > 1 => {
                    *count -= 1;
                    false
                }
                Some(_) => {
                    pending.remove(key);
                    pending.is_empty()
                }
                None => return,
            }
        };

        self.publish(LoadingEvent::Finished(key.to_string()));
        if settled {
            self.publish(LoadingEvent::AllSettled);
        }
    }

    /// `start(key)` now, `finish(key)` when the guard drops.
    pub fn track(self: &Arc<Self>, key: &str) -> LoadingGuard {
        self.start(key);
        LoadingGuard {
            bus: Arc::clone(self),
            key: key.to_string(),
        }
    }

    pub fn is_loading(&self, key: &str) -> bool {
        self.pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(key)
    }

    pub fn is_idle(&self) -> bool {
        self.pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_empty()
    }
}

#[derive(Debug)]
pub struct LoadingGuard {
    bus: Arc<ContentLoadingBus>,
    key: String,
}

impl Drop for LoadingGuard {
    fn drop(&mut self) {
        self.bus.finish(&self.key);
    }
}

/// Receiving end of the bus. Dropping it (or calling
/// [`unsubscribe`](Self::unsubscribe)) stops delivery.
#[derive(Debug)]
pub struct LoadingSubscription {
    receiver: broadcast::Receiver<LoadingEvent>,
}

impl LoadingSubscription {
    /// Next event, or `None` once the bus is gone. Events missed by a slow
    /// subscriber are skipped.
    pub async fn recv(&mut self) -> Option<LoadingEvent> {
        loop {
            match self.receiver.recv().await {
                Ok(event) => return Some(event),
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "Loading subscriber lagged behind");
                }
                Err(RecvError::Closed) => return None,
            }
        }
    }

    pub fn try_recv(&mut self) -> Option<LoadingEvent> {
        loop {
            match self.receiver.try_recv() {
                Ok(event) => return Some(event),
                Err(TryRecvError::Lagged(_)) => continue,
                Err(TryRecvError::Empty) | Err(TryRecvError::Closed) => return None,
            }
        }
    }

    pub fn unsubscribe(self) {}
}
