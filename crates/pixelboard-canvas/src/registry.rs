//! Subscriber Registry
//!
//! The set of live-update channels, one per connected viewer. Each channel is
//! a bounded `mpsc` queue fed with `try_send`, so a stalled viewer can never
//! block a broadcast.

use std::collections::HashMap;
use std::fmt;

use tokio::sync::mpsc::{self, error::TrySendError};
use tracing::debug;
use uuid::Uuid;

/// Opaque subscriber identity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriberId(Uuid);

impl SubscriberId {
    fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for SubscriberId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Registered notification channels
#[derive(Debug)]
pub struct SubscriberRegistry {
    subscribers: HashMap<SubscriberId, mpsc::Sender<()>>,
    buffer: usize,
}

impl SubscriberRegistry {
    /// Create a registry whose channels buffer `buffer` pending notifications.
    ///
    /// A zero buffer is raised to one.
    #[must_use]
    pub fn new(buffer: usize) -> Self {
        Self {
            subscribers: HashMap::new(),
            buffer: buffer.max(1),
        }
    }

    /// Add a subscriber and hand back its receiving end
    pub fn register(&mut self) -> (SubscriberId, mpsc::Receiver<()>) {
        let (tx, rx) = mpsc::channel(self.buffer);
        let id = SubscriberId::new();
        self.subscribers.insert(id, tx);
        (id, rx)
    }

    /// Remove a subscriber. Returns `false` if it was already gone.
    pub fn unregister(&mut self, id: SubscriberId) -> bool {
        self.subscribers.remove(&id).is_some()
    }

    /// Queue a notification for one subscriber without waiting
    pub fn notify(&mut self, id: SubscriberId) -> bool {
        match self.subscribers.get(&id).map(|tx| tx.try_send(())) {
            Some(Ok(())) | Some(Err(TrySendError::Full(()))) => true,
            Some(Err(TrySendError::Closed(()))) => {
                self.subscribers.remove(&id);
                false
            }
            None => false,
        }
    }

    /// Notify every registered subscriber.
    ///
    /// A full queue already holds a pending notification, so the new one is
    /// folded into it. Subscribers whose receiver is gone are dropped.
    /// Returns the number of subscribers left with a pending notification.
    pub fn broadcast(&mut self) -> usize {
        let mut delivered = 0;
        self.subscribers.retain(|id, tx| match tx.try_send(()) {
            Ok(()) => {
                delivered += 1;
                true
            }
            Err(TrySendError::Full(())) => {
                debug!(subscriber = %id, "Notification already pending");
                delivered += 1;
                true
            }
            Err(TrySendError::Closed(())) => {
                debug!(subscriber = %id, "Dropping closed subscriber");
                false
            }
        });
        delivered
    }

    /// Whether `id` is registered
    #[must_use]
    pub fn contains(&self, id: SubscriberId) -> bool {
        self.subscribers.contains_key(&id)
    }

    /// Number of registered subscribers
    #[must_use]
    pub fn len(&self) -> usize {
        self.subscribers.len()
    }

    /// Whether nobody is subscribed
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.subscribers.is_empty()
    }
}

impl Default for SubscriberRegistry {
    fn default() -> Self {
        Self::new(1)
    }
}
