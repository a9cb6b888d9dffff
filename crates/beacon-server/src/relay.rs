//! The publish/subscribe core: subscriber registry and broadcast fan-out.

use std::collections::HashMap;

use parking_lot::Mutex;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;

use beacon_core::{Command, DeliveryFailure, RelayError, SubscriberId};

/// Registry of all connected event-stream subscribers.
///
/// Each subscriber is a bounded mpsc sender; the receiving half is owned by
/// that subscriber's stream session. Membership is guarded by a single mutex;
/// broadcast delivery iterates a snapshot outside it, so a slow subscriber
/// never blocks registration or removal of others.
pub struct SubscriberRegistry {
    subscribers: Mutex<HashMap<SubscriberId, mpsc::Sender<String>>>,
    // Serializes broadcasts so every subscriber queue observes publish order.
    publish_lock: Mutex<()>,
    queue_depth: usize,
}

impl SubscriberRegistry {
    pub fn new(queue_depth: usize) -> Self {
        Self {
            subscribers: Mutex::new(HashMap::new()),
            publish_lock: Mutex::new(()),
            queue_depth,
        }
    }

    /// Add a new subscriber with an empty queue. Never fails.
    pub fn register(&self) -> (SubscriberId, mpsc::Receiver<String>) {
        let id = SubscriberId::new();
        let (tx, rx) = mpsc::channel(self.queue_depth);
        self.subscribers.lock().insert(id.clone(), tx);
        tracing::debug!(subscriber = %id, "subscriber registered");
        (id, rx)
    }

    /// Remove a subscriber. Idempotent: unknown IDs are a no-op.
    pub fn unregister(&self, id: &SubscriberId) {
        if self.subscribers.lock().remove(id).is_some() {
            tracing::debug!(subscriber = %id, "subscriber unregistered");
        }
    }

    /// Point-in-time copy of current members, for iteration outside the lock.
    pub fn snapshot(&self) -> Vec<(SubscriberId, mpsc::Sender<String>)> {
        self.subscribers
            .lock()
            .iter()
            .map(|(id, tx)| (id.clone(), tx.clone()))
            .collect()
    }

    /// Number of connected subscribers.
    pub fn count(&self) -> usize {
        self.subscribers.lock().len()
    }

    /// Fan a command out to every subscriber. Returns the number of
    /// successful handoffs.
    ///
    /// The command is serialized once. A subscriber whose queue is full or
    /// closed is unregistered after the iteration; a failed handoff never
    /// surfaces to the publisher. Dropping the sender here also ends the
    /// evicted subscriber's stream, so a stalled display reconnects with a
    /// fresh queue instead of accumulating memory.
    pub fn broadcast(&self, command: &Command) -> usize {
        let wire = command.to_wire();

        let _order = self.publish_lock.lock();
        let members = self.snapshot();
        let mut delivered = 0;
        let mut dead = Vec::new();

        for (id, tx) in members {
            match tx.try_send(wire.clone()) {
                Ok(()) => delivered += 1,
                Err(err) => {
                    let reason = match err {
                        TrySendError::Full(_) => DeliveryFailure::QueueFull,
                        TrySendError::Closed(_) => DeliveryFailure::Closed,
                    };
                    let failure = RelayError::Delivery {
                        subscriber: id.clone(),
                        reason,
                    };
                    tracing::debug!(error = %failure, "dropping subscriber");
                    dead.push(id);
                }
            }
        }

        for id in &dead {
            self.unregister(id);
        }

        tracing::debug!(
            command = ?command.command_type(),
            delivered,
            dropped = dead.len(),
            "broadcast"
        );
        delivered
    }
}
