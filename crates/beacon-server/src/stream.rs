//! Per-connection event stream session.
//!
//! One `EventStream` exists per accepted `/api/events` connection. Opening it
//! registers a subscriber; the first frame is always the `connected`
//! handshake, then broadcast frames are forwarded in queue order. However the
//! stream ends (client disconnect, transport failure, server shutdown), the
//! embedded guard unregisters the subscriber exactly once on drop.

use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use futures::Stream;
use pin_project_lite::pin_project;
use tokio_stream::wrappers::ReceiverStream;

use beacon_core::SubscriberId;

use crate::relay::SubscriberRegistry;

/// Synthetic first frame, letting clients distinguish "stream open" from
/// "stream never started".
pub const HANDSHAKE: &str = r#"{"type":"connected"}"#;

pin_project! {
    /// Stream of wire-format frames for one subscriber.
    pub struct EventStream {
        #[pin]
        rx: ReceiverStream<String>,
        handshake_sent: bool,
        guard: RegistrationGuard,
    }
}

impl EventStream {
    /// Register a subscriber and open its frame stream.
    pub fn open(registry: Arc<SubscriberRegistry>) -> Self {
        let (id, rx) = registry.register();
        tracing::info!(subscriber = %id, "event stream opened");
        Self {
            rx: ReceiverStream::new(rx),
            handshake_sent: false,
            guard: RegistrationGuard { registry, id },
        }
    }

    pub fn subscriber_id(&self) -> &SubscriberId {
        &self.guard.id
    }
}

impl Stream for EventStream {
    type Item = String;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.project();
        if !*this.handshake_sent {
            *this.handshake_sent = true;
            return Poll::Ready(Some(HANDSHAKE.to_string()));
        }
        // Ends when the registry drops the sender (eviction) or on teardown.
        this.rx.poll_next(cx)
    }
}

struct RegistrationGuard {
    registry: Arc<SubscriberRegistry>,
    id: SubscriberId,
}

impl Drop for RegistrationGuard {
    fn drop(&mut self) {
        self.registry.unregister(&self.id);
        tracing::info!(subscriber = %self.id, "event stream closed");
    }
}
