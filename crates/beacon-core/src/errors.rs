use std::fmt;
use std::io;

use crate::ids::SubscriberId;

/// Reason a broadcast handoff to one subscriber failed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DeliveryFailure {
    /// The subscriber's outbound queue was full.
    QueueFull,
    /// The subscriber's stream has gone away.
    Closed,
}

impl fmt::Display for DeliveryFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::QueueFull => f.write_str("queue full"),
            Self::Closed => f.write_str("channel closed"),
        }
    }
}

/// Typed error hierarchy for the relay.
///
/// Every failure is contained at the narrowest scope that can absorb it;
/// nothing here may take down another subscriber's session or the listening
/// socket. Only `Bind` is fatal.
#[derive(Debug, thiserror::Error)]
pub enum RelayError {
    /// The inbound command body is not valid JSON. Surfaced to the caller as
    /// a client error; never reaches the broadcaster.
    #[error("malformed command: {0}")]
    MalformedCommand(String),

    /// One subscriber could not accept a broadcast. Self-healing: the
    /// subscriber is dropped from the registry, the publisher never sees it.
    #[error("delivery to {subscriber} failed: {reason}")]
    Delivery {
        subscriber: SubscriberId,
        reason: DeliveryFailure,
    },

    /// A write to a connected client failed. Ends that session only; the
    /// client is responsible for reconnecting.
    #[error("stream transport failed: {0}")]
    StreamTransport(String),

    /// The listening socket could not be acquired.
    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: io::Error,
    },
}

impl RelayError {
    /// Short classification string for logging.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::MalformedCommand(_) => "malformed_command",
            Self::Delivery { .. } => "delivery",
            Self::StreamTransport(_) => "stream_transport",
            Self::Bind { .. } => "bind",
        }
    }

    /// Only bind failures abort the process.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Bind { .. })
    }
}
