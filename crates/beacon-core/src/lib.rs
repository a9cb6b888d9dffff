//! Core types for the beacon command relay: subscriber identity, the opaque
//! command payload, and the relay error taxonomy. No I/O lives here.

pub mod command;
pub mod errors;
pub mod ids;

pub use command::Command;
pub use errors::{DeliveryFailure, RelayError};
pub use ids::SubscriberId;
