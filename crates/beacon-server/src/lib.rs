pub mod assets;
pub mod config;
pub mod handlers;
pub mod net;
pub mod relay;
pub mod server;
pub mod stream;
pub mod tls;

pub use config::ServerConfig;
pub use relay::SubscriberRegistry;
pub use server::{start, ServerHandle};
