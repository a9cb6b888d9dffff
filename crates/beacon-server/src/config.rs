//! Server configuration.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::tls::TlsFiles;

/// Configuration for the relay server.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Host to bind (default `"0.0.0.0"` so other devices on the network can
    /// reach it).
    pub host: String,
    /// Port to bind (default 8000).
    pub port: u16,
    /// Per-subscriber outbound queue depth. A subscriber that falls this far
    /// behind is evicted.
    pub max_send_queue: usize,
    /// Idle seconds between keepalive frames on an event stream.
    pub keepalive_secs: u64,
    /// Directory served as static files; `assets/` under it feeds
    /// `/api/files`.
    pub serve_dir: PathBuf,
    /// Certificate pair for HTTPS; plain HTTP when absent.
    pub tls: Option<TlsFiles>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".into(),
            port: 8000,
            max_send_queue: 256,
            keepalive_secs: 15,
            serve_dir: PathBuf::from("."),
            tls: None,
        }
    }
}
