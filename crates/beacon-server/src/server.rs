//! Server lifecycle: router construction, socket binding, TLS wrapping.

use std::io;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::routing::{get, post};
use axum::Router;
use axum_server::tls_rustls::RustlsConfig;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use beacon_core::RelayError;

use crate::config::ServerConfig;
use crate::handlers::{self, AppState};
use crate::relay::SubscriberRegistry;

/// Build the Axum router with all routes. Anything outside `/api` is served
/// as a static file from the configured directory.
pub fn build_router(state: AppState) -> Router {
    let static_files = ServeDir::new(state.serve_dir.clone());

    Router::new()
        .route("/api/command", post(handlers::submit_command))
        .route("/api/events", get(handlers::event_stream))
        .route("/api/clients", get(handlers::client_count))
        .route("/api/files", get(handlers::list_assets))
        .fallback_service(static_files)
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

/// Create and start the server. The registry is injected so callers (and
/// tests) own the relay state independently of the HTTP layer.
pub async fn start(
    config: ServerConfig,
    registry: Arc<SubscriberRegistry>,
) -> Result<ServerHandle, RelayError> {
    let state = AppState {
        registry,
        serve_dir: config.serve_dir.clone(),
        keepalive: Duration::from_secs(config.keepalive_secs),
    };
    let router = build_router(state);

    let addr = format!("{}:{}", config.host, config.port);
    let socket_addr: SocketAddr = addr.parse().map_err(|err| RelayError::Bind {
        addr: addr.clone(),
        source: io::Error::new(io::ErrorKind::InvalidInput, err),
    })?;

    match config.tls {
        Some(ref tls) => {
            let rustls = RustlsConfig::from_pem_file(&tls.cert, &tls.key)
                .await
                .map_err(|source| RelayError::Bind {
                    addr: addr.clone(),
                    source,
                })?;

            let handle = axum_server::Handle::new();
            let server = axum_server::bind_rustls(socket_addr, rustls).handle(handle.clone());
            let task = tokio::spawn(async move {
                server.serve(router.into_make_service()).await.ok();
            });

            let Some(bound) = handle.listening().await else {
                return Err(RelayError::Bind {
                    addr,
                    source: io::Error::new(io::ErrorKind::AddrInUse, "listener failed to start"),
                });
            };
            tracing::info!(addr = %bound, tls = true, "relay server started");
            Ok(ServerHandle {
                addr: bound,
                tls: true,
                _server: task,
            })
        }
        None => {
            let listener =
                TcpListener::bind(socket_addr)
                    .await
                    .map_err(|source| RelayError::Bind {
                        addr: addr.clone(),
                        source,
                    })?;
            let bound = listener.local_addr().map_err(|source| RelayError::Bind {
                addr,
                source,
            })?;

            let task = tokio::spawn(async move {
                axum::serve(listener, router).await.ok();
            });

            tracing::info!(addr = %bound, tls = false, "relay server started");
            Ok(ServerHandle {
                addr: bound,
                tls: false,
                _server: task,
            })
        }
    }
}

/// Handle returned by [`start`]; keeps the accept loop alive. Dropping it
/// does not wait for open sessions, and process shutdown never joins them.
#[derive(Debug)]
pub struct ServerHandle {
    addr: SocketAddr,
    tls: bool,
    _server: tokio::task::JoinHandle<()>,
}

impl ServerHandle {
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    pub fn port(&self) -> u16 {
        self.addr.port()
    }

    pub fn scheme(&self) -> &'static str {
        if self.tls {
            "https"
        } else {
            "http"
        }
    }
}
