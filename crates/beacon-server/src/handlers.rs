//! HTTP handlers for the relay API.

use std::convert::Infallible;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::sse::{Event, KeepAlive, Sse};
use axum::response::{IntoResponse, Response};
use axum::Json;
use futures::StreamExt;
use serde_json::json;

use beacon_core::Command;

use crate::assets;
use crate::relay::SubscriberRegistry;
use crate::stream::EventStream;

/// Shared application state passed to Axum handlers.
#[derive(Clone)]
pub struct AppState {
    pub registry: Arc<SubscriberRegistry>,
    pub serve_dir: PathBuf,
    pub keepalive: Duration,
}

/// `POST /api/command`: parse one command and fan it out.
///
/// The body may be any JSON document; non-JSON gets a bare 400. Delivery
/// failures never surface here: a dead subscriber is the registry's problem.
pub async fn submit_command(State(state): State<AppState>, body: Bytes) -> Response {
    match Command::parse(&body) {
        Ok(command) => {
            let delivered = state.registry.broadcast(&command);
            tracing::debug!(command = ?command.command_type(), delivered, "command relayed");
            Json(json!({ "ok": true })).into_response()
        }
        Err(err) => {
            tracing::debug!(error = %err, "rejected command");
            StatusCode::BAD_REQUEST.into_response()
        }
    }
}

/// `GET /api/events`: open a persistent event stream.
///
/// Keepalive comment frames are emitted on idle so proxies keep the
/// connection open and dead peers are detected by a failed write.
pub async fn event_stream(State(state): State<AppState>) -> impl IntoResponse {
    let frames = EventStream::open(Arc::clone(&state.registry))
        .map(|frame| Ok::<_, Infallible>(Event::default().data(frame)));

    let sse = Sse::new(frames)
        .keep_alive(KeepAlive::new().interval(state.keepalive).text("keepalive"));

    (
        [
            (header::CACHE_CONTROL, "no-cache"),
            (header::CONNECTION, "keep-alive"),
        ],
        sse,
    )
}

/// `GET /api/clients`: current subscriber count.
pub async fn client_count(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(json!({ "count": state.registry.count() }))
}

/// `GET /api/files`: listing of the assets directory.
pub async fn list_assets(State(state): State<AppState>) -> Json<Vec<assets::AssetEntry>> {
    Json(assets::scan(&state.serve_dir))
}
