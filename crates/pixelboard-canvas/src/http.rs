//! HTTP Transport
//!
//! axum routes binding the canvas service to the network. Handlers only
//! decode, encode and delegate.

use axum::{
    body::Bytes,
    extract::{DefaultBodyLimit, State},
    http::header,
    response::{
        sse::{Event, Sse},
        IntoResponse,
    },
    routing::{get, post},
    Json, Router,
};
use futures::stream::{self, Stream};
use serde::Serialize;
use std::convert::Infallible;
use std::path::Path;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tower_http::services::ServeFile;
use tracing::debug;

use crate::encode;
use crate::error::Result;
use crate::ingest;
use crate::service::{CanvasService, Subscription};

/// Literal payload of every update frame
pub const UPDATE_EVENT_DATA: &str = "update";

/// Shared state for the canvas handlers
#[derive(Clone)]
pub struct CanvasState {
    /// Canvas service
    pub service: Arc<CanvasService>,
    /// Cancelled on server shutdown to end open update streams
    pub shutdown: CancellationToken,
}

impl CanvasState {
    /// Create a new canvas state
    #[must_use]
    pub fn new(service: Arc<CanvasService>, shutdown: CancellationToken) -> Self {
        Self { service, shutdown }
    }
}

/// Build the canvas router.
///
/// `index_path` is served verbatim at `/`; `max_body_bytes` caps paint batches.
pub fn canvas_router(
    state: CanvasState,
    index_path: impl AsRef<Path>,
    max_body_bytes: usize,
) -> Router {
    Router::new()
        .route_service("/", ServeFile::new(index_path.as_ref()))
        .route("/pixels", get(pixels_handler))
        .route("/palette", get(palette_handler))
        .route(
            "/mouse_events",
            post(mouse_events_handler).layer(DefaultBodyLimit::max(max_body_bytes)),
        )
        .route("/events", get(events_handler))
        .route("/health", get(health_handler))
        .with_state(state)
}

async fn pixels_handler(State(state): State<CanvasState>) -> Result<impl IntoResponse> {
    debug!("Serving pixels");
    let raster = state.service.snapshot();
    let png = encode::encode_png(&raster, state.service.palette())?;
    Ok(([(header::CONTENT_TYPE, "image/png")], png))
}

async fn palette_handler(State(state): State<CanvasState>) -> Result<impl IntoResponse> {
    debug!("Serving palette");
    let json = encode::palette_json(state.service.palette())?;
    Ok(([(header::CONTENT_TYPE, "application/json")], json))
}

async fn mouse_events_handler(State(state): State<CanvasState>, body: Bytes) -> Result<()> {
    let events = ingest::parse_batch(&body)?;
    state.service.apply_batch(&events);
    Ok(())
}

async fn events_handler(State(state): State<CanvasState>) -> impl IntoResponse {
    let subscription = state.service.subscribe();
    let stream = update_stream(subscription, state.shutdown.clone());
    ([(header::CONNECTION, "keep-alive")], Sse::new(stream))
}

/// One `data: update` frame per notification.
///
/// Ends on shutdown. When the client goes away the stream is dropped, which
/// drops the subscription and unregisters it.
fn update_stream(
    subscription: Subscription,
    shutdown: CancellationToken,
) -> impl Stream<Item = std::result::Result<Event, Infallible>> {
    stream::unfold((subscription, shutdown), |(mut subscription, shutdown)| async move {
        let notified = tokio::select! {
            _ = shutdown.cancelled() => None,
            notified = subscription.recv() => notified,
        };
        notified.map(|()| {
            (
                Ok::<_, Infallible>(Event::default().data(UPDATE_EVENT_DATA)),
                (subscription, shutdown),
            )
        })
    })
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
    width: u32,
    height: u32,
    subscribers: usize,
}

async fn health_handler(State(state): State<CanvasState>) -> Json<HealthResponse> {
    let (width, height) = state.service.dimensions();
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
        width,
        height,
        subscribers: state.service.subscriber_count(),
    })
}
