//! Integration tests for Pixelboard
//!
//! These tests drive the full HTTP surface through the axum router:
//! - /mouse_events: batch parsing and painting
//! - /pixels and /palette: snapshots
//! - /events: the live update stream
//! - /: the static index page

use std::sync::Arc;
use std::time::Duration;

use axum::body::{Body, Bytes};
use axum::http::{header, Request, StatusCode};
use axum::response::Response;
use axum::Router;
use futures::StreamExt;
use pixelboard_canvas::{canvas_router, CanvasConfig, CanvasService, CanvasState, Palette};
use tokio_util::sync::CancellationToken;
use tower::ServiceExt;

const BODY_LIMIT: usize = 1024;

struct TestApp {
    router: Router,
    service: Arc<CanvasService>,
    shutdown: CancellationToken,
}

impl TestApp {
    fn new() -> Self {
        Self::with_config(CanvasConfig::default(), "does-not-exist.html")
    }

    fn with_config(config: CanvasConfig, index_path: &str) -> Self {
        let service = Arc::new(CanvasService::new(Palette::burn(), &config).unwrap());
        let shutdown = CancellationToken::new();
        let state = CanvasState::new(Arc::clone(&service), shutdown.clone());
        Self {
            router: canvas_router(state, index_path, BODY_LIMIT),
            service,
            shutdown,
        }
    }

    async fn send(&self, request: Request<Body>) -> Response {
        self.router.clone().oneshot(request).await.unwrap()
    }

    async fn get(&self, uri: &str) -> Response {
        self.send(Request::get(uri).body(Body::empty()).unwrap())
            .await
    }

    async fn paint(&self, body: impl Into<Body>) -> Response {
        self.send(
            Request::post("/mouse_events")
                .header(header::CONTENT_TYPE, "application/json")
                .body(body.into())
                .unwrap(),
        )
        .await
    }

    async fn pixels(&self) -> Vec<u8> {
        let response = self.get("/pixels").await;
        assert_eq!(response.status(), StatusCode::OK);
        body_bytes(response).await.to_vec()
    }
}

async fn body_bytes(response: Response) -> Bytes {
    axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap()
}

/// Decode an indexed PNG into (width, height, indices)
fn decode_indices(png_bytes: &[u8]) -> (u32, u32, Vec<u8>) {
    let mut decoder = png::Decoder::new(png_bytes);
    decoder.set_transformations(png::Transformations::IDENTITY);
    let mut reader = decoder.read_info().unwrap();
    let mut buf = vec![0; reader.output_buffer_size()];
    let info = reader.next_frame(&mut buf).unwrap();
    assert_eq!(info.color_type, png::ColorType::Indexed);
    buf.truncate(info.buffer_size());
    (info.width, info.height, buf)
}

fn pixel_at(indices: &[u8], width: u32, x: usize, y: usize) -> u8 {
    indices[y * width as usize + x]
}

// ============================================================================
// Painting
// ============================================================================

#[tokio::test]
async fn test_paint_then_snapshot() {
    let app = TestApp::new();

    let response = app.paint(r#"[{"t":"down","x":10,"y":20}]"#).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_bytes(response).await.is_empty());

    let (width, height, indices) = decode_indices(&app.pixels().await);
    assert_eq!((width, height), (320, 200));
    assert_eq!(pixel_at(&indices, width, 10, 20), app.service.paint_index());
    assert_eq!(pixel_at(&indices, width, 11, 20), 0);
}

#[tokio::test]
async fn test_out_of_range_paint_is_ignored() {
    let app = TestApp::new();
    let before = app.pixels().await;

    let response = app
        .paint(r#"[{"t":"down","x":-1,"y":0},{"t":"move","x":320,"y":0},{"t":"move","x":0,"y":200}]"#)
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(app.pixels().await, before);
}

#[tokio::test]
async fn test_invalid_json_rejected() {
    let app = TestApp::new();
    let before = app.pixels().await;

    let response = app.paint("not json").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(&body_bytes(response).await[..], b"Invalid JSON");

    // a bad event anywhere in the batch rejects all of it
    let response = app
        .paint(r#"[{"t":"down","x":1,"y":1},{"t":"down","x":"two","y":1}]"#)
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(app.pixels().await, before);
}

#[tokio::test]
async fn test_content_type_not_required() {
    let app = TestApp::new();
    let response = app
        .send(
            Request::post("/mouse_events")
                .body(Body::from(r#"[{"t":"down","x":1,"y":2}]"#))
                .unwrap(),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(app.service.snapshot().get(1, 2), Some(app.service.paint_index()));
}

#[tokio::test]
async fn test_empty_batch_ok() {
    let app = TestApp::new();
    let response = app.paint("[]").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(app.service.snapshot().painted(0), 0);
}

#[tokio::test]
async fn test_oversized_batch_rejected() {
    let app = TestApp::new();
    let event = r#"{"t":"move","x":1,"y":1},"#;
    let body = format!("[{}{{}}]", event.repeat(BODY_LIMIT / event.len() + 1));
    let response = app.paint(body).await;
    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(app.service.snapshot().painted(0), 0);
}

#[tokio::test]
async fn test_concurrent_painters_all_land() {
    let app = Arc::new(TestApp::new());
    let mut handles = Vec::new();
    for row in 0..8 {
        let app = Arc::clone(&app);
        handles.push(tokio::spawn(async move {
            let batch: Vec<String> = (0..10)
                .map(|x| format!(r#"{{"t":"move","x":{x},"y":{row}}}"#))
                .collect();
            let response = app.paint(format!("[{}]", batch.join(","))).await;
            assert_eq!(response.status(), StatusCode::OK);
        }));
    }
    for handle in handles {
        handle.await.unwrap();
    }
    assert_eq!(app.service.snapshot().painted(0), 80);
}

// ============================================================================
// Snapshots
// ============================================================================

#[tokio::test]
async fn test_pixels_content_type() {
    let app = TestApp::new();
    let response = app.get("/pixels").await;
    assert_eq!(response.headers()[header::CONTENT_TYPE], "image/png");
    let bytes = body_bytes(response).await;
    assert_eq!(&bytes[0..8], b"\x89PNG\r\n\x1a\n");
}

#[tokio::test]
async fn test_palette_snapshot() {
    let app = TestApp::new();
    let response = app.get("/palette").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CONTENT_TYPE], "application/json");

    let json: serde_json::Value = serde_json::from_slice(&body_bytes(response).await).unwrap();
    let colors = json.as_array().unwrap();
    assert_eq!(colors.len(), 256);
    assert_eq!(colors[0], serde_json::json!({"R": 0, "G": 0, "B": 0, "A": 255}));

    let paint = &colors[usize::from(app.service.paint_index())];
    assert_eq!(paint, &serde_json::json!({"R": 255, "G": 0, "B": 0, "A": 255}));
}

#[tokio::test]
async fn test_health() {
    let app = TestApp::new();
    let response = app.get("/health").await;
    assert_eq!(response.status(), StatusCode::OK);
    let json: serde_json::Value = serde_json::from_slice(&body_bytes(response).await).unwrap();
    assert_eq!(json["status"], "healthy");
    assert_eq!(json["width"], 320);
    assert_eq!(json["height"], 200);
    assert_eq!(json["subscribers"], 0);
}

#[tokio::test]
async fn test_index_page_served_verbatim() {
    let path = std::env::temp_dir().join(format!("pixelboard-index-{}.html", std::process::id()));
    let page = "<!doctype html><title>canvas</title>";
    std::fs::write(&path, page).unwrap();

    let app = TestApp::with_config(CanvasConfig::default(), path.to_str().unwrap());
    let response = app.get("/").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(&body_bytes(response).await[..], page.as_bytes());

    let _ = std::fs::remove_file(&path);
}

#[tokio::test]
async fn test_missing_index_page_is_404() {
    let app = TestApp::new();
    let response = app.get("/").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ============================================================================
// Live updates
// ============================================================================

async fn open_stream(app: &TestApp) -> axum::body::BodyDataStream {
    let response = app.get("/events").await;
    assert_eq!(response.status(), StatusCode::OK);
    response.into_body().into_data_stream()
}

async fn next_frame(stream: &mut axum::body::BodyDataStream, wait: Duration) -> Option<Bytes> {
    match tokio::time::timeout(wait, stream.next()).await {
        Ok(Some(Ok(bytes))) => Some(bytes),
        _ => None,
    }
}

#[tokio::test]
async fn test_events_headers() {
    let app = TestApp::new();
    let response = app.get("/events").await;
    let headers = response.headers();
    assert_eq!(headers[header::CONTENT_TYPE], "text/event-stream");
    assert_eq!(headers[header::CACHE_CONTROL], "no-cache");
    assert_eq!(headers[header::CONNECTION], "keep-alive");
    assert_eq!(app.service.subscriber_count(), 1);
}

#[tokio::test]
async fn test_two_viewers_get_one_update_each() {
    let app = TestApp::new();
    let mut first = open_stream(&app).await;
    let mut second = open_stream(&app).await;
    assert_eq!(app.service.subscriber_count(), 2);

    // let the startup broadcast window pass
    tokio::time::sleep(Duration::from_millis(60)).await;
    let response = app.paint(r#"[{"t":"down","x":3,"y":4}]"#).await;
    assert_eq!(response.status(), StatusCode::OK);

    for stream in [&mut first, &mut second] {
        let frame = next_frame(stream, Duration::from_secs(1)).await.unwrap();
        assert_eq!(&frame[..], b"data: update\n\n");
        assert!(next_frame(stream, Duration::from_millis(100)).await.is_none());
    }
}

#[tokio::test]
async fn test_paint_inside_window_not_announced() {
    let app = TestApp::new();
    let mut stream = open_stream(&app).await;

    tokio::time::sleep(Duration::from_millis(60)).await;
    app.paint(r#"[{"t":"down","x":1,"y":1}]"#).await;
    assert!(next_frame(&mut stream, Duration::from_secs(1)).await.is_some());

    // immediately after a broadcast the window is closed
    app.paint(r#"[{"t":"move","x":2,"y":1}]"#).await;
    assert!(next_frame(&mut stream, Duration::from_millis(20)).await.is_none());

    // the next change after the window announces both
    tokio::time::sleep(Duration::from_millis(60)).await;
    app.paint(r#"[{"t":"move","x":3,"y":1}]"#).await;
    assert!(next_frame(&mut stream, Duration::from_secs(1)).await.is_some());
}

#[tokio::test]
async fn test_closed_viewer_is_unregistered() {
    let app = TestApp::new();
    let stream = open_stream(&app).await;
    let _kept = open_stream(&app).await;
    assert_eq!(app.service.subscriber_count(), 2);

    drop(stream);
    assert_eq!(app.service.subscriber_count(), 1);
}

#[tokio::test]
async fn test_notify_on_connect() {
    let config = CanvasConfig {
        notify_on_connect: true,
        ..CanvasConfig::default()
    };
    let app = TestApp::with_config(config, "does-not-exist.html");
    let mut stream = open_stream(&app).await;
    let frame = next_frame(&mut stream, Duration::from_secs(1)).await.unwrap();
    assert_eq!(&frame[..], b"data: update\n\n");
}

#[tokio::test]
async fn test_shutdown_ends_streams() {
    let app = TestApp::new();
    let mut stream = open_stream(&app).await;

    app.shutdown.cancel();
    let end = tokio::time::timeout(Duration::from_secs(1), stream.next())
        .await
        .unwrap();
    assert!(end.is_none());
    assert_eq!(app.service.subscriber_count(), 0);
}
