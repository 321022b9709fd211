//! Pixelboard Canvas - Shared Pixel Canvas
//!
//! This crate provides the shared canvas for Pixelboard:
//! - Palette: the fixed color table (index -> RGBA)
//! - Raster: the indexed-color pixel grid
//! - Ingest: paint event batches and their application
//! - Registry: live-update subscribers
//! - Scheduler: broadcast rate limiting
//! - Service: the single locked owner of raster, registry and clock
//! - Http: axum routes for snapshots, painting and the update stream
//! - Error: Error types for canvas operations
//!
//! ## Usage
//!
//! ```ignore
//! use pixelboard_canvas::{canvas_router, CanvasConfig, CanvasService, CanvasState, Palette};
//! use std::sync::Arc;
//! use tokio_util::sync::CancellationToken;
//!
//! let service = Arc::new(CanvasService::new(Palette::burn(), &CanvasConfig::default())?);
//! let state = CanvasState::new(service, CancellationToken::new());
//! let app = canvas_router(state, "index.html", 64 * 1024);
//! ```
//!
//! ## Configuration
//!
//! ```toml
//! [canvas]
//! width = 320
//! height = 200
//! paint_color = "#ff0000ff"
//! broadcast_interval_ms = 50
//! ```
//!
//! ## Update contract
//!
//! Notifications on `/events` are hints, at most one per broadcast window.
//! A viewer must fetch `/pixels` once when it connects and again after each
//! `update` frame; nothing is sent on connect unless `notify_on_connect` is set.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod config;
pub mod encode;
pub mod error;
pub mod http;
pub mod ingest;
pub mod palette;
pub mod raster;
pub mod registry;
pub mod scheduler;
pub mod service;

// Re-export main types
pub use config::CanvasConfig;
pub use error::{Error, Result};
pub use http::{canvas_router, CanvasState};
pub use ingest::{BatchOutcome, PaintEvent};
pub use palette::{Palette, Rgba};
pub use raster::Raster;
pub use registry::{SubscriberId, SubscriberRegistry};
pub use scheduler::BroadcastScheduler;
pub use service::{CanvasService, Subscription};
