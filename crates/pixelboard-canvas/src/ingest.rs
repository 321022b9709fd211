//! Event Ingest
//!
//! Parses paint batches and applies them to a raster. Parsing always finishes
//! before anything is applied, so a malformed batch never half-lands.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};
use crate::raster::Raster;

/// One paint command from a client
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaintEvent {
    /// Pointer event kind ("down", "move", ...), only logged
    #[serde(rename = "t", default)]
    pub kind: String,
    /// Column
    #[serde(default)]
    pub x: i64,
    /// Row
    #[serde(default)]
    pub y: i64,
}

impl PaintEvent {
    /// Create a paint event
    #[must_use]
    pub fn new(kind: impl Into<String>, x: i64, y: i64) -> Self {
        Self {
            kind: kind.into(),
            x,
            y,
        }
    }
}

/// What happened to one batch
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchOutcome {
    /// Events inside the canvas, including repaints with the same index
    pub applied: usize,
    /// Events dropped for out-of-range coordinates
    pub skipped: usize,
    /// Subscribers notified (0 when the broadcast window was still closed)
    pub notified: usize,
    /// Whether the batch triggered a broadcast
    pub broadcast: bool,
}

/// Decode a JSON array of paint events
pub fn parse_batch(body: &[u8]) -> Result<Vec<PaintEvent>> {
    serde_json::from_slice(body).map_err(|e| Error::invalid_batch(e.to_string()))
}

/// Apply `events` in order with the paint color `index`.
///
/// Returns the outcome with `applied` and `skipped` filled in.
pub fn apply_events(raster: &mut Raster, events: &[PaintEvent], index: u8) -> BatchOutcome {
    let mut outcome = BatchOutcome::default();
    for event in events {
        debug!(kind = %event.kind, x = event.x, y = event.y, "Processing paint event");
        if raster.set_pixel(event.x, event.y, index) {
            outcome.applied += 1;
        } else {
            outcome.skipped += 1;
        }
    }
    outcome
}
