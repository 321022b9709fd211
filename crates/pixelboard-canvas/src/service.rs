//! Shared Canvas Service
//!
//! Owns the raster, the subscriber registry and the broadcast clock behind a
//! single mutex. Every read and write of shared state happens inside one
//! critical section, and nothing inside it awaits or does I/O.

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Instant;

use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::config::CanvasConfig;
use crate::error::Result;
use crate::ingest::{self, BatchOutcome, PaintEvent};
use crate::palette::Palette;
use crate::raster::Raster;
use crate::registry::{SubscriberId, SubscriberRegistry};
use crate::scheduler::BroadcastScheduler;

struct CanvasInner {
    raster: Raster,
    registry: SubscriberRegistry,
    scheduler: BroadcastScheduler,
}

/// The one owner of all mutable canvas state
pub struct CanvasService {
    palette: Palette,
    paint_index: u8,
    background_index: u8,
    notify_on_connect: bool,
    inner: Mutex<CanvasInner>,
}

impl CanvasService {
    /// Create a service from a palette and validated settings
    pub fn new(palette: Palette, config: &CanvasConfig) -> Result<Self> {
        Self::with_clock(palette, config, Instant::now())
    }

    /// Create a service whose broadcast clock starts at `now`
    pub fn with_clock(palette: Palette, config: &CanvasConfig, now: Instant) -> Result<Self> {
        let paint_index = config.validate(&palette)?;
        info!(
            width = config.width,
            height = config.height,
            paint_index,
            interval_ms = config.broadcast_interval_ms,
            "Canvas created"
        );
        Ok(Self {
            palette,
            paint_index,
            background_index: config.background_index,
            notify_on_connect: config.notify_on_connect,
            inner: Mutex::new(CanvasInner {
                raster: Raster::new(config.width, config.height, config.background_index),
                registry: SubscriberRegistry::new(config.subscriber_buffer),
                scheduler: BroadcastScheduler::new(config.broadcast_interval(), now),
            }),
        })
    }

    // A panic inside a critical section cannot leave a half-written pixel,
    // so a poisoned lock is still safe to use.
    fn lock(&self) -> MutexGuard<'_, CanvasInner> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// The color table
    #[must_use]
    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    /// Palette index painted by every event
    #[must_use]
    pub fn paint_index(&self) -> u8 {
        self.paint_index
    }

    /// Palette index of untouched pixels
    #[must_use]
    pub fn background_index(&self) -> u8 {
        self.background_index
    }

    /// Canvas width and height
    #[must_use]
    pub fn dimensions(&self) -> (u32, u32) {
        let inner = self.lock();
        (inner.raster.width(), inner.raster.height())
    }

    /// Consistent copy of the whole raster
    #[must_use]
    pub fn snapshot(&self) -> Raster {
        self.lock().raster.clone()
    }

    /// Apply a parsed batch and maybe notify subscribers
    pub fn apply_batch(&self, events: &[PaintEvent]) -> BatchOutcome {
        let mut inner = self.lock();
        // Read the clock under the lock: the window is judged at mutation time.
        self.apply_locked(&mut inner, events, Instant::now())
    }

    /// Apply a parsed batch as if it arrived at `now`.
    ///
    /// The whole batch and the broadcast decision share one critical section.
    pub fn apply_batch_at(&self, events: &[PaintEvent], now: Instant) -> BatchOutcome {
        let mut inner = self.lock();
        self.apply_locked(&mut inner, events, now)
    }

    fn apply_locked(
        &self,
        inner: &mut CanvasInner,
        events: &[PaintEvent],
        now: Instant,
    ) -> BatchOutcome {
        let mut outcome = ingest::apply_events(&mut inner.raster, events, self.paint_index);
        if inner.scheduler.should_broadcast(now) {
            outcome.broadcast = true;
            outcome.notified = inner.registry.broadcast();
        }

        debug!(
            applied = outcome.applied,
            skipped = outcome.skipped,
            broadcast = outcome.broadcast,
            notified = outcome.notified,
            "Paint batch applied"
        );
        outcome
    }

    /// Register a live-update subscriber.
    ///
    /// The returned guard unregisters itself when dropped.
    #[must_use]
    pub fn subscribe(self: &Arc<Self>) -> Subscription {
        let mut inner = self.lock();
        let (id, receiver) = inner.registry.register();
        if self.notify_on_connect {
            inner.registry.notify(id);
        }
        let count = inner.registry.len();
        drop(inner);

        info!(subscriber = %id, subscribers = count, "Subscriber connected");
        Subscription {
            id,
            receiver,
            service: Arc::clone(self),
        }
    }

    /// Remove a subscriber; removing twice is a no-op
    pub fn unregister(&self, id: SubscriberId) -> bool {
        self.lock().registry.unregister(id)
    }

    /// Number of live subscribers
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.lock().registry.len()
    }
}

/// A registered live-update channel, tied to one viewer connection
pub struct Subscription {
    id: SubscriberId,
    receiver: mpsc::Receiver<()>,
    service: Arc<CanvasService>,
}

impl Subscription {
    /// Registry identity
    #[must_use]
    pub fn id(&self) -> SubscriberId {
        self.id
    }

    /// Wait for the next notification. `None` once unregistered.
    pub async fn recv(&mut self) -> Option<()> {
        self.receiver.recv().await
    }

    /// Take a pending notification without waiting
    pub fn try_recv(&mut self) -> Option<()> {
        self.receiver.try_recv().ok()
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if self.service.unregister(self.id) {
            info!(subscriber = %self.id, "Subscriber disconnected");
        }
    }
}
