//! Presentation surfaces.
//!
//! The window toolkit is outside this crate, so the binary ships a
//! [`HeadlessSurface`]: it accepts frames at the presentation cadence, checks
//! them against the configured monitor, and keeps counters that the `status`
//! command reports.  A windowed front end implements the same
//! [`PresentationSurface`] trait.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use image::RgbImage;
use karbon_core::Monitor;
use tracing::{debug, info};

use crate::application::manage_display::PresentationSurface;

/// Counters shared between a surface and whoever reports on it.
#[derive(Debug, Default)]
pub struct FrameCounters {
    presented: AtomicU64,
    mismatched: AtomicU64,
    reconfigured: AtomicU64,
}

impl FrameCounters {
    /// Frames whose size matched the configured monitor.
    pub fn presented(&self) -> u64 {
        self.presented.load(Ordering::Relaxed)
    }

    /// Frames skipped because their size did not match (a copy taken just
    /// before a display switch).
    pub fn mismatched(&self) -> u64 {
        self.mismatched.load(Ordering::Relaxed)
    }

    /// Number of `reconfigure` calls.
    pub fn reconfigured(&self) -> u64 {
        self.reconfigured.load(Ordering::Relaxed)
    }
}

/// A surface with no window.
#[derive(Debug)]
pub struct HeadlessSurface {
    monitor: Monitor,
    counters: Arc<FrameCounters>,
}

impl HeadlessSurface {
    /// Creates a surface configured for `monitor`.
    pub fn new(monitor: Monitor) -> Self {
        Self {
            monitor,
            counters: Arc::new(FrameCounters::default()),
        }
    }

    /// The monitor the surface is currently configured for.
    pub fn monitor(&self) -> Monitor {
        self.monitor
    }

    /// Shared handle to this surface's counters.
    pub fn counters(&self) -> Arc<FrameCounters> {
        Arc::clone(&self.counters)
    }
}

impl PresentationSurface for HeadlessSurface {
    fn reconfigure(&mut self, monitor: &Monitor) {
        self.monitor = *monitor;
        self.counters.reconfigured.fetch_add(1, Ordering::Relaxed);
        info!(
            "presentation surface now {}x{} at ({}, {})",
            monitor.width, monitor.height, monitor.x, monitor.y
        );
    }

    fn present(&mut self, frame: &RgbImage) {
        if frame.dimensions() != (self.monitor.width, self.monitor.height) {
            self.counters.mismatched.fetch_add(1, Ordering::Relaxed);
            debug!(
                "skipping {}x{} frame for {}",
                frame.width(),
                frame.height(),
                self.monitor.label()
            );
            return;
        }
        self.counters.presented.fetch_add(1, Ordering::Relaxed);
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_present_counts_matching_frames() {
        let mut surface = HeadlessSurface::new(Monitor::new(0, 0, 0, 8, 6));
        let counters = surface.counters();

        surface.present(&RgbImage::new(8, 6));
        surface.present(&RgbImage::new(8, 6));

        assert_eq!(counters.presented(), 2);
        assert_eq!(counters.mismatched(), 0);
    }

    #[test]
    fn test_present_skips_frame_from_previous_display() {
        // Arrange
        let mut surface = HeadlessSurface::new(Monitor::new(0, 0, 0, 8, 6));
        let counters = surface.counters();

        // Act
        surface.reconfigure(&Monitor::new(1, 8, 0, 4, 4));
        surface.present(&RgbImage::new(8, 6));

        // Assert
        assert_eq!(counters.presented(), 0);
        assert_eq!(counters.mismatched(), 1);
        assert_eq!(counters.reconfigured(), 1);
        assert_eq!(surface.monitor().x, 8);
    }
}
