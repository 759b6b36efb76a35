//! Native monitor enumeration via the `display-info` crate.
//!
//! `display-info` wraps `EnumDisplayMonitors` on Windows, XRandR on Linux,
//! and `CGGetActiveDisplayList` on macOS behind one call.  Records are kept in
//! the order the platform reports them and renumbered `0..n`.

use display_info::DisplayInfo;
use karbon_core::Monitor;
use tracing::debug;

use super::{PlatformScreenEnumerator, ScreenInfoError};

/// [`PlatformScreenEnumerator`] backed by [`DisplayInfo::all`].
#[derive(Debug, Default, Clone, Copy)]
pub struct DisplayInfoEnumerator;

impl DisplayInfoEnumerator {
    /// Creates a new `DisplayInfoEnumerator`.
    pub fn new() -> Self {
        Self
    }
}

impl PlatformScreenEnumerator for DisplayInfoEnumerator {
    fn enumerate_monitors(&self) -> Result<Vec<Monitor>, ScreenInfoError> {
        let displays =
            DisplayInfo::all().map_err(|e| ScreenInfoError::PlatformError(e.to_string()))?;

        let monitors: Vec<Monitor> = displays
            .iter()
            .enumerate()
            .map(|(i, d)| Monitor::new(i, d.x, d.y, d.width, d.height))
            .collect();

        if monitors.is_empty() {
            return Err(ScreenInfoError::NoDisplays);
        }
        for m in &monitors {
            debug!("found {} at ({}, {})", m.label(), m.x, m.y);
        }
        Ok(monitors)
    }
}
