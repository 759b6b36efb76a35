//! Monitor enumeration.
//!
//! Detects the connected displays, their origins in global desktop space, and
//! their logical sizes so the user can pick one as the drawing target.
//!
//! # Why is the origin important?
//!
//! Pointer positions arrive in global desktop coordinates.  A display placed
//! to the left of the primary one has a negative `x`; without its origin the
//! mapper could not tell "10 px into monitor 2" from "10 px into monitor 1".
//!
//! # Implementations
//!
//! | Type                        | Source                                        |
//! |-----------------------------|-----------------------------------------------|
//! | [`DisplayInfoEnumerator`]   | the `display-info` crate (Windows/X11/macOS)  |
//! | [`MockScreenEnumerator`]    | a fixed list, for tests                        |
//!
//! Enumeration happens at startup and on an explicit `refresh`; hot-plug is
//! not observed.

use karbon_core::Monitor;
use thiserror::Error;

pub mod native;

pub use native::DisplayInfoEnumerator;

/// Error type for screen enumeration operations.
#[derive(Debug, Error)]
pub enum ScreenInfoError {
    /// The platform API call to enumerate monitors failed.
    #[error("platform API error while enumerating monitors: {0}")]
    PlatformError(String),

    /// The platform reported zero displays.
    #[error("no displays detected")]
    NoDisplays,
}

/// Trait for enumerating monitors on the current platform.
///
/// Implementors return an ordered, non-empty list of [`Monitor`] records.
/// Record `i` carries `id == i`.
pub trait PlatformScreenEnumerator: Send + Sync {
    /// Returns the list of connected monitors.
    ///
    /// # Errors
    ///
    /// Returns [`ScreenInfoError::PlatformError`] if the OS API call fails and
    /// [`ScreenInfoError::NoDisplays`] if it succeeds with an empty list.
    fn enumerate_monitors(&self) -> Result<Vec<Monitor>, ScreenInfoError>;
}

// ── Mock implementation (always compiled for tests) ───────────────────────────

/// A mock screen enumerator that returns a configurable list of monitors.
///
/// Does not make any OS calls; the monitor list is provided at construction.
///
/// # Example
///
/// ```
/// use karbon_app::infrastructure::screen_info::{MockScreenEnumerator, PlatformScreenEnumerator};
///
/// let enumerator = MockScreenEnumerator::single_1080p();
/// assert_eq!(enumerator.enumerate_monitors().unwrap().len(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct MockScreenEnumerator {
    /// The fixed list of monitors that this enumerator returns.
    pub monitors: Vec<Monitor>,
}

impl MockScreenEnumerator {
    /// A single 1920×1080 monitor at the origin.
    pub fn single_1080p() -> Self {
        Self {
            monitors: vec![Monitor::new(0, 0, 0, 1920, 1080)],
        }
    }

    /// Two 1920×1080 monitors side by side; the second starts at x = 1920.
    pub fn dual_1080p() -> Self {
        Self {
            monitors: vec![
                Monitor::new(0, 0, 0, 1920, 1080),
                Monitor::new(1, 1920, 0, 1920, 1080),
            ],
        }
    }
}

impl PlatformScreenEnumerator for MockScreenEnumerator {
    fn enumerate_monitors(&self) -> Result<Vec<Monitor>, ScreenInfoError> {
        if self.monitors.is_empty() {
            return Err(ScreenInfoError::NoDisplays);
        }
        Ok(self.monitors.clone())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_enumerator_single_1080p_returns_one_monitor() {
        // Arrange
        let enumerator = MockScreenEnumerator::single_1080p();

        // Act
        let monitors = enumerator.enumerate_monitors().expect("enumerate");

        // Assert
        assert_eq!(monitors.len(), 1);
        assert_eq!((monitors[0].width, monitors[0].height), (1920, 1080));
    }

    #[test]
    fn test_mock_enumerator_dual_1080p_places_second_monitor_to_the_right() {
        let monitors = MockScreenEnumerator::dual_1080p()
            .enumerate_monitors()
            .expect("enumerate");

        assert_eq!(monitors.len(), 2);
        assert_eq!(monitors[1].x, 1920);
        assert_eq!(monitors[1].id, 1);
    }

    #[test]
    fn test_mock_enumerator_with_empty_list_reports_no_displays() {
        let enumerator = MockScreenEnumerator {
            monitors: Vec::new(),
        };
        assert!(matches!(
            enumerator.enumerate_monitors(),
            Err(ScreenInfoError::NoDisplays)
        ));
    }
}
