//! ManageDisplayUseCase: active-display selection, re-enumeration, and frame
//! presentation.
//!
//! A display switch touches two collaborators that must agree on the active
//! monitor: the [`DrawingSession`] (mapping + canvas size) and the
//! [`PresentationSurface`] (window geometry).  The session is switched first,
//! under its lock; the surface is reconfigured afterwards with the record the
//! session actually adopted.
//!
//! # Lock order
//!
//! Callers that keep the surface behind a lock must acquire it *before*
//! calling into this module.  The session lock is always the inner one, which
//! matches the presentation loop (surface → session) and rules out deadlock.
//!
//! [`DrawingSession`]: karbon_core::DrawingSession

use image::RgbImage;
use karbon_core::{Monitor, RegistryError};
use thiserror::Error;
use tracing::info;

use super::draw_input::{lock_session, SharedSession};
use crate::infrastructure::screen_info::{PlatformScreenEnumerator, ScreenInfoError};

/// Error type for display management operations.
#[derive(Debug, Error)]
pub enum DisplayError {
    #[error(transparent)]
    Registry(#[from] RegistryError),
    #[error(transparent)]
    ScreenInfo(#[from] ScreenInfoError),
}

/// The on-screen presentation of the canvas.
///
/// Implementations own whatever window or buffer shows the canvas to the user.
/// They never see the session itself, only full-frame copies.
#[cfg_attr(test, mockall::automock)]
pub trait PresentationSurface: Send {
    /// Adopts the geometry of a newly selected monitor.
    fn reconfigure(&mut self, monitor: &Monitor);

    /// Shows one complete frame.
    fn present(&mut self, frame: &RgbImage);
}

/// Snapshot of the monitor set for listing in the UI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonitorListing {
    pub monitors: Vec<Monitor>,
    pub active_index: usize,
}

/// Returns the enumerated monitors and which one is active.
pub fn list_monitors(session: &SharedSession) -> MonitorListing {
    let guard = lock_session(session);
    MonitorListing {
        monitors: guard.registry().monitors().to_vec(),
        active_index: guard.registry().active_index(),
    }
}

/// Makes the monitor at `index` the drawing target.
///
/// The canvas is cleared and resized and the surface reconfigured, even when
/// `index` is already active.
///
/// # Errors
///
/// Returns [`RegistryError::InvalidMonitorIndex`] for an out-of-range index;
/// nothing is changed and the surface is not touched.
pub fn select_monitor(
    session: &SharedSession,
    surface: &mut dyn PresentationSurface,
    index: usize,
) -> Result<Monitor, RegistryError> {
    let monitor = lock_session(session).select_monitor(index)?;
    surface.reconfigure(&monitor);
    info!("drawing on {}", monitor.label());
    Ok(monitor)
}

/// Makes the monitor with the given picker label the drawing target.
///
/// # Errors
///
/// Returns [`RegistryError::UnknownLabel`] if no monitor carries `label`.
pub fn select_monitor_by_label(
    session: &SharedSession,
    surface: &mut dyn PresentationSurface,
    label: &str,
) -> Result<Monitor, RegistryError> {
    let monitor = lock_session(session).select_monitor_by_label(label)?;
    surface.reconfigure(&monitor);
    info!("drawing on {}", monitor.label());
    Ok(monitor)
}

/// Re-enumerates displays and installs the new set.
///
/// The active index survives if still valid.  The canvas is reset and the
/// surface reconfigured only when the active monitor record changed.
///
/// # Errors
///
/// Returns [`DisplayError::ScreenInfo`] if enumeration fails; the session is
/// left untouched.
pub fn refresh_monitors(
    session: &SharedSession,
    surface: &mut dyn PresentationSurface,
    enumerator: &dyn PlatformScreenEnumerator,
) -> Result<Monitor, DisplayError> {
    let monitors = enumerator.enumerate_monitors()?;
    let count = monitors.len();

    let (before, after) = {
        let mut guard = lock_session(session);
        let before = guard.active_monitor();
        let after = guard.replace_monitors(monitors)?;
        (before, after)
    };

    info!("re-enumerated {count} monitor(s)");
    if before != after {
        surface.reconfigure(&after);
        info!("active display changed to {}", after.label());
    }
    Ok(after)
}

/// Copies the canvas under the session lock and presents it outside the lock.
pub fn present_frame(session: &SharedSession, surface: &mut dyn PresentationSurface) {
    let frame = lock_session(session).snapshot();
    surface.present(&frame);
}

// ── Tests ─────────────────────────────────────────────────────────────────────
