//! # karbon-core
//!
//! Shared library for Karbon containing the monitor registry, the coordinate
//! mapper, and the canvas stamping engine.
//!
//! This crate is used by the desktop application crate (`karbon-app`).
//! It has zero dependencies on OS APIs, UI frameworks, threads, or the file
//! system.
//!
//! # Architecture overview (for beginners)
//!
//! Karbon turns mouse activity into art: every time the pointer moves or a
//! button is clicked anywhere on the desktop, a dot or a circle is stamped
//! onto a canvas the size of one monitor.  Later the canvas can be saved as a
//! PNG.
//!
//! This crate (`karbon-core`) is the pure foundation.  It defines:
//!
//! - **`domain::monitor`** – The displays attached to the machine and which one
//!   is currently "active" (the drawing target).
//!
//! - **`domain::mapper`** – Converts a global desktop coordinate into a local
//!   canvas coordinate, or rejects it when it falls outside the active display.
//!
//! - **`domain::canvas`** – The raster surface plus the stamping primitives
//!   (single pixel, line segment, filled circle).
//!
//! - **`domain::session`** – Glues the three together: one pointer sample in,
//!   exactly one canvas mutation (or none) out.

pub mod domain;

// Re-export the most-used types at the crate root so callers can write
// `karbon_core::DrawingSession` instead of `karbon_core::domain::session::DrawingSession`.
pub use domain::canvas::{
    disc_contains, Canvas, Color, BACKGROUND_COLOR, PRIMARY_CLICK_COLOR, PRIMARY_CLICK_RADIUS,
    SECONDARY_CLICK_COLOR, SECONDARY_CLICK_RADIUS, TRAIL_COLOR,
};
pub use domain::mapper::CoordinateMapper;
pub use domain::monitor::{Monitor, MonitorRegistry, RegistryError};
pub use domain::session::{
    DrawingSession, MouseButton, PointerSample, SampleKind, SampleOutcome, SessionState,
    SessionStats, Stroke,
};
