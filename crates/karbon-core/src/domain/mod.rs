//! Domain entities for Karbon.
//!
//! This module contains pure drawing logic with no infrastructure dependencies.
//!
//! # What is "domain" in Clean Architecture? (for beginners)
//!
//! Clean Architecture organises code into concentric layers.  The innermost
//! layer is called the **domain** (or "entities" layer).  Domain code:
//!
//! - Contains the core rules of the application.
//! - Has **no** imports from OS APIs, input hooks, image files, or UI
//!   frameworks.
//! - Can be compiled and tested on any platform without a display attached.
//! - Defines the data types and operations that make the system uniquely what it
//!   is: in this case, a canvas that only ever reflects the part of global
//!   pointer movement that falls inside one selected monitor.
//!
//! Code in outer layers (infrastructure, application, UI) depends on the domain,
//! but the domain never depends on them.

/// Raster surface and stamping primitives.
pub mod canvas;

/// Global-to-local coordinate conversion with boundary rejection.
pub mod mapper;

/// Enumerated displays and the active display selection.
///
/// See [`monitor::MonitorRegistry`] for the main type.
pub mod monitor;

/// The drawing session that turns pointer samples into canvas mutations.
pub mod session;
