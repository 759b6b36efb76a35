//! Application layer use cases for Karbon.
//!
//! # What is the "application" layer? (for beginners)
//!
//! In Clean Architecture the *application* layer sits between the domain
//! (pure drawing rules in `karbon-core`) and the infrastructure (OS input,
//! monitors, files).
//!
//! Use cases in this layer:
//!
//! - **Orchestrate** domain objects to fulfil a user goal (e.g., "save what
//!   has been drawn so far as a PNG").
//! - **Depend on abstractions** (traits) rather than concrete implementations,
//!   so the infrastructure can be swapped without changing this code.
//! - **Own the locking discipline** around the shared [`DrawingSession`]: every
//!   critical section is one primitive or one full-canvas copy.
//!
//! # Sub-modules
//!
//! - **`draw_input`** – Consumes raw pointer events on a dedicated worker
//!   thread and applies each one to the session.  This is the hot path; it
//!   runs for every mouse movement.
//!
//! - **`manage_display`** – Display selection, re-enumeration, and frame
//!   presentation through the [`manage_display::PresentationSurface`] seam.
//!
//! - **`persist_canvas`** – Snapshot / save-as: copy under the lock, encode
//!   and write outside it through the [`persist_canvas::ImageSink`] seam.
//!
//! [`DrawingSession`]: karbon_core::DrawingSession

pub mod draw_input;
pub mod manage_display;
pub mod persist_canvas;
