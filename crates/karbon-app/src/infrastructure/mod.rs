//! Infrastructure layer for Karbon.
//!
//! Contains OS-facing adapters: global pointer capture, monitor enumeration,
//! presentation surfaces, file-system storage, and the command bridge used by
//! the console front end.
//!
//! **Dependency rule**: this layer may depend on `application` and
//! `karbon_core`, but the domain never imports it.

pub mod input_capture;
pub mod presentation;
pub mod screen_info;
pub mod storage;
pub mod ui_bridge;
