//! Storage infrastructure: configuration file and image persistence.
//!
//! This module is the thin adapter between the application and the file
//! system:
//!
//! - `config` reads the TOML configuration from the platform-appropriate
//!   directory and provides defaults when the file does not exist yet.
//! - `image_store` encodes canvas copies as PNG, manages the snapshot folder,
//!   and validates directories picked for save-as.

pub mod config;
pub mod image_store;
