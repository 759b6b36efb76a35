//! TOML-based configuration for Karbon.
//!
//! Reads `AppConfig` from the platform-appropriate config file (via `dirs`):
//! - Windows:  `%APPDATA%\Karbon\config.toml`
//! - Linux:    `$XDG_CONFIG_HOME/karbon/config.toml` (or `~/.config/karbon/config.toml`)
//! - macOS:    `~/Library/Application Support/Karbon/config.toml`
//!
//! # Example file
//!
//! ```toml
//! [general]
//! log_level = "info"
//!
//! [display]
//! monitor_index = 1
//!
//! [capture]
//! poll_interval_ms = 8
//! connect_moves = true
//!
//! [presentation]
//! frame_rate = 60
//!
//! [snapshots]
//! directory = "/home/me/Pictures/karbon"
//! ```
//!
//! # Serde default values
//!
//! Every section and every field falls back to a default when absent, so the
//! app works on first run (no file yet) and with older files that lack newer
//! keys.  Colours and stroke sizes are fixed and deliberately not configurable.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

/// Error type for configuration file operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The platform config directory could not be determined.
    #[error("could not determine platform config directory")]
    NoPlatformConfigDir,

    /// A file system I/O error occurred.
    #[error("I/O error accessing config at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The TOML content could not be parsed.
    #[error("failed to parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),
}

// ── Config schema types ───────────────────────────────────────────────────────

/// Top-level application configuration stored on disk.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct AppConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub display: DisplayConfig,
    #[serde(default)]
    pub capture: CaptureConfig,
    #[serde(default)]
    pub presentation: PresentationConfig,
    #[serde(default)]
    pub snapshots: SnapshotConfig,
}

/// Process-wide settings.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct GeneralConfig {
    /// `tracing` log level used when `RUST_LOG` is unset:
    /// `"error"`, `"warn"`, `"info"`, `"debug"`, `"trace"`.
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

/// Initial display selection.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct DisplayConfig {
    /// Zero-based index of the monitor drawn on at startup.  An index that no
    /// longer exists falls back to the first monitor.
    #[serde(default)]
    pub monitor_index: usize,
}

/// Pointer capture settings.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct CaptureConfig {
    /// Interval between pointer polls in milliseconds.
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
    /// Join consecutive in-bounds moves with 1 px line segments.
    #[serde(default)]
    pub connect_moves: bool,
}

/// Presentation loop settings.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct PresentationConfig {
    /// Frames presented per second.
    #[serde(default = "default_frame_rate")]
    pub frame_rate: u32,
}

/// Snapshot output settings.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct SnapshotConfig {
    /// Overrides the default `<home>/.karbon_snapshots` folder.
    #[serde(default)]
    pub directory: Option<PathBuf>,
}

// ── Default helpers ───────────────────────────────────────────────────────────

fn default_log_level() -> String {
    "info".to_string()
}
fn default_poll_interval_ms() -> u64 {
    8
}
fn default_frame_rate() -> u32 {
    60
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: default_poll_interval_ms(),
            connect_moves: false,
        }
    }
}

impl Default for PresentationConfig {
    fn default() -> Self {
        Self {
            frame_rate: default_frame_rate(),
        }
    }
}

impl CaptureConfig {
    /// Poll interval as a [`Duration`], never shorter than 1 ms.
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms.max(1))
    }
}

impl PresentationConfig {
    /// Time between presented frames, never shorter than 1 ms.
    pub fn frame_interval(&self) -> Duration {
        let rate = u64::from(self.frame_rate.max(1));
        Duration::from_millis((1000 / rate).max(1))
    }
}

// ── Config repository ─────────────────────────────────────────────────────────

/// Determines the platform-appropriate directory for the config file.
///
/// # Errors
///
/// Returns [`ConfigError::NoPlatformConfigDir`] when the platform config base
/// directory cannot be determined from the environment.
pub fn config_dir() -> Result<PathBuf, ConfigError> {
    platform_config_dir().ok_or(ConfigError::NoPlatformConfigDir)
}

/// Resolves the full path to the config file.
///
/// # Errors
///
/// Returns [`ConfigError::NoPlatformConfigDir`] if the base directory cannot be
/// determined.
pub fn config_file_path() -> Result<PathBuf, ConfigError> {
    Ok(config_dir()?.join("config.toml"))
}

/// Loads `AppConfig` from the platform config file, returning
/// `AppConfig::default()` if the file does not yet exist.
///
/// # Errors
///
/// Returns [`ConfigError::Io`] for file-system errors other than "not found",
/// and [`ConfigError::Parse`] if the TOML is malformed.
pub fn load_config() -> Result<AppConfig, ConfigError> {
    load_config_from(&config_file_path()?)
}

/// Loads `AppConfig` from an explicit path (e.g. `--config`).
///
/// # Errors
///
/// Same as [`load_config`].
pub fn load_config_from(path: &Path) -> Result<AppConfig, ConfigError> {
    match std::fs::read_to_string(path) {
        Ok(content) => Ok(toml::from_str(&content)?),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(AppConfig::default()),
        Err(source) => Err(ConfigError::Io {
            path: path.to_path_buf(),
            source,
        }),
    }
}

/// Name of the application folder under the platform config directory.
#[cfg(target_os = "linux")]
const APP_DIR_NAME: &str = "karbon";
#[cfg(not(target_os = "linux"))]
const APP_DIR_NAME: &str = "Karbon";

/// Resolves the platform config base directory including the application folder.
fn platform_config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|base| base.join(APP_DIR_NAME))
}

// ── Tests ─────────────────────────────────────────────────────────────────────
