//! PersistCanvasUseCase: writes the canvas to PNG files.
//!
//! Two user actions end up here:
//!
//! | Action    | Directory                                | File name                     |
//! |-----------|------------------------------------------|-------------------------------|
//! | snapshot  | the snapshot folder (auto-created)       | `snapshot_<timestamp>.png`    |
//! | save-as   | a directory the user picked beforehand   | `screenshot_<timestamp>.png`  |
//!
//! Both copy the canvas under the session lock and then encode and write
//! outside it, so a slow disk never stalls pointer dispatch.  A failed write
//! leaves the canvas and session exactly as they were.
//!
//! Timestamps have one-second resolution; two saves in the same second to the
//! same directory overwrite each other.

use std::path::{Path, PathBuf};

use image::RgbImage;
use thiserror::Error;
use tracing::{error, info};

use super::draw_input::{lock_session, SharedSession};

/// Error type for canvas persistence.
#[derive(Debug, Error)]
pub enum PersistError {
    /// Encoding or writing the image file failed.
    #[error("failed to write image to {path}: {source}")]
    ImageWriteFailure {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    /// The target directory could not be created.
    #[error("failed to create directory {path}: {source}")]
    CreateDirFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The home directory could not be determined.
    #[error("could not determine the home directory")]
    NoHomeDir,

    /// Save-as was requested without a picked directory.
    #[error("no save directory has been picked")]
    NoDirectoryPicked,
}

/// Destination for encoded canvas images.
///
/// The production implementation writes PNG files; tests substitute a mock.
#[cfg_attr(test, mockall::automock)]
pub trait ImageSink: Send + Sync {
    /// Encodes `image` losslessly and writes it to `path`.
    ///
    /// # Errors
    ///
    /// Returns [`PersistError::ImageWriteFailure`] on any encode or I/O error.
    fn write_png(&self, image: &RgbImage, path: &Path) -> Result<(), PersistError>;
}

/// `snapshot_<timestamp>.png`
pub fn snapshot_file_name(timestamp: &str) -> String {
    format!("snapshot_{timestamp}.png")
}

/// `screenshot_<timestamp>.png`
pub fn screenshot_file_name(timestamp: &str) -> String {
    format!("screenshot_{timestamp}.png")
}

/// Copies the canvas and writes it to `path`.
///
/// # Errors
///
/// Propagates the sink's [`PersistError`]; the session is not modified.
pub fn save_canvas(
    session: &SharedSession,
    sink: &dyn ImageSink,
    path: &Path,
) -> Result<PathBuf, PersistError> {
    let frame = lock_session(session).snapshot();

    match sink.write_png(&frame, path) {
        Ok(()) => {
            info!("saved {}x{} canvas to {}", frame.width(), frame.height(), path.display());
            Ok(path.to_path_buf())
        }
        Err(e) => {
            error!("{e}");
            Err(e)
        }
    }
}

/// Writes `snapshot_<timestamp>.png` into `folder`.
///
/// # Errors
///
/// See [`save_canvas`].
pub fn save_snapshot(
    session: &SharedSession,
    sink: &dyn ImageSink,
    folder: &Path,
    timestamp: &str,
) -> Result<PathBuf, PersistError> {
    save_canvas(session, sink, &folder.join(snapshot_file_name(timestamp)))
}

/// Writes `screenshot_<timestamp>.png` into the picked `directory`.
///
/// # Errors
///
/// Returns [`PersistError::NoDirectoryPicked`] when `directory` is `None`,
/// otherwise see [`save_canvas`].
pub fn save_screenshot(
    session: &SharedSession,
    sink: &dyn ImageSink,
    directory: Option<&Path>,
    timestamp: &str,
) -> Result<PathBuf, PersistError> {
    let directory = directory.ok_or(PersistError::NoDirectoryPicked)?;
    save_canvas(session, sink, &directory.join(screenshot_file_name(timestamp)))
}

// ── Tests ─────────────────────────────────────────────────────────────────────
