//! PNG persistence and output-directory handling.
//!
//! - [`PngImageSink`] encodes canvas copies with the `image` crate.
//! - [`create_snapshot_folder`] resolves `<home>/.karbon_snapshots` and creates it.
//! - [`resolve_directory`] validates a directory picked for save-as.
//! - [`current_timestamp`] produces the `YYYYMMDD_HHMMSS` part of file names.

use std::io;
use std::path::{Path, PathBuf};

use chrono::Utc;
use image::{ImageFormat, RgbImage};
use tracing::debug;

use crate::application::persist_canvas::{ImageSink, PersistError};

/// Name of the snapshot folder inside the home directory.
pub const SNAPSHOT_FOLDER_NAME: &str = ".karbon_snapshots";

/// [`ImageSink`] that writes lossless PNG files.
#[derive(Debug, Default, Clone, Copy)]
pub struct PngImageSink;

impl ImageSink for PngImageSink {
    fn write_png(&self, image: &RgbImage, path: &Path) -> Result<(), PersistError> {
        image
            .save_with_format(path, ImageFormat::Png)
            .map_err(|source| PersistError::ImageWriteFailure {
                path: path.to_path_buf(),
                source,
            })
    }
}

/// Creates `dir` (and parents) if needed and returns it.  Idempotent.
///
/// # Errors
///
/// Returns [`PersistError::CreateDirFailed`] if the directory cannot be created.
pub fn ensure_directory(dir: &Path) -> Result<PathBuf, PersistError> {
    std::fs::create_dir_all(dir).map_err(|source| PersistError::CreateDirFailed {
        path: dir.to_path_buf(),
        source,
    })?;
    Ok(dir.to_path_buf())
}

/// Returns `<home>/.karbon_snapshots` for the given home directory.
pub fn snapshot_folder_in(home: &Path) -> PathBuf {
    home.join(SNAPSHOT_FOLDER_NAME)
}

/// Resolves and creates the default snapshot folder.
///
/// # Errors
///
/// Returns [`PersistError::NoHomeDir`] when the home directory is unknown and
/// [`PersistError::CreateDirFailed`] when the folder cannot be created.
pub fn create_snapshot_folder() -> Result<PathBuf, PersistError> {
    let home = dirs::home_dir().ok_or(PersistError::NoHomeDir)?;
    ensure_directory(&snapshot_folder_in(&home))
}

/// Resolves the snapshot folder, honouring a configured override.
///
/// # Errors
///
/// Same as [`create_snapshot_folder`].
pub fn snapshot_folder(override_dir: Option<&Path>) -> Result<PathBuf, PersistError> {
    match override_dir {
        Some(dir) => ensure_directory(dir),
        None => create_snapshot_folder(),
    }
}

/// Canonicalizes `candidate` and checks that it is an existing directory.
///
/// # Errors
///
/// Returns the underlying I/O error, or `InvalidInput` when the path exists
/// but is not a directory.
pub fn resolve_directory(candidate: &Path) -> io::Result<PathBuf> {
    let resolved = candidate.canonicalize()?;
    if !resolved.is_dir() {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("{} is not a directory", resolved.display()),
        ));
    }
    debug!("resolved save directory {}", resolved.display());
    Ok(resolved)
}

/// Current UTC time as `YYYYMMDD_HHMMSS`.
pub fn current_timestamp() -> String {
    Utc::now().format("%Y%m%d_%H%M%S").to_string()
}

// ── Tests ─────────────────────────────────────────────────────────────────────
