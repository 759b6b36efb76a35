//! Command bridge: exposes application-layer operations to a user interface.
//!
//! Every user-facing control (clear, snapshot, save-as, monitor select,
//! refresh, status) is a plain function here that takes the shared
//! [`AppState`] and returns a [`CommandResult`].  The console front end in
//! [`console`] parses stdin lines into these calls; a windowed front end would
//! bind the same functions to buttons and a dropdown.
//!
//! # Data Transfer Objects (DTOs)
//!
//! The core types (`Monitor`, `SessionState`, …) are not meant to be
//! serialised directly.  DTOs are small `Serialize`/`Deserialize` structs that
//! contain only JSON-friendly fields and form the stable outward shape.
//!
//! # `CommandResult<T>` wrapper
//!
//! All commands return `CommandResult<T>` rather than `Result<T, E>`, so
//! every response has the same shape:
//! `{ success: bool, data: T | null, error: string | null }`.
//! Failures such as an invalid monitor index or a failed write are reported
//! this way and are never fatal.
//!
//! # Lock order
//!
//! `surface` is always locked before the session (see
//! `application::manage_display`).  No command holds `save_picker` while
//! locking anything else.

pub mod console;

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use karbon_core::{Monitor, SessionState};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::application::draw_input::{lock_session, SharedSession};
use crate::application::manage_display::{self, PresentationSurface};
use crate::application::persist_canvas::{self, ImageSink};
use crate::infrastructure::presentation::FrameCounters;
use crate::infrastructure::screen_info::PlatformScreenEnumerator;
use crate::infrastructure::storage::image_store::{current_timestamp, resolve_directory, snapshot_folder};

// ── Save-as directory picker ──────────────────────────────────────────────────

/// Holds the directory chosen for the next save-as.
///
/// A pick that cannot be resolved is ignored and the previous choice is kept.
/// The choice is consumed by the next save.
#[derive(Debug, Default)]
pub struct SavePathPicker {
    picked: Option<PathBuf>,
}

impl SavePathPicker {
    /// Tries to adopt `candidate`; returns the directory now in effect.
    pub fn pick(&mut self, candidate: &Path) -> Option<&Path> {
        match resolve_directory(candidate) {
            Ok(dir) => self.picked = Some(dir),
            Err(e) => debug!("ignoring unusable save directory {}: {e}", candidate.display()),
        }
        self.picked.as_deref()
    }

    /// The directory currently picked, if any.
    pub fn picked(&self) -> Option<&Path> {
        self.picked.as_deref()
    }

    /// Removes and returns the picked directory.
    pub fn take(&mut self) -> Option<PathBuf> {
        self.picked.take()
    }
}

// ── Shared application state ──────────────────────────────────────────────────

/// Application state shared between the console, the presentation loop, and
/// the dispatch worker.
///
/// All locks are `std::sync::Mutex`: every critical section is short and
/// synchronous, and commands that touch the disk are run on a blocking thread
/// by the caller.
pub struct AppState {
    /// The drawing session (registry + mapper + canvas).
    pub session: SharedSession,
    /// Where frames are shown.
    pub surface: Mutex<Box<dyn PresentationSurface>>,
    /// Source of monitor records for `refresh`.
    pub enumerator: Box<dyn PlatformScreenEnumerator>,
    /// Where snapshot and save-as images are written.
    pub sink: Box<dyn ImageSink>,
    /// Directory chosen for the next save-as.
    pub save_picker: Mutex<SavePathPicker>,
    /// Configured replacement for `<home>/.karbon_snapshots`.
    pub snapshot_dir: Option<PathBuf>,
    /// Counters of the presentation surface, when it exposes them.
    pub frame_counters: Option<Arc<FrameCounters>>,
}

impl AppState {
    /// Assembles the shared state.
    pub fn new(
        session: SharedSession,
        surface: Box<dyn PresentationSurface>,
        enumerator: Box<dyn PlatformScreenEnumerator>,
        sink: Box<dyn ImageSink>,
    ) -> Self {
        Self {
            session,
            surface: Mutex::new(surface),
            enumerator,
            sink,
            save_picker: Mutex::new(SavePathPicker::default()),
            snapshot_dir: None,
            frame_counters: None,
        }
    }

    /// Uses `dir` instead of the default snapshot folder.
    pub fn with_snapshot_dir(mut self, dir: Option<PathBuf>) -> Self {
        self.snapshot_dir = dir;
        self
    }

    /// Reports `counters` in `status`.
    pub fn with_frame_counters(mut self, counters: Arc<FrameCounters>) -> Self {
        self.frame_counters = Some(counters);
        self
    }

    /// Locks the presentation surface, recovering from poisoning.
    pub fn lock_surface(&self) -> MutexGuard<'_, Box<dyn PresentationSurface>> {
        self.surface.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn lock_picker(&self) -> MutexGuard<'_, SavePathPicker> {
        self.save_picker.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

// ── Data Transfer Objects ─────────────────────────────────────────────────────

/// DTO describing one monitor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonitorDto {
    pub index: usize,
    pub label: String,
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
    pub active: bool,
}

impl MonitorDto {
    fn from_monitor(monitor: &Monitor, active_index: usize) -> Self {
        Self {
            index: monitor.id,
            label: monitor.label(),
            x: monitor.x,
            y: monitor.y,
            width: monitor.width,
            height: monitor.height,
            active: monitor.id == active_index,
        }
    }
}

/// DTO for the monitor picker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonitorListDto {
    pub active_index: usize,
    pub monitors: Vec<MonitorDto>,
}

/// DTO for the `status` command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusDto {
    pub active_monitor: MonitorDto,
    pub state: String,
    pub connect_moves: bool,
    pub samples_drawn: u64,
    pub samples_dropped: u64,
    pub samples_ignored: u64,
    pub picked_directory: Option<String>,
    pub frames_presented: Option<u64>,
    pub frames_skipped: Option<u64>,
}

/// Unified response wrapper used by all commands.
#[derive(Debug, Serialize, Deserialize)]
pub struct CommandResult<T: Serialize> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<String>,
}

impl<T: Serialize> CommandResult<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }
    pub fn err(msg: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(msg.into()),
        }
    }
}

// ── Commands ──────────────────────────────────────────────────────────────────

fn monitor_list(state: &AppState) -> MonitorListDto {
    let listing = manage_display::list_monitors(&state.session);
    MonitorListDto {
        active_index: listing.active_index,
        monitors: listing
            .monitors
            .iter()
            .map(|m| MonitorDto::from_monitor(m, listing.active_index))
            .collect(),
    }
}

/// Lists the enumerated monitors and marks the active one.
pub fn get_monitors(state: &AppState) -> CommandResult<MonitorListDto> {
    CommandResult::ok(monitor_list(state))
}

/// Switches the drawing target to the monitor at `index`.
pub fn select_monitor(state: &AppState, index: usize) -> CommandResult<MonitorDto> {
    let mut surface = state.lock_surface();
    match manage_display::select_monitor(&state.session, surface.as_mut(), index) {
        Ok(m) => CommandResult::ok(MonitorDto::from_monitor(&m, m.id)),
        Err(e) => CommandResult::err(e.to_string()),
    }
}

/// Switches the drawing target to the monitor with the given picker label.
pub fn select_monitor_by_label(state: &AppState, label: &str) -> CommandResult<MonitorDto> {
    let mut surface = state.lock_surface();
    match manage_display::select_monitor_by_label(&state.session, surface.as_mut(), label) {
        Ok(m) => CommandResult::ok(MonitorDto::from_monitor(&m, m.id)),
        Err(e) => CommandResult::err(e.to_string()),
    }
}

/// Re-enumerates monitors and returns the new list.
pub fn refresh_monitors(state: &AppState) -> CommandResult<MonitorListDto> {
    let result = {
        let mut surface = state.lock_surface();
        manage_display::refresh_monitors(&state.session, surface.as_mut(), state.enumerator.as_ref())
    };
    match result {
        Ok(_) => CommandResult::ok(monitor_list(state)),
        Err(e) => CommandResult::err(e.to_string()),
    }
}

/// Clears the canvas to the background colour.
pub fn clear_canvas(state: &AppState) -> CommandResult<()> {
    lock_session(&state.session).clear();
    CommandResult::ok(())
}

/// Writes `snapshot_<timestamp>.png` into the snapshot folder.
///
/// Blocks on file I/O; call from a blocking context.
pub fn take_snapshot(state: &AppState) -> CommandResult<String> {
    let result = snapshot_folder(state.snapshot_dir.as_deref()).and_then(|folder| {
        persist_canvas::save_snapshot(
            &state.session,
            state.sink.as_ref(),
            &folder,
            &current_timestamp(),
        )
    });
    match result {
        Ok(path) => CommandResult::ok(path.display().to_string()),
        Err(e) => CommandResult::err(e.to_string()),
    }
}

/// Chooses the directory for the next save-as.
///
/// An unusable path is silently ignored; the response carries the directory
/// actually in effect (possibly the previous one, possibly none).
pub fn pick_save_directory(state: &AppState, candidate: &Path) -> CommandResult<Option<String>> {
    let mut picker = state.lock_picker();
    CommandResult::ok(picker.pick(candidate).map(|p| p.display().to_string()))
}

/// Writes `screenshot_<timestamp>.png` into the picked directory and clears
/// the pick.
///
/// Blocks on file I/O; call from a blocking context.
pub fn save_as(state: &AppState) -> CommandResult<String> {
    let directory = state.lock_picker().take();
    match persist_canvas::save_screenshot(
        &state.session,
        state.sink.as_ref(),
        directory.as_deref(),
        &current_timestamp(),
    ) {
        Ok(path) => CommandResult::ok(path.display().to_string()),
        Err(e) => CommandResult::err(e.to_string()),
    }
}

/// Reports the active monitor, session state, and sample counters.
pub fn get_status(state: &AppState) -> CommandResult<StatusDto> {
    let (monitor, active_index, session_state, connect_moves, stats) = {
        let guard = lock_session(&state.session);
        (
            guard.active_monitor(),
            guard.registry().active_index(),
            guard.state(),
            guard.connect_moves(),
            guard.stats(),
        )
    };
    let picked_directory = state
        .lock_picker()
        .picked()
        .map(|p| p.display().to_string());

    CommandResult::ok(StatusDto {
        active_monitor: MonitorDto::from_monitor(&monitor, active_index),
        state: match session_state {
            SessionState::Idle => "idle".to_string(),
            SessionState::Drawing => "drawing".to_string(),
        },
        connect_moves,
        samples_drawn: stats.drawn,
        samples_dropped: stats.dropped,
        samples_ignored: stats.ignored,
        picked_directory,
        frames_presented: state.frame_counters.as_ref().map(|c| c.presented()),
        frames_skipped: state.frame_counters.as_ref().map(|c| c.mismatched()),
    })
}

// ── Tests ─────────────────────────────────────────────────────────────────────
