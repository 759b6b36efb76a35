//! Global pointer capture infrastructure.
//!
//! Pointer activity is observed system-wide, regardless of which window has
//! focus.  The native source runs on its own thread and places raw events into
//! an `mpsc` channel consumed by the draw dispatch worker
//! (see `application::draw_input`).
//!
//! # Event flow (for beginners)
//!
//! ```text
//!  poll thread ──► mpsc::Sender<RawInputEvent> ──► dispatch worker ──► DrawingSession
//! ```
//!
//! The producer never touches the canvas itself, so a slow draw cannot make
//! the OS-facing side miss a sample; events simply queue up.
//!
//! # Testability
//!
//! The [`InputSource`] trait allows tests to inject synthetic events through
//! [`mock::MockInputSource`] without a display server.

use std::sync::mpsc;

pub mod poller;
pub mod mock;

pub use self::poller::DeviceQueryInputSource;

/// A raw pointer event produced by the capture infrastructure.
///
/// All coordinates are absolute positions in global desktop space
/// (multi-monitor aware, may be negative).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RawInputEvent {
    /// The cursor moved to an absolute position.
    MouseMove { x: i32, y: i32 },
    /// A mouse button was pressed.
    MouseButtonDown { button: MouseButton, x: i32, y: i32 },
    /// A mouse button was released.
    MouseButtonUp { button: MouseButton, x: i32, y: i32 },
}

/// Mouse button identifier used in [`RawInputEvent`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
    X1,
    X2,
}

impl MouseButton {
    /// Maps a 1-based platform button number (1 = left, 2 = right,
    /// 3 = middle, 4/5 = side buttons) to a [`MouseButton`].
    pub fn from_number(number: usize) -> Option<Self> {
        match number {
            1 => Some(MouseButton::Left),
            2 => Some(MouseButton::Right),
            3 => Some(MouseButton::Middle),
            4 => Some(MouseButton::X1),
            5 => Some(MouseButton::X2),
            _ => None,
        }
    }
}

/// Error type for input capture operations.
#[derive(Debug, thiserror::Error)]
pub enum CaptureError {
    #[error("failed to spawn pointer polling thread: {0}")]
    SpawnFailed(#[from] std::io::Error),
    #[error("capture source is already running")]
    AlreadyStarted,
    #[error("global pointer state is unavailable (no display server, or input-monitoring permission not granted)")]
    Unavailable,
}

/// Trait abstracting pointer event production.
///
/// The production implementation polls the OS; tests use [`mock::MockInputSource`].
pub trait InputSource: Send + Sync {
    /// Starts the source and returns a receiver for captured events.
    ///
    /// # Errors
    ///
    /// Returns [`CaptureError::AlreadyStarted`] if called twice without an
    /// intervening [`InputSource::stop`], and [`CaptureError::Unavailable`]
    /// when the OS refuses access to the pointer.
    fn start(&self) -> Result<mpsc::Receiver<RawInputEvent>, CaptureError>;

    /// Stops the source and blocks until its producer has finished.
    ///
    /// Once this returns no further events are delivered and the channel is
    /// closed.  Calling `stop` on a source that is not running is a no-op.
    fn stop(&self);
}
