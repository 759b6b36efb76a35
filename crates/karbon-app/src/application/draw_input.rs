//! DrawInputUseCase: applies captured pointer events to the drawing session.
//!
//! This use case is the heart of Karbon.  It receives raw events from the
//! capture source on a dedicated worker thread, converts each one into a
//! [`PointerSample`], and hands it to the shared [`DrawingSession`].
//!
//! # Locking
//!
//! The session lives behind a single `std::sync::Mutex`.  The worker takes the
//! lock once per event, so the critical section covers exactly one mapping
//! plus one primitive.  Readers (presentation, snapshot, save) take the same
//! lock for one full-canvas copy and never for encoding or I/O.
//!
//! A panic while the lock is held would poison it.  Every primitive leaves
//! the canvas consistent, so the guard is recovered instead of propagating the
//! poison to every other thread.

use std::sync::mpsc::Receiver;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread::{self, JoinHandle};

use karbon_core::{
    DrawingSession, MouseButton as SampleButton, PointerSample, SampleOutcome, SessionStats,
};
use tracing::{debug, info};

use crate::infrastructure::input_capture::{MouseButton, RawInputEvent};

/// The drawing session shared between the dispatch worker and readers.
pub type SharedSession = Arc<Mutex<DrawingSession>>;

/// Wraps a session for sharing across threads.
pub fn share(session: DrawingSession) -> SharedSession {
    Arc::new(Mutex::new(session))
}

/// Locks the session, recovering the guard if a previous holder panicked.
pub fn lock_session(session: &SharedSession) -> MutexGuard<'_, DrawingSession> {
    session.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Converts a raw capture event into a domain sample.
pub fn to_sample(event: RawInputEvent) -> PointerSample {
    match event {
        RawInputEvent::MouseMove { x, y } => PointerSample::moved(x, y),
        RawInputEvent::MouseButtonDown { button, x, y } => {
            PointerSample::click(x, y, to_sample_button(button), true)
        }
        RawInputEvent::MouseButtonUp { button, x, y } => {
            PointerSample::click(x, y, to_sample_button(button), false)
        }
    }
}

fn to_sample_button(button: MouseButton) -> SampleButton {
    match button {
        MouseButton::Left => SampleButton::Left,
        MouseButton::Right => SampleButton::Right,
        MouseButton::Middle => SampleButton::Middle,
        MouseButton::X1 => SampleButton::Other(4),
        MouseButton::X2 => SampleButton::Other(5),
    }
}

/// Applies pointer events to a shared session.
#[derive(Clone)]
pub struct DrawInputUseCase {
    session: SharedSession,
}

impl DrawInputUseCase {
    pub fn new(session: SharedSession) -> Self {
        Self { session }
    }

    /// Applies one event.  Holds the session lock for exactly this event.
    pub fn handle_event(&self, event: RawInputEvent) -> SampleOutcome {
        let outcome = lock_session(&self.session).handle_sample(to_sample(event));
        if outcome == SampleOutcome::Dropped {
            debug!(?event, "sample outside active display dropped");
        }
        outcome
    }

    /// Drains `events` until the sender side closes, then returns the
    /// session's counters.
    pub fn run(&self, events: Receiver<RawInputEvent>) -> SessionStats {
        for event in events {
            self.handle_event(event);
        }
        lock_session(&self.session).stats()
    }

    /// Spawns the dispatch worker thread.
    ///
    /// The worker exits once the capture source is stopped (its sender is
    /// dropped) and every queued event has been applied; join the handle to
    /// wait for that.
    ///
    /// # Errors
    ///
    /// Returns the OS error if the thread cannot be spawned.
    pub fn spawn(
        self,
        events: Receiver<RawInputEvent>,
    ) -> std::io::Result<JoinHandle<SessionStats>> {
        thread::Builder::new()
            .name("karbon-draw".to_string())
            .spawn(move || {
                info!("draw dispatch worker started");
                let stats = self.run(events);
                info!(
                    drawn = stats.drawn,
                    dropped = stats.dropped,
                    ignored = stats.ignored,
                    "draw dispatch worker finished"
                );
                stats
            })
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
