//! DrawingSession: turns pointer samples into canvas mutations.
//!
//! The session owns the three core pieces together so they can never drift
//! apart:
//!
//! - the [`MonitorRegistry`] (which display is active),
//! - a [`CoordinateMapper`] built from the active monitor record,
//! - the [`Canvas`] sized to that same record.
//!
//! Because all three are replaced in one `&mut self` call on a display switch,
//! a caller holding the session (usually behind a single lock) always maps a
//! sample against exactly one monitor record.
//!
//! # Session lifecycle (for beginners)
//!
//! ```text
//!            first in-bounds sample
//!   Idle  ─────────────────────────►  Drawing
//!    ▲                                   │
//!    └──────── display switch ───────────┘
//!           (canvas cleared/resized)
//! ```
//!
//! There is no "finished" state: a session keeps drawing until the process
//! exits.

use image::RgbImage;
use tracing::debug;

use super::canvas::{
    Canvas, Color, PRIMARY_CLICK_COLOR, PRIMARY_CLICK_RADIUS, SECONDARY_CLICK_COLOR,
    SECONDARY_CLICK_RADIUS, TRAIL_COLOR,
};
use super::mapper::CoordinateMapper;
use super::monitor::{Monitor, MonitorRegistry, RegistryError};

/// Mouse button identifier carried by click samples.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
    /// Any extra button (side buttons etc.).
    Other(u8),
}

/// What happened at a pointer sample's position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SampleKind {
    /// The pointer moved.
    Move,
    /// A button changed state.
    Click { button: MouseButton, pressed: bool },
}

/// One raw pointer sample in global desktop coordinates.
///
/// Samples are transient: they are consumed by [`DrawingSession::handle_sample`]
/// and never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PointerSample {
    /// Global X coordinate (may be negative).
    pub x: i32,
    /// Global Y coordinate (may be negative).
    pub y: i32,
    pub kind: SampleKind,
}

impl PointerSample {
    /// A pointer movement sample.
    pub fn moved(x: i32, y: i32) -> Self {
        Self {
            x,
            y,
            kind: SampleKind::Move,
        }
    }

    /// A button press or release sample.
    pub fn click(x: i32, y: i32, button: MouseButton, pressed: bool) -> Self {
        Self {
            x,
            y,
            kind: SampleKind::Click { button, pressed },
        }
    }
}

/// The primitive stamped for a sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stroke {
    /// A single trail pixel.
    Point { color: Color },
    /// A filled circle.
    Disc { radius: u32, color: Color },
}

impl Stroke {
    /// Chooses the primitive for a sample kind.
    ///
    /// | Kind                         | Stroke                         |
    /// |------------------------------|--------------------------------|
    /// | `Move`                       | 1 px point, trail colour       |
    /// | `Click(Left, pressed)`       | radius 4 disc, primary colour  |
    /// | `Click(Right, pressed)`      | radius 6 disc, secondary colour|
    /// | release / other buttons      | nothing                        |
    pub fn for_kind(kind: SampleKind) -> Option<Self> {
        match kind {
            SampleKind::Move => Some(Stroke::Point { color: TRAIL_COLOR }),
            SampleKind::Click {
                button: MouseButton::Left,
                pressed: true,
            } => Some(Stroke::Disc {
                radius: PRIMARY_CLICK_RADIUS,
                color: PRIMARY_CLICK_COLOR,
            }),
            SampleKind::Click {
                button: MouseButton::Right,
                pressed: true,
            } => Some(Stroke::Disc {
                radius: SECONDARY_CLICK_RADIUS,
                color: SECONDARY_CLICK_COLOR,
            }),
            SampleKind::Click { .. } => None,
        }
    }
}

/// Session-level drawing state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionState {
    /// Nothing has been drawn since start-up or the last display switch.
    #[default]
    Idle,
    /// At least one in-bounds sample reached the canvas.
    Drawing,
}

/// Result of handling one sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SampleOutcome {
    /// A primitive was stamped.
    Drawn,
    /// The sample fell outside the active monitor and was discarded.
    Dropped,
    /// The sample was in bounds but maps to no primitive (e.g. a release).
    Ignored,
}

/// Running counters of sample outcomes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SessionStats {
    pub drawn: u64,
    pub dropped: u64,
    pub ignored: u64,
}

/// The drawing engine: registry + mapper + canvas + lifecycle state.
#[derive(Debug, Clone)]
pub struct DrawingSession {
    registry: MonitorRegistry,
    mapper: CoordinateMapper,
    canvas: Canvas,
    state: SessionState,
    connect_moves: bool,
    /// Last in-bounds move, used only when `connect_moves` is on.
    last_move: Option<(u32, u32)>,
    stats: SessionStats,
}

impl DrawingSession {
    /// Creates an idle session whose canvas matches the registry's active monitor.
    pub fn new(registry: MonitorRegistry) -> Self {
        let active = registry.active();
        Self {
            registry,
            mapper: CoordinateMapper::new(active),
            canvas: Canvas::new(active.width, active.height),
            state: SessionState::Idle,
            connect_moves: false,
            last_move: None,
            stats: SessionStats::default(),
        }
    }

    /// Enables or disables joining consecutive in-bounds moves with 1 px segments.
    pub fn with_connect_moves(mut self, connect_moves: bool) -> Self {
        self.connect_moves = connect_moves;
        self
    }

    pub fn registry(&self) -> &MonitorRegistry {
        &self.registry
    }

    /// Returns the monitor the canvas is currently bound to.
    pub fn active_monitor(&self) -> Monitor {
        self.mapper.monitor()
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn stats(&self) -> SessionStats {
        self.stats
    }

    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    pub fn connect_moves(&self) -> bool {
        self.connect_moves
    }

    /// Maps a global position against the active monitor.
    pub fn map(&self, global_x: i32, global_y: i32) -> Option<(u32, u32)> {
        self.mapper.map(global_x, global_y)
    }

    /// Maps a sample and applies at most one primitive to the canvas.
    pub fn handle_sample(&mut self, sample: PointerSample) -> SampleOutcome {
        let Some((x, y)) = self.mapper.map(sample.x, sample.y) else {
            self.last_move = None;
            self.stats.dropped += 1;
            return SampleOutcome::Dropped;
        };

        self.state = SessionState::Drawing;

        let Some(stroke) = Stroke::for_kind(sample.kind) else {
            self.stats.ignored += 1;
            return SampleOutcome::Ignored;
        };

        match stroke {
            Stroke::Point { color } => {
                match self.last_move.filter(|_| self.connect_moves) {
                    Some(previous) => self.canvas.stamp_segment(previous, (x, y), color),
                    None => self.canvas.stamp_point(x as i64, y as i64, color),
                }
                self.last_move = Some((x, y));
            }
            Stroke::Disc { radius, color } => self.canvas.stamp_disc(x, y, radius, color),
        }

        self.stats.drawn += 1;
        SampleOutcome::Drawn
    }

    /// Switches the active display.
    ///
    /// On success the canvas is recreated at the new monitor's size (prior
    /// drawing discarded) and the session returns to [`SessionState::Idle`].
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::InvalidMonitorIndex`] for an out-of-range index;
    /// the selection, canvas, and state are left unchanged.
    pub fn select_monitor(&mut self, index: usize) -> Result<Monitor, RegistryError> {
        let monitor = self.registry.select(index)?;
        self.rebind(monitor);
        Ok(monitor)
    }

    /// Switches the active display by its picker label.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::UnknownLabel`] if no monitor matches.
    pub fn select_monitor_by_label(&mut self, label: &str) -> Result<Monitor, RegistryError> {
        let monitor = self.registry.select_by_label(label)?;
        self.rebind(monitor);
        Ok(monitor)
    }

    /// Installs a freshly enumerated monitor set.
    ///
    /// The canvas is only reset when the active monitor record actually
    /// changed (different origin, size, or index).
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::Empty`] if `monitors` is empty.
    pub fn replace_monitors(&mut self, monitors: Vec<Monitor>) -> Result<Monitor, RegistryError> {
        let monitor = self.registry.replace(monitors)?;
        if monitor != self.mapper.monitor() {
            self.rebind(monitor);
        }
        Ok(monitor)
    }

    /// Fills the canvas with the background colour.  Idempotent.
    pub fn clear(&mut self) {
        self.canvas.clear();
        self.last_move = None;
        debug!("canvas cleared");
    }

    /// Returns a point-in-time copy of the canvas pixels.
    pub fn snapshot(&self) -> RgbImage {
        self.canvas.snapshot()
    }

    fn rebind(&mut self, monitor: Monitor) {
        self.mapper = CoordinateMapper::new(monitor);
        self.canvas = Canvas::new(monitor.width, monitor.height);
        self.state = SessionState::Idle;
        self.last_move = None;
        debug!(
            "active display is now {} at ({}, {})",
            monitor.label(),
            monitor.x,
            monitor.y
        );
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::canvas::BACKGROUND_COLOR;

    fn small_dual_session() -> DrawingSession {
        let registry = MonitorRegistry::new(vec![
            Monitor::new(0, 0, 0, 64, 48),
            Monitor::new(1, 64, 0, 32, 32),
        ])
        .unwrap();
        DrawingSession::new(registry)
    }

    // ── Stroke selection ──────────────────────────────────────────────────────

    #[test]
    fn test_stroke_for_move_is_trail_point() {
        assert_eq!(
            Stroke::for_kind(SampleKind::Move),
            Some(Stroke::Point { color: TRAIL_COLOR })
        );
    }

    #[test]
    fn test_stroke_for_left_press_is_primary_disc() {
        let kind = SampleKind::Click {
            button: MouseButton::Left,
            pressed: true,
        };
        assert_eq!(
            Stroke::for_kind(kind),
            Some(Stroke::Disc {
                radius: 4,
                color: PRIMARY_CLICK_COLOR
            })
        );
    }

    #[test]
    fn test_stroke_for_right_press_is_secondary_disc() {
        let kind = SampleKind::Click {
            button: MouseButton::Right,
            pressed: true,
        };
        assert_eq!(
            Stroke::for_kind(kind),
            Some(Stroke::Disc {
                radius: 6,
                color: SECONDARY_CLICK_COLOR
            })
        );
    }

    #[test]
    fn test_stroke_for_release_and_middle_is_none() {
        for kind in [
            SampleKind::Click {
                button: MouseButton::Left,
                pressed: false,
            },
            SampleKind::Click {
                button: MouseButton::Right,
                pressed: false,
            },
            SampleKind::Click {
                button: MouseButton::Middle,
                pressed: true,
            },
            SampleKind::Click {
                button: MouseButton::Other(4),
                pressed: true,
            },
        ] {
            assert_eq!(Stroke::for_kind(kind), None, "{kind:?}");
        }
    }

    // ── handle_sample ─────────────────────────────────────────────────────────

    #[test]
    fn test_new_session_is_idle_with_canvas_sized_to_active_monitor() {
        let session = small_dual_session();
        assert_eq!(session.state(), SessionState::Idle);
        assert_eq!(session.canvas().width(), 64);
        assert_eq!(session.canvas().height(), 48);
    }

    #[test]
    fn test_in_bounds_move_draws_and_enters_drawing_state() {
        let mut session = small_dual_session();

        let outcome = session.handle_sample(PointerSample::moved(10, 20));

        assert_eq!(outcome, SampleOutcome::Drawn);
        assert_eq!(session.state(), SessionState::Drawing);
        assert_eq!(session.canvas().pixel(10, 20), Some(TRAIL_COLOR));
    }

    #[test]
    fn test_out_of_bounds_sample_is_dropped_without_mutation() {
        let mut session = small_dual_session();

        let outcome = session.handle_sample(PointerSample::click(70, 5, MouseButton::Left, true));

        assert_eq!(outcome, SampleOutcome::Dropped);
        assert_eq!(session.state(), SessionState::Idle);
        assert!(session.canvas().is_uniform(BACKGROUND_COLOR));
        assert_eq!(session.stats().dropped, 1);
    }

    #[test]
    fn test_release_in_bounds_is_ignored_but_starts_drawing_state() {
        let mut session = small_dual_session();

        let outcome = session.handle_sample(PointerSample::click(5, 5, MouseButton::Left, false));

        assert_eq!(outcome, SampleOutcome::Ignored);
        assert_eq!(session.state(), SessionState::Drawing);
        assert!(session.canvas().is_uniform(BACKGROUND_COLOR));
    }

    #[test]
    fn test_consecutive_moves_are_independent_points_by_default() {
        let mut session = small_dual_session();
        session.handle_sample(PointerSample::moved(0, 0));
        session.handle_sample(PointerSample::moved(10, 0));

        assert_eq!(session.canvas().pixel(0, 0), Some(TRAIL_COLOR));
        assert_eq!(session.canvas().pixel(5, 0), Some(BACKGROUND_COLOR));
        assert_eq!(session.canvas().pixel(10, 0), Some(TRAIL_COLOR));
    }

    #[test]
    fn test_connect_moves_joins_consecutive_in_bounds_moves() {
        let mut session = small_dual_session().with_connect_moves(true);
        session.handle_sample(PointerSample::moved(0, 0));
        session.handle_sample(PointerSample::moved(10, 0));

        for x in 0..=10 {
            assert_eq!(session.canvas().pixel(x, 0), Some(TRAIL_COLOR), "x={x}");
        }
    }

    #[test]
    fn test_connect_moves_does_not_bridge_an_out_of_bounds_excursion() {
        let mut session = small_dual_session().with_connect_moves(true);
        session.handle_sample(PointerSample::moved(0, 10));
        session.handle_sample(PointerSample::moved(100, 10)); // off monitor 0
        session.handle_sample(PointerSample::moved(20, 10));

        assert_eq!(session.canvas().pixel(10, 10), Some(BACKGROUND_COLOR));
        assert_eq!(session.canvas().pixel(20, 10), Some(TRAIL_COLOR));
    }

    // ── select_monitor ────────────────────────────────────────────────────────

    #[test]
    fn test_select_monitor_discards_drawing_and_resizes_canvas() {
        // Arrange
        let mut session = small_dual_session();
        session.handle_sample(PointerSample::click(10, 10, MouseButton::Left, true));

        // Act
        let monitor = session.select_monitor(1).expect("monitor 1 exists");

        // Assert
        assert_eq!(monitor.x, 64);
        assert_eq!(session.state(), SessionState::Idle);
        assert_eq!(session.canvas().width(), 32);
        assert_eq!(session.canvas().height(), 32);
        assert!(session.canvas().is_uniform(BACKGROUND_COLOR));
    }

    #[test]
    fn test_select_monitor_rebinds_mapping_to_new_origin() {
        let mut session = small_dual_session();
        session.select_monitor(1).unwrap();

        assert_eq!(session.map(70, 3), Some((6, 3)));
        assert_eq!(session.map(10, 3), None);
    }

    #[test]
    fn test_select_invalid_monitor_keeps_canvas_and_state() {
        let mut session = small_dual_session();
        session.handle_sample(PointerSample::moved(3, 3));

        let result = session.select_monitor(5);

        assert_eq!(
            result,
            Err(RegistryError::InvalidMonitorIndex { index: 5, count: 2 })
        );
        assert_eq!(session.state(), SessionState::Drawing);
        assert_eq!(session.canvas().pixel(3, 3), Some(TRAIL_COLOR));
        assert_eq!(session.active_monitor().id, 0);
    }

    #[test]
    fn test_select_monitor_by_label_switches_display() {
        let mut session = small_dual_session();
        let monitor = session.select_monitor_by_label("Monitor 2: 32 x 32").unwrap();
        assert_eq!(monitor.id, 1);
        assert_eq!(session.active_monitor(), monitor);
    }

    // ── replace_monitors ──────────────────────────────────────────────────────

    #[test]
    fn test_replace_monitors_with_same_active_record_keeps_drawing() {
        let mut session = small_dual_session();
        session.handle_sample(PointerSample::moved(1, 1));

        session
            .replace_monitors(vec![
                Monitor::new(0, 0, 0, 64, 48),
                Monitor::new(1, 64, 0, 800, 600),
            ])
            .unwrap();

        assert_eq!(session.canvas().pixel(1, 1), Some(TRAIL_COLOR));
        assert_eq!(session.state(), SessionState::Drawing);
    }

    #[test]
    fn test_replace_monitors_with_resized_active_monitor_resets_canvas() {
        let mut session = small_dual_session();
        session.handle_sample(PointerSample::moved(1, 1));

        session
            .replace_monitors(vec![Monitor::new(0, 0, 0, 128, 96)])
            .unwrap();

        assert_eq!(session.canvas().width(), 128);
        assert!(session.canvas().is_uniform(BACKGROUND_COLOR));
        assert_eq!(session.state(), SessionState::Idle);
    }

    // ── clear / snapshot ──────────────────────────────────────────────────────

    #[test]
    fn test_clear_keeps_state_and_blanks_canvas() {
        let mut session = small_dual_session();
        session.handle_sample(PointerSample::click(20, 20, MouseButton::Right, true));

        session.clear();

        assert!(session.canvas().is_uniform(BACKGROUND_COLOR));
        assert_eq!(session.state(), SessionState::Drawing);
    }

    #[test]
    fn test_stats_count_each_outcome_once() {
        let mut session = small_dual_session();
        session.handle_sample(PointerSample::moved(1, 1));
        session.handle_sample(PointerSample::moved(-1, 1));
        session.handle_sample(PointerSample::click(1, 1, MouseButton::Left, false));
        session.handle_sample(PointerSample::click(1, 1, MouseButton::Left, true));

        assert_eq!(
            session.stats(),
            SessionStats {
                drawn: 2,
                dropped: 1,
                ignored: 1
            }
        );
    }
}
