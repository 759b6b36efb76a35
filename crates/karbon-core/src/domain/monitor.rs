//! Monitor registry domain entity.
//!
//! All monitors live in one global desktop coordinate space.  The primary
//! monitor usually sits at (0, 0); secondary monitors are positioned relative
//! to it and may have negative origins (a display placed to the left of or
//! above the primary one).
//!
//! The registry owns the ordered monitor list plus a single "active" index.
//! The active monitor is the drawing target: every pointer sample is mapped
//! against it and the canvas is sized to it.

use thiserror::Error;

/// Errors that can occur when selecting or replacing monitors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    /// A registry must always contain at least one monitor.
    #[error("monitor set is empty: at least one display is required")]
    Empty,

    /// The requested index does not exist in the current monitor set.
    #[error("invalid monitor index {index}: {count} monitor(s) available")]
    InvalidMonitorIndex { index: usize, count: usize },

    /// No monitor carries the requested display label.
    #[error("no monitor labelled {0:?}")]
    UnknownLabel(String),
}

/// A display in global desktop space.
///
/// `x` and `y` are the top-left corner in global coordinates and may be
/// negative.  Records are immutable once enumerated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Monitor {
    /// Zero-based ordinal in enumeration order.
    pub id: usize,
    /// X coordinate of the top-left corner in global space.
    pub x: i32,
    /// Y coordinate of the top-left corner in global space.
    pub y: i32,
    /// Logical width in pixels.
    pub width: u32,
    /// Logical height in pixels.
    pub height: u32,
}

impl Monitor {
    /// Creates a monitor record.
    pub fn new(id: usize, x: i32, y: i32, width: u32, height: u32) -> Self {
        Self {
            id,
            x,
            y,
            width,
            height,
        }
    }

    /// Returns the rightmost X coordinate (exclusive).
    pub fn right(&self) -> i64 {
        self.x as i64 + self.width as i64
    }

    /// Returns the bottommost Y coordinate (exclusive).
    pub fn bottom(&self) -> i64 {
        self.y as i64 + self.height as i64
    }

    /// Returns `true` if the global point lies on this monitor.
    pub fn contains(&self, global_x: i32, global_y: i32) -> bool {
        let (gx, gy) = (global_x as i64, global_y as i64);
        gx >= self.x as i64 && gx < self.right() && gy >= self.y as i64 && gy < self.bottom()
    }

    /// Human-readable label shown in the display picker, numbered from 1.
    ///
    /// ```
    /// # use karbon_core::Monitor;
    /// assert_eq!(Monitor::new(0, 0, 0, 1920, 1080).label(), "Monitor 1: 1920 x 1080");
    /// ```
    pub fn label(&self) -> String {
        format!("Monitor {}: {} x {}", self.id + 1, self.width, self.height)
    }
}

/// The enumerated monitor set plus the active display selection.
///
/// Invariant: `active` is always a valid index into `monitors`, and `monitors`
/// is never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonitorRegistry {
    monitors: Vec<Monitor>,
    active: usize,
}

impl MonitorRegistry {
    /// Creates a registry with the first monitor active.
    ///
    /// Monitor ids are reassigned to match enumeration order so that
    /// `monitors()[i].id == i` always holds.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::Empty`] if `monitors` is empty.
    pub fn new(monitors: Vec<Monitor>) -> Result<Self, RegistryError> {
        Ok(Self {
            monitors: renumber(monitors)?,
            active: 0,
        })
    }

    /// Returns the ordered monitor set.
    pub fn monitors(&self) -> &[Monitor] {
        &self.monitors
    }

    /// Returns the number of enumerated monitors.
    pub fn len(&self) -> usize {
        self.monitors.len()
    }

    /// Always `false`; kept for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.monitors.is_empty()
    }

    /// Returns the active index.
    pub fn active_index(&self) -> usize {
        self.active
    }

    /// Returns a copy of the active monitor record.
    pub fn active(&self) -> Monitor {
        self.monitors[self.active]
    }

    /// Makes the monitor at `index` the active one.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::InvalidMonitorIndex`] when `index` is out of
    /// range; the selection is left unchanged.
    pub fn select(&mut self, index: usize) -> Result<Monitor, RegistryError> {
        let monitor = *self
            .monitors
            .get(index)
            .ok_or(RegistryError::InvalidMonitorIndex {
                index,
                count: self.monitors.len(),
            })?;
        self.active = index;
        Ok(monitor)
    }

    /// Selects the monitor whose [`Monitor::label`] equals `label`.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::UnknownLabel`] when no monitor matches.
    pub fn select_by_label(&mut self, label: &str) -> Result<Monitor, RegistryError> {
        let index = self
            .monitors
            .iter()
            .position(|m| m.label() == label)
            .ok_or_else(|| RegistryError::UnknownLabel(label.to_string()))?;
        self.select(index)
    }

    /// Replaces the monitor set after a deliberate re-enumeration.
    ///
    /// The active index is kept when it is still valid, otherwise the first
    /// monitor becomes active.  Returns the new active monitor.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::Empty`] if `monitors` is empty; the registry is
    /// left unchanged.
    pub fn replace(&mut self, monitors: Vec<Monitor>) -> Result<Monitor, RegistryError> {
        let monitors = renumber(monitors)?;
        if self.active >= monitors.len() {
            self.active = 0;
        }
        self.monitors = monitors;
        Ok(self.active())
    }
}

fn renumber(mut monitors: Vec<Monitor>) -> Result<Vec<Monitor>, RegistryError> {
    if monitors.is_empty() {
        return Err(RegistryError::Empty);
    }
    for (i, m) in monitors.iter_mut().enumerate() {
        m.id = i;
    }
    Ok(monitors)
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn dual_1080p() -> Vec<Monitor> {
        vec![
            Monitor::new(0, 0, 0, 1920, 1080),
            Monitor::new(1, 1920, 0, 1920, 1080),
        ]
    }

    // ── Monitor helpers ───────────────────────────────────────────────────────

    #[test]
    fn test_monitor_right_returns_x_plus_width() {
        let m = Monitor::new(0, 100, 0, 1920, 1080);
        assert_eq!(m.right(), 2020);
    }

    #[test]
    fn test_monitor_bottom_returns_y_plus_height() {
        let m = Monitor::new(0, 0, 50, 1920, 1080);
        assert_eq!(m.bottom(), 1130);
    }

    #[test]
    fn test_monitor_contains_is_half_open() {
        let m = Monitor::new(0, 0, 0, 1920, 1080);
        assert!(m.contains(0, 0));
        assert!(m.contains(1919, 1079));
        assert!(!m.contains(1920, 0));
        assert!(!m.contains(0, 1080));
        assert!(!m.contains(-1, 0));
    }

    #[test]
    fn test_monitor_contains_handles_negative_origin() {
        let m = Monitor::new(0, -1920, -200, 1920, 1080);
        assert!(m.contains(-1920, -200));
        assert!(m.contains(-1, 879));
        assert!(!m.contains(0, 0));
    }

    #[test]
    fn test_monitor_label_is_one_based() {
        let monitors = dual_1080p();
        assert_eq!(monitors[0].label(), "Monitor 1: 1920 x 1080");
        assert_eq!(monitors[1].label(), "Monitor 2: 1920 x 1080");
    }

    // ── new ───────────────────────────────────────────────────────────────────

    #[test]
    fn test_new_rejects_empty_monitor_set() {
        assert_eq!(MonitorRegistry::new(Vec::new()), Err(RegistryError::Empty));
    }

    #[test]
    fn test_new_activates_first_monitor() {
        let registry = MonitorRegistry::new(dual_1080p()).unwrap();
        assert_eq!(registry.active_index(), 0);
        assert_eq!(registry.active(), dual_1080p()[0]);
    }

    #[test]
    fn test_new_renumbers_ids_in_enumeration_order() {
        let registry = MonitorRegistry::new(vec![
            Monitor::new(7, 0, 0, 800, 600),
            Monitor::new(3, 800, 0, 800, 600),
        ])
        .unwrap();
        let ids: Vec<usize> = registry.monitors().iter().map(|m| m.id).collect();
        assert_eq!(ids, vec![0, 1]);
    }

    // ── select ────────────────────────────────────────────────────────────────

    #[test]
    fn test_select_valid_index_updates_active_monitor() {
        let mut registry = MonitorRegistry::new(dual_1080p()).unwrap();
        let selected = registry.select(1).expect("index 1 exists");
        assert_eq!(selected.x, 1920);
        assert_eq!(registry.active_index(), 1);
    }

    #[test]
    fn test_select_invalid_index_leaves_selection_unchanged() {
        let mut registry = MonitorRegistry::new(dual_1080p()).unwrap();
        registry.select(1).unwrap();

        let result = registry.select(2);

        assert_eq!(
            result,
            Err(RegistryError::InvalidMonitorIndex { index: 2, count: 2 })
        );
        assert_eq!(registry.active_index(), 1);
    }

    #[test]
    fn test_select_by_label_finds_matching_monitor() {
        let mut registry = MonitorRegistry::new(vec![
            Monitor::new(0, 0, 0, 1920, 1080),
            Monitor::new(1, 1920, 0, 2560, 1440),
        ])
        .unwrap();
        let selected = registry.select_by_label("Monitor 2: 2560 x 1440").unwrap();
        assert_eq!(selected.id, 1);
    }

    #[test]
    fn test_select_by_unknown_label_fails() {
        let mut registry = MonitorRegistry::new(dual_1080p()).unwrap();
        assert_eq!(
            registry.select_by_label("Monitor 9: 1 x 1"),
            Err(RegistryError::UnknownLabel("Monitor 9: 1 x 1".to_string()))
        );
        assert_eq!(registry.active_index(), 0);
    }

    // ── replace ───────────────────────────────────────────────────────────────

    #[test]
    fn test_replace_keeps_active_index_when_still_valid() {
        let mut registry = MonitorRegistry::new(dual_1080p()).unwrap();
        registry.select(1).unwrap();

        let active = registry
            .replace(vec![
                Monitor::new(0, 0, 0, 2560, 1440),
                Monitor::new(1, 2560, 0, 1280, 1024),
            ])
            .unwrap();

        assert_eq!(registry.active_index(), 1);
        assert_eq!(active.width, 1280);
    }

    #[test]
    fn test_replace_falls_back_to_first_monitor_when_index_vanishes() {
        let mut registry = MonitorRegistry::new(dual_1080p()).unwrap();
        registry.select(1).unwrap();

        registry.replace(vec![Monitor::new(0, 0, 0, 1920, 1080)]).unwrap();

        assert_eq!(registry.active_index(), 0);
    }

    #[test]
    fn test_replace_with_empty_set_leaves_registry_untouched() {
        let mut registry = MonitorRegistry::new(dual_1080p()).unwrap();
        assert_eq!(registry.replace(Vec::new()), Err(RegistryError::Empty));
        assert_eq!(registry.len(), 2);
    }
}
