//! Global-to-local coordinate mapping.
//!
//! The pointer source reports positions in global desktop space: they can be
//! negative (a monitor left of or above the primary one) and can exceed any
//! single monitor's extent.  The canvas only knows local coordinates
//! `0..width × 0..height` of the active monitor.
//!
//! [`CoordinateMapper`] is built from one [`Monitor`] record and never changes
//! afterwards, so every sample it maps is resolved against a single consistent
//! origin and size.

use super::monitor::Monitor;

/// Maps global pointer coordinates into one monitor's local canvas space.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CoordinateMapper {
    monitor: Monitor,
}

impl CoordinateMapper {
    /// Creates a mapper bound to `monitor`.
    pub fn new(monitor: Monitor) -> Self {
        Self { monitor }
    }

    /// Returns the monitor this mapper resolves against.
    pub fn monitor(&self) -> Monitor {
        self.monitor
    }

    /// Converts a global position to local canvas coordinates.
    ///
    /// Returns `Some((local_x, local_y))` iff `0 <= local_x < width` and
    /// `0 <= local_y < height`.  Positions on another monitor, on the exact
    /// right/bottom edge, or at negative local offsets return `None`; they are
    /// never clamped or wrapped.
    pub fn map(&self, global_x: i32, global_y: i32) -> Option<(u32, u32)> {
        if !self.monitor.contains(global_x, global_y) {
            return None;
        }
        let local_x = global_x as i64 - self.monitor.x as i64;
        let local_y = global_y as i64 - self.monitor.y as i64;
        Some((local_x as u32, local_y as u32))
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn mapper_at(x: i32, y: i32, w: u32, h: u32) -> CoordinateMapper {
        CoordinateMapper::new(Monitor::new(0, x, y, w, h))
    }

    #[test]
    fn test_map_returns_identity_on_primary_monitor() {
        let mapper = mapper_at(0, 0, 1920, 1080);
        for (x, y) in [(50, 75), (500, 300), (1000, 800)] {
            assert_eq!(mapper.map(x, y), Some((x as u32, y as u32)));
        }
    }

    #[test]
    fn test_map_subtracts_origin_of_secondary_monitor() {
        let mapper = mapper_at(1920, 0, 1920, 1080);
        assert_eq!(mapper.map(2000, 100), Some((80, 100)));
    }

    #[test]
    fn test_map_accepts_inclusive_lower_edges() {
        let mapper = mapper_at(0, 0, 1920, 1080);
        assert_eq!(mapper.map(0, 0), Some((0, 0)));
        assert_eq!(mapper.map(1919, 1079), Some((1919, 1079)));
    }

    #[test]
    fn test_map_rejects_exclusive_upper_edges() {
        let mapper = mapper_at(0, 0, 1920, 1080);
        assert_eq!(mapper.map(1920, 1080), None);
        assert_eq!(mapper.map(1920, 0), None);
        assert_eq!(mapper.map(0, 1080), None);
    }

    #[test]
    fn test_map_rejects_negative_local_offsets() {
        let mapper = mapper_at(0, 0, 1920, 1080);
        assert_eq!(mapper.map(-1, 0), None);
        assert_eq!(mapper.map(0, -1), None);
    }

    #[test]
    fn test_map_rejects_point_on_monitor_to_the_left() {
        let mapper = mapper_at(1920, 0, 1920, 1080);
        assert_eq!(mapper.map(100, 100), None);
        assert_eq!(mapper.map(1919, 100), None);
    }

    #[test]
    fn test_map_handles_monitor_with_negative_origin() {
        let mapper = mapper_at(-1280, -1024, 1280, 1024);
        assert_eq!(mapper.map(-1280, -1024), Some((0, 0)));
        assert_eq!(mapper.map(-1, -1), Some((1279, 1023)));
        assert_eq!(mapper.map(0, 0), None);
    }

    #[test]
    fn test_map_does_not_overflow_at_integer_extremes() {
        let mapper = mapper_at(i32::MAX - 10, 0, 1920, 1080);
        assert_eq!(mapper.map(i32::MIN, 0), None);
        assert_eq!(mapper.map(i32::MAX, 5), Some((10, 5)));
    }

    #[test]
    fn test_map_on_zero_sized_monitor_rejects_everything() {
        let mapper = mapper_at(0, 0, 0, 0);
        assert_eq!(mapper.map(0, 0), None);
    }
}
