//! Pointer and scroll input state with exponential smoothing.
//!
//! Raw samples arrive at whatever rate the windowing system delivers them
//! (every cursor event, plus a fixed-interval scroll snapshot); the smoothed
//! values advance exactly once per tick inside the effect chain's update, so
//! the sampling rate stays decoupled from the render rate.

use std::time::Duration;

use winit::dpi::{PhysicalPosition, PhysicalSize};

/// Per-tick interpolation weight for the pointer.
pub const POINTER_SMOOTHING: f32 = 0.01;

/// Per-tick interpolation weight for the scroll offset.
pub const SCROLL_SMOOTHING: f32 = 0.001;

/// How often the accumulated scroll offset is snapshotted into raw state.
pub const SCROLL_SAMPLE_INTERVAL: Duration = Duration::from_millis(100);

/// Pixels represented by one wheel "line" tick.
pub const SCROLL_LINE_HEIGHT: f32 = 40.0;

fn lerp(from: f32, to: f32, t: f32) -> f32 {
    from + (to - from) * t
}

/// Converts a cursor position to normalized [0, 1] screen space with the
/// origin at the bottom-left, the orientation the blob shader expects.
pub fn normalized_pointer(position: PhysicalPosition<f64>, size: PhysicalSize<u32>) -> [f32; 2] {
    let width = size.width.max(1) as f64;
    let height = size.height.max(1) as f64;
    [
        (position.x / width) as f32,
        (1.0 - position.y / height) as f32,
    ]
}

/// Accumulates a wheel delta (in pixels, positive = scrolling up) into the
/// page-style scroll offset, which never goes above the top of the page.
pub fn accumulate_scroll(offset: f32, wheel_delta_y: f32) -> f32 {
    (offset - wheel_delta_y).max(0.0)
}

/// Raw vs. smoothed pointer position in normalized screen space.
#[derive(Debug, Default, Clone, Copy)]
pub(crate) struct PointerTracker {
    raw: [f32; 2],
    smoothed: [f32; 2],
}

impl PointerTracker {
    /// Overwrites the raw sample; no smoothing happens at sample time.
    pub fn set_raw(&mut self, raw: [f32; 2]) {
        self.raw = raw;
    }

    /// Advances the smoothed position one tick toward the raw sample.
    pub fn advance(&mut self) {
        self.smoothed[0] = lerp(self.smoothed[0], self.raw[0], POINTER_SMOOTHING);
        self.smoothed[1] = lerp(self.smoothed[1], self.raw[1], POINTER_SMOOTHING);
    }

    pub fn smoothed(&self) -> [f32; 2] {
        self.smoothed
    }
}

/// Raw vs. smoothed scroll fraction (offset / viewport height).
#[derive(Debug, Default, Clone, Copy)]
pub(crate) struct ScrollTracker {
    raw: f32,
    smoothed: f32,
}

impl ScrollTracker {
    pub fn set_raw(&mut self, fraction: f32) {
        self.raw = fraction;
    }

    pub fn advance(&mut self) {
        self.smoothed = lerp(self.smoothed, self.raw, SCROLL_SMOOTHING);
    }

    pub fn smoothed(&self) -> f32 {
        self.smoothed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pointer_normalisation_flips_y() {
        let size = PhysicalSize::new(800, 600);
        let normalized = normalized_pointer(PhysicalPosition::new(200.0, 150.0), size);
        assert!((normalized[0] - 0.25).abs() < 1e-6);
        assert!((normalized[1] - 0.75).abs() < 1e-6);

        let corner = normalized_pointer(PhysicalPosition::new(0.0, 600.0), size);
        assert_eq!(corner, [0.0, 0.0]);
    }

    #[test]
    fn pointer_smoothing_contracts_by_one_minus_alpha() {
        let mut tracker = PointerTracker::default();
        tracker.set_raw([1.0, 0.5]);

        let mut gap = 1.0f32;
        for _ in 0..50 {
            tracker.advance();
            let next_gap = 1.0 - tracker.smoothed()[0];
            // Strictly contracting by exactly (1 - alpha), never overshooting.
            assert!(next_gap < gap);
            assert!((next_gap - gap * (1.0 - POINTER_SMOOTHING)).abs() < 1e-6);
            assert!(tracker.smoothed()[0] <= 1.0);
            assert!(tracker.smoothed()[1] <= 0.5);
            gap = next_gap;
        }
    }

    #[test]
    fn scroll_smoothing_converges_without_overshoot() {
        let mut tracker = ScrollTracker::default();
        tracker.set_raw(2.0);

        let mut gap = 2.0f32;
        for _ in 0..100 {
            tracker.advance();
            let next_gap = 2.0 - tracker.smoothed();
            assert!(next_gap < gap);
            assert!((next_gap - gap * (1.0 - SCROLL_SMOOTHING)).abs() < 1e-4);
            assert!(tracker.smoothed() <= 2.0);
            gap = next_gap;
        }
    }

    #[test]
    fn raw_samples_do_not_move_the_smoothed_value() {
        let mut tracker = PointerTracker::default();
        tracker.set_raw([0.8, 0.2]);
        assert_eq!(tracker.smoothed(), [0.0, 0.0]);
        assert_eq!(tracker.raw, [0.8, 0.2]);
    }

    #[test]
    fn scroll_accumulation_clamps_at_the_top() {
        let offset = accumulate_scroll(0.0, 120.0);
        assert_eq!(offset, 0.0);

        let down = accumulate_scroll(0.0, -80.0);
        assert_eq!(down, 80.0);
        assert_eq!(accumulate_scroll(down, 100.0), 0.0);
    }
}
