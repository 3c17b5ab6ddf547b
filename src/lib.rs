//! Tzedakah Run - skateboarding endless runner simulation core
//!
//! Core modules:
//! - `sim`: Deterministic simulation (player physics, spawners, collisions, missions)
//! - `tuning`: Data-driven game balance
//! - `loadout`: Per-session cosmetic and power-up configuration
//!
//! Rendering, audio, persistence and input decoding live outside this crate.
//! They talk to the core through `sim::GameState` actions and drained
//! `sim::GameEvent`s.

pub mod loadout;
pub mod sim;
pub mod tuning;

pub use loadout::{Cosmetic, Gadget, Loadout, StartPowerups};
pub use tuning::Tuning;

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Game configuration constants
pub mod consts {
    /// Nominal frame rate the tuning values are expressed in
    pub const FRAMES_PER_SECOND: u32 = 60;
    /// Seconds per frame at the nominal rate
    pub const FRAME_SECS: f32 = 1.0 / FRAMES_PER_SECOND as f32;
    /// Frames between periodic score reports
    pub const REPORT_INTERVAL_FRAMES: u64 = 30;
}

/// Axis-aligned box in world pixels (y grows downward, like a canvas)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub pos: Vec2,
    pub size: Vec2,
}

impl Rect {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self {
            pos: Vec2::new(x, y),
            size: Vec2::new(w, h),
        }
    }

    #[inline]
    pub fn left(&self) -> f32 {
        self.pos.x
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.pos.x + self.size.x
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.pos.y
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.pos.y + self.size.y
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        self.pos + self.size * 0.5
    }

    /// Strict overlap test (touching edges do not count)
    #[inline]
    pub fn intersects(&self, other: &Rect) -> bool {
        self.left() < other.right()
            && self.right() > other.left()
            && self.top() < other.bottom()
            && self.bottom() > other.top()
    }

    /// Shrink the box on both axes by `ratio` of its own size per side
    pub fn inset(&self, ratio: f32) -> Rect {
        let margin = self.size * ratio;
        Rect {
            pos: self.pos + margin,
            size: (self.size - margin * 2.0).max(Vec2::ZERO),
        }
    }

    /// True once the box has fully left the screen to the left
    #[inline]
    pub fn is_off_left(&self) -> bool {
        self.right() < 0.0
    }
}

/// Circular proximity test between two box centers
#[inline]
pub fn within_radius(a: &Rect, b: &Rect, radius: f32) -> bool {
    a.center().distance_squared(b.center()) < radius * radius
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_intersects() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert!(a.intersects(&Rect::new(5.0, 5.0, 10.0, 10.0)));
        // Touching edges only
        assert!(!a.intersects(&Rect::new(10.0, 0.0, 10.0, 10.0)));
        assert!(!a.intersects(&Rect::new(0.0, 20.0, 10.0, 10.0)));
    }

    #[test]
    fn test_inset_shrinks_both_axes() {
        let r = Rect::new(0.0, 0.0, 100.0, 50.0).inset(0.1);
        assert!((r.left() - 10.0).abs() < 0.001);
        assert!((r.top() - 5.0).abs() < 0.001);
        assert!((r.right() - 90.0).abs() < 0.001);
        assert!((r.bottom() - 45.0).abs() < 0.001);
    }

    #[test]
    fn test_inset_avoids_grazing_hits() {
        let a = Rect::new(0.0, 0.0, 40.0, 40.0);
        let b = Rect::new(38.0, 0.0, 40.0, 40.0);
        assert!(a.intersects(&b));
        assert!(!a.inset(0.1).intersects(&b.inset(0.1)));
    }

    #[test]
    fn test_within_radius_is_circular() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        // Diagonal offset of 30,30 is ~42 apart: outside a radius of 40
        let b = Rect::new(30.0, 30.0, 10.0, 10.0);
        assert!(!within_radius(&a, &b, 40.0));
        assert!(within_radius(&a, &b, 45.0));
    }
}
