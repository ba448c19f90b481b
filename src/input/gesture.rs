//! Press tracking: tells a tap from a drag.
//!
//! One tracker lives for the duration of a press (mouse button or single
//! finger):
//! - Tap: release after less than `threshold` px of accumulated travel
//! - Drag: anything longer; the tracker also yields per-move deltas and the
//!   elapsed milliseconds needed for a velocity estimate

use std::time::Instant;

use glam::Vec2;

/// Recognized outcome of a finished press
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Gesture {
    /// Short press, no significant movement
    Tap { at: Vec2 },
    /// Moved past the threshold at some point
    Drag,
}

/// One pointer movement while pressed
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Motion {
    pub delta: Vec2,
    /// Milliseconds since the previous sample (0 when the clock did not move)
    pub dt_ms: f32,
}

impl Motion {
    /// Pointer velocity in px/ms, if time advanced.
    pub fn velocity(&self) -> Option<Vec2> {
        (self.dt_ms > 0.0).then(|| self.delta / self.dt_ms)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PressTracker {
    origin: Vec2,
    last: Vec2,
    last_time: Instant,
    /// Accumulated path length (for distinguishing tap from drag)
    travel: f32,
    threshold: f32,
    touch: bool,
}

impl PressTracker {
    pub fn start(at: Vec2, now: Instant, threshold: f32, touch: bool) -> Self {
        Self {
            origin: at,
            last: at,
            last_time: now,
            travel: 0.0,
            threshold,
            touch,
        }
    }

    /// Record a move and return the delta since the previous sample.
    pub fn move_to(&mut self, at: Vec2, now: Instant) -> Motion {
        let delta = at - self.last;
        let dt_ms = now
            .checked_duration_since(self.last_time)
            .map(|d| d.as_secs_f32() * 1000.0)
            .unwrap_or(0.0);
        self.travel += delta.length();
        self.last = at;
        self.last_time = now;
        Motion { delta, dt_ms }
    }

    /// Movement so far exceeds the tap threshold.
    pub fn exceeded(&self) -> bool {
        self.travel > self.threshold
    }

    pub fn finish(&self) -> Gesture {
        if self.exceeded() {
            Gesture::Drag
        } else {
            Gesture::Tap { at: self.last }
        }
    }

    pub fn origin(&self) -> Vec2 {
        self.origin
    }

    pub fn last(&self) -> Vec2 {
        self.last
    }

    pub fn travel(&self) -> f32 {
        self.travel
    }

    pub fn is_touch(&self) -> bool {
        self.touch
    }
}
