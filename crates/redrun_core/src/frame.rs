//! Sprite-sheet animation clock.
//!
//! A `FrameClock` owns a cyclic index range over a single-row sprite strip
//! and advances it on an interval against the simulation clock. The clock
//! is the single source of truth for which sub-rectangle of the sheet is
//! currently displayed; renderers borrow it, they never own it.

use crate::time::interval_elapsed;

/// Axis-aligned rectangle, used both for texture source regions and
/// screen-space destinations.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }
}

/// Cyclic frame index over a horizontal sprite strip.
///
/// `advance` walks `current_index` through `[first_index, last_index]` on
/// the step interval. After the last index has been shown for its full
/// interval, the index overshoots by one and the *next* advance call snaps
/// it back to `first_index`; sampling clamps into range, so the final
/// frame is displayed for one extra tick instead of being skipped.
#[derive(Debug, Clone)]
pub struct FrameClock {
    pub frame_width: f32,
    pub frame_height: f32,
    pub first_index: usize,
    pub last_index: usize,
    pub current_index: usize,
    pub step_interval: f32,
    last_advance: f32,
}

impl FrameClock {
    pub fn new(
        frame_width: f32,
        frame_height: f32,
        first_index: usize,
        last_index: usize,
        step_interval: f32,
    ) -> Self {
        Self {
            frame_width,
            frame_height,
            first_index,
            last_index,
            current_index: first_index,
            step_interval,
            last_advance: 0.0,
        }
    }

    /// Advance the clock to `now`. At most one index step per call; the
    /// overshoot position resets un-gated, which is what produces the
    /// one-tick hold on the final frame.
    pub fn advance(&mut self, now: f32) {
        if self.current_index <= self.last_index {
            if interval_elapsed(now, &mut self.last_advance, self.step_interval) {
                self.current_index += 1;
            }
        } else {
            self.current_index = self.first_index;
        }
    }

    /// Index used for sampling, always within `[first_index, last_index]`.
    pub fn sample_index(&self) -> usize {
        self.current_index.min(self.last_index)
    }

    /// Source sub-rectangle for the currently displayed frame. The strip
    /// is laid out horizontally in a single row.
    pub fn source_rect(&self) -> Rect {
        Rect {
            x: self.sample_index() as f32 * self.frame_width,
            y: 0.0,
            w: self.frame_width,
            h: self.frame_height,
        }
    }
}
