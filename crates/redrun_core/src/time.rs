//! Frame-synchronous timing: the interval timer, the fixed-step frame
//! pacer, and the title-screen blink driver.
//!
//! Simulation time is the fixed-step clock (`TimeState::total_time`), not
//! raw wall-clock reads. Everything that asks "has interval X elapsed"
//! (animation advancement, the blink effect) polls against that clock, so
//! the whole game stays deterministic under a fixed 60 Hz step.

use std::time::Instant;

const FPS_SAMPLE_COUNT: usize = 60;

/// Returns true and stamps `last := now` iff more than `interval` seconds
/// have elapsed since `last`. On the false path `last` is left untouched,
/// so repeated polls with identical inputs agree.
///
/// The caller is responsible for feeding a monotone `now`.
pub fn interval_elapsed(now: f32, last: &mut f32, interval: f32) -> bool {
    if now - *last > interval {
        *last = now;
        return true;
    }
    false
}

/// Title-screen blink driver.
///
/// A counter increments on each firing of the interval timer, and the even
/// or odd phase selects between two tints. The counter moves only on the
/// edge of the timer firing, never once per frame, so the cadence is
/// independent of how finely the caller ticks.
#[derive(Debug, Clone, Copy)]
pub struct Blink {
    interval: f32,
    last_toggle: f32,
    counter: u32,
}

impl Blink {
    pub fn new(interval: f32) -> Self {
        Self {
            interval,
            last_toggle: 0.0,
            counter: 0,
        }
    }

    /// Poll the blink at `now`. Returns true when the phase flipped on
    /// this call.
    pub fn tick(&mut self, now: f32) -> bool {
        if interval_elapsed(now, &mut self.last_toggle, self.interval) {
            self.counter = self.counter.wrapping_add(1);
            return true;
        }
        false
    }

    /// Even phase selects the primary tint, odd the alternate.
    pub fn primary_phase(&self) -> bool {
        self.counter % 2 == 0
    }
}

/// Fixed-timestep frame pacer.
///
/// `begin_frame` measures the wall-clock delta and feeds the accumulator;
/// the main loop then drains it with `while should_step()`, running the
/// simulation in exact `fixed_dt` slices. Presentation pacing (vsync)
/// belongs to the surface, not to this struct.
pub struct TimeState {
    pub fixed_dt: f64,
    pub max_accumulator: f64,
    accumulator: f64,
    pub total_time: f64,
    pub frame_count: u64,
    pub steps_this_frame: u32,
    pub real_dt: f64,
    last_instant: Instant,

    fps_samples: [f64; FPS_SAMPLE_COUNT],
    fps_sample_index: usize,
    pub smoothed_fps: f64,
    pub smoothed_frame_time_ms: f64,
}

impl TimeState {
    pub fn new() -> Self {
        Self {
            fixed_dt: 1.0 / 60.0,
            max_accumulator: 0.25,
            accumulator: 0.0,
            total_time: 0.0,
            frame_count: 0,
            steps_this_frame: 0,
            real_dt: 0.0,
            last_instant: Instant::now(),
            fps_samples: [1.0 / 60.0; FPS_SAMPLE_COUNT],
            fps_sample_index: 0,
            smoothed_fps: 60.0,
            smoothed_frame_time_ms: 16.667,
        }
    }

    pub fn begin_frame(&mut self) {
        let now = Instant::now();
        self.real_dt = now.duration_since(self.last_instant).as_secs_f64();
        self.last_instant = now;

        // Spiral-of-death cap
        if self.real_dt > self.max_accumulator {
            log::warn!(
                "Frame took {:.1}ms — capping accumulator to {}ms",
                self.real_dt * 1000.0,
                self.max_accumulator * 1000.0
            );
            self.real_dt = self.max_accumulator;
        }

        self.accumulator += self.real_dt;
        self.steps_this_frame = 0;
        self.frame_count += 1;

        self.fps_samples[self.fps_sample_index] = self.real_dt;
        self.fps_sample_index = (self.fps_sample_index + 1) % FPS_SAMPLE_COUNT;
        let avg_dt: f64 = self.fps_samples.iter().sum::<f64>() / FPS_SAMPLE_COUNT as f64;
        self.smoothed_frame_time_ms = avg_dt * 1000.0;
        self.smoothed_fps = if avg_dt > 0.0 { 1.0 / avg_dt } else { 0.0 };
    }

    pub fn should_step(&mut self) -> bool {
        if self.accumulator >= self.fixed_dt {
            self.accumulator -= self.fixed_dt;
            self.total_time += self.fixed_dt;
            self.steps_this_frame += 1;
            true
        } else {
            false
        }
    }

    /// Simulation clock in seconds, for the interval timer and animation
    /// clocks. Monotone by construction.
    pub fn now(&self) -> f32 {
        self.total_time as f32
    }
}

impl Default for TimeState {
    fn default() -> Self {
        Self::new()
    }
}
