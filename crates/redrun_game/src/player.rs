//! The player node: a run-cycle sprite with input-driven vertical motion.

use glam::Vec2;
use redrun_core::frame::FrameClock;
use redrun_core::input::{InputState, Key};
use redrun_render::{Canvas, SpriteHandle};

use crate::node::{AnimatedRenderer, Node};

const RUN_FRAME_SIZE: f32 = 48.0;
const RUN_FIRST_FRAME: usize = 0;
const RUN_LAST_FRAME: usize = 5;
const RUN_STEP_INTERVAL: f32 = 0.15;
const RUN_SCALE: f32 = 2.5;
const VERTICAL_SPEED: f32 = 5.0;

pub struct Player {
    pub position: Vec2,
    pub velocity: Vec2,
    run_clock: FrameClock,
    renderer: AnimatedRenderer,
    sprite: SpriteHandle,
}

impl Player {
    pub fn new(sprite: SpriteHandle, window_height: u32) -> Self {
        let run_clock = FrameClock::new(
            RUN_FRAME_SIZE,
            RUN_FRAME_SIZE,
            RUN_FIRST_FRAME,
            RUN_LAST_FRAME,
            RUN_STEP_INTERVAL,
        );
        // Hand-tuned placement: the centering span is 1.5x the window
        // height, which parks the runner below the visual center.
        let position = Vec2::new(
            RUN_FRAME_SIZE,
            center(window_height as f32 * 1.5, RUN_FRAME_SIZE),
        );
        Self {
            position,
            velocity: Vec2::new(0.0, VERTICAL_SPEED),
            run_clock,
            renderer: AnimatedRenderer { scale: RUN_SCALE },
            sprite,
        }
    }
}

impl Node for Player {
    fn update(&mut self, now: f32, input: &InputState) {
        self.run_clock.advance(now);

        // Up wins when both keys are held.
        if input.is_held(Key::Up) {
            self.position += Vec2::new(self.velocity.x, -self.velocity.y);
        } else if input.is_held(Key::Down) {
            self.position += Vec2::new(self.velocity.x, self.velocity.y);
        }
    }

    fn render(&mut self, canvas: &mut Canvas) {
        self.renderer
            .render(canvas, &self.sprite, Some(&self.run_clock), self.position);
    }
}

fn center(outer: f32, inner: f32) -> f32 {
    (outer - inner) / 2.0
}
