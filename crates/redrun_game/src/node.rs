//! Scene nodes and their draw strategies.
//!
//! A node composes a position, a velocity and one of two renderers, and
//! follows the update-then-render contract once per tick. The two
//! renderers split on what they sample: the static renderer draws a whole
//! texture, the animated renderer draws only the sub-rectangle its frame
//! clock currently selects. A node owns its clock; the renderer only
//! borrows it for the duration of a draw.

use glam::Vec2;
use redrun_core::frame::{FrameClock, Rect};
use redrun_core::input::InputState;
use redrun_render::canvas::WHITE;
use redrun_render::{Canvas, SpriteHandle};

/// The per-tick contract every scene element follows. `render` takes
/// `&mut self` because the parallax node finalizes its wraparound while
/// emitting draws.
pub trait Node {
    fn update(&mut self, now: f32, input: &InputState);
    fn render(&mut self, canvas: &mut Canvas);
}

/// Draws a whole texture, uniformly scaled, untinted.
#[derive(Debug, Clone, Copy)]
pub struct StaticRenderer {
    pub scale: f32,
}

impl StaticRenderer {
    pub fn render(&self, canvas: &mut Canvas, sprite: &SpriteHandle, position: Vec2) {
        self.render_tinted(canvas, sprite, position, WHITE);
    }

    pub fn render_tinted(
        &self,
        canvas: &mut Canvas,
        sprite: &SpriteHandle,
        position: Vec2,
        tint: [f32; 4],
    ) {
        let dst = Rect::new(
            position.x,
            position.y,
            sprite.width() * self.scale,
            sprite.height() * self.scale,
        );
        canvas.draw_textured_rect(sprite, sprite.full_rect(), dst, tint);
    }
}

/// Draws the sprite-strip sub-rectangle a frame clock currently selects.
/// With no clock bound it draws nothing; that is the "not yet wired up"
/// state, not an error.
#[derive(Debug, Clone, Copy)]
pub struct AnimatedRenderer {
    pub scale: f32,
}

impl AnimatedRenderer {
    pub fn render(
        &self,
        canvas: &mut Canvas,
        sprite: &SpriteHandle,
        clock: Option<&FrameClock>,
        position: Vec2,
    ) {
        let Some(clock) = clock else {
            return;
        };
        let src = clock.source_rect();
        let dst = Rect::new(
            position.x,
            position.y,
            src.w * self.scale,
            src.h * self.scale,
        );
        canvas.draw_textured_rect(sprite, src, dst, WHITE);
    }
}
