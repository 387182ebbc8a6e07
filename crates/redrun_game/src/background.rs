//! The parallax background node.
//!
//! A static base backdrop plus an ordered stack of scrolling layers.
//! Every tick each layer slides left by its own velocity; at render time
//! each layer is drawn twice, the second copy butted against the first,
//! and a layer that has fully scrolled off-screen snaps back to zero.
//! The seam never shows as long as a layer moves less than its scaled
//! width per tick.

use glam::Vec2;
use redrun_core::input::InputState;
use redrun_render::{Canvas, SpriteHandle};

use crate::node::{Node, StaticRenderer};
use crate::scene::ParallaxFile;

const BACKGROUND_SCALE: f32 = 2.6;

#[derive(Debug)]
pub struct Layer {
    sprite: SpriteHandle,
    pub position: Vec2,
    pub velocity: Vec2,
}

impl Layer {
    pub fn new(sprite: SpriteHandle, position: Vec2, velocity: Vec2) -> Self {
        Self {
            sprite,
            position,
            velocity,
        }
    }
}

#[derive(Debug)]
pub struct Background {
    base: SpriteHandle,
    layers: Vec<Layer>,
    renderer: StaticRenderer,
}

impl Background {
    /// The layer stack is fixed at construction; there is no dynamic
    /// add/remove.
    pub fn new(base: SpriteHandle, layers: Vec<Layer>) -> Self {
        Self {
            base,
            layers,
            renderer: StaticRenderer {
                scale: BACKGROUND_SCALE,
            },
        }
    }

    /// Build the node from a parallax scene file, resolving texture keys
    /// through `lookup` (the asset store in production). Unresolvable
    /// keys fail construction.
    pub fn from_scene(
        scene: &ParallaxFile,
        lookup: impl Fn(&str) -> Result<SpriteHandle, String>,
    ) -> Result<Self, String> {
        let base = lookup(&scene.base)?;
        let layers = scene
            .layers
            .iter()
            .map(|spec| {
                Ok(Layer::new(
                    lookup(&spec.texture)?,
                    Vec2::new(spec.x, spec.y),
                    Vec2::new(spec.velocity_x, 0.0),
                ))
            })
            .collect::<Result<Vec<_>, String>>()?;
        Ok(Self::new(base, layers))
    }

    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }
}

impl Node for Background {
    fn update(&mut self, _now: f32, _input: &InputState) {
        for layer in &mut self.layers {
            layer.position.x += layer.velocity.x;
        }
    }

    fn render(&mut self, canvas: &mut Canvas) {
        let renderer = self.renderer;
        renderer.render(canvas, &self.base, Vec2::ZERO);

        for layer in &mut self.layers {
            let scaled_width = layer.sprite.width() * renderer.scale;
            renderer.render(canvas, &layer.sprite, layer.position);
            renderer.render(
                canvas,
                &layer.sprite,
                Vec2::new(layer.position.x + scaled_width, layer.position.y),
            );

            // Wraparound: once the first copy's right edge crosses the
            // left screen edge the second copy covers the full span, so
            // snapping back to zero is invisible.
            if layer.position.x + scaled_width <= 0.0 {
                layer.position.x = 0.0;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::LayerSpec;
    use std::sync::Arc;

    fn sprite(key: &str, w: u32, h: u32) -> SpriteHandle {
        SpriteHandle {
            key: Arc::from(key),
            size: (w, h),
        }
    }

    fn unit_scale_background(layer_width: u32, velocity_x: f32) -> Background {
        let layer = Layer::new(
            sprite("layer1", layer_width, 50),
            Vec2::ZERO,
            Vec2::new(velocity_x, 0.0),
        );
        let mut background = Background::new(sprite("background", 272, 160), vec![layer]);
        background.renderer.scale = 1.0;
        background
    }

    #[test]
    fn update_scrolls_each_layer_by_its_own_velocity() {
        let layers = vec![
            Layer::new(sprite("layer1", 100, 50), Vec2::ZERO, Vec2::new(-0.24, 0.0)),
            Layer::new(
                sprite("layer2", 100, 50),
                Vec2::new(0.0, 27.0),
                Vec2::new(-0.5, 0.0),
            ),
        ];
        let mut background = Background::new(sprite("background", 272, 160), layers);
        let input = InputState::new();

        background.update(0.0, &input);
        background.update(0.0, &input);

        assert!((background.layers[0].position.x - -0.48).abs() < 1e-6);
        assert!((background.layers[1].position.x - -1.0).abs() < 1e-6);
        // Vertical framing is static, not motion.
        assert_eq!(background.layers[1].position.y, 27.0);
    }

    #[test]
    fn render_draws_base_once_and_each_layer_twice() {
        let layers = vec![
            Layer::new(sprite("layer1", 100, 50), Vec2::ZERO, Vec2::new(-1.0, 0.0)),
            Layer::new(sprite("layer2", 100, 50), Vec2::ZERO, Vec2::new(-1.5, 0.0)),
        ];
        let mut background = Background::new(sprite("background", 272, 160), layers);
        let mut canvas = Canvas::new();

        background.render(&mut canvas);
        assert_eq!(canvas.quad_count(), 1 + 2 * 2);
    }

    #[test]
    fn second_copy_butts_against_the_first() {
        let mut background = unit_scale_background(100, -1.0);
        background.layers[0].position.x = -30.0;
        let mut canvas = Canvas::new();

        background.render(&mut canvas);

        let verts = canvas.vertices();
        // Quad 1 is the first layer copy, quad 2 the seam-covering copy.
        assert_eq!(verts[4].position[0], -30.0);
        assert_eq!(verts[8].position[0], 70.0);
    }

    #[test]
    fn layer_snaps_back_exactly_when_fully_off_screen() {
        let mut background = unit_scale_background(100, -1.0);
        let input = InputState::new();
        let mut canvas = Canvas::new();

        for tick in 1..=100 {
            background.update(0.0, &input);
            canvas.clear();
            background.render(&mut canvas);

            let x = background.layers[0].position.x;
            if tick < 100 {
                assert_eq!(x, -(tick as f32));
            } else {
                // Tick 100: drawn at -100 (second copy at 0), then snapped.
                assert_eq!(x, 0.0);
            }
            // The layer never stays beyond its own width off-screen.
            assert!(x > -100.0 || x == 0.0);
        }
    }

    #[test]
    fn snap_does_not_trigger_while_partially_visible() {
        let mut background = unit_scale_background(100, -1.0);
        background.layers[0].position.x = -99.0;
        let mut canvas = Canvas::new();

        background.render(&mut canvas);
        assert_eq!(background.layers[0].position.x, -99.0);
    }

    #[test]
    fn from_scene_resolves_all_layer_textures_in_order() {
        let scene = ParallaxFile {
            version: "0.1".to_string(),
            scene_id: "steppe_run".to_string(),
            base: "background".to_string(),
            layers: vec![
                LayerSpec {
                    texture: "layer1".to_string(),
                    x: 0.0,
                    y: 0.0,
                    velocity_x: -0.24,
                },
                LayerSpec {
                    texture: "layer2".to_string(),
                    x: 0.0,
                    y: 27.0,
                    velocity_x: -0.5,
                },
            ],
        };

        let background = Background::from_scene(&scene, |key| Ok(sprite(key, 100, 50)))
            .expect("resolvable scene should build");
        assert_eq!(background.layer_count(), 2);
        assert_eq!(background.layers[1].position.y, 27.0);
        assert_eq!(background.layers[1].velocity.x, -0.5);
    }

    #[test]
    fn from_scene_fails_on_unresolvable_texture_key() {
        let scene = ParallaxFile {
            version: "0.1".to_string(),
            scene_id: "steppe_run".to_string(),
            base: "background".to_string(),
            layers: vec![LayerSpec {
                texture: "missing".to_string(),
                x: 0.0,
                y: 0.0,
                velocity_x: -1.0,
            }],
        };

        let err = Background::from_scene(&scene, |key| {
            if key == "background" {
                Ok(sprite(key, 100, 50))
            } else {
                Err(format!("Unknown texture key '{key}'"))
            }
        })
        .expect_err("missing layer texture should fail");
        assert!(err.contains("missing"));
    }
}
