//! CPU-side quad batcher: the draw surface the scene renders into.
//!
//! Nodes push textured rectangles each tick; the canvas accumulates one
//! vertex/index mesh plus a draw-call list keyed by texture. Consecutive
//! quads sharing a texture collapse into a single `draw_indexed` range,
//! minimizing bind-group switches during the render pass. The batcher is
//! pure CPU state; uploading and drawing the mesh is the driver's job.

use std::sync::Arc;

use redrun_core::frame::Rect;

use crate::sprite_pipeline::SpriteVertex;

pub const WHITE: [f32; 4] = [1.0, 1.0, 1.0, 1.0];
pub const BLACK: [f32; 4] = [0.0, 0.0, 0.0, 1.0];
pub const RED: [f32; 4] = [0.90, 0.16, 0.22, 1.0];

/// Non-owning reference to a texture in the asset store: the store key
/// plus the pixel size captured at load time. Everything a node needs to
/// issue draws without touching GPU objects.
#[derive(Debug, Clone)]
pub struct SpriteHandle {
    pub key: Arc<str>,
    pub size: (u32, u32),
}

impl SpriteHandle {
    pub fn width(&self) -> f32 {
        self.size.0 as f32
    }

    pub fn height(&self) -> f32 {
        self.size.1 as f32
    }

    /// The whole texture as a source rectangle.
    pub fn full_rect(&self) -> Rect {
        Rect::new(0.0, 0.0, self.width(), self.height())
    }
}

/// A contiguous run of indices that share the same texture binding.
#[derive(Debug, Clone)]
pub struct DrawCall {
    pub texture_key: Arc<str>,
    pub index_start: u32,
    pub index_count: u32,
}

#[derive(Default)]
pub struct Canvas {
    vertices: Vec<SpriteVertex>,
    indices: Vec<u32>,
    draw_calls: Vec<DrawCall>,
}

impl Canvas {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop all recorded quads. Called once per frame before the scene
    /// renders.
    pub fn clear(&mut self) {
        self.vertices.clear();
        self.indices.clear();
        self.draw_calls.clear();
    }

    /// Record one textured quad: the `src` sub-rectangle of the sprite's
    /// texture (in pixels) mapped onto the `dst` screen rectangle, with a
    /// multiplicative tint.
    pub fn draw_textured_rect(&mut self, sprite: &SpriteHandle, src: Rect, dst: Rect, tint: [f32; 4]) {
        let (tex_w, tex_h) = (sprite.width(), sprite.height());
        let u0 = src.x / tex_w;
        let v0 = src.y / tex_h;
        let u1 = (src.x + src.w) / tex_w;
        let v1 = (src.y + src.h) / tex_h;

        let base_index = self.vertices.len() as u32;
        self.vertices.push(SpriteVertex {
            position: [dst.x, dst.y],
            tex_coords: [u0, v0],
            color: tint,
        });
        self.vertices.push(SpriteVertex {
            position: [dst.x + dst.w, dst.y],
            tex_coords: [u1, v0],
            color: tint,
        });
        self.vertices.push(SpriteVertex {
            position: [dst.x + dst.w, dst.y + dst.h],
            tex_coords: [u1, v1],
            color: tint,
        });
        self.vertices.push(SpriteVertex {
            position: [dst.x, dst.y + dst.h],
            tex_coords: [u0, v1],
            color: tint,
        });

        let index_start = self.indices.len() as u32;
        self.indices.extend_from_slice(&[
            base_index,
            base_index + 1,
            base_index + 2,
            base_index,
            base_index + 2,
            base_index + 3,
        ]);

        self.push_draw_call(sprite.key.clone(), index_start, 6);
    }

    /// Append a draw call, merging with the previous one when the texture
    /// matches and the index ranges are contiguous.
    fn push_draw_call(&mut self, texture_key: Arc<str>, index_start: u32, index_count: u32) {
        if let Some(last) = self.draw_calls.last_mut() {
            let contiguous = last.index_start + last.index_count == index_start;
            if *last.texture_key == *texture_key && contiguous {
                last.index_count += index_count;
                return;
            }
        }
        self.draw_calls.push(DrawCall {
            texture_key,
            index_start,
            index_count,
        });
    }

    pub fn vertices(&self) -> &[SpriteVertex] {
        &self.vertices
    }

    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    pub fn draw_calls(&self) -> &[DrawCall] {
        &self.draw_calls
    }

    pub fn quad_count(&self) -> usize {
        self.vertices.len() / 4
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn handle(key: &str, w: u32, h: u32) -> SpriteHandle {
        SpriteHandle {
            key: Arc::from(key),
            size: (w, h),
        }
    }

    #[test]
    fn one_quad_emits_four_vertices_six_indices() {
        let mut canvas = Canvas::new();
        let sprite = handle("bg", 64, 32);
        canvas.draw_textured_rect(
            &sprite,
            sprite.full_rect(),
            Rect::new(0.0, 0.0, 64.0, 32.0),
            WHITE,
        );

        assert_eq!(canvas.vertices().len(), 4);
        assert_eq!(canvas.indices().len(), 6);
        assert_eq!(canvas.quad_count(), 1);
        assert_eq!(canvas.draw_calls().len(), 1);
    }

    #[test]
    fn source_rect_maps_to_normalized_uvs() {
        // Second 48px frame of a 288px strip: u in [1/6, 2/6].
        let mut canvas = Canvas::new();
        let sprite = handle("run", 288, 48);
        canvas.draw_textured_rect(
            &sprite,
            Rect::new(48.0, 0.0, 48.0, 48.0),
            Rect::new(10.0, 20.0, 120.0, 120.0),
            WHITE,
        );

        let verts = canvas.vertices();
        assert!((verts[0].tex_coords[0] - 1.0 / 6.0).abs() < 1e-6);
        assert!((verts[1].tex_coords[0] - 2.0 / 6.0).abs() < 1e-6);
        assert_eq!(verts[0].tex_coords[1], 0.0);
        assert_eq!(verts[2].tex_coords[1], 1.0);
    }

    #[test]
    fn destination_rect_becomes_quad_corners() {
        let mut canvas = Canvas::new();
        let sprite = handle("bg", 10, 10);
        canvas.draw_textured_rect(
            &sprite,
            sprite.full_rect(),
            Rect::new(5.0, 7.0, 20.0, 30.0),
            WHITE,
        );

        let verts = canvas.vertices();
        assert_eq!(verts[0].position, [5.0, 7.0]);
        assert_eq!(verts[1].position, [25.0, 7.0]);
        assert_eq!(verts[2].position, [25.0, 37.0]);
        assert_eq!(verts[3].position, [5.0, 37.0]);
    }

    #[test]
    fn consecutive_quads_with_same_texture_merge() {
        let mut canvas = Canvas::new();
        let sprite = handle("layer1", 100, 50);
        for i in 0..3 {
            canvas.draw_textured_rect(
                &sprite,
                sprite.full_rect(),
                Rect::new(i as f32 * 100.0, 0.0, 100.0, 50.0),
                WHITE,
            );
        }

        assert_eq!(canvas.draw_calls().len(), 1);
        assert_eq!(canvas.draw_calls()[0].index_count, 18);
    }

    #[test]
    fn texture_switch_starts_a_new_draw_call() {
        let mut canvas = Canvas::new();
        let a = handle("layer1", 100, 50);
        let b = handle("layer2", 100, 50);
        canvas.draw_textured_rect(&a, a.full_rect(), Rect::new(0.0, 0.0, 100.0, 50.0), WHITE);
        canvas.draw_textured_rect(&b, b.full_rect(), Rect::new(0.0, 0.0, 100.0, 50.0), WHITE);
        canvas.draw_textured_rect(&a, a.full_rect(), Rect::new(0.0, 0.0, 100.0, 50.0), WHITE);

        let calls = canvas.draw_calls();
        assert_eq!(calls.len(), 3);
        assert_eq!(calls[0].index_start, 0);
        assert_eq!(calls[1].index_start, 6);
        assert_eq!(calls[2].index_start, 12);
    }

    #[test]
    fn clear_resets_all_recorded_state() {
        let mut canvas = Canvas::new();
        let sprite = handle("bg", 10, 10);
        canvas.draw_textured_rect(
            &sprite,
            sprite.full_rect(),
            Rect::new(0.0, 0.0, 10.0, 10.0),
            WHITE,
        );
        canvas.clear();

        assert!(canvas.vertices().is_empty());
        assert!(canvas.indices().is_empty());
        assert!(canvas.draw_calls().is_empty());
    }

    #[test]
    fn tint_is_written_to_every_vertex() {
        let mut canvas = Canvas::new();
        let sprite = handle("face", 10, 10);
        canvas.draw_textured_rect(
            &sprite,
            sprite.full_rect(),
            Rect::new(0.0, 0.0, 10.0, 10.0),
            RED,
        );
        for vert in canvas.vertices() {
            assert_eq!(vert.color, RED);
        }
    }
}
