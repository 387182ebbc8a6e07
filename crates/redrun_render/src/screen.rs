use glam::Mat4;

#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ScreenUniform {
    pub view_proj: [[f32; 4]; 4],
}

/// Pixel-space projection with the origin in the top-left corner and the
/// y axis pointing down, matching how the scene is authored. There is no
/// camera: the game world is exactly one fixed screen.
pub struct ScreenSpace {
    pub width: u32,
    pub height: u32,
}

impl ScreenSpace {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn build_uniform(&self) -> ScreenUniform {
        let proj = Mat4::orthographic_rh(
            0.0,
            self.width as f32,
            self.height as f32,
            0.0,
            -1.0,
            1.0,
        );

        ScreenUniform {
            view_proj: proj.to_cols_array_2d(),
        }
    }
}
