pub mod canvas;
pub mod gpu_context;
pub mod screen;
pub mod sprite_pipeline;
pub mod texture;

pub use canvas::{Canvas, DrawCall, SpriteHandle};
pub use gpu_context::GpuContext;
pub use screen::{ScreenSpace, ScreenUniform};
pub use sprite_pipeline::{SpritePipeline, SpriteVertex};
pub use texture::Texture;
