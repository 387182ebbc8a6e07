pub mod overlay;
pub mod title;

pub use overlay::{OverlayStats, UiLayer};
pub use title::TitleScreen;
