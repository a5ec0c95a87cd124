pub mod context;
pub mod renderer;
pub mod resize;

// Re-export main types
pub use context::{DrawCommand, Scene};
pub use renderer::{zoom_button_rects, MapRenderer};
pub use resize::{ContainerSize, ResizeNotifier, ResizeSubscription};
