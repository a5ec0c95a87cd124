pub mod widget;

pub use widget::{MapView, TileTextures};
