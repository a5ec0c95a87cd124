pub mod grid;
pub mod loader;
pub mod source;
pub mod store;

// Re-exports for convenience
pub use grid::{compute_visible_tiles, VisibleTile};
pub use loader::{HttpTileFetcher, TileFetcher, TileLoader, TileResult};
pub use source::{TileSource, UrlTemplateSource};
pub use store::{TileImage, TileImageState, TileStore};
