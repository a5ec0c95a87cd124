//! # fleetmap
//!
//! Embedded slippy-map renderer for IoT fleet dashboards.
//!
//! The crate projects geocoordinates onto Web-Mercator raster tiles, keeps
//! device markers in sync with the tile grid while the user pans, and turns
//! pointer input into pan, zoom, marker-click and placement-click events.
//! A [`MapRenderer`] produces a [`Scene`] of draw commands that any surface
//! can execute; the `egui` feature ships one such surface.

pub mod core;
pub mod input;
pub mod layers;
pub mod prelude;
pub mod rendering;
pub mod tiles;
#[cfg(feature = "egui")]
pub mod ui;
pub use crate::core::constants;

// Re-export public API
pub use crate::core::{
    bounds::Bounds,
    config::MapConfig,
    geo::{GeoPoint, Point, TileAddress},
    viewport::{ViewFrame, ViewportState},
};

pub use layers::{
    marker::{Marker, MarkerKind, MarkerStatus},
    projector::{project_markers, ProjectedMarker},
};

pub use input::{
    controller::ViewportController,
    events::{MapEvent, MapEventKind, PointerEvent, ZoomDirection},
};

pub use rendering::{
    context::{DrawCommand, Scene},
    renderer::MapRenderer,
    resize::ResizeNotifier,
};

pub use tiles::{grid::compute_visible_tiles, loader::TileLoader, source::UrlTemplateSource};

/// Result type used throughout the library
pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// Common error types
#[derive(Debug, thiserror::Error)]
pub enum MapError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Invalid tile URL template: {0}")]
    InvalidTemplate(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Image decode error: {0}")]
    Decode(#[from] image::ImageError),
}

/// Error type alias for convenience
pub type Error = MapError;

/// Installs `env_logger` as the `log` backend, honouring `RUST_LOG`.
///
/// Safe to call more than once; later calls are no-ops.
#[cfg(feature = "debug")]
pub fn init_logging() {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .is_test(cfg!(test))
        .try_init();
}
