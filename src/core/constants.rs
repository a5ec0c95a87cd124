//! Core constants derived from common web-map conventions.
//! Keeping them in a single place makes it easier to tweak engine-wide magic numbers.

/// Default square tile size in pixels.
pub const TILE_SIZE: u32 = 256;

/// Latitude limit of the square Web-Mercator world.
pub const MAX_LATITUDE: f64 = 85.051_128_779_806_59;

/// Default lower zoom bound.
pub const DEFAULT_MIN_ZOOM: u8 = 2;

/// Default upper zoom bound.
pub const DEFAULT_MAX_ZOOM: u8 = 18;

/// Highest zoom the tile math accepts (2^22 tiles per axis).
pub const ZOOM_LIMIT: u8 = 22;

/// Net pointer travel, in pixels, below which a press/release is a click.
pub const DEFAULT_CLICK_THRESHOLD_PX: f64 = 3.0;

/// Degrees of latitude assumed to span the world height when committing a drag.
pub const DRAG_LATITUDE_SPAN_DEGREES: f64 = 170.0;

/// Marker glyph diameter in pixels.
pub const DEFAULT_MARKER_DIAMETER: f64 = 24.0;

/// Zoom button edge length in pixels.
pub const DEFAULT_CONTROL_BUTTON_SIZE: f64 = 30.0;

/// Distance between zoom buttons and the container edge.
pub const DEFAULT_CONTROL_MARGIN: f64 = 10.0;

/// OpenStreetMap raster tiles.
pub const DEFAULT_TILE_URL_TEMPLATE: &str = "https://tile.openstreetmap.org/{z}/{x}/{y}.png";
