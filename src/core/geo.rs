use crate::core::constants::{MAX_LATITUDE, TILE_SIZE};
use serde::{Deserialize, Serialize};

/// Represents a geographical coordinate with latitude and longitude
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

impl GeoPoint {
    /// Creates a new GeoPoint coordinate
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Validates that the coordinates can be projected without clamping
    pub fn is_valid(&self) -> bool {
        self.lat.is_finite()
            && self.lng.is_finite()
            && self.lat.abs() <= MAX_LATITUDE
            && (-180.0..180.0).contains(&self.lng)
    }

    /// Wraps longitude to the half-open [-180, 180) range
    pub fn wrap_lng(lng: f64) -> f64 {
        if !lng.is_finite() {
            return 0.0;
        }
        let wrapped = (lng + 180.0).rem_euclid(360.0) - 180.0;
        // rem_euclid can round up to exactly 360 for tiny negative inputs
        if wrapped >= 180.0 {
            wrapped - 360.0
        } else {
            wrapped
        }
    }

    /// Clamps latitude to the Mercator-valid range
    pub fn clamp_lat(lat: f64) -> f64 {
        if lat.is_nan() {
            return 0.0;
        }
        lat.clamp(-MAX_LATITUDE, MAX_LATITUDE)
    }

    /// Returns the coordinate with latitude clamped and longitude wrapped
    pub fn normalized(&self) -> Self {
        Self::new(Self::clamp_lat(self.lat), Self::wrap_lng(self.lng))
    }
}

impl Default for GeoPoint {
    fn default() -> Self {
        Self::new(0.0, 0.0)
    }
}

/// Represents a point in screen or world-pixel coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn zero() -> Self {
        Self::new(0.0, 0.0)
    }

    pub fn add(&self, other: &Point) -> Point {
        Point::new(self.x + other.x, self.y + other.y)
    }

    pub fn subtract(&self, other: &Point) -> Point {
        Point::new(self.x - other.x, self.y - other.y)
    }

    pub fn length(&self) -> f64 {
        (self.x * self.x + self.y * self.y).sqrt()
    }

    pub fn distance_to(&self, other: &Point) -> f64 {
        self.subtract(other).length()
    }

    pub fn is_zero(&self) -> bool {
        self.x == 0.0 && self.y == 0.0
    }
}

impl Default for Point {
    fn default() -> Self {
        Self::zero()
    }
}

/// A tile in the slippy map tile system
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TileAddress {
    pub x: u32,
    pub y: u32,
    pub z: u8,
}

impl TileAddress {
    pub fn new(x: u32, y: u32, z: u8) -> Self {
        Self { x, y, z }
    }

    /// Builds an address from signed tile indices, wrapping x and clamping y
    pub fn wrapped(x: i64, y: i64, z: u8) -> Self {
        let n = tiles_per_axis(z) as i64;
        Self::new(x.rem_euclid(n) as u32, y.clamp(0, n - 1) as u32, z)
    }

    /// Checks if the tile is valid for its zoom level
    pub fn is_valid(&self) -> bool {
        let max_coord = tiles_per_axis(self.z);
        self.x < max_coord && self.y < max_coord
    }

    /// World-pixel position of the tile's north-west corner
    pub fn origin(&self) -> Point {
        let size = TILE_SIZE as f64;
        Point::new(self.x as f64 * size, self.y as f64 * size)
    }
}

impl std::fmt::Display for TileAddress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}/{}", self.z, self.x, self.y)
    }
}

/// Number of tiles along one axis at `zoom`
pub fn tiles_per_axis(zoom: u8) -> u32 {
    1u32 << zoom.min(31)
}

/// Side length of the whole projected world in pixels at `zoom`
pub fn world_size(zoom: u8) -> f64 {
    tiles_per_axis(zoom) as f64 * TILE_SIZE as f64
}
