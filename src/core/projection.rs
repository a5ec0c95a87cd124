//! Web-Mercator (EPSG:3857) tile math.
//!
//! Every function here is pure. Latitudes are clamped into the
//! Mercator-valid range and longitudes wrapped into [-180, 180) before
//! projecting, so no input ever produces an error or a non-finite pixel.

use crate::core::{
    constants::{DRAG_LATITUDE_SPAN_DEGREES, TILE_SIZE},
    geo::{world_size, GeoPoint, Point, TileAddress},
};
use std::f64::consts::PI;

/// Projects a coordinate to world pixel space at `zoom`.
///
/// The world spans `[0, 2^zoom * 256)` on both axes with the origin at the
/// north-west corner.
pub fn world_pixel(point: &GeoPoint, zoom: u8) -> Point {
    let point = point.normalized();
    let size = world_size(zoom);
    let lat_rad = point.lat.to_radians();

    // ln(tan φ + sec φ) == asinh(tan φ)
    let x = (point.lng + 180.0) / 360.0 * size;
    let y = (1.0 - lat_rad.tan().asinh() / PI) / 2.0 * size;

    Point::new(x, y)
}

/// Tile containing `point` at `zoom`.
pub fn tile_address_of(point: &GeoPoint, zoom: u8) -> TileAddress {
    tile_for_world_pixel(&world_pixel(point, zoom), zoom)
}

/// Sub-tile pixel position of `point` inside its tile at `zoom`.
pub fn pixel_offset_within_tile(point: &GeoPoint, zoom: u8) -> Point {
    let world = world_pixel(point, zoom);
    let tile = tile_for_world_pixel(&world, zoom);
    // Measured from the (clamped) tile origin so that the sum of the two
    // parts always reproduces the world pixel, even on the polar edge rows.
    world.subtract(&tile.origin())
}

/// Inverse of [`world_pixel`].
pub fn inverse_projection(world_x: f64, world_y: f64, zoom: u8) -> GeoPoint {
    let size = world_size(zoom);
    let lng = world_x / size * 360.0 - 180.0;
    let lat = (PI * (1.0 - 2.0 * world_y / size)).sinh().atan().to_degrees();

    GeoPoint::new(lat, lng).normalized()
}

/// Horizontal pixels per degree of longitude at `zoom`.
pub fn pixels_per_degree_lng(zoom: u8) -> f64 {
    world_size(zoom) / 360.0
}

/// Approximate vertical pixels per degree of latitude at `zoom`.
///
/// A constant scale rather than the local Mercator derivative; accuracy
/// degrades towards the poles.
pub fn pixels_per_degree_lat(zoom: u8) -> f64 {
    world_size(zoom) / DRAG_LATITUDE_SPAN_DEGREES
}

fn tile_for_world_pixel(world: &Point, zoom: u8) -> TileAddress {
    let size = TILE_SIZE as f64;
    let x = (world.x / size).floor() as i64;
    let y = (world.y / size).floor() as i64;
    TileAddress::wrapped(x, y, zoom)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::constants::MAX_LATITUDE;
    use crate::core::geo::tiles_per_axis;

    #[test]
    fn test_origin_projects_to_world_center() {
        let p = world_pixel(&GeoPoint::new(0.0, 0.0), 1);
        assert!((p.x - 256.0).abs() < 1e-9);
        assert!((p.y - 256.0).abs() < 1e-9);
        assert_eq!(tile_address_of(&GeoPoint::new(0.0, 0.0), 1), TileAddress::new(1, 1, 1));
    }

    #[test]
    fn test_known_tile_address() {
        // Berlin at zoom 10 is the well known OSM tile 10/550/335
        let berlin = GeoPoint::new(52.52, 13.405);
        assert_eq!(tile_address_of(&berlin, 10), TileAddress::new(550, 335, 10));
    }

    #[test]
    fn test_round_trip_projection() {
        let points = [
            GeoPoint::new(0.0, 0.0),
            GeoPoint::new(37.7749, -122.4194),
            GeoPoint::new(-33.8688, 151.2093),
            GeoPoint::new(85.05, 179.999),
            GeoPoint::new(-85.05, -180.0),
            GeoPoint::new(64.1466, -21.9426),
        ];

        for zoom in 0..=18u8 {
            for p in &points {
                let tile = tile_address_of(p, zoom);
                let offset = pixel_offset_within_tile(p, zoom);
                let world = tile.origin().add(&offset);
                let back = inverse_projection(world.x, world.y, zoom);

                assert!((back.lat - p.lat).abs() < 1e-6, "lat {:?} z{}", p, zoom);
                assert!((back.lng - p.lng).abs() < 1e-6, "lng {:?} z{}", p, zoom);
            }
        }
    }

    #[test]
    fn test_tile_address_stays_in_range() {
        let extremes = [
            GeoPoint::new(90.0, 180.0),
            GeoPoint::new(-90.0, -180.0),
            GeoPoint::new(89.999, 359.0),
            GeoPoint::new(-1000.0, -1000.0),
            GeoPoint::new(f64::NAN, f64::INFINITY),
        ];

        for zoom in 0..=18u8 {
            let n = tiles_per_axis(zoom);
            for p in &extremes {
                let tile = tile_address_of(p, zoom);
                assert!(tile.x < n && tile.y < n, "{:?} at z{} -> {}", p, zoom, tile);
            }
        }
    }

    #[test]
    fn test_poles_are_clamped_silently() {
        let north = tile_address_of(&GeoPoint::new(90.0, 0.0), 4);
        let south = tile_address_of(&GeoPoint::new(-90.0, 0.0), 4);
        assert_eq!(north.y, 0);
        assert_eq!(south.y, 15);

        let p = world_pixel(&GeoPoint::new(90.0, 0.0), 4);
        assert!(p.y.is_finite());
        assert!(p.y.abs() < 1e-6);
    }

    #[test]
    fn test_offset_within_tile_is_sub_tile() {
        let p = GeoPoint::new(48.8566, 2.3522);
        for zoom in 0..=18u8 {
            let offset = pixel_offset_within_tile(&p, zoom);
            assert!((0.0..256.0).contains(&offset.x));
            assert!((0.0..256.0).contains(&offset.y));
        }
    }

    #[test]
    fn test_inverse_projection_corners() {
        let nw = inverse_projection(0.0, 0.0, 3);
        assert!((nw.lat - MAX_LATITUDE).abs() < 1e-9);
        assert_eq!(nw.lng, -180.0);

        // Past the antimeridian wraps back into range
        let east = inverse_projection(world_size(3) + 256.0, world_size(3) / 2.0, 3);
        assert!((east.lng - (-135.0)).abs() < 1e-9);
        assert!(east.lat.abs() < 1e-9);
    }

    #[test]
    fn test_pixels_per_degree() {
        assert!((pixels_per_degree_lng(0) - 256.0 / 360.0).abs() < 1e-12);
        assert!((pixels_per_degree_lat(2) - 1024.0 / 170.0).abs() < 1e-12);
    }
}
