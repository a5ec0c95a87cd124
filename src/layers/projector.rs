//! Marker placement on screen
//!
//! Markers are positioned through the same [`ViewFrame`] as the tile grid
//! and never consult tile state, so a marker stays anchored to its
//! coordinate whether or not the tile under it has loaded.

use crate::core::{
    geo::Point,
    projection,
    viewport::{ViewFrame, ViewportState},
};
use crate::layers::marker::Marker;

/// A marker with its container position for the current render pass
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProjectedMarker<'a> {
    pub marker: &'a Marker,
    pub screen_x: f64,
    pub screen_y: f64,
}

impl ProjectedMarker<'_> {
    pub fn position(&self) -> Point {
        Point::new(self.screen_x, self.screen_y)
    }
}

/// Projects `markers` into a `width` x `height` container.
///
/// Markers more than `cull_margin` pixels outside the container are left
/// out.
pub fn project_markers<'a>(
    markers: &'a [Marker],
    viewport: &ViewportState,
    width: f64,
    height: f64,
    cull_margin: f64,
) -> Vec<ProjectedMarker<'a>> {
    project_markers_in_frame(markers, &viewport.frame(width, height), cull_margin)
}

pub fn project_markers_in_frame<'a>(
    markers: &'a [Marker],
    frame: &ViewFrame,
    cull_margin: f64,
) -> Vec<ProjectedMarker<'a>> {
    if frame.is_empty() {
        return Vec::new();
    }

    let visible = frame.container().expanded(cull_margin.max(0.0));
    let projected: Vec<ProjectedMarker<'a>> = markers
        .iter()
        .map(|marker| {
            let screen = marker_screen_position(frame, marker);
            ProjectedMarker {
                marker,
                screen_x: screen.x,
                screen_y: screen.y,
            }
        })
        .filter(|p| visible.contains(&p.position()))
        .collect();

    log::trace!(
        "projected {} of {} markers at z{}",
        projected.len(),
        markers.len(),
        frame.zoom
    );
    projected
}

/// Container position of one marker.
///
/// The horizontal distance from the view center is taken along the shorter
/// way around the world, so a marker just across the antimeridian shows up
/// next to the center instead of a whole world away.
pub fn marker_screen_position(frame: &ViewFrame, marker: &Marker) -> Point {
    let world = projection::world_pixel(&marker.position, frame.zoom);
    let world_size = frame.world_size();

    // Offset from the committed center; wrapped before the drag is added.
    let dx = world.x - frame.center_world.x;
    let dy = world.y - frame.center_world.y;

    let dx = (dx + world_size / 2.0).rem_euclid(world_size) - world_size / 2.0;

    Point::new(
        frame.width / 2.0 + dx + frame.drag_offset.x,
        frame.height / 2.0 + dy + frame.drag_offset.y,
    )
}

/// Topmost marker whose glyph of `radius` covers `point`
pub fn hit_test<'a, 'm>(
    projected: &'m [ProjectedMarker<'a>],
    point: &Point,
    radius: f64,
) -> Option<&'m ProjectedMarker<'a>> {
    projected
        .iter()
        .rev()
        .find(|p| p.position().distance_to(point) <= radius)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::geo::{GeoPoint, TileAddress};
    use crate::tiles::grid::visible_tiles_in_frame;

    fn marker(id: &str, lat: f64, lng: f64) -> Marker {
        Marker::new(id, GeoPoint::new(lat, lng))
    }

    #[test]
    fn test_marker_at_center_sits_in_container_middle() {
        let center = GeoPoint::new(35.6762, 139.6503);
        let viewport = ViewportState::new(center, 11);
        let markers = vec![marker("tokyo", center.lat, center.lng)];

        let projected = project_markers(&markers, &viewport, 600.0, 400.0, 24.0);
        assert_eq!(projected.len(), 1);
        assert!((projected[0].screen_x - 300.0).abs() < 1e-6);
        assert!((projected[0].screen_y - 200.0).abs() < 1e-6);
    }

    #[test]
    fn test_wraparound_takes_short_path() {
        let zoom = 6;
        let viewport = ViewportState::new(GeoPoint::new(0.0, 179.9), zoom);
        let markers = vec![marker("east", 0.0, -179.9)];

        let projected = project_markers(&markers, &viewport, 800.0, 600.0, 24.0);
        assert_eq!(projected.len(), 1);

        let expected = 0.2 * projection::pixels_per_degree_lng(zoom);
        let delta = projected[0].screen_x - 400.0;
        assert!((delta - expected).abs() < 1e-6, "delta {} expected {}", delta, expected);
    }

    #[test]
    fn test_wraparound_westward() {
        let viewport = ViewportState::new(GeoPoint::new(0.0, -179.5), 4);
        let markers = vec![marker("west", 0.0, 179.5)];

        let frame = viewport.frame(800.0, 600.0);
        let screen = marker_screen_position(&frame, &markers[0]);
        let expected = -1.0 * projection::pixels_per_degree_lng(4);
        assert!((screen.x - 400.0 - expected).abs() < 1e-6);
    }

    #[test]
    fn test_markers_follow_drag_offset() {
        let mut viewport = ViewportState::new(GeoPoint::new(45.0, 7.0), 9);
        let markers = vec![marker("m", 45.01, 7.02)];
        let before = project_markers(&markers, &viewport, 500.0, 500.0, 24.0)[0].position();

        viewport.drag_offset = Point::new(-33.0, 12.5);
        let after = project_markers(&markers, &viewport, 500.0, 500.0, 24.0)[0].position();

        assert!((after.x - before.x + 33.0).abs() < 1e-9);
        assert!((after.y - before.y - 12.5).abs() < 1e-9);
    }

    #[test]
    fn test_long_drag_moves_marker_with_pointer() {
        // World is 1024px wide at zoom 2; drag well past half of it
        let mut viewport = ViewportState::new(GeoPoint::new(0.0, 0.0), 2);
        let marker = marker("m", 0.0, 0.0);

        for step in 0..=8 {
            viewport.drag_offset = Point::new(step as f64 * 100.0, 0.0);
            let frame = viewport.frame(400.0, 400.0);
            let screen = marker_screen_position(&frame, &marker);
            assert!((screen.x - (200.0 + step as f64 * 100.0)).abs() < 1e-9);
        }
    }

    #[test]
    fn test_marker_and_tile_share_one_frame() {
        let mut viewport = ViewportState::new(GeoPoint::new(-22.9068, -43.1729), 13);
        viewport.drag_offset = Point::new(117.0, -64.0);
        let frame = viewport.frame(900.0, 700.0);

        let markers = vec![marker("rio", -22.9, -43.17)];
        let projected = project_markers_in_frame(&markers, &frame, 24.0);
        let tiles = visible_tiles_in_frame(&frame);

        let address: TileAddress = projection::tile_address_of(&markers[0].position, 13);
        let offset = projection::pixel_offset_within_tile(&markers[0].position, 13);
        let tile = tiles.iter().find(|t| t.address == address).unwrap();

        assert!((tile.screen_x + offset.x - projected[0].screen_x).abs() < 1e-6);
        assert!((tile.screen_y + offset.y - projected[0].screen_y).abs() < 1e-6);
    }

    #[test]
    fn test_far_markers_are_culled_near_ones_kept() {
        let viewport = ViewportState::new(GeoPoint::new(0.0, 0.0), 10);
        let frame = viewport.frame(400.0, 400.0);
        let px_per_deg = projection::pixels_per_degree_lng(10);

        // 10px past the right edge is kept, 100px past is culled
        let near_lng = (200.0 + 10.0) / px_per_deg;
        let far_lng = (200.0 + 100.0) / px_per_deg;
        let markers = vec![marker("near", 0.0, near_lng), marker("far", 0.0, far_lng)];

        let projected = project_markers_in_frame(&markers, &frame, 24.0);
        let ids: Vec<&str> = projected.iter().map(|p| p.marker.id.as_str()).collect();
        assert_eq!(ids, vec!["near"]);
    }

    #[test]
    fn test_zero_size_container_projects_nothing() {
        let viewport = ViewportState::new(GeoPoint::default(), 3);
        let markers = vec![marker("a", 0.0, 0.0)];
        assert!(project_markers(&markers, &viewport, 0.0, 0.0, 24.0).is_empty());
    }

    #[test]
    fn test_hit_test_prefers_topmost() {
        let viewport = ViewportState::new(GeoPoint::new(0.0, 0.0), 5);
        let markers = vec![marker("below", 0.0, 0.0), marker("above", 0.0, 0.0)];
        let projected = project_markers(&markers, &viewport, 300.0, 300.0, 24.0);

        let hit = hit_test(&projected, &Point::new(155.0, 150.0), 12.0).unwrap();
        assert_eq!(hit.marker.id, "above");
        assert!(hit_test(&projected, &Point::new(200.0, 150.0), 12.0).is_none());
    }
}
