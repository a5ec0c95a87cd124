use crate::core::{
    bounds::Bounds,
    geo::{world_size, GeoPoint, Point},
    projection,
};
use serde::{Deserialize, Serialize};

/// The visible map state: center, zoom and any in-progress pan offset
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewportState {
    /// The center of the map view in geographical coordinates
    pub center: GeoPoint,
    /// The current integer zoom level
    pub zoom: u8,
    /// Screen-pixel delta of a drag that has not been committed yet
    pub drag_offset: Point,
}

impl ViewportState {
    pub fn new(center: GeoPoint, zoom: u8) -> Self {
        Self {
            center: center.normalized(),
            zoom,
            drag_offset: Point::zero(),
        }
    }

    /// Captures this state and a container size for one render pass
    pub fn frame(&self, width: f64, height: f64) -> ViewFrame {
        ViewFrame::new(self, width, height)
    }
}

impl Default for ViewportState {
    fn default() -> Self {
        Self::new(GeoPoint::default(), crate::core::constants::DEFAULT_MIN_ZOOM)
    }
}

/// Immutable snapshot of `(center, zoom, drag_offset)` plus the container size.
///
/// Tiles and markers of one render pass are positioned through the same
/// frame, so they cannot drift apart during a drag.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewFrame {
    pub zoom: u8,
    /// World pixel of the committed center
    pub center_world: Point,
    pub drag_offset: Point,
    pub width: f64,
    pub height: f64,
}

impl ViewFrame {
    pub fn new(state: &ViewportState, width: f64, height: f64) -> Self {
        Self {
            zoom: state.zoom,
            center_world: projection::world_pixel(&state.center, state.zoom),
            drag_offset: state.drag_offset,
            width: sanitize_dimension(width),
            height: sanitize_dimension(height),
        }
    }

    /// A zero-size container shows nothing
    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }

    pub fn container(&self) -> Bounds {
        Bounds::from_coords(0.0, 0.0, self.width, self.height)
    }

    /// Side length of the world in pixels at the frame's zoom
    pub fn world_size(&self) -> f64 {
        world_size(self.zoom)
    }

    /// World pixel currently shown at the container center
    pub fn visual_center_world(&self) -> Point {
        self.center_world.subtract(&self.drag_offset)
    }

    /// Container position of a world pixel
    pub fn world_to_screen(&self, world: &Point) -> Point {
        Point::new(
            self.width / 2.0 + (world.x - self.center_world.x) + self.drag_offset.x,
            self.height / 2.0 + (world.y - self.center_world.y) + self.drag_offset.y,
        )
    }

    /// World pixel under a container position
    pub fn screen_to_world(&self, screen: &Point) -> Point {
        Point::new(
            screen.x - self.width / 2.0 + self.center_world.x - self.drag_offset.x,
            screen.y - self.height / 2.0 + self.center_world.y - self.drag_offset.y,
        )
    }

    /// Geocoordinate under a container position
    pub fn screen_to_geo(&self, screen: &Point) -> GeoPoint {
        let world = self.screen_to_world(screen);
        projection::inverse_projection(world.x, world.y, self.zoom)
    }
}

fn sanitize_dimension(value: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_viewport_creation_normalizes_center() {
        let viewport = ViewportState::new(GeoPoint::new(89.0, 190.0), 10);
        assert!(viewport.center.lat < 85.06);
        assert!((viewport.center.lng - (-170.0)).abs() < 1e-9);
        assert!(viewport.drag_offset.is_zero());
    }

    #[test]
    fn test_center_maps_to_container_middle() {
        let viewport = ViewportState::new(GeoPoint::new(40.7128, -74.0060), 12);
        let frame = viewport.frame(800.0, 600.0);
        let screen = frame.world_to_screen(&frame.center_world);
        assert_eq!(screen, Point::new(400.0, 300.0));

        let geo = frame.screen_to_geo(&Point::new(400.0, 300.0));
        assert!((geo.lat - 40.7128).abs() < 1e-9);
        assert!((geo.lng + 74.0060).abs() < 1e-9);
    }

    #[test]
    fn test_drag_offset_shifts_screen_positions() {
        let mut viewport = ViewportState::new(GeoPoint::default(), 3);
        viewport.drag_offset = Point::new(25.0, -10.0);
        let frame = viewport.frame(512.0, 512.0);

        let screen = frame.world_to_screen(&frame.center_world);
        assert_eq!(screen, Point::new(281.0, 246.0));
        assert_eq!(frame.screen_to_world(&screen), frame.center_world);
        assert_eq!(
            frame.visual_center_world(),
            Point::new(frame.center_world.x - 25.0, frame.center_world.y + 10.0)
        );
    }

    #[test]
    fn test_degenerate_sizes_are_empty() {
        let viewport = ViewportState::default();
        assert!(viewport.frame(0.0, 300.0).is_empty());
        assert!(viewport.frame(300.0, f64::NAN).is_empty());
        assert!(viewport.frame(-5.0, 10.0).is_empty());
        assert!(!viewport.frame(1.0, 1.0).is_empty());
    }
}
