//! Viewport interaction state machine
//!
//! The controller is the only writer of [`ViewportState`]. Every transition
//! runs synchronously inside the handling of a single input event and
//! reports what happened through its return value; the renderer decides how
//! to surface it.

use crate::core::{
    config::MapConfig,
    geo::{GeoPoint, Point},
    projection,
    viewport::ViewportState,
};
use crate::input::events::{PointerEvent, ZoomDirection};

/// Pointer interaction state.
///
/// Zoom changes are discrete, so there is no animating state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InteractionState {
    Idle,
    Dragging { start: Point },
}

/// Result of feeding one pointer event to the controller
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerOutcome {
    /// No state transition
    Ignored,
    DragStarted,
    DragMoved { offset: Point },
    /// A drag was committed into a new center
    Panned { center: GeoPoint },
    /// Press and release closer than the click threshold; center unchanged
    Click { position: Point },
}

pub struct ViewportController {
    state: ViewportState,
    interaction: InteractionState,
    min_zoom: u8,
    max_zoom: u8,
    interactive: bool,
    click_threshold_px: f64,
}

impl ViewportController {
    pub fn new(config: &MapConfig) -> Self {
        Self {
            state: ViewportState::new(config.center, config.clamped_zoom()),
            interaction: InteractionState::Idle,
            min_zoom: config.min_zoom,
            max_zoom: config.max_zoom,
            interactive: config.interactive,
            click_threshold_px: config.interaction.click_threshold_px,
        }
    }

    pub fn viewport(&self) -> &ViewportState {
        &self.state
    }

    pub fn interaction(&self) -> InteractionState {
        self.interaction
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.interaction, InteractionState::Dragging { .. })
    }

    pub fn is_interactive(&self) -> bool {
        self.interactive
    }

    pub fn zoom_limits(&self) -> (u8, u8) {
        (self.min_zoom, self.max_zoom)
    }

    /// Enables or disables pointer-driven transitions; disabling cancels a drag
    pub fn set_interactive(&mut self, interactive: bool) {
        self.interactive = interactive;
        if !interactive {
            self.cancel_drag();
        }
    }

    pub fn handle(&mut self, event: PointerEvent) -> PointerOutcome {
        match event {
            PointerEvent::Down { position } => self.pointer_down(position),
            PointerEvent::Move { position } => self.pointer_move(position),
            PointerEvent::Up { position } => self.pointer_up(position),
            PointerEvent::Leave { position } => self.pointer_leave(position),
        }
    }

    pub fn pointer_down(&mut self, position: Point) -> PointerOutcome {
        if !self.interactive || self.is_dragging() {
            return PointerOutcome::Ignored;
        }
        log::debug!("drag start at ({:.1}, {:.1})", position.x, position.y);
        self.interaction = InteractionState::Dragging { start: position };
        self.state.drag_offset = Point::zero();
        PointerOutcome::DragStarted
    }

    pub fn pointer_move(&mut self, position: Point) -> PointerOutcome {
        match self.interaction {
            InteractionState::Dragging { start } if self.interactive => {
                let offset = position.subtract(&start);
                self.state.drag_offset = offset;
                PointerOutcome::DragMoved { offset }
            }
            _ => PointerOutcome::Ignored,
        }
    }

    pub fn pointer_up(&mut self, position: Point) -> PointerOutcome {
        let InteractionState::Dragging { start } = self.interaction else {
            return PointerOutcome::Ignored;
        };
        if !self.interactive {
            return PointerOutcome::Ignored;
        }

        let offset = position.subtract(&start);
        self.interaction = InteractionState::Idle;
        self.state.drag_offset = Point::zero();

        if offset.length() < self.click_threshold_px {
            log::debug!("click at ({:.1}, {:.1})", position.x, position.y);
            return PointerOutcome::Click { position };
        }

        let center = self.committed_center(&offset);
        log::debug!(
            "drag commit ({:.1}, {:.1})px -> center {:.6}, {:.6}",
            offset.x,
            offset.y,
            center.lat,
            center.lng
        );
        self.state.center = center;
        PointerOutcome::Panned { center }
    }

    /// Leaving the container ends a drag exactly like releasing the pointer
    pub fn pointer_leave(&mut self, position: Point) -> PointerOutcome {
        self.pointer_up(position)
    }

    /// Zooms one level; `None` when clamped, mid-drag, or unchanged
    pub fn zoom(&mut self, direction: ZoomDirection) -> Option<u8> {
        if self.is_dragging() {
            log::debug!("ignoring zoom {:?} during drag", direction);
            return None;
        }

        let zoom = match direction {
            ZoomDirection::In => self.state.zoom.saturating_add(1).min(self.max_zoom),
            ZoomDirection::Out => self.state.zoom.saturating_sub(1).max(self.min_zoom),
        };
        if zoom == self.state.zoom {
            return None;
        }

        log::debug!("zoom {} -> {}", self.state.zoom, zoom);
        self.state.zoom = zoom;
        Some(zoom)
    }

    pub fn zoom_in(&mut self) -> Option<u8> {
        self.zoom(ZoomDirection::In)
    }

    pub fn zoom_out(&mut self) -> Option<u8> {
        self.zoom(ZoomDirection::Out)
    }

    /// Programmatic view change from the host; abandons any drag in progress.
    ///
    /// Returns which of center and zoom actually changed.
    pub fn set_view(&mut self, center: GeoPoint, zoom: u8) -> (Option<GeoPoint>, Option<u8>) {
        self.cancel_drag();

        let center = center.normalized();
        let zoom = zoom.clamp(self.min_zoom, self.max_zoom);

        let center_changed = (center != self.state.center).then_some(center);
        let zoom_changed = (zoom != self.state.zoom).then_some(zoom);
        self.state.center = center;
        self.state.zoom = zoom;
        (center_changed, zoom_changed)
    }

    /// Geocoordinate under a container point in the current view
    pub fn screen_to_geo(&self, position: &Point, width: f64, height: f64) -> GeoPoint {
        self.state.frame(width, height).screen_to_geo(position)
    }

    fn cancel_drag(&mut self) {
        self.interaction = InteractionState::Idle;
        self.state.drag_offset = Point::zero();
    }

    /// Center after moving the map by `offset` screen pixels.
    ///
    /// Uses constant pixels-per-degree scales at the current zoom; the
    /// latitude scale is an approximation that loses accuracy towards the
    /// poles.
    fn committed_center(&self, offset: &Point) -> GeoPoint {
        let zoom = self.state.zoom;
        let delta_lng = offset.x / projection::pixels_per_degree_lng(zoom);
        let delta_lat = -offset.y / projection::pixels_per_degree_lat(zoom);

        GeoPoint::new(
            self.state.center.lat - delta_lat,
            self.state.center.lng - delta_lng,
        )
        .normalized()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn controller(center: GeoPoint, zoom: u8) -> ViewportController {
        ViewportController::new(&MapConfig::new(center, zoom))
    }

    fn drag(c: &mut ViewportController, from: Point, to: Point) -> PointerOutcome {
        c.pointer_down(from);
        c.pointer_move(to);
        c.pointer_up(to)
    }

    #[test]
    fn test_zoom_clamps_at_max() {
        let mut c = controller(GeoPoint::default(), 16);
        assert_eq!(c.zoom_in(), Some(17));
        assert_eq!(c.zoom_in(), Some(18));
        for _ in 0..5 {
            assert_eq!(c.zoom_in(), None);
        }
        assert_eq!(c.viewport().zoom, 18);
    }

    #[test]
    fn test_zoom_clamps_at_min() {
        let mut c = controller(GeoPoint::default(), 4);
        for _ in 0..10 {
            c.zoom_out();
        }
        assert_eq!(c.viewport().zoom, 2);
    }

    #[test]
    fn test_drag_offset_tracks_pointer() {
        let mut c = controller(GeoPoint::default(), 5);
        assert_eq!(c.pointer_down(Point::new(100.0, 100.0)), PointerOutcome::DragStarted);
        c.pointer_move(Point::new(130.0, 80.0));
        assert_eq!(c.viewport().drag_offset, Point::new(30.0, -20.0));

        // Unbounded: far beyond the world size is fine mid-drag
        c.pointer_move(Point::new(100_100.0, 100.0));
        assert_eq!(c.viewport().drag_offset, Point::new(100_000.0, 0.0));
        assert_eq!(c.viewport().center, GeoPoint::default());
    }

    #[test]
    fn test_drag_commit_longitude_shift() {
        let zoom = 7;
        let start = GeoPoint::new(10.0, 20.0);
        let mut c = controller(start, zoom);

        let dx = 120.0;
        let outcome = drag(&mut c, Point::new(200.0, 200.0), Point::new(200.0 + dx, 200.0));
        assert!(matches!(outcome, PointerOutcome::Panned { .. }));

        let expected_shift = -dx / (2f64.powi(zoom as i32) * 256.0 / 360.0);
        let center = c.viewport().center;
        assert!((center.lng - start.lng - expected_shift).abs() < 1e-9);
        assert!((center.lat - start.lat).abs() < 1e-12);
        assert!(c.viewport().drag_offset.is_zero());
        assert_eq!(c.interaction(), InteractionState::Idle);
    }

    #[test]
    fn test_drag_down_moves_center_north() {
        let mut c = controller(GeoPoint::new(0.0, 0.0), 3);
        drag(&mut c, Point::new(0.0, 0.0), Point::new(0.0, 170.0));
        // 2^3 * 256 / 170 px per degree
        let expected = 170.0 / (2048.0 / 170.0);
        assert!((c.viewport().center.lat - expected).abs() < 1e-9);
    }

    #[test]
    fn test_small_movement_is_a_click() {
        let center = GeoPoint::new(48.0, 2.0);
        let mut c = controller(center, 10);
        let outcome = drag(&mut c, Point::new(50.0, 50.0), Point::new(52.0, 51.0));

        assert_eq!(outcome, PointerOutcome::Click { position: Point::new(52.0, 51.0) });
        assert_eq!(c.viewport().center, center);
    }

    #[test]
    fn test_movement_above_threshold_pans() {
        let center = GeoPoint::new(48.0, 2.0);
        let mut c = controller(center, 10);
        let outcome = drag(&mut c, Point::new(50.0, 50.0), Point::new(54.0, 50.0));

        assert!(matches!(outcome, PointerOutcome::Panned { .. }));
        assert_ne!(c.viewport().center, center);
    }

    #[test]
    fn test_pointer_leave_commits_like_up() {
        let mut c = controller(GeoPoint::new(0.0, 0.0), 4);
        c.pointer_down(Point::new(10.0, 10.0));
        c.pointer_move(Point::new(60.0, 10.0));
        let outcome = c.pointer_leave(Point::new(60.0, 10.0));

        assert!(matches!(outcome, PointerOutcome::Panned { .. }));
        assert!(c.viewport().center.lng < 0.0);
    }

    #[test]
    fn test_moves_without_down_are_ignored() {
        let mut c = controller(GeoPoint::default(), 4);
        assert_eq!(c.pointer_move(Point::new(5.0, 5.0)), PointerOutcome::Ignored);
        assert_eq!(c.pointer_up(Point::new(5.0, 5.0)), PointerOutcome::Ignored);
        assert!(c.viewport().drag_offset.is_zero());
    }

    #[test]
    fn test_non_interactive_ignores_pointer() {
        let mut c = ViewportController::new(
            &MapConfig::new(GeoPoint::default(), 4).with_interactive(false),
        );
        assert_eq!(c.pointer_down(Point::new(0.0, 0.0)), PointerOutcome::Ignored);
        assert_eq!(c.pointer_move(Point::new(50.0, 0.0)), PointerOutcome::Ignored);
        assert_eq!(c.pointer_up(Point::new(50.0, 0.0)), PointerOutcome::Ignored);

        let (center, zoom) = c.set_view(GeoPoint::new(1.0, 1.0), 6);
        assert_eq!(center, Some(GeoPoint::new(1.0, 1.0)));
        assert_eq!(zoom, Some(6));
    }

    #[test]
    fn test_zoom_ignored_mid_drag() {
        let mut c = controller(GeoPoint::default(), 4);
        c.pointer_down(Point::new(0.0, 0.0));
        assert_eq!(c.zoom_in(), None);
        assert_eq!(c.viewport().zoom, 4);
    }

    #[test]
    fn test_set_view_cancels_drag_and_clamps() {
        let mut c = controller(GeoPoint::default(), 4);
        c.pointer_down(Point::new(0.0, 0.0));
        c.pointer_move(Point::new(80.0, 0.0));

        let (center, zoom) = c.set_view(GeoPoint::new(20.0, 200.0), 40);
        assert!(!c.is_dragging());
        assert!(c.viewport().drag_offset.is_zero());
        assert_eq!(zoom, Some(18));
        assert!((center.unwrap().lng - (-160.0)).abs() < 1e-9);

        let (center, zoom) = c.set_view(c.viewport().center, 18);
        assert_eq!((center, zoom), (None, None));
    }

    #[test]
    fn test_disabling_interaction_cancels_drag() {
        let mut c = controller(GeoPoint::default(), 4);
        c.pointer_down(Point::new(0.0, 0.0));
        c.pointer_move(Point::new(40.0, 0.0));
        c.set_interactive(false);
        assert!(!c.is_dragging());
        assert_eq!(c.viewport().center, GeoPoint::default());
    }

    #[test]
    fn test_screen_to_geo_at_center() {
        let c = controller(GeoPoint::new(12.5, -7.25), 9);
        let geo = c.screen_to_geo(&Point::new(320.0, 240.0), 640.0, 480.0);
        assert!((geo.lat - 12.5).abs() < 1e-9);
        assert!((geo.lng + 7.25).abs() < 1e-9);
    }
}
