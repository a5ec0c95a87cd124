//! Map composition
//!
//! [`MapRenderer`] ties the pieces of one map instance together: it owns the
//! viewport controller, the tile store and loader, the marker list and the
//! listener table, routes pointer input and produces a [`Scene`] per pass.
//! Tiles and markers of a pass are positioned from a single view frame.

use crate::{
    core::{
        bounds::Bounds,
        config::{ControlConfig, MapConfig},
        geo::{GeoPoint, Point, TileAddress},
        viewport::{ViewFrame, ViewportState},
    },
    input::{
        controller::{InteractionState, PointerOutcome, ViewportController},
        events::{MapEvent, MapEventKind, PointerEvent, ZoomDirection},
        handler::EventManager,
    },
    layers::{
        marker::Marker,
        projector::{self, ProjectedMarker},
    },
    prelude::{Arc, HashSet},
    rendering::{
        context::{DrawCommand, Scene},
        resize::{ResizeNotifier, ResizeSubscription},
    },
    tiles::{
        grid::{self, VisibleTile},
        loader::TileLoader,
        source::{TileSource, UrlTemplateSource},
        store::{TileImageState, TileStore},
    },
    MapError,
};

/// Vertical gap between the stacked zoom buttons
const CONTROL_SPACING: f64 = 5.0;

/// Rectangles of the zoom-in and zoom-out buttons, stacked in the top-right
/// corner of a `width` wide container
pub fn zoom_button_rects(width: f64, controls: &ControlConfig) -> [(ZoomDirection, Bounds); 2] {
    let size = controls.button_size;
    let x = width - controls.margin - size;
    let zoom_in = Bounds::from_min_size(Point::new(x, controls.margin), size, size);
    let zoom_out = Bounds::from_min_size(
        Point::new(x, controls.margin + size + CONTROL_SPACING),
        size,
        size,
    );
    [(ZoomDirection::In, zoom_in), (ZoomDirection::Out, zoom_out)]
}

pub struct MapRenderer {
    config: MapConfig,
    source: Arc<dyn TileSource>,
    controller: ViewportController,
    events: EventManager,
    loader: TileLoader,
    store: TileStore,
    markers: Vec<Marker>,
    selected_marker: Option<String>,
    width: f64,
    height: f64,
    resize: Option<ResizeSubscription>,
    /// Pointer went down on a chrome button; the rest of the gesture is swallowed
    chrome_press: bool,
    scene: Scene,
    dirty: bool,
}

impl MapRenderer {
    /// Map fetching tiles over HTTP
    pub fn new(config: MapConfig) -> Result<Self, MapError> {
        Self::with_loader(config, TileLoader::http())
    }

    pub fn with_loader(config: MapConfig, loader: TileLoader) -> Result<Self, MapError> {
        config.validate()?;
        let source = Arc::new(UrlTemplateSource::new(config.tile_url_template.clone())?);

        log::debug!(
            "map created at {:.5}, {:.5} z{} (interactive: {})",
            config.center.lat,
            config.center.lng,
            config.clamped_zoom(),
            config.interactive
        );

        Ok(Self {
            controller: ViewportController::new(&config),
            config,
            source,
            events: EventManager::new(),
            loader,
            store: TileStore::new(),
            markers: Vec::new(),
            selected_marker: None,
            width: 0.0,
            height: 0.0,
            resize: None,
            chrome_press: false,
            scene: Scene::default(),
            dirty: true,
        })
    }

    /// Replaces the URL template based source with a custom one
    pub fn with_tile_source(mut self, source: Arc<dyn TileSource>) -> Self {
        self.source = source;
        self.store = TileStore::new();
        self.dirty = true;
        self
    }

    pub fn config(&self) -> &MapConfig {
        &self.config
    }

    pub fn viewport(&self) -> &ViewportState {
        self.controller.viewport()
    }

    pub fn interaction(&self) -> InteractionState {
        self.controller.interaction()
    }

    pub fn container_size(&self) -> (f64, f64) {
        (self.width, self.height)
    }

    pub fn markers(&self) -> &[Marker] {
        &self.markers
    }

    pub fn selected_marker(&self) -> Option<&str> {
        self.selected_marker.as_deref()
    }

    pub fn tile_store(&self) -> &TileStore {
        &self.store
    }

    /// Scene produced by the last [`render`](Self::render)
    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    /// Register a listener for one kind of map event
    pub fn on<F>(&mut self, kind: MapEventKind, callback: F)
    where
        F: Fn(&MapEvent) + Send + Sync + 'static,
    {
        self.events.on(kind, callback);
    }

    /// Drops every listener registered for `kind`
    pub fn off(&mut self, kind: MapEventKind) {
        self.events.off(kind);
    }

    /// Snapshot of the markers to draw from now on
    pub fn set_markers(&mut self, markers: Vec<Marker>) {
        log::debug!("marker list replaced ({} markers)", markers.len());
        self.markers = markers;
        self.dirty = true;
    }

    /// Highlights the marker with `id`; the selection survives marker list
    /// replacement as long as the id is still present
    pub fn select_marker(&mut self, id: Option<String>) {
        if self.selected_marker != id {
            self.selected_marker = id;
            self.dirty = true;
        }
    }

    /// Programmatic view change from the host; emits no events
    pub fn set_view(&mut self, center: GeoPoint, zoom: u8) {
        let (center, zoom) = self.controller.set_view(center, zoom);
        if center.is_some() || zoom.is_some() {
            self.dirty = true;
        }
        self.chrome_press = false;
    }

    pub fn set_interactive(&mut self, interactive: bool) {
        if self.config.interactive != interactive {
            self.config.interactive = interactive;
            self.controller.set_interactive(interactive);
            self.chrome_press = false;
            self.dirty = true;
        }
    }

    pub fn set_placement_mode(&mut self, placement_mode: bool) {
        self.config.placement_mode = placement_mode;
    }

    pub fn resize(&mut self, width: f64, height: f64) {
        let width = if width.is_finite() { width.max(0.0) } else { 0.0 };
        let height = if height.is_finite() { height.max(0.0) } else { 0.0 };
        if (width, height) != (self.width, self.height) {
            log::debug!("container resized to {}x{}", width, height);
            self.width = width;
            self.height = height;
            self.dirty = true;
        }
    }

    /// Follows container size changes reported to `notifier` until the
    /// renderer is dropped or attached elsewhere
    pub fn attach_resize_source(&mut self, notifier: &ResizeNotifier) {
        self.resize = Some(notifier.subscribe());
    }

    pub fn detach_resize_source(&mut self) {
        self.resize = None;
    }

    pub fn zoom_in(&mut self) -> bool {
        self.zoom(ZoomDirection::In)
    }

    pub fn zoom_out(&mut self) -> bool {
        self.zoom(ZoomDirection::Out)
    }

    /// One zoom step; true if the zoom level changed
    pub fn zoom(&mut self, direction: ZoomDirection) -> bool {
        let changed = self.step_zoom(direction);
        self.events.process_events();
        changed
    }

    /// Queues `ZoomChanged` without delivering it
    fn step_zoom(&mut self, direction: ZoomDirection) -> bool {
        match self.controller.zoom(direction) {
            Some(zoom) => {
                self.dirty = true;
                self.events.emit(MapEvent::ZoomChanged { zoom });
                true
            }
            None => false,
        }
    }

    /// Geocoordinate under a container point
    pub fn screen_to_geo(&self, position: &Point) -> GeoPoint {
        self.controller
            .screen_to_geo(position, self.width, self.height)
    }

    /// Feeds one pointer event through chrome, marker and map handling.
    ///
    /// Returns the events emitted while handling it, already delivered to
    /// listeners.
    pub fn handle_pointer(&mut self, event: PointerEvent) -> Vec<MapEvent> {
        match event {
            // A press during a drag belongs to the drag, even over a button
            PointerEvent::Down { position } if !self.controller.is_dragging() => {
                self.chrome_press = false;
                if let Some(direction) = self.chrome_button_at(&position) {
                    self.chrome_press = true;
                    self.step_zoom(direction);
                    return self.events.process_events();
                }
            }
            PointerEvent::Up { .. } | PointerEvent::Leave { .. } if self.chrome_press => {
                self.chrome_press = false;
                return Vec::new();
            }
            _ if self.chrome_press => return Vec::new(),
            _ => {}
        }

        match self.controller.handle(event) {
            PointerOutcome::Ignored | PointerOutcome::DragStarted => {}
            PointerOutcome::DragMoved { .. } => self.dirty = true,
            PointerOutcome::Panned { center } => {
                self.dirty = true;
                self.events.emit(MapEvent::CenterChanged { center });
            }
            PointerOutcome::Click { position } => self.click(&position),
        }
        self.events.process_events()
    }

    pub fn pointer_down(&mut self, x: f64, y: f64) -> Vec<MapEvent> {
        self.handle_pointer(PointerEvent::Down {
            position: Point::new(x, y),
        })
    }

    pub fn pointer_move(&mut self, x: f64, y: f64) -> Vec<MapEvent> {
        self.handle_pointer(PointerEvent::Move {
            position: Point::new(x, y),
        })
    }

    pub fn pointer_up(&mut self, x: f64, y: f64) -> Vec<MapEvent> {
        self.handle_pointer(PointerEvent::Up {
            position: Point::new(x, y),
        })
    }

    pub fn pointer_leave(&mut self, x: f64, y: f64) -> Vec<MapEvent> {
        self.handle_pointer(PointerEvent::Leave {
            position: Point::new(x, y),
        })
    }

    fn click(&mut self, position: &Point) {
        let frame = self.frame();
        let projected =
            projector::project_markers_in_frame(&self.markers, &frame, self.config.markers.diameter);

        if let Some(hit) = projector::hit_test(&projected, position, self.config.markers.radius()) {
            let marker_id = hit.marker.id.clone();
            log::debug!("marker {} clicked", marker_id);
            self.selected_marker = Some(marker_id.clone());
            self.dirty = true;
            self.events.emit(MapEvent::MarkerClick { marker_id });
        } else if self.config.placement_mode {
            let position = frame.screen_to_geo(position);
            log::debug!("map clicked at {:.6}, {:.6}", position.lat, position.lng);
            self.events.emit(MapEvent::MapClick { position });
        }
    }

    fn chrome_button_at(&self, position: &Point) -> Option<ZoomDirection> {
        if !self.shows_chrome() {
            return None;
        }
        zoom_button_rects(self.width, &self.config.controls)
            .into_iter()
            .find(|(_, rect)| rect.contains(position))
            .map(|(direction, _)| direction)
    }

    fn shows_chrome(&self) -> bool {
        self.config.interactive && self.config.controls.visible
    }

    fn frame(&self) -> ViewFrame {
        self.controller.viewport().frame(self.width, self.height)
    }

    /// Applies pending resizes and finished tile loads; true if a render
    /// pass is due
    pub fn poll(&mut self) -> bool {
        if let Some(size) = self.resize.as_ref().and_then(|s| s.latest()) {
            self.resize(size.width, size.height);
        }

        for result in self.loader.drain() {
            if self.store.ingest(result) {
                self.dirty = true;
            }
        }
        self.dirty
    }

    pub fn needs_render(&self) -> bool {
        self.dirty
    }

    /// Runs one render pass and returns its scene
    pub fn render(&mut self) -> &Scene {
        self.poll();

        let frame = self.frame();
        self.scene.begin_frame(frame.width, frame.height);

        let tiles = grid::visible_tiles_in_frame(&frame);
        let visible: HashSet<TileAddress> = tiles.iter().map(|t| t.address).collect();
        self.store.retain_visible(&visible);
        for tile in &tiles {
            self.render_tile(tile);
        }

        let projected = projector::project_markers_in_frame(
            &self.markers,
            &frame,
            self.config.markers.diameter,
        );
        for marker in &projected {
            self.scene.render_marker(marker_command(
                marker,
                self.config.markers.radius(),
                self.selected_marker.as_deref(),
            ));
        }

        if self.shows_chrome() && !frame.is_empty() {
            let (min_zoom, max_zoom) = self.controller.zoom_limits();
            let zoom = frame.zoom;
            for (direction, rect) in zoom_button_rects(frame.width, &self.config.controls) {
                let enabled = match direction {
                    ZoomDirection::In => zoom < max_zoom,
                    ZoomDirection::Out => zoom > min_zoom,
                };
                self.scene.render_zoom_button(direction, rect, enabled);
            }
        }

        log::trace!(
            "render pass z{}: {} tiles, {} markers, {} stored",
            frame.zoom,
            tiles.len(),
            projected.len(),
            self.store.len()
        );

        self.dirty = false;
        &self.scene
    }

    fn render_tile(&mut self, tile: &VisibleTile) {
        let url = self.source.url(tile.address);
        if self.store.mark_pending(tile.address) {
            self.loader.request(tile.address, url.clone());
        }

        let (image, failed) = match self.store.get(&tile.address) {
            Some(TileImageState::Ready(image)) => (Some(Arc::clone(image)), false),
            Some(TileImageState::Failed) => (None, true),
            Some(TileImageState::Pending) | None => (None, false),
        };

        if let Err(e) = self
            .scene
            .render_tile(tile.address, url, tile.rect(), image, failed)
        {
            log::warn!("skipping tile {}: {}", tile.address, e);
        }
    }
}

fn marker_command(marker: &ProjectedMarker<'_>, radius: f64, selected: Option<&str>) -> DrawCommand {
    DrawCommand::Marker {
        id: marker.marker.id.clone(),
        kind: marker.marker.kind,
        status: marker.marker.status,
        label: marker.marker.label.clone(),
        position: marker.position(),
        radius,
        selected: selected == Some(marker.marker.id.as_str()),
    }
}
