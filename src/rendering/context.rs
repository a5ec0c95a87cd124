use crate::{
    core::{bounds::Bounds, geo::Point, geo::TileAddress},
    input::events::ZoomDirection,
    layers::marker::{MarkerKind, MarkerStatus},
    tiles::store::TileImage,
    Result,
};
use std::sync::Arc;

/// Commands a host surface executes, in order, to draw one frame
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    /// Loaded tile image covering `rect`
    Tile {
        address: TileAddress,
        url: String,
        rect: Bounds,
        image: Arc<TileImage>,
    },
    /// Tile slot whose image is still loading, or failed to load
    Placeholder {
        address: TileAddress,
        url: String,
        rect: Bounds,
        failed: bool,
    },
    Marker {
        id: String,
        kind: MarkerKind,
        status: Option<MarkerStatus>,
        label: Option<String>,
        position: Point,
        radius: f64,
        selected: bool,
    },
    ZoomButton {
        direction: ZoomDirection,
        rect: Bounds,
        /// False once the zoom limit in this direction is reached
        enabled: bool,
    },
}

impl DrawCommand {
    pub fn is_tile_slot(&self) -> bool {
        matches!(self, DrawCommand::Tile { .. } | DrawCommand::Placeholder { .. })
    }
}

/// One rendered frame: container size plus its draw queue
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Scene {
    pub width: f64,
    pub height: f64,
    /// Drawing primitives, back to front
    pub commands: Vec<DrawCommand>,
}

impl Scene {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            commands: Vec::new(),
        }
    }

    /// Begin a frame for a container of the given size
    pub fn begin_frame(&mut self, width: f64, height: f64) {
        self.width = width;
        self.height = height;
        self.commands.clear();
    }

    pub fn clip_bounds(&self) -> Bounds {
        Bounds::from_coords(0.0, 0.0, self.width, self.height)
    }

    /// Queue a tile slot; rects entirely outside the container are rejected
    pub fn render_tile(
        &mut self,
        address: TileAddress,
        url: String,
        rect: Bounds,
        image: Option<Arc<TileImage>>,
        failed: bool,
    ) -> Result<()> {
        if rect.is_empty() {
            return Err(format!("Invalid tile bounds for {}", address).into());
        }
        if !rect.intersects(&self.clip_bounds()) {
            return Ok(());
        }

        let command = match image {
            Some(image) => DrawCommand::Tile {
                address,
                url,
                rect,
                image,
            },
            None => DrawCommand::Placeholder {
                address,
                url,
                rect,
                failed,
            },
        };
        self.commands.push(command);
        Ok(())
    }

    pub fn render_marker(&mut self, command: DrawCommand) {
        debug_assert!(matches!(command, DrawCommand::Marker { .. }));
        self.commands.push(command);
    }

    pub fn render_zoom_button(&mut self, direction: ZoomDirection, rect: Bounds, enabled: bool) {
        self.commands.push(DrawCommand::ZoomButton {
            direction,
            rect,
            enabled,
        });
    }

    /// Get the current drawing queue
    pub fn get_drawing_queue(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn tile_slots(&self) -> impl Iterator<Item = &DrawCommand> {
        self.commands.iter().filter(|c| c.is_tile_slot())
    }

    pub fn markers(&self) -> impl Iterator<Item = &DrawCommand> {
        self.commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::Marker { .. }))
    }

    /// Screen position of the marker with `id`, if it was drawn
    pub fn marker_position(&self, id: &str) -> Option<Point> {
        self.markers().find_map(|c| match c {
            DrawCommand::Marker {
                id: marker_id,
                position,
                ..
            } if marker_id == id => Some(*position),
            _ => None,
        })
    }

    pub fn zoom_buttons(&self) -> impl Iterator<Item = &DrawCommand> {
        self.commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::ZoomButton { .. }))
    }
}
