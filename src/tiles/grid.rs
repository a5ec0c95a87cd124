//! Visible tile enumeration
//!
//! Works in unwrapped tile indices around the container center and only
//! wraps/clamps when producing the fetchable [`TileAddress`], so screen
//! positions stay continuous across the antimeridian.

use crate::core::{
    bounds::Bounds,
    constants::TILE_SIZE,
    geo::{Point, TileAddress},
    viewport::{ViewFrame, ViewportState},
};

/// A tile address together with the container position of its top-left corner
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VisibleTile {
    pub address: TileAddress,
    pub screen_x: f64,
    pub screen_y: f64,
}

impl VisibleTile {
    pub fn rect(&self) -> Bounds {
        let size = TILE_SIZE as f64;
        Bounds::from_min_size(Point::new(self.screen_x, self.screen_y), size, size)
    }
}

/// Tiles covering a `width` x `height` container showing `viewport`.
pub fn compute_visible_tiles(
    viewport: &ViewportState,
    width: f64,
    height: f64,
) -> Vec<VisibleTile> {
    visible_tiles_in_frame(&viewport.frame(width, height))
}

/// Tiles covering the container of `frame`.
///
/// The grid is `ceil(dim / 256) + 2` tiles per axis around the tile under
/// the container center, capped at [`MAX_TILES_PER_AXIS`]; tiles entirely
/// outside the container are dropped.
pub fn visible_tiles_in_frame(frame: &ViewFrame) -> Vec<VisibleTile> {
    if frame.is_empty() {
        return Vec::new();
    }

    let size = TILE_SIZE as f64;
    // Anchor on what is visually centered so that drags of any length
    // keep the grid around the container.
    let visual_center = frame.visual_center_world();
    let center_x = (visual_center.x / size).floor() as i64;
    let center_y = (visual_center.y / size).floor() as i64;

    let half_cols = tiles_needed(frame.width) / 2;
    let half_rows = tiles_needed(frame.height) / 2;
    let container = frame.container();

    let capacity = (half_cols * 2 + 1).saturating_mul(half_rows * 2 + 1);
    let mut tiles = Vec::with_capacity(capacity as usize);
    for dy in -half_rows..=half_rows {
        for dx in -half_cols..=half_cols {
            let tile_x = center_x + dx;
            let tile_y = center_y + dy;

            let origin = Point::new(tile_x as f64 * size, tile_y as f64 * size);
            let screen = frame.world_to_screen(&origin);
            let rect = Bounds::from_min_size(screen, size, size);
            if !rect.intersects(&container) {
                continue;
            }

            tiles.push(VisibleTile {
                address: TileAddress::wrapped(tile_x, tile_y, frame.zoom),
                screen_x: screen.x,
                screen_y: screen.y,
            });
        }
    }

    log::trace!(
        "tile grid z{} {}x{}: {} tiles",
        frame.zoom,
        frame.width,
        frame.height,
        tiles.len()
    );
    tiles
}

/// Upper bound on grid tiles per axis, whatever the container size
pub const MAX_TILES_PER_AXIS: i64 = 1024;

fn tiles_needed(dimension: f64) -> i64 {
    let tiles = (dimension / TILE_SIZE as f64).ceil() + 2.0;
    if tiles.is_finite() {
        (tiles as i64).min(MAX_TILES_PER_AXIS)
    } else {
        MAX_TILES_PER_AXIS
    }
}
