//! Per-instance record of the tiles currently on display
//!
//! Loaded and failed entries exist only for tiles of the latest render pass;
//! anything that scrolls out of view is pruned, so nothing is kept for later
//! reuse. Pending entries stay until their download reports back, so a tile
//! that returns to view mid-download is not requested twice.

use super::loader::TileResult;
use crate::core::geo::TileAddress;
use crate::prelude::{Arc, HashMap, HashSet};
use crate::MapError;

/// Decoded RGBA8 tile pixels
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TileImage {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

impl TileImage {
    /// Decodes PNG or JPEG bytes
    pub fn decode(bytes: &[u8]) -> Result<Self, MapError> {
        let image = image::load_from_memory(bytes)?.to_rgba8();
        let (width, height) = image.dimensions();
        Ok(Self {
            width,
            height,
            rgba: image.into_raw(),
        })
    }
}

/// What a tile rectangle currently shows
#[derive(Debug, Clone, PartialEq)]
pub enum TileImageState {
    /// Requested, bytes not here yet
    Pending,
    Ready(Arc<TileImage>),
    /// Fetch or decode failed; drawn as a placeholder
    Failed,
}

#[derive(Debug, Default)]
pub struct TileStore {
    tiles: HashMap<TileAddress, TileImageState>,
}

impl TileStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, address: &TileAddress) -> Option<&TileImageState> {
        self.tiles.get(address)
    }

    /// Records a request; returns false if the tile is already tracked
    pub fn mark_pending(&mut self, address: TileAddress) -> bool {
        if self.tiles.contains_key(&address) {
            return false;
        }
        self.tiles.insert(address, TileImageState::Pending);
        true
    }

    /// Applies a finished load; returns true if a displayed tile changed.
    ///
    /// Results for tiles pruned in the meantime are discarded.
    pub fn ingest(&mut self, result: TileResult) -> bool {
        let Some(slot) = self.tiles.get_mut(&result.address) else {
            log::trace!("dropping late tile {}", result.address);
            return false;
        };

        *slot = match result.data.map_err(|e| e.to_string()).and_then(|bytes| {
            TileImage::decode(&bytes).map_err(|e| e.to_string())
        }) {
            Ok(image) => TileImageState::Ready(Arc::new(image)),
            Err(e) => {
                log::warn!("tile {} unavailable: {}", result.address, e);
                TileImageState::Failed
            }
        };
        true
    }

    /// Forgets every settled tile not in `visible`
    pub fn retain_visible(&mut self, visible: &HashSet<TileAddress>) {
        self.tiles.retain(|address, state| {
            visible.contains(address) || matches!(state, TileImageState::Pending)
        });
    }

    /// Tiles requested but not yet loaded or failed
    pub fn pending_count(&self) -> usize {
        self.tiles
            .values()
            .filter(|state| matches!(state, TileImageState::Pending))
            .count()
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }
}
