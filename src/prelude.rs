//! Prelude module for common fleetmap types
//!
//! This module re-exports the most commonly used types and functions
//! for easy importing with `use fleetmap::prelude::*;`

pub use crate::core::{
    bounds::Bounds,
    config::{ControlConfig, InteractionConfig, MapConfig, MarkerStyleConfig},
    geo::{GeoPoint, Point, TileAddress},
    viewport::{ViewFrame, ViewportState},
};

pub use crate::layers::{
    marker::{Marker, MarkerKind, MarkerStatus},
    projector::{hit_test, project_markers, ProjectedMarker},
};

pub use crate::input::{
    controller::{InteractionState, PointerOutcome, ViewportController},
    events::{MapEvent, MapEventKind, PointerEvent, ZoomDirection},
};

pub use crate::tiles::{
    grid::{compute_visible_tiles, VisibleTile},
    loader::{HttpTileFetcher, TileFetcher, TileLoader, TileResult},
    source::{TileSource, UrlTemplateSource},
    store::{TileImage, TileImageState, TileStore},
};

pub use crate::rendering::{
    context::{DrawCommand, Scene},
    renderer::MapRenderer,
    resize::{ResizeNotifier, ResizeSubscription},
};

#[cfg(feature = "egui")]
pub use crate::ui::{MapView, TileTextures};

pub use crate::{Error as MapError, Result};

pub use std::{collections::VecDeque, sync::Arc};

pub use fxhash::{FxHashMap as HashMap, FxHashSet as HashSet};
