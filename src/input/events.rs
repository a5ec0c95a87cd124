use crate::core::geo::{GeoPoint, Point};
use serde::{Deserialize, Serialize};

/// Pointer input in container coordinates, independent of any UI toolkit
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PointerEvent {
    Down { position: Point },
    Move { position: Point },
    Up { position: Point },
    /// Pointer left the container
    Leave { position: Point },
}

impl PointerEvent {
    pub fn position(&self) -> Point {
        match self {
            PointerEvent::Down { position }
            | PointerEvent::Move { position }
            | PointerEvent::Up { position }
            | PointerEvent::Leave { position } => *position,
        }
    }
}

/// Direction of a discrete zoom step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ZoomDirection {
    In,
    Out,
}

/// Events emitted by the map to the host
#[derive(Debug, Clone, PartialEq)]
pub enum MapEvent {
    MarkerClick { marker_id: String },
    /// Click on empty map while placement mode is active
    MapClick { position: GeoPoint },
    CenterChanged { center: GeoPoint },
    ZoomChanged { zoom: u8 },
}

/// Listener key for [`MapEvent`] variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MapEventKind {
    MarkerClick,
    MapClick,
    CenterChanged,
    ZoomChanged,
}

impl MapEvent {
    pub fn kind(&self) -> MapEventKind {
        match self {
            MapEvent::MarkerClick { .. } => MapEventKind::MarkerClick,
            MapEvent::MapClick { .. } => MapEventKind::MapClick,
            MapEvent::CenterChanged { .. } => MapEventKind::CenterChanged,
            MapEvent::ZoomChanged { .. } => MapEventKind::ZoomChanged,
        }
    }
}
