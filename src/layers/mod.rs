pub mod marker;
pub mod projector;

pub use marker::{Marker, MarkerKind, MarkerStatus};
pub use projector::{hit_test, project_markers, ProjectedMarker};
