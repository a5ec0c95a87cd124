pub mod controller;
pub mod events;
pub mod handler;

// Re-export the essential types
pub use controller::{InteractionState, PointerOutcome, ViewportController};
pub use events::{MapEvent, MapEventKind, PointerEvent, ZoomDirection};
pub use handler::{EventCallback, EventManager};
