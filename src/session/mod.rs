//! Drawing store, interaction state and the messages that drive them

pub mod messages;
pub mod state;
pub mod store;

pub use messages::{AnnotatorEvent, PointerEvent};
pub use state::{AnnotationState, Gesture, Interaction};
pub use store::DrawingStore;
