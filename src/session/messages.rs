//! Messages exchanged between the host chart and the annotator

use crate::domain::{DrawingObject, Point};

/// Raw pointer input from the drawing surface
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    /// Button pressed at position
    Down(Point),
    /// Cursor moved to position
    Move(Point),
    /// Button released at position
    Up(Point),
    /// Cursor left the surface
    Leave,
}

/// Notifications sent back to the host
#[derive(Debug, Clone, PartialEq)]
pub enum AnnotatorEvent {
    /// A drawing was committed to the store
    DrawingCompleted(DrawingObject),
    /// All drawings were removed
    Cleared,
}
