//! Ordered collection of committed drawings

use crate::domain::{DrawingId, DrawingObject, Point};

/// Committed drawings in insertion order
///
/// At most one drawing is selected at a time. Unknown ids are ignored so that
/// gestures racing a `clear` never fail.
#[derive(Clone, Debug, Default)]
pub struct DrawingStore {
    drawings: Vec<DrawingObject>,
}

impl DrawingStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a drawing to the end of the collection
    pub fn commit(&mut self, drawing: DrawingObject) {
        if drawing.selected {
            self.set_selected(None);
        }
        self.drawings.push(drawing);
    }

    /// Replace the points of a drawing, no-op for unknown ids
    pub fn set_points(&mut self, id: DrawingId, points: Vec<Point>) -> bool {
        match self.get_mut(id) {
            Some(drawing) => {
                drawing.points = points;
                true
            }
            None => {
                log::debug!("set_points: no drawing {id}");
                false
            }
        }
    }

    /// Move a single control point, no-op for unknown ids or indices
    pub fn set_point(&mut self, id: DrawingId, index: usize, point: Point) -> bool {
        let Some(drawing) = self.get(id) else {
            log::debug!("set_point: no drawing {id}");
            return false;
        };
        if index >= drawing.points.len() {
            log::debug!("set_point: drawing {id} has no point {index}");
            return false;
        }
        let mut points = drawing.points.clone();
        points[index] = point;
        self.set_points(id, points)
    }

    /// Select one drawing and deselect all others; None clears the selection
    pub fn set_selected(&mut self, id: Option<DrawingId>) {
        for drawing in &mut self.drawings {
            drawing.selected = Some(drawing.id) == id;
        }
    }

    /// Remove every drawing
    pub fn clear(&mut self) {
        self.drawings.clear();
    }

    /// All drawings in insertion order
    pub fn all(&self) -> &[DrawingObject] {
        &self.drawings
    }

    pub fn get(&self, id: DrawingId) -> Option<&DrawingObject> {
        self.drawings.iter().find(|d| d.id == id)
    }

    fn get_mut(&mut self, id: DrawingId) -> Option<&mut DrawingObject> {
        self.drawings.iter_mut().find(|d| d.id == id)
    }

    /// The selected drawing, if any
    pub fn selected(&self) -> Option<&DrawingObject> {
        self.drawings.iter().find(|d| d.selected)
    }

    pub fn len(&self) -> usize {
        self.drawings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.drawings.is_empty()
    }
}
