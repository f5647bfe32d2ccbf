use crate::annotations::hit_test::ControlPointHit;
use crate::config::{AnnotatorConfig, ShapeColor};
use crate::domain::{DrawingId, DrawingObject, Tool};
use crate::session::store::DrawingStore;

/// A drawing gesture in progress
#[derive(Clone, Debug, PartialEq)]
pub struct Gesture {
    /// The drawing being built; never part of the store
    pub drawing: DrawingObject,
    /// Points fixed by presses so far, the rest is cursor preview
    pub placed: usize,
}

impl Gesture {
    /// Presses still needed before the drawing can commit
    pub fn points_needed(&self) -> usize {
        self.drawing.shape.min_points().saturating_sub(self.placed)
    }
}

/// Pointer interaction state
#[derive(Clone, Debug, Default, PartialEq)]
pub enum Interaction {
    #[default]
    Idle,
    Drawing(Gesture),
    DraggingPoint(ControlPointHit),
}

/// Everything the pointer handlers read and mutate
#[derive(Clone, Debug)]
pub struct AnnotationState {
    pub store: DrawingStore,
    pub interaction: Interaction,
    pub active_tool: Tool,
    /// Color for new drawings
    pub color: ShapeColor,
    /// Stroke weight for new drawings
    pub line_width: f32,
    pub config: AnnotatorConfig,
    next_id: u64,
    revision: u64,
}

impl Default for AnnotationState {
    fn default() -> Self {
        Self::new(AnnotatorConfig::default())
    }
}

impl AnnotationState {
    pub fn new(config: AnnotatorConfig) -> Self {
        Self {
            store: DrawingStore::new(),
            interaction: Interaction::Idle,
            active_tool: Tool::Select,
            color: config.color(),
            line_width: config.line_width,
            config,
            next_id: 1,
            revision: 0,
        }
    }

    /// Fresh drawing id; ids are never reused, not even after a clear
    pub fn allocate_id(&mut self) -> DrawingId {
        let id = DrawingId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Record a visible change
    pub fn touch(&mut self) {
        self.revision += 1;
    }

    /// Counter bumped on every visible change
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// The drawing being built, if a gesture is active
    pub fn in_progress(&self) -> Option<&DrawingObject> {
        match &self.interaction {
            Interaction::Drawing(gesture) => Some(&gesture.drawing),
            _ => None,
        }
    }

    /// Drop any gesture or drag without committing
    pub fn disable_all_modes(&mut self) {
        if matches!(self.interaction, Interaction::Drawing(_)) {
            self.touch();
        }
        self.interaction = Interaction::Idle;
    }

    /// Remove every drawing and reset interaction
    pub fn clear_all(&mut self) {
        self.store.clear();
        self.interaction = Interaction::Idle;
        self.touch();
    }
}
