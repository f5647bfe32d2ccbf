//! The annotator a chart instance owns
//!
//! Each chart gets its own `Annotator`; nothing is shared between instances.

use std::fmt;

use crate::annotations::handlers;
use crate::annotations::hit_test::{self, ControlPointHit};
use crate::config::{AnnotatorConfig, ShapeColor};
use crate::domain::{DrawingId, DrawingObject, Point, Tool};
use crate::session::messages::{AnnotatorEvent, PointerEvent};
use crate::session::state::{AnnotationState, Interaction};
use crate::session::store::DrawingStore;

type Listener = Box<dyn FnMut(&AnnotatorEvent)>;

/// Drawing tools for one chart surface
pub struct Annotator {
    state: AnnotationState,
    on_event: Option<Listener>,
}

impl Default for Annotator {
    fn default() -> Self {
        Self::new(AnnotatorConfig::default())
    }
}

impl fmt::Debug for Annotator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Annotator")
            .field("state", &self.state)
            .field("has_listener", &self.on_event.is_some())
            .finish()
    }
}

impl Annotator {
    pub fn new(config: AnnotatorConfig) -> Self {
        Self {
            state: AnnotationState::new(config),
            on_event: None,
        }
    }

    /// Register the host callback for completed drawings and clears
    pub fn with_listener(mut self, listener: impl FnMut(&AnnotatorEvent) + 'static) -> Self {
        self.set_listener(listener);
        self
    }

    pub fn set_listener(&mut self, listener: impl FnMut(&AnnotatorEvent) + 'static) {
        self.on_event = Some(Box::new(listener));
    }

    fn emit(&mut self, event: Option<AnnotatorEvent>) {
        if let (Some(event), Some(listener)) = (event, self.on_event.as_mut()) {
            listener(&event);
        }
    }

    // ========================================================================
    // Input
    // ========================================================================

    /// Feed one pointer event through the interaction state machine
    pub fn handle(&mut self, event: PointerEvent) {
        let out = handlers::handle_pointer(&mut self.state, event);
        self.emit(out);
    }

    pub fn pointer_down(&mut self, x: f32, y: f32) {
        self.handle(PointerEvent::Down(Point::new(x, y)));
    }

    pub fn pointer_move(&mut self, x: f32, y: f32) {
        self.handle(PointerEvent::Move(Point::new(x, y)));
    }

    pub fn pointer_up(&mut self, x: f32, y: f32) {
        self.handle(PointerEvent::Up(Point::new(x, y)));
    }

    pub fn pointer_leave(&mut self) {
        self.handle(PointerEvent::Leave);
    }

    /// Switch the active tool; a drawing in progress is discarded
    pub fn set_active_tool(&mut self, tool: impl Into<Tool>) {
        handlers::set_tool(&mut self.state, tool.into());
    }

    pub fn active_tool(&self) -> Tool {
        self.state.active_tool
    }

    /// Remove every drawing and reset interaction, from any state
    pub fn clear_all(&mut self) {
        let event = handlers::clear(&mut self.state);
        self.emit(Some(event));
    }

    /// Select a drawing by id, or clear the selection
    pub fn select(&mut self, id: Option<DrawingId>) {
        self.state.store.set_selected(id);
        self.state.touch();
    }

    /// Color used for the next drawings
    pub fn set_color(&mut self, color: ShapeColor) {
        self.state.color = color;
    }

    pub fn color(&self) -> ShapeColor {
        self.state.color
    }

    /// Stroke weight used for the next drawings
    pub fn set_line_width(&mut self, width: f32) {
        self.state.line_width = width.max(0.5);
    }

    pub fn line_width(&self) -> f32 {
        self.state.line_width
    }

    // ========================================================================
    // Queries
    // ========================================================================

    /// Committed drawings in insertion order
    pub fn drawings(&self) -> &[DrawingObject] {
        self.state.store.all()
    }

    pub fn store(&self) -> &DrawingStore {
        &self.state.store
    }

    /// The drawing being built, if a gesture is active
    pub fn in_progress(&self) -> Option<&DrawingObject> {
        self.state.in_progress()
    }

    pub fn interaction(&self) -> &Interaction {
        &self.state.interaction
    }

    pub fn config(&self) -> &AnnotatorConfig {
        &self.state.config
    }

    /// Counter bumped on every visible change
    pub fn revision(&self) -> u64 {
        self.state.revision()
    }

    /// Control point within the configured point tolerance
    pub fn find_control_point(&self, x: f32, y: f32) -> Option<ControlPointHit> {
        hit_test::find_control_point(
            self.drawings(),
            Point::new(x, y),
            self.state.config.point_tolerance,
        )
    }

    /// Topmost drawing within the configured line tolerance
    pub fn find_shape_at(&self, x: f32, y: f32) -> Option<DrawingId> {
        hit_test::find_shape_at(
            self.drawings(),
            Point::new(x, y),
            self.state.config.line_tolerance,
            self.state.config.full_body_hit_testing,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ShapeType;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn recording() -> (Annotator, Rc<RefCell<Vec<AnnotatorEvent>>>) {
        let events = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&events);
        let annotator =
            Annotator::default().with_listener(move |event| sink.borrow_mut().push(event.clone()));
        (annotator, events)
    }

    fn completed(events: &[AnnotatorEvent]) -> Vec<DrawingObject> {
        events
            .iter()
            .filter_map(|e| match e {
                AnnotatorEvent::DrawingCompleted(d) => Some(d.clone()),
                AnnotatorEvent::Cleared => None,
            })
            .collect()
    }

    #[test]
    fn test_trend_line_end_to_end() {
        let (mut annotator, events) = recording();
        annotator.set_active_tool(ShapeType::TrendLine);
        annotator.pointer_down(10.0, 10.0);
        annotator.pointer_move(50.0, 50.0);
        annotator.pointer_up(50.0, 50.0);

        assert_eq!(annotator.drawings().len(), 1);
        let drawing = &annotator.drawings()[0];
        assert_eq!(drawing.shape, ShapeType::TrendLine);
        assert_eq!(
            drawing.points,
            vec![Point::new(10.0, 10.0), Point::new(50.0, 50.0)]
        );

        let events = events.borrow();
        assert_eq!(events.len(), 1);
        assert_eq!(completed(&events), vec![drawing.clone()]);
    }

    #[test]
    fn test_horizontal_line_single_click() {
        let (mut annotator, events) = recording();
        annotator.set_active_tool(ShapeType::HorizontalLine);
        annotator.pointer_down(30.0, 40.0);
        annotator.pointer_up(30.0, 40.0);

        let drawing = &annotator.drawings()[0];
        assert_eq!(drawing.shape, ShapeType::HorizontalLine);
        assert_eq!(drawing.points, vec![Point::new(30.0, 40.0)]);
        assert_eq!(events.borrow().len(), 1);
    }

    #[test]
    fn test_parallel_channel_three_clicks() {
        let (mut annotator, events) = recording();
        annotator.set_active_tool(ShapeType::ParallelChannel);
        annotator.pointer_down(0.0, 0.0);
        annotator.pointer_down(100.0, 0.0);
        assert!(annotator.drawings().is_empty());
        annotator.pointer_down(0.0, 50.0);

        assert_eq!(annotator.drawings().len(), 1);
        let drawing = &annotator.drawings()[0];
        assert_eq!(drawing.shape, ShapeType::ParallelChannel);
        assert_eq!(
            drawing.points,
            vec![
                Point::new(0.0, 0.0),
                Point::new(100.0, 0.0),
                Point::new(0.0, 50.0)
            ]
        );
        assert_eq!(completed(&events.borrow()).len(), 1);
    }

    #[test]
    fn test_leave_cancels_without_event() {
        let (mut annotator, events) = recording();
        annotator.set_active_tool(ShapeType::TrendLine);
        annotator.pointer_down(5.0, 5.0);
        annotator.pointer_move(20.0, 20.0);
        annotator.pointer_leave();

        assert!(annotator.drawings().is_empty());
        assert!(annotator.in_progress().is_none());
        assert!(events.borrow().is_empty());
    }

    #[test]
    fn test_too_few_points_never_stored() {
        for shape in ShapeType::ALL {
            let (mut annotator, events) = recording();
            annotator.set_active_tool(shape);
            annotator.pointer_down(40.0, 40.0);
            annotator.pointer_up(40.0, 40.0);

            let stored = annotator.drawings().len();
            if shape.min_points() > 1 {
                assert_eq!(stored, 0, "{shape}");
                assert!(events.borrow().is_empty(), "{shape}");
            } else {
                assert_eq!(stored, 1, "{shape}");
            }
            assert!(
                annotator
                    .drawings()
                    .iter()
                    .all(|d| d.points.len() >= d.shape.min_points())
            );
        }
    }

    #[test]
    fn test_clear_all_end_to_end() {
        let (mut annotator, events) = recording();
        annotator.set_active_tool(ShapeType::TrendLine);
        annotator.pointer_down(10.0, 10.0);
        annotator.pointer_move(60.0, 20.0);
        annotator.pointer_up(60.0, 20.0);

        annotator.set_active_tool(ShapeType::VerticalLine);
        annotator.pointer_down(200.0, 100.0);
        annotator.pointer_up(200.0, 100.0);

        annotator.set_active_tool(ShapeType::FlatChannel);
        annotator.pointer_down(300.0, 150.0);
        annotator.pointer_move(320.0, 250.0);
        annotator.pointer_up(320.0, 250.0);
        assert_eq!(annotator.drawings().len(), 3);

        let points: Vec<Point> = annotator
            .drawings()
            .iter()
            .flat_map(|d| d.points.clone())
            .collect();
        for p in &points {
            assert!(annotator.find_control_point(p.x, p.y).is_some());
        }

        annotator.clear_all();
        assert_eq!(annotator.drawings().len(), 0);
        assert_eq!(
            events
                .borrow()
                .iter()
                .filter(|e| **e == AnnotatorEvent::Cleared)
                .count(),
            1
        );
        for p in &points {
            assert!(annotator.find_control_point(p.x, p.y).is_none());
        }
        assert_eq!(*annotator.interaction(), Interaction::Idle);
    }

    #[test]
    fn test_selecting_a_then_b() {
        let mut annotator = Annotator::default();
        annotator.set_active_tool(ShapeType::HorizontalLine);
        annotator.pointer_down(10.0, 100.0);
        annotator.pointer_up(10.0, 100.0);
        annotator.pointer_down(10.0, 200.0);
        annotator.pointer_up(10.0, 200.0);

        annotator.set_active_tool(Tool::Select);
        annotator.pointer_down(400.0, 101.0);
        annotator.pointer_up(400.0, 101.0);
        annotator.pointer_down(400.0, 199.0);
        annotator.pointer_up(400.0, 199.0);

        let selected: Vec<DrawingId> = annotator
            .drawings()
            .iter()
            .filter(|d| d.selected)
            .map(|d| d.id)
            .collect();
        assert_eq!(selected, vec![annotator.drawings()[1].id]);
    }

    #[test]
    fn test_style_applies_to_new_drawings() {
        let mut annotator = Annotator::default();
        annotator.set_color(crate::config::PALETTE[3]);
        annotator.set_line_width(4.0);
        annotator.set_active_tool(ShapeType::CrossLine);
        annotator.pointer_down(5.0, 5.0);
        annotator.pointer_up(5.0, 5.0);

        let drawing = &annotator.drawings()[0];
        assert_eq!(drawing.color, crate::config::PALETTE[3]);
        assert_eq!(drawing.line_width, 4.0);
    }

    #[test]
    fn test_find_shape_at_uses_config() {
        let config = AnnotatorConfig {
            full_body_hit_testing: false,
            ..Default::default()
        };
        let mut annotator = Annotator::new(config);
        annotator.set_active_tool(ShapeType::CrossLine);
        annotator.pointer_down(100.0, 100.0);
        annotator.pointer_up(100.0, 100.0);

        assert_eq!(annotator.find_shape_at(100.0, 400.0), None);
        assert_eq!(
            annotator.find_shape_at(102.0, 101.0),
            Some(annotator.drawings()[0].id)
        );
    }
}
