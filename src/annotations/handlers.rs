//! Pointer handlers for drawing, selecting and dragging
//!
//! Every transition completes inside a single call.

use super::hit_test;
use crate::domain::{DrawingObject, Placement, Point, ShapeType, Tool};
use crate::session::messages::{AnnotatorEvent, PointerEvent};
use crate::session::state::{AnnotationState, Gesture, Interaction};

/// Handle a pointer event, modifying the annotation state
///
/// Returns the event the host should be told about, if any.
pub fn handle_pointer(state: &mut AnnotationState, event: PointerEvent) -> Option<AnnotatorEvent> {
    match event {
        PointerEvent::Down(p) => handle_down(state, p),
        PointerEvent::Move(p) => {
            handle_move(state, p);
            None
        }
        PointerEvent::Up(_) => handle_up(state),
        PointerEvent::Leave => {
            cancel(state);
            None
        }
    }
}

/// Switch tools, abandoning any drawing in progress
pub fn set_tool(state: &mut AnnotationState, tool: Tool) {
    if state.active_tool == tool {
        return;
    }
    if matches!(state.interaction, Interaction::Drawing(_)) {
        log::debug!("Tool changed mid-gesture, discarding drawing");
    }
    state.disable_all_modes();
    state.active_tool = tool;
}

/// Remove every drawing
pub fn clear(state: &mut AnnotationState) -> AnnotatorEvent {
    log::debug!("Clearing {} drawings", state.store.len());
    state.clear_all();
    AnnotatorEvent::Cleared
}

// ============================================================================
// Pointer down
// ============================================================================

fn handle_down(state: &mut AnnotationState, p: Point) -> Option<AnnotatorEvent> {
    match state.interaction {
        Interaction::Idle => {}
        Interaction::Drawing(_) => return place_point(state, p),
        Interaction::DraggingPoint(hit) => {
            // Missed release; the drag already applied in place
            log::debug!("Press while dragging {}, ending drag", hit.id);
            state.interaction = Interaction::Idle;
        }
    }

    let tolerance = state.config.point_tolerance;
    if let Some(hit) = hit_test::find_control_point(state.store.all(), p, tolerance) {
        log::debug!("Dragging point {} of {}", hit.index, hit.id);
        state.interaction = Interaction::DraggingPoint(hit);
        return None;
    }

    match state.active_tool {
        Tool::Select => select_at(state, p),
        Tool::Draw(shape) => start_drawing(state, shape, p),
    }
    None
}

fn select_at(state: &mut AnnotationState, p: Point) {
    let id = hit_test::find_shape_at(
        state.store.all(),
        p,
        state.config.line_tolerance,
        state.config.full_body_hit_testing,
    );
    match id {
        Some(id) => log::debug!("Selected {id}"),
        None => log::trace!("Nothing under cursor, clearing selection"),
    }
    state.store.set_selected(id);
    state.touch();
}

fn start_drawing(state: &mut AnnotationState, shape: ShapeType, p: Point) {
    let id = state.allocate_id();
    let mut drawing = DrawingObject::new(id, shape, p, state.color, state.line_width);
    drawing.selected = true;
    state.store.set_selected(None);

    log::debug!("Started {shape} {id} at ({}, {})", p.x, p.y);
    state.interaction = Interaction::Drawing(Gesture { drawing, placed: 1 });
    state.touch();
}

/// A press during a gesture fixes the next point of click-placed shapes
fn place_point(state: &mut AnnotationState, p: Point) -> Option<AnnotatorEvent> {
    let Interaction::Drawing(gesture) = &mut state.interaction else {
        return None;
    };
    if gesture.drawing.shape.placement() != Placement::Clicks {
        log::debug!("Ignoring press during {} drag", gesture.drawing.shape);
        return None;
    }

    let points = &mut gesture.drawing.points;
    if points.len() > gesture.placed {
        // Fix the preview point where the press landed
        if let Some(last) = points.last_mut() {
            *last = p;
        }
    } else {
        points.push(p);
    }
    gesture.placed += 1;
    log::trace!(
        "Placed point {} of {}, {} more needed",
        gesture.placed,
        gesture.drawing.id,
        gesture.points_needed()
    );

    if gesture.points_needed() == 0 {
        return finish(state);
    }
    state.touch();
    None
}

// ============================================================================
// Pointer move
// ============================================================================

fn handle_move(state: &mut AnnotationState, p: Point) {
    match &mut state.interaction {
        Interaction::Idle => return,
        Interaction::Drawing(gesture) => track_cursor(gesture, p),
        Interaction::DraggingPoint(hit) => {
            let hit = *hit;
            if !state.store.set_point(hit.id, hit.index, p) {
                // Drawing vanished under the drag
                state.interaction = Interaction::Idle;
                return;
            }
            log::trace!("Moved point {} of {} to ({}, {})", hit.index, hit.id, p.x, p.y);
        }
    }
    state.touch();
}

fn track_cursor(gesture: &mut Gesture, p: Point) {
    let points = &mut gesture.drawing.points;
    match gesture.drawing.shape.placement() {
        Placement::Follow => {
            if let Some(first) = points.first_mut() {
                *first = p;
            }
        }
        Placement::Drag => {
            if points.len() < 2 {
                points.push(p);
            } else {
                points[1] = p;
            }
        }
        Placement::Clicks => {
            if points.len() > gesture.placed {
                if let Some(last) = points.last_mut() {
                    *last = p;
                }
            } else {
                points.push(p);
            }
        }
    }
}

// ============================================================================
// Pointer up / leave
// ============================================================================

fn handle_up(state: &mut AnnotationState) -> Option<AnnotatorEvent> {
    match &state.interaction {
        Interaction::Idle => None,
        Interaction::DraggingPoint(hit) => {
            log::debug!("Released point {} of {}", hit.index, hit.id);
            state.interaction = Interaction::Idle;
            None
        }
        // Click-placed shapes keep going until their last press
        Interaction::Drawing(gesture) if gesture.drawing.shape.placement() == Placement::Clicks => {
            None
        }
        Interaction::Drawing(_) => finish(state),
    }
}

/// End the gesture, committing the drawing if it has enough points
fn finish(state: &mut AnnotationState) -> Option<AnnotatorEvent> {
    let Interaction::Drawing(gesture) = std::mem::take(&mut state.interaction) else {
        return None;
    };
    state.touch();

    let mut drawing = gesture.drawing;
    if !drawing.is_complete() {
        log::debug!(
            "Discarding {} {}: {} of {} points",
            drawing.shape,
            drawing.id,
            drawing.points.len(),
            drawing.shape.min_points()
        );
        return None;
    }

    drawing.points.truncate(drawing.shape.min_points());
    log::debug!("Committed {} {}", drawing.shape, drawing.id);
    state.store.commit(drawing.clone());
    Some(AnnotatorEvent::DrawingCompleted(drawing))
}

fn cancel(state: &mut AnnotationState) {
    match &state.interaction {
        Interaction::Idle => {}
        Interaction::Drawing(gesture) => {
            log::debug!("Cursor left surface, discarding {}", gesture.drawing.id);
            state.disable_all_modes();
        }
        Interaction::DraggingPoint(hit) => {
            log::debug!("Cursor left surface, ending drag of {}", hit.id);
            state.disable_all_modes();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::DrawingId;

    fn state_with(tool: Tool) -> AnnotationState {
        let mut state = AnnotationState::default();
        state.active_tool = tool;
        state
    }

    fn down(state: &mut AnnotationState, x: f32, y: f32) -> Option<AnnotatorEvent> {
        handle_pointer(state, PointerEvent::Down(Point::new(x, y)))
    }

    fn mv(state: &mut AnnotationState, x: f32, y: f32) {
        handle_pointer(state, PointerEvent::Move(Point::new(x, y)));
    }

    fn up(state: &mut AnnotationState, x: f32, y: f32) -> Option<AnnotatorEvent> {
        handle_pointer(state, PointerEvent::Up(Point::new(x, y)))
    }

    #[test]
    fn test_drag_shape_lifecycle() {
        let mut state = state_with(Tool::Draw(ShapeType::TrendLine));
        assert!(down(&mut state, 10.0, 10.0).is_none());
        assert!(matches!(state.interaction, Interaction::Drawing(_)));
        assert!(state.in_progress().unwrap().selected);

        mv(&mut state, 30.0, 30.0);
        mv(&mut state, 50.0, 50.0);
        assert_eq!(state.in_progress().unwrap().points.len(), 2);
        assert!(state.store.is_empty());

        let event = up(&mut state, 50.0, 50.0);
        assert_eq!(state.interaction, Interaction::Idle);
        assert_eq!(state.store.len(), 1);
        let committed = &state.store.all()[0];
        assert_eq!(
            committed.points,
            vec![Point::new(10.0, 10.0), Point::new(50.0, 50.0)]
        );
        assert_eq!(event, Some(AnnotatorEvent::DrawingCompleted(committed.clone())));
    }

    #[test]
    fn test_click_without_drag_discards_two_point_shape() {
        let mut state = state_with(Tool::Draw(ShapeType::Ray));
        down(&mut state, 10.0, 10.0);
        assert!(up(&mut state, 10.0, 10.0).is_none());
        assert!(state.store.is_empty());
        assert_eq!(state.interaction, Interaction::Idle);
    }

    #[test]
    fn test_single_point_shape_follows_cursor() {
        let mut state = state_with(Tool::Draw(ShapeType::HorizontalLine));
        down(&mut state, 30.0, 40.0);
        mv(&mut state, 35.0, 60.0);
        up(&mut state, 35.0, 60.0);
        assert_eq!(state.store.all()[0].points, vec![Point::new(35.0, 60.0)]);
    }

    #[test]
    fn test_click_placed_shape_with_releases_between() {
        let mut state = state_with(Tool::Draw(ShapeType::Pitchfork));
        down(&mut state, 0.0, 0.0);
        up(&mut state, 0.0, 0.0);
        mv(&mut state, 40.0, 10.0);
        assert_eq!(state.in_progress().unwrap().points.len(), 2);

        down(&mut state, 50.0, 10.0);
        up(&mut state, 50.0, 10.0);
        mv(&mut state, 60.0, 60.0);
        assert!(state.store.is_empty());

        let event = down(&mut state, 50.0, 90.0);
        assert!(matches!(event, Some(AnnotatorEvent::DrawingCompleted(_))));
        assert_eq!(
            state.store.all()[0].points,
            vec![
                Point::new(0.0, 0.0),
                Point::new(50.0, 10.0),
                Point::new(50.0, 90.0)
            ]
        );
        // The release after the final press has nothing left to do
        assert!(up(&mut state, 50.0, 90.0).is_none());
        assert_eq!(state.store.len(), 1);
    }

    #[test]
    fn test_leave_cancels_gesture() {
        let mut state = state_with(Tool::Draw(ShapeType::TrendLine));
        down(&mut state, 5.0, 5.0);
        mv(&mut state, 20.0, 20.0);
        handle_pointer(&mut state, PointerEvent::Leave);
        assert!(state.store.is_empty());
        assert!(state.in_progress().is_none());
        assert!(up(&mut state, 20.0, 20.0).is_none());
    }

    #[test]
    fn test_dragging_control_point() {
        let mut state = state_with(Tool::Draw(ShapeType::TrendLine));
        down(&mut state, 10.0, 10.0);
        mv(&mut state, 100.0, 100.0);
        up(&mut state, 100.0, 100.0);

        // Press on the end point grabs it instead of starting a new drawing
        down(&mut state, 102.0, 98.0);
        assert!(matches!(
            state.interaction,
            Interaction::DraggingPoint(hit) if hit.id == DrawingId(1) && hit.index == 1
        ));
        mv(&mut state, 150.0, 120.0);
        up(&mut state, 150.0, 120.0);

        assert_eq!(state.interaction, Interaction::Idle);
        assert_eq!(state.store.len(), 1);
        assert_eq!(
            state.store.all()[0].points,
            vec![Point::new(10.0, 10.0), Point::new(150.0, 120.0)]
        );
    }

    #[test]
    fn test_drag_of_cleared_drawing_is_noop() {
        let mut state = state_with(Tool::Select);
        state.active_tool = Tool::Draw(ShapeType::TrendLine);
        down(&mut state, 10.0, 10.0);
        mv(&mut state, 60.0, 60.0);
        up(&mut state, 60.0, 60.0);
        down(&mut state, 60.0, 60.0);

        state.store.clear();
        mv(&mut state, 70.0, 70.0);
        assert_eq!(state.interaction, Interaction::Idle);
        assert!(state.store.is_empty());
    }

    #[test]
    fn test_select_tool_selects_and_clears() {
        let mut state = state_with(Tool::Draw(ShapeType::TrendLine));
        for (a, b) in [((0.0, 0.0), (100.0, 0.0)), ((0.0, 50.0), (100.0, 50.0))] {
            down(&mut state, a.0, a.1);
            mv(&mut state, b.0, b.1);
            up(&mut state, b.0, b.1);
        }
        set_tool(&mut state, Tool::Select);

        down(&mut state, 50.0, 2.0);
        up(&mut state, 50.0, 2.0);
        assert_eq!(state.store.selected().map(|d| d.id), Some(DrawingId(1)));

        down(&mut state, 50.0, 48.0);
        assert_eq!(state.store.selected().map(|d| d.id), Some(DrawingId(2)));
        assert_eq!(state.store.all().iter().filter(|d| d.selected).count(), 1);

        down(&mut state, 50.0, 25.0);
        assert!(state.store.selected().is_none());
        assert_eq!(state.interaction, Interaction::Idle);
    }

    #[test]
    fn test_new_drawing_deselects_committed() {
        let mut state = state_with(Tool::Draw(ShapeType::HorizontalLine));
        down(&mut state, 0.0, 10.0);
        up(&mut state, 0.0, 10.0);
        assert!(state.store.all()[0].selected);

        down(&mut state, 0.0, 80.0);
        assert!(!state.store.all()[0].selected);
        up(&mut state, 0.0, 80.0);

        let selected: Vec<DrawingId> = state
            .store
            .all()
            .iter()
            .filter(|d| d.selected)
            .map(|d| d.id)
            .collect();
        assert_eq!(selected, vec![DrawingId(2)]);
    }

    #[test]
    fn test_tool_change_discards_gesture() {
        let mut state = state_with(Tool::Draw(ShapeType::ParallelChannel));
        down(&mut state, 0.0, 0.0);
        down(&mut state, 10.0, 0.0);
        set_tool(&mut state, Tool::Draw(ShapeType::TrendLine));
        assert!(state.in_progress().is_none());
        assert!(state.store.is_empty());
    }

    #[test]
    fn test_clear_resets_everything() {
        let mut state = state_with(Tool::Draw(ShapeType::CrossLine));
        down(&mut state, 10.0, 10.0);
        up(&mut state, 10.0, 10.0);
        down(&mut state, 200.0, 200.0);

        assert_eq!(clear(&mut state), AnnotatorEvent::Cleared);
        assert!(state.store.is_empty());
        assert_eq!(state.interaction, Interaction::Idle);

        // Ids keep counting after a clear
        down(&mut state, 10.0, 10.0);
        up(&mut state, 10.0, 10.0);
        assert_eq!(state.store.all()[0].id, DrawingId(3));
    }

    #[test]
    fn test_revision_tracks_visible_changes() {
        let mut state = state_with(Tool::Draw(ShapeType::TrendLine));
        let start = state.revision();
        mv(&mut state, 1.0, 1.0);
        assert_eq!(state.revision(), start);

        down(&mut state, 1.0, 1.0);
        assert!(state.revision() > start);
        let before_move = state.revision();
        mv(&mut state, 5.0, 5.0);
        assert!(state.revision() > before_move);
    }
}
