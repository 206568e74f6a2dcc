//! Pointer/touch gesture state machine for the map viewport.
//!
//! One gesture at most is active: either panning the view or dragging a
//! location node (edit mode only). Move events are coalesced through a
//! single-slot queue and committed at most once per display frame.

use tracing::{debug, trace};

use crate::models::{find_location, Location, LocationId};
use crate::viewport::ViewMatrix;

/// Mouse movement below this many screen pixels still counts as a click.
pub const DRAG_CLICK_THRESHOLD: f64 = 3.0;

/// Touch click threshold, larger than mouse because touch is less precise.
pub const TOUCH_CLICK_THRESHOLD: f64 = 8.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputKind {
    #[default]
    Mouse,
    Touch,
}

impl InputKind {
    fn click_threshold(self) -> f64 {
        match self {
            InputKind::Mouse => DRAG_CLICK_THRESHOLD,
            InputKind::Touch => TOUCH_CLICK_THRESHOLD,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Interaction {
    Pan {
        start_x: f64,
        start_y: f64,
        initial_translate_x: f64,
        initial_translate_y: f64,
    },
    Drag {
        target_id: LocationId,
        start_x: f64,
        start_y: f64,
        initial_node_x: f64,
        initial_node_y: f64,
    },
}

impl Interaction {
    fn start(&self) -> (f64, f64) {
        match self {
            Interaction::Pan {
                start_x, start_y, ..
            }
            | Interaction::Drag {
                start_x, start_y, ..
            } => (*start_x, *start_y),
        }
    }
}

/// Cursor affordance shown over the viewport.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cursor {
    Grab,
    Grabbing,
    Default,
    Move,
}

impl Cursor {
    pub fn css(self) -> &'static str {
        match self {
            Cursor::Grab => "grab",
            Cursor::Grabbing => "grabbing",
            Cursor::Default => "default",
            Cursor::Move => "move",
        }
    }
}

/// Cursor for a viewport with no active gesture.
pub fn idle_cursor(edit_mode: bool) -> Cursor {
    if edit_mode {
        Cursor::Default
    } else {
        Cursor::Grab
    }
}

/// Receiver of node coordinate updates during a drag.
///
/// Calls are fire-and-forget: the controller never observes whether the
/// owner accepted the update.
pub trait CoordinateSink {
    fn update_location_coordinates(&mut self, id: &str, x: f64, y: f64);
}

impl<F> CoordinateSink for F
where
    F: FnMut(&str, f64, f64),
{
    fn update_location_coordinates(&mut self, id: &str, x: f64, y: f64) {
        self(id, x, y)
    }
}

/// Single-slot queue that keeps only the most recent value.
#[derive(Debug, Clone)]
pub struct LatestSlot<T> {
    value: Option<T>,
}

impl<T> Default for LatestSlot<T> {
    fn default() -> Self {
        LatestSlot { value: None }
    }
}

impl<T> LatestSlot<T> {
    /// Store `value`, replacing any pending one. Returns `true` if the slot
    /// was empty, meaning the consumer has to be scheduled.
    pub fn offer(&mut self, value: T) -> bool {
        self.value.replace(value).is_none()
    }

    pub fn take(&mut self) -> Option<T> {
        self.value.take()
    }

    pub fn is_pending(&self) -> bool {
        self.value.is_some()
    }

    pub fn clear(&mut self) {
        self.value = None;
    }
}

/// Summary of a finished gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GestureEnd {
    pub was_drag: bool,
    /// Pointer travelled past the click threshold at some point.
    pub moved: bool,
}

#[derive(Debug, Default)]
pub struct GestureController {
    interaction: Option<Interaction>,
    pending: LatestSlot<(f64, f64)>,
    input: InputKind,
    moved: bool,
}

impl GestureController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn interaction(&self) -> Option<&Interaction> {
        self.interaction.as_ref()
    }

    pub fn is_active(&self) -> bool {
        self.interaction.is_some()
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.interaction, Some(Interaction::Drag { .. }))
    }

    pub fn frame_pending(&self) -> bool {
        self.pending.is_pending()
    }

    /// Start panning from the current view translation. Replaces any active gesture.
    pub fn begin_pan(&mut self, x: f64, y: f64, view: &ViewMatrix, input: InputKind) -> bool {
        if !x.is_finite() || !y.is_finite() {
            return false;
        }
        let (tx, ty) = view.translate();
        self.activate(
            Interaction::Pan {
                start_x: x,
                start_y: y,
                initial_translate_x: tx,
                initial_translate_y: ty,
            },
            input,
        );
        debug!(x, y, "pan started");
        true
    }

    /// Start dragging `target_id`. Ignored unless edit mode is on and the
    /// target exists in `locations`.
    pub fn begin_drag(
        &mut self,
        x: f64,
        y: f64,
        target_id: &str,
        edit_mode: bool,
        locations: &[Location],
        input: InputKind,
    ) -> bool {
        if !edit_mode || !x.is_finite() || !y.is_finite() {
            debug!(target_id, edit_mode, "drag start ignored");
            return false;
        }
        let Some(target) = find_location(locations, target_id) else {
            debug!(target_id, "drag start ignored, unknown location");
            return false;
        };
        self.activate(
            Interaction::Drag {
                target_id: target.id.clone(),
                start_x: x,
                start_y: y,
                initial_node_x: target.map_x,
                initial_node_y: target.map_y,
            },
            input,
        );
        debug!(target_id, x, y, "drag started");
        true
    }

    fn activate(&mut self, interaction: Interaction, input: InputKind) {
        self.pending.clear();
        self.interaction = Some(interaction);
        self.input = input;
        self.moved = false;
    }

    /// Record the latest pointer position. Returns `true` when a frame
    /// callback must be scheduled to commit it.
    pub fn pointer_moved(&mut self, x: f64, y: f64) -> bool {
        let Some(interaction) = &self.interaction else {
            return false;
        };
        if !x.is_finite() || !y.is_finite() {
            return false;
        }
        let (sx, sy) = interaction.start();
        let threshold = self.input.click_threshold();
        if (x - sx).abs() > threshold || (y - sy).abs() > threshold {
            self.moved = true;
        }
        self.pending.offer((x, y))
    }

    /// Apply the latest pending pointer position. Returns `true` if the view
    /// or a node was updated.
    pub fn commit_frame<S: CoordinateSink>(
        &mut self,
        view: &mut ViewMatrix,
        locations: &[Location],
        sink: &mut S,
    ) -> bool {
        let Some((x, y)) = self.pending.take() else {
            return false;
        };
        match &self.interaction {
            Some(Interaction::Pan {
                start_x,
                start_y,
                initial_translate_x,
                initial_translate_y,
            }) => {
                view.pan_from(
                    *initial_translate_x,
                    *initial_translate_y,
                    x - start_x,
                    y - start_y,
                );
                trace!(x, y, "pan frame");
                true
            }
            Some(Interaction::Drag {
                target_id,
                start_x,
                start_y,
                initial_node_x,
                initial_node_y,
            }) => {
                // The target may have been removed by its owner; try again next frame.
                if find_location(locations, target_id).is_none() {
                    trace!(target_id = %target_id, "drag target missing, frame skipped");
                    return false;
                }
                let scale = view.scale();
                let node_x = initial_node_x + (x - start_x) / scale;
                let node_y = initial_node_y + (y - start_y) / scale;
                sink.update_location_coordinates(target_id, node_x, node_y);
                trace!(target_id = %target_id, node_x, node_y, "drag frame");
                true
            }
            None => false,
        }
    }

    /// Finish the active gesture, committing the last pointer position that
    /// has not reached a frame yet. Normal end and cancel both land here, so
    /// the final state matches what per-frame commits would have produced.
    pub fn finish<S: CoordinateSink>(
        &mut self,
        view: &mut ViewMatrix,
        locations: &[Location],
        sink: &mut S,
    ) -> Option<GestureEnd> {
        if self.pending.is_pending() {
            self.commit_frame(view, locations, sink);
        }
        self.abort()
    }

    /// Drop the active gesture without committing anything still pending.
    pub fn abort(&mut self) -> Option<GestureEnd> {
        self.pending.clear();
        let interaction = self.interaction.take()?;
        let summary = GestureEnd {
            was_drag: matches!(interaction, Interaction::Drag { .. }),
            moved: self.moved,
        };
        self.moved = false;
        debug!(was_drag = summary.was_drag, moved = summary.moved, "gesture ended");
        Some(summary)
    }

    pub fn cursor(&self, edit_mode: bool) -> Cursor {
        match self.interaction {
            Some(Interaction::Pan { .. }) => Cursor::Grabbing,
            Some(Interaction::Drag { .. }) => Cursor::Move,
            None => idle_cursor(edit_mode),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::location;

    #[derive(Default)]
    struct RecordingSink {
        calls: Vec<(String, f64, f64)>,
    }

    impl CoordinateSink for RecordingSink {
        fn update_location_coordinates(&mut self, id: &str, x: f64, y: f64) {
            self.calls.push((id.to_string(), x, y));
        }
    }

    fn assert_close(a: f64, b: f64) {
        assert!((a - b).abs() < 1e-9, "{a} != {b}");
    }

    #[test]
    fn test_latest_slot_keeps_newest() {
        let mut slot = LatestSlot::default();
        assert!(slot.offer(1));
        assert!(!slot.offer(2));
        assert!(!slot.offer(3));
        assert_eq!(slot.take(), Some(3));
        assert_eq!(slot.take(), None);
        assert!(slot.offer(4));
    }

    #[test]
    fn test_pan_moves_translation_by_delta() {
        let mut view = ViewMatrix::default();
        view.pan_from(0.0, 0.0, 10.0, 20.0);
        let mut gc = GestureController::new();
        assert!(gc.begin_pan(100.0, 100.0, &view, InputKind::Mouse));
        assert_eq!(gc.cursor(false), Cursor::Grabbing);

        assert!(gc.pointer_moved(130.0, 90.0));
        let mut sink = RecordingSink::default();
        assert!(gc.commit_frame(&mut view, &[], &mut sink));
        assert_eq!(view.translate(), (40.0, 10.0));
        assert!(sink.calls.is_empty());
    }

    #[test]
    fn test_pan_coalescing_matches_per_frame_commits() {
        let moves = [(5.0, 3.0), (17.0, -8.0), (33.3, 12.1), (48.0, 60.5)];
        let mut sink = RecordingSink::default();

        let mut every_frame = ViewMatrix::default();
        let mut gc = GestureController::new();
        gc.begin_pan(0.0, 0.0, &every_frame, InputKind::Mouse);
        for (x, y) in moves {
            gc.pointer_moved(x, y);
            gc.commit_frame(&mut every_frame, &[], &mut sink);
        }

        let mut coalesced = ViewMatrix::default();
        let mut gc = GestureController::new();
        gc.begin_pan(0.0, 0.0, &coalesced, InputKind::Mouse);
        let scheduled: Vec<bool> = moves.iter().map(|&(x, y)| gc.pointer_moved(x, y)).collect();
        assert_eq!(scheduled, vec![true, false, false, false]);
        gc.commit_frame(&mut coalesced, &[], &mut sink);

        assert_eq!(every_frame, coalesced);
        assert_eq!(coalesced.translate(), (48.0, 60.5));
    }

    #[test]
    fn test_commit_without_pending_move_is_noop() {
        let mut view = ViewMatrix::default();
        let mut gc = GestureController::new();
        gc.begin_pan(0.0, 0.0, &view, InputKind::Mouse);
        let mut sink = RecordingSink::default();
        assert!(!gc.commit_frame(&mut view, &[], &mut sink));
    }

    #[test]
    fn test_drag_requires_edit_mode() {
        let locations = vec![location("mill", 10.0, 20.0, None)];
        let mut view = ViewMatrix::default();
        let mut gc = GestureController::new();
        assert!(!gc.begin_drag(0.0, 0.0, "mill", false, &locations, InputKind::Mouse));
        assert!(gc.interaction().is_none());

        assert!(!gc.pointer_moved(50.0, 50.0));
        let mut sink = RecordingSink::default();
        gc.commit_frame(&mut view, &locations, &mut sink);
        assert!(sink.calls.is_empty());
    }

    #[test]
    fn test_drag_unknown_target_ignored() {
        let locations = vec![location("mill", 10.0, 20.0, None)];
        let mut gc = GestureController::new();
        assert!(!gc.begin_drag(0.0, 0.0, "ghost", true, &locations, InputKind::Mouse));
        assert!(!gc.is_active());
    }

    #[test]
    fn test_drag_divides_delta_by_scale() {
        let locations = vec![location("mill", 10.0, 20.0, None)];
        let mut view = ViewMatrix::default();
        view.zoom_by(2.0, 0.0, 0.0);
        let mut gc = GestureController::new();
        assert!(gc.begin_drag(200.0, 300.0, "mill", true, &locations, InputKind::Mouse));
        assert!(gc.is_dragging());
        assert_eq!(gc.cursor(true), Cursor::Move);

        gc.pointer_moved(240.0, 320.0);
        let mut sink = RecordingSink::default();
        assert!(gc.commit_frame(&mut view, &locations, &mut sink));
        assert_eq!(sink.calls.len(), 1);
        let (id, x, y) = &sink.calls[0];
        assert_eq!(id, "mill");
        assert_close(*x, 30.0);
        assert_close(*y, 30.0);
        // Dragging never touches the view
        assert_close(view.scale(), 2.0);
        assert_eq!(view.translate(), (0.0, 0.0));
    }

    #[test]
    fn test_drag_uses_baseline_not_live_coordinates() {
        let mut locations = vec![location("mill", 10.0, 20.0, None)];
        let mut view = ViewMatrix::default();
        let mut gc = GestureController::new();
        gc.begin_drag(0.0, 0.0, "mill", true, &locations, InputKind::Mouse);
        // Owner applied an earlier update
        locations[0].map_x = 999.0;
        gc.pointer_moved(5.0, 5.0);
        let mut sink = RecordingSink::default();
        gc.commit_frame(&mut view, &locations, &mut sink);
        assert_eq!(sink.calls, vec![("mill".to_string(), 15.0, 25.0)]);
    }

    #[test]
    fn test_drag_missing_target_skips_frame_but_continues() {
        let locations = vec![location("mill", 10.0, 20.0, None)];
        let mut view = ViewMatrix::default();
        let mut gc = GestureController::new();
        gc.begin_drag(0.0, 0.0, "mill", true, &locations, InputKind::Mouse);

        gc.pointer_moved(10.0, 10.0);
        let mut sink = RecordingSink::default();
        assert!(!gc.commit_frame(&mut view, &[], &mut sink));
        assert!(sink.calls.is_empty());
        assert!(gc.is_dragging());

        gc.pointer_moved(20.0, 10.0);
        assert!(gc.commit_frame(&mut view, &locations, &mut sink));
        assert_eq!(sink.calls, vec![("mill".to_string(), 30.0, 30.0)]);
    }

    #[test]
    fn test_closure_sink() {
        let locations = vec![location("mill", 0.0, 0.0, None)];
        let mut view = ViewMatrix::default();
        let mut gc = GestureController::new();
        gc.begin_drag(0.0, 0.0, "mill", true, &locations, InputKind::Touch);
        gc.pointer_moved(4.0, 6.0);
        let mut seen = None;
        let mut sink = |id: &str, x: f64, y: f64| seen = Some((id.to_string(), x, y));
        gc.commit_frame(&mut view, &locations, &mut sink);
        assert_eq!(seen, Some(("mill".to_string(), 4.0, 6.0)));
    }

    #[test]
    fn test_end_and_cancel_are_symmetric() {
        let locations = vec![location("mill", 0.0, 0.0, None)];

        for edit_mode in [false, true] {
            let mut view = ViewMatrix::default();
            let mut sink = RecordingSink::default();
            let mut gc = GestureController::new();
            if edit_mode {
                gc.begin_drag(0.0, 0.0, "mill", true, &locations, InputKind::Touch);
            } else {
                gc.begin_pan(0.0, 0.0, &view, InputKind::Touch);
            }
            gc.pointer_moved(1.0, 1.0);
            let summary = gc.finish(&mut view, &locations, &mut sink).unwrap();
            assert_eq!(summary.was_drag, edit_mode);
            assert!(!gc.is_active());
            assert!(!gc.frame_pending());
            assert_eq!(gc.cursor(edit_mode), idle_cursor(edit_mode));
        }
        assert_eq!(idle_cursor(false), Cursor::Grab);
        assert_eq!(idle_cursor(true), Cursor::Default);
    }

    #[test]
    fn test_finish_commits_move_left_before_frame() {
        let locations = vec![location("mill", 10.0, 20.0, None)];
        let moves = [(10.0, 0.0), (40.0, 20.0)];

        let mut view = ViewMatrix::default();
        let mut every_frame = RecordingSink::default();
        let mut gc = GestureController::new();
        gc.begin_drag(0.0, 0.0, "mill", true, &locations, InputKind::Mouse);
        for (x, y) in moves {
            gc.pointer_moved(x, y);
            gc.commit_frame(&mut view, &locations, &mut every_frame);
        }
        gc.finish(&mut view, &locations, &mut every_frame);

        let mut coalesced = RecordingSink::default();
        let mut gc = GestureController::new();
        gc.begin_drag(0.0, 0.0, "mill", true, &locations, InputKind::Mouse);
        gc.pointer_moved(moves[0].0, moves[0].1);
        gc.commit_frame(&mut view, &locations, &mut coalesced);
        // Released before the second frame fires
        gc.pointer_moved(moves[1].0, moves[1].1);
        assert!(gc.finish(&mut view, &locations, &mut coalesced).is_some());

        assert_eq!(every_frame.calls.last(), Some(&("mill".to_string(), 50.0, 40.0)));
        assert_eq!(coalesced.calls.last(), every_frame.calls.last());
    }

    #[test]
    fn test_finish_commits_pending_pan() {
        let mut view = ViewMatrix::default();
        let mut sink = RecordingSink::default();
        let mut gc = GestureController::new();
        gc.begin_pan(0.0, 0.0, &view, InputKind::Mouse);
        gc.pointer_moved(5.0, 5.0);
        gc.commit_frame(&mut view, &[], &mut sink);
        gc.pointer_moved(100.0, 50.0);
        gc.finish(&mut view, &[], &mut sink);
        assert_eq!(view.translate(), (100.0, 50.0));
        assert!(!gc.is_active());
    }

    #[test]
    fn test_abort_discards_pending_move() {
        let mut view = ViewMatrix::default();
        let mut gc = GestureController::new();
        gc.begin_pan(0.0, 0.0, &view, InputKind::Mouse);
        gc.pointer_moved(30.0, 30.0);
        assert!(gc.abort().is_some());
        let mut sink = RecordingSink::default();
        assert!(!gc.commit_frame(&mut view, &[], &mut sink));
        assert_eq!(view.translate(), (0.0, 0.0));
    }

    #[test]
    fn test_end_when_idle_is_none() {
        let mut view = ViewMatrix::default();
        let mut sink = RecordingSink::default();
        let mut gc = GestureController::new();
        assert!(gc.finish(&mut view, &[], &mut sink).is_none());
        assert!(gc.abort().is_none());
        assert!(sink.calls.is_empty());
    }

    #[test]
    fn test_moved_flag_respects_threshold() {
        let view = ViewMatrix::default();
        let mut gc = GestureController::new();
        gc.begin_pan(100.0, 100.0, &view, InputKind::Mouse);
        gc.pointer_moved(102.0, 101.0);
        assert!(!gc.abort().unwrap().moved);

        gc.begin_pan(100.0, 100.0, &view, InputKind::Mouse);
        gc.pointer_moved(110.0, 100.0);
        gc.pointer_moved(100.0, 100.0);
        assert!(gc.abort().unwrap().moved);

        gc.begin_pan(100.0, 100.0, &view, InputKind::Touch);
        gc.pointer_moved(106.0, 100.0);
        assert!(!gc.abort().unwrap().moved);
    }

    #[test]
    fn test_new_gesture_replaces_active_one() {
        let locations = vec![location("mill", 0.0, 0.0, None)];
        let view = ViewMatrix::default();
        let mut gc = GestureController::new();
        gc.begin_drag(0.0, 0.0, "mill", true, &locations, InputKind::Mouse);
        gc.pointer_moved(50.0, 50.0);
        gc.begin_pan(5.0, 5.0, &view, InputKind::Mouse);
        assert!(matches!(gc.interaction(), Some(Interaction::Pan { .. })));
        assert!(!gc.frame_pending());
    }

    #[test]
    fn test_non_finite_pointer_ignored() {
        let view = ViewMatrix::default();
        let mut gc = GestureController::new();
        assert!(!gc.begin_pan(f64::NAN, 0.0, &view, InputKind::Mouse));
        gc.begin_pan(0.0, 0.0, &view, InputKind::Mouse);
        assert!(!gc.pointer_moved(f64::INFINITY, 0.0));
        assert!(!gc.frame_pending());
    }
}
