use chrono::{Duration, NaiveDate};
use egui::{Pos2, Rect, Vec2};

use crate::model::{LaneKey, ScheduleTask};

/// Semantic effects the chart reports upward. The chart never applies these
/// itself; the owning app persists them and the next frame reflects its data.
#[derive(Debug, Clone, PartialEq)]
pub enum GanttEvent {
    /// Request to change a task's dates (from a time move or a resize).
    UpdateTask(ScheduleTask),
    /// Request to move a task to another lane.
    AssignTask {
        task_id: String,
        budget_category_id: Option<i64>,
    },
    /// Request to open the task-creation flow pre-scoped to a lane.
    AddTask { budget_category_id: Option<i64> },
    /// Request to open the edit flow for a clicked task.
    EditTask(ScheduleTask),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragMode {
    Move,
    ResizeLeft,
    ResizeRight,
}

/// One pointer-down-to-pointer-up gesture on a task visual.
///
/// Dates and lane are snapshotted at pointer-down; intermediate pointer
/// moves only update `pointer` for the visual preview. Resolution happens
/// once, when `released` is set.
#[derive(Debug, Clone)]
pub struct DragSession {
    pub task_id: String,
    pub mode: DragMode,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub budget_category_id: Option<i64>,
    pub origin: Pos2,
    pub pointer: Pos2,
    pub released: bool,
}

impl DragSession {
    pub fn delta(&self) -> Vec2 {
        self.pointer - self.origin
    }
}

/// Interaction state the orchestrator threads through every frame: the
/// active drag session plus the lane drop rectangles registered while lanes
/// render. Drop targets are resolved by hit-testing these rects at the
/// release position, not by any framework droppable state.
#[derive(Debug, Default)]
pub struct GanttState {
    pub drag: Option<DragSession>,
    lane_rects: Vec<(LaneKey, Rect)>,
    prev_lane_rects: Vec<(LaneKey, Rect)>,
}

impl GanttState {
    /// Rotate lane rects: hover feedback reads last frame's registry while
    /// this frame's is rebuilt.
    pub fn begin_frame(&mut self) {
        self.prev_lane_rects = std::mem::take(&mut self.lane_rects);
    }

    pub fn register_lane(&mut self, key: LaneKey, rect: Rect) {
        self.lane_rects.push((key, rect));
    }

    /// Drop target under `pos`, from the rects registered this frame.
    pub fn drop_lane_at(&self, pos: Pos2) -> Option<LaneKey> {
        self.lane_rects
            .iter()
            .find(|(_, rect)| rect.contains(pos))
            .map(|(key, _)| *key)
    }

    /// Lane the active move drag is hovering, for drop-target highlighting.
    pub fn hover_lane(&self) -> Option<LaneKey> {
        let session = self.drag.as_ref()?;
        if session.mode != DragMode::Move || session.released {
            return None;
        }
        self.prev_lane_rects
            .iter()
            .find(|(_, rect)| rect.contains(session.pointer))
            .map(|(key, _)| *key)
    }

    /// The active session if it belongs to `task_id`.
    pub fn dragging(&self, task_id: &str) -> Option<&DragSession> {
        self.drag.as_ref().filter(|s| s.task_id == task_id)
    }

    pub fn begin(&mut self, session: DragSession) {
        self.drag = Some(session);
    }

    /// Take the session for resolution once its gesture has ended.
    pub fn take_released(&mut self) -> Option<DragSession> {
        if self.drag.as_ref().is_some_and(|s| s.released) {
            self.drag.take()
        } else {
            None
        }
    }
}

/// Viewport geometry for one layout pass, computed once by the orchestrator
/// and passed down to every lane and task visual.
///
/// `to_screen` is the one affine transform bridging the chart's mixed units:
/// X in percent of the timeline width, Y in absolute pixels below the header.
#[derive(Debug, Clone, Copy)]
pub struct ChartGeometry {
    /// Top-left of the timeline region (right of the label gutter, below
    /// the header).
    pub origin: Pos2,
    /// Timeline region width in pixels.
    pub width: f32,
    pub total_days: i64,
}

impl ChartGeometry {
    pub fn to_screen(&self, percent_x: f32, pixel_y: f32) -> Pos2 {
        Pos2::new(
            self.origin.x + percent_x / 100.0 * self.width,
            self.origin.y + pixel_y,
        )
    }

    /// The single pixels-per-day value shared by move and resize gestures.
    pub fn pixels_per_day(&self) -> f32 {
        pixels_per_day(self.width, self.total_days)
    }
}

/// Assumed timeline width when the real one is unavailable. Degraded but
/// non-fatal; the fallback is logged so it cannot mask a layout bug.
pub const FALLBACK_WIDTH: f32 = 1000.0;

pub fn pixels_per_day(container_width: f32, total_days: i64) -> f32 {
    let width = if container_width > 0.0 {
        container_width
    } else {
        tracing::warn!(
            "timeline width unavailable ({container_width}px), assuming {FALLBACK_WIDTH}px"
        );
        FALLBACK_WIDTH
    };
    width / total_days.max(1) as f32
}

/// Convert a horizontal pixel delta into whole days, rounding to nearest.
pub fn days_from_delta(delta_x: f32, pixels_per_day: f32) -> i64 {
    (delta_x / pixels_per_day).round() as i64
}

/// Apply a resize of `days` to the snapshotted range. Returns `None` when
/// the result would invert `start <= end`; the gesture then commits nothing
/// and the bar snaps back.
pub fn resolve_resize(
    mode: DragMode,
    start: NaiveDate,
    end: NaiveDate,
    days: i64,
) -> Option<(NaiveDate, NaiveDate)> {
    match mode {
        DragMode::ResizeLeft => {
            let new_start = start + Duration::days(days);
            (new_start <= end).then_some((new_start, end))
        }
        DragMode::ResizeRight => {
            let new_end = end + Duration::days(days);
            (new_end >= start).then_some((start, new_end))
        }
        DragMode::Move => Some((start + Duration::days(days), end + Duration::days(days))),
    }
}

/// Resolve a completed move drag into events. A single gesture may produce a
/// time move, a lane reassignment, both, or neither; the two effects are
/// independent and the dates reported are never altered by the lane change.
///
/// An unrecognized drop target (`None`) keeps the current lane while any
/// time move from the same gesture still applies.
pub fn resolve_drop(
    task: &ScheduleTask,
    session: &DragSession,
    drop_lane: Option<LaneKey>,
    days_shifted: i64,
) -> Vec<GanttEvent> {
    let mut events = Vec::new();

    if days_shifted != 0 {
        let mut moved = task.clone();
        moved.start_date = session.start_date + Duration::days(days_shifted);
        moved.end_date = session.end_date + Duration::days(days_shifted);
        events.push(GanttEvent::UpdateTask(moved));
    }

    let resolved = match drop_lane {
        Some(key) => key.category_id(),
        None => task.budget_category_id,
    };
    if resolved != task.budget_category_id {
        events.push(GanttEvent::AssignTask {
            task_id: task.id.clone(),
            budget_category_id: resolved,
        });
    }

    events
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ScheduleTask;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, d).unwrap()
    }

    fn session_for(task: &ScheduleTask, mode: DragMode) -> DragSession {
        DragSession {
            task_id: task.id.clone(),
            mode,
            start_date: task.start_date,
            end_date: task.end_date,
            budget_category_id: task.budget_category_id,
            origin: Pos2::ZERO,
            pointer: Pos2::ZERO,
            released: true,
        }
    }

    #[test]
    fn resize_never_inverts_the_range() {
        let start = date(5);
        let end = date(10);

        // Valid shrink from the right.
        assert_eq!(
            resolve_resize(DragMode::ResizeRight, start, end, -3),
            Some((start, date(7)))
        );
        // Right edge dragged past the start: discarded.
        assert_eq!(resolve_resize(DragMode::ResizeRight, start, end, -6), None);
        // Collapse to a single day is still valid.
        assert_eq!(
            resolve_resize(DragMode::ResizeRight, start, end, -5),
            Some((start, start))
        );
        // Left edge dragged past the end: discarded.
        assert_eq!(resolve_resize(DragMode::ResizeLeft, start, end, 6), None);
        assert_eq!(
            resolve_resize(DragMode::ResizeLeft, start, end, 2),
            Some((date(7), end))
        );
    }

    #[test]
    fn dropping_in_place_emits_nothing() {
        let mut task = ScheduleTask::new("Rough-in wiring", date(5), date(10));
        task.budget_category_id = Some(3);
        let session = session_for(&task, DragMode::Move);

        let events = resolve_drop(&task, &session, Some(LaneKey::Category(3)), 0);
        assert!(events.is_empty());
    }

    #[test]
    fn combined_gesture_fires_both_independent_events() {
        // March scenario: T1 spans the 5th to the 10th in the unassigned lane,
        // dragged +3 days onto category 7.
        let task = ScheduleTask::new("T1", date(5), date(10));
        let session = session_for(&task, DragMode::Move);

        let events = resolve_drop(&task, &session, Some(LaneKey::Category(7)), 3);
        assert_eq!(events.len(), 2);

        let GanttEvent::UpdateTask(moved) = &events[0] else {
            panic!("expected a date update first");
        };
        assert_eq!(moved.start_date, date(8));
        assert_eq!(moved.end_date, date(13));

        assert_eq!(
            events[1],
            GanttEvent::AssignTask {
                task_id: task.id.clone(),
                budget_category_id: Some(7),
            }
        );
    }

    #[test]
    fn time_move_alone_keeps_the_lane() {
        let mut task = ScheduleTask::new("Frame walls", date(5), date(10));
        task.budget_category_id = Some(7);
        let session = session_for(&task, DragMode::Move);

        let events = resolve_drop(&task, &session, Some(LaneKey::Category(7)), -2);
        assert_eq!(events.len(), 1);
        let GanttEvent::UpdateTask(moved) = &events[0] else {
            panic!("expected a date update");
        };
        assert_eq!(moved.start_date, date(3));
        assert_eq!(moved.budget_category_id, Some(7));
    }

    #[test]
    fn unresolved_drop_target_still_applies_the_time_move() {
        let mut task = ScheduleTask::new("Roof trusses", date(5), date(10));
        task.budget_category_id = Some(7);
        let session = session_for(&task, DragMode::Move);

        // Dropped outside every registered lane: no lane change, dates move.
        let events = resolve_drop(&task, &session, None, 1);
        assert_eq!(events.len(), 1);
        assert!(matches!(events[0], GanttEvent::UpdateTask(_)));
    }

    #[test]
    fn drop_on_unassigned_clears_the_category() {
        let mut task = ScheduleTask::new("Punch list", date(5), date(10));
        task.budget_category_id = Some(3);
        let session = session_for(&task, DragMode::Move);

        let events = resolve_drop(&task, &session, Some(LaneKey::Unassigned), 0);
        assert_eq!(
            events,
            vec![GanttEvent::AssignTask {
                task_id: task.id.clone(),
                budget_category_id: None,
            }]
        );
    }

    #[test]
    fn pixel_deltas_round_to_whole_days() {
        let ppd = pixels_per_day(930.0, 31);
        assert_eq!(ppd, 30.0);
        assert_eq!(days_from_delta(90.0, ppd), 3);
        assert_eq!(days_from_delta(-44.0, ppd), -1);
        assert_eq!(days_from_delta(14.0, ppd), 0);
    }

    #[test]
    fn missing_width_falls_back_instead_of_failing() {
        assert_eq!(pixels_per_day(0.0, 10), FALLBACK_WIDTH / 10.0);
        assert_eq!(pixels_per_day(-5.0, 10), FALLBACK_WIDTH / 10.0);
    }

    #[test]
    fn drop_lane_resolution_hit_tests_registered_rects() {
        let mut state = GanttState::default();
        state.begin_frame();
        let row = |i: f32| {
            Rect::from_min_size(Pos2::new(0.0, i * 56.0), Vec2::new(800.0, 56.0))
        };
        state.register_lane(LaneKey::Unassigned, row(0.0));
        state.register_lane(LaneKey::Category(7), row(1.0));

        assert_eq!(state.drop_lane_at(Pos2::new(400.0, 28.0)), Some(LaneKey::Unassigned));
        assert_eq!(
            state.drop_lane_at(Pos2::new(400.0, 80.0)),
            Some(LaneKey::Category(7))
        );
        assert_eq!(state.drop_lane_at(Pos2::new(400.0, 500.0)), None);
    }

    #[test]
    fn released_sessions_are_taken_exactly_once() {
        let mut state = GanttState::default();
        let task = ScheduleTask::new("T", date(1), date(2));
        let mut session = session_for(&task, DragMode::Move);
        session.released = false;
        state.begin(session);

        assert!(state.take_released().is_none());
        state.drag.as_mut().unwrap().released = true;
        assert!(state.take_released().is_some());
        assert!(state.take_released().is_none());
    }
}
