use egui::{Color32, Painter, Pos2, Rect, Rounding, Sense, Stroke, Ui, Vec2};

use crate::model::{ScheduleTask, TimeAxis};
use crate::ui::interaction::{
    days_from_delta, ChartGeometry, DragMode, DragSession, GanttEvent, GanttState,
};
use crate::ui::theme;

/// Render one task bar or milestone inside its lane row and wire up its
/// click / drag / resize interactions.
///
/// Intermediate pointer moves only update the session for the visual
/// preview; nothing is committed until the orchestrator resolves the
/// released session.
pub fn show_task(
    ui: &mut Ui,
    painter: &Painter,
    task: &ScheduleTask,
    lane_index: usize,
    axis: &TimeAxis,
    geometry: &ChartGeometry,
    state: &mut GanttState,
    events: &mut Vec<GanttEvent>,
) {
    // Day-snapped resize preview, raw pixel offset for a move.
    let mut draw_start = task.start_date;
    let mut draw_end = task.end_date;
    let mut offset = Vec2::ZERO;
    if let Some(session) = state.dragging(&task.id) {
        let days = days_from_delta(session.delta().x, geometry.pixels_per_day());
        match session.mode {
            DragMode::Move => offset = session.delta(),
            DragMode::ResizeLeft => draw_start = session.start_date + chrono::Duration::days(days),
            DragMode::ResizeRight => draw_end = session.end_date + chrono::Duration::days(days),
        }
    }

    let lane_top = lane_index as f32 * theme::LANE_HEIGHT;

    if task.is_milestone {
        let center = geometry.to_screen(
            axis.position_of(draw_start),
            lane_top + theme::LANE_HEIGHT / 2.0,
        ) + offset;
        let hit_rect = draw_milestone(painter, center, task);
        interact_bar(ui, hit_rect.expand(4.0), task, None, state, events);
        return;
    }

    // Clip partially visible bars at the window edges.
    let left_pct = axis.position_of(draw_start).max(0.0);
    let right_pct = (axis.position_of(draw_start) + axis.width_of(draw_start, draw_end)).min(100.0);
    let min = geometry.to_screen(left_pct, lane_top + theme::BAR_INSET);
    let max_x = geometry.to_screen(right_pct, 0.0).x;
    let bar_rect = Rect::from_min_size(
        min,
        Vec2::new(
            (max_x - min.x).max(6.0),
            theme::LANE_HEIGHT - theme::BAR_INSET * 2.0,
        ),
    )
    .translate(offset);

    draw_bar(painter, bar_rect, task);

    let bar_hovered = interact_bar(ui, bar_rect, task, Some((draw_start, draw_end)), state, events);

    let left_handle = Rect::from_min_max(
        Pos2::new(bar_rect.left() - theme::HANDLE_WIDTH * 0.5, bar_rect.top()),
        Pos2::new(bar_rect.left() + theme::HANDLE_WIDTH * 0.5, bar_rect.bottom()),
    );
    let right_handle = Rect::from_min_max(
        Pos2::new(bar_rect.right() - theme::HANDLE_WIDTH * 0.5, bar_rect.top()),
        Pos2::new(bar_rect.right() + theme::HANDLE_WIDTH * 0.5, bar_rect.bottom()),
    );

    let left_response = ui.interact(
        left_handle.expand(4.0),
        ui.make_persistent_id(("task-resize-left", task.id.as_str())),
        Sense::drag(),
    );
    let right_response = ui.interact(
        right_handle.expand(4.0),
        ui.make_persistent_id(("task-resize-right", task.id.as_str())),
        Sense::drag(),
    );

    track_gesture(&left_response, task, DragMode::ResizeLeft, state);
    track_gesture(&right_response, task, DragMode::ResizeRight, state);
    if left_response.dragged() || right_response.dragged() {
        ui.ctx().set_cursor_icon(egui::CursorIcon::ResizeHorizontal);
    }

    let hovered_handles = left_response.hovered() || right_response.hovered();

    // Edge handles, revealed on hover.
    if bar_hovered || hovered_handles {
        if hovered_handles {
            ui.ctx().set_cursor_icon(egui::CursorIcon::ResizeHorizontal);
        }
        let handle_h = bar_rect.height() * 0.55;
        let handle_y = bar_rect.center().y - handle_h / 2.0;
        let lh = Rect::from_min_size(
            Pos2::new(bar_rect.left() - 1.5, handle_y),
            Vec2::new(4.0, handle_h),
        );
        let rh = Rect::from_min_size(
            Pos2::new(bar_rect.right() - 2.5, handle_y),
            Vec2::new(4.0, handle_h),
        );
        painter.rect_filled(lh, Rounding::same(2.0), theme::HANDLE_COLOR);
        painter.rect_filled(rh, Rounding::same(2.0), theme::HANDLE_COLOR);
    }
}

/// Wire up click-to-edit and whole-element move on `rect`. Returns whether
/// the element is hovered. `resize_preview` carries the dates shown in the
/// tooltip so a resize in progress reads correctly.
fn interact_bar(
    ui: &mut Ui,
    rect: Rect,
    task: &ScheduleTask,
    resize_preview: Option<(chrono::NaiveDate, chrono::NaiveDate)>,
    state: &mut GanttState,
    events: &mut Vec<GanttEvent>,
) -> bool {
    let response = ui.interact(
        rect,
        ui.make_persistent_id(("task-bar", task.id.as_str())),
        Sense::click_and_drag(),
    );

    // A plain click (no drag in progress) opens the edit flow.
    if response.clicked() {
        events.push(GanttEvent::EditTask(task.clone()));
    }

    track_gesture(&response, task, DragMode::Move, state);
    if response.dragged() {
        ui.ctx().set_cursor_icon(egui::CursorIcon::Grab);
    } else if response.hovered() {
        ui.ctx().set_cursor_icon(egui::CursorIcon::PointingHand);
    }

    if response.hovered() {
        let (start, end) = resize_preview.unwrap_or((task.start_date, task.end_date));
        egui::show_tooltip_at_pointer(
            ui.ctx(),
            ui.layer_id(),
            egui::Id::new(("task-tip", task.id.as_str())),
            |ui| {
                ui.strong(&task.task_name);
                if task.is_milestone {
                    ui.label(start.format("%d/%m/%Y").to_string());
                } else {
                    ui.label(format!(
                        "{} → {}",
                        start.format("%d/%m/%Y"),
                        end.format("%d/%m/%Y"),
                    ));
                }
                ui.label(format!("{} · {}%", task.status.label(), task.progress));
            },
        );
    }

    response.hovered()
}

/// Map one egui response onto the drag session lifecycle for `mode`.
fn track_gesture(
    response: &egui::Response,
    task: &ScheduleTask,
    mode: DragMode,
    state: &mut GanttState,
) {
    if response.drag_started() {
        let pointer = response
            .interact_pointer_pos()
            .unwrap_or_else(|| response.rect.center());
        state.begin(DragSession {
            task_id: task.id.clone(),
            mode,
            start_date: task.start_date,
            end_date: task.end_date,
            budget_category_id: task.budget_category_id,
            origin: pointer,
            pointer,
            released: false,
        });
    }

    let is_mine = |s: &&mut DragSession| s.task_id == task.id && s.mode == mode;
    if response.dragged() {
        if let Some(session) = state.drag.as_mut().filter(is_mine) {
            if let Some(pointer) = response.interact_pointer_pos() {
                session.pointer = pointer;
            }
        }
    }
    if response.drag_stopped() {
        if let Some(session) = state.drag.as_mut().filter(is_mine) {
            if let Some(pointer) = response.interact_pointer_pos() {
                session.pointer = pointer;
            }
            session.released = true;
        }
    }
}

fn draw_bar(painter: &Painter, bar_rect: Rect, task: &ScheduleTask) {
    let rounding = Rounding::same(theme::BAR_ROUNDING);
    let fill = theme::status_color(task.status);

    // Soft shadow under the bar.
    painter.rect_filled(
        bar_rect.translate(Vec2::new(1.0, 2.0)),
        rounding,
        Color32::from_black_alpha(35),
    );
    painter.rect_filled(bar_rect, rounding, fill);

    // Lighter top highlight.
    painter.rect_filled(
        Rect::from_min_size(
            bar_rect.min,
            Vec2::new(bar_rect.width(), (bar_rect.height() * 0.45).max(4.0)),
        ),
        Rounding {
            nw: theme::BAR_ROUNDING,
            ne: theme::BAR_ROUNDING,
            sw: 0.0,
            se: 0.0,
        },
        Color32::from_white_alpha(25),
    );

    // Inset progress fill.
    if task.progress > 0 {
        let progress_width = bar_rect.width() * (task.progress.min(100) as f32 / 100.0);
        painter.rect_filled(
            Rect::from_min_size(bar_rect.min, Vec2::new(progress_width, bar_rect.height())),
            rounding,
            theme::PROGRESS_OVERLAY,
        );
        if task.progress < 98 {
            let tick_x = bar_rect.left() + progress_width;
            painter.line_segment(
                [
                    Pos2::new(tick_x, bar_rect.top() + 2.0),
                    Pos2::new(tick_x, bar_rect.bottom() - 2.0),
                ],
                Stroke::new(1.0, Color32::from_white_alpha(60)),
            );
        }
    }

    // Task name, clipped to the bar.
    if bar_rect.width() > 30.0 {
        let galley = painter.layout_no_wrap(
            task.task_name.clone(),
            theme::font_bar(),
            theme::TEXT_ON_BAR,
        );
        let clipped = painter.with_clip_rect(bar_rect);
        let text_y = bar_rect.top() + (bar_rect.height() - galley.size().y) / 2.0;
        clipped.galley(
            Pos2::new(bar_rect.left() + 6.0, text_y),
            galley,
            Color32::TRANSPARENT,
        );
    }
}

/// Fixed-size rotated square, independent of duration. Returns the hit rect.
fn draw_milestone(painter: &Painter, center: Pos2, task: &ScheduleTask) -> Rect {
    let size = theme::MILESTONE_SIZE;
    let fill = theme::status_color(task.status);

    let shadow_offset = Vec2::new(1.0, 1.5);
    painter.add(egui::Shape::convex_polygon(
        vec![
            center + shadow_offset + Vec2::new(0.0, -size),
            center + shadow_offset + Vec2::new(size, 0.0),
            center + shadow_offset + Vec2::new(0.0, size),
            center + shadow_offset + Vec2::new(-size, 0.0),
        ],
        Color32::from_black_alpha(40),
        Stroke::NONE,
    ));
    painter.add(egui::Shape::convex_polygon(
        vec![
            Pos2::new(center.x, center.y - size),
            Pos2::new(center.x + size, center.y),
            Pos2::new(center.x, center.y + size),
            Pos2::new(center.x - size, center.y),
        ],
        fill,
        Stroke::NONE,
    ));

    painter.text(
        Pos2::new(center.x + size + 6.0, center.y),
        egui::Align2::LEFT_CENTER,
        &task.task_name,
        theme::font_bar(),
        theme::TEXT_SECONDARY,
    );

    Rect::from_center_size(center, Vec2::splat(size * 2.0 + 2.0))
}
