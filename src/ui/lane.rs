use chrono::Datelike;
use egui::{Painter, Pos2, Rect, RichText, Stroke, Ui, Vec2};

use crate::model::{LaneKey, SchedulePayload, TimeAxis};
use crate::ui::interaction::{ChartGeometry, GanttEvent, GanttState};
use crate::ui::{task_visual, theme};

/// Render one swim lane: label gutter, day grid, task visuals, drop-target
/// registration and hover feedback.
pub fn show_lane(
    ui: &mut Ui,
    painter: &Painter,
    payload: &SchedulePayload,
    key: LaneKey,
    lane_index: usize,
    axis: &TimeAxis,
    geometry: &ChartGeometry,
    state: &mut GanttState,
    events: &mut Vec<GanttEvent>,
) {
    let top = geometry.origin.y + lane_index as f32 * theme::LANE_HEIGHT;
    let timeline_rect = Rect::from_min_size(
        Pos2::new(geometry.origin.x, top),
        Vec2::new(geometry.width, theme::LANE_HEIGHT),
    );
    let label_rect = Rect::from_min_size(
        Pos2::new(geometry.origin.x - theme::LABEL_WIDTH, top),
        Vec2::new(theme::LABEL_WIDTH, theme::LANE_HEIGHT),
    );

    // Drop-target feedback is read against last frame's registry, then the
    // full row is registered for this frame's hit test.
    let hovered = state.hover_lane() == Some(key);
    state.register_lane(key, label_rect.union(timeline_rect));

    if lane_index % 2 == 1 {
        painter.rect_filled(timeline_rect, 0.0, theme::BG_LANE_ALT);
    }

    draw_day_grid(painter, timeline_rect, axis, geometry);

    if hovered {
        painter.rect_filled(timeline_rect, 0.0, theme::DROP_HIGHLIGHT);
        painter.rect_stroke(timeline_rect.shrink(1.0), 0.0, Stroke::new(1.0, theme::ACCENT));
    }

    painter.line_segment(
        [
            Pos2::new(label_rect.left(), top + theme::LANE_HEIGHT),
            Pos2::new(timeline_rect.right(), top + theme::LANE_HEIGHT),
        ],
        Stroke::new(0.5, theme::BORDER_SUBTLE),
    );

    draw_label(ui, painter, payload, key, label_rect, events);

    for task in payload.lane_tasks(key) {
        if !axis.is_visible(task.start_date, task.end_date) {
            continue;
        }
        task_visual::show_task(ui, painter, task, lane_index, axis, geometry, state, events);
    }
}

/// Background day grid across the full window, weekends shaded.
fn draw_day_grid(painter: &Painter, lane_rect: Rect, axis: &TimeAxis, geometry: &ChartGeometry) {
    for day in 0..axis.total_days {
        let date = axis.view_start + chrono::Duration::days(day);
        let x = geometry
            .to_screen(axis.position_of(date), 0.0)
            .x;

        if date.weekday().num_days_from_monday() >= 5 {
            let next_x = geometry
                .to_screen(axis.position_of(date + chrono::Duration::days(1)), 0.0)
                .x;
            painter.rect_filled(
                Rect::from_min_max(
                    Pos2::new(x, lane_rect.top()),
                    Pos2::new(next_x, lane_rect.bottom()),
                ),
                0.0,
                theme::WEEKEND_SHADE,
            );
        }

        painter.line_segment(
            [
                Pos2::new(x, lane_rect.top()),
                Pos2::new(x, lane_rect.bottom()),
            ],
            Stroke::new(0.5, theme::GRID_LINE),
        );
    }
}

fn draw_label(
    ui: &mut Ui,
    painter: &Painter,
    payload: &SchedulePayload,
    key: LaneKey,
    label_rect: Rect,
    events: &mut Vec<GanttEvent>,
) {
    painter.rect_filled(label_rect, 0.0, theme::BG_LABEL_GUTTER);
    painter.line_segment(
        [label_rect.right_top(), label_rect.right_bottom()],
        Stroke::new(1.0, theme::BORDER_SUBTLE),
    );

    let (name, sub) = match key {
        LaneKey::Unassigned => (
            "Unassigned".to_string(),
            format!("{} tasks", payload.lane_tasks(key).len()),
        ),
        LaneKey::Category(id) => match payload.category(id) {
            Some(category) => (
                category.category_name.clone(),
                format_amount(category.amount),
            ),
            None => (format!("Category {id}"), String::new()),
        },
    };

    painter.text(
        Pos2::new(label_rect.left() + 10.0, label_rect.center().y - 8.0),
        egui::Align2::LEFT_CENTER,
        name,
        theme::font_lane(),
        theme::TEXT_PRIMARY,
    );
    if !sub.is_empty() {
        painter.text(
            Pos2::new(label_rect.left() + 10.0, label_rect.center().y + 9.0),
            egui::Align2::LEFT_CENTER,
            sub,
            theme::font_sub(),
            theme::TEXT_DIM,
        );
    }

    // Add-task affordance: reports the lane's category id upward, nothing more.
    let button_rect = Rect::from_center_size(
        Pos2::new(label_rect.right() - 16.0, label_rect.center().y),
        Vec2::splat(20.0),
    );
    let add = ui.put(
        button_rect,
        egui::Button::new(RichText::new(egui_phosphor::regular::PLUS).size(12.0)).frame(false),
    );
    if add.on_hover_text("Add task to this lane").clicked() {
        events.push(GanttEvent::AddTask {
            budget_category_id: key.category_id(),
        });
    }
}

fn format_amount(amount: f64) -> String {
    let whole = amount.round() as i64;
    let mut digits = whole.abs().to_string();
    let mut grouped = String::new();
    while digits.len() > 3 {
        let tail = digits.split_off(digits.len() - 3);
        grouped = if grouped.is_empty() {
            tail
        } else {
            format!("{tail},{grouped}")
        };
    }
    grouped = if grouped.is_empty() {
        digits
    } else {
        format!("{digits},{grouped}")
    };
    if whole < 0 {
        format!("-${grouped}")
    } else {
        format!("${grouped}")
    }
}

#[cfg(test)]
mod tests {
    use super::format_amount;

    #[test]
    fn amounts_group_thousands() {
        assert_eq!(format_amount(0.0), "$0");
        assert_eq!(format_amount(850.0), "$850");
        assert_eq!(format_amount(85_500.0), "$85,500");
        assert_eq!(format_amount(1_250_000.0), "$1,250,000");
        assert_eq!(format_amount(-4_200.0), "-$4,200");
    }
}
