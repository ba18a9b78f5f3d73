use chrono::Datelike;
use egui::{Pos2, Rect, RichText, Rounding, Sense, Stroke, Ui, Vec2};

use crate::model::{SchedulePayload, TimeAxis, ViewWindow, ZoomLevel};
use crate::ui::interaction::{
    days_from_delta, resolve_drop, resolve_resize, ChartGeometry, DragMode, GanttEvent, GanttState,
};
use crate::ui::{dependency, lane, theme};

/// Render the swim-lane Gantt: navigation strip, timeline header, one lane
/// per budget category (unassigned first), the dependency overlay and the
/// today marker.
///
/// The chart reads `payload` only; every change a gesture produces is
/// returned as a [`GanttEvent`] for the caller to apply and persist.
pub fn show_swimlane_gantt(
    payload: &SchedulePayload,
    window: &mut ViewWindow,
    state: &mut GanttState,
    ui: &mut Ui,
) -> Vec<GanttEvent> {
    let mut events = Vec::new();

    show_nav_strip(window, ui);

    let axis = window.axis();
    let lane_order = payload.lane_order();
    let lanes_height = lane_order.len() as f32 * theme::LANE_HEIGHT;
    let chart_height = theme::HEADER_HEIGHT + lanes_height + 20.0;

    egui::ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui| {
            let available = ui.available_size();
            let (response, painter) = ui.allocate_painter(
                Vec2::new(available.x, chart_height.max(available.y)),
                Sense::hover(),
            );
            let origin = response.rect.min;

            // Viewport geometry for this layout pass; every lane, task
            // visual and dependency edge maps through it.
            let geometry = ChartGeometry {
                origin: Pos2::new(
                    origin.x + theme::LABEL_WIDTH,
                    origin.y + theme::HEADER_HEIGHT,
                ),
                width: (available.x - theme::LABEL_WIDTH).max(0.0),
                total_days: axis.total_days,
            };

            state.begin_frame();
            painter.rect_filled(response.rect, 0.0, theme::BG_DARK);

            for (index, key) in lane_order.iter().enumerate() {
                lane::show_lane(
                    ui, &painter, payload, *key, index, &axis, &geometry, state, &mut events,
                );
            }

            let flat = payload.flat_tasks();
            dependency::draw_dependencies(&painter, &flat, &lane_order, &axis, &geometry);

            draw_header(&painter, origin, available.x, &axis, window.zoom, &geometry);
            draw_today_line(&painter, &axis, &geometry, lanes_height);

            // A gesture resolves exactly once, after every lane rect for
            // this frame has been registered.
            if let Some(session) = state.take_released() {
                if let Some(task) = payload.find_task(&session.task_id) {
                    let days = days_from_delta(session.delta().x, geometry.pixels_per_day());
                    match session.mode {
                        DragMode::Move => {
                            let drop_lane = state.drop_lane_at(session.pointer);
                            events.extend(resolve_drop(task, &session, drop_lane, days));
                        }
                        DragMode::ResizeLeft | DragMode::ResizeRight => {
                            if days != 0 {
                                if let Some((start, end)) = resolve_resize(
                                    session.mode,
                                    session.start_date,
                                    session.end_date,
                                    days,
                                ) {
                                    let mut updated = task.clone();
                                    updated.start_date = start;
                                    updated.end_date = end;
                                    events.push(GanttEvent::UpdateTask(updated));
                                }
                            }
                        }
                    }
                }
            }
        });

    events
}

fn show_nav_strip(window: &mut ViewWindow, ui: &mut Ui) {
    ui.horizontal(|ui| {
        if ui
            .button(RichText::new(egui_phosphor::regular::CARET_LEFT))
            .on_hover_text("Previous month")
            .clicked()
        {
            window.prev_month();
        }
        if ui.button("Today").clicked() {
            window.jump_to_today();
        }
        if ui
            .button(RichText::new(egui_phosphor::regular::CARET_RIGHT))
            .on_hover_text("Next month")
            .clicked()
        {
            window.next_month();
        }

        let last_visible = window.view_end() - chrono::Duration::days(1);
        ui.label(
            RichText::new(format!(
                "{} – {}",
                window.view_start().format("%d %b %Y"),
                last_visible.format("%d %b %Y"),
            ))
            .color(theme::TEXT_SECONDARY),
        );

        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            for zoom in ZoomLevel::ALL.iter().rev() {
                ui.selectable_value(&mut window.zoom, *zoom, zoom.label());
            }
            ui.label(RichText::new("Zoom").size(10.5).color(theme::TEXT_DIM));
        });
    });
    ui.add_space(2.0);
}

/// Timeline header: month labels on top, tick labels at the zoom's step.
fn draw_header(
    painter: &egui::Painter,
    origin: Pos2,
    width: f32,
    axis: &TimeAxis,
    zoom: ZoomLevel,
    geometry: &ChartGeometry,
) {
    painter.rect_filled(
        Rect::from_min_size(origin, Vec2::new(width, theme::HEADER_HEIGHT)),
        0.0,
        theme::BG_HEADER,
    );
    painter.line_segment(
        [
            Pos2::new(origin.x, origin.y + theme::HEADER_HEIGHT),
            Pos2::new(origin.x + width, origin.y + theme::HEADER_HEIGHT),
        ],
        Stroke::new(1.0, theme::BORDER_SUBTLE),
    );

    let step = zoom.tick_step_days();
    let month_ticks = month_label_ticks(axis.view_start, axis.total_days, step);
    let mut day = 0;
    while day < axis.total_days {
        let date = axis.view_start + chrono::Duration::days(day);
        let x = geometry.to_screen(axis.position_of(date), 0.0).x;

        painter.line_segment(
            [
                Pos2::new(x, origin.y + theme::HEADER_HEIGHT - 6.0),
                Pos2::new(x, origin.y + theme::HEADER_HEIGHT),
            ],
            Stroke::new(0.5, theme::GRID_LINE),
        );

        let is_weekend = date.weekday().num_days_from_monday() >= 5;
        let tick_color = if is_weekend {
            theme::TEXT_DIM
        } else {
            theme::TEXT_SECONDARY
        };
        painter.text(
            Pos2::new(x + 3.0, origin.y + 28.0),
            egui::Align2::LEFT_CENTER,
            date.format("%d %b").to_string(),
            theme::font_sub(),
            tick_color,
        );

        if month_ticks.contains(&day) {
            painter.text(
                Pos2::new(x + 3.0, origin.y + 12.0),
                egui::Align2::LEFT_CENTER,
                date.format("%b %Y").to_string(),
                theme::font_header(),
                theme::TEXT_PRIMARY,
            );
        }

        day += step;
    }
}

/// Tick offsets that carry a month label: the window's first tick, then the
/// first tick on or after each later month boundary. At weekly tick steps a
/// month's boundary rarely lands on a tick, so labeling only exact firsts
/// would leave most months unlabeled.
fn month_label_ticks(view_start: chrono::NaiveDate, total_days: i64, step: i64) -> Vec<i64> {
    let mut ticks = Vec::new();
    let mut labeled = None;
    let mut day = 0;
    while day < total_days {
        let date = view_start + chrono::Duration::days(day);
        let month = (date.year(), date.month());
        if labeled != Some(month) {
            ticks.push(day);
            labeled = Some(month);
        }
        day += step;
    }
    ticks
}

/// Today's date as a vertical marker, positioned like any task boundary and
/// drawn only when it falls inside the window.
fn draw_today_line(
    painter: &egui::Painter,
    axis: &TimeAxis,
    geometry: &ChartGeometry,
    lanes_height: f32,
) {
    let today = chrono::Local::now().date_naive();
    let percent = axis.position_of(today);
    if !(0.0..=100.0).contains(&percent) {
        return;
    }

    let top = geometry.to_screen(percent, 0.0);
    painter.line_segment(
        [top, Pos2::new(top.x, top.y + lanes_height)],
        Stroke::new(1.5, theme::TODAY_LINE),
    );

    let badge_w = 42.0;
    let badge_rect = Rect::from_min_size(
        Pos2::new(top.x - badge_w / 2.0, top.y - 1.0),
        Vec2::new(badge_w, 14.0),
    );
    painter.rect_filled(badge_rect, Rounding::same(3.0), theme::TODAY_LINE);
    painter.text(
        badge_rect.center(),
        egui::Align2::CENTER_CENTER,
        "Today",
        theme::font_small(),
        egui::Color32::WHITE,
    );
}

#[cfg(test)]
mod tests {
    use super::month_label_ticks;
    use chrono::NaiveDate;

    #[test]
    fn every_month_in_a_quarter_window_gets_a_label_tick() {
        // Quarter view over March, with weekly ticks. April and May start
        // between ticks (days 31 and 61), so their labels land on the next
        // tick after each boundary.
        let start = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        assert_eq!(month_label_ticks(start, 90, 7), vec![0, 35, 63]);
    }

    #[test]
    fn daily_ticks_label_month_firsts_exactly() {
        let start = NaiveDate::from_ymd_opt(2024, 3, 25).unwrap();
        // Window start, then April 1st itself (7 days in).
        assert_eq!(month_label_ticks(start, 30, 1), vec![0, 7]);
    }

    #[test]
    fn one_label_per_month_even_when_the_window_starts_mid_month() {
        let start = NaiveDate::from_ymd_opt(2024, 1, 20).unwrap();
        let ticks = month_label_ticks(start, 30, 7);
        // Jan label at the window start, Feb label at the first tick in
        // February; nothing repeats.
        assert_eq!(ticks, vec![0, 14]);
    }
}
