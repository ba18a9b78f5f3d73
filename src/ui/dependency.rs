use std::collections::HashMap;

use chrono::NaiveDate;
use egui::{Painter, Stroke, Vec2};

use crate::model::{LaneKey, ScheduleTask, TimeAxis};
use crate::ui::interaction::ChartGeometry;
use crate::ui::theme;

/// One directed connector from a predecessor's end to a dependent's start.
///
/// Mixed units by design: X endpoints are percent of the timeline width,
/// Y endpoints are pixels below the header. Both are mapped to the screen
/// through the same [`ChartGeometry::to_screen`] transform when painted.
#[derive(Debug, Clone, PartialEq)]
pub struct Connector {
    pub x1: f32,
    pub y1: f32,
    pub x2: f32,
    pub y2: f32,
}

impl Connector {
    /// Orthogonal route: exit the predecessor horizontally by a small stub,
    /// turn vertically to the dependent's row, then run horizontally in.
    ///
    /// When the dependent starts at or left of the exit stub a straight run
    /// in would double back through the elbow, so the route takes a second
    /// vertical jog between the rows and approaches the dependent from its
    /// left instead.
    pub fn waypoints(&self) -> Vec<(f32, f32)> {
        let exit = self.x1 + theme::DEP_ELBOW_PERCENT;
        if self.x2 >= exit {
            return vec![
                (self.x1, self.y1),
                (exit, self.y1),
                (exit, self.y2),
                (self.x2, self.y2),
            ];
        }

        let entry = self.x2 - theme::DEP_ELBOW_PERCENT;
        let jog = if self.y1 == self.y2 {
            self.y1 + theme::LANE_HEIGHT / 2.0
        } else {
            (self.y1 + self.y2) / 2.0
        };
        vec![
            (self.x1, self.y1),
            (exit, self.y1),
            (exit, jog),
            (entry, jog),
            (entry, self.y2),
            (self.x2, self.y2),
        ]
    }
}

/// Compute connector routes for every resolvable dependency reference.
///
/// Purely a read-side projection: tasks in lanes missing from `lane_order`
/// and references to unknown task ids are skipped, never errors. No cycle
/// detection; a cycle just draws criss-crossing edges.
pub fn connector_routes(
    flat_tasks: &[(LaneKey, &ScheduleTask)],
    lane_order: &[LaneKey],
    axis: &TimeAxis,
    row_height: f32,
) -> Vec<Connector> {
    let lane_index: HashMap<LaneKey, usize> = lane_order
        .iter()
        .enumerate()
        .map(|(i, key)| (*key, i))
        .collect();

    let mut anchors: HashMap<&str, (usize, NaiveDate, NaiveDate)> = HashMap::new();
    for (key, task) in flat_tasks {
        if let Some(&index) = lane_index.get(key) {
            anchors.insert(task.id.as_str(), (index, task.start_date, task.end_date));
        }
    }

    let row_center = |index: usize| index as f32 * row_height + row_height / 2.0;

    let mut routes = Vec::new();
    for (key, task) in flat_tasks {
        let Some(&task_index) = lane_index.get(key) else {
            continue;
        };
        for dep_id in &task.dependencies {
            let Some(&(pred_index, _, pred_end)) = anchors.get(dep_id.as_str()) else {
                continue;
            };
            routes.push(Connector {
                x1: axis.position_of(pred_end),
                y1: row_center(pred_index),
                x2: axis.position_of(task.start_date),
                y2: row_center(task_index),
            });
        }
    }
    routes
}

/// Paint every connector plus an arrowhead at the dependent end.
pub fn draw_dependencies(
    painter: &Painter,
    flat_tasks: &[(LaneKey, &ScheduleTask)],
    lane_order: &[LaneKey],
    axis: &TimeAxis,
    geometry: &ChartGeometry,
) {
    let stroke = Stroke::new(1.5, theme::DEP_LINE);
    for connector in connector_routes(flat_tasks, lane_order, axis, theme::LANE_HEIGHT) {
        let points: Vec<_> = connector
            .waypoints()
            .into_iter()
            .map(|(x, y)| geometry.to_screen(x, y))
            .collect();
        for pair in points.windows(2) {
            painter.line_segment([pair[0], pair[1]], stroke);
        }

        let tip = points[points.len() - 1];
        painter.add(egui::Shape::convex_polygon(
            vec![
                tip,
                tip + Vec2::new(-6.0, -4.0),
                tip + Vec2::new(-6.0, 4.0),
            ],
            theme::DEP_LINE,
            Stroke::NONE,
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ScheduleTask;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, d).unwrap()
    }

    fn axis() -> TimeAxis {
        TimeAxis {
            view_start: date(1),
            total_days: 10,
        }
    }

    #[test]
    fn one_connector_per_resolvable_dependency() {
        // A in lane 0 ending on day 5; B in lane 2 starting day 7, after A.
        let a = ScheduleTask::new("A", date(1), date(6)); // ends 5 days in
        let mut b = ScheduleTask::new("B", date(8), date(10)); // starts 7 days in
        b.dependencies = vec![a.id.clone()];

        let order = vec![LaneKey::Unassigned, LaneKey::Category(1), LaneKey::Category(2)];
        let flat = vec![
            (LaneKey::Unassigned, &a),
            (LaneKey::Category(2), &b),
        ];

        let routes = connector_routes(&flat, &order, &axis(), 56.0);
        assert_eq!(routes.len(), 1);
        let c = &routes[0];
        assert_eq!(c.x1, axis().position_of(date(6)));
        assert_eq!(c.x2, axis().position_of(date(8)));
        assert_eq!(c.y1, 28.0); // lane row 0, vertical center
        assert_eq!(c.y2, 2.0 * 56.0 + 28.0); // lane row 2
    }

    fn assert_orthogonal(points: &[(f32, f32)]) {
        for pair in points.windows(2) {
            let horizontal = pair[0].1 == pair[1].1;
            let vertical = pair[0].0 == pair[1].0;
            assert!(
                horizontal != vertical,
                "segment {:?} -> {:?} is neither horizontal nor vertical",
                pair[0],
                pair[1],
            );
        }
    }

    #[test]
    fn waypoints_are_orthogonal() {
        let c = Connector {
            x1: 10.0,
            y1: 28.0,
            x2: 40.0,
            y2: 140.0,
        };
        let points = c.waypoints();
        // Horizontal stub out, vertical turn, horizontal run in.
        assert_eq!(points.len(), 4);
        assert_orthogonal(&points);
        assert!(points[1].0 > points[0].0);
    }

    #[test]
    fn close_dependent_routes_through_a_second_jog() {
        // B starts left of A's exit stub; a 4-point route would run its
        // final segment backwards through the elbow.
        let c = Connector {
            x1: 50.0,
            y1: 28.0,
            x2: 50.5,
            y2: 140.0,
        };
        let points = c.waypoints();
        assert_eq!(points.len(), 6);
        assert_orthogonal(&points);

        // Still exits the predecessor to the right and enters the
        // dependent from its left.
        assert!(points[1].0 > points[0].0);
        let entry = points[points.len() - 2];
        let tip = points[points.len() - 1];
        assert!(entry.0 < tip.0);
        assert_eq!(entry.1, tip.1);

        // The jog sits between the two rows.
        assert!(points[2].1 > c.y1 && points[2].1 < c.y2);
    }

    #[test]
    fn same_row_backward_edge_jogs_below_the_row() {
        let c = Connector {
            x1: 50.0,
            y1: 28.0,
            x2: 45.0,
            y2: 28.0,
        };
        let points = c.waypoints();
        assert_eq!(points.len(), 6);
        assert_orthogonal(&points);
        assert!(points[2].1 > c.y1);
    }

    #[test]
    fn unknown_lane_keys_are_skipped() {
        let a = ScheduleTask::new("A", date(1), date(2));
        let mut b = ScheduleTask::new("B", date(4), date(5));
        b.dependencies = vec![a.id.clone()];

        // Lane 9 is not in the ordering: both endpoints drop out.
        let order = vec![LaneKey::Unassigned];
        let flat = vec![(LaneKey::Category(9), &a), (LaneKey::Category(9), &b)];
        assert!(connector_routes(&flat, &order, &axis(), 56.0).is_empty());

        // Predecessor in an unknown lane: the edge has no anchor, skip it.
        let flat = vec![(LaneKey::Category(9), &a), (LaneKey::Unassigned, &b)];
        assert!(connector_routes(&flat, &order, &axis(), 56.0).is_empty());
    }

    #[test]
    fn dangling_dependency_ids_are_skipped() {
        let mut b = ScheduleTask::new("B", date(4), date(5));
        b.dependencies = vec!["no-such-task".to_string()];

        let order = vec![LaneKey::Unassigned];
        let flat = vec![(LaneKey::Unassigned, &b)];
        assert!(connector_routes(&flat, &order, &axis(), 56.0).is_empty());
    }
}
