use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Presentational status of a task; drives the bar fill color only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    NotStarted,
    InProgress,
    Completed,
    OnHold,
}

impl TaskStatus {
    pub const ALL: [TaskStatus; 4] = [
        TaskStatus::NotStarted,
        TaskStatus::InProgress,
        TaskStatus::Completed,
        TaskStatus::OnHold,
    ];

    pub fn label(self) -> &'static str {
        match self {
            TaskStatus::NotStarted => "Not started",
            TaskStatus::InProgress => "In progress",
            TaskStatus::Completed => "Completed",
            TaskStatus::OnHold => "On hold",
        }
    }
}

/// A single task or milestone on the schedule.
///
/// Tasks are supplied by the caller on every frame; the chart never stores or
/// mutates them. Date changes and lane reassignments are reported upward as
/// events and show up here only once the caller applies them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleTask {
    /// Opaque, stable identifier.
    pub id: String,
    pub task_name: String,
    /// Inclusive date range; `start_date <= end_date` always holds.
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    /// `None` means the task sits in the unassigned lane.
    pub budget_category_id: Option<i64>,
    pub status: TaskStatus,
    /// Percent complete, 0–100.
    pub progress: u8,
    /// Milestones render as a fixed-size diamond and cannot be resized.
    pub is_milestone: bool,
    /// Ids of predecessor tasks drawn as incoming connector edges.
    #[serde(default)]
    pub dependencies: Vec<String>,
}

impl ScheduleTask {
    pub fn new(name: impl Into<String>, start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            task_name: name.into(),
            start_date: start,
            end_date: end.max(start),
            budget_category_id: None,
            status: TaskStatus::NotStarted,
            progress: 0,
            is_milestone: false,
            dependencies: Vec::new(),
        }
    }

    pub fn new_milestone(name: impl Into<String>, date: NaiveDate) -> Self {
        Self {
            is_milestone: true,
            ..Self::new(name, date, date)
        }
    }

    /// Inclusive duration in days (a one-day task spans 1).
    pub fn duration_days(&self) -> i64 {
        (self.end_date - self.start_date).num_days() + 1
    }

    /// Copy of this task with both dates shifted by `days`.
    pub fn shifted_by(&self, days: i64) -> Self {
        let mut shifted = self.clone();
        shifted.start_date += chrono::Duration::days(days);
        shifted.end_date += chrono::Duration::days(days);
        shifted
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn duration_is_end_inclusive() {
        let task = ScheduleTask::new("Pour footings", date(2024, 3, 5), date(2024, 3, 10));
        assert_eq!(task.duration_days(), 6);
    }

    #[test]
    fn milestone_spans_a_single_day() {
        let m = ScheduleTask::new_milestone("Inspection", date(2024, 3, 12));
        assert!(m.is_milestone);
        assert_eq!(m.start_date, m.end_date);
        assert_eq!(m.duration_days(), 1);
    }

    #[test]
    fn shifted_by_moves_both_dates() {
        let task = ScheduleTask::new("Framing", date(2024, 3, 5), date(2024, 3, 10));
        let moved = task.shifted_by(3);
        assert_eq!(moved.start_date, date(2024, 3, 8));
        assert_eq!(moved.end_date, date(2024, 3, 13));
        assert_eq!(moved.id, task.id);
    }
}
