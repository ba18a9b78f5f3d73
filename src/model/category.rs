use serde::{Deserialize, Serialize};

use super::task::ScheduleTask;

/// A budget category; each category is one swim lane on the chart.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BudgetCategory {
    pub id: i64,
    pub category_name: String,
    pub amount: f64,
    pub tasks: Vec<ScheduleTask>,
}

impl BudgetCategory {
    pub fn new(id: i64, name: impl Into<String>, amount: f64) -> Self {
        Self {
            id,
            category_name: name.into(),
            amount,
            tasks: Vec::new(),
        }
    }
}

/// Identifies one swim lane. A tagged key rather than a string so the
/// unassigned bucket can never collide with a category id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LaneKey {
    Unassigned,
    Category(i64),
}

impl LaneKey {
    /// The category id a drop on this lane resolves to (`None` = unassigned).
    pub fn category_id(self) -> Option<i64> {
        match self {
            LaneKey::Unassigned => None,
            LaneKey::Category(id) => Some(id),
        }
    }
}

/// The full schedule as supplied by the caller: an unassigned bucket plus
/// budget categories with their nested tasks.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SchedulePayload {
    pub unassigned_tasks: Vec<ScheduleTask>,
    pub budget_categories: Vec<BudgetCategory>,
}

impl SchedulePayload {
    /// Vertical lane ordering: unassigned first, then categories in supplied
    /// order. This is the single source of truth for row placement, used by
    /// both lane layout and dependency edge coordinates.
    pub fn lane_order(&self) -> Vec<LaneKey> {
        std::iter::once(LaneKey::Unassigned)
            .chain(self.budget_categories.iter().map(|c| LaneKey::Category(c.id)))
            .collect()
    }

    pub fn lane_tasks(&self, key: LaneKey) -> &[ScheduleTask] {
        match key {
            LaneKey::Unassigned => &self.unassigned_tasks,
            LaneKey::Category(id) => self
                .budget_categories
                .iter()
                .find(|c| c.id == id)
                .map(|c| c.tasks.as_slice())
                .unwrap_or(&[]),
        }
    }

    pub fn category(&self, id: i64) -> Option<&BudgetCategory> {
        self.budget_categories.iter().find(|c| c.id == id)
    }

    /// Every task paired with the lane it currently lives in.
    pub fn flat_tasks(&self) -> Vec<(LaneKey, &ScheduleTask)> {
        let mut flat: Vec<(LaneKey, &ScheduleTask)> = self
            .unassigned_tasks
            .iter()
            .map(|t| (LaneKey::Unassigned, t))
            .collect();
        for category in &self.budget_categories {
            flat.extend(category.tasks.iter().map(|t| (LaneKey::Category(category.id), t)));
        }
        flat
    }

    pub fn find_task(&self, id: &str) -> Option<&ScheduleTask> {
        self.flat_tasks().into_iter().find(|(_, t)| t.id == id).map(|(_, t)| t)
    }

    pub fn task_count(&self) -> usize {
        self.unassigned_tasks.len()
            + self.budget_categories.iter().map(|c| c.tasks.len()).sum::<usize>()
    }

    // ── Caller-side mutation helpers ─────────────────────────────────────────
    // The chart itself never calls these; they are how the owning app applies
    // the events the chart reports.

    /// Replace the stored task with `updated` (matched by id), in whichever
    /// lane it currently lives. Returns false if the id is unknown.
    pub fn update_task(&mut self, updated: ScheduleTask) -> bool {
        let lanes = std::iter::once(&mut self.unassigned_tasks)
            .chain(self.budget_categories.iter_mut().map(|c| &mut c.tasks));
        for tasks in lanes {
            if let Some(slot) = tasks.iter_mut().find(|t| t.id == updated.id) {
                *slot = updated;
                return true;
            }
        }
        false
    }

    /// Move a task into the lane for `category_id` (`None` = unassigned),
    /// keeping its dates. Returns false if the task id is unknown.
    pub fn assign_task(&mut self, task_id: &str, category_id: Option<i64>) -> bool {
        let Some(mut task) = self.remove_task(task_id) else {
            return false;
        };
        task.budget_category_id = category_id;
        self.add_task(task);
        true
    }

    /// Insert a task into the lane matching its `budget_category_id`. A task
    /// pointing at an unknown category falls back to the unassigned lane.
    pub fn add_task(&mut self, mut task: ScheduleTask) {
        match task.budget_category_id {
            Some(id) => {
                if let Some(category) = self.budget_categories.iter_mut().find(|c| c.id == id) {
                    category.tasks.push(task);
                } else {
                    task.budget_category_id = None;
                    self.unassigned_tasks.push(task);
                }
            }
            None => self.unassigned_tasks.push(task),
        }
    }

    pub fn remove_task(&mut self, task_id: &str) -> Option<ScheduleTask> {
        if let Some(pos) = self.unassigned_tasks.iter().position(|t| t.id == task_id) {
            return Some(self.unassigned_tasks.remove(pos));
        }
        for category in &mut self.budget_categories {
            if let Some(pos) = category.tasks.iter().position(|t| t.id == task_id) {
                return Some(category.tasks.remove(pos));
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, d).unwrap()
    }

    fn payload() -> SchedulePayload {
        let mut payload = SchedulePayload::default();
        payload.budget_categories.push(BudgetCategory::new(7, "Framing", 85_500.0));
        payload.budget_categories.push(BudgetCategory::new(3, "Electrical", 32_000.0));
        payload.unassigned_tasks.push(ScheduleTask::new("Order windows", date(5), date(10)));
        payload
    }

    #[test]
    fn lane_order_starts_with_unassigned() {
        assert_eq!(
            payload().lane_order(),
            vec![LaneKey::Unassigned, LaneKey::Category(7), LaneKey::Category(3)]
        );
    }

    #[test]
    fn assign_task_moves_between_lanes() {
        let mut payload = payload();
        let id = payload.unassigned_tasks[0].id.clone();

        assert!(payload.assign_task(&id, Some(7)));
        assert!(payload.unassigned_tasks.is_empty());
        let moved = payload.find_task(&id).unwrap();
        assert_eq!(moved.budget_category_id, Some(7));
        assert_eq!(payload.lane_tasks(LaneKey::Category(7)).len(), 1);

        // Back to the unassigned bucket.
        assert!(payload.assign_task(&id, None));
        assert_eq!(payload.find_task(&id).unwrap().budget_category_id, None);
        assert_eq!(payload.unassigned_tasks.len(), 1);
    }

    #[test]
    fn assign_task_unknown_id_is_a_noop() {
        let mut payload = payload();
        assert!(!payload.assign_task("missing", Some(7)));
        assert_eq!(payload.task_count(), 1);
    }

    #[test]
    fn update_task_replaces_dates_in_place() {
        let mut payload = payload();
        let mut updated = payload.unassigned_tasks[0].clone();
        updated.start_date = date(8);
        updated.end_date = date(13);

        assert!(payload.update_task(updated));
        let task = &payload.unassigned_tasks[0];
        assert_eq!(task.start_date, date(8));
        assert_eq!(task.end_date, date(13));
    }

    #[test]
    fn add_task_with_unknown_category_falls_back_to_unassigned() {
        let mut payload = payload();
        let mut task = ScheduleTask::new("Punch list", date(1), date(2));
        task.budget_category_id = Some(999);
        payload.add_task(task);
        assert_eq!(payload.unassigned_tasks.len(), 2);
        assert_eq!(payload.unassigned_tasks[1].budget_category_id, None);
    }
}
