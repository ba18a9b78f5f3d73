use std::path::Path;

use crate::model::SchedulePayload;

/// Save a schedule to a JSON file.
pub fn save_schedule(payload: &SchedulePayload, path: &Path) -> Result<(), String> {
    let json = serde_json::to_string_pretty(payload).map_err(|e| e.to_string())?;
    std::fs::write(path, json).map_err(|e| e.to_string())?;
    tracing::info!(path = %path.display(), tasks = payload.task_count(), "schedule saved");
    Ok(())
}

/// Load a schedule from a JSON file.
pub fn load_schedule(path: &Path) -> Result<SchedulePayload, String> {
    let json = std::fs::read_to_string(path).map_err(|e| e.to_string())?;
    let payload: SchedulePayload = serde_json::from_str(&json).map_err(|e| e.to_string())?;
    tracing::info!(path = %path.display(), tasks = payload.task_count(), "schedule loaded");
    Ok(payload)
}

#[cfg(test)]
mod tests {
    use crate::model::{BudgetCategory, SchedulePayload, ScheduleTask};

    #[test]
    fn payload_round_trips_through_json() {
        let mut payload = SchedulePayload::default();
        let mut category = BudgetCategory::new(7, "Framing", 85_500.0);
        let date = chrono::NaiveDate::from_ymd_opt(2024, 3, 5).unwrap();
        let mut task = ScheduleTask::new("Frame walls", date, date + chrono::Duration::days(5));
        task.budget_category_id = Some(7);
        task.dependencies = vec!["some-predecessor".to_string()];
        category.tasks.push(task);
        payload.budget_categories.push(category);

        let json = serde_json::to_string(&payload).unwrap();
        let restored: SchedulePayload = serde_json::from_str(&json).unwrap();
        assert_eq!(restored.task_count(), 1);
        let restored_task = &restored.budget_categories[0].tasks[0];
        assert_eq!(restored_task.dependencies.len(), 1);
        assert_eq!(restored_task.start_date, date);
    }
}
