use std::io::Write;
use std::path::Path;

use crate::model::{LaneKey, SchedulePayload};

/// Export the schedule to a semicolon-delimited CSV file, one row per task.
///
/// Columns: Task ; Lane ; Start Date ; End Date ; Status ; Progress ; Milestone
/// Dates are formatted as DD/MM/YYYY. Returns the number of tasks written.
pub fn export_csv(payload: &SchedulePayload, path: &Path) -> Result<usize, String> {
    let file = std::fs::File::create(path)
        .map_err(|e| format!("Failed to create CSV file: {}", e))?;
    let count = write_schedule(payload, file)?;
    tracing::info!(path = %path.display(), tasks = count, "schedule exported to CSV");
    Ok(count)
}

fn write_schedule<W: Write>(payload: &SchedulePayload, writer: W) -> Result<usize, String> {
    let mut wtr = csv::WriterBuilder::new()
        .delimiter(b';')
        .has_headers(false)
        .from_writer(writer);

    wtr.write_record([
        "Task",
        "Lane",
        "Start Date",
        "End Date",
        "Status",
        "Progress",
        "Milestone",
    ])
    .map_err(|e| format!("Failed to write header: {}", e))?;

    let mut count = 0;
    for (lane, task) in payload.flat_tasks() {
        let lane_name = match lane {
            LaneKey::Unassigned => "Unassigned".to_string(),
            LaneKey::Category(id) => payload
                .category(id)
                .map(|c| c.category_name.clone())
                .unwrap_or_else(|| format!("Category {id}")),
        };
        wtr.write_record([
            task.task_name.as_str(),
            lane_name.as_str(),
            &task.start_date.format("%d/%m/%Y").to_string(),
            &task.end_date.format("%d/%m/%Y").to_string(),
            task.status.label(),
            &format!("{}%", task.progress),
            if task.is_milestone { "yes" } else { "no" },
        ])
        .map_err(|e| format!("Failed to write task '{}': {}", task.task_name, e))?;
        count += 1;
    }

    wtr.flush().map_err(|e| format!("Failed to flush CSV: {}", e))?;
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{BudgetCategory, ScheduleTask};

    #[test]
    fn every_lane_contributes_rows() {
        let date = chrono::NaiveDate::from_ymd_opt(2024, 3, 5).unwrap();
        let mut payload = SchedulePayload::default();
        payload
            .unassigned_tasks
            .push(ScheduleTask::new("Order windows", date, date));
        let mut category = BudgetCategory::new(7, "Framing", 85_500.0);
        let mut task = ScheduleTask::new("Frame walls", date, date + chrono::Duration::days(3));
        task.budget_category_id = Some(7);
        category.tasks.push(task);
        payload.budget_categories.push(category);

        let mut buffer = Vec::new();
        let count = write_schedule(&payload, &mut buffer).unwrap();
        assert_eq!(count, 2);

        let text = String::from_utf8(buffer).unwrap();
        assert!(text.contains("Order windows;Unassigned;05/03/2024"));
        assert!(text.contains("Frame walls;Framing;05/03/2024;08/03/2024"));
    }
}
