use std::path::PathBuf;

use egui::RichText;

use crate::model::{BudgetCategory, SchedulePayload, ScheduleTask, TaskStatus, ViewWindow};
use crate::ui;
use crate::ui::dialogs::{DialogAction, TaskDialog};
use crate::ui::interaction::{GanttEvent, GanttState};
use crate::ui::theme;

/// Main application state. The app owns the schedule data and plays the
/// caller role for the chart: it applies the events the chart reports and
/// the next frame renders the updated payload.
pub struct ScheduleApp {
    pub payload: SchedulePayload,
    pub window: ViewWindow,
    pub gantt: GanttState,
    pub file_path: Option<PathBuf>,
    pub status_message: String,
    pub dialog: Option<TaskDialog>,
    pub show_about: bool,
}

impl ScheduleApp {
    pub fn new(cc: &eframe::CreationContext<'_>) -> Self {
        // Register Phosphor icon font as a fallback so icons render inline
        let mut fonts = egui::FontDefinitions::default();
        egui_phosphor::add_to_fonts(&mut fonts, egui_phosphor::Variant::Regular);
        cc.egui_ctx.set_fonts(fonts);

        Self {
            payload: Self::sample_schedule(),
            window: ViewWindow::this_month(),
            gantt: GanttState::default(),
            file_path: None,
            status_message: "Ready".to_string(),
            dialog: None,
            show_about: false,
        }
    }

    /// Generate a sample construction schedule for demonstration.
    fn sample_schedule() -> SchedulePayload {
        let today = chrono::Local::now().date_naive();
        let day = |offset: i64| today + chrono::Duration::days(offset);

        let mut site_prep = ScheduleTask::new("Site preparation", day(-12), day(-8));
        site_prep.budget_category_id = Some(1);
        site_prep.status = TaskStatus::Completed;
        site_prep.progress = 100;

        let mut footings = ScheduleTask::new("Pour footings", day(-7), day(-1));
        footings.budget_category_id = Some(1);
        footings.status = TaskStatus::InProgress;
        footings.progress = 60;
        footings.dependencies = vec![site_prep.id.clone()];

        let mut inspection = ScheduleTask::new_milestone("Foundation inspection", day(1));
        inspection.budget_category_id = Some(1);
        inspection.dependencies = vec![footings.id.clone()];

        let mut framing = ScheduleTask::new("Frame exterior walls", day(2), day(10));
        framing.budget_category_id = Some(2);
        framing.dependencies = vec![inspection.id.clone()];

        let mut trusses = ScheduleTask::new("Set roof trusses", day(9), day(14));
        trusses.budget_category_id = Some(2);
        trusses.dependencies = vec![framing.id.clone()];

        let mut wiring = ScheduleTask::new("Rough-in wiring", day(13), day(19));
        wiring.budget_category_id = Some(3);
        wiring.status = TaskStatus::NotStarted;
        wiring.dependencies = vec![trusses.id.clone()];

        let mut elec_inspection = ScheduleTask::new_milestone("Electrical inspection", day(21));
        elec_inspection.budget_category_id = Some(3);
        elec_inspection.dependencies = vec![wiring.id.clone()];

        let mut windows = ScheduleTask::new("Order windows", day(3), day(5));
        windows.status = TaskStatus::OnHold;
        let punch = ScheduleTask::new("Punch list review", day(24), day(26));

        let mut foundation = BudgetCategory::new(1, "Foundation", 48_000.0);
        foundation.tasks = vec![site_prep, footings, inspection];
        let mut framing_cat = BudgetCategory::new(2, "Framing", 85_500.0);
        framing_cat.tasks = vec![framing, trusses];
        let mut electrical = BudgetCategory::new(3, "Electrical", 32_000.0);
        electrical.tasks = vec![wiring, elec_inspection];

        SchedulePayload {
            unassigned_tasks: vec![windows, punch],
            budget_categories: vec![foundation, framing_cat, electrical],
        }
    }

    // --- File operations ---

    pub fn new_schedule(&mut self) {
        self.payload = SchedulePayload::default();
        self.file_path = None;
        self.dialog = None;
        self.status_message = "New schedule created".to_string();
    }

    pub fn open_schedule(&mut self) {
        if let Some(path) = rfd::FileDialog::new()
            .add_filter("Schedule", &["json"])
            .pick_file()
        {
            match crate::io::load_schedule(&path) {
                Ok(payload) => {
                    self.payload = payload;
                    self.file_path = Some(path);
                    self.status_message = "Schedule loaded".to_string();
                }
                Err(e) => {
                    self.status_message = format!("Error loading: {}", e);
                }
            }
        }
    }

    pub fn save_schedule(&mut self) {
        if let Some(path) = self.file_path.clone() {
            match crate::io::save_schedule(&self.payload, &path) {
                Ok(()) => self.status_message = "Schedule saved".to_string(),
                Err(e) => self.status_message = format!("Error saving: {}", e),
            }
        } else {
            self.save_schedule_as();
        }
    }

    pub fn save_schedule_as(&mut self) {
        if let Some(path) = rfd::FileDialog::new()
            .add_filter("Schedule", &["json"])
            .set_file_name("schedule.json")
            .save_file()
        {
            self.file_path = Some(path.clone());
            match crate::io::save_schedule(&self.payload, &path) {
                Ok(()) => self.status_message = "Schedule saved".to_string(),
                Err(e) => self.status_message = format!("Error saving: {}", e),
            }
        }
    }

    pub fn export_csv(&mut self) {
        if self.payload.task_count() == 0 {
            self.status_message = "Nothing to export: schedule has no tasks".to_string();
            return;
        }

        if let Some(path) = rfd::FileDialog::new()
            .add_filter("CSV Files", &["csv"])
            .set_file_name("schedule.csv")
            .save_file()
        {
            match crate::io::csv_export::export_csv(&self.payload, &path) {
                Ok(count) => {
                    self.status_message = format!("Exported {} tasks to CSV", count);
                }
                Err(e) => {
                    self.status_message = format!("CSV export failed: {}", e);
                }
            }
        }
    }

    // --- Event handling ---

    /// Apply one chart event to the owned payload. This is the persistence
    /// boundary; in this app "persisting" is mutating the in-memory data.
    fn apply_event(&mut self, event: GanttEvent) {
        match event {
            GanttEvent::UpdateTask(task) => {
                let label = format!(
                    "Updated '{}' ({} → {})",
                    task.task_name,
                    task.start_date.format("%Y-%m-%d"),
                    task.end_date.format("%Y-%m-%d"),
                );
                if self.payload.update_task(task) {
                    self.status_message = label;
                }
            }
            GanttEvent::AssignTask {
                task_id,
                budget_category_id,
            } => {
                let lane_name = match budget_category_id {
                    None => "Unassigned".to_string(),
                    Some(id) => self
                        .payload
                        .category(id)
                        .map(|c| c.category_name.clone())
                        .unwrap_or_else(|| format!("Category {id}")),
                };
                if self.payload.assign_task(&task_id, budget_category_id) {
                    self.status_message = format!("Moved task to {lane_name}");
                }
            }
            GanttEvent::AddTask { budget_category_id } => {
                self.dialog = Some(TaskDialog::add_scoped(budget_category_id));
            }
            GanttEvent::EditTask(task) => {
                self.dialog = Some(TaskDialog::edit(&task));
            }
        }
    }

    fn commit_dialog(&mut self, dialog: TaskDialog) {
        let name = if dialog.name.is_empty() {
            "New Task".to_string()
        } else {
            dialog.name.clone()
        };
        let start = dialog.start;
        // End date never precedes the start.
        let end = if dialog.is_milestone {
            start
        } else {
            dialog.end.max(start)
        };

        match dialog.editing {
            Some(id) => {
                if let Some(mut task) = self.payload.remove_task(&id) {
                    task.task_name = name;
                    task.start_date = start;
                    task.end_date = end;
                    task.status = dialog.status;
                    task.progress = dialog.progress;
                    task.budget_category_id = dialog.category_id;
                    let label = task.task_name.clone();
                    self.payload.add_task(task);
                    self.status_message = format!("Updated '{}'", label);
                }
            }
            None => {
                let mut task = if dialog.is_milestone {
                    ScheduleTask::new_milestone(name, start)
                } else {
                    ScheduleTask::new(name, start, end)
                };
                task.status = dialog.status;
                task.progress = dialog.progress;
                task.budget_category_id = dialog.category_id;
                let label = task.task_name.clone();
                self.payload.add_task(task);
                self.status_message = format!("Added '{}'", label);
            }
        }
    }
}

impl eframe::App for ScheduleApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        ui::theme::apply_theme(ctx);

        if ctx.input(|i| i.modifiers.ctrl && i.key_pressed(egui::Key::S)) {
            self.save_schedule();
        }

        egui::TopBottomPanel::top("toolbar").show(ctx, |ui| {
            ui::toolbar::show_toolbar(self, ui);
        });

        egui::TopBottomPanel::bottom("status_bar")
            .exact_height(24.0)
            .show(ctx, |ui| {
                ui.horizontal_centered(|ui| {
                    ui.label(
                        RichText::new(&self.status_message)
                            .font(theme::font_sub())
                            .color(theme::TEXT_SECONDARY),
                    );
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        ui.label(
                            RichText::new(format!("Tasks: {}", self.payload.task_count()))
                                .size(10.5)
                                .color(theme::TEXT_DIM),
                        );
                        ui.label(RichText::new(" · ").size(10.5).color(theme::TEXT_DIM));
                        ui.label(
                            RichText::new(format!("View: {}", self.window.zoom.label()))
                                .size(10.5)
                                .color(theme::TEXT_DIM),
                        );
                    });
                });
            });

        let mut events = Vec::new();
        let chart_frame = egui::Frame::default()
            .fill(theme::BG_DARK)
            .inner_margin(egui::Margin::same(6.0));
        egui::CentralPanel::default().frame(chart_frame).show(ctx, |ui| {
            events = ui::gantt::show_swimlane_gantt(
                &self.payload,
                &mut self.window,
                &mut self.gantt,
                ui,
            );
        });
        for event in events {
            self.apply_event(event);
        }

        if let Some(dialog) = &mut self.dialog {
            let categories: Vec<(i64, String)> = self
                .payload
                .budget_categories
                .iter()
                .map(|c| (c.id, c.category_name.clone()))
                .collect();
            match ui::dialogs::show_task_dialog(dialog, &categories, ctx) {
                DialogAction::Save => {
                    if let Some(dialog) = self.dialog.take() {
                        self.commit_dialog(dialog);
                    }
                }
                DialogAction::Cancel => {
                    self.dialog = None;
                }
                DialogAction::None => {}
            }
        }
        if self.show_about {
            self.show_about = ui::dialogs::show_about_dialog(ctx);
        }
    }
}
