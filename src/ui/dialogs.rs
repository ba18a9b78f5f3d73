use chrono::NaiveDate;
use egui::{Color32, Context, RichText, Window};

use crate::model::{ScheduleTask, TaskStatus};
use crate::ui::theme;

/// State for the add/edit task dialog. This is the caller-side flow the
/// chart's `AddTask` / `EditTask` events open; the chart itself never
/// constructs or edits tasks.
#[derive(Debug, Clone)]
pub struct TaskDialog {
    /// Id of the task being edited; `None` while creating a new one.
    pub editing: Option<String>,
    pub name: String,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub is_milestone: bool,
    pub status: TaskStatus,
    pub progress: u8,
    pub category_id: Option<i64>,
}

impl TaskDialog {
    /// Creation flow, pre-scoped to a lane.
    pub fn add_scoped(category_id: Option<i64>) -> Self {
        let today = chrono::Local::now().date_naive();
        Self {
            editing: None,
            name: String::new(),
            start: today,
            end: today + chrono::Duration::days(7),
            is_milestone: false,
            status: TaskStatus::NotStarted,
            progress: 0,
            category_id,
        }
    }

    /// Edit flow, preloaded from a clicked task.
    pub fn edit(task: &ScheduleTask) -> Self {
        Self {
            editing: Some(task.id.clone()),
            name: task.task_name.clone(),
            start: task.start_date,
            end: task.end_date,
            is_milestone: task.is_milestone,
            status: task.status,
            progress: task.progress,
            category_id: task.budget_category_id,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogAction {
    None,
    Save,
    Cancel,
}

/// Render the task dialog. `categories` is `(id, name)` per budget category
/// for the lane selector.
pub fn show_task_dialog(
    dialog: &mut TaskDialog,
    categories: &[(i64, String)],
    ctx: &Context,
) -> DialogAction {
    let mut action = DialogAction::None;
    let title = if dialog.editing.is_some() {
        "Edit Task"
    } else {
        "Add Task"
    };

    Window::new(RichText::new(title).strong().size(14.0))
        .resizable(false)
        .collapsible(false)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .fixed_size([320.0, 0.0])
        .show(ctx, |ui| {
            ui.visuals_mut().extreme_bg_color = Color32::from_rgb(20, 20, 28);
            ui.visuals_mut().striped = false;
            ui.add_space(4.0);

            egui::Grid::new("task_dialog_grid")
                .num_columns(2)
                .striped(false)
                .spacing([12.0, 8.0])
                .show(ui, |ui| {
                    ui.label(RichText::new("Name").color(theme::TEXT_SECONDARY));
                    ui.add_sized(
                        [220.0, 24.0],
                        egui::TextEdit::singleline(&mut dialog.name)
                            .hint_text("Task name...")
                            .text_color(theme::TEXT_PRIMARY),
                    );
                    ui.end_row();

                    ui.label(RichText::new("Start").color(theme::TEXT_SECONDARY));
                    ui.add(
                        egui_extras::DatePickerButton::new(&mut dialog.start)
                            .id_salt("dlg_dp_start"),
                    );
                    ui.end_row();

                    if !dialog.is_milestone {
                        ui.label(RichText::new("End").color(theme::TEXT_SECONDARY));
                        ui.add(
                            egui_extras::DatePickerButton::new(&mut dialog.end)
                                .id_salt("dlg_dp_end"),
                        );
                        ui.end_row();
                    }

                    ui.label(RichText::new("Lane").color(theme::TEXT_SECONDARY));
                    let selected = match dialog.category_id {
                        None => "Unassigned".to_string(),
                        Some(id) => categories
                            .iter()
                            .find(|(cid, _)| *cid == id)
                            .map(|(_, name)| name.clone())
                            .unwrap_or_else(|| format!("Category {id}")),
                    };
                    egui::ComboBox::from_id_salt("dlg_lane")
                        .selected_text(selected)
                        .show_ui(ui, |ui| {
                            ui.selectable_value(&mut dialog.category_id, None, "Unassigned");
                            for (id, name) in categories {
                                ui.selectable_value(&mut dialog.category_id, Some(*id), name);
                            }
                        });
                    ui.end_row();

                    ui.label(RichText::new("Status").color(theme::TEXT_SECONDARY));
                    egui::ComboBox::from_id_salt("dlg_status")
                        .selected_text(dialog.status.label())
                        .show_ui(ui, |ui| {
                            for status in TaskStatus::ALL {
                                ui.selectable_value(&mut dialog.status, status, status.label());
                            }
                        });
                    ui.end_row();

                    if !dialog.is_milestone {
                        ui.label(RichText::new("Progress").color(theme::TEXT_SECONDARY));
                        ui.add(egui::Slider::new(&mut dialog.progress, 0..=100).suffix("%"));
                        ui.end_row();
                    }

                    if dialog.editing.is_none() {
                        ui.label("");
                        ui.checkbox(&mut dialog.is_milestone, "Milestone");
                        ui.end_row();
                    }
                });

            ui.add_space(6.0);
            ui.separator();
            ui.add_space(4.0);

            ui.horizontal(|ui| {
                let label = if dialog.editing.is_some() { "Save" } else { "Create" };
                let save_btn = egui::Button::new(RichText::new(label).color(Color32::WHITE))
                    .fill(theme::ACCENT)
                    .rounding(egui::Rounding::same(4.0));
                if ui.add_sized([80.0, 28.0], save_btn).clicked() {
                    action = DialogAction::Save;
                }
                if ui.add_sized([80.0, 28.0], egui::Button::new("Cancel")).clicked() {
                    action = DialogAction::Cancel;
                }
            });
            ui.add_space(2.0);
        });

    if ctx.input(|i| i.key_pressed(egui::Key::Escape)) {
        action = DialogAction::Cancel;
    }
    action
}

/// Render the "About" dialog. Returns false when it should close.
pub fn show_about_dialog(ctx: &Context) -> bool {
    let mut open = true;
    Window::new("About")
        .resizable(false)
        .collapsible(false)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .fixed_size([280.0, 150.0])
        .show(ctx, |ui| {
            ui.vertical_centered(|ui| {
                ui.add_space(12.0);
                ui.heading(RichText::new("Swimlane Gantt").strong());
                ui.add_space(2.0);
                ui.label(
                    RichText::new(format!("Version {}", env!("CARGO_PKG_VERSION")))
                        .color(theme::TEXT_SECONDARY),
                );
                ui.add_space(10.0);
                ui.label("A swim-lane scheduling chart");
                ui.label("built with Rust and egui.");
                ui.add_space(14.0);
                if ui.add_sized([100.0, 28.0], egui::Button::new("Close")).clicked() {
                    open = false;
                }
            });
        });
    if ctx.input(|i| i.key_pressed(egui::Key::Escape)) {
        open = false;
    }
    open
}
