use egui::{menu, RichText, Ui};

use crate::app::ScheduleApp;
use crate::ui::dialogs::TaskDialog;
use crate::ui::theme;

/// Render the top toolbar / menu bar.
pub fn show_toolbar(app: &mut ScheduleApp, ui: &mut Ui) {
    menu::bar(ui, |ui| {
        ui.menu_button(RichText::new("  File  ").font(theme::font_bar()), |ui| {
            if ui.button("  New Schedule").clicked() {
                app.new_schedule();
                ui.close_menu();
            }
            if ui.button("  Open...").clicked() {
                app.open_schedule();
                ui.close_menu();
            }
            ui.separator();
            if ui.button("  Save          Ctrl+S").clicked() {
                app.save_schedule();
                ui.close_menu();
            }
            if ui.button("  Save As...").clicked() {
                app.save_schedule_as();
                ui.close_menu();
            }
            ui.separator();
            if ui.button("  Export CSV...").clicked() {
                app.export_csv();
                ui.close_menu();
            }
        });

        ui.menu_button(RichText::new("  Help  ").font(theme::font_bar()), |ui| {
            if ui.button("About").clicked() {
                app.show_about = true;
                ui.close_menu();
            }
        });

        if ui
            .button(RichText::new(format!(
                "{}  Add Task",
                egui_phosphor::regular::PLUS
            )))
            .clicked()
        {
            app.dialog = Some(TaskDialog::add_scoped(None));
        }

        // Right-aligned file name
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            let name = app
                .file_path
                .as_ref()
                .and_then(|p| p.file_name())
                .and_then(|n| n.to_str())
                .unwrap_or("Untitled Schedule (unsaved)");
            ui.label(RichText::new(name).size(11.0).weak());
        });
    });
}
