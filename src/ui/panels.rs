use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};
use egui_extras::DatePickerButton;

use crate::data::filter::DateWindow;
use crate::data::model::SourceFile;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – cost categories and date window
// ---------------------------------------------------------------------------

/// Render the left controls panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Risk Department");
    ui.separator();

    if !state.view.has_data {
        ui.label("No data loaded.");
        return;
    }

    // ---- Date window ----
    if let Some(window) = state.window {
        ui.strong("Date range");
        let mut start = window.start;
        let mut end = window.end;

        ui.horizontal(|ui: &mut Ui| {
            ui.label("Start");
            ui.add(DatePickerButton::new(&mut start).id_salt("start_date"));
        });
        ui.horizontal(|ui: &mut Ui| {
            ui.label("End");
            ui.add(DatePickerButton::new(&mut end).id_salt("end_date"));
        });

        // Inverted ranges are allowed and simply match nothing.
        state.set_window(DateWindow::new(start, end));
        ui.separator();
    }

    // ---- Column multiselect ----
    ui.strong("Cost categories");
    let columns = state.view.sla_columns.clone();

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            for col in &columns {
                let mut checked = state.is_selected(col);
                let mut text = RichText::new(col);
                if checked {
                    text = text.color(state.colors.color_for(col));
                }
                if ui.checkbox(&mut checked, text).changed() {
                    state.toggle_column(col);
                }
            }
        });
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();
        ui.label("SLA Cost Analysis Dashboard");
        ui.separator();

        if state.view.has_data {
            ui.label(format!(
                "{} file(s) · {} row(s) in window",
                state.files.len(),
                state.view.rows_in_window
            ));
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let paths = rfd::FileDialog::new()
        .set_title("Open SLA / driver spreadsheets")
        .add_filter("Spreadsheets", &["xlsx", "xlsm", "xls", "csv", "json"])
        .add_filter("Excel", &["xlsx", "xlsm", "xls"])
        .add_filter("CSV", &["csv"])
        .add_filter("JSON", &["json"])
        .pick_files();

    let Some(paths) = paths else { return };

    let mut files = Vec::new();
    for path in paths {
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("unnamed")
            .to_string();
        match std::fs::read(&path) {
            Ok(data) => {
                log::info!("Opened {name} ({} bytes)", data.len());
                files.push(SourceFile::new(name, data));
            }
            Err(e) => {
                log::error!("Failed to read {}: {e}", path.display());
                state.status_message = Some(format!("Error reading {name}: {e}"));
            }
        }
    }

    if !files.is_empty() {
        state.status_message = None;
        state.add_files(files);
    }
}
