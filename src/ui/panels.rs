use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};
use egui_extras::DatePickerButton;

use crate::data::export::ExportFile;
use crate::state::{AppState, Status};

// ---------------------------------------------------------------------------
// Left side panel – filter widgets
// ---------------------------------------------------------------------------

enum SelectionEdit {
    Toggle(String),
    Clear,
}

/// Render the left filter panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Filters");
    ui.separator();

    // The store is immutable; hold our own handle so state can be mutated
    // while iterating its option lists.
    let store = Arc::clone(&state.store);

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            date_range(ui, state);
            ui.separator();

            match multi_select(
                ui,
                "SRP Number",
                &store.srp_numbers,
                &state.controls.srp_numbers,
            ) {
                Some(SelectionEdit::Toggle(v)) => state.toggle_srp_number(&v),
                Some(SelectionEdit::Clear) => state.clear_srp_numbers(),
                None => {}
            }

            match multi_select(
                ui,
                "Scientific Name",
                &store.scientific_names,
                &state.controls.scientific_names,
            ) {
                Some(SelectionEdit::Toggle(v)) => state.toggle_scientific_name(&v),
                Some(SelectionEdit::Clear) => state.clear_scientific_names(),
                None => {}
            }
        });
}

/// Collapsible checkbox list. Nothing ticked means no constraint.
fn multi_select(
    ui: &mut Ui,
    title: &str,
    options: &[String],
    selected: &BTreeSet<String>,
) -> Option<SelectionEdit> {
    let mut edit = None;
    let header_text = if selected.is_empty() {
        format!("{title}  (all)")
    } else {
        format!("{title}  ({}/{})", selected.len(), options.len())
    };

    egui::CollapsingHeader::new(RichText::new(header_text).strong())
        .id_salt(title)
        .default_open(true)
        .show(ui, |ui: &mut Ui| {
            if ui
                .add_enabled(!selected.is_empty(), egui::Button::new("Clear").small())
                .clicked()
            {
                edit = Some(SelectionEdit::Clear);
            }
            for value in options {
                let mut checked = selected.contains(value);
                if ui.checkbox(&mut checked, value.as_str()).changed() {
                    edit = Some(SelectionEdit::Toggle(value.clone()));
                }
            }
        });

    edit
}

/// Start/end pickers. The date filter only applies while both are enabled.
fn date_range(ui: &mut Ui, state: &mut AppState) {
    ui.strong("Observation date");
    let controls = &mut state.controls;
    let mut changed = false;

    egui::Grid::new("date_range")
        .num_columns(2)
        .show(ui, |ui: &mut Ui| {
            changed |= ui.checkbox(&mut controls.use_start, "From").changed();
            changed |= ui
                .add_enabled(
                    controls.use_start,
                    DatePickerButton::new(&mut controls.start_date).id_salt("start_date"),
                )
                .changed();
            ui.end_row();

            changed |= ui.checkbox(&mut controls.use_end, "To").changed();
            changed |= ui
                .add_enabled(
                    controls.use_end,
                    DatePickerButton::new(&mut controls.end_date).id_salt("end_date"),
                )
                .changed();
            ui.end_row();
        });

    if controls.use_start && controls.use_end && controls.start_date > controls.end_date {
        ui.label(RichText::new("Start is after end: no records match").color(Color32::YELLOW));
    }

    if changed {
        state.refresh();
    }
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the title bar with counts, reset and status.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.strong("SRP Spatial Dashboard");
        ui.separator();

        ui.label(format!(
            "{} records loaded, {} visible",
            state.store.len(),
            state.views.record_count
        ));

        ui.separator();

        if ui.button("Reset filters").clicked() {
            state.reset_filters();
        }

        match &state.status {
            Some(Status::Info(msg)) => {
                ui.label(msg.as_str());
            }
            Some(Status::Error(msg)) => {
                ui.label(RichText::new(msg).color(Color32::RED));
            }
            None => {}
        }
    });
}

// ---------------------------------------------------------------------------
// Record count + download (map tab), record count (table tab)
// ---------------------------------------------------------------------------

pub fn record_count(ui: &mut Ui, state: &AppState) {
    ui.vertical_centered(|ui: &mut Ui| {
        ui.label(RichText::new(state.views.record_count_label()).strong().size(18.0));
    });
}

pub fn download_button(ui: &mut Ui, state: &mut AppState) {
    ui.vertical_centered(|ui: &mut Ui| {
        if ui.button(RichText::new("Download Filtered Data").strong()).clicked() {
            match state.press_download() {
                Ok(Some(file)) => save_export(state, &file),
                Ok(None) => {}
                Err(e) => {
                    log::error!("Failed to build export: {e}");
                    state.status = Some(Status::Error(format!("Export failed: {e}")));
                }
            }
        }
    });
}

// ---------------------------------------------------------------------------
// File dialogs
// ---------------------------------------------------------------------------

/// Ask the operator for the survey dataset at startup.
pub fn pick_dataset_file() -> Option<PathBuf> {
    rfd::FileDialog::new()
        .set_title("Open SRP survey data")
        .add_filter(
            "Supported files",
            &["xlsx", "xlsm", "xlsb", "xls", "ods", "csv", "json", "parquet", "pq"],
        )
        .add_filter("Spreadsheet", &["xlsx", "xlsm", "xlsb", "xls", "ods"])
        .add_filter("CSV", &["csv"])
        .add_filter("JSON", &["json"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file()
}

fn save_export(state: &mut AppState, file: &ExportFile) {
    let target = rfd::FileDialog::new()
        .set_title("Save filtered data")
        .set_file_name(file.file_name.as_str())
        .add_filter("CSV", &["csv"])
        .save_file();

    // Cancelled dialog: nothing to write.
    let Some(path) = target else {
        return;
    };

    match write_export(&path, file) {
        Ok(()) => {
            log::info!(
                "Exported {} records to {}",
                state.views.record_count,
                path.display()
            );
            state.status = Some(Status::Info(format!("Saved {}", path.display())));
        }
        Err(e) => {
            log::error!("Failed to save export: {e:#}");
            state.status = Some(Status::Error(format!("Error: {e:#}")));
        }
    }
}

fn write_export(path: &Path, file: &ExportFile) -> anyhow::Result<()> {
    std::fs::write(path, &file.bytes).with_context(|| format!("writing {}", path.display()))
}
