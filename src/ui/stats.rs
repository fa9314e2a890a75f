use eframe::egui::{self, Ui};

use crate::data::projection::StatisticsSummary;

// ---------------------------------------------------------------------------
// Statistics tab
// ---------------------------------------------------------------------------

/// Distinct-value counts for the filtered records.
pub fn statistics_table(ui: &mut Ui, stats: &StatisticsSummary) {
    egui::Grid::new("statistics")
        .striped(true)
        .num_columns(2)
        .spacing([40.0, 8.0])
        .show(ui, |ui: &mut Ui| {
            ui.strong("Category");
            ui.strong("Count");
            ui.end_row();

            ui.label("SRP Numbers");
            ui.label(stats.srp_count.to_string());
            ui.end_row();

            ui.label("Scientific Names");
            ui.label(stats.scientific_name_count.to_string());
            ui.end_row();
        });
}
