use eframe::egui;

use crate::state::{AppState, Tab};
use crate::ui::{map, panels, stats, table};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct SrpDashboardApp {
    pub state: AppState,
}

impl SrpDashboardApp {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }
}

impl eframe::App for SrpDashboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: title, counts, status ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: filters ----
        egui::SidePanel::left("filter_panel")
            .default_width(240.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: tabs ----
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.selectable_value(&mut self.state.tab, Tab::Map, "Map View");
                ui.selectable_value(&mut self.state.tab, Tab::Table, "Tabular Data View");
                ui.selectable_value(&mut self.state.tab, Tab::Statistics, "Statistics");
            });
            ui.separator();

            match self.state.tab {
                Tab::Map => {
                    panels::record_count(ui, &self.state);
                    panels::download_button(ui, &mut self.state);
                    ui.add_space(6.0);
                    map::survey_map(ui, &self.state);
                }
                Tab::Table => {
                    panels::record_count(ui, &self.state);
                    ui.add_space(6.0);
                    table::records_table(ui, &self.state.views);
                }
                Tab::Statistics => {
                    stats::statistics_table(ui, &self.state.views.statistics);
                }
            }
        });
    }
}
