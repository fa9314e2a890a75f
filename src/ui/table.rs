use eframe::egui::{self, ScrollArea, Ui};
use egui_extras::{Column, TableBuilder};

use crate::data::projection::DashboardViews;

// ---------------------------------------------------------------------------
// Tabular data tab
// ---------------------------------------------------------------------------

const ROW_HEIGHT: f32 = 20.0;

/// Every filtered record with all source columns, in source order.
pub fn records_table(ui: &mut Ui, views: &DashboardViews) {
    let columns = &views.columns;

    ScrollArea::horizontal()
        .id_salt("records_table_hscroll")
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            TableBuilder::new(ui)
                .striped(true)
                .resizable(true)
                .cell_layout(egui::Layout::left_to_right(egui::Align::Center))
                .columns(Column::auto().at_least(60.0).clip(true), columns.len())
                .header(24.0, |mut header| {
                    for col in columns {
                        header.col(|ui: &mut Ui| {
                            ui.strong(col.as_str());
                        });
                    }
                })
                .body(|body| {
                    body.rows(ROW_HEIGHT, views.table.len(), |mut row| {
                        let cells = &views.table[row.index()];
                        for (_, value) in cells {
                            row.col(|ui: &mut Ui| {
                                ui.label(value.as_str());
                            });
                        }
                    });
                });
        });
}
