use eframe::egui::{self, Ui};
use egui_plot::{Legend, Plot, PlotPoint, PlotUi, Points};

use crate::data::projection::MapPoint;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Observation map (map tab)
// ---------------------------------------------------------------------------

/// Screen distance (points) within which a marker counts as hovered.
const HOVER_RADIUS: f32 = 8.0;

/// Scatter the mappable records by longitude/latitude, one colour per species.
pub fn survey_map(ui: &mut Ui, state: &AppState) {
    let points = &state.views.map_points;
    if points.is_empty() {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("No mappable records for the current filters");
        });
        return;
    }

    // One series per scientific name, in first-seen order, so the legend
    // doubles as a species key.
    let mut series: Vec<(&str, Vec<[f64; 2]>)> = Vec::new();
    for p in points {
        let name = p.tooltip.scientific_name.as_str();
        match series.iter_mut().find(|(n, _)| *n == name) {
            Some((_, coords)) => coords.push([p.lon, p.lat]),
            None => series.push((name, vec![[p.lon, p.lat]])),
        }
    }

    let response = Plot::new("survey_map")
        .legend(Legend::default())
        .data_aspect(1.0)
        .x_axis_label("Longitude")
        .y_axis_label("Latitude")
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(true)
        .allow_zoom(true)
        .show(ui, |plot_ui| {
            for (name, coords) in &series {
                let label = if name.is_empty() { "(no name)" } else { *name };
                let markers = Points::new(coords.clone())
                    .name(label)
                    .color(state.color_map.color_for(name))
                    .radius(4.0)
                    .filled(true);
                plot_ui.points(markers);
            }
            hovered_point(plot_ui, points)
        });

    if let Some(idx) = response.inner {
        let point = &points[idx];
        response.response.on_hover_ui_at_pointer(|ui: &mut Ui| {
            egui::Grid::new("map_tooltip")
                .num_columns(2)
                .show(ui, |ui: &mut Ui| {
                    for (label, value) in point.tooltip.entries() {
                        ui.strong(label);
                        ui.label(value);
                        ui.end_row();
                    }
                });
        });
    }
}

/// Index of the marker closest to the pointer, if one is close enough.
fn hovered_point(plot_ui: &PlotUi, points: &[MapPoint]) -> Option<usize> {
    let pointer = plot_ui.pointer_coordinate()?;
    let transform = plot_ui.transform();
    let cursor = transform.position_from_point(&pointer);

    points
        .iter()
        .enumerate()
        .map(|(i, p)| {
            let pos = transform.position_from_point(&PlotPoint::new(p.lon, p.lat));
            (i, pos.distance(cursor))
        })
        .filter(|(_, d)| *d <= HOVER_RADIUS)
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(i, _)| i)
}
