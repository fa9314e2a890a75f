use std::collections::BTreeSet;
use std::sync::Arc;

use chrono::NaiveDate;

use crate::color::ColorMap;
use crate::data::export::{self, ExportFile};
use crate::data::filter::{DateInterval, FilterSpec};
use crate::data::model::RecordStore;
use crate::data::projection::{update_views, DashboardViews};

// ---------------------------------------------------------------------------
// Filter controls
// ---------------------------------------------------------------------------

/// Raw widget state behind the filter panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterControls {
    pub srp_numbers: BTreeSet<String>,
    pub scientific_names: BTreeSet<String>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub use_start: bool,
    pub use_end: bool,
}

impl FilterControls {
    /// Nothing selected; date pickers span the data's date range.
    pub fn for_store(store: &RecordStore) -> Self {
        let (start_date, end_date, enabled) = match store.date_bounds {
            Some((lo, hi)) => (lo, hi, true),
            None => {
                let today = chrono::Local::now().date_naive();
                (today, today, false)
            }
        };
        Self {
            srp_numbers: BTreeSet::new(),
            scientific_names: BTreeSet::new(),
            start_date,
            end_date,
            use_start: enabled,
            use_end: enabled,
        }
    }

    /// Snapshot the controls as a fresh filter specification.
    pub fn spec(&self) -> FilterSpec {
        FilterSpec {
            srp_numbers: self.srp_numbers.clone(),
            scientific_names: self.scientific_names.clone(),
            date_range: DateInterval {
                start: self.use_start.then_some(self.start_date),
                end: self.use_end.then_some(self.end_date),
            },
        }
    }
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// Message shown in the top bar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Status {
    Info(String),
    Error(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Map,
    Table,
    Statistics,
}

/// The full UI state, independent of rendering.
pub struct AppState {
    /// Survey dataset, loaded once at startup.
    pub store: Arc<RecordStore>,

    /// Used to name exported files.
    pub dataset_name: String,

    pub controls: FilterControls,

    /// Views for the current controls (recomputed on every change).
    pub views: DashboardViews,

    /// Marker colour per scientific name.
    pub color_map: ColorMap,

    pub tab: Tab,

    /// Number of times the download button has been pressed.
    pub download_clicks: u32,

    /// Status / error message shown in the UI.
    pub status: Option<Status>,
}

impl AppState {
    pub fn new(store: Arc<RecordStore>, dataset_name: String) -> Self {
        let controls = FilterControls::for_store(&store);
        let views = update_views(&store, &controls.spec());
        let color_map = ColorMap::new(&store.scientific_names);
        Self {
            store,
            dataset_name,
            controls,
            views,
            color_map,
            tab: Tab::Map,
            download_clicks: 0,
            status: None,
        }
    }

    /// Recompute all views after a control change.
    pub fn refresh(&mut self) {
        self.views = update_views(&self.store, &self.controls.spec());
    }

    /// Toggle a single SRP number in the selection.
    pub fn toggle_srp_number(&mut self, value: &str) {
        toggle(&mut self.controls.srp_numbers, value);
        self.refresh();
    }

    /// Toggle a single scientific name in the selection.
    pub fn toggle_scientific_name(&mut self, value: &str) {
        toggle(&mut self.controls.scientific_names, value);
        self.refresh();
    }

    pub fn clear_srp_numbers(&mut self) {
        self.controls.srp_numbers.clear();
        self.refresh();
    }

    pub fn clear_scientific_names(&mut self) {
        self.controls.scientific_names.clear();
        self.refresh();
    }

    /// Back to the startup filter state.
    pub fn reset_filters(&mut self) {
        self.controls = FilterControls::for_store(&self.store);
        self.refresh();
    }

    /// Register a download click and build the export for the current filters.
    pub fn press_download(&mut self) -> Result<Option<ExportFile>, csv::Error> {
        self.download_clicks += 1;
        export::download(
            &self.store,
            &self.controls.spec(),
            self.download_clicks,
            &self.dataset_name,
        )
    }
}

fn toggle(selected: &mut BTreeSet<String>, value: &str) {
    if !selected.remove(value) {
        selected.insert(value.to_string());
    }
}
