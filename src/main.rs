mod app;
mod cli;
mod color;
mod data;
mod state;
mod ui;

use std::sync::Arc;

use anyhow::{anyhow, Context};
use app::SrpDashboardApp;
use clap::Parser;
use cli::Cli;
use data::columns::ColumnMapping;
use data::loader;
use data::model::RecordStore;
use eframe::egui;
use state::AppState;

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let store = match load_store(&cli) {
        Ok(store) => Arc::new(store),
        Err(e) => {
            log::error!("Failed to load survey data: {e:#}");
            return Err(e);
        }
    };
    let state = AppState::new(store, cli.dataset_name);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 860.0])
            .with_min_inner_size([720.0, 480.0]),
        ..Default::default()
    };

    eframe::run_native(
        "SRP Spatial Dashboard",
        options,
        Box::new(|_cc| Ok(Box::new(SrpDashboardApp::new(state)))),
    )
    .map_err(|e| anyhow!("UI error: {e}"))
}

/// Resolve the column mapping and dataset path, then read the store once.
fn load_store(cli: &Cli) -> anyhow::Result<RecordStore> {
    let mapping = match &cli.columns {
        Some(path) => ColumnMapping::from_json_file(path)
            .with_context(|| format!("reading column mapping {}", path.display()))?,
        None => ColumnMapping::default(),
    };

    let path = match &cli.input {
        Some(path) => path.clone(),
        None => ui::panels::pick_dataset_file().context("no survey dataset selected")?,
    };

    let store = loader::load_file(&path, &mapping)
        .with_context(|| format!("loading {}", path.display()))?;
    if store.is_empty() {
        log::warn!("{} contains no records", path.display());
    }
    log::info!(
        "Loaded {} records with columns {:?}",
        store.len(),
        store.columns
    );
    Ok(store)
}
