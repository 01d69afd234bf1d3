use std::path::Path;

use anyhow::Result;
use eframe::egui;
use enem_dashboard::app::DashboardApp;
use enem_dashboard::state::AppState;

/// Preprocessed dataset, relative to the working directory.
const DATA_PATH: &str = "data/processed/preprocessed_data.csv";

fn main() -> Result<()> {
    env_logger::init();

    // A dataset that fails to load is fatal: report path and cause, then exit.
    let state = AppState::load(Path::new(DATA_PATH)).inspect_err(|e| {
        log::error!("{e:#}");
    })?;

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1400.0, 900.0])
            .with_min_inner_size([800.0, 500.0]),
        ..Default::default()
    };

    eframe::run_native(
        "ENEM Analysis Dashboard",
        options,
        Box::new(|_cc| Ok(Box::new(DashboardApp::new(state)))),
    )
    .map_err(|e| anyhow::anyhow!("UI terminated with an error: {e}"))
}
