mod app;
mod color;
mod config;
mod data;
mod state;
mod ui;

use anyhow::{anyhow, Context, Result};
use app::LaunchDashApp;
use config::DashConfig;
use eframe::egui;
use state::AppState;

fn main() -> Result<()> {
    env_logger::init();

    let config = DashConfig::from_env().context("reading configuration")?;
    log::debug!("configuration: {config:?}");

    // The dashboard cannot start without its dataset.
    let dataset = data::loader::load_file(&config.data_path)?;
    let state = AppState::new(dataset, &config)?;

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 900.0])
            .with_min_inner_size([700.0, 500.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Launch Dash – SpaceX Launch Records",
        options,
        Box::new(|_cc| Ok(Box::new(LaunchDashApp::new(state)))),
    )
    .map_err(|e| anyhow!("{e}"))
}
