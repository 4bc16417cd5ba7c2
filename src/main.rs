mod app;
mod color;
mod config;
mod data;
mod state;
mod ui;

use app::CarDashboardApp;
use config::DashboardConfig;
use eframe::egui;
use state::AppState;

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let config = DashboardConfig::load(std::env::args().skip(1))?;
    log::debug!("Using {config:?}");

    let mut state = AppState::default();
    // A missing startup file is not fatal: the user can still pick one.
    if let Err(e) = state.open(&config.data_path) {
        log::debug!("Starting without a dataset: {e}");
    }

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([config.window_width, config.window_height])
            .with_min_inner_size([720.0, 480.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Car Dashboard – Vehicle Specifications",
        options,
        Box::new(move |cc| {
            // Install image loaders so egui can fetch and decode image URLs.
            egui_extras::install_image_loaders(&cc.egui_ctx);
            Ok(Box::new(CarDashboardApp::new(state)))
        }),
    )
    .map_err(|e| anyhow::anyhow!("running UI: {e}"))
}
