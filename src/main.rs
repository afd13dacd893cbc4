mod app;
mod color;
mod config;
mod data;
mod pipeline;
mod state;
mod ui;

use std::path::Path;

use app::CostboardApp;
use config::DashboardConfig;
use eframe::egui;
use state::AppState;

fn main() -> eframe::Result {
    env_logger::init();

    // Optional override for classifier rules / driver triggers.
    let config = DashboardConfig::load_or_default(Path::new("costboard.json"));

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 800.0])
            .with_min_inner_size([600.0, 400.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Costboard – SLA Cost Analysis",
        options,
        Box::new(|_cc| Ok(Box::new(CostboardApp::new(AppState::with_config(config))))),
    )
}
