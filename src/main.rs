mod app;
mod bucket;
mod color;
mod data;
mod error;
mod playback;
mod state;
mod ui;

use std::path::Path;

use app::ExplorerApp;
use eframe::egui;
use state::AppState;

fn main() -> eframe::Result {
    env_logger::init();

    let mut state = AppState::default();

    // Optional CLI: a dataset to open at startup and an initial frequency
    // mode (daily | cumulative | 7day).
    let mut args = std::env::args().skip(1);
    if let Some(path) = args.next() {
        match data::loader::load_file(Path::new(&path)) {
            Ok(dataset) => {
                log::info!("Loaded {path}");
                state.set_dataset(dataset);
            }
            Err(e) => {
                log::error!("Failed to load {path}: {e:#}");
                state.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }
    if let Some(mode) = args.next() {
        // A bad mode spelling is a configuration error; surface it and
        // bail rather than guessing.
        state.mode = mode.parse().unwrap_or_else(|e| {
            eprintln!("{e}");
            std::process::exit(2);
        });
    }

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 800.0])
            .with_min_inner_size([600.0, 400.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Outbreak Explorer",
        options,
        Box::new(move |_cc| Ok(Box::new(ExplorerApp::new(state)))),
    )
}
