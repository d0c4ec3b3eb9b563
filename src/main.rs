#![warn(clippy::all, rust_2018_idioms)]
#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")] // hide console window on Windows in release

use aztags::app::config::{self, ViewerConfig};
use aztags::app::logging;

fn main() -> anyhow::Result<()> {
    // Before anything else so early crashes still land in crash.log
    logging::install_panic_hook();

    // RUST_LOG may come from .env
    let dotenv = config::load_dotenv();
    if let Err(e) = logging::init_viewer_logging() {
        eprintln!("Failed to initialize logging: {}", e);
    }
    dotenv.log();

    tracing::info!(
        "aztags viewer {} ({}@{}) starting",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_BRANCH"),
        env!("GIT_COMMIT")
    );

    let config = ViewerConfig::from_env()?;

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([960.0, 720.0])
            .with_min_inner_size([480.0, 320.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Azure Tags",
        native_options,
        Box::new(move |cc| {
            let app = aztags::ViewerApp::new(cc, config)?;
            Ok(Box::new(app))
        }),
    )
    .map_err(|e| anyhow::anyhow!("viewer exited with error: {}", e))?;

    Ok(())
}
