use std::path::PathBuf;

use anyhow::{bail, Context};
use clap::Parser;
use eframe::egui;

use quad_picker::app::{window_title, ViewerApp};
use quad_picker::config::ViewerConfig;

/// Pan/zoom image viewer. Right-drag to place corners, Enter saves them.
#[derive(Parser, Debug)]
#[command(name = "quad-picker", version, about)]
struct Cli {
    /// Image to open on startup
    image: Option<PathBuf>,

    /// JSON settings file
    #[arg(long)]
    config: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => ViewerConfig::load(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => ViewerConfig::default(),
    };

    if let Some(ref path) = cli.image {
        if !path.exists() {
            bail!("File not found: {}", path.display());
        }
    }

    let title = window_title(
        cli.image
            .as_deref()
            .and_then(|p| p.file_name())
            .and_then(|n| n.to_str()),
    );

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 800.0])
            .with_min_inner_size([300.0, 300.0])
            .with_title(&title),
        ..Default::default()
    };

    let image = cli.image;
    eframe::run_native(
        "quad-picker",
        options,
        Box::new(move |_cc| Ok(Box::new(ViewerApp::new(config, image)))),
    )
    .map_err(|err| anyhow::anyhow!("Failed to run eframe: {err}"))
}
