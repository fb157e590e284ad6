//! jotner: pan and zoom around a screenshot of your desktop

use anyhow::Result;
use clap::Parser;
use jotner::{launch_viewer, CaptureSource, Cli, ViewerConfig};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let config = ViewerConfig::resolve(&cli)?;

    tracing::info!("jotner v{}", jotner::VERSION);
    tracing::info!(
        "Refresh every {}us, zoom sensitivity {}, panning sensitivity {}",
        config.refresh_interval_micros,
        config.zoom_sensitivity,
        config.pan_sensitivity
    );

    let source = CaptureSource::from_image_arg(cli.image);
    launch_viewer(config, &source)
}
