mod app;
mod engine;
mod export;
mod layout;
mod render;
mod selection;
mod topology;
mod util;

use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};
use clap::Parser;

use crate::engine::TopologyView;
use crate::layout::{LayoutConfig, Viewport, jitter_rng};
use crate::topology::{SnapshotSource, load_snapshot};

#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Args {
    /// Topology snapshot JSON file, or `-` for stdin
    snapshot: Option<String>,

    /// Seed for the initial placement jitter
    #[arg(long)]
    seed: Option<u64>,

    /// Write the computed layout as JSON (`-` for stdout) instead of opening a window
    #[arg(long, value_name = "PATH")]
    export: Option<PathBuf>,

    #[arg(long, default_value_t = 800.0)]
    width: f32,

    #[arg(long, default_value_t = 500.0)]
    height: f32,

    #[arg(long, default_value = "info")]
    log_level: String,
}

fn init_logging(level: &str) -> Result<()> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .or_else(|_| tracing_subscriber::EnvFilter::try_new(level))
        .context("failed to create log filter")?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();

    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(&args.log_level)?;

    let source = SnapshotSource::from_arg(args.snapshot.as_deref());

    if let Some(target) = &args.export {
        let snapshot = load_snapshot(&source)?;
        let mut rng = jitter_rng(args.seed);
        let view = TopologyView::new(
            &snapshot,
            Viewport::measured(args.width, args.height),
            LayoutConfig::default(),
            &mut rng,
        );
        return export::export_layout(&view, target);
    }

    let options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default().with_inner_size([1440.0, 900.0]),
        ..Default::default()
    };

    let seed = args.seed;
    eframe::run_native(
        "agent-topology",
        options,
        Box::new(move |cc| Ok(Box::new(app::TopologyApp::new(cc, source.clone(), seed)))),
    )
    .map_err(|error| anyhow!("failed to run viewer: {error}"))
}
