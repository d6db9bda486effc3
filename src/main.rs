//! Race night player
//!
//! Plays race footage with AI commentary kept in step with the video.

mod config;
mod error;
mod media;
mod renderer;
mod sync;
mod types;
mod ui;

use crate::config::PlayerConfig;
use crate::types::race_media::{RaceCard, RaceMedia};
use crate::ui::app::RaceNightApp;
use anyhow::{Context, bail};
use clap::{ArgAction, Parser};
use gstreamer as gst;
use std::path::PathBuf;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "racenight-player")]
#[command(about = "Play race footage with synchronized commentary")]
struct Cli {
    /// JSON race card listing the evening's races
    #[arg(long, conflicts_with = "video")]
    card: Option<PathBuf>,
    /// Video URI or path for a single race
    #[arg(long)]
    video: Option<String>,
    /// Commentary audio URI or path for the single race
    #[arg(long, requires = "video")]
    commentary: Option<String>,
    #[arg(long, default_value = "race-1")]
    race_id: String,
    /// JSON player configuration
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long, default_value_t = false)]
    autoplay: bool,
    /// Resync commentary once it drifts this many seconds from the video
    #[arg(long)]
    drift_tolerance: Option<f64>,
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => tracing::Level::INFO,
        1 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };
    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env().add_directive(level.into()))
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn load_card(cli: &Cli) -> anyhow::Result<RaceCard> {
    if let Some(path) = &cli.card {
        return RaceCard::load_from_file(path)
            .with_context(|| format!("loading race card {}", path.display()));
    }
    match &cli.video {
        Some(video) => Ok(RaceCard::single(RaceMedia::new(
            cli.race_id.clone(),
            video.clone(),
            cli.commentary.clone(),
        ))),
        None => bail!("either --card or --video is required"),
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    gst::init().context("initializing GStreamer")?;

    let mut config = match &cli.config {
        Some(path) => PlayerConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => PlayerConfig::default(),
    };
    if cli.autoplay {
        config.autoplay = true;
    }
    if cli.drift_tolerance.is_some() {
        config.drift_tolerance_secs = cli.drift_tolerance;
    }
    let config = config.sanitized();

    let card = load_card(&cli)?;
    tracing::info!(event = %card.event_name, races = card.races.len(), "race card loaded");

    let app = RaceNightApp::new(card, config.clone()).context("mounting first race")?;

    let native_options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default()
            .with_inner_size([config.window_size.0, config.window_size.1]),
        ..Default::default()
    };
    eframe::run_native(
        "Race Night Player",
        native_options,
        Box::new(|_cc| Ok(Box::new(app))),
    )
    .map_err(|e| anyhow::anyhow!("{e}"))?;
    Ok(())
}
