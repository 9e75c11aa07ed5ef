#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that runs Logisti-Co headless.

mod config;
mod headless;
mod present;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use logistico_core::Waypoint;
use logistico_system_control::{Control, ScriptedInput};
use logistico_system_session::Session;
use logistico_world::Factory;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::{config::GameConfig, headless::LogBackend, present::ScenePresenter};

/// Runs the Logisti-Co factory simulation without a window.
#[derive(Debug, Parser)]
#[command(name = "logistico", version)]
struct Args {
    /// Game configuration file in TOML format.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Stop after this many ticks even if the game is still running.
    #[arg(long, value_name = "N")]
    ticks: Option<u64>,

    /// Left-click at X,Y on consecutive ticks, starting with the first.
    #[arg(long, value_name = "X,Y", value_parser = parse_point)]
    place: Vec<Waypoint>,

    /// Log a HUD summary every N frames; 0 disables the reports.
    #[arg(long, value_name = "N", default_value_t = 0)]
    report_every: u64,
}

fn parse_point(value: &str) -> Result<Waypoint, String> {
    let (x, y) = value
        .split_once(',')
        .ok_or_else(|| format!("expected X,Y but found `{value}`"))?;
    let x = x
        .trim()
        .parse()
        .map_err(|_| format!("invalid x coordinate `{x}`"))?;
    let y = y
        .trim()
        .parse()
        .map_err(|_| format!("invalid y coordinate `{y}`"))?;
    Ok(Waypoint::new(x, y))
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();
}

/// Entry point for the Logisti-Co command-line interface.
fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing();

    let (config, base_dir) = match &args.config {
        Some(path) => (
            GameConfig::load(path)?,
            path.parent().map(Path::to_path_buf).unwrap_or_default(),
        ),
        None => (GameConfig::default(), PathBuf::from(".")),
    };
    let assets = config.asset_bundle(&base_dir)?;
    let factory = Factory::with_config(config.factory_config(&assets))
        .context("game config describes an unplayable floor")?;

    let mut session = Session::new(
        factory,
        config.package_source(),
        Control::new(config.blueprint()),
        config.max_failed,
    );
    let mut input = ScriptedInput::clicks_at(args.place);
    let mut presenter = ScenePresenter::new(
        LogBackend::new(args.report_every, assets.clone()),
        config.max_failed,
        assets.package_size(),
    );

    let summary = session.run(args.ticks, &mut input, &mut presenter)?;

    for line in presenter.scene(session.factory()).hud.lines() {
        println!("{line}");
    }
    println!("Stopped after {} ticks ({:?}).", summary.ticks, summary.outcome);
    Ok(())
}
