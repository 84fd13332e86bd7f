// crates/skyfire/src/main.rs
//! Skyfire: a small arcade shooter.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use skyfire_core::{App, EngineConfig, EngineLoop};
use skyfire_game::{Game, GameSettings, HeadlessDevice};
use skyfire_scene::LayerKind;
use tracing::{error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Wall-clock step used to drive a headless run.
const HEADLESS_FRAME_DT: f64 = 1.0 / 60.0;

#[derive(Parser)]
#[command(name = "skyfire")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "A small arcade shooter", long_about = None)]
struct Cli {
    /// Log level (trace, debug, info, warn, error); RUST_LOG takes precedence
    #[arg(long, default_value = "info")]
    log: String,

    /// Engine config file (TOML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Asset directory, overriding the config
    #[arg(short, long)]
    assets: Option<PathBuf>,

    /// Simulate this many seconds without a window, then exit
    #[arg(long, value_name = "SECONDS")]
    headless: Option<f64>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log));
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let mut config = match &cli.config {
        Some(path) => EngineConfig::load(path)?,
        None => EngineConfig::default(),
    };
    if let Some(assets) = cli.assets {
        config.assets_dir = assets;
    }

    let settings = GameSettings {
        assets_dir: config.assets_dir.clone(),
        width: config.window.width,
        height: config.window.height,
        vsync: config.vsync,
    };

    match cli.headless {
        Some(seconds) => run_headless(&config, settings, seconds),
        None => {
            info!(assets = %config.assets_dir.display(), "Starting");
            App::new(config)
                .run(|device| Game::new(device, settings))
                .context("windowed run failed")
        }
    }
}

fn run_headless(config: &EngineConfig, settings: GameSettings, seconds: f64) -> Result<()> {
    info!(seconds, tick_rate = config.tick_rate, "Starting headless run");
    let mut game = Game::new(HeadlessDevice::new(), settings).context("loading the level")?;

    let mut engine_loop = EngineLoop::new(config.tick_rate);
    engine_loop.run_for(&mut game, seconds, HEADLESS_FRAME_DT);

    info!(
        ticks = engine_loop.total_ticks(),
        frames = engine_loop.frames_rendered(),
        sim_time = engine_loop.sim_time(),
        paused = game.paused,
        "Headless run finished"
    );
    for kind in LayerKind::ALL {
        info!(layer = ?kind, objects = game.scene.layer(kind).len(), "Live objects");
    }
    Ok(())
}
