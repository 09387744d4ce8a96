#![forbid(unsafe_code)]

mod autostart;
mod cli;
mod config;
mod constants;
mod font;
mod gui;
mod i18n;
mod mode_switch;
mod network;
mod smoothing;
mod snapping;
mod state;
mod tray;
mod types;
mod widget;
mod x11_utils;

use anyhow::{Context, Result};
use clap::Parser;
use std::sync::Arc;
use std::sync::atomic::AtomicBool;
use tracing::{Level as TraceLevel, info, warn};
use tracing_subscriber::FmtSubscriber;

use autostart::XdgAutostart;
use cli::Cli;
use config::JsonStore;
use config::preferences::{COMPACT_MODE, WINDOW_POSITION};
use gui::{WidgetOptions, run_widget};
use network::{SpeedMonitor, SystemCounters};
use types::Position;
use x11_utils::{ScreenGeometry, X11Workarea};

fn init_logging() -> Result<()> {
    // Parse log level from environment variable
    let log_level = match std::env::var("LOG_LEVEL")
        .unwrap_or_else(|_| "info".to_string())
        .to_lowercase()
        .as_str()
    {
        "trace" => TraceLevel::TRACE,
        "debug" => TraceLevel::DEBUG,
        "warn" => TraceLevel::WARN,
        "error" => TraceLevel::ERROR,
        _ => TraceLevel::INFO,
    };

    let subscriber = FmtSubscriber::builder().with_max_level(log_level).finish();
    tracing::subscriber::set_global_default(subscriber).context("Failed to install tracing subscriber")
}

#[cfg(unix)]
fn register_shutdown_signals(flag: &Arc<AtomicBool>) -> Result<()> {
    use signal_hook::consts::{SIGINT, SIGTERM};

    for signal in [SIGINT, SIGTERM] {
        signal_hook::flag::register(signal, Arc::clone(flag))
            .with_context(|| format!("Failed to register handler for signal {signal}"))?;
    }
    Ok(())
}

#[cfg(not(unix))]
fn register_shutdown_signals(_flag: &Arc<AtomicBool>) -> Result<()> {
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging()?;
    cli.validate()?;
    info!(?cli, "Starting net-floater");

    let path = cli.config.clone().unwrap_or_else(JsonStore::default_path);
    let mut store = JsonStore::open(path);
    if cli.reset_position {
        info!("Discarding saved window position");
        store.set(WINDOW_POSITION, None::<Position>);
    }
    let compact = store.get(COMPACT_MODE, false);

    let autostart = XdgAutostart::for_current_exe()?;
    let monitor = SpeedMonitor::new(
        SystemCounters::new(cli.include_loopback),
        cli.sample_interval().as_secs_f64(),
    );
    let label_font = font::load_label_font(&cli.font);

    let screen: Option<Box<dyn ScreenGeometry>> = match X11Workarea::connect() {
        Ok(workarea) => Some(Box::new(workarea)),
        Err(e) => {
            warn!(error = ?e, "X11 work area unavailable, using monitor size");
            None
        }
    };

    let shutdown = Arc::new(AtomicBool::new(false));
    register_shutdown_signals(&shutdown)?;

    run_widget(
        WidgetOptions {
            store,
            autostart,
            monitor,
            label_font,
            screen,
            sample_interval: cli.sample_interval(),
            shutdown,
        },
        compact,
    )?;

    info!("net-floater exited cleanly");
    Ok(())
}
