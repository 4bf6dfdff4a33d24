//! Tick daemon entry point.
//!
//! Hosts the cooperative tick scheduler on a normal OS: a paced loop
//! stands in for the hardware timer interrupt and invokes the dispatcher
//! once per tick interval, with signal handling and diagnostics around
//! it. Registers a demo heartbeat callback and a startup callout as a
//! stand-in application.

mod diagnostics;
mod pacing;
mod signals;

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tick_common::SchedConfig;
use tick_core::{DefaultScheduler, Mode};
use tracing::{debug, info, warn};

use crate::diagnostics::Diagnostics;
use crate::pacing::TickPacer;
use crate::signals::SignalHandler;

/// Tick daemon command-line arguments.
#[derive(Parser, Debug)]
#[command(
    name = "tick-daemon",
    about = "Cooperative tick scheduler daemon - host harness for the tick scheduling core",
    version,
    long_about = None
)]
struct Args {
    /// Path to a scheduler configuration file (TOML).
    #[arg(long, short = 'c', value_name = "FILE")]
    config: Option<PathBuf>,

    /// Maximum ticks to run (0 = infinite).
    #[arg(long, default_value = "0")]
    max_ticks: u64,

    /// Heartbeat callback period in milliseconds.
    #[arg(long, default_value = "1000")]
    heartbeat_ms: u32,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long, short = 'l', default_value = "info")]
    log_level: String,
}

fn main() -> Result<()> {
    let args = Args::parse();

    init_logging(&args.log_level);

    info!(version = env!("CARGO_PKG_VERSION"), "Starting tick daemon");

    let config = load_config(&args)?;
    info!(
        clock_hz = config.clock_hz,
        tick_interval_us = config.tick_interval.as_micros() as u64,
        ticks_per_ms = config.ticks_per_ms,
        "Configuration loaded"
    );

    let signal_handler = SignalHandler::new().context("Failed to set up signal handlers")?;
    let diag = Diagnostics::new();

    run_daemon(&config, &args, &signal_handler, &diag)
}

/// Initialize logging with the specified log level.
fn init_logging(level: &str) {
    let filter = format!(
        "tick_daemon={},tick_core={},tick_common={}",
        level, level, level
    );

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&filter)),
        )
        .with_target(true)
        .init();
}

/// Load configuration from file or use defaults.
///
/// Resolution priority (first existing file wins):
/// 1. Command-line `--config` argument
/// 2. `TICK_CONFIG_PATH` environment variable
/// 3. `/etc/tick-sched/config.toml` (system path)
/// 4. `config/default.toml` (local development)
/// 5. Built-in defaults
fn load_config(args: &Args) -> Result<SchedConfig> {
    if let Some(config_path) = &args.config {
        info!(?config_path, "Loading config from command-line argument");
        return SchedConfig::from_file(config_path)
            .with_context(|| format!("Failed to load config from {:?}", config_path));
    }

    if let Ok(env_path) = std::env::var("TICK_CONFIG_PATH") {
        let config_path = PathBuf::from(&env_path);
        if config_path.exists() {
            info!(?config_path, "Loading config from TICK_CONFIG_PATH");
            return SchedConfig::from_file(&config_path).with_context(|| {
                format!("Failed to load config from TICK_CONFIG_PATH={:?}", env_path)
            });
        }
        warn!(
            path = %env_path,
            "TICK_CONFIG_PATH set but file does not exist, checking other locations"
        );
    }

    let system_path = PathBuf::from("/etc/tick-sched/config.toml");
    if system_path.exists() {
        info!(?system_path, "Loading config from system path");
        return SchedConfig::from_file(&system_path)
            .with_context(|| format!("Failed to load config from {:?}", system_path));
    }

    let local_path = PathBuf::from("config/default.toml");
    if local_path.exists() {
        info!(?local_path, "Loading config from local path");
        return SchedConfig::from_file(&local_path)
            .with_context(|| format!("Failed to load config from {:?}", local_path));
    }

    info!("No config file found, using built-in defaults");
    Ok(SchedConfig::default())
}

/// Build the scheduler, wire the demo registrations, and drive the paced
/// tick loop until shutdown.
fn run_daemon(
    config: &SchedConfig,
    args: &Args,
    signal_handler: &SignalHandler,
    diag: &Diagnostics,
) -> Result<()> {
    let mut scheduler = DefaultScheduler::new(config);
    info!(
        timing_multiplier = scheduler.timing_multiplier(),
        "Scheduler initialized"
    );

    // Demo registrations: a periodic heartbeat enabled up front and a
    // one-shot settle callout, wired at boot the way application tasks
    // would be.
    let heartbeats = Arc::new(AtomicU64::new(0));
    let beats = Arc::clone(&heartbeats);
    let heartbeat = scheduler
        .register_callback(
            Box::new(move || {
                let n = beats.fetch_add(1, Ordering::Relaxed) + 1;
                info!(beat = n, "heartbeat");
            }),
            args.heartbeat_ms,
        )
        .context("Failed to register heartbeat callback")?;
    scheduler.set_callback_mode(heartbeat, Mode::Enabled);

    scheduler
        .register_callout(
            Box::new(|| {
                info!("startup settle complete");
            }),
            100,
        )
        .context("Failed to register startup callout")?;

    run_tick_loop(&mut scheduler, config, args.max_ticks, signal_handler, diag);

    // Final report
    let report = diag.report(scheduler.now().raw(), scheduler.metrics());
    info!(report = %report.to_json(), "Daemon shutdown complete");

    Ok(())
}

/// The paced tick loop: one dispatcher invocation per tick interval.
fn run_tick_loop(
    scheduler: &mut DefaultScheduler,
    config: &SchedConfig,
    max_ticks: u64,
    signal_handler: &SignalHandler,
    diag: &Diagnostics,
) {
    let mut pacer = TickPacer::new(config.tick_interval);
    // Report cadence in ticks, derived from the wall-clock interval.
    let report_every = config.report.enabled.then(|| {
        let per_tick = config.tick_interval.as_nanos().max(1);
        let ticks = config.report.interval.as_nanos() / per_tick;
        u64::try_from(ticks.max(1)).unwrap_or(u64::MAX)
    });

    info!("Entering tick loop");
    let mut ticks_run = 0u64;

    loop {
        if signal_handler.shutdown_requested() {
            info!("Shutdown signal received, leaving tick loop");
            break;
        }

        pacer.wait();
        scheduler.tick();
        ticks_run += 1;

        let report_due = report_every.is_some_and(|every| ticks_run % every == 0);
        if report_due || signal_handler.take_report_request() {
            let report = diag.report(scheduler.now().raw(), scheduler.metrics());
            info!(report = %report.to_json(), "Periodic status");
        }

        if max_ticks > 0 && ticks_run >= max_ticks {
            info!(ticks = ticks_run, "Maximum tick count reached");
            break;
        }
    }

    debug!(ticks = ticks_run, "Tick loop exited");
}
