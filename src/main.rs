//! ScaleCal: host entry point.
//!
//! Wires the application core to host adapters and runs the operator
//! session on stdin/stdout.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                  Adapters (outer ring)                   │
//! │                                                          │
//! │  SimulatedLoadCell   StdioConsole         HostClock      │
//! │  (LoadCellPort)      (Console+EventSink)  (ClockPort)    │
//! │                                           HostDelay      │
//! │                                           (DelayNs)      │
//! │  ─────────────── Port Trait Boundary ────────────────    │
//! │                                                          │
//! │  ┌────────────────────────────────────────────────┐      │
//! │  │        SessionController (pure logic)          │      │
//! │  │  Menu FSM · CalibrationEngine · LiveReader     │      │
//! │  └────────────────────────────────────────────────┘      │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! Configuration is read from the JSON file named by the first argument,
//! or by `SCALECAL_CONFIG`, falling back to built-in defaults.  Log level
//! follows `RUST_LOG` (default `info`); logs go to stderr so they never
//! interleave with the operator text on stdout.
#![deny(unused_must_use)]

use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};
use log::{info, warn};

use scalecal::adapters::console::StdioConsole;
use scalecal::adapters::sim_load_cell::SimulatedLoadCell;
use scalecal::adapters::time::{HostClock, HostDelay};
use scalecal::app::ports::{ConsoleError, ConsolePort};
use scalecal::app::service::{SessionController, wait_for_sensor};
use scalecal::config::SystemConfig;
use scalecal::error::Error;

const CONFIG_ENV: &str = "SCALECAL_CONFIG";

fn config_path() -> Option<PathBuf> {
    std::env::args_os()
        .nth(1)
        .or_else(|| std::env::var_os(CONFIG_ENV))
        .map(PathBuf::from)
}

fn load_config() -> Result<SystemConfig> {
    let Some(path) = config_path() else {
        info!("No config file given, using defaults");
        return Ok(SystemConfig::default());
    };

    let text = std::fs::read_to_string(&path)
        .with_context(|| format!("reading config {}", path.display()))?;
    let config: SystemConfig = serde_json::from_str(&text)
        .map_err(|e| anyhow!("parsing config {}: {}", path.display(), e))?;
    info!("Config loaded from {}", path.display());
    Ok(config)
}

fn main() -> Result<()> {
    // ── 1. Logging ────────────────────────────────────────────
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    info!("ScaleCal v{}", env!("CARGO_PKG_VERSION"));

    // ── 2. Configuration ──────────────────────────────────────
    let config = load_config()?;
    config.validate().map_err(Error::Config)?;

    // ── 3. Adapters ───────────────────────────────────────────
    let mut cell = SimulatedLoadCell::new(&config.sim);
    let mut console = StdioConsole::spawn().context("starting stdin reader")?;
    let mut clock = HostClock::new();
    let mut delay = HostDelay;

    // ── 4. Startup ────────────────────────────────────────────
    wait_for_sensor(&mut cell, &mut console, &mut delay, config.ready_retry_ms)?;
    console.write_line("Setup completed")?;

    // ── 5. Session loop ───────────────────────────────────────
    let mut session = SessionController::new(&config);
    match session.run(&mut cell, &mut console, &mut clock) {
        Err(Error::Console(ConsoleError::Closed)) => {
            info!(
                "Console closed after {} commands, exiting",
                session.commands_handled()
            );
            Ok(())
        }
        Err(e) => {
            warn!("Session ended: {}", e);
            Err(e.into())
        }
        Ok(()) => Ok(()),
    }
}
