//! Session controller: the menu loop around the calibration engine.
//!
//! [`SessionController`] owns the [`CalibrationEngine`] and the live-read
//! pacing.  All I/O flows through port traits passed in at call sites,
//! so the whole session can be driven by scripted fakes.
//!
//! ```text
//!            ┌────────┐  print banner   ┌─────────────────┐
//!   start ─▶ │  Menu  │ ──────────────▶ │ AwaitingCommand │ ◀─┐ invalid byte:
//!            └────────┘                 └─────────────────┘ ──┘ error line
//!                ▲                              │ '1'..'5'
//!                │ handler returns              ▼
//!                │                      ┌─────────────────┐
//!                └───────────────────── │   Dispatching   │
//!                                       └─────────────────┘
//! ```
//!
//! The only way out of the loop is a console error.

use embedded_hal::delay::DelayNs;
use log::{info, warn};

use crate::calibration::CalibrationEngine;
use crate::config::SystemConfig;
use crate::error::Result;

use super::commands::SessionCommand;
use super::input::{parse_number, read_line};
use super::live_read::LiveReader;
use super::ports::{ClockPort, ConsolePort, EventSink, LoadCellPort};
use super::render::write_line_fmt;

const BANNER_RULE: &str = "======================================================";

/// Where the controller is in its menu cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Menu,
    AwaitingCommand,
    Dispatching(SessionCommand),
}

/// The interactive controller.
pub struct SessionController {
    engine: CalibrationEngine,
    live: LiveReader,
    strict_numeric_input: bool,
    skip_whitespace_commands: bool,
    state: SessionState,
    commands_handled: u64,
}

impl SessionController {
    pub fn new(config: &SystemConfig) -> Self {
        Self {
            engine: CalibrationEngine::new(config),
            live: LiveReader::new(config.read_interval_ms),
            strict_numeric_input: config.strict_numeric_input,
            skip_whitespace_commands: config.skip_whitespace_commands,
            state: SessionState::Menu,
            commands_handled: 0,
        }
    }

    // ── Queries ───────────────────────────────────────────────

    pub fn engine(&self) -> &CalibrationEngine {
        &self.engine
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Commands dispatched since startup (invalid bytes excluded).
    pub fn commands_handled(&self) -> u64 {
        self.commands_handled
    }

    // ── Main loop ─────────────────────────────────────────────

    /// Run menu cycles forever.  Returns only when the console fails.
    pub fn run(
        &mut self,
        cell: &mut impl LoadCellPort,
        io: &mut (impl ConsolePort + EventSink),
        clock: &mut impl ClockPort,
    ) -> Result<()> {
        loop {
            self.run_once(cell, io, clock)?;
        }
    }

    /// One full cycle: banner, wait for a valid command, run its handler.
    pub fn run_once(
        &mut self,
        cell: &mut impl LoadCellPort,
        io: &mut (impl ConsolePort + EventSink),
        clock: &mut impl ClockPort,
    ) -> Result<SessionCommand> {
        self.show_menu(io)?;
        let cmd = self.next_command(io)?;
        self.dispatch(cmd, cell, io, clock)?;
        Ok(cmd)
    }

    /// Print the five-option banner and move to `AwaitingCommand`.
    pub fn show_menu(&mut self, io: &mut impl ConsolePort) -> Result<()> {
        self.state = SessionState::Menu;
        io.write_line(BANNER_RULE)?;
        for cmd in SessionCommand::ALL {
            if let Some(key) = cmd.key() {
                write_line_fmt(io, format_args!("Enter {} {}", key, cmd.description()))?;
            }
        }
        io.write_line(BANNER_RULE)?;
        self.state = SessionState::AwaitingCommand;
        Ok(())
    }

    /// Block until a menu key arrives.
    ///
    /// Every unknown byte gets an error line and the wait continues,
    /// including the line ending a terminal sends after the key.  With
    /// `skip_whitespace_commands` set, whitespace is dropped silently.
    pub fn next_command(&mut self, io: &mut impl ConsolePort) -> Result<SessionCommand> {
        self.state = SessionState::AwaitingCommand;
        loop {
            let b = io.read_byte()?;
            match SessionCommand::from_byte(b) {
                SessionCommand::Invalid(b)
                    if self.skip_whitespace_commands && b.is_ascii_whitespace() => {}
                SessionCommand::Invalid(b) => {
                    warn!("Unknown command byte 0x{:02x}", b);
                    io.write_line("Error no command found! Please enter command again")?;
                }
                cmd => return Ok(cmd),
            }
        }
    }

    /// Run the handler for `cmd`, then return to `Menu`.
    pub fn dispatch(
        &mut self,
        cmd: SessionCommand,
        cell: &mut impl LoadCellPort,
        io: &mut (impl ConsolePort + EventSink),
        clock: &mut impl ClockPort,
    ) -> Result<()> {
        self.state = SessionState::Dispatching(cmd);
        info!("Dispatching {:?}", cmd);

        match cmd {
            SessionCommand::AcquireZero => {
                self.engine.acquire_zero(cell, io);
            }
            SessionCommand::AutoCalibrate => self.handle_auto_calibrate(cell, io)?,
            SessionCommand::SetZeroManual => self.handle_set_zero(io)?,
            SessionCommand::SetCalibrationManual => self.handle_set_calibration(io)?,
            SessionCommand::StreamRead => {
                self.live.run(&self.engine, cell, io, clock)?;
            }
            SessionCommand::Invalid(_) => {
                io.write_line("Error please try again")?;
            }
        }

        if !matches!(cmd, SessionCommand::Invalid(_)) {
            self.commands_handled += 1;
        }
        self.state = SessionState::Menu;
        Ok(())
    }

    // ── Handlers ──────────────────────────────────────────────

    fn handle_auto_calibrate(
        &mut self,
        cell: &mut impl LoadCellPort,
        io: &mut (impl ConsolePort + EventSink),
    ) -> Result<()> {
        io.write_line("Please enter real weight to auto calibration")?;
        io.write_line("Be sure to put weight on scale first before entering value")?;
        let Some(target_kg) = self.read_number(io)? else {
            return Ok(());
        };
        write_line_fmt(
            io,
            format_args!("Start calibrating at target weight: {:.2}", target_kg),
        )?;
        self.engine.auto_calibrate(target_kg, cell, io);
        Ok(())
    }

    fn handle_set_zero(&mut self, io: &mut (impl ConsolePort + EventSink)) -> Result<()> {
        io.write_line("Please enter zero factor (float)")?;
        write_line_fmt(
            io,
            format_args!("Current value is: {}", self.engine.zero_factor()),
        )?;
        if let Some(value) = self.read_number(io)? {
            self.engine.set_zero_manual(value, io);
        }
        Ok(())
    }

    fn handle_set_calibration(&mut self, io: &mut (impl ConsolePort + EventSink)) -> Result<()> {
        io.write_line("Please enter Calibrate factor (float)")?;
        write_line_fmt(
            io,
            format_args!("Current value is: {}", self.engine.calibration_factor()),
        )?;
        if let Some(value) = self.read_number(io)? {
            self.engine.set_calibration_manual(value, io);
        }
        Ok(())
    }

    /// Read one line as a number.  `None` means strict mode rejected it.
    fn read_number(&self, io: &mut impl ConsolePort) -> Result<Option<f32>> {
        let line = read_line(io)?;
        let parsed = parse_number(&line);
        if !parsed.coerced {
            return Ok(Some(parsed.value));
        }
        if self.strict_numeric_input {
            warn!("Rejected non-numeric input {:?}", line.as_str());
            io.write_line("Invalid number, returning to menu")?;
            return Ok(None);
        }
        warn!("Non-numeric input {:?} treated as 0", line.as_str());
        Ok(Some(0.0))
    }
}

// ── Startup ───────────────────────────────────────────────────

/// Block until the load cell reports ready, printing a status line per
/// attempt and waiting `retry_ms` between attempts.  Returns the number
/// of failed attempts.  Runs once at startup; nothing re-checks later.
pub fn wait_for_sensor(
    cell: &mut impl LoadCellPort,
    io: &mut impl ConsolePort,
    delay: &mut impl DelayNs,
    retry_ms: u32,
) -> Result<u32> {
    let mut failed: u32 = 0;
    while !cell.is_ready() {
        failed = failed.saturating_add(1);
        warn!("Load cell not ready (attempt {})", failed);
        io.write_line("HX711 not found ..")?;
        delay.delay_ms(retry_ms);
    }
    info!("Load cell ready after {} failed attempts", failed);
    io.write_line("HX711 ready!")?;
    Ok(failed)
}
