//! SessionController menu cycle, command decoding and numeric input.

use scalecal::app::commands::SessionCommand;
use scalecal::app::events::CalEvent;
use scalecal::app::ports::ConsoleError;
use scalecal::app::service::{SessionController, SessionState};
use scalecal::config::SystemConfig;
use scalecal::error::Error;

use crate::mock_hw::{FakeClock, FakeLoadCell, ScriptedConsole};

fn session() -> SessionController {
    SessionController::new(&SystemConfig::default())
}

fn strict_session() -> SessionController {
    SessionController::new(&SystemConfig {
        strict_numeric_input: true,
        ..SystemConfig::default()
    })
}

// ── Menu ──────────────────────────────────────────────────────

#[test]
fn banner_lists_every_command() {
    let mut s = session();
    let mut cell = FakeLoadCell::fixed(0.0);
    let mut io = ScriptedConsole::new(b"1");
    let mut clock = FakeClock::new(100);

    let cmd = s.run_once(&mut cell, &mut io, &mut clock).unwrap();

    assert_eq!(cmd, SessionCommand::AcquireZero);
    let lines = io.lines();
    assert!(lines[0].starts_with("====="));
    assert_eq!(
        lines[1],
        "Enter 1 to find and auto set zero factor (Please remove item from scale first)"
    );
    assert_eq!(lines[2], "Enter 2 to auto calibration factor mode");
    assert_eq!(lines[3], "Enter 3 to manually config zero factor");
    assert_eq!(lines[4], "Enter 4 to manually config calibration factor");
    assert_eq!(lines[5], "Enter 5 to show weight on scales");
    assert_eq!(lines[6], lines[0]);
    assert_eq!(s.state(), SessionState::Menu);
    assert_eq!(s.commands_handled(), 1);
}

fn error_lines(io: &ScriptedConsole) -> usize {
    io.lines()
        .iter()
        .filter(|l| **l == "Error no command found! Please enter command again")
        .count()
}

#[test]
fn every_unknown_byte_is_reported() {
    let mut s = session();
    let mut cell = FakeLoadCell::fixed(0.0).with_raw(7);
    let mut io = ScriptedConsole::new(b"z\r\n9 1");
    let mut clock = FakeClock::new(100);

    let cmd = s.run_once(&mut cell, &mut io, &mut clock).unwrap();

    assert_eq!(cmd, SessionCommand::AcquireZero);
    // 'z', CR, LF, '9' and the space.
    assert_eq!(error_lines(&io), 5);
    assert_eq!(s.engine().zero_factor(), 7);
    assert_eq!(s.commands_handled(), 1);
}

#[test]
fn whitespace_is_skipped_when_configured() {
    let mut s = SessionController::new(&SystemConfig {
        skip_whitespace_commands: true,
        ..SystemConfig::default()
    });
    let mut cell = FakeLoadCell::fixed(0.0).with_raw(7);
    let mut io = ScriptedConsole::new(b"z\r\n9 \t1");
    let mut clock = FakeClock::new(100);

    let cmd = s.run_once(&mut cell, &mut io, &mut clock).unwrap();

    assert_eq!(cmd, SessionCommand::AcquireZero);
    // Only 'z' and '9'.
    assert_eq!(error_lines(&io), 2);
}

#[test]
fn closed_console_surfaces_as_error() {
    let mut s = session();
    let mut cell = FakeLoadCell::fixed(0.0);
    let mut io = ScriptedConsole::new(b"");
    let mut clock = FakeClock::new(100);

    let result = s.run_once(&mut cell, &mut io, &mut clock);

    assert_eq!(result, Err(Error::Console(ConsoleError::Closed)));
    assert_eq!(s.state(), SessionState::AwaitingCommand);
}

// ── Manual overrides ──────────────────────────────────────────

#[test]
fn manual_zero_truncates_fraction() {
    let mut s = session();
    let mut cell = FakeLoadCell::fixed(0.0);
    let mut io = ScriptedConsole::new(b"3\r\n3.5\r\n");
    let mut clock = FakeClock::new(100);

    s.run_once(&mut cell, &mut io, &mut clock).unwrap();

    assert_eq!(s.engine().zero_factor(), 3);
    assert!(io.has_line("Please enter zero factor (float)"));
    assert!(io.has_line("Current value is: 0"));
    assert!(io.has_line("Zero factor will change from 0 to => 3"));
}

#[test]
fn manual_zero_garbage_becomes_zero() {
    let mut s = session();
    let mut cell = FakeLoadCell::fixed(0.0).with_raw(512);
    let mut io = ScriptedConsole::new(b"1\n3\nnot-a-number\n");
    let mut clock = FakeClock::new(100);

    s.run_once(&mut cell, &mut io, &mut clock).unwrap();
    assert_eq!(s.engine().zero_factor(), 512);

    s.run_once(&mut cell, &mut io, &mut clock).unwrap();
    assert_eq!(s.engine().zero_factor(), 0);
    assert!(io.has_line("Current value is: 512"));
    assert!(io.has_line("Zero factor will change from 512 to => 0"));
}

#[test]
fn manual_value_ignores_trailing_text() {
    let mut s = session();
    let mut cell = FakeLoadCell::fixed(0.0);
    let mut io = ScriptedConsole::new(b"4\n42000.9 counts\n");
    let mut clock = FakeClock::new(100);

    s.run_once(&mut cell, &mut io, &mut clock).unwrap();

    assert_eq!(s.engine().calibration_factor(), 42_000);
    assert!(io.has_line("Current value is: 60000"));
    assert!(io.has_line("Calibrate factor will change from 60000 to => 42000"));
}

#[test]
fn garbage_becomes_zero_and_blocks_reading() {
    let mut s = session();
    let mut cell = FakeLoadCell::fixed(1.0);
    let mut io = ScriptedConsole::new(b"4\nnot-a-number\n5").with_exit_after(3, b'x');
    let mut clock = FakeClock::new(100);

    s.run_once(&mut cell, &mut io, &mut clock).unwrap();
    assert_eq!(s.engine().calibration_factor(), 0);
    assert!(io.has_line("Calibrate factor will change from 60000 to => 0"));

    let cmd = s.run_once(&mut cell, &mut io, &mut clock).unwrap();
    assert_eq!(cmd, SessionCommand::StreamRead);
    assert!(io.has_line("Calibration factor is 0! Set it with command 4 first"));
    assert_eq!(io.polls_made, 0);
    assert!(cell.calls.is_empty());
}

#[test]
fn strict_mode_rejects_garbage() {
    let mut s = strict_session();
    let mut cell = FakeLoadCell::fixed(0.0);
    let mut io = ScriptedConsole::new(b"4\nabc\n");
    let mut clock = FakeClock::new(100);

    s.run_once(&mut cell, &mut io, &mut clock).unwrap();

    assert_eq!(s.engine().calibration_factor(), 60_000);
    assert!(io.has_line("Invalid number, returning to menu"));
    assert!(
        !io.events
            .iter()
            .any(|e| matches!(e, CalEvent::CalibrationOverridden { .. }))
    );
}

#[test]
fn strict_mode_still_accepts_numbers() {
    let mut s = strict_session();
    let mut cell = FakeLoadCell::fixed(0.0);
    let mut io = ScriptedConsole::new(b"3\n-250\n");
    let mut clock = FakeClock::new(100);

    s.run_once(&mut cell, &mut io, &mut clock).unwrap();

    assert_eq!(s.engine().zero_factor(), -250);
}

// ── Auto-calibration via the menu ─────────────────────────────

#[test]
fn auto_calibrate_prompts_then_searches() {
    let mut s = session();
    let mut cell = FakeLoadCell::inverse(300_000.0);
    let mut io = ScriptedConsole::new(b"2\r\n5.00\r\n");
    let mut clock = FakeClock::new(100);

    let cmd = s.run_once(&mut cell, &mut io, &mut clock).unwrap();

    assert_eq!(cmd, SessionCommand::AutoCalibrate);
    let lines = io.lines();
    let prompt = lines
        .iter()
        .position(|l| *l == "Please enter real weight to auto calibration")
        .expect("prompt shown");
    assert_eq!(
        lines[prompt + 1],
        "Be sure to put weight on scale first before entering value"
    );
    assert_eq!(lines[prompt + 2], "Start calibrating at target weight: 5.00");
    assert!(io.has_line("Calibrate factor now = 60000"));
    assert_eq!(s.engine().calibration_factor(), 60_000);
}

#[test]
fn auto_calibrate_with_zero_factor_is_refused() {
    let mut s = session();
    let mut cell = FakeLoadCell::inverse(300_000.0);
    let mut io = ScriptedConsole::new(b"4\n0\n2\n5\n");
    let mut clock = FakeClock::new(100);

    s.run_once(&mut cell, &mut io, &mut clock).unwrap();
    s.run_once(&mut cell, &mut io, &mut clock).unwrap();

    assert_eq!(io.events.last(), Some(&CalEvent::ZeroFactorRefused));
    assert!(cell.calls.is_empty());
    assert_eq!(s.commands_handled(), 2);
}
