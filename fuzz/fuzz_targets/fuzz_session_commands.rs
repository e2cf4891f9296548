//! Fuzz target: `SessionController` menu loop
//!
//! Treats the input as everything an operator could type and runs the
//! full session against an ideal load cell until the script runs out.
//! The session must end with `Closed` and never with a panic, and the
//! calibration factor must never be zero after a search step.
//!
//! cargo fuzz run fuzz_session_commands

#![no_main]

use std::collections::VecDeque;

use libfuzzer_sys::fuzz_target;
use scalecal::app::events::CalEvent;
use scalecal::app::ports::{ClockPort, ConsoleError, ConsolePort, EventSink, LoadCellPort};
use scalecal::app::render::render_event;
use scalecal::app::service::SessionController;
use scalecal::config::SystemConfig;
use scalecal::error::Error;

/// Ideal bridge: reading in lb is `k / scale`.
struct Bridge {
    scale: f32,
}

impl LoadCellPort for Bridge {
    fn is_ready(&mut self) -> bool {
        true
    }
    fn set_scale(&mut self, factor: f32) {
        assert!(factor != 0.0, "zero divisor reached the sensor");
        self.scale = factor;
    }
    fn tare(&mut self) {}
    fn read_raw(&mut self) -> i32 {
        84_312
    }
    fn read_units(&mut self) -> f32 {
        661_387.0 / self.scale
    }
}

/// Bytes serve both blocking reads and live-read polls.
struct Script {
    bytes: VecDeque<u8>,
}

impl ConsolePort for Script {
    fn read_byte(&mut self) -> Result<u8, ConsoleError> {
        self.bytes.pop_front().ok_or(ConsoleError::Closed)
    }
    fn poll_byte(&mut self) -> Result<Option<u8>, ConsoleError> {
        self.bytes.pop_front().map(Some).ok_or(ConsoleError::Closed)
    }
    fn write_str(&mut self, _s: &str) -> Result<(), ConsoleError> {
        Ok(())
    }
}

impl EventSink for Script {
    fn emit(&mut self, event: &CalEvent) {
        let _ = render_event(event, self);
    }
}

struct Tick(u64);

impl ClockPort for Tick {
    fn now_ms(&mut self) -> u64 {
        self.0 += 250;
        self.0
    }
}

fuzz_target!(|data: &[u8]| {
    // Cap the search so a target far from the ideal bridge cannot stall.
    let config = SystemConfig {
        max_search_iterations: Some(2_000),
        ..SystemConfig::default()
    };
    let mut session = SessionController::new(&config);
    let mut cell = Bridge { scale: 1.0 };
    let mut io = Script {
        bytes: data.iter().copied().collect(),
    };
    let mut clock = Tick(0);

    let result = session.run(&mut cell, &mut io, &mut clock);
    assert_eq!(result, Err(Error::Console(ConsoleError::Closed)));
});
