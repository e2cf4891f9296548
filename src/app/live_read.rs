//! Live weight streaming.
//!
//! Paced by a monotonic millisecond clock rather than sleeps, so the
//! exit-key poll runs on every pass and the cadence does not drift with
//! the time spent reading the sensor.  The calibration factor is latched
//! into the sensor once at entry.

use log::info;

use crate::calibration::CalibrationEngine;
use crate::units::lb_to_kg;

use super::commands::is_exit_key;
use super::events::CalEvent;
use super::ports::{ClockPort, ConsoleError, ConsolePort, EventSink, LoadCellPort};

pub struct LiveReader {
    interval_ms: u64,
}

impl LiveReader {
    pub fn new(interval_ms: u32) -> Self {
        Self {
            interval_ms: u64::from(interval_ms),
        }
    }

    /// Stream readings until `x`/`X` arrives.  Returns how many readings
    /// were shown.  Bytes other than the exit keys are discarded.
    pub fn run(
        &self,
        engine: &CalibrationEngine,
        cell: &mut impl LoadCellPort,
        io: &mut (impl ConsolePort + EventSink),
        clock: &mut impl ClockPort,
    ) -> Result<u32, ConsoleError> {
        if !engine.has_usable_factor() {
            io.emit(&CalEvent::ZeroFactorRefused);
            return Ok(0);
        }

        let factor = engine.calibration_factor();
        engine.apply_factor(cell);
        io.emit(&CalEvent::LiveReadStarted { factor });
        info!("Live read started at factor {}", factor);

        let mut readings: u32 = 0;
        let mut last_ms = clock.now_ms();

        loop {
            if io.poll_byte()?.is_some_and(is_exit_key) {
                info!("Live read stopped after {} readings", readings);
                io.emit(&CalEvent::LiveReadStopped { readings });
                return Ok(readings);
            }

            let now_ms = clock.now_ms();
            if now_ms.wrapping_sub(last_ms) >= self.interval_ms {
                let kg = lb_to_kg(cell.read_units());
                io.emit(&CalEvent::LiveReading { kg });
                readings = readings.saturating_add(1);
                last_ms = now_ms;
            }
        }
    }
}
