//! Operator-facing text for calibration events.
//!
//! Every console adapter renders [`CalEvent`]s through [`render_event`], so
//! the wording on a UART, on stdout and in test transcripts is identical.

use core::fmt::{self, Write};

use heapless::String;

use super::events::CalEvent;
use super::ports::{ConsoleError, ConsolePort};

const TEXT_CAPACITY: usize = 96;

/// Format into a fixed buffer and write it as one line.  A formatted
/// piece that does not fit in the buffer is dropped.
pub fn write_line_fmt(
    console: &mut (impl ConsolePort + ?Sized),
    args: fmt::Arguments<'_>,
) -> Result<(), ConsoleError> {
    let mut line: String<TEXT_CAPACITY> = String::new();
    let _ = line.write_fmt(args);
    console.write_line(&line)
}

/// Write the text lines for one event.
pub fn render_event(
    event: &CalEvent,
    console: &mut (impl ConsolePort + ?Sized),
) -> Result<(), ConsoleError> {
    match *event {
        CalEvent::ZeroAcquireStarted => console.write_line("Find zero factor ......."),
        CalEvent::ZeroAcquired { zero_factor } => {
            console.write_line("=== Find zero factor finished ===")?;
            write_line_fmt(console, format_args!("Zero factor now = {}", zero_factor))
        }
        CalEvent::SearchProgress(s) => {
            write_line_fmt(
                console,
                format_args!("{:.2} kg calibration_factor: {}", s.reading_kg, s.factor),
            )?;
            write_line_fmt(console, format_args!("{} , {}", s.target_q, s.reading_q))
        }
        CalEvent::SearchConverged { factor, .. } => {
            console.write_line("=== Calibration finished ===")?;
            write_line_fmt(console, format_args!("Calibrate factor now = {}", factor))
        }
        CalEvent::SearchAborted { .. } => {
            console.write_line("Infinity calibration detect! will return to menu (ABORT)")
        }
        CalEvent::SearchStepRejected { factor, .. } => write_line_fmt(
            console,
            format_args!(
                "Next step would set calibration factor {} to 0, will return to menu (ABORT)",
                factor
            ),
        ),
        CalEvent::SearchLimitReached { factor, iterations } => {
            write_line_fmt(
                console,
                format_args!(
                    "No convergence after {} readings, will return to menu (ABORT)",
                    iterations
                ),
            )?;
            write_line_fmt(console, format_args!("Calibrate factor now = {}", factor))
        }
        CalEvent::ZeroFactorRefused => {
            console.write_line("Calibration factor is 0! Set it with command 4 first")
        }
        CalEvent::ZeroOverridden { from, to } => write_line_fmt(
            console,
            format_args!("Zero factor will change from {} to => {}", from, to),
        ),
        CalEvent::CalibrationOverridden { from, to } => write_line_fmt(
            console,
            format_args!("Calibrate factor will change from {} to => {}", from, to),
        ),
        CalEvent::LiveReadStarted { .. } => {
            console.write_line("Start read loop enter 'x' to return to menu")
        }
        CalEvent::LiveReading { kg } => {
            write_line_fmt(console, format_args!("Weight: {:.2} kg", kg))
        }
        CalEvent::LiveReadStopped { .. } => console.write_line("Read loop stopped"),
    }
}
