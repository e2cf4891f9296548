//! Port traits: the hexagonal boundary between domain logic and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ SessionController / CalibrationEngine
//! ```
//!
//! Driven adapters (load cell, console, clock, event sinks) implement these
//! traits.  The domain consumes them via generics, so the calibration core
//! never touches hardware directly.  Blocking delays use
//! [`embedded_hal::delay::DelayNs`] rather than a port of our own.

// ───────────────────────────────────────────────────────────────
// Load cell port (driven adapter: ADC bridge amplifier → domain)
// ───────────────────────────────────────────────────────────────

/// The HX711-style sensor interface.
///
/// Implementations own the tare offset and the scale divisor; the domain
/// only ever sets the divisor and asks for readings.  `read_units` is
/// `(raw - offset) / scale` in the interface's native unit (pounds).
pub trait LoadCellPort {
    /// `true` once the converter has synchronised with the hardware.
    fn is_ready(&mut self) -> bool;

    /// Set the linear divisor applied by [`read_units`](Self::read_units).
    fn set_scale(&mut self, factor: f32);

    /// Capture the current raw reading as the new zero offset.
    fn tare(&mut self);

    /// One raw reading, ignoring scale and offset.
    fn read_raw(&mut self) -> i32;

    /// One scale- and offset-adjusted reading in the native unit.
    fn read_units(&mut self) -> f32;

    /// Reset the divisor to 1 so readings are plain offset-adjusted counts.
    fn clear_scale(&mut self) {
        self.set_scale(1.0);
    }

    /// Average of `samples` raw readings.
    ///
    /// Summed in `i64` and divided with truncation toward zero, matching
    /// the integer average of the HX711 reference library.  `samples == 0`
    /// takes a single reading.
    fn read_raw_average(&mut self, samples: u8) -> i32 {
        let n = samples.max(1);
        let sum: i64 = (0..n).map(|_| i64::from(self.read_raw())).sum();
        (sum / i64::from(n)) as i32
    }
}

// ───────────────────────────────────────────────────────────────
// Console port (operator ↔ domain, serial-style text stream)
// ───────────────────────────────────────────────────────────────

/// Byte-oriented operator console (UART, USB-CDC, stdin/stdout).
pub trait ConsolePort {
    /// Block until one byte arrives.
    fn read_byte(&mut self) -> Result<u8, ConsoleError>;

    /// Return a byte if one is already buffered, without blocking.
    fn poll_byte(&mut self) -> Result<Option<u8>, ConsoleError>;

    /// Write text verbatim.
    fn write_str(&mut self, s: &str) -> Result<(), ConsoleError>;

    /// Write text followed by CRLF.
    fn write_line(&mut self, s: &str) -> Result<(), ConsoleError> {
        self.write_str(s)?;
        self.write_str("\r\n")
    }
}

// ───────────────────────────────────────────────────────────────
// Clock port
// ───────────────────────────────────────────────────────────────

/// Monotonic millisecond clock.
pub trait ClockPort {
    fn now_ms(&mut self) -> u64;
}

// ───────────────────────────────────────────────────────────────
// Event sink port (domain → console text / logging)
// ───────────────────────────────────────────────────────────────

/// The calibration engine emits structured
/// [`CalEvent`](super::events::CalEvent)s through this port.  Adapters
/// decide where they go (console text, log, test recorder).
pub trait EventSink {
    fn emit(&mut self, event: &super::events::CalEvent);
}

// ───────────────────────────────────────────────────────────────
// Error types
// ───────────────────────────────────────────────────────────────

/// Errors from [`ConsolePort`] operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsoleError {
    /// The input stream ended (EOF, port unplugged).
    Closed,
    /// Generic I/O error from the transport.
    Io,
}

impl core::fmt::Display for ConsoleError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Closed => write!(f, "console closed"),
            Self::Io => write!(f, "I/O error"),
        }
    }
}

impl std::error::Error for ConsoleError {}
