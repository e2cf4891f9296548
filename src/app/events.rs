//! Outbound calibration events.
//!
//! The [`CalibrationEngine`](crate::calibration::CalibrationEngine) and the
//! live-read loop emit these through the
//! [`EventSink`](super::ports::EventSink) port.  The console adapters turn
//! them into the operator-facing text lines; tests record them.

/// Structured events emitted by the calibration core.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CalEvent {
    /// Zero acquisition has started (scale cleared, about to tare).
    ZeroAcquireStarted,

    /// Zero acquisition finished with the averaged raw reading.
    ZeroAcquired { zero_factor: i32 },

    /// One iteration of the calibration-factor search.
    SearchProgress(SearchSample),

    /// Quantized live reading matched the quantized target.
    SearchConverged { factor: i32, iterations: u32 },

    /// Quantized live reading hit zero; the search gave up.
    SearchAborted { factor: i32, iterations: u32 },

    /// The next step would have set the factor to zero; the search gave up
    /// with the factor unchanged.
    SearchStepRejected { factor: i32, iterations: u32 },

    /// The configured iteration cap was reached without converging.
    SearchLimitReached { factor: i32, iterations: u32 },

    /// A handler refused to run because the calibration factor is zero.
    ZeroFactorRefused,

    /// The zero factor was overwritten by the operator.
    ZeroOverridden { from: i32, to: i32 },

    /// The calibration factor was overwritten by the operator.
    CalibrationOverridden { from: i32, to: i32 },

    /// The live-read loop latched `factor` and started streaming.
    LiveReadStarted { factor: i32 },

    /// One live weight sample.
    LiveReading { kg: f32 },

    /// The live-read loop saw the exit key.
    LiveReadStopped { readings: u32 },
}

/// What the search saw on one iteration, before stepping.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchSample {
    /// Factor applied to the sensor for this reading.
    pub factor: i32,
    /// Live reading converted to kilograms.
    pub reading_kg: f32,
    /// Target in hundredths of a kilogram.
    pub target_q: i64,
    /// Reading in hundredths of a kilogram.
    pub reading_q: i64,
}
