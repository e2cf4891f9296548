//! System configuration parameters
//!
//! All tunable parameters for the calibration console.  Values come from
//! [`SystemConfig::default`] or from a JSON file loaded by the host binary.
//! Calibration results themselves are never written back.

use serde::{Deserialize, Serialize};

/// Core system configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SystemConfig {
    // --- Calibration ---
    /// Calibration factor the session starts with (divisor, counts per lb)
    pub initial_calibration_factor: i32,
    /// Raw samples averaged when acquiring the zero factor
    pub zero_sample_count: u8,
    /// Optional cap on auto-calibration iterations (`None` = unbounded)
    pub max_search_iterations: Option<u32>,

    // --- Operator input ---
    /// Reject unparseable numbers instead of coercing them to zero
    pub strict_numeric_input: bool,
    /// Ignore whitespace bytes at the command prompt instead of reporting
    /// each one as an unknown command
    pub skip_whitespace_commands: bool,

    // --- Timing ---
    /// Live-read display cadence (milliseconds)
    pub read_interval_ms: u32,
    /// Startup readiness retry delay (milliseconds)
    pub ready_retry_ms: u32,

    // --- Host simulation ---
    /// Parameters for the simulated load cell used by the host binary
    pub sim: SimConfig,
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            // Calibration
            initial_calibration_factor: 60_000,
            zero_sample_count: 20,
            max_search_iterations: None,

            // Operator input
            strict_numeric_input: false,
            skip_whitespace_commands: false,

            // Timing
            read_interval_ms: 500,
            ready_retry_ms: 1000,

            sim: SimConfig::default(),
        }
    }
}

impl SystemConfig {
    /// Range-check every field.  Returns the name of the first bad field.
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.initial_calibration_factor == 0 {
            return Err("initial_calibration_factor must be non-zero");
        }
        if self.zero_sample_count == 0 {
            return Err("zero_sample_count must be at least 1");
        }
        if self.max_search_iterations == Some(0) {
            return Err("max_search_iterations must be at least 1 when set");
        }
        if self.read_interval_ms == 0 {
            return Err("read_interval_ms must be non-zero");
        }
        if self.ready_retry_ms == 0 {
            return Err("ready_retry_ms must be non-zero");
        }
        self.sim.validate()
    }
}

/// Simulated HX711 parameters (host binary only).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Raw counts per pound of load
    pub counts_per_lb: f32,
    /// Raw reading with nothing on the platform
    pub zero_offset_counts: i32,
    /// Mass resting on the platform (kg)
    pub load_kg: f32,
    /// Readiness polls that report "not ready" before the ADC syncs
    pub ready_after_polls: u32,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            counts_per_lb: 48_250.0,
            zero_offset_counts: 84_312,
            load_kg: 5.0,
            ready_after_polls: 2,
        }
    }
}

impl SimConfig {
    fn validate(&self) -> Result<(), &'static str> {
        if !self.counts_per_lb.is_finite() || self.counts_per_lb <= 0.0 {
            return Err("sim.counts_per_lb must be positive");
        }
        if !self.load_kg.is_finite() || self.load_kg < 0.0 {
            return Err("sim.load_kg must be zero or positive");
        }
        Ok(())
    }
}
