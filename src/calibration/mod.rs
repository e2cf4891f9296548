//! Calibration engine: zero factor and calibration factor ownership.
//!
//! The engine is the only owner of the two calibration parameters.  It is
//! driven by the [`SessionController`](crate::app::service::SessionController)
//! and talks to the hardware exclusively through
//! [`LoadCellPort`](crate::app::ports::LoadCellPort).
//!
//! ## Auto-calibration
//!
//! A variable-step hill climb on the divisor:
//!
//! ```text
//!   apply factor ─▶ read ─▶ kg ─▶ quantize ─┬─ == 0       ─▶ abort
//!        ▲                                   ├─ == target  ─▶ done
//!        └──────── factor ± 1000/10/1 ◀──────┘
//! ```
//!
//! No iteration bound by default.  Two readings that straddle the target
//! in fixed-point space can oscillate forever; `max_search_iterations`
//! caps the run when configured.

pub mod search;

use log::{debug, info, warn};

use crate::app::events::{CalEvent, SearchSample};
use crate::app::ports::{EventSink, LoadCellPort};
use crate::config::SystemConfig;
use crate::units::{lb_to_kg, quantize};

use search::{SearchDecision, apply_step, decide};

/// How an auto-calibration run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchOutcome {
    /// Reading matched the target; the factor is left at the converged value.
    Converged { factor: i32, iterations: u32 },
    /// Reading quantized to zero, or the next step would zero the factor.
    Aborted { factor: i32, iterations: u32 },
    /// The configured iteration cap was hit.
    IterationLimit { factor: i32, iterations: u32 },
    /// Not started: the calibration factor is zero.
    Refused,
}

impl SearchOutcome {
    pub fn is_converged(&self) -> bool {
        matches!(self, Self::Converged { .. })
    }
}

/// Owns the operator-visible calibration state.
pub struct CalibrationEngine {
    zero_factor: i32,
    calibration_factor: i32,
    zero_samples: u8,
    max_iterations: Option<u32>,
}

impl CalibrationEngine {
    pub fn new(config: &SystemConfig) -> Self {
        Self {
            zero_factor: 0,
            calibration_factor: config.initial_calibration_factor,
            zero_samples: config.zero_sample_count,
            max_iterations: config.max_search_iterations,
        }
    }

    pub fn zero_factor(&self) -> i32 {
        self.zero_factor
    }

    pub fn calibration_factor(&self) -> i32 {
        self.calibration_factor
    }

    /// Reads through a zero divisor are undefined; handlers check this first.
    pub fn has_usable_factor(&self) -> bool {
        self.calibration_factor != 0
    }

    /// Load the current factor into the sensor interface.
    pub fn apply_factor(&self, cell: &mut impl LoadCellPort) {
        cell.set_scale(self.calibration_factor as f32);
    }

    // ── Zero acquisition ──────────────────────────────────────

    /// Clear the divisor, tare, then average raw samples into the zero factor.
    ///
    /// Sensor readiness is not re-checked here; it is verified once at
    /// startup only.
    pub fn acquire_zero(&mut self, cell: &mut impl LoadCellPort, sink: &mut impl EventSink) -> i32 {
        sink.emit(&CalEvent::ZeroAcquireStarted);
        cell.clear_scale();
        cell.tare();
        self.zero_factor = cell.read_raw_average(self.zero_samples);
        info!("Zero factor acquired: {}", self.zero_factor);
        sink.emit(&CalEvent::ZeroAcquired {
            zero_factor: self.zero_factor,
        });
        self.zero_factor
    }

    // ── Auto-calibration ──────────────────────────────────────

    /// Step the calibration factor until the live reading (in hundredths
    /// of a kg) equals `target_kg`.  The reference weight must already be
    /// on the platform.
    pub fn auto_calibrate(
        &mut self,
        target_kg: f32,
        cell: &mut impl LoadCellPort,
        sink: &mut impl EventSink,
    ) -> SearchOutcome {
        if !self.has_usable_factor() {
            warn!("Auto-calibration refused: calibration factor is zero");
            sink.emit(&CalEvent::ZeroFactorRefused);
            return SearchOutcome::Refused;
        }

        let target_q = quantize(target_kg);
        info!(
            "Auto-calibration: target {:.2} kg ({}), start factor {}",
            target_kg, target_q, self.calibration_factor
        );

        let mut iterations: u32 = 0;
        loop {
            if self.max_iterations.is_some_and(|max| iterations >= max) {
                warn!(
                    "Auto-calibration hit iteration cap ({}) at factor {}",
                    iterations, self.calibration_factor
                );
                sink.emit(&CalEvent::SearchLimitReached {
                    factor: self.calibration_factor,
                    iterations,
                });
                return SearchOutcome::IterationLimit {
                    factor: self.calibration_factor,
                    iterations,
                };
            }

            self.apply_factor(cell);
            let reading_kg = lb_to_kg(cell.read_units());
            let reading_q = quantize(reading_kg);
            iterations += 1;

            sink.emit(&CalEvent::SearchProgress(SearchSample {
                factor: self.calibration_factor,
                reading_kg,
                target_q,
                reading_q,
            }));
            debug!(
                "search #{}: factor={} reading={} target={}",
                iterations, self.calibration_factor, reading_q, target_q
            );

            match decide(target_q, reading_q) {
                SearchDecision::Converged => {
                    info!(
                        "Auto-calibration converged: factor {} after {} readings",
                        self.calibration_factor, iterations
                    );
                    sink.emit(&CalEvent::SearchConverged {
                        factor: self.calibration_factor,
                        iterations,
                    });
                    return SearchOutcome::Converged {
                        factor: self.calibration_factor,
                        iterations,
                    };
                }
                SearchDecision::Abort => {
                    return self.abort(iterations, sink);
                }
                SearchDecision::Step(delta) => {
                    let next = apply_step(self.calibration_factor, delta);
                    if next == 0 {
                        // Never hand a zero divisor to the next read.
                        warn!(
                            "Auto-calibration stopped at factor {}: next step reaches zero",
                            self.calibration_factor
                        );
                        sink.emit(&CalEvent::SearchStepRejected {
                            factor: self.calibration_factor,
                            iterations,
                        });
                        return SearchOutcome::Aborted {
                            factor: self.calibration_factor,
                            iterations,
                        };
                    }
                    self.calibration_factor = next;
                }
            }
        }
    }

    fn abort(&self, iterations: u32, sink: &mut impl EventSink) -> SearchOutcome {
        warn!(
            "Auto-calibration aborted at factor {} after {} readings",
            self.calibration_factor, iterations
        );
        sink.emit(&CalEvent::SearchAborted {
            factor: self.calibration_factor,
            iterations,
        });
        SearchOutcome::Aborted {
            factor: self.calibration_factor,
            iterations,
        }
    }

    // ── Manual overrides ──────────────────────────────────────

    /// Overwrite the zero factor.  Fractions truncate toward zero.
    pub fn set_zero_manual(&mut self, value: f32, sink: &mut impl EventSink) -> i32 {
        let from = self.zero_factor;
        self.zero_factor = value as i32;
        info!("Zero factor override: {} -> {}", from, self.zero_factor);
        sink.emit(&CalEvent::ZeroOverridden {
            from,
            to: self.zero_factor,
        });
        self.zero_factor
    }

    /// Overwrite the calibration factor.  Fractions truncate toward zero;
    /// zero is accepted here and refused later by the reading handlers.
    pub fn set_calibration_manual(&mut self, value: f32, sink: &mut impl EventSink) -> i32 {
        let from = self.calibration_factor;
        self.calibration_factor = value as i32;
        info!(
            "Calibration factor override: {} -> {}",
            from, self.calibration_factor
        );
        if self.calibration_factor == 0 {
            warn!("Calibration factor set to zero; readings are disabled until it changes");
        }
        sink.emit(&CalEvent::CalibrationOverridden {
            from,
            to: self.calibration_factor,
        });
        self.calibration_factor
    }
}
