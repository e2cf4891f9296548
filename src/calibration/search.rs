//! Tiered-step search rule for the calibration factor.
//!
//! Pure arithmetic, no I/O.  Given the quantized target and the quantized
//! live reading, decide whether the search is finished and otherwise how
//! far to move the factor.  The factor is a divisor: a smaller factor
//! yields a heavier reading.
//!
//! | \|target − reading\| (hundredths) | step |
//! |----------------------------------|------|
//! | > 100                            | 1000 |
//! | > 10                             | 10   |
//! | otherwise                        | 1    |

pub const COARSE_STEP: i32 = 1000;
pub const MEDIUM_STEP: i32 = 10;
pub const FINE_STEP: i32 = 1;

const COARSE_ABOVE: u64 = 100;
const MEDIUM_ABOVE: u64 = 10;

/// Outcome of comparing one quantized reading against the target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchDecision {
    /// The reading vanished; the factor is too large to go on.
    Abort,
    /// Reading equals target.
    Converged,
    /// Add this (signed) delta to the factor and read again.
    Step(i32),
}

/// Step magnitude for an absolute difference in hundredths.
pub fn step_size(diff: u64) -> i32 {
    if diff > COARSE_ABOVE {
        COARSE_STEP
    } else if diff > MEDIUM_ABOVE {
        MEDIUM_STEP
    } else {
        FINE_STEP
    }
}

/// Decide the next move.  The zero check runs before the equality check,
/// so a zero target can never "converge" on a vanished reading.
pub fn decide(target_q: i64, reading_q: i64) -> SearchDecision {
    if reading_q == 0 {
        return SearchDecision::Abort;
    }
    if reading_q == target_q {
        return SearchDecision::Converged;
    }
    let step = step_size(target_q.abs_diff(reading_q));
    if reading_q < target_q {
        // Too light: shrink the divisor.
        SearchDecision::Step(-step)
    } else {
        SearchDecision::Step(step)
    }
}

/// Apply a step, saturating at the `i32` bounds.
pub fn apply_step(factor: i32, delta: i32) -> i32 {
    factor.saturating_add(delta)
}
