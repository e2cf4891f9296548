//! Unit conversion and fixed-point quantization.
//!
//! The load cell interface reports mass in pounds (its native unit once a
//! calibration factor is applied).  Everything the operator sees is in
//! kilograms, and the calibration search compares weights as integers in
//! hundredths of a kilogram.

/// Pounds → kilograms.
pub const KG_PER_LB: f32 = 0.453_592;

/// Decimal places kept when quantizing a weight for exact comparison.
pub const WEIGHT_DECIMALS: u32 = 2;

/// `10^WEIGHT_DECIMALS`.
const QUANTUM_SCALE: f32 = 10u32.pow(WEIGHT_DECIMALS) as f32;

/// Convert a reading in the sensor's native unit (lb) to kilograms.
#[inline]
pub fn lb_to_kg(units: f32) -> f32 {
    units * KG_PER_LB
}

/// Convert raw counts and a divisor straight to kilograms:
/// `kg = (raw / factor) * KG_PER_LB`.
///
/// `factor` must be non-zero; callers guard against a zero factor before
/// any read (see [`CalibrationEngine`](crate::calibration::CalibrationEngine)).
#[inline]
pub fn counts_to_kg(raw: f32, factor: f32) -> f32 {
    lb_to_kg(raw / factor)
}

/// Quantize a weight to hundredths, rounding half away from zero.
///
/// Non-finite inputs quantize to `i64::MAX` / `i64::MIN` / `0` through the
/// saturating float → int cast.
#[inline]
pub fn quantize(kg: f32) -> i64 {
    (kg * QUANTUM_SCALE).round() as i64
}
