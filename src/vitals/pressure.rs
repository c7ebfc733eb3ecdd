//! Blood pressure estimation.
//!
//! Deterministic hemodynamic model: stroke volume from ejection time and
//! Du Bois body surface area, pulse pressure from stroke volume over a
//! weight/age/heart-rate denominator, and a fixed peripheral-resistance-like
//! factor for the mean pressure. Inputs are metric; the formula operates in
//! pounds and inches.

use crate::config::{AnthropometricProfile, Gender, Posture};
use crate::measurement::BloodPressure;

use super::EstimateError;

const KG_TO_LB: f64 = 2.20462;
const CM_TO_IN: f64 = 0.393701;
/// Peripheral-resistance-like factor applied to cardiac output.
const RESISTANCE_FACTOR: f64 = 18.5;

/// Estimate systolic/diastolic pressure for a heart rate and profile.
///
/// Pure function; the same inputs always produce the same pair. Fails only
/// when the pulse-pressure denominator is zero.
pub fn estimate(
    heart_rate_bpm: u32,
    profile: &AnthropometricProfile,
) -> Result<BloodPressure, EstimateError> {
    let hr = heart_rate_bpm as f64;
    let age = profile.age_years as f64;
    let weight_lb = profile.weight_kg * KG_TO_LB;
    let height_in = profile.height_cm * CM_TO_IN;

    // Cardiac output, liters per minute
    let q = match profile.gender {
        Gender::Male => 5.0,
        Gender::Female => 4.5,
    };

    // Systolic ejection time in milliseconds, posture dependent
    let ejection_time = match profile.posture {
        Posture::LyingDown => 364.5 - 1.23 * hr,
        _ => 386.0 - 1.64 * hr,
    };

    // Du Bois body surface area
    let bsa = 0.007184 * weight_lb.powf(0.425) * height_in.powf(0.725);

    let stroke_volume =
        -6.6 + 0.25 * (ejection_time - 35.0) - 0.62 * hr + 40.4 * bsa - 0.51 * age;

    let denominator = 0.013 * weight_lb - 0.007 * age - 0.004 * hr + 1.307;
    if denominator.abs() < 1e-9 {
        return Err(EstimateError::DegeneratePressureInput);
    }
    let pulse_pressure = (stroke_volume / denominator).abs();

    let mean_pressure = q * RESISTANCE_FACTOR;
    let systolic = (mean_pressure + 4.5 / 3.0 * pulse_pressure).round() as i32;
    let diastolic = (mean_pressure - pulse_pressure / 3.0).round() as i32;

    Ok(BloodPressure {
        systolic,
        diastolic,
    })
}
