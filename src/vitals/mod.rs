//! Derived vital-sign estimators.
//!
//! - `Spo2Estimator` - blood-oxygen saturation from red/blue channel variation
//! - `pressure::estimate` - blood pressure from heart rate and anthropometrics

mod pressure;
mod spo2;

pub use pressure::estimate as estimate_pressure;
pub use spo2::Spo2Estimator;

use thiserror::Error;

/// Estimator failures. All of these degrade a single measurement cycle;
/// none of them stop the pipeline.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum EstimateError {
    #[error("insufficient history for estimation: {frames} frame(s)")]
    InsufficientHistory { frames: u32 },
    #[error("degenerate blood pressure input: pulse pressure denominator is zero")]
    DegeneratePressureInput,
}
