//! Blood-oxygen saturation estimation.
//!
//! SpO2 is approximated from the ratio of the red and blue channels'
//! coefficients of variation over the session history:
//!
//! ```text
//! r    = (std_red / mean_red) / (std_blue / mean_blue)
//! spo2 = round(100 - 5 r)
//! ```
//!
//! This is an empirical proxy, not a calibrated pulse-oximetry formula; the
//! arithmetic (integer means, integer deviation sums, truncating divisions
//! before the square roots) is kept exactly as the reference measurement
//! produced it so results stay comparable.

use tracing::debug;

use super::EstimateError;

/// Stateful SpO2 estimator.
///
/// The squared-deviation sums accumulate across calls and are cleared only
/// with the owning session (`reset`). Repeated calls over the same history
/// scale both channel sums by the same factor, so the ratio, and therefore
/// the estimate, is unchanged.
#[derive(Debug, Clone, Default)]
pub struct Spo2Estimator {
    dev_sum_red: i64,
    dev_sum_blue: i64,
}

impl Spo2Estimator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Estimate SpO2 percent from the session's channel histories.
    ///
    /// Requires at least two frames; a flat blue channel (zero variation)
    /// also reports `InsufficientHistory` since the ratio is undefined.
    pub fn estimate(
        &mut self,
        red_history: &[u8],
        blue_history: &[u8],
        frame_count: u32,
    ) -> Result<u32, EstimateError> {
        let frames = frame_count.min(red_history.len() as u32).min(blue_history.len() as u32);
        if frames < 2 {
            return Err(EstimateError::InsufficientHistory { frames });
        }
        let n = frames as usize;

        let sum_red: u64 = red_history[..n].iter().map(|&v| v as u64).sum();
        let sum_blue: u64 = blue_history[..n].iter().map(|&v| v as u64).sum();
        let mean_red = (sum_red / frames as u64) as i64;
        let mean_blue = (sum_blue / frames as u64) as i64;

        // Deviations over the first n-1 entries, as the reference did
        for i in 0..n - 1 {
            let dr = red_history[i] as i64 - mean_red;
            let db = blue_history[i] as i64 - mean_blue;
            self.dev_sum_red += dr * dr;
            self.dev_sum_blue += db * db;
        }

        let var_red = ((self.dev_sum_red / (frames as i64 - 1)) as f64).sqrt();
        let var_blue = ((self.dev_sum_blue / (frames as i64 - 1)) as f64).sqrt();

        let r = (var_red / mean_red as f64) / (var_blue / mean_blue as f64);
        if !r.is_finite() {
            debug!(var_blue, mean_blue, "undefined channel variation ratio");
            return Err(EstimateError::InsufficientHistory { frames });
        }

        Ok((100.0 - 5.0 * r).round() as u32)
    }

    /// Clear the accumulated deviation sums. Called on session reset.
    pub fn reset(&mut self) {
        self.dev_sum_red = 0;
        self.dev_sum_blue = 0;
    }
}
