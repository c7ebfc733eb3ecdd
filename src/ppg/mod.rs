//! Pulse extraction from per-frame channel averages.
//!
//! - `BaselineTracker` - rolling red-channel reference level
//! - `BeatDetector` - edge-triggered trough detector against the baseline
//! - `BpmSmoother` - average over recent validated window estimates
//! - `AnalysisSession` - windowed beat accumulation and plausibility filtering

mod baseline;
mod beat;
mod session;
mod smoother;

pub use baseline::BaselineTracker;
pub use beat::{BeatDetector, PulseState};
pub use session::{AnalysisSession, ClosedWindow, Submitted, WindowVerdict};
pub use smoother::BpmSmoother;

/// One accepted camera frame, reduced to its channel averages.
///
/// Construction fails on a saturated channel (average 0 or 255), which means
/// the flash is off, the lens is uncovered or the sensor is clipping; such
/// frames carry no pulse information and must not touch session state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameSample {
    red_avg: u8,
    blue_avg: u8,
}

impl FrameSample {
    pub fn new(red_avg: u8, blue_avg: u8) -> Option<Self> {
        if red_avg == 0 || red_avg == u8::MAX || blue_avg == 0 || blue_avg == u8::MAX {
            return None;
        }
        Some(Self { red_avg, blue_avg })
    }

    pub fn red_avg(&self) -> u8 {
        self.red_avg
    }

    pub fn blue_avg(&self) -> u8 {
        self.blue_avg
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_saturated_channels_rejected() {
        assert!(FrameSample::new(0, 100).is_none());
        assert!(FrameSample::new(255, 100).is_none());
        assert!(FrameSample::new(100, 0).is_none());
        assert!(FrameSample::new(100, 255).is_none());
    }

    #[test]
    fn test_in_range_accepted() {
        let sample = FrameSample::new(1, 254).unwrap();
        assert_eq!(sample.red_avg(), 1);
        assert_eq!(sample.blue_avg(), 254);
    }
}
