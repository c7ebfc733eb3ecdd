//! Measurement output types and the sink the pipeline writes to.

use serde::{Deserialize, Serialize};

/// Systolic/diastolic arterial pressure in mmHg.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BloodPressure {
    pub systolic: i32,
    pub diastolic: i32,
}

/// Terminal output of one completed measurement window.
///
/// Derived metrics are `None` when their estimator degraded for this cycle
/// (insufficient history, degenerate pressure input); the heart rate itself
/// is always present since the window only closes on a plausible BPM.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Measurement {
    /// Smoothed heart rate in BPM.
    pub heart_rate_bpm: u32,
    /// Blood-oxygen saturation percentage.
    pub spo2_percent: Option<u32>,
    /// Estimated blood pressure.
    pub pressure: Option<BloodPressure>,
}

/// Per-frame progress, for live UI feedback while a window accumulates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Progress {
    /// Seconds since the current window opened.
    pub elapsed_secs: f64,
    /// Unsmoothed `beats / elapsed * 60` estimate, truncated. Zero until
    /// the first beat lands.
    pub live_bpm: u32,
}

/// Receiver for pipeline output.
///
/// Called from inside the frame critical section; implementations should
/// hand off to their own thread or loop rather than doing work inline.
pub trait MeasurementSink: Send {
    /// Invoked once per accepted frame.
    fn on_progress(&mut self, progress: Progress);

    /// Invoked once per completed valid window.
    fn on_measurement(&mut self, measurement: Measurement);
}

/// Sink that discards everything. Useful for tests and headless runs.
pub struct NullSink;

impl MeasurementSink for NullSink {
    fn on_progress(&mut self, _progress: Progress) {}
    fn on_measurement(&mut self, _measurement: Measurement) {}
}
