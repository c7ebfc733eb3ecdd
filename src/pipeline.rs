//! Frame intake pipeline.
//!
//! Orchestrates decode, saturation rejection, the session window and the
//! derived-metric estimators, and writes results to the measurement sink.
//!
//! Frames arrive off our control path at the camera's native rate. The
//! pipeline processes at most one frame at a time: all mutable state sits
//! behind a try-lock, and a frame arriving while the lock is held is dropped
//! silently. Stale frames are worthless for a live measurement, so there is
//! no queueing and no retry.

use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::Mutex;
use tracing::{debug, info, trace, warn};

use crate::config::{AnthropometricProfile, VitalsConfig};
use crate::decode::ColorDecoder;
use crate::measurement::{Measurement, MeasurementSink};
use crate::ppg::{AnalysisSession, BpmSmoother, FrameSample, WindowVerdict};
use crate::vitals::{estimate_pressure, Spo2Estimator};

/// Disposition of a single `on_frame` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameOutcome {
    /// Intake is disarmed; the frame was ignored.
    Disarmed,
    /// Another frame was in flight; this one was dropped.
    DroppedBusy,
    /// The buffer did not decode to a full frame.
    DecodeFailed,
    /// A channel average was 0 or 255; no state was touched.
    Saturated,
    /// The frame was folded into the current window.
    Accepted,
    /// The frame closed a window whose BPM was implausible (soft reset).
    ImplausibleWindow,
    /// The frame closed a valid window and a measurement was emitted.
    Emitted,
}

struct PipelineInner {
    profile: AnthropometricProfile,
    decoder: Box<dyn ColorDecoder>,
    sink: Box<dyn MeasurementSink>,
    session: AnalysisSession,
    smoother: BpmSmoother,
    spo2: Spo2Estimator,
}

/// Vital-signs measurement pipeline.
///
/// Safe to share across threads; see the module docs for the single-frame
/// concurrency policy.
pub struct VitalsPipeline {
    armed: AtomicBool,
    inner: Mutex<PipelineInner>,
}

impl VitalsPipeline {
    pub fn new(
        config: VitalsConfig,
        profile: AnthropometricProfile,
        decoder: Box<dyn ColorDecoder>,
        sink: Box<dyn MeasurementSink>,
    ) -> Self {
        let session = AnalysisSession::new(&config);
        let smoother = BpmSmoother::new(config.bpm_window);
        Self {
            armed: AtomicBool::new(false),
            inner: Mutex::new(PipelineInner {
                profile,
                decoder,
                sink,
                session,
                smoother,
                spo2: Spo2Estimator::new(),
            }),
        }
    }

    /// Arm intake and reset all session and smoothing state.
    pub fn start(&self) {
        let mut inner = self.inner.lock();
        inner.session.reset();
        inner.smoother.reset();
        inner.spo2.reset();
        self.armed.store(true, Ordering::Release);
        info!("measurement started");
    }

    /// Disarm future intake. An in-flight frame completes its critical
    /// section; nothing is reset until the next `start`.
    pub fn stop(&self) {
        self.armed.store(false, Ordering::Release);
        info!("measurement stopped");
    }

    pub fn is_armed(&self) -> bool {
        self.armed.load(Ordering::Acquire)
    }

    /// Process one camera frame.
    ///
    /// `now_us` is the frame capture timestamp in microseconds; window
    /// elapsed time is derived from it, not from wall-clock reads.
    pub fn on_frame(&self, data: &[u8], width: u32, height: u32, now_us: i64) -> FrameOutcome {
        if !self.is_armed() {
            return FrameOutcome::Disarmed;
        }

        // At-most-one in-flight frame: losing the race drops the frame.
        let Some(mut inner) = self.inner.try_lock() else {
            trace!("frame dropped, previous frame still in flight");
            return FrameOutcome::DroppedBusy;
        };

        let Some(averages) = inner.decoder.decode(data, width, height) else {
            debug!(width, height, len = data.len(), "frame buffer failed to decode");
            return FrameOutcome::DecodeFailed;
        };

        let Some(sample) = FrameSample::new(averages.red, averages.blue) else {
            trace!(red = averages.red, blue = averages.blue, "saturated frame rejected");
            return FrameOutcome::Saturated;
        };

        let submitted = inner.session.submit(sample, now_us);
        inner.sink.on_progress(submitted.progress);

        match submitted.verdict {
            WindowVerdict::Accumulating => FrameOutcome::Accepted,
            WindowVerdict::Implausible { .. } => FrameOutcome::ImplausibleWindow,
            WindowVerdict::Closed(window) => {
                inner.smoother.push(window.candidate_bpm);
                let heart_rate_bpm = inner.smoother.average();

                let spo2_percent = match inner.spo2.estimate(
                    &window.red_history,
                    &window.blue_history,
                    window.frame_count,
                ) {
                    Ok(percent) => Some(percent),
                    Err(err) => {
                        warn!(%err, "SpO2 degraded for this cycle");
                        None
                    }
                };
                inner.spo2.reset();

                let pressure = match estimate_pressure(heart_rate_bpm, &inner.profile) {
                    Ok(bp) => Some(bp),
                    Err(err) => {
                        warn!(%err, "blood pressure degraded for this cycle");
                        None
                    }
                };

                let measurement = Measurement {
                    heart_rate_bpm,
                    spo2_percent,
                    pressure,
                };
                debug!(?measurement, "measurement emitted");
                inner.sink.on_measurement(measurement);
                FrameOutcome::Emitted
            }
        }
    }

    /// Replace the anthropometric profile for subsequent windows.
    pub fn set_profile(&self, profile: AnthropometricProfile) {
        self.inner.lock().profile = profile;
    }

    /// Frames accepted into the current window.
    pub fn session_frame_count(&self) -> u32 {
        self.inner.lock().session.frame_count()
    }

    /// Seconds the current window has been open.
    pub fn elapsed_secs(&self) -> f64 {
        self.inner.lock().session.elapsed_secs()
    }
}
