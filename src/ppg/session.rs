//! Windowed beat accumulation and plausibility filtering.

use tracing::{debug, trace};

use super::{BaselineTracker, BeatDetector, FrameSample};
use crate::config::VitalsConfig;
use crate::measurement::Progress;

/// Candidate heart rate for a closed window, rounded to nearest.
pub(crate) fn candidate_bpm(beats: u32, elapsed_secs: f64) -> u32 {
    if elapsed_secs <= 0.0 {
        return 0;
    }
    (beats as f64 / elapsed_secs * 60.0).round() as u32
}

/// Live unsmoothed heart rate shown while a window accumulates, truncated.
fn live_bpm(beats: u32, elapsed_secs: f64) -> u32 {
    if elapsed_secs <= 0.0 {
        return 0;
    }
    (beats as f64 / elapsed_secs * 60.0) as u32
}

/// Outcome of submitting one frame to the session window.
#[derive(Debug)]
pub struct Submitted {
    pub progress: Progress,
    pub verdict: WindowVerdict,
}

#[derive(Debug)]
pub enum WindowVerdict {
    /// The window is still open.
    Accumulating,
    /// The window elapsed but its BPM was outside the plausible range.
    /// The beat counter and start time were soft-reset; histories survive.
    Implausible { candidate_bpm: u32 },
    /// The window closed on a plausible BPM. The session has been fully
    /// reset; the accumulated history is handed out for derived metrics.
    Closed(ClosedWindow),
}

/// Accumulated state of a plausible closed window.
#[derive(Debug)]
pub struct ClosedWindow {
    pub candidate_bpm: u32,
    pub red_history: Vec<u8>,
    pub blue_history: Vec<u8>,
    pub frame_count: u32,
}

/// One measurement session: beat counting and channel history over a
/// fixed-duration window.
///
/// Owns the baseline tracker and beat detector so that a full reset leaves
/// no residue from the previous window. The window opens on the first
/// submitted sample; an implausible close soft-resets (start time and beats
/// only), a plausible close fully resets.
#[derive(Debug)]
pub struct AnalysisSession {
    window_secs: f64,
    min_plausible_bpm: u32,
    max_plausible_bpm: u32,

    baseline: BaselineTracker,
    detector: BeatDetector,

    start_us: Option<i64>,
    elapsed_secs: f64,
    beats: u32,
    sum_red: u64,
    sum_blue: u64,
    red_history: Vec<u8>,
    blue_history: Vec<u8>,
    frame_count: u32,
}

impl AnalysisSession {
    pub fn new(config: &VitalsConfig) -> Self {
        Self {
            window_secs: config.window_secs,
            min_plausible_bpm: config.min_plausible_bpm,
            max_plausible_bpm: config.max_plausible_bpm,
            baseline: BaselineTracker::new(config.baseline_window),
            detector: BeatDetector::new(),
            start_us: None,
            elapsed_secs: 0.0,
            beats: 0,
            sum_red: 0,
            sum_blue: 0,
            red_history: Vec::new(),
            blue_history: Vec::new(),
            frame_count: 0,
        }
    }

    /// Feed one accepted frame into the window.
    pub fn submit(&mut self, sample: FrameSample, now_us: i64) -> Submitted {
        let start_us = *self.start_us.get_or_insert(now_us);

        let red = sample.red_avg();
        let blue = sample.blue_avg();
        self.frame_count += 1;
        self.sum_red += red as u64;
        self.sum_blue += blue as u64;
        self.red_history.push(red);
        self.blue_history.push(blue);

        let baseline = self.baseline.observe(red);
        if self.detector.step(red, baseline) {
            self.beats += 1;
            trace!(beats = self.beats, baseline, red, "beat detected");
        }

        self.elapsed_secs = (now_us - start_us) as f64 / 1_000_000.0;
        let progress = Progress {
            elapsed_secs: self.elapsed_secs,
            live_bpm: live_bpm(self.beats, self.elapsed_secs),
        };

        if self.elapsed_secs < self.window_secs {
            return Submitted {
                progress,
                verdict: WindowVerdict::Accumulating,
            };
        }

        let candidate = candidate_bpm(self.beats, self.elapsed_secs);
        if candidate < self.min_plausible_bpm || candidate > self.max_plausible_bpm {
            debug!(candidate, "implausible window BPM, soft reset");
            self.start_us = Some(now_us);
            self.elapsed_secs = 0.0;
            self.beats = 0;
            return Submitted {
                progress,
                verdict: WindowVerdict::Implausible {
                    candidate_bpm: candidate,
                },
            };
        }

        debug!(candidate, frames = self.frame_count, "window closed");
        let closed = ClosedWindow {
            candidate_bpm: candidate,
            red_history: std::mem::take(&mut self.red_history),
            blue_history: std::mem::take(&mut self.blue_history),
            frame_count: self.frame_count,
        };
        self.reset();
        Submitted {
            progress,
            verdict: WindowVerdict::Closed(closed),
        }
    }

    /// Full reset: zero every accumulator and clear histories. The next
    /// submitted sample opens a fresh window.
    pub fn reset(&mut self) {
        self.baseline.reset();
        self.detector.reset();
        self.start_us = None;
        self.elapsed_secs = 0.0;
        self.beats = 0;
        self.sum_red = 0;
        self.sum_blue = 0;
        self.red_history.clear();
        self.blue_history.clear();
        self.frame_count = 0;
    }

    pub fn beats(&self) -> u32 {
        self.beats
    }

    pub fn elapsed_secs(&self) -> f64 {
        self.elapsed_secs
    }

    pub fn frame_count(&self) -> u32 {
        self.frame_count
    }

    pub fn history_len(&self) -> usize {
        self.red_history.len()
    }

    /// Cumulative (red, blue) sums over the accumulated history.
    pub fn channel_sums(&self) -> (u64, u64) {
        (self.sum_red, self.sum_blue)
    }
}
