//! Edge-triggered pulse beat detection.

/// Position of the instantaneous red average relative to the baseline.
///
/// `High` means at or above baseline (dilated vessel, bright frame),
/// `Low` means below (perfusion trough).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PulseState {
    Low,
    High,
}

/// Two-state trough detector.
///
/// A beat is counted exactly on the `High` -> `Low` edge; the return to
/// `High` is tracked but never counted, so one cardiac cycle yields one
/// beat. Equality with the baseline never transitions (strict inequalities
/// only), which keeps a flat signal from oscillating.
#[derive(Debug, Clone)]
pub struct BeatDetector {
    state: PulseState,
}

impl BeatDetector {
    pub fn new() -> Self {
        Self {
            state: PulseState::High,
        }
    }

    /// Advance the state machine one sample. Returns true iff this sample
    /// completed a `High` -> `Low` transition.
    pub fn step(&mut self, red_avg: u8, baseline: u32) -> bool {
        let red = red_avg as u32;
        if red < baseline {
            let beat = self.state == PulseState::High;
            self.state = PulseState::Low;
            beat
        } else if red > baseline {
            self.state = PulseState::High;
            false
        } else {
            false
        }
    }

    pub fn state(&self) -> PulseState {
        self.state
    }

    pub fn reset(&mut self) {
        self.state = PulseState::High;
    }
}

impl Default for BeatDetector {
    fn default() -> Self {
        Self::new()
    }
}
