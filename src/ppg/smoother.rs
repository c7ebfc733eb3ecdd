//! Smoothing over recent validated window BPM estimates.

/// Circular buffer of the last few per-window BPM values.
///
/// Only windows that passed the plausibility filter are pushed, so every
/// populated slot is a real estimate. The reported heart rate is the
/// truncating integer mean of populated (nonzero) slots. The buffer outlives
/// individual windows and is cleared only on a full measurement restart.
#[derive(Debug, Clone)]
pub struct BpmSmoother {
    slots: Vec<u32>,
    next: usize,
}

impl BpmSmoother {
    pub fn new(window: usize) -> Self {
        Self {
            slots: vec![0; window.max(1)],
            next: 0,
        }
    }

    /// Record a validated per-window BPM, evicting the oldest entry.
    pub fn push(&mut self, bpm: u32) {
        self.slots[self.next] = bpm;
        self.next = (self.next + 1) % self.slots.len();
    }

    /// Mean of populated slots, truncated. Zero when nothing was pushed yet.
    pub fn average(&self) -> u32 {
        let mut sum = 0u32;
        let mut count = 0u32;
        for &slot in &self.slots {
            if slot > 0 {
                sum += slot;
                count += 1;
            }
        }
        if count > 0 {
            sum / count
        } else {
            0
        }
    }

    pub fn reset(&mut self) {
        self.slots.fill(0);
        self.next = 0;
    }
}
