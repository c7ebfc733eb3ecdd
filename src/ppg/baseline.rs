//! Rolling red-channel baseline.

/// Fixed-size circular buffer smoothing recent red averages into a baseline.
///
/// Slots are overwritten round-robin; the baseline is the truncating integer
/// mean of the populated (nonzero) slots only, so the first few observations
/// are not diluted by empty slots.
#[derive(Debug, Clone)]
pub struct BaselineTracker {
    slots: Vec<u32>,
    next: usize,
}

impl BaselineTracker {
    pub fn new(window: usize) -> Self {
        Self {
            slots: vec![0; window.max(1)],
            next: 0,
        }
    }

    /// Record a red average and return the current baseline.
    ///
    /// Returns 0 while no nonzero sample has been observed.
    pub fn observe(&mut self, red_avg: u8) -> u32 {
        self.slots[self.next] = red_avg as u32;
        self.next = (self.next + 1) % self.slots.len();

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
