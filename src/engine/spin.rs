use std::time::Duration;

use rand::Rng;

const BASE_DELAY_MS: u64 = 50;
const DELAY_INCREMENT_MS: u64 = 5;
const MIN_STEPS: u32 = 30;
const EXTRA_STEPS: u32 = 20;

/// The draw reel: cycles through the eligible list with a delay that grows
/// each step, and stops exactly on a winner chosen up front. Presentation
/// only; the winner is decided before the reel starts, so the animation
/// cannot disagree with what gets recorded.
#[derive(Clone, Debug)]
pub struct SpinState {
    len: usize,
    total_steps: u32,
    step: u32,
    current: usize,
}

impl SpinState {
    /// `len` is the eligible list length, `winner` the index the reel must
    /// land on. Step count is randomized; the starting index is derived so
    /// the final step lands on `winner`.
    pub fn new<R: Rng>(rng: &mut R, len: usize, winner: usize) -> Self {
        debug_assert!(len > 0 && winner < len);
        let total_steps = MIN_STEPS + rng.gen_range(0..EXTRA_STEPS);
        let offset = (total_steps as usize - 1) % len;
        let start = (winner + len - offset) % len;
        Self {
            len,
            total_steps,
            step: 0,
            current: start,
        }
    }

    /// Index currently under the reel cursor.
    pub fn current(&self) -> usize {
        self.current
    }

    /// How long the current entry stays visible before the next advance.
    pub fn delay(&self) -> Duration {
        Duration::from_millis(BASE_DELAY_MS + u64::from(self.step) * DELAY_INCREMENT_MS)
    }

    /// Advance one step. Returns `false` once the reel has stopped on the
    /// final entry.
    pub fn advance(&mut self) -> bool {
        if self.step + 1 >= self.total_steps {
            return false;
        }
        self.step += 1;
        self.current = (self.current + 1) % self.len;
        true
    }
}
