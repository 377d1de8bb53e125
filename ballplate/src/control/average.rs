// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Moving average over the last `N` servo commands of one axis.
//!
//! Smooths the PID output at the cost of latency. `N = 1` passes the latest command through.

/// Fixed-size ring of servo angles (tenths of a degree).
#[derive(Clone, Debug)]
pub struct MotorAverage<const N: usize> {
    samples: [u16; N],
    idx: usize,
}

impl<const N: usize> MotorAverage<N> {
    const NON_EMPTY: () = assert!(N > 0, "MotorAverage needs at least one sample");

    /// Create a buffer with every slot holding `initial`.
    pub const fn new(initial: u16) -> Self {
        let () = Self::NON_EMPTY;
        Self {
            samples: [initial; N],
            idx: 0,
        }
    }

    /// Overwrite the oldest sample with `angle`.
    pub fn push(&mut self, angle: u16) {
        self.idx = (self.idx + 1) % N;
        self.samples[self.idx] = angle;
    }

    /// Integer mean of all samples.
    pub fn average(&self) -> u16 {
        let sum: u32 = self.samples.iter().map(|&s| u32::from(s)).sum();
        (sum / N as u32) as u16
    }

    /// Refill every slot with `angle`.
    pub fn fill(&mut self, angle: u16) {
        self.samples = [angle; N];
        self.idx = 0;
    }

    /// Most recently pushed sample.
    #[inline]
    pub fn latest(&self) -> u16 {
        self.samples[self.idx]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_slot_passes_through() {
        let mut avg = MotorAverage::<1>::new(880);
        assert_eq!(avg.average(), 880);
        avg.push(1012);
        assert_eq!(avg.average(), 1012);
        avg.push(871);
        assert_eq!(avg.average(), 871);
    }

    #[test]
    fn averages_and_truncates() {
        let mut avg = MotorAverage::<4>::new(880);
        avg.push(900);
        // (880 * 3 + 900) / 4 = 885
        assert_eq!(avg.average(), 885);
        avg.push(901);
        avg.push(901);
        // (880 + 900 + 901 + 901) / 4 = 895.5
        assert_eq!(avg.average(), 895);
        assert_eq!(avg.latest(), 901);
    }

    #[test]
    fn oldest_sample_is_replaced() {
        let mut avg = MotorAverage::<3>::new(0);
        for a in [300, 600, 900, 1200] {
            avg.push(a);
        }
        // 300 was overwritten by 1200
        assert_eq!(avg.average(), (600 + 900 + 1200) / 3);
    }

    #[test]
    fn fill_resets_history() {
        let mut avg = MotorAverage::<2>::new(0);
        avg.push(1000);
        avg.fill(880);
        assert_eq!(avg.average(), 880);
    }
}
