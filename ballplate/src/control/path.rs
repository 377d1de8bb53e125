// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Precomputed circular trajectory and its playback cursor.
//!
//! The table holds one revolution of a radius-250 circle as 360 integer offsets from the plate
//! center, starting at (+250, 0) and turning counter-clockwise one degree per entry.

use core::sync::atomic::{AtomicU16, Ordering};

use crate::config::CIRCLE_DEFAULT_RATE;

/// Entries per revolution.
pub const CIRCLE_LEN: usize = 360;

/// (dx, dy) offsets from the plate center.
#[rustfmt::skip]
pub const CIRCLE_PATH: [(i16, i16); CIRCLE_LEN] = [
    (250, 0), (250, 4), (250, 9), (250, 13), (249, 17), (249, 22),
    (249, 26), (248, 30), (248, 35), (247, 39), (246, 43), (245, 48),
    (245, 52), (244, 56), (243, 60), (241, 65), (240, 69), (239, 73),
    (238, 77), (236, 81), (235, 86), (233, 90), (232, 94), (230, 98),
    (228, 102), (227, 106), (225, 110), (223, 113), (221, 117), (219, 121),
    (217, 125), (214, 129), (212, 132), (210, 136), (207, 140), (205, 143),
    (202, 147), (200, 150), (197, 154), (194, 157), (192, 161), (189, 164),
    (186, 167), (183, 170), (180, 174), (177, 177), (174, 180), (170, 183),
    (167, 186), (164, 189), (161, 192), (157, 194), (154, 197), (150, 200),
    (147, 202), (143, 205), (140, 207), (136, 210), (132, 212), (129, 214),
    (125, 217), (121, 219), (117, 221), (113, 223), (110, 225), (106, 227),
    (102, 228), (98, 230), (94, 232), (90, 233), (86, 235), (81, 236),
    (77, 238), (73, 239), (69, 240), (65, 241), (60, 243), (56, 244),
    (52, 245), (48, 245), (43, 246), (39, 247), (35, 248), (30, 248),
    (26, 249), (22, 249), (17, 249), (13, 250), (9, 250), (4, 250),
    (0, 250), (-4, 250), (-9, 250), (-13, 250), (-17, 249), (-22, 249),
    (-26, 249), (-30, 248), (-35, 248), (-39, 247), (-43, 246), (-48, 245),
    (-52, 245), (-56, 244), (-60, 243), (-65, 241), (-69, 240), (-73, 239),
    (-77, 238), (-81, 236), (-86, 235), (-90, 233), (-94, 232), (-98, 230),
    (-102, 228), (-106, 227), (-110, 225), (-113, 223), (-117, 221), (-121, 219),
    (-125, 217), (-129, 214), (-132, 212), (-136, 210), (-140, 207), (-143, 205),
    (-147, 202), (-150, 200), (-154, 197), (-157, 194), (-161, 192), (-164, 189),
    (-167, 186), (-170, 183), (-174, 180), (-177, 177), (-180, 174), (-183, 170),
    (-186, 167), (-189, 164), (-192, 161), (-194, 157), (-197, 154), (-200, 150),
    (-202, 147), (-205, 143), (-207, 140), (-210, 136), (-212, 132), (-214, 129),
    (-217, 125), (-219, 121), (-221, 117), (-223, 113), (-225, 110), (-227, 106),
    (-228, 102), (-230, 98), (-232, 94), (-233, 90), (-235, 86), (-236, 81),
    (-238, 77), (-239, 73), (-240, 69), (-241, 65), (-243, 60), (-244, 56),
    (-245, 52), (-245, 48), (-246, 43), (-247, 39), (-248, 35), (-248, 30),
    (-249, 26), (-249, 22), (-249, 17), (-250, 13), (-250, 9), (-250, 4),
    (-250, 0), (-250, -4), (-250, -9), (-250, -13), (-249, -17), (-249, -22),
    (-249, -26), (-248, -30), (-248, -35), (-247, -39), (-246, -43), (-245, -48),
    (-245, -52), (-244, -56), (-243, -60), (-241, -65), (-240, -69), (-239, -73),
    (-238, -77), (-236, -81), (-235, -86), (-233, -90), (-232, -94), (-230, -98),
    (-228, -102), (-227, -106), (-225, -110), (-223, -113), (-221, -117), (-219, -121),
    (-217, -125), (-214, -129), (-212, -132), (-210, -136), (-207, -140), (-205, -143),
    (-202, -147), (-200, -150), (-197, -154), (-194, -157), (-192, -161), (-189, -164),
    (-186, -167), (-183, -170), (-180, -174), (-177, -177), (-174, -180), (-170, -183),
    (-167, -186), (-164, -189), (-161, -192), (-157, -194), (-154, -197), (-150, -200),
    (-147, -202), (-143, -205), (-140, -207), (-136, -210), (-132, -212), (-129, -214),
    (-125, -217), (-121, -219), (-117, -221), (-113, -223), (-110, -225), (-106, -227),
    (-102, -228), (-98, -230), (-94, -232), (-90, -233), (-86, -235), (-81, -236),
    (-77, -238), (-73, -239), (-69, -240), (-65, -241), (-60, -243), (-56, -244),
    (-52, -245), (-48, -245), (-43, -246), (-39, -247), (-35, -248), (-30, -248),
    (-26, -249), (-22, -249), (-17, -249), (-13, -250), (-9, -250), (-4, -250),
    (0, -250), (4, -250), (9, -250), (13, -250), (17, -249), (22, -249),
    (26, -249), (30, -248), (35, -248), (39, -247), (43, -246), (48, -245),
    (52, -245), (56, -244), (60, -243), (65, -241), (69, -240), (73, -239),
    (77, -238), (81, -236), (86, -235), (90, -233), (94, -232), (98, -230),
    (102, -228), (106, -227), (110, -225), (113, -223), (117, -221), (121, -219),
    (125, -217), (129, -214), (132, -212), (136, -210), (140, -207), (143, -205),
    (147, -202), (150, -200), (154, -197), (157, -194), (161, -192), (164, -189),
    (167, -186), (170, -183), (174, -180), (177, -177), (180, -174), (183, -170),
    (186, -167), (189, -164), (192, -161), (194, -157), (197, -154), (200, -150),
    (202, -147), (205, -143), (207, -140), (210, -136), (212, -132), (214, -129),
    (217, -125), (219, -121), (221, -117), (223, -113), (225, -110), (227, -106),
    (228, -102), (230, -98), (232, -94), (233, -90), (235, -86), (236, -81),
    (238, -77), (239, -73), (240, -69), (241, -65), (243, -60), (244, -56),
    (245, -52), (245, -48), (246, -43), (247, -39), (248, -35), (248, -30),
    (249, -26), (249, -22), (249, -17), (250, -13), (250, -9), (250, -4),
];

/// Playback direction around the circle.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum PathDirection {
    Forward,
    Backward,
}

/// Next table index after `index`, wrapping at both ends.
#[inline]
pub const fn step_index(index: u16, direction: PathDirection) -> u16 {
    let len = CIRCLE_LEN as u16;
    match direction {
        PathDirection::Forward => (index + 1) % len,
        PathDirection::Backward => {
            if index == 0 {
                len - 1
            } else {
                index - 1
            }
        }
    }
}

/// Playback cursor: current table index and how many ticks each step takes.
///
/// Written from the tick interrupt (index) and the button interrupt (rate), read by the main
/// loop.
pub struct CircleCursor {
    index: AtomicU16,
    rate: AtomicU16,
}

impl CircleCursor {
    pub const fn new() -> Self {
        Self {
            index: AtomicU16::new(0),
            rate: AtomicU16::new(CIRCLE_DEFAULT_RATE),
        }
    }

    #[inline]
    pub fn index(&self) -> u16 {
        self.index.load(Ordering::Acquire)
    }

    /// Ticks per step.
    #[inline]
    pub fn rate(&self) -> u16 {
        self.rate.load(Ordering::Relaxed)
    }

    /// Change the playback speed. A rate of 0 is treated as 1.
    pub fn set_rate(&self, ticks_per_step: u16) {
        self.rate.store(ticks_per_step.max(1), Ordering::Relaxed);
    }

    pub fn reset_rate(&self) {
        self.set_rate(CIRCLE_DEFAULT_RATE);
    }

    /// Step the cursor if tick `t` lands on the playback rate. Returns true if it moved.
    pub fn advance(&self, t: u32, direction: PathDirection) -> bool {
        let rate = u32::from(self.rate().max(1));
        if t % rate != 0 {
            return false;
        }
        let next = step_index(self.index(), direction);
        self.index.store(next, Ordering::Release);
        true
    }

    /// Center offset at the current index.
    #[inline]
    pub fn offset(&self) -> (i16, i16) {
        CIRCLE_PATH[usize::from(self.index()) % CIRCLE_LEN]
    }
}

impl Default for CircleCursor {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_quarter_points() {
        assert_eq!(CIRCLE_PATH[0], (250, 0));
        assert_eq!(CIRCLE_PATH[90], (0, 250));
        assert_eq!(CIRCLE_PATH[180], (-250, 0));
        assert_eq!(CIRCLE_PATH[270], (0, -250));
    }

    #[test]
    fn table_stays_on_radius() {
        for &(dx, dy) in CIRCLE_PATH.iter() {
            let r2 = i32::from(dx) * i32::from(dx) + i32::from(dy) * i32::from(dy);
            // 250 +- 1 count of rounding
            assert!((249 * 249..=251 * 251).contains(&r2), "({}, {})", dx, dy);
        }
    }

    #[test]
    fn step_wraps_both_ways() {
        assert_eq!(step_index(0, PathDirection::Forward), 1);
        assert_eq!(step_index(359, PathDirection::Forward), 0);
        assert_eq!(step_index(0, PathDirection::Backward), 359);
        assert_eq!(step_index(10, PathDirection::Backward), 9);
    }

    #[test]
    fn advance_only_on_rate_multiples() {
        let cursor = CircleCursor::new();
        assert_eq!(cursor.rate(), CIRCLE_DEFAULT_RATE);

        let mut moves = 0;
        for t in 1..=50u32 {
            if cursor.advance(t, PathDirection::Forward) {
                assert_eq!(t % 5, 0);
                moves += 1;
            }
        }
        assert_eq!(moves, 10);
        assert_eq!(cursor.index(), 10);
        assert_eq!(cursor.offset(), CIRCLE_PATH[10]);
    }

    #[test]
    fn zero_rate_is_clamped() {
        let cursor = CircleCursor::new();
        cursor.set_rate(0);
        assert_eq!(cursor.rate(), 1);
        assert!(cursor.advance(7, PathDirection::Backward));
        assert_eq!(cursor.index(), 359);

        cursor.reset_rate();
        assert_eq!(cursor.rate(), CIRCLE_DEFAULT_RATE);
    }
}
