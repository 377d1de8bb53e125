// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Button-driven operating modes and the setpoint they select.
//!
//! | Mode | Setpoint |
//! | ---- | -------- |
//! | 0 | plate center |
//! | 1 | center + X offset |
//! | 2 | center - X offset |
//! | 3 | circle, counter-clockwise |
//! | 4 | circle, clockwise |
//! | 5 | plate center |
//!
//! Button 1 steps forward through the modes, button 2 steps back, both wrapping.

use core::sync::atomic::{AtomicU32, AtomicU8, Ordering};

use crate::config::{CENTER, SETPOINT_OFFSET_X};
use crate::control::path::{CircleCursor, PathDirection};
use crate::control::scheduler::DueFlag;

/// Target ball position in touch-panel counts.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct Setpoint {
    pub x: u16,
    pub y: u16,
}

impl Setpoint {
    pub const fn new(x: u16, y: u16) -> Self {
        Self { x, y }
    }

    /// `self` shifted by a signed offset, saturating at the panel range.
    pub fn offset(self, dx: i16, dy: i16) -> Self {
        Self {
            x: self.x.saturating_add_signed(dx),
            y: self.y.saturating_add_signed(dy),
        }
    }

    const fn pack(self) -> u32 {
        ((self.x as u32) << 16) | self.y as u32
    }

    const fn unpack(bits: u32) -> Self {
        Self {
            x: (bits >> 16) as u16,
            y: bits as u16,
        }
    }
}

/// Operating mode.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[repr(u8)]
pub enum Mode {
    Center = 0,
    OffsetPositive = 1,
    OffsetNegative = 2,
    CircleForward = 3,
    CircleBackward = 4,
    /// Has no behavior of its own and holds the center like mode 0.
    Spare = 5,
}

impl Mode {
    pub const COUNT: u8 = 6;

    /// Decode a raw mode number. Out-of-range values fall back to [`Mode::Center`].
    pub const fn from_raw(raw: u8) -> Self {
        match raw {
            1 => Mode::OffsetPositive,
            2 => Mode::OffsetNegative,
            3 => Mode::CircleForward,
            4 => Mode::CircleBackward,
            5 => Mode::Spare,
            _ => Mode::Center,
        }
    }

    #[inline]
    pub const fn raw(self) -> u8 {
        self as u8
    }

    pub const fn next(self) -> Self {
        Self::from_raw((self.raw() + 1) % Self::COUNT)
    }

    pub const fn prev(self) -> Self {
        match self.raw() {
            0 => Self::from_raw(Self::COUNT - 1),
            n => Self::from_raw(n - 1),
        }
    }

    /// Circle playback direction, if this is a circle mode.
    pub const fn circle_direction(self) -> Option<PathDirection> {
        match self {
            Mode::CircleForward => Some(PathDirection::Forward),
            Mode::CircleBackward => Some(PathDirection::Backward),
            _ => None,
        }
    }
}

/// Receiver of debounced button snapshots.
///
/// Called from interrupt context with the set of buttons held after the debounce window.
pub trait ButtonListener {
    fn on_buttons(&self, btn1: bool, btn2: bool);
}

/// Mode, active setpoint and circle playback state.
///
/// Every field is atomic: the button interrupt changes the mode, the tick interrupt steps the
/// circle, and the main loop resolves circle setpoints.
pub struct ModeStateMachine {
    mode: AtomicU8,
    setpoint: AtomicU32,
    cursor: CircleCursor,
    setpoint_due: DueFlag,
}

impl ModeStateMachine {
    pub const fn new() -> Self {
        Self {
            mode: AtomicU8::new(Mode::Center as u8),
            setpoint: AtomicU32::new(CENTER.pack()),
            cursor: CircleCursor::new(),
            setpoint_due: DueFlag::new(),
        }
    }

    #[inline]
    pub fn mode(&self) -> Mode {
        Mode::from_raw(self.mode.load(Ordering::Acquire))
    }

    #[inline]
    pub fn setpoint(&self) -> Setpoint {
        Setpoint::unpack(self.setpoint.load(Ordering::Acquire))
    }

    #[inline]
    pub fn cursor(&self) -> &CircleCursor {
        &self.cursor
    }

    /// Flag raised whenever the circle cursor moves.
    #[inline]
    pub fn setpoint_due(&self) -> &DueFlag {
        &self.setpoint_due
    }

    fn store_setpoint(&self, setpoint: Setpoint) {
        self.setpoint.store(setpoint.pack(), Ordering::Release);
    }

    /// Step forward (`btn1`) or back (`btn2`) one mode. `btn1` wins if both are set; neither is a
    /// no-op.
    pub fn on_button_event(&self, btn1: bool, btn2: bool) {
        let current = self.mode();
        let next = if btn1 {
            current.next()
        } else if btn2 {
            current.prev()
        } else {
            return;
        };
        self.enter(next);
    }

    /// Switch to `mode` and apply its entry action.
    pub fn enter(&self, mode: Mode) {
        self.mode.store(mode.raw(), Ordering::Release);

        match Self::static_setpoint(mode) {
            Some(setpoint) => self.hold(setpoint),
            // The setpoint follows the circle from the next cursor step on.
            None => self.cursor.reset_rate(),
        }
    }

    /// Fixed setpoint of a static mode. Circle modes have none.
    pub fn static_setpoint(mode: Mode) -> Option<Setpoint> {
        let offset = SETPOINT_OFFSET_X as i16;
        match mode {
            Mode::CircleForward | Mode::CircleBackward => None,
            Mode::OffsetPositive => Some(CENTER.offset(offset, 0)),
            Mode::OffsetNegative => Some(CENTER.offset(-offset, 0)),
            Mode::Center | Mode::Spare => Some(CENTER),
        }
    }

    fn hold(&self, setpoint: Setpoint) {
        self.setpoint_due.clear();
        self.store_setpoint(setpoint);
    }

    /// Tick hook: step the circle cursor in a circle mode. Returns true if it moved.
    pub fn on_tick(&self, t: u32) -> bool {
        let Some(direction) = self.mode().circle_direction() else {
            return false;
        };
        if self.cursor.advance(t, direction) {
            self.setpoint_due.raise();
            true
        } else {
            false
        }
    }

    /// Load the setpoint from the circle table at the current cursor.
    ///
    /// A button press may leave the circle while this runs. The store is redone until the mode
    /// read before it is still current afterwards, so a static mode always ends up with its own
    /// setpoint.
    pub fn resolve_circle_setpoint(&self) -> Setpoint {
        self.resolve_circle_setpoint_with(|| {})
    }

    /// `after_store` runs between each store and the mode re-check.
    fn resolve_circle_setpoint_with(&self, mut after_store: impl FnMut()) -> Setpoint {
        let (dx, dy) = self.cursor.offset();
        let circle = CENTER.offset(dx, dy);

        let mut mode = self.mode();
        loop {
            self.store_setpoint(Self::static_setpoint(mode).unwrap_or(circle));
            after_store();

            let current = self.mode();
            if current == mode {
                break;
            }
            mode = current;
        }
        self.setpoint()
    }
}

impl Default for ModeStateMachine {
    fn default() -> Self {
        Self::new()
    }
}

impl ButtonListener for ModeStateMachine {
    fn on_buttons(&self, btn1: bool, btn2: bool) {
        self.on_button_event(btn1, btn2);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CIRCLE_DEFAULT_RATE;
    use crate::control::path::CIRCLE_PATH;

    fn press(sm: &ModeStateMachine, n: usize) {
        for _ in 0..n {
            sm.on_button_event(true, false);
        }
    }

    #[test]
    fn starts_centered_in_mode_zero() {
        let sm = ModeStateMachine::new();
        assert_eq!(sm.mode(), Mode::Center);
        assert_eq!(sm.setpoint(), Setpoint::new(2150, 2150));
    }

    #[test]
    fn modes_wrap_forward_and_back() {
        let sm = ModeStateMachine::new();
        press(&sm, 5);
        assert_eq!(sm.mode(), Mode::Spare);
        sm.on_button_event(true, false);
        assert_eq!(sm.mode(), Mode::Center);

        sm.on_button_event(false, true);
        assert_eq!(sm.mode(), Mode::Spare);
        sm.on_button_event(false, true);
        assert_eq!(sm.mode(), Mode::CircleBackward);
    }

    #[test]
    fn button_one_wins_when_both_held() {
        let sm = ModeStateMachine::new();
        sm.on_button_event(true, true);
        assert_eq!(sm.mode(), Mode::OffsetPositive);
    }

    #[test]
    fn no_buttons_changes_nothing() {
        let sm = ModeStateMachine::new();
        press(&sm, 2);
        sm.on_button_event(false, false);
        assert_eq!(sm.mode(), Mode::OffsetNegative);
        assert_eq!(sm.setpoint(), Setpoint::new(1550, 2150));
    }

    #[test]
    fn static_modes_set_offsets() {
        let sm = ModeStateMachine::new();
        sm.on_button_event(true, false);
        assert_eq!(sm.setpoint(), Setpoint::new(2750, 2150));
        sm.on_button_event(true, false);
        assert_eq!(sm.setpoint(), Setpoint::new(1550, 2150));
        sm.enter(Mode::Spare);
        assert_eq!(sm.setpoint(), Setpoint::new(2150, 2150));
    }

    #[test]
    fn entering_circle_mode_resets_rate() {
        let sm = ModeStateMachine::new();
        for mode in [Mode::CircleForward, Mode::CircleBackward] {
            sm.cursor().set_rate(50);
            sm.enter(mode);
            assert_eq!(sm.cursor().rate(), CIRCLE_DEFAULT_RATE);
        }
    }

    #[test]
    fn circle_entry_keeps_previous_setpoint() {
        let sm = ModeStateMachine::new();
        press(&sm, 3);
        assert_eq!(sm.mode(), Mode::CircleForward);
        // Left over from mode 2 until the first cursor step.
        assert_eq!(sm.setpoint(), Setpoint::new(1550, 2150));
    }

    #[test]
    fn tick_steps_cursor_only_in_circle_modes() {
        let sm = ModeStateMachine::new();
        assert!(!sm.on_tick(5));
        assert!(!sm.setpoint_due().is_raised());

        sm.enter(Mode::CircleForward);
        assert!(!sm.on_tick(4));
        assert!(sm.on_tick(5));
        assert_eq!(sm.cursor().index(), 1);
        assert!(sm.setpoint_due().take());
        assert_eq!(sm.resolve_circle_setpoint(), CENTER.offset(CIRCLE_PATH[1].0, CIRCLE_PATH[1].1));

        sm.enter(Mode::CircleBackward);
        assert!(sm.on_tick(10));
        assert!(sm.on_tick(15));
        assert_eq!(sm.cursor().index(), 359);
        assert_eq!(sm.resolve_circle_setpoint(), Setpoint::new(2150 + 250, 2150 - 4));
    }

    #[test]
    fn leaving_circle_drops_pending_setpoint() {
        let sm = ModeStateMachine::new();
        sm.enter(Mode::CircleForward);
        assert!(sm.on_tick(5));
        sm.enter(Mode::Center);
        assert!(!sm.setpoint_due().is_raised());
        // A stale resolve does not overwrite the static setpoint.
        assert_eq!(sm.resolve_circle_setpoint(), CENTER);
    }

    #[test]
    fn raw_decode_falls_back_to_center() {
        assert_eq!(Mode::from_raw(6), Mode::Center);
        assert_eq!(Mode::from_raw(255), Mode::Center);
        assert_eq!(Mode::from_raw(4), Mode::CircleBackward);
    }

    #[test]
    fn listener_forwards_to_state_machine() {
        let sm = ModeStateMachine::new();
        let listener: &dyn ButtonListener = &sm;
        listener.on_buttons(false, true);
        assert_eq!(sm.mode(), Mode::Spare);
    }

    #[test]
    fn button_during_resolve_keeps_static_setpoint() {
        let sm = ModeStateMachine::new();
        sm.enter(Mode::CircleForward);
        assert!(sm.on_tick(5));

        // Button press lands right after the circle point was stored.
        let mut pressed = false;
        let resolved = sm.resolve_circle_setpoint_with(|| {
            if !pressed {
                pressed = true;
                sm.enter(Mode::Center);
            }
        });
        assert_eq!(sm.mode(), Mode::Center);
        assert_eq!(resolved, CENTER);
        assert_eq!(sm.setpoint(), CENTER);
    }

    #[test]
    fn resolve_follows_mode_changes_until_stable() {
        let sm = ModeStateMachine::new();
        sm.enter(Mode::CircleBackward);
        assert!(sm.on_tick(5));

        let mut presses = [Mode::OffsetNegative, Mode::CircleForward].into_iter();
        let resolved = sm.resolve_circle_setpoint_with(|| {
            if let Some(mode) = presses.next() {
                sm.enter(mode);
            }
        });
        // Back in a circle mode: the circle point stands.
        assert_eq!(sm.mode(), Mode::CircleForward);
        assert_eq!(resolved, Setpoint::new(2150 + 250, 2150 - 4));
    }

    #[test]
    fn static_setpoints_per_mode() {
        assert_eq!(ModeStateMachine::static_setpoint(Mode::Center), Some(CENTER));
        assert_eq!(ModeStateMachine::static_setpoint(Mode::Spare), Some(CENTER));
        assert_eq!(
            ModeStateMachine::static_setpoint(Mode::OffsetPositive),
            Some(Setpoint::new(2750, 2150))
        );
        assert_eq!(ModeStateMachine::static_setpoint(Mode::CircleForward), None);
        assert_eq!(ModeStateMachine::static_setpoint(Mode::CircleBackward), None);
    }
}
