// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! State shared between the interrupt handlers and the main loop.
//!
//! Typically placed in a `static` and handed by reference to the SysTick handler, the button
//! debouncer and the [`BalanceLoop`](crate::control::BalanceLoop):
//!
//! ```ignore
//! static STATE: ControlState = ControlState::new();
//!
//! #[exception]
//! fn SysTick() {
//!     STATE.tick();
//! }
//! ```

use crate::control::mode::{ButtonListener, ModeStateMachine};
use crate::control::scheduler::Scheduler;

/// Scheduler flags plus the mode state machine.
pub struct ControlState {
    pub scheduler: Scheduler,
    pub modes: ModeStateMachine,
}

impl ControlState {
    pub const fn new() -> Self {
        Self {
            scheduler: Scheduler::new(),
            modes: ModeStateMachine::new(),
        }
    }

    /// Tick handler body: raise due tasks and step circle playback.
    pub fn tick(&self) -> u32 {
        let t = self.scheduler.tick();
        self.modes.on_tick(t);
        t
    }
}

impl Default for ControlState {
    fn default() -> Self {
        Self::new()
    }
}

impl ButtonListener for ControlState {
    fn on_buttons(&self, btn1: bool, btn2: bool) {
        self.modes.on_button_event(btn1, btn2);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::control::mode::Mode;
    use crate::control::scheduler::Task;

    #[test]
    fn tick_drives_scheduler_and_circle() {
        let state = ControlState::new();
        state.on_buttons(false, true); // 0 -> 5
        state.on_buttons(false, true); // 5 -> 4
        assert_eq!(state.modes.mode(), Mode::CircleBackward);

        for _ in 0..10 {
            state.tick();
        }
        assert_eq!(state.scheduler.ticks(), 10);
        assert!(state.scheduler.take(Task::Touch));
        // Stepped at ticks 5 and 10.
        assert_eq!(state.modes.cursor().index(), 358);
        assert!(state.modes.setpoint_due().take());
    }

    #[test]
    fn circle_forward_advances_at_rate() {
        let state = ControlState::new();
        state.modes.enter(Mode::CircleForward);
        for _ in 0..360 * 5 {
            state.tick();
        }
        // One full revolution.
        assert_eq!(state.modes.cursor().index(), 0);

        state.modes.cursor().set_rate(20);
        for _ in 0..100 {
            state.tick();
        }
        assert_eq!(state.modes.cursor().index(), 5);
    }

    #[test]
    fn static_mode_never_steps_cursor() {
        let state = ControlState::new();
        state.modes.enter(Mode::OffsetPositive);
        for _ in 0..500 {
            state.tick();
        }
        assert_eq!(state.modes.cursor().index(), 0);
        assert!(!state.modes.setpoint_due().is_raised());
    }
}
