// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! # Control Algorithms
//!
//! Everything between the touch panel reading and the servo command, independent of the MCU.
//!
//! ## Modules
//!
//! - [`scheduler`] - Tick counter and per-task due flags.
//! - [`mode`] - Button-driven operating modes and setpoint selection.
//! - [`path`] - Circular setpoint path and its playback cursor.
//! - [`pid`] - Integer PID controller for both plate axes.
//! - [`average`] - Moving average over recent servo commands.
//! - [`state`] - State shared with the interrupt handlers.
//! - [`balance_loop`] - Main loop tying the above to the hardware.

pub mod average;
pub mod balance_loop;
pub mod mode;
pub mod path;
pub mod pid;
pub mod scheduler;
pub mod state;

pub use average::MotorAverage;
pub use balance_loop::BalanceLoop;
pub use mode::{ButtonListener, Mode, ModeStateMachine, Setpoint};
pub use pid::{AxisPid, PlatePid, ServoAngles};
pub use scheduler::{DueFlag, Scheduler, Task};
pub use state::ControlState;
