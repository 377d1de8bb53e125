// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! # Ball Plate Firmware
//!
//! This crate contains the firmware for a two-servo ball-balancing plate, written in Rust,
//! targeting an STM32F767ZI MCU. A resistive touch panel reports where the ball is, two PID loops
//! tilt the plate to hold it at a setpoint, and two buttons cycle between holding still, holding
//! off-center and tracing a circle.
//!
//! ## Crate Structure
//!
//! | Module | Purpose |
//! | ------ | -------- |
//! | [`config`] | Timings, gains, setpoints and board constants |
//! | [`control`] | Scheduler, modes, PID and the main balance loop |
//! | [`io`] | Traits the control loop uses to reach the hardware |
//! | [`protocol`] | Serial telemetry framing |
//! | `hw` | MCU-level wrappers around ADC, USART, timers, EXTI (feature `board`) |
//! | `drivers` | Touch panel and servo drivers (feature `board`) |
//!
//! ## Getting Started
//!
//! Run the control core tests on the host:
//!
//! ```bash
//! cargo test -p ballplate
//! ```
//!
//! Flash the board:
//!
//! ```bash
//! cargo run --release --features board
//! ```
//!
//! ## License
//!
//! Licensed under the **MIT License**.
//! See the `LICENSE` file in the repository root for full terms.
//!
//! © 2025–2026 Christopher Liu

#![no_std]

#[cfg(test)]
extern crate std;

pub mod config;
pub mod control;
pub mod io;
pub mod protocol;

#[cfg(feature = "board")]
pub mod drivers;
#[cfg(feature = "board")]
pub mod hw;
