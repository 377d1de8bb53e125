// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! # Device-Specific Drivers
//!
//! This module contains device-specific drivers that sit above the raw `hw/` layer and below the
//! control loop.
//!
//! ## Existing drivers
//!
//! - [`touch_panel`] – 4-wire resistive touch panel read through ADC1
//! - [`servo`] – Hobby servos on TIM4 PWM, paired per plate axis

pub mod servo;
pub mod touch_panel;

pub use servo::{Servo, ServoPair};
pub use touch_panel::TouchPanel;
