// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! # MCU Wrappers
//!
//! Thin layers over the STM32F7 peripherals the ball plate uses. Device-level logic lives in
//! [`crate::drivers`].

pub mod adc;
pub mod buttons;
pub mod led;
pub mod pins;
pub mod pwm;
pub mod systick;
pub mod usart;

pub use adc::Adc;
pub use buttons::Buttons;
pub use led::Led;
pub use pins::BoardPins;
pub use pwm::{PwmChannel, ServoPwm};
pub use usart::Usart;
