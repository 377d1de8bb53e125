// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Serial protocol spoken by the ball plate.

pub mod telemetry;

pub use telemetry::{position_line, START_LINE};
