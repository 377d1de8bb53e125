// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Interfaces between the control core and the board.
//!
//! The balance loop only talks to hardware through these traits, so the whole loop can run on
//! the host against test doubles.

/// Raw touch-panel position (12-bit counts per axis).
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct Position {
    pub x: u16,
    pub y: u16,
}

impl Position {
    pub const fn new(x: u16, y: u16) -> Self {
        Self { x, y }
    }
}

/// Platform tilt axis.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Axis {
    X,
    Y,
}

/// Something that can report where the ball is.
pub trait PositionSource {
    /// Sample the ball position. `None` means nothing is touching the panel.
    fn try_read_position(&mut self) -> Option<Position>;
}

/// Servo pair tilting the platform.
pub trait ServoOutput {
    /// Command `axis` to `tenths` of a degree. The value is already clamped.
    fn set_angle(&mut self, axis: Axis, tenths: u16);
}

/// Outgoing status stream.
pub trait TelemetrySink {
    fn send(&mut self, line: &str);

    /// Called once per loop pass for link upkeep such as draining received bytes.
    fn service(&mut self) {}
}

/// Visible touch-presence indicator.
pub trait TouchIndicator {
    fn set_touched(&mut self, touched: bool);
}

/// Boards without an indicator.
impl TouchIndicator for () {
    fn set_touched(&mut self, _touched: bool) {}
}
