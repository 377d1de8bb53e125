// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Line-oriented status stream sent to the host.
//!
//! After reset the board sends `START\r\n` once. Every telemetry period it then sends the ball
//! position as two 4-digit, zero-padded decimal fields:
//!
//! ```text
//! 2150,0987\r\n
//! ```
//!
//! Values above 9999 keep only their last four digits.

use core::fmt::Write;

use heapless::String;

use crate::io::Position;

/// Sent once at power-up.
pub const START_LINE: &str = "START\r\n";

/// Length of a position line: `XXXX,YYYY\r\n`.
pub const POSITION_LINE_LEN: usize = 11;

/// Format one position line.
pub fn position_line(position: Position) -> String<POSITION_LINE_LEN> {
    let mut line = String::new();
    // Fits exactly, so the write cannot fail.
    let _ = write!(
        line,
        "{:04},{:04}\r\n",
        four_digits(position.x),
        four_digits(position.y)
    );
    line
}

/// Last four decimal digits of `value`.
#[inline]
pub const fn four_digits(value: u16) -> u16 {
    value % 10_000
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pads_to_four_digits() {
        assert_eq!(position_line(Position::new(2150, 987)).as_str(), "2150,0987\r\n");
        assert_eq!(position_line(Position::new(0, 5)).as_str(), "0000,0005\r\n");
    }

    #[test]
    fn keeps_last_four_digits() {
        assert_eq!(four_digits(12_345), 2_345);
        assert_eq!(position_line(Position::new(12_345, 10_000)).as_str(), "2345,0000\r\n");
    }

    #[test]
    fn line_length_is_fixed() {
        let line = position_line(Position::new(u16::MAX, u16::MAX));
        assert_eq!(line.len(), POSITION_LINE_LEN);
        assert_eq!(line.as_str(), "5535,5535\r\n");
    }

    #[test]
    fn start_line_is_crlf_terminated() {
        assert_eq!(START_LINE.as_bytes(), b"START\r\n");
    }
}
