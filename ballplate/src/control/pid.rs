// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Fixed-point PID controller for the plate servos.
//!
//! Works in `no_std`, does not allocate and uses integer math only. There is no `dt` term: the
//! controller assumes it is called at a fixed rate and the gains absorb the period.

use crate::config::{self, PidGains, PidLimits, PidScale, ServoAxis};
use crate::control::mode::Setpoint;
use crate::io::Position;

/// PID controller for one plate axis, producing a servo angle in tenths of a degree.
#[derive(Clone, Debug)]
pub struct AxisPid {
    gains: PidGains,
    limits: PidLimits,
    scale: PidScale,
    servo: ServoAxis,

    /// Error of the previous update
    last_error: i32,
    /// Clamped running sum of errors
    error_sum: i32,
    /// Clamped change in error over the last update
    error_derivative: i32,
}

impl AxisPid {
    /// Create a controller with the default limits and scale.
    pub const fn new(gains: PidGains, servo: ServoAxis) -> Self {
        Self {
            gains,
            limits: config::PID_LIMITS,
            scale: config::PID_SCALE,
            servo,
            last_error: 0,
            error_sum: 0,
            error_derivative: 0,
        }
    }

    /// Set integral and derivative clamps.
    pub fn with_limits(mut self, limits: PidLimits) -> Self {
        self.limits = limits;
        self
    }

    /// Set the fixed-point scale factors.
    pub fn with_scale(mut self, scale: PidScale) -> Self {
        self.scale = scale;
        self
    }

    /// Zero the integrator and derivative history.
    pub fn reset(&mut self) {
        self.last_error = 0;
        self.error_sum = 0;
        self.error_derivative = 0;
    }

    /// Run one update and return the servo angle.
    ///
    /// `setpoint` is the desired position and `measurement` the current one, both in panel counts.
    /// The result is always within `center ± range` of the servo axis.
    pub fn update(&mut self, setpoint: i32, measurement: i32) -> u16 {
        let error = setpoint - measurement;

        // Anti-windup by hard clamp only
        let sum_limit = self.limits.error_sum;
        self.error_sum = error_sum_step(self.error_sum, error, sum_limit);

        let d_limit = self.limits.derivative;
        self.error_derivative = (error - self.last_error).clamp(-d_limit, d_limit);

        let raw = self.raw_output(error);

        let range = i32::from(self.servo.range);
        let offset = (raw / self.scale.angle_div).clamp(-range, range);
        let angle = i32::from(self.servo.center) + offset;

        self.last_error = error;

        angle.clamp(0, i32::from(u16::MAX)) as u16
    }

    /// Unclamped controller output. Multiply/divide order matters for truncation.
    fn raw_output(&self, error: i32) -> i32 {
        let g = &self.gains;
        let s = &self.scale;

        let p = g.kp * error;
        let i = (g.ki * self.error_sum) / s.integral_div;
        let d = (g.kd * self.error_derivative) * s.derivative_mul;

        (p + i + d) / s.output_div
    }

    #[inline]
    pub fn error_sum(&self) -> i32 {
        self.error_sum
    }

    #[inline]
    pub fn error_derivative(&self) -> i32 {
        self.error_derivative
    }

    #[inline]
    pub fn last_error(&self) -> i32 {
        self.last_error
    }

    #[inline]
    pub fn servo(&self) -> ServoAxis {
        self.servo
    }
}

fn error_sum_step(sum: i32, error: i32, limit: i32) -> i32 {
    sum.saturating_add(error).clamp(-limit, limit)
}

/// Servo angles for both axes, tenths of a degree.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct ServoAngles {
    pub x: u16,
    pub y: u16,
}

/// Independent X and Y controllers.
#[derive(Clone, Debug)]
pub struct PlatePid {
    pub x: AxisPid,
    pub y: AxisPid,
}

impl PlatePid {
    pub const fn new(x: AxisPid, y: AxisPid) -> Self {
        Self { x, y }
    }

    pub fn reset(&mut self) {
        self.x.reset();
        self.y.reset();
    }

    pub fn update(&mut self, setpoint: Setpoint, position: Position) -> ServoAngles {
        ServoAngles {
            x: self
                .x
                .update(i32::from(setpoint.x), i32::from(position.x)),
            y: self
                .y
                .update(i32::from(setpoint.y), i32::from(position.y)),
        }
    }

    /// Servo angles that hold the plate level.
    pub fn center_angles(&self) -> ServoAngles {
        ServoAngles {
            x: self.x.servo().center,
            y: self.y.servo().center,
        }
    }
}

impl Default for PlatePid {
    fn default() -> Self {
        Self::new(
            AxisPid::new(config::PID_GAINS_X, config::SERVO_X),
            AxisPid::new(config::PID_GAINS_Y, config::SERVO_Y),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{PID_GAINS_X, PID_LIMITS, SERVO_X, SERVO_Y};

    fn x_axis() -> AxisPid {
        AxisPid::new(PID_GAINS_X, SERVO_X)
    }

    #[test]
    fn zero_error_holds_center() {
        let mut pid = PlatePid::default();
        let angles = pid.update(Setpoint::new(2150, 2150), Position::new(2150, 2150));
        assert_eq!(angles, ServoAngles { x: 880, y: 880 });
        assert_eq!(pid.x.error_sum(), 0);
        assert_eq!(pid.x.error_derivative(), 0);
        assert_eq!(pid.y.last_error(), 0);
    }

    #[test]
    fn first_step_matches_hand_computation() {
        let mut pid = x_axis();
        // e = 100, sum = 100, de = 100
        // raw = (120*100 + (5*100)/5 + (240*100)*5) / 100 = (12000 + 100 + 120000) / 100 = 1321
        // offset = 1321 / 10 = 132
        assert_eq!(pid.update(2250, 2150), 880 + 132);
        assert_eq!(pid.error_sum(), 100);
        assert_eq!(pid.error_derivative(), 100);
        assert_eq!(pid.last_error(), 100);

        // e = 100, sum = 200, de = 0
        // raw = (12000 + 200 + 0) / 100 = 122 -> 12
        assert_eq!(pid.update(2250, 2150), 880 + 12);
    }

    #[test]
    fn negative_output_truncates_toward_zero() {
        let mut pid = x_axis();
        // e = -7, sum = -7, de = -7
        // raw = (-840 + (-35)/5 + (-1680)*5) / 100 = (-840 - 7 - 8400) / 100 = -92 -> -9
        assert_eq!(pid.update(2143, 2150), 880 - 9);
    }

    #[test]
    fn error_sum_is_clamped() {
        let mut pid = x_axis();
        for _ in 0..1_000 {
            pid.update(4095, 0);
            assert!(pid.error_sum().abs() <= PID_LIMITS.error_sum);
        }
        assert_eq!(pid.error_sum(), PID_LIMITS.error_sum);

        for _ in 0..1_000 {
            pid.update(0, 4095);
        }
        assert_eq!(pid.error_sum(), -PID_LIMITS.error_sum);
    }

    #[test]
    fn derivative_is_clamped() {
        let mut pid = x_axis();
        pid.update(4095, 0);
        assert_eq!(pid.error_derivative(), PID_LIMITS.derivative);
        pid.update(0, 4095);
        assert_eq!(pid.error_derivative(), -PID_LIMITS.derivative);
    }

    #[test]
    fn output_stays_within_servo_range() {
        let mut pid = PlatePid::default();
        let inputs = [(4095, 0), (0, 4095), (2150, 2150), (4095, 4095), (0, 0)];
        for _ in 0..50 {
            for &(sp, pos) in inputs.iter() {
                let a = pid.update(Setpoint::new(sp, sp), Position::new(pos, pos));
                assert!(a.x >= SERVO_X.center - SERVO_X.range);
                assert!(a.x <= SERVO_X.center + SERVO_X.range);
                assert!(a.y >= SERVO_Y.center - SERVO_Y.range);
                assert!(a.y <= SERVO_Y.center + SERVO_Y.range);
            }
        }
    }

    #[test]
    fn saturates_at_range() {
        let mut pid = PlatePid::default();
        let a = pid.update(Setpoint::new(4095, 0), Position::new(0, 4095));
        assert_eq!(a.x, SERVO_X.center + SERVO_X.range);
        assert_eq!(a.y, SERVO_Y.center - SERVO_Y.range);
    }

    #[test]
    fn reset_clears_history() {
        let mut pid = PlatePid::default();
        pid.update(Setpoint::new(3000, 1000), Position::new(2000, 2000));
        pid.reset();
        assert_eq!(pid.x.error_sum(), 0);
        assert_eq!(pid.y.last_error(), 0);
        let a = pid.update(Setpoint::new(2150, 2150), Position::new(2150, 2150));
        assert_eq!(a, pid.center_angles());
    }

    #[test]
    fn custom_limits_apply() {
        let mut pid = x_axis().with_limits(PidLimits {
            error_sum: 10,
            derivative: 3,
        });
        pid.update(2200, 2150);
        assert_eq!(pid.error_sum(), 10);
        assert_eq!(pid.error_derivative(), 3);
    }
}
