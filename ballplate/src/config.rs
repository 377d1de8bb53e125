// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Compile-time configuration for the ball plate.
//!
//! Times are in scheduler ticks (1 tick = 1 ms), positions in raw touch-panel counts (12-bit,
//! 0..4095) and servo angles in tenths of a degree (900 = 90°).

use crate::control::mode::Setpoint;

/// Scheduler tick frequency.
pub const TICK_HZ: u32 = 1_000;

/// Rate and start-up delay of one periodic task, in ticks.
///
/// A task is due on every tick `t` with `t % rate == 0` and `t > delay`. A zero delay disables
/// the gate, so such a task stays due across a counter wrap.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct TaskTiming {
    pub rate: u32,
    pub delay: u32,
}

impl TaskTiming {
    /// Returns true if the task is due on tick `t`.
    #[inline]
    pub const fn is_due(&self, t: u32) -> bool {
        (self.delay == 0 || t > self.delay) && t % self.rate == 0
    }
}

pub const TOUCH_TIMING: TaskTiming = TaskTiming { rate: 10, delay: 0 };
pub const TELEMETRY_TIMING: TaskTiming = TaskTiming {
    rate: 100,
    delay: 100,
};
pub const PID_TIMING: TaskTiming = TaskTiming {
    rate: 40,
    delay: 240,
};
pub const MOTOR_TIMING: TaskTiming = TaskTiming {
    rate: 40,
    delay: 280,
};

// ----- Setpoints -----

/// Touch-panel coordinates of the plate center.
pub const CENTER: Setpoint = Setpoint { x: 2150, y: 2150 };

/// X offset of the two off-center static setpoints.
pub const SETPOINT_OFFSET_X: u16 = 600;

/// Ticks per circle index step when a circle mode is entered.
pub const CIRCLE_DEFAULT_RATE: u16 = 5;

// ----- PID -----

/// Integer PID gains for one axis.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct PidGains {
    pub kp: i32,
    pub ki: i32,
    pub kd: i32,
}

/// Symmetric clamps applied to the integral and derivative terms.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct PidLimits {
    pub error_sum: i32,
    pub derivative: i32,
}

/// Fixed-point scale factors of the PID output.
///
/// `raw = (kp*e + (ki*sum)/integral_div + (kd*de)*derivative_mul) / output_div`, then the angle
/// offset is `raw / angle_div`. Changing these requires retuning the gains.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct PidScale {
    pub integral_div: i32,
    pub derivative_mul: i32,
    pub output_div: i32,
    pub angle_div: i32,
}

/// Servo center angle and allowed swing either side of it.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct ServoAxis {
    pub center: u16,
    pub range: u16,
}

pub const PID_GAINS_X: PidGains = PidGains {
    kp: 120,
    ki: 5,
    kd: 240,
};
pub const PID_GAINS_Y: PidGains = PidGains {
    kp: 120,
    ki: 5,
    kd: 220,
};

/// Kept low: the integral is only clamped, never reset.
pub const PID_LIMITS: PidLimits = PidLimits {
    error_sum: 100_000,
    derivative: 500,
};

pub const PID_SCALE: PidScale = PidScale {
    integral_div: 5,
    derivative_mul: 5,
    output_div: 100,
    angle_div: 10,
};

pub const SERVO_X: ServoAxis = ServoAxis {
    center: 880,
    range: 300,
};
pub const SERVO_Y: ServoAxis = ServoAxis {
    center: 880,
    range: 350,
};

/// Number of PID outputs averaged per motor update. 1 disables smoothing.
pub const MOTOR_SAMPLES: usize = 1;

// ----- Board -----

pub const TELEMETRY_BAUD: u32 = 115_200;

/// Button debounce window in milliseconds.
pub const DEBOUNCE_MS: u32 = 10;

/// Servo PWM frame length (50 Hz).
pub const SERVO_FRAME_US: u32 = 20_000;
/// Pulse width at 0°.
pub const SERVO_MIN_PULSE_US: u32 = 600;
/// Pulse width at 180°.
pub const SERVO_MAX_PULSE_US: u32 = 2_500;

/// Busy-wait after enabling the touch pull-ups, in core cycles (~100 µs at 216 MHz).
pub const TOUCH_SETTLE_CYCLES: u32 = 21_600;

/// ADC conversions averaged per touch line sample.
pub const TOUCH_OVERSAMPLE: u32 = 4;

const _: () = assert!(MOTOR_SAMPLES > 0);
const _: () = assert!(CIRCLE_DEFAULT_RATE > 0);
const _: () = assert!(
    TOUCH_TIMING.rate > 0 && TELEMETRY_TIMING.rate > 0 && PID_TIMING.rate > 0 && MOTOR_TIMING.rate > 0
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn touch_is_due_every_ten_ticks() {
        assert!(!TOUCH_TIMING.is_due(9));
        assert!(TOUCH_TIMING.is_due(10));
        assert!(TOUCH_TIMING.is_due(20));
        assert!(TOUCH_TIMING.is_due(0));
    }

    #[test]
    fn delay_suppresses_early_ticks() {
        assert!(!PID_TIMING.is_due(240));
        assert!(PID_TIMING.is_due(280));
        assert!(!TELEMETRY_TIMING.is_due(100));
        assert!(TELEMETRY_TIMING.is_due(200));
    }
}
