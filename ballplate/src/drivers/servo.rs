// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Hobby servo on a PWM channel.
//!
//! Angles are tenths of a degree over 0..=180°, mapped linearly onto
//! [`SERVO_MIN_PULSE_US`]..=[`SERVO_MAX_PULSE_US`]. The PWM channel must count in microseconds.

use stm32f7xx_hal::prelude::*;

use crate::config::{SERVO_MAX_PULSE_US, SERVO_MIN_PULSE_US};
use crate::io::{Axis, ServoOutput};

/// 180° in tenths of a degree.
const FULL_SCALE_TENTHS: u32 = 1_800;

/// Pulse width for an angle in tenths of a degree; angles past 180° are clamped.
pub const fn pulse_width_us(tenths: u16) -> u16 {
    let tenths = if tenths as u32 > FULL_SCALE_TENTHS {
        FULL_SCALE_TENTHS
    } else {
        tenths as u32
    };
    let span = SERVO_MAX_PULSE_US - SERVO_MIN_PULSE_US;
    (SERVO_MIN_PULSE_US + tenths * span / FULL_SCALE_TENTHS) as u16
}

pub struct Servo<Pwm> {
    pwm: Pwm,
    angle: u16,
}

impl<Pwm> Servo<Pwm>
where
    Pwm: _embedded_hal_PwmPin<Duty = u16>,
{
    /// Enable the channel and move to `initial` tenths of a degree.
    pub fn new(pwm: Pwm, initial: u16) -> Self {
        let mut servo = Self { pwm, angle: 0 };
        servo.set_angle(initial);
        servo.pwm.enable();
        servo
    }

    pub fn set_angle(&mut self, tenths: u16) {
        self.pwm.set_duty(pulse_width_us(tenths));
        self.angle = tenths;
    }

    /// Last commanded angle.
    #[inline]
    pub fn angle(&self) -> u16 {
        self.angle
    }

    pub fn free(mut self) -> Pwm {
        self.pwm.disable();
        self.pwm
    }
}

/// The two plate servos. Servo 1 tilts the Y axis and servo 2 the X axis.
pub struct ServoPair<Pwm1, Pwm2> {
    pub servo1: Servo<Pwm1>,
    pub servo2: Servo<Pwm2>,
}

impl<Pwm1, Pwm2> ServoPair<Pwm1, Pwm2>
where
    Pwm1: _embedded_hal_PwmPin<Duty = u16>,
    Pwm2: _embedded_hal_PwmPin<Duty = u16>,
{
    pub fn new(servo1: Servo<Pwm1>, servo2: Servo<Pwm2>) -> Self {
        Self { servo1, servo2 }
    }
}

impl<Pwm1, Pwm2> ServoOutput for ServoPair<Pwm1, Pwm2>
where
    Pwm1: _embedded_hal_PwmPin<Duty = u16>,
    Pwm2: _embedded_hal_PwmPin<Duty = u16>,
{
    fn set_angle(&mut self, axis: Axis, tenths: u16) {
        match axis {
            Axis::Y => self.servo1.set_angle(tenths),
            Axis::X => self.servo2.set_angle(tenths),
        }
    }
}
