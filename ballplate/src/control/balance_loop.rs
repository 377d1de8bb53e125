// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Main control loop for the ball plate.
//!
//! The loop never waits. Each [`poll`](BalanceLoop::poll) claims whatever work the tick handler
//! has flagged and runs it in a fixed order:
//!
//! 1. touch: sample the panel and update touch presence
//! 2. setpoint: load the next circle point (circle modes only)
//! 3. PID: compute new servo angles
//! 4. motor: send the averaged angles to the servos
//! 5. telemetry: report the ball position
//! 6. link housekeeping (serial echo on the board)
//!
//! Steps 3–5 only do anything while the ball is on the panel. Their flags are still claimed
//! when it is not, so a lost touch drops that cycle instead of queueing it.
//!
//! Typical usage pattern:
//!
//! ```ignore
//! let mut app = BalanceLoop::new(&STATE, touch, servos, usart, red_led);
//! app.begin();
//! start_systick();
//! app.run();
//! ```

use crate::config::MOTOR_SAMPLES;
use crate::control::average::MotorAverage;
use crate::control::pid::{PlatePid, ServoAngles};
use crate::control::scheduler::Task;
use crate::control::state::ControlState;
use crate::io::{Axis, Position, PositionSource, ServoOutput, TelemetrySink, TouchIndicator};
use crate::protocol::telemetry;

/// Control loop state and its hardware collaborators.
pub struct BalanceLoop<'a, Touch, Servos, Link, Indicator> {
    state: &'a ControlState,
    touch: Touch,
    servos: Servos,
    link: Link,
    indicator: Indicator,

    pid: PlatePid,
    average_x: MotorAverage<MOTOR_SAMPLES>,
    average_y: MotorAverage<MOTOR_SAMPLES>,

    /// Last successful panel reading
    position: Position,
    touch_present: bool,
}

impl<'a, Touch, Servos, Link, Indicator> BalanceLoop<'a, Touch, Servos, Link, Indicator>
where
    Touch: PositionSource,
    Servos: ServoOutput,
    Link: TelemetrySink,
    Indicator: TouchIndicator,
{
    /// Create a loop with the default PID tuning.
    pub fn new(
        state: &'a ControlState,
        touch: Touch,
        servos: Servos,
        link: Link,
        indicator: Indicator,
    ) -> Self {
        Self::with_pid(state, touch, servos, link, indicator, PlatePid::default())
    }

    pub fn with_pid(
        state: &'a ControlState,
        touch: Touch,
        servos: Servos,
        link: Link,
        indicator: Indicator,
        pid: PlatePid,
    ) -> Self {
        let center = pid.center_angles();
        Self {
            state,
            touch,
            servos,
            link,
            indicator,
            pid,
            average_x: MotorAverage::new(center.x),
            average_y: MotorAverage::new(center.y),
            position: Position::default(),
            touch_present: false,
        }
    }

    /// Announce start-up and level the plate. Call once before the tick starts.
    pub fn begin(&mut self) {
        self.link.send(telemetry::START_LINE);

        let center = self.pid.center_angles();
        self.average_x.fill(center.x);
        self.average_y.fill(center.y);
        self.write_servos(center);
    }

    /// Run one pass over the due flags.
    pub fn poll(&mut self) {
        let state = self.state;
        let sched = &state.scheduler;
        let modes = &state.modes;

        if sched.take(Task::Touch) {
            self.update_touch();
        }

        if modes.setpoint_due().take() {
            modes.resolve_circle_setpoint();
        }

        // Claim first, then gate on touch.
        if sched.take(Task::Pid) && self.touch_present {
            self.update_pid();
        }

        if sched.take(Task::Motor) && self.touch_present {
            self.flush_motor_average();
        }

        if sched.take(Task::Telemetry) && self.touch_present {
            let line = telemetry::position_line(self.position);
            self.link.send(line.as_str());
        }

        self.link.service();
    }

    /// Free-spin forever; the loop is the idle task.
    pub fn run(&mut self) -> ! {
        loop {
            self.poll();
        }
    }

    fn update_touch(&mut self) {
        match self.touch.try_read_position() {
            Some(position) => {
                self.position = position;
                self.touch_present = true;
            }
            None => self.touch_present = false,
        }
        self.indicator.set_touched(self.touch_present);
    }

    fn update_pid(&mut self) {
        let setpoint = self.state.modes.setpoint();
        let angles = self.pid.update(setpoint, self.position);
        self.average_x.push(angles.x);
        self.average_y.push(angles.y);
    }

    /// Send the averaged PID output to the servos and return it.
    pub fn flush_motor_average(&mut self) -> ServoAngles {
        let angles = ServoAngles {
            x: self.average_x.average(),
            y: self.average_y.average(),
        };
        self.write_servos(angles);
        angles
    }

    fn write_servos(&mut self, angles: ServoAngles) {
        self.servos.set_angle(Axis::Y, angles.y);
        self.servos.set_angle(Axis::X, angles.x);
    }

    #[inline]
    pub fn touch_present(&self) -> bool {
        self.touch_present
    }

    #[inline]
    pub fn position(&self) -> Position {
        self.position
    }

    #[inline]
    pub fn pid(&self) -> &PlatePid {
        &self.pid
    }

    /// Consume the loop and return its collaborators.
    pub fn free(self) -> (Touch, Servos, Link, Indicator) {
        (self.touch, self.servos, self.link, self.indicator)
    }
}
