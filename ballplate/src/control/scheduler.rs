// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Tick-driven task scheduler.
//!
//! [`Scheduler::tick`] runs from the 1 kHz tick interrupt and only raises flags. The main loop
//! claims each flag with [`DueFlag::take`], so a flag is never consumed twice and never needs a
//! lock.

use core::sync::atomic::{AtomicBool, AtomicU32, Ordering};

use crate::config::{self, TaskTiming};

/// "Work is pending" signal shared between an interrupt and the main loop.
pub struct DueFlag(AtomicBool);

impl DueFlag {
    pub const fn new() -> Self {
        Self(AtomicBool::new(false))
    }

    /// Mark the work as pending. Raising an already raised flag is a no-op.
    #[inline]
    pub fn raise(&self) {
        self.0.store(true, Ordering::Release);
    }

    /// Test-and-clear. Returns true if the flag was raised.
    #[inline]
    pub fn take(&self) -> bool {
        self.0.swap(false, Ordering::AcqRel)
    }

    /// Drop any pending work without running it.
    #[inline]
    pub fn clear(&self) {
        self.0.store(false, Ordering::Release);
    }

    #[inline]
    pub fn is_raised(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

impl Default for DueFlag {
    fn default() -> Self {
        Self::new()
    }
}

/// Periodic tasks driven by the scheduler.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Task {
    Touch,
    Pid,
    Telemetry,
    Motor,
}

/// Tick counter plus one due flag per periodic task.
pub struct Scheduler {
    ticks: AtomicU32,
    touch: DueFlag,
    pid: DueFlag,
    telemetry: DueFlag,
    motor: DueFlag,
}

impl Scheduler {
    pub const fn new() -> Self {
        Self {
            ticks: AtomicU32::new(0),
            touch: DueFlag::new(),
            pid: DueFlag::new(),
            telemetry: DueFlag::new(),
            motor: DueFlag::new(),
        }
    }

    /// Advance one tick and raise the flags of every task due on it. Returns the new tick count.
    pub fn tick(&self) -> u32 {
        // Only the tick handler writes the counter, so load + store is enough.
        let t = self.ticks.load(Ordering::Relaxed).wrapping_add(1);
        self.ticks.store(t, Ordering::Relaxed);

        for task in [Task::Touch, Task::Pid, Task::Telemetry, Task::Motor] {
            if Self::timing(task).is_due(t) {
                self.flag(task).raise();
            }
        }
        t
    }

    /// Ticks since start-up (wrapping).
    #[inline]
    pub fn ticks(&self) -> u32 {
        self.ticks.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn flag(&self, task: Task) -> &DueFlag {
        match task {
            Task::Touch => &self.touch,
            Task::Pid => &self.pid,
            Task::Telemetry => &self.telemetry,
            Task::Motor => &self.motor,
        }
    }

    /// Claim the pending work of `task`.
    #[inline]
    pub fn take(&self, task: Task) -> bool {
        self.flag(task).take()
    }

    pub const fn timing(task: Task) -> TaskTiming {
        match task {
            Task::Touch => config::TOUCH_TIMING,
            Task::Pid => config::PID_TIMING,
            Task::Telemetry => config::TELEMETRY_TIMING,
            Task::Motor => config::MOTOR_TIMING,
        }
    }
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TASKS: [Task; 4] = [Task::Touch, Task::Pid, Task::Telemetry, Task::Motor];

    #[test]
    fn due_flag_take_clears() {
        let flag = DueFlag::new();
        assert!(!flag.take());
        flag.raise();
        flag.raise();
        assert!(flag.is_raised());
        assert!(flag.take());
        assert!(!flag.take());
    }

    #[test]
    fn touch_due_exactly_on_multiples_of_ten() {
        let sched = Scheduler::new();
        for _ in 0..1_000 {
            let t = sched.tick();
            assert_eq!(sched.take(Task::Touch), t % 10 == 0, "tick {}", t);
        }
    }

    #[test]
    fn touch_stays_due_across_counter_wrap() {
        let sched = Scheduler::new();
        sched.ticks.store(u32::MAX - 1, Ordering::Relaxed);

        assert_eq!(sched.tick(), u32::MAX);
        assert!(!sched.take(Task::Touch));
        assert_eq!(sched.tick(), 0);
        assert!(sched.take(Task::Touch));

        for _ in 0..10 {
            sched.tick();
        }
        assert_eq!(sched.ticks(), 10);
        assert!(sched.take(Task::Touch));
    }

    #[test]
    fn delayed_tasks_follow_rate_and_delay() {
        let sched = Scheduler::new();
        for _ in 0..2_000 {
            let t = sched.tick();
            for task in TASKS {
                let timing = Scheduler::timing(task);
                let expected = t > timing.delay && t % timing.rate == 0;
                assert_eq!(sched.take(task), expected, "{:?} at tick {}", task, t);
            }
        }
    }

    #[test]
    fn first_pid_and_motor_runs() {
        let sched = Scheduler::new();
        let mut first_pid = None;
        let mut first_motor = None;
        let mut first_telemetry = None;
        for _ in 0..400 {
            let t = sched.tick();
            if sched.take(Task::Pid) && first_pid.is_none() {
                first_pid = Some(t);
            }
            if sched.take(Task::Motor) && first_motor.is_none() {
                first_motor = Some(t);
            }
            if sched.take(Task::Telemetry) && first_telemetry.is_none() {
                first_telemetry = Some(t);
            }
        }
        assert_eq!(first_pid, Some(280));
        assert_eq!(first_motor, Some(320));
        assert_eq!(first_telemetry, Some(200));
    }

    #[test]
    fn unclaimed_flag_stays_raised() {
        let sched = Scheduler::new();
        for _ in 0..25 {
            sched.tick();
        }
        // Raised at 10 and 20, claimed once.
        assert!(sched.take(Task::Touch));
        assert!(!sched.take(Task::Touch));
        assert_eq!(sched.ticks(), 25);
    }
}
