// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Servo PWM on TIM4 using direct PAC register access.
//!
//! The counter ticks at 1 MHz and wraps every [`SERVO_FRAME_US`], so a duty value is a pulse
//! width in microseconds. CH1 drives PD12 and CH2 drives PD13.

use core::ops::Deref;

use stm32f7xx_hal::{pac, prelude::*, rcc::Clocks};

use crate::config::SERVO_FRAME_US;
use crate::hw::pins::ServoPins;

const COUNTER_HZ: u32 = 1_000_000;

/// PWM mode 1 with preload, for one 8-bit half of CCMR1.
const OC_PWM1_PRELOAD: u32 = (0b110 << 4) | (1 << 3);

/// TIM4 configured as a two-channel servo PWM generator.
pub struct ServoPwm {
    tim: pac::TIM4,
    pins: ServoPins,
}

impl ServoPwm {
    /// Configure TIM4 for 50 Hz servo frames on its AF2 pins. Outputs start disabled at zero duty.
    pub fn tim4(tim4: pac::TIM4, pins: ServoPins, clocks: &Clocks) -> Self {
        let rcc = unsafe { &*pac::RCC::ptr() };
        rcc.apb1enr.modify(|_, w| w.tim4en().set_bit());

        let tim = tim4;

        // Disable counter while configuring
        tim.cr1.modify(|_, w| w.cen().clear_bit());

        let psc = clocks.timclk1().raw() / COUNTER_HZ - 1;
        tim.psc.write(|w| unsafe { w.bits(psc) });
        tim.arr.write(|w| unsafe { w.bits(SERVO_FRAME_US - 1) });

        // CH1 and CH2 in PWM mode 1
        tim.ccmr1_output()
            .write(|w| unsafe { w.bits(OC_PWM1_PRELOAD | (OC_PWM1_PRELOAD << 8)) });
        tim.ccr1().write(|w| unsafe { w.bits(0) });
        tim.ccr2().write(|w| unsafe { w.bits(0) });

        // Load PSC/ARR, then run with ARR preload
        tim.egr.write(|w| w.ug().set_bit());
        tim.cr1.modify(|_, w| w.arpe().set_bit().cen().set_bit());

        Self { tim, pins }
    }

    /// Split into independent channel handles. PD12/PD13 stay on AF2 for good.
    pub fn split(self) -> (PwmChannel<1>, PwmChannel<2>) {
        (PwmChannel { _private: () }, PwmChannel { _private: () })
    }

    #[inline]
    pub fn free(self) -> (pac::TIM4, ServoPins) {
        (self.tim, self.pins)
    }
}

/// One TIM4 output channel. Only obtainable through [`ServoPwm::split`].
pub struct PwmChannel<const C: u8> {
    _private: (),
}

impl<const C: u8> PwmChannel<C> {
    #[inline]
    fn regs(&self) -> &'static <pac::TIM4 as Deref>::Target {
        unsafe { &*pac::TIM4::ptr() }
    }

    #[inline]
    fn enable_mask() -> u32 {
        // CCxE is bit 0 of each 4-bit CCER group
        1 << (4 * (u32::from(C) - 1))
    }
}

impl<const C: u8> _embedded_hal_PwmPin for PwmChannel<C> {
    type Duty = u16;

    fn disable(&mut self) {
        let mask = Self::enable_mask();
        self.regs()
            .ccer
            .modify(|r, w| unsafe { w.bits(r.bits() & !mask) });
    }

    fn enable(&mut self) {
        let mask = Self::enable_mask();
        self.regs()
            .ccer
            .modify(|r, w| unsafe { w.bits(r.bits() | mask) });
    }

    fn get_duty(&self) -> u16 {
        let tim = self.regs();
        let bits = match C {
            1 => tim.ccr1().read().bits(),
            _ => tim.ccr2().read().bits(),
        };
        bits as u16
    }

    fn get_max_duty(&self) -> u16 {
        SERVO_FRAME_US as u16
    }

    fn set_duty(&mut self, duty: u16) {
        let tim = self.regs();
        let duty = u32::from(duty);
        match C {
            1 => tim.ccr1().write(|w| unsafe { w.bits(duty) }),
            _ => tim.ccr2().write(|w| unsafe { w.bits(duty) }),
        }
    }
}
