// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Debounced push buttons.
//!
//! Both buttons are active low with internal pull-ups and interrupt on either edge through EXTI.
//! Every edge restarts a one-shot TIM6 countdown; when it expires the pins are sampled once and,
//! if anything is held, the snapshot goes to a [`ButtonListener`].
//!
//! Wiring in the interrupt handlers:
//!
//! ```ignore
//! #[interrupt]
//! fn EXTI2() {
//!     with_buttons(|b| b.on_edge());
//! }
//!
//! #[interrupt]
//! fn TIM6_DAC() {
//!     with_buttons(|b| b.on_debounce_timeout(&STATE));
//! }
//! ```

use stm32f7xx_hal::{
    gpio::{gpioe, Input, PullUp},
    pac::{self, Interrupt, NVIC},
    rcc::Clocks,
};

use crate::config::DEBOUNCE_MS;
use crate::control::ButtonListener;

const BTN1_LINE: u32 = 2;
const BTN2_LINE: u32 = 3;
const LINE_MASK: u32 = (1 << BTN1_LINE) | (1 << BTN2_LINE);

/// SYSCFG_EXTICR port code for GPIOE.
const PORT_E: u32 = 0b0100;

/// Debounce timer resolution.
const DEBOUNCE_TICK_HZ: u32 = 10_000;

pub struct Buttons {
    _btn1: gpioe::PE2<Input<PullUp>>,
    _btn2: gpioe::PE3<Input<PullUp>>,
    tim: pac::TIM6,
}

impl Buttons {
    /// Route PE2/PE3 to EXTI2/EXTI3 on both edges and arm TIM6 as the debounce one-shot.
    ///
    /// Interrupts are unmasked in the NVIC; install the handlers before calling this.
    pub fn new(
        btn1: gpioe::PE2<Input<PullUp>>,
        btn2: gpioe::PE3<Input<PullUp>>,
        tim6: pac::TIM6,
        clocks: &Clocks,
    ) -> Self {
        let rcc = unsafe { &*pac::RCC::ptr() };
        rcc.apb2enr.modify(|_, w| w.syscfgen().set_bit());
        rcc.apb1enr.modify(|_, w| w.tim6en().set_bit());

        // EXTICR1 holds lines 0..=3, four bits each
        let syscfg = unsafe { &*pac::SYSCFG::ptr() };
        syscfg.exticr1.modify(|r, w| unsafe {
            let cleared = r.bits() & !((0xF << (4 * BTN1_LINE)) | (0xF << (4 * BTN2_LINE)));
            w.bits(cleared | (PORT_E << (4 * BTN1_LINE)) | (PORT_E << (4 * BTN2_LINE)))
        });

        let exti = unsafe { &*pac::EXTI::ptr() };
        exti.rtsr.modify(|r, w| unsafe { w.bits(r.bits() | LINE_MASK) });
        exti.ftsr.modify(|r, w| unsafe { w.bits(r.bits() | LINE_MASK) });
        exti.pr.write(|w| unsafe { w.bits(LINE_MASK) });
        exti.imr.modify(|r, w| unsafe { w.bits(r.bits() | LINE_MASK) });

        let tim = tim6;
        tim.cr1.modify(|_, w| w.cen().clear_bit());
        let psc = clocks.timclk1().raw() / DEBOUNCE_TICK_HZ - 1;
        tim.psc.write(|w| unsafe { w.bits(psc) });
        tim.arr
            .write(|w| unsafe { w.bits(DEBOUNCE_MS * DEBOUNCE_TICK_HZ / 1_000 - 1) });

        // One-pulse, update interrupt on overflow only, so UG below stays silent
        tim.cr1.modify(|_, w| w.opm().set_bit().urs().set_bit());
        tim.egr.write(|w| w.ug().set_bit());
        tim.sr.write(|w| unsafe { w.bits(0) });
        tim.dier.modify(|_, w| w.uie().set_bit());

        unsafe {
            NVIC::unmask(Interrupt::EXTI2);
            NVIC::unmask(Interrupt::EXTI3);
            NVIC::unmask(Interrupt::TIM6_DAC);
        }

        Self {
            _btn1: btn1,
            _btn2: btn2,
            tim,
        }
    }

    /// EXTI handler body: acknowledge the edge and restart the debounce window.
    pub fn on_edge(&mut self) {
        let exti = unsafe { &*pac::EXTI::ptr() };
        exti.pr.write(|w| unsafe { w.bits(LINE_MASK) });

        self.tim.cr1.modify(|_, w| w.cen().clear_bit());
        self.tim.cnt.write(|w| unsafe { w.bits(0) });
        self.tim.cr1.modify(|_, w| w.cen().set_bit());
    }

    /// Debounce timer handler body: sample the buttons and notify `listener` if any is held.
    pub fn on_debounce_timeout<L: ButtonListener + ?Sized>(&mut self, listener: &L) {
        self.tim.sr.write(|w| unsafe { w.bits(0) });

        let (btn1, btn2) = self.held();
        if btn1 || btn2 {
            listener.on_buttons(btn1, btn2);
        }
    }

    /// Current (btn1, btn2) state; a low pin is a pressed button.
    pub fn held(&self) -> (bool, bool) {
        let gpioe = unsafe { &*pac::GPIOE::ptr() };
        let idr = gpioe.idr.read().bits();
        (idr & (1 << BTN1_LINE) == 0, idr & (1 << BTN2_LINE) == 0)
    }
}
