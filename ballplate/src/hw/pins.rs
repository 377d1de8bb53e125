// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Pin definitions for the STM32F767ZI Nucleo board driving the ball plate.

use stm32f7xx_hal::{
    gpio::{gpiob, gpioc, gpiod, gpioe, Alternate, Analog, Input, Output, PullUp, PushPull},
    pac,
    prelude::*,
};

/// All board pins. Construct this once at startup using:
///
/// ```ignore
/// let pins = BoardPins::new(dp.GPIOB, dp.GPIOC, dp.GPIOD, dp.GPIOE);
/// ```
pub struct BoardPins {
    pub leds: Leds,
    pub usart3: Usart3Pins,
    pub servos: ServoPins,
    pub buttons: ButtonPins,
    pub touch: TouchPins,
}

pub struct Leds {
    pub green: gpiob::PB0<Output<PushPull>>, // LD1
    pub blue: gpiob::PB7<Output<PushPull>>,  // LD2
    pub red: gpiob::PB14<Output<PushPull>>,  // LD3
}

/// ST-LINK virtual COM port
pub struct Usart3Pins {
    pub tx: gpiod::PD8<Alternate<7>>,
    pub rx: gpiod::PD9<Alternate<7>>,
}

pub struct ServoPins {
    pub servo1: gpiod::PD12<Alternate<2>>, // TIM4_CH1, Y axis
    pub servo2: gpiod::PD13<Alternate<2>>, // TIM4_CH2, X axis
}

pub struct ButtonPins {
    pub btn1: gpioe::PE2<Input<PullUp>>,
    pub btn2: gpioe::PE3<Input<PullUp>>,
}

/// Resistive panel plates. The touch driver reconfigures these at runtime.
pub struct TouchPins {
    pub xp: gpioc::PC0<Analog>, // ADC123_IN10
    pub xm: gpioc::PC1<Analog>, // ADC123_IN11
    pub yp: gpioc::PC2<Analog>, // ADC123_IN12
    pub ym: gpioc::PC3<Analog>, // ADC123_IN13
}

impl BoardPins {
    pub fn new(gpiob: pac::GPIOB, gpioc: pac::GPIOC, gpiod: pac::GPIOD, gpioe: pac::GPIOE) -> Self {
        let gpiob = gpiob.split();
        let gpioc = gpioc.split();
        let gpiod = gpiod.split();
        let gpioe = gpioe.split();

        Self {
            leds: Leds {
                green: gpiob.pb0.into_push_pull_output(),
                blue: gpiob.pb7.into_push_pull_output(),
                red: gpiob.pb14.into_push_pull_output(),
            },

            usart3: Usart3Pins {
                tx: gpiod.pd8.into_alternate::<7>(),
                rx: gpiod.pd9.into_alternate::<7>(),
            },

            servos: ServoPins {
                servo1: gpiod.pd12.into_alternate::<2>(),
                servo2: gpiod.pd13.into_alternate::<2>(),
            },

            buttons: ButtonPins {
                btn1: gpioe.pe2.into_pull_up_input(),
                btn2: gpioe.pe3.into_pull_up_input(),
            },

            touch: TouchPins {
                xp: gpioc.pc0.into_analog(),
                xm: gpioc.pc1.into_analog(),
                yp: gpioc.pc2.into_analog(),
                ym: gpioc.pc3.into_analog(),
            },
        }
    }
}
