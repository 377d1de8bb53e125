// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

#![no_main]
#![no_std]

use core::cell::RefCell;

use cortex_m::interrupt::{free, Mutex};
use cortex_m_rt::{entry, exception};
use panic_halt as _;

use hal::{
    pac::{self, interrupt},
    prelude::*,
    serial::{Config, Serial},
};
use stm32f7xx_hal as hal;

use ballplate::config::{SERVO_X, SERVO_Y, TELEMETRY_BAUD};
use ballplate::control::{BalanceLoop, ControlState};
use ballplate::drivers::{Servo, ServoPair, TouchPanel};
use ballplate::hw::{systick, BoardPins, Buttons, Led, ServoPwm, Usart};

static STATE: ControlState = ControlState::new();
static BUTTONS: Mutex<RefCell<Option<Buttons>>> = Mutex::new(RefCell::new(None));

#[exception]
fn SysTick() {
    STATE.tick();
}

#[interrupt]
fn EXTI2() {
    with_buttons(Buttons::on_edge);
}

#[interrupt]
fn EXTI3() {
    with_buttons(Buttons::on_edge);
}

#[interrupt]
fn TIM6_DAC() {
    with_buttons(|buttons| buttons.on_debounce_timeout(&STATE));
}

fn with_buttons(f: impl FnOnce(&mut Buttons)) {
    free(|cs| {
        if let Some(buttons) = BUTTONS.borrow(cs).borrow_mut().as_mut() {
            f(buttons);
        }
    });
}

#[entry]
fn main() -> ! {
    // Peripherals
    let dp = pac::Peripherals::take().unwrap();
    let mut cp = cortex_m::Peripherals::take().unwrap();

    // Clocks
    let rcc = dp.RCC.constrain();
    let clocks = rcc.cfgr.sysclk(216.MHz()).freeze();

    // GPIO
    let pins = BoardPins::new(dp.GPIOB, dp.GPIOC, dp.GPIOD, dp.GPIOE);

    // LED
    let mut led_green = Led::active_high(pins.leds.green);
    let led_red = Led::active_high(pins.leds.red);

    // USART3 (ST-LINK VCP)
    let usart_cfg = Config {
        baud_rate: TELEMETRY_BAUD.bps(),
        ..Default::default()
    };
    let serial = Serial::new(
        dp.USART3,
        (pins.usart3.tx, pins.usart3.rx),
        &clocks,
        usart_cfg,
    );
    let usart = Usart::new(serial);

    // TIM4 servos
    let (ch1, ch2) = ServoPwm::tim4(dp.TIM4, pins.servos, &clocks).split();
    let servos = ServoPair::new(
        Servo::new(ch1, SERVO_Y.center),
        Servo::new(ch2, SERVO_X.center),
    );

    // ADC1 touch panel
    let touch = TouchPanel::new(pins.touch, dp.ADC1);

    // Buttons are stored before their interrupts can run
    free(|cs| {
        let buttons = Buttons::new(pins.buttons.btn1, pins.buttons.btn2, dp.TIM6, &clocks);
        *BUTTONS.borrow(cs).borrow_mut() = Some(buttons);
    });

    let mut app = BalanceLoop::new(&STATE, touch, servos, usart, led_red);
    app.begin();

    systick::start(&mut cp.SYST, &clocks);
    led_green.on();

    app.run()
}
