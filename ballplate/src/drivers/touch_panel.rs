// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Driver for a 4-wire resistive touch panel on PC0..PC3.
//!
//! Wiring:
//! - PC0: X+ plate (ADC123_IN10)
//! - PC1: X- plate (ADC123_IN11)
//! - PC2: Y+ plate (ADC123_IN12)
//! - PC3: Y- plate (ADC123_IN13)
//!
//! To read one axis the other plate is driven as a voltage divider (+ high, - low) and both
//! lines of the sensed plate are sampled. Between reads every line is left as a floating input.
//! The pins are reconfigured through the GPIOC registers, so the driver owns them for its
//! lifetime.

use core::ops::Deref;

use stm32f7xx_hal::pac;

use crate::config::{TOUCH_OVERSAMPLE, TOUCH_SETTLE_CYCLES};
use crate::hw::{pins::TouchPins, Adc};
use crate::io::{Position, PositionSource};

const XP: u32 = 0;
const XM: u32 = 1;
const YP: u32 = 2;
const YM: u32 = 3;

const XP_CHANNEL: u8 = 10;
const XM_CHANNEL: u8 = 11;
const YP_CHANNEL: u8 = 12;
const YM_CHANNEL: u8 = 13;

const MODE_INPUT: u32 = 0b00;
const MODE_OUTPUT: u32 = 0b01;
const MODE_ANALOG: u32 = 0b11;

const PULL_NONE: u32 = 0b00;
const PULL_UP: u32 = 0b01;

/// One plate: the two lines and their ADC channels.
#[derive(Copy, Clone)]
struct Plate {
    p: u32,
    m: u32,
    p_channel: u8,
    m_channel: u8,
}

const X_PLATE: Plate = Plate {
    p: XP,
    m: XM,
    p_channel: XP_CHANNEL,
    m_channel: XM_CHANNEL,
};

const Y_PLATE: Plate = Plate {
    p: YP,
    m: YM,
    p_channel: YP_CHANNEL,
    m_channel: YM_CHANNEL,
};

pub struct TouchPanel {
    _pins: TouchPins,
    adc: Adc<pac::ADC1>,
}

impl TouchPanel {
    /// Take the panel pins and ADC1. The panel starts with every line floating.
    pub fn new(pins: TouchPins, adc1: pac::ADC1) -> Self {
        let adc = Adc::adc1(adc1, &[XP_CHANNEL, XM_CHANNEL, YP_CHANNEL, YM_CHANNEL]);
        let panel = Self { _pins: pins, adc };
        panel.release();
        panel
    }

    /// True if something presses the plates together.
    ///
    /// Y plate held low, X lines pulled up; a touch drags at least one X line low.
    pub fn is_touched(&self) -> bool {
        let gpio = gpioc();

        gpio.bsrr
            .write(|w| unsafe { w.bits((1 << (16 + YP)) | (1 << (16 + YM))) });
        set_mode(YP, MODE_OUTPUT);
        set_mode(YM, MODE_OUTPUT);

        set_mode(XP, MODE_INPUT);
        set_mode(XM, MODE_INPUT);
        set_pull(XP, PULL_UP);
        set_pull(XM, PULL_UP);

        cortex_m::asm::delay(TOUCH_SETTLE_CYCLES);

        let idr = gpio.idr.read().bits();
        let both_high = (idr & (1 << XP) != 0) && (idr & (1 << XM) != 0);

        self.release();
        !both_high
    }

    /// X position in ADC counts. Only meaningful right after a successful [`is_touched`].
    ///
    /// [`is_touched`]: TouchPanel::is_touched
    pub fn read_x(&self) -> u16 {
        self.read_plate(X_PLATE, Y_PLATE)
    }

    /// Y position in ADC counts.
    pub fn read_y(&self) -> u16 {
        self.read_plate(Y_PLATE, X_PLATE)
    }

    fn read_plate(&self, sense: Plate, drive: Plate) -> u16 {
        let gpio = gpioc();

        gpio.bsrr
            .write(|w| unsafe { w.bits((1 << drive.p) | (1 << (16 + drive.m))) });
        set_mode(drive.p, MODE_OUTPUT);
        set_mode(drive.m, MODE_OUTPUT);

        set_pull(sense.p, PULL_NONE);
        set_pull(sense.m, PULL_NONE);
        set_mode(sense.p, MODE_ANALOG);
        set_mode(sense.m, MODE_ANALOG);

        let p = self.adc.read_averaged(sense.p_channel, TOUCH_OVERSAMPLE);
        let m = self.adc.read_averaged(sense.m_channel, TOUCH_OVERSAMPLE);

        self.release();
        combine_lines(p, m)
    }

    /// Every line to a floating input.
    fn release(&self) {
        for pin in [XP, XM, YP, YM] {
            set_pull(pin, PULL_NONE);
            set_mode(pin, MODE_INPUT);
        }
    }
}

impl PositionSource for TouchPanel {
    /// Presence check before each axis so a ball leaving mid-read is not reported.
    fn try_read_position(&mut self) -> Option<Position> {
        if !self.is_touched() {
            return None;
        }
        let x = self.read_x();

        if !self.is_touched() {
            return None;
        }
        let y = self.read_y();

        Some(Position::new(x, y))
    }
}

/// Rounded mean of the two lines of a plate.
#[inline]
fn combine_lines(p: u16, m: u16) -> u16 {
    ((u32::from(p) + u32::from(m) + 1) / 2) as u16
}

#[inline]
fn gpioc() -> &'static <pac::GPIOC as Deref>::Target {
    unsafe { &*pac::GPIOC::ptr() }
}

fn set_mode(pin: u32, mode: u32) {
    let shift = 2 * pin;
    gpioc()
        .moder
        .modify(|r, w| unsafe { w.bits((r.bits() & !(0b11 << shift)) | (mode << shift)) });
}

fn set_pull(pin: u32, pull: u32) {
    let shift = 2 * pin;
    gpioc()
        .pupdr
        .modify(|r, w| unsafe { w.bits((r.bits() & !(0b11 << shift)) | (pull << shift)) });
}
