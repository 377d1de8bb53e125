// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Basic ADC support for STM32F7 using direct PAC register access.
//!
//! Thin wrapper around ADC1 with blocking single-channel reads, used by the touch panel.
//!
//! Example:
//! ```ignore
//! let adc = Adc::adc1(dp.ADC1, &[10, 11]);
//! let value = adc.read_averaged(10, 4);
//! ```

use stm32f7xx_hal::pac;

/// Longest sample time (480 cycles); the panel plates are high impedance.
const SAMPLE_TIME: u32 = 0b111;

/// ADC wrapper over a PAC ADCx peripheral.
pub struct Adc<ADC> {
    adc: ADC,
}

impl<ADC> Adc<ADC> {
    #[inline]
    pub fn free(self) -> ADC {
        self.adc
    }
}

fn configure_common() {
    let common = unsafe { &*pac::ADC_COMMON::ptr() };

    // ADC prescaler: PCLK2 / 4
    common.ccr.modify(|_, w| w.adcpre().div4());
}

fn init_basic_adc(adc: &pac::adc1::RegisterBlock) {
    // Power off to configure
    adc.cr2.modify(|_, w| w.adon().clear_bit());

    // 12-bit, right-aligned, software trigger
    adc.cr1.modify(|_, w| w.res().bits(0b00));
    adc.cr2.modify(|_, w| {
        w.cont().clear_bit();
        w.align().right();
        w.exten().disabled();
        w
    });

    // Power on
    adc.cr2.modify(|_, w| w.adon().set_bit());
}

/// Set the sample time of `channel`. Channels 10..=18 live in SMPR1, 0..=9 in SMPR2.
fn set_sample_time(adc: &pac::adc1::RegisterBlock, channel: u8) {
    if channel >= 10 {
        let shift = 3 * u32::from(channel - 10);
        adc.smpr1
            .modify(|r, w| unsafe { w.bits(r.bits() | (SAMPLE_TIME << shift)) });
    } else {
        let shift = 3 * u32::from(channel);
        adc.smpr2
            .modify(|r, w| unsafe { w.bits(r.bits() | (SAMPLE_TIME << shift)) });
    }
}

/// Read a single channel from the given ADC peripheral.
fn read_channel(adc: &pac::adc1::RegisterBlock, channel: u8) -> u16 {
    // Sequence length = 1 conversion
    adc.sqr1.modify(|_, w| w.l().bits(0));

    // Set channel
    adc.sqr3
        .modify(|_, w| unsafe { w.sq1().bits(channel & 0x1F) });

    // Start
    adc.cr2.modify(|_, w| w.swstart().set_bit());

    // Wait for completion
    while adc.sr.read().eoc().bit_is_clear() {}

    adc.dr.read().data().bits() as u16
}

impl Adc<pac::ADC1> {
    /// Create and initialize ADC1, with the long sample time on every channel in `channels`.
    pub fn adc1(adc1: pac::ADC1, channels: &[u8]) -> Self {
        let rcc = unsafe { &*pac::RCC::ptr() };
        rcc.apb2enr.modify(|_, w| w.adc1en().set_bit());

        configure_common();
        init_basic_adc(&adc1);
        for &ch in channels {
            set_sample_time(&adc1, ch);
        }

        Self { adc: adc1 }
    }

    /// Read a single channel.
    #[inline]
    pub fn read(&self, channel: u8) -> u16 {
        read_channel(&self.adc, channel)
    }

    /// Rounded mean of `samples` back-to-back conversions of `channel`.
    pub fn read_averaged(&self, channel: u8, samples: u32) -> u16 {
        let samples = samples.max(1);
        let sum: u32 = (0..samples).map(|_| u32::from(self.read(channel))).sum();
        ((sum + samples / 2) / samples) as u16
    }
}
