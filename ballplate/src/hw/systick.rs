// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! SysTick as the scheduler tick source.

use cortex_m::peripheral::{syst::SystClkSource, SYST};
use stm32f7xx_hal::rcc::Clocks;

use crate::config::TICK_HZ;

/// Start SysTick firing its exception at [`TICK_HZ`] from the core clock.
///
/// The `SysTick` exception handler must be defined before this is called.
pub fn start(syst: &mut SYST, clocks: &Clocks) {
    syst.set_clock_source(SystClkSource::Core);
    syst.set_reload(clocks.sysclk().raw() / TICK_HZ - 1);
    syst.clear_current();
    syst.enable_interrupt();
    syst.enable_counter();
}
