//! General system configuration
//!
//! The S113 SoftDevice owns interrupt priorities 0, 1 and 4 as well as the
//! RTC0, TIMER0 and RADIO peripherals. Everything the watchface drives from
//! interrupts has to stay on the remaining levels.

use embassy_nrf::{
    config::{Config, Debug, HfclkSource, LfclkSource},
    interrupt::{self, InterruptExt, Priority},
};

pub struct SystemConfig {}

impl SystemConfig {
    /// HAL configuration that can run next to the SoftDevice
    pub fn new() -> Config {
        // `Config` is `non_exhaustive`, start from the defaults
        let mut config = Config::default();

        // The PineTime has both crystals fitted. The SoftDevice is set up for
        // the 32 kHz crystal as well, see `bluetooth::generate_config`.
        config.hfclk_source = HfclkSource::ExternalXtal;
        config.lfclk_source = LfclkSource::ExternalXtal;

        // DC/DC regulator for lower current draw between ticks
        config.dcdc.reg1 = true;

        // The embassy time driver runs on RTC1, GPIOTE serves the charge pin
        config.gpiote_interrupt_priority = Priority::P2;
        config.time_interrupt_priority = Priority::P2;

        // Keep the SWD port open for probe-rs and RTT logging
        config.debug = Debug::Allowed;

        config
    }

    /// Move the battery ADC and the display SPI off the default level 0,
    /// which the SoftDevice reserves.
    pub fn lower_driver_priorities() {
        interrupt::SAADC.set_priority(Priority::P3);
        interrupt::SPIM2_SPIS2_SPI2.set_priority(Priority::P3);
    }
}
