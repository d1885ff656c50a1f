//! Battery level sensor
//!
//! Implementation based upon https://github.com/dbrgn/pinetime-rtic/blob/master/pinetime-rtic/src/battery.rs
//! and https://wiki.pine64.org/wiki/PineTime.

use embassy_nrf::{gpio::Input, peripherals::P0_12, saadc::Saadc};

/// Battery configuration
struct BatteryConfig<'a> {
    /// ADC instance for battery voltage measurement
    adc: Saadc<'a, 1>,
    /// Charge indication pin:
    /// high = battery, low = charging
    pin_charge_indication: Input<'a, P0_12>,
}

/// Battery API
pub struct Battery {
    /// Battery configuration
    config: BatteryConfig<'static>,
}

impl Battery {
    /// Configure battery settings on boot
    pub fn init(adc: Saadc<'static, 1>, charge_pin: Input<'static, P0_12>) -> Self {
        Self {
            config: BatteryConfig {
                adc,
                pin_charge_indication: charge_pin,
            },
        }
    }

    /// Charging state of the battery
    pub fn is_charging(&self) -> bool {
        self.config.pin_charge_indication.is_low()
    }

    /// Battery capacity in percent (0–100)
    pub async fn percent(&mut self) -> Result<u8, Error> {
        Ok(percent_from_millivolts(self.millivolts().await?))
    }

    /// Battery voltage in millivolts
    async fn millivolts(&mut self) -> Result<u16, Error> {
        let mut buf = [0; 1];
        self.config.adc.sample(&mut buf).await;
        match buf[0] {
            // For detailed explanation of formula check https://wiki.pine64.org/wiki/PineTime
            // Use u32 during calculation to prevent overflow
            raw @ 0..=4095 => Ok((raw as u32 * 2000 / 1241) as u16),
            _ => Err(Error::InvalidMeasurement),
        }
    }
}

/// Estimate the remaining capacity from the cell voltage.
///
/// Linear interpolation between fixed points of the LiPo discharge curve.
fn percent_from_millivolts(voltage: u16) -> u8 {
    (match voltage {
        0..=3449 => 0,
        3450..=3699 => (voltage - 3450) / 5,
        3700..=4199 => 50 + (voltage - 3700) / 10,
        _ => 100,
    }) as u8
}

#[derive(Debug, defmt::Format)]
pub enum Error {
    InvalidMeasurement,
}
