//! Backlight control
//!
//! Implementation based upon https://github.com/dbrgn/pinetime-rtic/blob/master/pinetime-rtic/src/backlight.rs
//! and https://wiki.pine64.org/wiki/PineTime.

use embassy_nrf::{
    gpio::{Output, Pin},
    peripherals::{P0_14, P0_22, P0_23},
};

/// Control the backlight.
///
/// There are three active-low backlight pins, each connected to a FET that
/// toggles backlight power through a resistor.
///
/// - Low: 2.2 kΩ
/// - Mid: 100 Ω
/// - High: 30 Ω
///
/// Through combinations of these pins, 7 brightness levels (+ off) can be
/// configured.
pub struct Backlight<'a> {
    low: Output<'a, P0_14>,
    mid: Output<'a, P0_22>,
    high: Output<'a, P0_23>,
    /// The current brightness level (value between 0 and 7).
    brightness: u8,
}

impl<'a> Backlight<'a> {
    /// Configure backlight pins on boot, starting switched off
    pub fn init(low: Output<'a, P0_14>, mid: Output<'a, P0_22>, high: Output<'a, P0_23>) -> Self {
        let mut backlight = Self {
            low,
            mid,
            high,
            brightness: 0,
        };
        backlight.apply();
        backlight
    }

    /// Set the brightness level between 0 (off) and 7 (max brightness).
    pub fn set(&mut self, brightness: u8) -> Result<(), Error> {
        if brightness > 7 {
            return Err(Error::OutOfBounds);
        }
        defmt::debug!("Setting backlight brightness to {}", brightness);
        self.brightness = brightness;
        self.apply();
        Ok(())
    }

    /// Return the current brightness level (value between 0 and 7).
    pub fn brightness(&self) -> u8 {
        self.brightness
    }

    fn apply(&mut self) {
        let level = self.brightness;
        drive(&mut self.low, level & 0x01 > 0);
        drive(&mut self.mid, level & 0x02 > 0);
        drive(&mut self.high, level & 0x04 > 0);
    }
}

/// Backlight pins are active low
fn drive<T: Pin>(pin: &mut Output<'_, T>, on: bool) {
    if on {
        pin.set_low();
    } else {
        pin.set_high();
    }
}

#[derive(Debug, defmt::Format)]
pub enum Error {
    OutOfBounds,
}
