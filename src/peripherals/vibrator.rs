//! Vibration motor
//!
//! Implementation based upon https://github.com/tstellanova/cst816s/blob/master/examples/touchpad.rs
//! and https://wiki.pine64.org/wiki/PineTime.

use embassy_nrf::{gpio::Output, peripherals::P0_16};
use embassy_time::Timer;
use pinetime_wordclock::status::haptics::HapticPattern;

struct VibratorConfig<'a> {
    /// Motor enable pin (inverted)
    pin_enable: Output<'a, P0_16>,
}

pub struct Vibrator {
    /// Vibrator configuration
    config: VibratorConfig<'static>,
}

impl Vibrator {
    /// Configure vibrator on boot
    pub fn init(enable_pin: Output<'static, P0_16>) -> Self {
        let mut vibrator = Self {
            config: VibratorConfig {
                pin_enable: enable_pin,
            },
        };
        vibrator.off();
        vibrator
    }

    /// Play a pattern, alternating between motor on and off.
    pub async fn play(&mut self, pattern: HapticPattern) {
        for (index, &duration_ms) in pattern.segments().iter().enumerate() {
            if index % 2 == 0 {
                self.on();
            } else {
                self.off();
            }
            Timer::after_millis(duration_ms as u64).await;
        }
        self.off();
    }

    fn on(&mut self) {
        self.config.pin_enable.set_low();
    }

    fn off(&mut self) {
        self.config.pin_enable.set_high();
    }
}
