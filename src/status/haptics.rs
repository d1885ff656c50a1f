//! Vibration patterns
//!
//! A pattern is a fixed schedule of motor on and off segments in
//! milliseconds, starting with the motor on.

use super::AlertMode;

/// Short pulse length in ms
const SHORT_MS: u16 = 200;
/// Long pulse length in ms
const LONG_MS: u16 = 400;

const SHORT: [u16; 1] = [SHORT_MS];
const LONG: [u16; 1] = [LONG_MS];
const CUSTOM_ALERT: [u16; 5] = [LONG_MS, SHORT_MS, LONG_MS, SHORT_MS, LONG_MS];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum HapticPattern {
    /// Single short pulse, all good again
    Short,
    /// Single long pulse, battery is low
    Long,
    /// Three long pulses, connection lost
    CustomAlert,
}

impl HapticPattern {
    /// Pattern announcing that `mode` was entered
    pub fn for_mode(mode: AlertMode) -> Self {
        match mode {
            AlertMode::Normal => Self::Short,
            AlertMode::LowBattery => Self::Long,
            AlertMode::Disconnected | AlertMode::DisconnectedLowBattery => Self::CustomAlert,
        }
    }

    /// On/off durations in ms, starting with on
    pub fn segments(self) -> &'static [u16] {
        match self {
            Self::Short => &SHORT,
            Self::Long => &LONG,
            Self::CustomAlert => &CUSTOM_ALERT,
        }
    }

    /// Total duration in ms
    pub fn duration_ms(self) -> u32 {
        self.segments().iter().map(|&ms| u32::from(ms)).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn patterns_grow_with_urgency() {
        let short = HapticPattern::Short.duration_ms();
        let long = HapticPattern::Long.duration_ms();
        let alert = HapticPattern::CustomAlert.duration_ms();
        assert!(short < long && long < alert);
    }

    #[test]
    fn patterns_start_and_end_with_a_pulse() {
        for pattern in [
            HapticPattern::Short,
            HapticPattern::Long,
            HapticPattern::CustomAlert,
        ] {
            assert_eq!(pattern.segments().len() % 2, 1);
        }
    }

    #[test]
    fn disconnection_outranks_low_battery() {
        assert_eq!(
            HapticPattern::for_mode(AlertMode::DisconnectedLowBattery),
            HapticPattern::for_mode(AlertMode::Disconnected)
        );
        assert_ne!(
            HapticPattern::for_mode(AlertMode::LowBattery),
            HapticPattern::for_mode(AlertMode::Disconnected)
        );
    }
}
