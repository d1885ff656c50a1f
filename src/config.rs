//! Watchface configuration

use crate::ui::words::PhraseMode;

/// Capacity of every display text field in bytes
pub const TEXT_CAPACITY: usize = 28;

/// Battery percentage below which the battery counts as low
pub const BATTERY_THRESHOLD: u8 = 20;

/// Percentage points above the threshold the battery has to reach before
/// a low battery alert is released again. Zero releases it on the first
/// poll back at or above the threshold.
pub const RECOVERY_MARGIN: u8 = 0;

/// Assumed battery level until the first poll
pub const INITIAL_BATTERY_PERCENT: u8 = 100;

/// Status monitor settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonitorConfig {
    /// Low battery threshold in percent
    pub battery_threshold: u8,
    /// Hysteresis band above the threshold
    pub recovery_margin: u8,
    /// Battery level used until the first poll arrives
    pub initial_battery_percent: u8,
}

impl MonitorConfig {
    /// Level the battery has to reach to leave the low battery state
    pub fn recovery_level(&self) -> u8 {
        self.battery_threshold.saturating_add(self.recovery_margin)
    }
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            battery_threshold: BATTERY_THRESHOLD,
            recovery_margin: RECOVERY_MARGIN,
            initial_battery_percent: INITIAL_BATTERY_PERCENT,
        }
    }
}

/// Watchface settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FaceConfig {
    /// Layout of the time phrase
    pub phrase_mode: PhraseMode,
    pub monitor: MonitorConfig,
}

impl Default for FaceConfig {
    fn default() -> Self {
        Self {
            phrase_mode: PhraseMode::Split3,
            monitor: MonitorConfig::default(),
        }
    }
}
