//! Connection and battery status
//!
//! Two independent inputs, the BLE connection state pushed by the radio and
//! the battery level polled once per minute, are merged into one
//! [`AlertMode`]. Every change of the announced mode updates the status
//! bar, picks the tick granularity and plays exactly one vibration pattern.
//! While an alert is active the status bar blinks once per second.
//!
//! Battery polls only count when they cross the threshold relative to the
//! previous poll: the level turns low on `new < threshold <= old` and
//! recovers on `old < threshold <= new`. Polls that stay on one side update
//! the stored level without further effect. An optional recovery margin
//! moves the upward edge to `threshold + margin`.

pub mod haptics;

use core::fmt::Write;
use core::mem;

use crate::clock::TickGranularity;
use crate::config::MonitorConfig;
use crate::event::{ColorPair, Directive, Directives, Event, TextField};
use crate::text::FieldText;

use haptics::HapticPattern;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AlertMode {
    Normal,
    LowBattery,
    Disconnected,
    DisconnectedLowBattery,
}

impl AlertMode {
    pub fn classify(connected: bool, battery_low: bool) -> Self {
        match (connected, battery_low) {
            (true, false) => Self::Normal,
            (true, true) => Self::LowBattery,
            (false, false) => Self::Disconnected,
            (false, true) => Self::DisconnectedLowBattery,
        }
    }

    pub fn is_alert(self) -> bool {
        self != Self::Normal
    }

    pub fn is_disconnected(self) -> bool {
        matches!(self, Self::Disconnected | Self::DisconnectedLowBattery)
    }

    pub fn is_low_battery(self) -> bool {
        matches!(self, Self::LowBattery | Self::DisconnectedLowBattery)
    }

    /// Alerts blink and need second ticks, everything else minute ticks.
    pub fn granularity(self) -> TickGranularity {
        if self.is_alert() {
            TickGranularity::Second
        } else {
            TickGranularity::Minute
        }
    }

    /// Whether `self` carries an alert condition that `previous` did not
    fn adds_condition_to(self, previous: Self) -> bool {
        (self.is_disconnected() && !previous.is_disconnected())
            || (self.is_low_battery() && !previous.is_low_battery())
    }
}

/// Half cycle of the blinking status bar
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BlinkPhase {
    /// White on black
    Normal,
    /// Black on white
    Inverted,
}

impl BlinkPhase {
    /// Phase every blinking episode starts from
    pub const CANONICAL: Self = Self::Normal;

    pub fn toggled(self) -> Self {
        match self {
            Self::Normal => Self::Inverted,
            Self::Inverted => Self::Normal,
        }
    }

    pub fn colors(self) -> ColorPair {
        match self {
            Self::Normal => ColorPair::NORMAL,
            Self::Inverted => ColorPair::INVERTED,
        }
    }
}

/// Status bar text for `mode` at the given battery level
pub fn status_text(mode: AlertMode, battery_percent: u8) -> FieldText {
    let mut text = FieldText::new();
    // Writing into a bounded text never fails
    let _ = match mode {
        AlertMode::Normal => text.write_str("connected"),
        AlertMode::LowBattery => write!(text, "conn | LOW({})", battery_percent),
        AlertMode::Disconnected => text.write_str("DISCONNECTED"),
        AlertMode::DisconnectedLowBattery => write!(text, "DISC | LOW({})", battery_percent),
    };
    text
}

/// Owner of the connection, battery and blink state
#[derive(Debug, Clone)]
pub struct StatusMonitor {
    config: MonitorConfig,
    connected: bool,
    battery_percent: u8,
    /// Latched side of the hysteresis band
    battery_low: bool,
    /// Mode last shown to the user
    announced: AlertMode,
    granularity: TickGranularity,
    blink: BlinkPhase,
}

impl StatusMonitor {
    /// Create the monitor with the connection state queried at boot.
    ///
    /// The battery level starts at the configured default until the first
    /// poll.
    pub fn new(config: MonitorConfig, connected: bool) -> Self {
        let battery_percent = config.initial_battery_percent.min(100);
        let battery_low = battery_percent < config.battery_threshold;
        let announced = AlertMode::classify(connected, battery_low);

        Self {
            config,
            connected,
            battery_percent,
            battery_low,
            announced,
            granularity: announced.granularity(),
            blink: BlinkPhase::CANONICAL,
        }
    }

    /// Directives for the first draw of the status bar.
    pub fn start(&self) -> Directives {
        info!("status starts as {}", self.announced);
        let mut directives = Directives::new();
        directives.push(Directive::SetText {
            field: TextField::Status,
            text: status_text(self.announced, self.battery_percent),
        });
        directives.push(Directive::SetColors {
            field: TextField::Status,
            colors: self.blink.colors(),
        });
        directives.push(Directive::Subscribe(self.granularity));
        directives
    }

    pub fn handle(&mut self, event: &Event) -> Directives {
        match *event {
            Event::TickMinute {
                battery_percent, ..
            } => self.on_battery_poll(battery_percent),
            Event::TickSecond => self.on_second_tick(),
            Event::ConnectivityChanged(connected) => self.on_connectivity_changed(connected),
        }
    }

    /// Apply a connection state report. Repeated reports are ignored.
    pub fn on_connectivity_changed(&mut self, connected: bool) -> Directives {
        let mut directives = Directives::new();
        if connected == self.connected {
            trace!("connection state unchanged: {}", connected);
            return directives;
        }

        debug!("connection state changed: {}", connected);
        self.connected = connected;
        self.reconcile(&mut directives);
        directives
    }

    /// Apply a battery poll.
    ///
    /// Only polls crossing an edge of the hysteresis band re-evaluate the
    /// mode.
    pub fn on_battery_poll(&mut self, percent: u8) -> Directives {
        debug_assert!(percent <= 100, "battery percent out of range: {}", percent);
        let percent = percent.min(100);
        let previous = mem::replace(&mut self.battery_percent, percent);

        let threshold = self.config.battery_threshold;
        let recovery = self.config.recovery_level();
        let falls = percent < threshold && threshold <= previous;
        let recovers = previous < recovery && recovery <= percent;

        let mut directives = Directives::new();
        if falls || recovers {
            debug!("battery {}% -> {}%, low: {}", previous, percent, falls);
            self.battery_low = falls;
            self.reconcile(&mut directives);
        }
        directives
    }

    /// Advance the blinking status bar. Does nothing at minute granularity.
    pub fn on_second_tick(&mut self) -> Directives {
        let mut directives = Directives::new();
        if self.granularity != TickGranularity::Second {
            trace!("second tick without alert");
            return directives;
        }

        self.blink = self.blink.toggled();
        directives.push(Directive::SetColors {
            field: TextField::Status,
            colors: self.blink.colors(),
        });
        directives
    }

    /// Re-evaluate the mode and announce it if it changed.
    fn reconcile(&mut self, directives: &mut Directives) {
        let mode = AlertMode::classify(self.connected, self.battery_low);
        if mode == self.announced {
            debug!("status stays {}", mode);
            return;
        }

        let previous = mem::replace(&mut self.announced, mode);
        info!(
            "status {} -> {} (battery {}%)",
            previous, mode, self.battery_percent
        );

        directives.push(Directive::SetText {
            field: TextField::Status,
            text: status_text(mode, self.battery_percent),
        });

        if !mode.is_alert() || mode.adds_condition_to(previous) {
            self.blink = BlinkPhase::CANONICAL;
            directives.push(Directive::SetColors {
                field: TextField::Status,
                colors: self.blink.colors(),
            });
        }

        let granularity = mode.granularity();
        if granularity != self.granularity {
            self.granularity = granularity;
            directives.push(Directive::Subscribe(granularity));
        }

        directives.push(Directive::PlayHaptic(HapticPattern::for_mode(mode)));
    }

    pub fn mode(&self) -> AlertMode {
        self.announced
    }

    pub fn granularity(&self) -> TickGranularity {
        self.granularity
    }

    pub fn blink_phase(&self) -> BlinkPhase {
        self.blink
    }

    pub fn battery_percent(&self) -> u8 {
        self.battery_percent
    }

    pub fn is_connected(&self) -> bool {
        self.connected
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn monitor() -> StatusMonitor {
        StatusMonitor::new(MonitorConfig::default(), true)
    }

    fn haptic(directives: &Directives) -> Option<HapticPattern> {
        directives.iter().find_map(|directive| match directive {
            Directive::PlayHaptic(pattern) => Some(*pattern),
            _ => None,
        })
    }

    fn subscription(directives: &Directives) -> Option<TickGranularity> {
        directives.iter().find_map(|directive| match directive {
            Directive::Subscribe(granularity) => Some(*granularity),
            _ => None,
        })
    }

    fn status(directives: &Directives) -> Option<&str> {
        directives.iter().find_map(|directive| match directive {
            Directive::SetText {
                field: TextField::Status,
                text,
            } => Some(text.as_str()),
            _ => None,
        })
    }

    #[test]
    fn starts_normal_on_minute_ticks() {
        let monitor = monitor();
        assert_eq!(monitor.mode(), AlertMode::Normal);
        assert_eq!(monitor.battery_percent(), 100);

        let directives = monitor.start();
        assert_eq!(status(&directives), Some("connected"));
        assert_eq!(subscription(&directives), Some(TickGranularity::Minute));
        assert_eq!(haptic(&directives), None);
    }

    #[test]
    fn starts_disconnected_when_the_radio_is_down() {
        let monitor = StatusMonitor::new(MonitorConfig::default(), false);
        assert_eq!(monitor.mode(), AlertMode::Disconnected);
        let directives = monitor.start();
        assert_eq!(status(&directives), Some("DISCONNECTED"));
        assert_eq!(subscription(&directives), Some(TickGranularity::Second));
    }

    #[test]
    fn disconnect_alerts() {
        let mut monitor = monitor();
        let directives = monitor.on_connectivity_changed(false);

        assert_eq!(monitor.mode(), AlertMode::Disconnected);
        assert_eq!(
            directives.as_slice(),
            &[
                Directive::SetText {
                    field: TextField::Status,
                    text: "DISCONNECTED".into(),
                },
                Directive::SetColors {
                    field: TextField::Status,
                    colors: ColorPair::NORMAL,
                },
                Directive::Subscribe(TickGranularity::Second),
                Directive::PlayHaptic(HapticPattern::CustomAlert),
            ]
        );
    }

    #[test]
    fn duplicate_connectivity_reports_are_ignored() {
        let mut monitor = monitor();
        assert!(monitor.on_connectivity_changed(true).is_empty());

        assert!(!monitor.on_connectivity_changed(false).is_empty());
        assert!(monitor.on_connectivity_changed(false).is_empty());
        assert!(monitor.on_connectivity_changed(false).is_empty());
        assert_eq!(monitor.mode(), AlertMode::Disconnected);
    }

    #[test]
    fn battery_reacts_only_to_threshold_crossings() {
        let mut monitor = monitor();

        // 100 -> 25 stays on the good side
        assert!(monitor.on_battery_poll(25).is_empty());

        // 25 -> 19 crosses downwards
        let directives = monitor.on_battery_poll(19);
        assert_eq!(monitor.mode(), AlertMode::LowBattery);
        assert_eq!(status(&directives), Some("conn | LOW(19)"));
        assert_eq!(haptic(&directives), Some(HapticPattern::Long));
        assert_eq!(subscription(&directives), Some(TickGranularity::Second));

        // Replaying a value never triggers
        assert!(monitor.on_battery_poll(19).is_empty());

        // 19 -> 21 crosses upwards
        let directives = monitor.on_battery_poll(21);
        assert_eq!(monitor.mode(), AlertMode::Normal);
        assert_eq!(haptic(&directives), Some(HapticPattern::Short));

        // 21 -> 19 crosses downwards again
        let directives = monitor.on_battery_poll(19);
        assert_eq!(monitor.mode(), AlertMode::LowBattery);
        assert_eq!(haptic(&directives), Some(HapticPattern::Long));
        assert!(monitor.on_battery_poll(19).is_empty());
    }

    #[test]
    fn poll_sequence_switches_modes_at_each_crossing() {
        let mut monitor = monitor();
        let mut transitions = Vec::new();
        for percent in [25, 19, 19, 21, 21, 19, 10, 19] {
            if !monitor.on_battery_poll(percent).is_empty() {
                transitions.push((percent, monitor.mode()));
            }
        }

        assert_eq!(
            transitions,
            [
                (19, AlertMode::LowBattery),
                (21, AlertMode::Normal),
                (19, AlertMode::LowBattery),
            ]
        );
    }

    #[test]
    fn battery_recovers_when_crossing_back_up() {
        let mut monitor = monitor();
        monitor.on_battery_poll(15);
        assert_eq!(monitor.mode(), AlertMode::LowBattery);

        assert!(monitor.on_battery_poll(19).is_empty());
        let directives = monitor.on_battery_poll(22);
        assert_eq!(monitor.mode(), AlertMode::Normal);
        assert_eq!(status(&directives), Some("connected"));
        assert_eq!(subscription(&directives), Some(TickGranularity::Minute));
        assert_eq!(haptic(&directives), Some(HapticPattern::Short));
    }

    #[test]
    fn recovery_margin_delays_the_release() {
        let config = MonitorConfig {
            recovery_margin: 5,
            ..MonitorConfig::default()
        };
        let mut monitor = StatusMonitor::new(config, true);

        assert!(!monitor.on_battery_poll(15).is_empty());
        assert!(monitor.on_battery_poll(22).is_empty());
        assert_eq!(monitor.mode(), AlertMode::LowBattery);
        assert!(monitor.on_battery_poll(24).is_empty());

        assert!(!monitor.on_battery_poll(25).is_empty());
        assert_eq!(monitor.mode(), AlertMode::Normal);
    }

    #[test]
    fn low_battery_below_threshold_at_boot() {
        let config = MonitorConfig {
            initial_battery_percent: 10,
            ..MonitorConfig::default()
        };
        let monitor = StatusMonitor::new(config, true);
        assert_eq!(monitor.mode(), AlertMode::LowBattery);
        assert_eq!(monitor.granularity(), TickGranularity::Second);
    }

    #[test]
    fn entering_an_alert_resets_the_blink_phase() {
        let mut monitor = monitor();

        for ticks in 0..4 {
            monitor.on_connectivity_changed(false);
            assert_eq!(monitor.blink_phase(), BlinkPhase::CANONICAL);

            for _ in 0..=ticks {
                monitor.on_second_tick();
            }
            monitor.on_connectivity_changed(true);
        }

        // Same for a low battery alert
        monitor.on_second_tick();
        monitor.on_battery_poll(5);
        assert_eq!(monitor.blink_phase(), BlinkPhase::CANONICAL);
    }

    #[test]
    fn second_ticks_toggle_colors_during_alerts() {
        let mut monitor = monitor();
        monitor.on_connectivity_changed(false);

        let first = monitor.on_second_tick();
        assert_eq!(
            first.as_slice(),
            &[Directive::SetColors {
                field: TextField::Status,
                colors: ColorPair::INVERTED,
            }]
        );
        let second = monitor.on_second_tick();
        assert_eq!(
            second.as_slice(),
            &[Directive::SetColors {
                field: TextField::Status,
                colors: ColorPair::NORMAL,
            }]
        );
    }

    #[test]
    fn second_ticks_are_ignored_when_normal() {
        let mut monitor = monitor();
        assert!(monitor.on_second_tick().is_empty());
        assert_eq!(monitor.blink_phase(), BlinkPhase::CANONICAL);

        monitor.on_connectivity_changed(false);
        monitor.on_second_tick();
        monitor.on_connectivity_changed(true);
        assert!(monitor.on_second_tick().is_empty());
    }

    #[test]
    fn losing_the_connection_on_low_battery() {
        let mut monitor = monitor();
        monitor.on_battery_poll(12);
        monitor.on_second_tick();

        let directives = monitor.on_connectivity_changed(false);
        assert_eq!(monitor.mode(), AlertMode::DisconnectedLowBattery);
        assert_eq!(status(&directives), Some("DISC | LOW(12)"));
        assert_eq!(monitor.blink_phase(), BlinkPhase::CANONICAL);
        assert_eq!(haptic(&directives), Some(HapticPattern::CustomAlert));
        // Already on second ticks
        assert_eq!(subscription(&directives), None);
    }

    #[test]
    fn reconnecting_on_low_battery_keeps_blinking() {
        let mut monitor = StatusMonitor::new(MonitorConfig::default(), false);
        monitor.on_battery_poll(12);
        monitor.on_second_tick();
        let phase = monitor.blink_phase();

        let directives = monitor.on_connectivity_changed(true);
        assert_eq!(monitor.mode(), AlertMode::LowBattery);
        assert_eq!(status(&directives), Some("conn | LOW(12)"));
        assert_eq!(monitor.blink_phase(), phase);
        assert_eq!(subscription(&directives), None);
        assert_eq!(haptic(&directives), Some(HapticPattern::Long));
    }

    #[test]
    fn handle_dispatches_events() {
        let mut monitor = monitor();
        let time = crate::clock::TimeOfDay::new(8, 0);

        monitor.handle(&Event::ConnectivityChanged(false));
        assert!(!monitor.is_connected());

        monitor.handle(&Event::TickMinute {
            time,
            battery_percent: 15,
        });
        assert_eq!(monitor.mode(), AlertMode::DisconnectedLowBattery);

        assert_eq!(monitor.handle(&Event::TickSecond).len(), 1);
    }

    #[test]
    fn status_texts() {
        assert_eq!(status_text(AlertMode::Normal, 100), "connected");
        assert_eq!(status_text(AlertMode::LowBattery, 7), "conn | LOW(7)");
        assert_eq!(status_text(AlertMode::Disconnected, 7), "DISCONNECTED");
        assert_eq!(
            status_text(AlertMode::DisconnectedLowBattery, 19),
            "DISC | LOW(19)"
        );
    }
}
