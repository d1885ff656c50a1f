//! Time of day and tick scheduling
//!
//! The clock source wakes up either once per minute or once per second. It
//! reports a minute tick whenever the wall clock minute moved on since the
//! last report, independent of the granularity, so that the time phrase and
//! the battery are refreshed exactly once per minute.

use chrono::{NaiveDateTime, NaiveTime, Timelike};

/// Hour and minute on a 24 hour clock
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TimeOfDay {
    hour: u8,
    minute: u8,
}

impl TimeOfDay {
    /// Create a time of day, wrapping values that are out of range.
    ///
    /// Out of range values are a caller bug and trip an assertion in
    /// debug builds.
    pub fn new(hour: u8, minute: u8) -> Self {
        debug_assert!(hour < 24, "hour out of range: {}", hour);
        debug_assert!(minute < 60, "minute out of range: {}", minute);
        Self {
            hour: hour % 24,
            minute: minute % 60,
        }
    }

    /// Create a time of day, rejecting values that are out of range.
    pub fn try_new(hour: u8, minute: u8) -> Result<Self, Error> {
        if hour >= 24 {
            return Err(Error::HourOutOfRange(hour));
        }
        if minute >= 60 {
            return Err(Error::MinuteOutOfRange(minute));
        }
        Ok(Self { hour, minute })
    }

    /// Hour (0–23)
    pub fn hour(&self) -> u8 {
        self.hour
    }

    /// Minute (0–59)
    pub fn minute(&self) -> u8 {
        self.minute
    }
}

impl From<NaiveTime> for TimeOfDay {
    fn from(time: NaiveTime) -> Self {
        Self {
            hour: time.hour() as u8,
            minute: time.minute() as u8,
        }
    }
}

impl From<&NaiveDateTime> for TimeOfDay {
    fn from(date_time: &NaiveDateTime) -> Self {
        date_time.time().into()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    HourOutOfRange(u8),
    MinuteOutOfRange(u8),
}

/// How often the clock source wakes up
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TickGranularity {
    Minute,
    Second,
}

/// Ticks due at one wake-up of the clock source
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Ticks {
    /// The minute changed since the last report
    pub minute: bool,
    /// Second granularity is active
    pub second: bool,
}

/// Tick bookkeeping of the clock source
#[derive(Debug, Clone)]
pub struct TickSchedule {
    granularity: TickGranularity,
    last_minute: Option<TimeOfDay>,
}

impl TickSchedule {
    pub fn new(granularity: TickGranularity) -> Self {
        Self {
            granularity,
            last_minute: None,
        }
    }

    pub fn granularity(&self) -> TickGranularity {
        self.granularity
    }

    /// Replace the current subscription.
    pub fn set_granularity(&mut self, granularity: TickGranularity) {
        if granularity != self.granularity {
            debug!("tick granularity {} -> {}", self.granularity, granularity);
            self.granularity = granularity;
        }
    }

    /// Mark `time` as already reported, e.g. after the initial draw.
    pub fn mark_reported(&mut self, time: TimeOfDay) {
        self.last_minute = Some(time);
    }

    /// Seconds to sleep until the next wake-up, given the current second.
    pub fn delay_secs(&self, second: u8) -> u64 {
        match self.granularity {
            TickGranularity::Minute => 60 - u64::from(second.min(59)),
            TickGranularity::Second => 1,
        }
    }

    /// Ticks to deliver at a wake-up at `time`.
    pub fn ticks(&mut self, time: TimeOfDay) -> Ticks {
        let minute = self.last_minute != Some(time);
        if minute {
            self.last_minute = Some(time);
        }

        Ticks {
            minute,
            second: self.granularity == TickGranularity::Second,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn try_new_rejects_out_of_range() {
        assert_eq!(TimeOfDay::try_new(24, 0), Err(Error::HourOutOfRange(24)));
        assert_eq!(TimeOfDay::try_new(0, 60), Err(Error::MinuteOutOfRange(60)));
        assert!(TimeOfDay::try_new(23, 59).is_ok());
    }

    #[test]
    fn converts_from_chrono() {
        let time = NaiveTime::from_hms_opt(16, 45, 12).unwrap();
        assert_eq!(TimeOfDay::from(time), TimeOfDay::new(16, 45));
    }

    #[test]
    fn minute_granularity_sleeps_until_the_next_minute() {
        let schedule = TickSchedule::new(TickGranularity::Minute);
        assert_eq!(schedule.delay_secs(0), 60);
        assert_eq!(schedule.delay_secs(42), 18);
        assert_eq!(schedule.delay_secs(59), 1);
    }

    #[test]
    fn second_granularity_sleeps_one_second() {
        let schedule = TickSchedule::new(TickGranularity::Second);
        assert_eq!(schedule.delay_secs(0), 1);
        assert_eq!(schedule.delay_secs(42), 1);
    }

    #[test]
    fn minute_tick_fires_once_per_minute() {
        let mut schedule = TickSchedule::new(TickGranularity::Second);
        let first = schedule.ticks(TimeOfDay::new(9, 14));
        assert_eq!(first, Ticks { minute: true, second: true });

        // Remaining seconds of the same minute only blink
        for _ in 0..59 {
            let ticks = schedule.ticks(TimeOfDay::new(9, 14));
            assert_eq!(ticks, Ticks { minute: false, second: true });
        }

        assert!(schedule.ticks(TimeOfDay::new(9, 15)).minute);
    }

    #[test]
    fn switching_granularity_keeps_minute_bookkeeping() {
        let mut schedule = TickSchedule::new(TickGranularity::Minute);
        schedule.mark_reported(TimeOfDay::new(20, 0));

        schedule.set_granularity(TickGranularity::Second);
        assert_eq!(
            schedule.ticks(TimeOfDay::new(20, 0)),
            Ticks { minute: false, second: true }
        );

        schedule.set_granularity(TickGranularity::Minute);
        assert_eq!(
            schedule.ticks(TimeOfDay::new(20, 1)),
            Ticks { minute: true, second: false }
        );
    }
}
