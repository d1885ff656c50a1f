//! Time keeping module for PineTime

use chrono::{DateTime, Duration, NaiveDateTime};
use embassy_time::Instant;

pub struct TimeReference {
    /// Clock time
    time: NaiveDateTime,
    /// Related system time
    instant: Instant,
}

impl Default for TimeReference {
    fn default() -> Self {
        Self {
            time: NaiveDateTime::UNIX_EPOCH,
            instant: Instant::from_ticks(0),
        }
    }
}

impl TimeReference {
    /// Create new time reference from seconds since the Unix epoch, valid now
    pub fn from_epoch(secs: i64) -> Self {
        let time = DateTime::from_timestamp(secs, 0)
            .map(|time| time.naive_utc())
            .unwrap_or(NaiveDateTime::UNIX_EPOCH);

        Self {
            time,
            instant: Instant::now(),
        }
    }
}

pub struct TimeManager {
    reference: TimeReference,
}

impl TimeManager {
    /// Initialize time measurement on boot
    pub fn init(reference: TimeReference) -> Self {
        Self { reference }
    }

    /// Get current time
    pub fn now(&self) -> NaiveDateTime {
        let elapsed = Instant::now().duration_since(self.reference.instant);
        self.reference.time + Duration::microseconds(elapsed.as_micros() as i64)
    }
}
