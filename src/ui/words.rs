//! Time to words
//!
//! The minute is rounded to the nearest five minute bucket. Buckets up to
//! half past refer to the current hour ("ten past four"), later buckets to
//! the next one ("twenty to five"). Minutes 58 and 59 round up to the next
//! full hour.
//!
//! Rounding is half up at the 2.5 minute midpoints. Integer minutes never
//! hit a midpoint exactly, so xx:x2 rounds down and xx:x3 rounds up.

use core::fmt::Write;

use crate::clock::TimeOfDay;
use crate::config::TEXT_CAPACITY;
use crate::text::BoundedText;

use super::locale::Locale;

/// Layout of the time phrase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PhraseMode {
    /// One line: "quarter past four"
    Consolidated,
    /// Three lines: hour, connector, minutes
    Split3,
}

/// Relation between the minute bucket and the referenced hour
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Connector {
    /// Full hour
    OClock,
    /// Minutes after the current hour
    Past,
    /// Minutes before the next hour
    To,
}

/// A time read off a five minute dial
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reading {
    bucket: u8,
    connector: Connector,
    hour: u8,
}

impl Reading {
    pub fn of(time: TimeOfDay) -> Self {
        let index = (time.minute() + 2) / 5;
        let next_hour = (time.hour() + 1) % 24;

        let (bucket, connector, hour) = match index * 5 {
            0 => (0, Connector::OClock, time.hour()),
            60 => (0, Connector::OClock, next_hour),
            bucket @ 5..=30 => (bucket, Connector::Past, time.hour()),
            bucket => (bucket, Connector::To, next_hour),
        };

        Self {
            bucket,
            connector,
            hour,
        }
    }

    /// Minute bucket (0, 5, …, 55)
    pub fn bucket(&self) -> u8 {
        self.bucket
    }

    pub fn connector(&self) -> Connector {
        self.connector
    }

    /// Referenced hour on a 24 hour clock
    pub fn hour(&self) -> u8 {
        self.hour
    }

    /// Referenced hour on the 12 hour dial (1–12)
    pub fn dial_hour(&self) -> u8 {
        match self.hour % 12 {
            0 => 12,
            hour => hour,
        }
    }

    /// Minutes between the referenced full hour and the bucket
    pub fn distance(&self) -> u8 {
        match self.connector {
            Connector::OClock => 0,
            Connector::Past => self.bucket,
            Connector::To => 60 - self.bucket,
        }
    }
}

/// Time phrase sized for display fields of `N` bytes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WordPhrase<const N: usize = TEXT_CAPACITY> {
    Consolidated(BoundedText<N>),
    Split3 {
        /// Hour word
        lead: BoundedText<N>,
        /// Connector word, empty at the full hour
        connector: BoundedText<N>,
        /// Minute word, empty at the full hour
        minute: BoundedText<N>,
    },
}

/// Put `time` into words.
///
/// Never fails. Words that do not fit a field are cut at its capacity.
pub fn format<const N: usize, L: Locale>(
    time: TimeOfDay,
    mode: PhraseMode,
    locale: &L,
) -> WordPhrase<N> {
    let reading = Reading::of(time);
    let hour = locale.hour(reading.dial_hour());
    let connector = locale.connector(reading.connector());

    match mode {
        PhraseMode::Consolidated => {
            let mut text = BoundedText::new();
            // Writing into a bounded text never fails
            let _ = match reading.connector() {
                Connector::OClock => write!(text, "{} {}", hour, connector),
                _ => write!(
                    text,
                    "{} {} {}",
                    locale.minutes(reading.distance()),
                    connector,
                    hour
                ),
            };
            WordPhrase::Consolidated(text)
        }
        PhraseMode::Split3 => match reading.connector() {
            Connector::OClock => WordPhrase::Split3 {
                lead: hour.into(),
                connector: BoundedText::new(),
                minute: BoundedText::new(),
            },
            _ => WordPhrase::Split3 {
                lead: hour.into(),
                connector: connector.into(),
                minute: locale.minutes(reading.distance()).into(),
            },
        },
    }
}
