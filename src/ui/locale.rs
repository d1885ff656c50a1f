//! Word tables for the word clock

use super::words::Connector;

/// Word table of one language.
///
/// The phrase selection lives in [`super::words`], a locale only supplies
/// the words.
pub trait Locale {
    /// Word for an hour on the 12 hour dial (1–12)
    fn hour(&self, hour: u8) -> &'static str;

    /// Word for a distance in minutes from the full hour, in steps of five
    /// (5–30)
    fn minutes(&self, minutes: u8) -> &'static str;

    /// Word linking minutes and hour, or marking the full hour
    fn connector(&self, connector: Connector) -> &'static str;
}

/// English words
#[derive(Debug, Clone, Copy, Default)]
pub struct English;

const ENGLISH_HOURS: [&str; 12] = [
    "twelve", "one", "two", "three", "four", "five", "six", "seven", "eight", "nine", "ten",
    "eleven",
];

impl Locale for English {
    fn hour(&self, hour: u8) -> &'static str {
        ENGLISH_HOURS[usize::from(hour % 12)]
    }

    fn minutes(&self, minutes: u8) -> &'static str {
        match minutes {
            5 => "five",
            10 => "ten",
            15 => "quarter",
            20 => "twenty",
            25 => "twenty-five",
            30 => "half",
            _ => "",
        }
    }

    fn connector(&self, connector: Connector) -> &'static str {
        match connector {
            Connector::OClock => "o'clock",
            Connector::Past => "past",
            Connector::To => "to",
        }
    }
}
