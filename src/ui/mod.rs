//! UI definitions module
//! Based on: https://github.com/lupyuen/pinetime-watchface/blob/master/src/lib.rs

use crate::clock::TimeOfDay;
use crate::event::{Directives, Event};

pub mod face;
pub mod locale;
pub mod words;

pub use face::WordClockFace;

pub trait WatchFace {
    /// Directives for the first full draw at `time`
    fn start(&mut self, time: TimeOfDay) -> Directives;

    /// Update watchface with an event
    fn handle(&mut self, event: Event) -> Directives;
}
