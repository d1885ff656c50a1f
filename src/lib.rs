//! Word clock watchface for the PineTime
//!
//! Shows the time as words ("quarter past four") and a status bar that
//! reports the BLE connection and the battery with blinking and vibration.
//!
//! This library holds everything that does not touch hardware and builds
//! on the host. The firmware binary feeds it [`event::Event`]s and carries
//! out the returned [`event::Directive`]s.
#![cfg_attr(not(test), no_std)]

// This mod MUST go first, so that the others see its macros.
mod fmt;

pub mod clock;
pub mod config;
pub mod event;
pub mod status;
pub mod text;
pub mod ui;

pub use clock::{TickGranularity, TimeOfDay};
pub use event::{Directive, Directives, Event, TextField};
pub use status::{AlertMode, StatusMonitor};
pub use ui::{WatchFace, WordClockFace};
