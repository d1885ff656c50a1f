//! Messages in and out of the watchface
//!
//! Everything that happens to the watch arrives as an [`Event`]. The
//! watchface answers with [`Directives`] that the firmware carries out on
//! the display, the vibration motor and the clock source.

use embedded_graphics::pixelcolor::BinaryColor;
use heapless::Vec;

use crate::clock::{TickGranularity, TimeOfDay};
use crate::status::haptics::HapticPattern;
use crate::text::FieldText;

/// External input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Event {
    /// The minute changed. Carries the freshly polled battery level.
    TickMinute {
        time: TimeOfDay,
        battery_percent: u8,
    },
    /// One second passed while second ticks are subscribed
    TickSecond,
    /// The connectivity sensor reported a connection state
    ConnectivityChanged(bool),
}

/// Text fields on the display
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TextField {
    /// Single line time phrase
    Phrase,
    /// First line of the three line phrase (hour)
    Lead,
    /// Second line of the three line phrase (past/to)
    Connector,
    /// Third line of the three line phrase (minutes)
    Minute,
    /// Connection and battery status bar
    Status,
}

/// Text and background color of a field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorPair {
    pub foreground: BinaryColor,
    pub background: BinaryColor,
}

impl ColorPair {
    /// White on black
    pub const NORMAL: Self = Self {
        foreground: BinaryColor::On,
        background: BinaryColor::Off,
    };

    /// Black on white
    pub const INVERTED: Self = Self {
        foreground: BinaryColor::Off,
        background: BinaryColor::On,
    };
}

/// Request to one of the collaborators
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Directive {
    /// Replace the text of a field
    SetText { field: TextField, text: FieldText },
    /// Recolor a field
    SetColors { field: TextField, colors: ColorPair },
    /// Switch the clock source to a new tick granularity
    Subscribe(TickGranularity),
    /// Play a vibration pattern
    PlayHaptic(HapticPattern),
}

/// Upper bound of directives produced by a single event
pub const MAX_DIRECTIVES: usize = 12;

/// Directives produced by one event, in the order they are to be applied
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Directives {
    list: Vec<Directive, MAX_DIRECTIVES>,
}

impl Directives {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, directive: Directive) {
        let pushed = self.list.push(directive);
        debug_assert!(pushed.is_ok(), "more than {} directives", MAX_DIRECTIVES);
    }

    pub fn extend(&mut self, other: Directives) {
        for directive in other {
            self.push(directive);
        }
    }

    pub fn iter(&self) -> core::slice::Iter<'_, Directive> {
        self.list.iter()
    }

    pub fn as_slice(&self) -> &[Directive] {
        &self.list
    }

    pub fn len(&self) -> usize {
        self.list.len()
    }

    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }
}

impl IntoIterator for Directives {
    type Item = Directive;
    type IntoIter = <Vec<Directive, MAX_DIRECTIVES> as IntoIterator>::IntoIter;

    fn into_iter(self) -> Self::IntoIter {
        self.list.into_iter()
    }
}

impl<'a> IntoIterator for &'a Directives {
    type Item = &'a Directive;
    type IntoIter = core::slice::Iter<'a, Directive>;

    fn into_iter(self) -> Self::IntoIter {
        self.list.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status(text: &str) -> Directive {
        Directive::SetText {
            field: TextField::Status,
            text: text.into(),
        }
    }

    #[test]
    fn directives_are_applied_in_push_order() {
        let mut directives = Directives::new();
        directives.push(status("DISCONNECTED"));
        directives.push(Directive::Subscribe(TickGranularity::Second));

        let mut more = Directives::new();
        more.push(Directive::PlayHaptic(HapticPattern::CustomAlert));
        directives.extend(more);

        let owned: std::vec::Vec<Directive> = directives.clone().into_iter().collect();
        assert_eq!(
            owned,
            [
                status("DISCONNECTED"),
                Directive::Subscribe(TickGranularity::Second),
                Directive::PlayHaptic(HapticPattern::CustomAlert),
            ]
        );
        assert_eq!((&directives).into_iter().count(), 3);
    }

    #[test]
    fn empty_directives_yield_nothing() {
        let directives = Directives::new();
        assert!(directives.is_empty());
        assert_eq!(directives.into_iter().next(), None);
    }
}
