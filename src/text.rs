//! Fixed capacity text for display fields
//!
//! Display labels own a buffer of a fixed number of bytes. Writing more than
//! fits is not an error: the text is cut at the last character that still
//! fits and everything after it is dropped.

use core::fmt;
use core::ops::Deref;

use heapless::String;

use crate::config::TEXT_CAPACITY;

/// Text of a single display field
pub type FieldText = BoundedText<TEXT_CAPACITY>;

/// Text buffer holding at most `N` bytes of UTF-8.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct BoundedText<const N: usize> {
    buf: String<N>,
}

impl<const N: usize> BoundedText<N> {
    /// Create an empty buffer
    pub const fn new() -> Self {
        Self { buf: String::new() }
    }

    /// Append as much of `text` as fits.
    ///
    /// Returns `true` if all of `text` was stored.
    pub fn push_str(&mut self, text: &str) -> bool {
        let room = N - self.buf.len();
        if text.len() <= room {
            // Cannot fail, the length was checked above
            let _ = self.buf.push_str(text);
            return true;
        }

        let mut end = room;
        while !text.is_char_boundary(end) {
            end -= 1;
        }
        let _ = self.buf.push_str(&text[..end]);
        false
    }

    pub fn as_str(&self) -> &str {
        self.buf.as_str()
    }

    /// Whether no more bytes can be appended
    pub fn is_full(&self) -> bool {
        self.buf.len() == N
    }
}

impl<const N: usize> From<&str> for BoundedText<N> {
    /// Copy `text` into a new buffer, truncating at the capacity.
    fn from(text: &str) -> Self {
        let mut out = Self::new();
        out.push_str(text);
        out
    }
}

impl<const N: usize> Deref for BoundedText<N> {
    type Target = str;

    fn deref(&self) -> &str {
        self.as_str()
    }
}

impl<const N: usize> fmt::Write for BoundedText<N> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        // Overflow is dropped silently
        self.push_str(s);
        Ok(())
    }
}

impl<const N: usize> fmt::Debug for BoundedText<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self.as_str(), f)
    }
}

impl<const N: usize> fmt::Display for BoundedText<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl<const N: usize> PartialEq<str> for BoundedText<N> {
    fn eq(&self, other: &str) -> bool {
        self.as_str() == other
    }
}

impl<const N: usize> PartialEq<&str> for BoundedText<N> {
    fn eq(&self, other: &&str) -> bool {
        self.as_str() == *other
    }
}

#[cfg(feature = "defmt")]
impl<const N: usize> defmt::Format for BoundedText<N> {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "{=str}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::fmt::Write;

    #[test]
    fn short_text_is_copied_whole() {
        let text = BoundedText::<12>::from("connected");
        assert_eq!(text, "connected");
        assert!(!text.is_full());
    }

    #[test]
    fn long_text_is_cut_at_capacity() {
        let mut text = BoundedText::<8>::new();
        assert!(!text.push_str("quarter past four"));
        assert_eq!(text, "quarter ");
        assert!(text.is_full());

        // Further writes are dropped
        assert!(!text.push_str("x"));
        assert_eq!(text.len(), 8);
    }

    #[test]
    fn cut_never_splits_a_character() {
        // 'ø' is two bytes, the cut has to fall before it
        let text = BoundedText::<3>::from("klø!");
        assert_eq!(text, "kl");

        let text = BoundedText::<4>::from("klø!");
        assert_eq!(text, "klø");
    }

    #[test]
    fn formatting_truncates_without_error() {
        let mut text = BoundedText::<10>::new();
        assert!(write!(text, "conn | LOW({})", 15).is_ok());
        assert_eq!(text, "conn | LOW");
    }

    #[test]
    fn zero_capacity_stays_empty() {
        let text = BoundedText::<0>::from("five");
        assert!(text.is_empty());
        assert!(text.is_full());
    }
}
