//! Search driver: locate matches by probing successive start positions.

use std::str::FromStr;

use crate::compiler::{PatternError, compile};
use crate::token::Regex;

/// A located match. `start` and `end` are byte offsets into the searched
/// text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Match {
    pub start: usize,
    pub end: usize,
}

impl Match {
    /// Length of the matched text in bytes.
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// True for a zero-length match.
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// The matched byte range.
    pub fn range(&self) -> std::ops::Range<usize> {
        self.start..self.end
    }
}

impl Regex {
    /// Find the leftmost match in `text`.
    pub fn find(&self, text: &str) -> Option<Match> {
        self.find_from(text, 0)
    }

    /// Find the leftmost match starting at or after byte offset `start`.
    ///
    /// Every position up to and including end of input is probed, so a
    /// pattern that can match the empty string always succeeds somewhere.
    pub fn find_from(&self, text: &str, start: usize) -> Option<Match> {
        let bytes = text.as_bytes();
        (start..=bytes.len())
            .find_map(|i| self.match_bytes(bytes, i).map(|len| Match { start: i, end: i + len }))
    }

    /// Count non-overlapping matches in `text`.
    ///
    /// The scan advances by at least one byte after every match, so
    /// zero-length matches cannot stall it.
    pub fn count_matches(&self, text: &str) -> usize {
        let mut count = 0;
        let mut from = 0;
        while let Some(m) = self.find_from(text, from) {
            count += 1;
            from = m.start + m.len().max(1);
        }
        count
    }
}

impl FromStr for Regex {
    type Err = PatternError;

    fn from_str(pattern: &str) -> Result<Self, Self::Err> {
        compile(pattern)
    }
}
