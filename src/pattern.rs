//! Counterexample patterns
//!
//! When a SAT query finds a counterexample, only a small subset of the inputs is usually
//! responsible for the difference. [`CexExtractor`] reduces the model to such a subset,
//! [`PatternLog`] stores the reduced patterns compactly, and [`pack_patterns`] merges many
//! partial patterns into a few simulation words, to be replayed on the original graph.

mod extract;
mod pack;
mod store;

use std::fmt;

pub use extract::{verify_pattern, CexExtractor, ExtractStats};
pub use pack::{pack_patterns, CexRecord, CexStore, PackedPatterns};
pub use store::{PatternIter, PatternLog};

/// A literal of a pattern: an input index and the value it takes
///
/// Encoded as twice the input index, plus one if the value is false, so that sorting the
/// literals sorts by input.
#[derive(PartialEq, Eq, PartialOrd, Ord, Hash, Clone, Copy, Default)]
pub struct PatternLit {
    a: u32,
}

impl PatternLit {
    /// Create a literal assigning a value to an input
    pub fn new(input: u32, value: bool) -> PatternLit {
        assert!(input < 0x8000_0000);
        PatternLit {
            a: (input << 1) | (!value as u32),
        }
    }

    /// Create a literal from its raw encoding
    pub fn from_raw(a: u32) -> PatternLit {
        PatternLit { a }
    }

    /// Input index of the literal
    pub fn input(&self) -> u32 {
        self.a >> 1
    }

    /// Value assigned to the input
    pub fn value(&self) -> bool {
        self.a & 1 == 0
    }

    /// Return the internal representation of the literal
    pub fn raw(&self) -> u32 {
        self.a
    }
}

impl fmt::Display for PatternLit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.value() {
            write!(f, "!")?;
        }
        write!(f, "i{}", self.input())
    }
}

impl fmt::Debug for PatternLit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}
