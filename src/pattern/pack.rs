use log::debug;
use rand::rngs::SmallRng;
use rand::Rng;

use crate::pattern::PatternLit;

/// Patterns packed as simulation words
///
/// Each pattern occupies one bit column; inputs it does not assign keep random values.
/// The words are organized in series of `nb_words_init` words, whose first bit is never
/// used by a pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackedPatterns {
    /// Simulation words for each input
    pub words: Vec<Vec<u64>>,
    /// Number of words for each input
    pub nb_words: usize,
    /// Number of series of the initial size
    pub nb_series: usize,
    /// Number of patterns packed
    pub nb_patterns: usize,
}

struct Packer {
    info: Vec<Vec<u64>>,
    pres: Vec<Vec<u64>>,
}

impl Packer {
    fn bit(words: &[u64], k: usize) -> bool {
        (words[k / 64] >> (k % 64)) & 1 != 0
    }

    /// Place a pattern in column k if it does not conflict with patterns already there
    fn try_place(&mut self, pattern: &[PatternLit], k: usize) -> bool {
        let conflict = pattern.iter().any(|l| {
            let i = l.input() as usize;
            Self::bit(&self.pres[i], k) && Self::bit(&self.info[i], k) != l.value()
        });
        if conflict {
            return false;
        }
        let mask = 1u64 << (k % 64);
        for l in pattern {
            let i = l.input() as usize;
            self.pres[i][k / 64] |= mask;
            if l.value() {
                self.info[i][k / 64] |= mask;
            } else {
                self.info[i][k / 64] &= !mask;
            }
        }
        true
    }

    fn double(&mut self, rng: &mut SmallRng) {
        for (info, pres) in self.info.iter_mut().zip(self.pres.iter_mut()) {
            let n = info.len();
            info.extend((0..n).map(|_| rng.gen::<u64>()));
            pres.resize(2 * n, 0);
        }
    }
}

/// Pack patterns into simulation words, starting with `nb_words_init` words per input
///
/// Each pattern is placed in the first bit column where it does not contradict the patterns
/// already placed. When no column fits, the number of words is doubled.
pub fn pack_patterns<I>(
    patterns: I,
    nb_inputs: usize,
    nb_words_init: usize,
    rng: &mut SmallRng,
) -> PackedPatterns
where
    I: IntoIterator,
    I::Item: AsRef<[PatternLit]>,
{
    assert!(nb_words_init > 0);
    let series_bits = 64 * nb_words_init;
    let mut packer = Packer {
        info: (0..nb_inputs)
            .map(|_| (0..nb_words_init).map(|_| rng.gen::<u64>()).collect())
            .collect(),
        pres: vec![vec![0; nb_words_init]; nb_inputs],
    };
    let mut nb_words = nb_words_init;
    let mut nb_patterns = 0;
    let mut max_bit = 0;
    for pattern in patterns {
        let pattern = pattern.as_ref();
        assert!(pattern.iter().all(|l| (l.input() as usize) < nb_inputs));
        let nb_bits = 64 * nb_words;
        let mut placed = (0..nb_bits)
            .filter(|k| k % series_bits != 0)
            .find(|k| packer.try_place(pattern, *k));
        if placed.is_none() {
            packer.double(rng);
            nb_words *= 2;
            let k = nb_bits + 1;
            assert!(packer.try_place(pattern, k));
            placed = Some(k);
        }
        max_bit = max_bit.max(placed.unwrap_or(0));
        nb_patterns += 1;
    }
    debug!(
        "Packed {} patterns into {} words per input, last used bit {}",
        nb_patterns, nb_words, max_bit
    );
    PackedPatterns {
        words: packer.info,
        nb_words,
        nb_series: nb_words / nb_words_init,
        nb_patterns,
    }
}

/// Result of a query on one output, kept for later replay
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CexRecord {
    /// Index of the output
    pub output: usize,
    /// Input assignment of the counterexample, or None if the query was not solved
    pub pattern: Option<Vec<PatternLit>>,
}

/// Store of the outputs that were not proved, with their counterexamples
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CexStore {
    records: Vec<CexRecord>,
}

impl CexStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a counterexample for an output
    pub fn add_cex(&mut self, output: usize, pattern: Vec<PatternLit>) {
        self.records.push(CexRecord {
            output,
            pattern: Some(pattern),
        });
    }

    /// Record an output whose query reached the conflict limit
    pub fn add_timeout(&mut self, output: usize) {
        self.records.push(CexRecord {
            output,
            pattern: None,
        });
    }

    /// All records, in the order they were added
    pub fn records(&self) -> &[CexRecord] {
        &self.records
    }

    /// Number of counterexamples
    pub fn nb_cexes(&self) -> usize {
        self.records.iter().filter(|r| r.pattern.is_some()).count()
    }

    /// Number of unsolved outputs
    pub fn nb_timeouts(&self) -> usize {
        self.records.iter().filter(|r| r.pattern.is_none()).count()
    }

    /// Pack the counterexamples into simulation words
    pub fn pack(&self, nb_inputs: usize, nb_words_init: usize, rng: &mut SmallRng) -> PackedPatterns {
        pack_patterns(
            self.records.iter().filter_map(|r| r.pattern.as_deref()),
            nb_inputs,
            nb_words_init,
            rng,
        )
    }
}
