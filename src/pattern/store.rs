use itertools::Itertools;

use crate::pattern::PatternLit;

/// Append-only log of patterns, compressed as bytes
///
/// Each pattern is stored as its number of literals, its first literal and the gaps between
/// consecutive literals, all as variable-length integers (7 bits per byte, high bit set on
/// all bytes but the last). Patterns are recovered by counting, without delimiters.
///
/// The start offset marks the patterns of the current round.
#[derive(Debug, Clone, Default)]
pub struct PatternLog {
    storage: Vec<u8>,
    start: usize,
    nb_patterns: usize,
    nb_round_patterns: usize,
    nb_lits: usize,
}

impl PatternLog {
    /// Create an empty log
    pub fn new() -> Self {
        Self::default()
    }

    /// Reload a log from its byte representation
    pub fn from_bytes(storage: Vec<u8>, start: usize) -> Self {
        assert!(start <= storage.len());
        let mut ret = PatternLog {
            storage,
            start: 0,
            nb_patterns: 0,
            nb_round_patterns: 0,
            nb_lits: 0,
        };
        let mut pos = 0;
        let mut pat = Vec::new();
        while pos < ret.storage.len() {
            ret.restore(&mut pos, &mut pat);
            ret.nb_patterns += 1;
            ret.nb_lits += pat.len();
            if pos > start {
                ret.nb_round_patterns += 1;
            }
        }
        assert_eq!(pos, ret.storage.len(), "Truncated pattern log");
        ret.start = start;
        ret
    }

    /// Byte representation of the log
    pub fn as_bytes(&self) -> &[u8] {
        &self.storage
    }

    /// Size of the log in bytes
    pub fn nb_bytes(&self) -> usize {
        self.storage.len()
    }

    /// Offset of the first pattern of the current round
    pub fn start(&self) -> usize {
        self.start
    }

    /// Total number of patterns stored
    pub fn nb_patterns(&self) -> usize {
        self.nb_patterns
    }

    /// Number of patterns stored during the current round
    pub fn nb_round_patterns(&self) -> usize {
        self.nb_round_patterns
    }

    /// Total number of literals stored
    pub fn nb_lits(&self) -> usize {
        self.nb_lits
    }

    /// Returns true if the log contains no pattern
    pub fn is_empty(&self) -> bool {
        self.storage.is_empty()
    }

    /// Start a new round: patterns stored before are not part of it
    pub fn start_round(&mut self) {
        self.start = self.storage.len();
        self.nb_round_patterns = 0;
    }

    fn store_num(&mut self, mut x: u32) {
        while x >= 0x80 {
            self.storage.push((x & 0x7f) as u8 | 0x80);
            x >>= 7;
        }
        self.storage.push(x as u8);
    }

    fn restore_num(&self, pos: &mut usize) -> u32 {
        let mut x = 0u32;
        let mut shift = 0;
        loop {
            let b = self.storage[*pos];
            *pos += 1;
            x |= ((b & 0x7f) as u32) << shift;
            if b & 0x80 == 0 {
                return x;
            }
            shift += 7;
            assert!(shift < 32, "Malformed integer in pattern log");
        }
    }

    /// Append a pattern; literals must be sorted by strictly increasing input
    pub fn store(&mut self, lits: &[PatternLit]) {
        assert!(
            lits.iter().tuple_windows().all(|(a, b)| a.input() < b.input()),
            "Pattern literals must be sorted by strictly increasing input: {lits:?}"
        );
        self.store_num(lits.len() as u32);
        if let Some(first) = lits.first() {
            self.store_num(first.raw());
            for (a, b) in lits.iter().tuple_windows() {
                self.store_num(b.raw() - a.raw());
            }
        }
        self.nb_patterns += 1;
        self.nb_round_patterns += 1;
        self.nb_lits += lits.len();
    }

    /// Read the pattern at the given position, and move the position past it
    pub fn restore(&self, pos: &mut usize, lits: &mut Vec<PatternLit>) {
        lits.clear();
        let nb = self.restore_num(pos);
        if nb == 0 {
            return;
        }
        let mut cur = self.restore_num(pos);
        lits.push(PatternLit::from_raw(cur));
        for _ in 1..nb {
            cur += self.restore_num(pos);
            lits.push(PatternLit::from_raw(cur));
        }
    }

    /// Iterate over all patterns, in the order they were stored
    pub fn patterns(&self) -> PatternIter<'_> {
        PatternIter { log: self, pos: 0 }
    }

    /// Iterate over the patterns of the current round
    pub fn round_patterns(&self) -> PatternIter<'_> {
        PatternIter {
            log: self,
            pos: self.start,
        }
    }
}

/// Iterator over the patterns of a [`PatternLog`]
pub struct PatternIter<'a> {
    log: &'a PatternLog,
    pos: usize,
}

impl<'a> Iterator for PatternIter<'a> {
    type Item = Vec<PatternLit>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.pos >= self.log.storage.len() {
            return None;
        }
        let mut lits = Vec::new();
        self.log.restore(&mut self.pos, &mut lits);
        Some(lits)
    }
}

#[cfg(test)]
mod tests {
    use rand::rngs::SmallRng;
    use rand::{Rng, SeedableRng};

    use super::PatternLog;
    use crate::pattern::PatternLit;

    #[test]
    fn test_varint() {
        let mut log = PatternLog::new();
        let values = [0, 1, 0x7f, 0x80, 0x3fff, 0x4000, 0xffff_ffff];
        for v in values {
            log.store_num(v);
        }
        // 1 + 1 + 1 + 2 + 2 + 3 + 5 bytes
        assert_eq!(log.nb_bytes(), 15);
        let mut pos = 0;
        for v in values {
            assert_eq!(log.restore_num(&mut pos), v);
        }
        assert_eq!(pos, log.nb_bytes());
    }

    #[test]
    fn test_random_sequences() {
        let mut rng = SmallRng::seed_from_u64(7);
        let mut log = PatternLog::new();
        let mut expected = Vec::new();
        for _ in 0..200 {
            let len = rng.gen_range(0..20);
            let mut input = rng.gen_range(0..1000u32);
            let mut pat = Vec::new();
            for _ in 0..len {
                pat.push(PatternLit::new(input, rng.gen()));
                input += rng.gen_range(1..50000);
            }
            log.store(&pat);
            expected.push(pat);
        }
        assert_eq!(log.patterns().collect::<Vec<_>>(), expected);
        assert_eq!(log.nb_patterns(), 200);
        assert_eq!(log.nb_lits(), expected.iter().map(|p| p.len()).sum::<usize>());
    }

    #[test]
    fn test_two_appends() {
        let mut log = PatternLog::new();
        let a = vec![PatternLit::new(3, true)];
        let b = vec![PatternLit::new(3, false)];
        log.store(&a);
        log.store(&b);
        let mut it = log.round_patterns();
        assert_eq!(it.next(), Some(a.clone()));
        assert_eq!(it.next(), Some(b.clone()));
        assert_eq!(it.next(), None);
        // Reading does not move the round
        assert_eq!(log.round_patterns().collect::<Vec<_>>(), vec![a.clone(), b.clone()]);
        assert_eq!(log.start(), 0);
    }

    #[test]
    fn test_rounds() {
        let mut log = PatternLog::new();
        let a = vec![PatternLit::new(0, true), PatternLit::new(5, false)];
        let b = vec![PatternLit::new(2, false)];
        log.store(&a);
        log.start_round();
        assert_eq!(log.round_patterns().count(), 0);
        log.store(&b);
        log.store(&[]);
        assert_eq!(log.round_patterns().collect::<Vec<_>>(), vec![b.clone(), vec![]]);
        assert_eq!(log.nb_round_patterns(), 2);
        assert_eq!(log.nb_patterns(), 3);

        let reloaded = PatternLog::from_bytes(log.as_bytes().to_vec(), log.start());
        assert_eq!(reloaded.nb_patterns(), 3);
        assert_eq!(reloaded.nb_round_patterns(), 2);
        assert_eq!(reloaded.round_patterns().collect::<Vec<_>>(), vec![b, vec![]]);
        assert_eq!(reloaded.patterns().next(), Some(a));
    }

    #[test]
    #[should_panic]
    fn test_unsorted() {
        let mut log = PatternLog::new();
        log.store(&[PatternLit::new(3, true), PatternLit::new(3, false)]);
    }
}
