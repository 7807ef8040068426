use crate::{Aig, NodeKind, Signal};

/// Structure for word-parallel simulation based directly on the graph representation
///
/// Each node holds `nb_words` words of 64 patterns.
pub struct SimpleSimulator<'a> {
    aig: &'a Aig,
    nb_words: usize,
    node_values: Vec<u64>,
}

/// Convert the inversion to a word for bitwise operations
fn pol_to_word(s: Signal) -> u64 {
    let pol = s.raw() & 1;
    (!(pol as u64)).wrapping_add(1)
}

impl<'a> SimpleSimulator<'a> {
    pub fn from_aig(aig: &'a Aig, nb_words: usize) -> SimpleSimulator<'a> {
        assert!(nb_words > 0);
        SimpleSimulator {
            aig,
            nb_words,
            node_values: vec![0; aig.nb_nodes() * nb_words],
        }
    }

    /// Run the simulation with the given words for each input
    pub fn run(&mut self, input_values: &[Vec<u64>]) {
        assert_eq!(input_values.len(), self.aig.nb_inputs());
        let w = self.nb_words;
        for n in 0..self.aig.nb_nodes() {
            match self.aig.kind(n as u32) {
                NodeKind::Constant => self.node_values[..w].fill(0),
                NodeKind::Input(i) => {
                    let v = &input_values[i as usize];
                    assert_eq!(v.len(), w);
                    self.node_values[n * w..(n + 1) * w].copy_from_slice(v);
                }
                NodeKind::And(a, b) => {
                    for k in 0..w {
                        let val = self.get_value(a, k) & self.get_value(b, k);
                        self.node_values[n * w + k] = val;
                    }
                }
            }
        }
    }

    fn get_value(&self, s: Signal, k: usize) -> u64 {
        self.node_values[s.ind() * self.nb_words + k] ^ pol_to_word(s)
    }

    /// Words of a signal after simulation
    pub fn signal_values(&self, s: Signal) -> Vec<u64> {
        (0..self.nb_words).map(|k| self.get_value(s, k)).collect()
    }

    /// Words of all nodes after simulation
    pub fn into_node_values(self) -> Vec<Vec<u64>> {
        self.node_values
            .chunks(self.nb_words)
            .map(|c| c.to_vec())
            .collect()
    }
}
