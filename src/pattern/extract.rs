use crate::error::Result;
use crate::pattern::PatternLit;
use crate::sat::{SatEngine, SatSolver};
use crate::{Aig, NodeKind, Signal, TravIds};

/// Counters of the pattern extraction
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractStats {
    /// Number of patterns extracted
    pub nb_patterns: usize,
    /// Number of inputs in the cones of the patterns
    pub nb_cone_lits: usize,
    /// Number of literals kept after reduction
    pub nb_kept_lits: usize,
}

/// Extraction of reduced patterns from SAT models
///
/// Holds the scratch state needed to walk the cones of a graph; one extractor is needed
/// per thread.
#[derive(Debug, Clone)]
pub struct CexExtractor {
    trav: TravIds,
    values: Vec<bool>,
    stack: Vec<(u32, bool)>,
    pattern1: Vec<PatternLit>,
    pattern2: Vec<PatternLit>,
    stats: ExtractStats,
}

impl CexExtractor {
    /// Create an extractor for a graph with the given number of nodes
    pub fn new(nb_nodes: usize) -> Self {
        CexExtractor {
            trav: TravIds::new(nb_nodes),
            values: vec![false; nb_nodes],
            stack: Vec::new(),
            pattern1: Vec::new(),
            pattern2: Vec::new(),
            stats: ExtractStats::default(),
        }
    }

    /// Extraction counters
    pub fn stats(&self) -> &ExtractStats {
        &self.stats
    }

    /// Compute the value of every node in the cone of `root` from the last model
    ///
    /// Returns the number of inputs in the cone.
    fn justify<S: SatSolver + Default>(
        &mut self,
        aig: &Aig,
        engine: &SatEngine<S>,
        root: u32,
    ) -> Result<usize> {
        let mut nb_inputs = 0;
        self.trav.increment();
        self.stack.clear();
        self.stack.push((root, false));
        while let Some((n, expanded)) = self.stack.pop() {
            if expanded {
                let a = aig.fanin0(n);
                let b = aig.fanin1(n);
                self.values[n as usize] = self.signal_value(a) && self.signal_value(b);
                continue;
            }
            if !self.trav.visit(n) {
                continue;
            }
            match aig.kind(n) {
                NodeKind::Constant => self.values[n as usize] = false,
                NodeKind::Input(_) => {
                    self.values[n as usize] = engine.model_value(aig, n)?;
                    nb_inputs += 1;
                }
                NodeKind::And(a, b) => {
                    self.stack.push((n, true));
                    self.stack.push((b.node(), false));
                    self.stack.push((a.node(), false));
                }
            }
        }
        Ok(nb_inputs)
    }

    fn signal_value(&self, s: Signal) -> bool {
        self.values[s.ind()] ^ s.is_inverted()
    }

    /// Collect the inputs along a sensitizing path of `root`
    ///
    /// A true And gate needs both fanins; a false one needs a single false fanin, the first
    /// or the second one depending on `prefer_first`.
    fn sensitize(&mut self, aig: &Aig, root: u32, prefer_first: bool) -> Vec<PatternLit> {
        let mut ret = Vec::new();
        self.trav.increment();
        let mut stack = vec![root];
        while let Some(n) = stack.pop() {
            if !self.trav.visit(n) {
                continue;
            }
            match aig.kind(n) {
                NodeKind::Constant => (),
                NodeKind::Input(i) => ret.push(PatternLit::new(i, self.values[n as usize])),
                NodeKind::And(a, b) => {
                    if self.values[n as usize] {
                        stack.push(b.node());
                        stack.push(a.node());
                    } else {
                        let (va, vb) = (self.signal_value(a), self.signal_value(b));
                        assert!(!va || !vb, "Inconsistent value at node {n}");
                        let first = if prefer_first { !va } else { vb };
                        stack.push(if first { a.node() } else { b.node() });
                    }
                }
            }
        }
        ret
    }

    /// Reduce the last model to a small set of input literals forcing `output` to be true
    ///
    /// Two sensitizing paths are computed, preferring the first or the second false fanin,
    /// and the smaller one is returned sorted by input. The engine must hold a model where
    /// `output` is true.
    pub fn minimize<S: SatSolver + Default>(
        &mut self,
        aig: &Aig,
        engine: &SatEngine<S>,
        output: Signal,
    ) -> Result<Vec<PatternLit>> {
        let root = output.node();
        let nb_inputs = self.justify(aig, engine, root)?;
        assert!(
            self.signal_value(output),
            "The model does not satisfy output {output}"
        );
        self.pattern1 = self.sensitize(aig, root, true);
        self.pattern2 = self.sensitize(aig, root, false);
        let mut ret = if self.pattern2.len() < self.pattern1.len() {
            self.pattern2.clone()
        } else {
            self.pattern1.clone()
        };
        ret.sort();
        debug_assert!(verify_pattern(aig, output, &ret));
        self.stats.nb_patterns += 1;
        self.stats.nb_cone_lits += nb_inputs;
        self.stats.nb_kept_lits += ret.len();
        Ok(ret)
    }

    /// Lengths of the two sensitizing paths computed by the last call to [`minimize`](Self::minimize)
    pub fn last_path_lengths(&self) -> (usize, usize) {
        (self.pattern1.len(), self.pattern2.len())
    }

    /// Complete assignment of the inputs in the cone of `output` from the last model, sorted by input
    pub fn full_pattern<S: SatSolver + Default>(
        &mut self,
        aig: &Aig,
        engine: &SatEngine<S>,
        output: Signal,
    ) -> Result<Vec<PatternLit>> {
        let root = output.node();
        self.justify(aig, engine, root)?;
        let mut ret: Vec<PatternLit> = (0..=root)
            .filter(|n| self.trav.is_current(*n))
            .filter_map(|n| {
                aig.input_index(n)
                    .map(|i| PatternLit::new(i, self.values[n as usize]))
            })
            .collect();
        ret.sort();
        Ok(ret)
    }
}

/// Check that a partial pattern forces a signal to be true, using ternary simulation
///
/// Inputs absent from the pattern are unknown.
pub fn verify_pattern(aig: &Aig, output: Signal, pattern: &[PatternLit]) -> bool {
    let root = output.ind();
    let mut values: Vec<Option<bool>> = vec![None; root + 1];
    let mut inputs: Vec<Option<bool>> = vec![None; aig.nb_inputs()];
    for l in pattern {
        inputs[l.input() as usize] = Some(l.value());
    }
    let value = |values: &[Option<bool>], s: Signal| values[s.ind()].map(|v| v ^ s.is_inverted());
    for n in 0..=root {
        values[n] = match aig.kind(n as u32) {
            NodeKind::Constant => Some(false),
            NodeKind::Input(i) => inputs[i as usize],
            NodeKind::And(a, b) => match (value(&values, a), value(&values, b)) {
                (Some(false), _) | (_, Some(false)) => Some(false),
                (Some(true), Some(true)) => Some(true),
                _ => None,
            },
        };
    }
    value(&values, output) == Some(true)
}
