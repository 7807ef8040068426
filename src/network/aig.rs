use core::fmt;

use fxhash::FxHashMap;

use crate::network::signal::Signal;

/// Kind of a node in the graph
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    /// The constant-false node, always at index 0
    Constant,
    /// A primary input, with its input index
    Input(u32),
    /// A two-input And gate
    And(Signal, Signal),
}

/// Representation of a combinational And-Inverter Graph
///
/// Nodes are stored in topological order: every And gate has a higher index than its fanins.
/// Outputs are kept separately, as a list of driving signals.
/// Structural level, phase and fanout count are maintained as nodes are added.
#[derive(Debug, Clone)]
pub struct Aig {
    nodes: Vec<NodeKind>,
    inputs: Vec<u32>,
    outputs: Vec<Signal>,
    levels: Vec<u32>,
    phases: Vec<bool>,
    refs: Vec<u32>,
    strash: FxHashMap<(Signal, Signal), u32>,
}

impl Default for Aig {
    fn default() -> Self {
        Aig {
            nodes: vec![NodeKind::Constant],
            inputs: Vec::new(),
            outputs: Vec::new(),
            levels: vec![0],
            phases: vec![false],
            refs: vec![0],
            strash: FxHashMap::default(),
        }
    }
}

impl Aig {
    /// Create a new graph, containing only the constant node
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the number of primary inputs
    pub fn nb_inputs(&self) -> usize {
        self.inputs.len()
    }

    /// Return the number of primary outputs
    pub fn nb_outputs(&self) -> usize {
        self.outputs.len()
    }

    /// Return the number of nodes, including the constant and the inputs
    pub fn nb_nodes(&self) -> usize {
        self.nodes.len()
    }

    /// Return the number of And gates
    pub fn nb_ands(&self) -> usize {
        self.nb_nodes() - self.nb_inputs() - 1
    }

    /// Get the input at index i
    pub fn input(&self, i: usize) -> Signal {
        Signal::from_node(self.inputs[i])
    }

    /// Get the output at index i
    pub fn output(&self, i: usize) -> Signal {
        self.outputs[i]
    }

    /// Get all outputs
    pub fn outputs(&self) -> &[Signal] {
        &self.outputs
    }

    /// Get the kind of node n
    pub fn kind(&self, n: u32) -> NodeKind {
        self.nodes[n as usize]
    }

    /// Returns true if node n is an And gate
    pub fn is_and(&self, n: u32) -> bool {
        matches!(self.nodes[n as usize], NodeKind::And(_, _))
    }

    /// Returns true if node n is a primary input
    pub fn is_input(&self, n: u32) -> bool {
        matches!(self.nodes[n as usize], NodeKind::Input(_))
    }

    /// Return the input index of node n, if it is a primary input
    pub fn input_index(&self, n: u32) -> Option<u32> {
        match self.nodes[n as usize] {
            NodeKind::Input(i) => Some(i),
            _ => None,
        }
    }

    /// Get the first fanin of And gate n
    pub fn fanin0(&self, n: u32) -> Signal {
        match self.nodes[n as usize] {
            NodeKind::And(a, _) => a,
            k => panic!("Node {n} is not an And gate: {k:?}"),
        }
    }

    /// Get the second fanin of And gate n
    pub fn fanin1(&self, n: u32) -> Signal {
        match self.nodes[n as usize] {
            NodeKind::And(_, b) => b,
            k => panic!("Node {n} is not an And gate: {k:?}"),
        }
    }

    /// Structural level of node n; inputs and constant are at level 0
    pub fn level(&self, n: u32) -> u32 {
        self.levels[n as usize]
    }

    /// Structural phase of node n: its value when all inputs are zero
    pub fn phase(&self, n: u32) -> bool {
        self.phases[n as usize]
    }

    /// Value of a signal when all inputs are zero
    pub fn signal_phase(&self, s: Signal) -> bool {
        self.phase(s.node()) ^ s.is_inverted()
    }

    /// Number of fanout references of node n, from gates and outputs
    pub fn nb_refs(&self, n: u32) -> u32 {
        self.refs[n as usize]
    }

    /// Add a new primary input
    pub fn add_input(&mut self) -> Signal {
        let n = self.push_node(NodeKind::Input(self.inputs.len() as u32), 0, false);
        self.inputs.push(n);
        Signal::from_node(n)
    }

    /// Add a new primary output based on an existing signal
    pub fn add_output(&mut self, s: Signal) {
        assert!(self.is_valid(s));
        self.refs[s.ind()] += 1;
        self.outputs.push(s);
    }

    /// Create an And2 gate, simplified and hashed with existing gates
    pub fn and(&mut self, a: Signal, b: Signal) -> Signal {
        assert!(self.is_valid(a) && self.is_valid(b));
        if a == Signal::zero() || b == Signal::zero() || a == !b {
            return Signal::zero();
        }
        if a == Signal::one() || a == b {
            return b;
        }
        if b == Signal::one() {
            return a;
        }
        let key = if a < b { (a, b) } else { (b, a) };
        if let Some(&n) = self.strash.get(&key) {
            return Signal::from_node(n);
        }
        let level = 1 + self.level(key.0.node()).max(self.level(key.1.node()));
        let phase = self.signal_phase(key.0) & self.signal_phase(key.1);
        let n = self.push_node(NodeKind::And(key.0, key.1), level, phase);
        self.refs[key.0.ind()] += 1;
        self.refs[key.1.ind()] += 1;
        self.strash.insert(key, n);
        Signal::from_node(n)
    }

    /// Create an Or2 gate
    pub fn or(&mut self, a: Signal, b: Signal) -> Signal {
        !self.and(!a, !b)
    }

    /// Create a Xor2 gate, as three And gates
    pub fn xor(&mut self, a: Signal, b: Signal) -> Signal {
        let x = self.and(a, !b);
        let y = self.and(!a, b);
        self.or(x, y)
    }

    /// Create a Mux gate, as three And gates in the canonical multiplexer pattern
    pub fn mux(&mut self, s: Signal, t: Signal, e: Signal) -> Signal {
        let x = self.and(s, t);
        let y = self.and(!s, e);
        self.or(x, y)
    }

    /// Create an n-ary And as a tree
    pub fn and_n(&mut self, sigs: &[Signal]) -> Signal {
        self.reduce_tree(sigs, Signal::one(), Self::and)
    }

    /// Create an n-ary Or as a tree
    pub fn or_n(&mut self, sigs: &[Signal]) -> Signal {
        self.reduce_tree(sigs, Signal::zero(), Self::or)
    }

    /// Create an n-ary Xor as a tree
    pub fn xor_n(&mut self, sigs: &[Signal]) -> Signal {
        self.reduce_tree(sigs, Signal::zero(), Self::xor)
    }

    fn reduce_tree(
        &mut self,
        sigs: &[Signal],
        empty: Signal,
        op: fn(&mut Self, Signal, Signal) -> Signal,
    ) -> Signal {
        if sigs.is_empty() {
            return empty;
        }
        let mut sigs = sigs.to_vec();
        while sigs.len() > 1 {
            sigs = sigs
                .chunks(2)
                .map(|c| if c.len() == 2 { op(self, c[0], c[1]) } else { c[0] })
                .collect();
        }
        sigs[0]
    }

    fn push_node(&mut self, kind: NodeKind, level: u32, phase: bool) -> u32 {
        let n = self.nodes.len() as u32;
        self.nodes.push(kind);
        self.levels.push(level);
        self.phases.push(phase);
        self.refs.push(0);
        n
    }

    /// Returns true if node n is the root of a multiplexer pattern:
    /// `!(c & x) & !(!c & y)` where both fanins are And gates sharing a complemented control
    pub fn is_mux_type(&self, n: u32) -> bool {
        if !self.is_and(n) {
            return false;
        }
        let (f0, f1) = (self.fanin0(n), self.fanin1(n));
        if !f0.is_inverted() || !f1.is_inverted() {
            return false;
        }
        if !self.is_and(f0.node()) || !self.is_and(f1.node()) {
            return false;
        }
        self.mux_pairing(f0.node(), f1.node()).is_some()
    }

    /// Find the control literals of a multiplexer pattern: (control in p, other p, control in q, other q)
    fn mux_pairing(&self, p: u32, q: u32) -> Option<(Signal, Signal, Signal, Signal)> {
        let (p0, p1) = (self.fanin0(p), self.fanin1(p));
        let (q0, q1) = (self.fanin0(q), self.fanin1(q));
        [(p0, p1, q0, q1), (p0, p1, q1, q0), (p1, p0, q0, q1), (p1, p0, q1, q0)]
            .into_iter()
            .find(|(lp, _, lq, _)| *lp == !*lq)
    }

    /// Decompose a multiplexer node into (control node, then branch, else branch)
    ///
    /// The node computes `control ? then : else`. Panics if the node is not a multiplexer.
    pub fn recognize_mux(&self, n: u32) -> (u32, Signal, Signal) {
        assert!(self.is_and(n), "Node {n} is not an And gate");
        let (f0, f1) = (self.fanin0(n), self.fanin1(n));
        assert!(
            f0.is_inverted() && f1.is_inverted(),
            "Node {n} is not a multiplexer: fanins {f0} and {f1} must be complemented"
        );
        let Some((lp, xp, lq, xq)) = self.mux_pairing(f0.node(), f1.node()) else {
            panic!("Node {n} is not a multiplexer: no complementary control pair");
        };
        if lp.is_inverted() {
            (lq.node(), !xq, !xp)
        } else {
            (lp.node(), !xp, !xq)
        }
    }

    /// Copy of the graph without the And gates that no output depends on
    ///
    /// Inputs and outputs are kept in the same order.
    pub fn cleanup(&self) -> Aig {
        let mut live = vec![false; self.nb_nodes()];
        for o in &self.outputs {
            live[o.ind()] = true;
        }
        for n in (1..self.nb_nodes()).rev() {
            if let NodeKind::And(a, b) = self.nodes[n] {
                if live[n] {
                    live[a.ind()] = true;
                    live[b.ind()] = true;
                }
            }
        }
        let mut ret = Aig::new();
        let mut copies = vec![Signal::zero(); self.nb_nodes()];
        for (n, kind) in self.nodes.iter().enumerate() {
            match *kind {
                NodeKind::Input(_) => copies[n] = ret.add_input(),
                NodeKind::And(a, b) if live[n] => {
                    let ca = copies[a.ind()] ^ a.is_inverted();
                    let cb = copies[b.ind()] ^ b.is_inverted();
                    copies[n] = ret.and(ca, cb);
                }
                _ => (),
            }
        }
        for o in &self.outputs {
            ret.add_output(copies[o.ind()] ^ o.is_inverted());
        }
        ret
    }

    /// Returns whether the signal refers to an existing node
    pub(crate) fn is_valid(&self, s: Signal) -> bool {
        s.ind() < self.nb_nodes()
    }

    /// Check consistency of the datastructure
    pub fn check(&self) {
        assert_eq!(self.nodes[0], NodeKind::Constant);
        let mut refs = vec![0u32; self.nb_nodes()];
        for (i, kind) in self.nodes.iter().enumerate() {
            match *kind {
                NodeKind::Constant => assert_eq!(i, 0, "Constant node must be at index 0"),
                NodeKind::Input(k) => assert_eq!(self.inputs[k as usize] as usize, i),
                NodeKind::And(a, b) => {
                    assert!(a.ind() < i && b.ind() < i, "Node {i} is not topologically sorted");
                    assert!(a < b, "Node {i} fanins are not ordered");
                    let level = 1 + self.levels[a.ind()].max(self.levels[b.ind()]);
                    assert_eq!(self.levels[i], level);
                    refs[a.ind()] += 1;
                    refs[b.ind()] += 1;
                }
            }
        }
        for o in &self.outputs {
            assert!(self.is_valid(*o));
            refs[o.ind()] += 1;
        }
        assert_eq!(refs, self.refs);
    }
}

impl fmt::Display for Aig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Aig with {} inputs, {} outputs:", self.nb_inputs(), self.nb_outputs())?;
        for (i, kind) in self.nodes.iter().enumerate() {
            if let NodeKind::And(a, b) = kind {
                writeln!(f, "\tn{i} = {a} & {b}")?;
            }
        }
        for (i, o) in self.outputs.iter().enumerate() {
            writeln!(f, "\to{i} = {o}")?;
        }
        Ok(())
    }
}
