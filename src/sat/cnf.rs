//! Lazy translation of graph cones to CNF

use rustsat::types::{Lit, Var};

use crate::sat::solver::SatSolver;
use crate::{Aig, Signal};

/// Solver variable permanently bound to constant false
const CONST_VAR: u32 = 1;

/// Incremental clause builder
///
/// Maps graph nodes to solver variables, and adds the clauses of a node's cone to the
/// solver on demand. Multi-input And structures are encoded as a single supergate, and
/// multiplexers get a dedicated encoding. Variable 0 is never used.
#[derive(Debug, Clone)]
pub struct CnfBuilder {
    sat_vars: Vec<u32>,
    used_nodes: Vec<u32>,
    nb_vars: u32,
    polar_flip: bool,
    use_muxes: bool,
    frontier: Vec<u32>,
    fanins: Vec<Signal>,
    stack: Vec<Signal>,
}

impl CnfBuilder {
    /// Create a builder for a graph with the given number of nodes
    ///
    /// [`reset`](Self::reset) must be called with a fresh solver before use.
    pub fn new(nb_nodes: usize, polar_flip: bool, use_muxes: bool) -> Self {
        CnfBuilder {
            sat_vars: vec![0; nb_nodes],
            used_nodes: Vec::new(),
            nb_vars: 0,
            polar_flip,
            use_muxes,
            frontier: Vec::new(),
            fanins: Vec::new(),
            stack: Vec::new(),
        }
    }

    /// Number of variables allocated in the solver, including the reserved ones
    pub fn nb_vars(&self) -> u32 {
        self.nb_vars
    }

    /// Number of nodes with a solver variable
    pub fn nb_used_nodes(&self) -> usize {
        self.used_nodes.len()
    }

    /// Solver variable of node n, if its cone is already in the solver
    pub fn sat_var(&self, n: u32) -> Option<Var> {
        match self.sat_vars[n as usize] {
            0 => None,
            v => Some(Var::new(v)),
        }
    }

    /// Returns true if the polarity of the variables follows the structural phase
    pub(crate) fn polar_flip(&self) -> bool {
        self.polar_flip
    }

    /// Forget all variables and bind the constant node in a fresh solver
    pub fn reset<S: SatSolver>(&mut self, solver: &mut S) -> anyhow::Result<()> {
        for n in self.used_nodes.drain(..) {
            self.sat_vars[n as usize] = 0;
        }
        self.nb_vars = CONST_VAR + 1;
        self.sat_vars[0] = CONST_VAR;
        self.used_nodes.push(0);
        solver.add_clause(&[Lit::new(CONST_VAR, true)])
    }

    /// Solver literal for a signal whose node is already translated
    pub fn sat_lit(&self, aig: &Aig, s: Signal) -> Lit {
        let var = self.sat_vars[s.ind()];
        assert!(var != 0, "Signal {s} has no solver variable");
        let flip = self.polar_flip && aig.phase(s.node());
        Lit::new(var, s.is_inverted() ^ flip)
    }

    fn bind(&mut self, n: u32) {
        debug_assert_eq!(self.sat_vars[n as usize], 0);
        self.sat_vars[n as usize] = self.nb_vars;
        self.nb_vars += 1;
        self.used_nodes.push(n);
    }

    fn add_to_frontier(&mut self, aig: &Aig, n: u32) {
        if self.sat_vars[n as usize] != 0 {
            return;
        }
        self.bind(n);
        if aig.is_and(n) {
            self.frontier.push(n);
        }
    }

    /// Make sure the whole cone of node n is in the solver
    pub fn add_node<S: SatSolver>(
        &mut self,
        aig: &Aig,
        solver: &mut S,
        n: u32,
    ) -> anyhow::Result<()> {
        assert_eq!(self.sat_vars.len(), aig.nb_nodes());
        if self.sat_vars[n as usize] != 0 {
            return Ok(());
        }
        self.frontier.clear();
        self.add_to_frontier(aig, n);
        let mut i = 0;
        while i < self.frontier.len() {
            let m = self.frontier[i];
            i += 1;
            if self.use_muxes && aig.is_mux_type(m) {
                let f0 = aig.fanin0(m).node();
                let f1 = aig.fanin1(m).node();
                for s in [
                    aig.fanin0(f0),
                    aig.fanin0(f1),
                    aig.fanin1(f0),
                    aig.fanin1(f1),
                ] {
                    self.add_to_frontier(aig, s.node());
                }
                self.add_clauses_mux(aig, solver, m)?;
            } else {
                self.collect_super(aig, m);
                for k in 0..self.fanins.len() {
                    let f = self.fanins[k].node();
                    self.add_to_frontier(aig, f);
                }
                self.add_clauses_super(aig, solver, m)?;
            }
        }
        Ok(())
    }

    /// Collect the leaves of the And supergate rooted at node n
    ///
    /// The supergate stops at complemented edges, inputs, nodes with several fanouts
    /// and multiplexers.
    fn collect_super(&mut self, aig: &Aig, root: u32) {
        self.fanins.clear();
        self.stack.clear();
        self.stack.push(aig.fanin1(root));
        self.stack.push(aig.fanin0(root));
        while let Some(s) = self.stack.pop() {
            let n = s.node();
            let is_leaf = s.is_inverted()
                || !aig.is_and(n)
                || aig.nb_refs(n) > 1
                || (self.use_muxes && aig.is_mux_type(n));
            if is_leaf {
                if !self.fanins.contains(&s) {
                    self.fanins.push(s);
                }
            } else {
                self.stack.push(aig.fanin1(n));
                self.stack.push(aig.fanin0(n));
            }
        }
    }

    fn add_clauses_super<S: SatSolver>(
        &self,
        aig: &Aig,
        solver: &mut S,
        root: u32,
    ) -> anyhow::Result<()> {
        let out = self.sat_lit(aig, Signal::from_node(root));
        let mut big = Vec::with_capacity(self.fanins.len() + 1);
        for s in &self.fanins {
            let l = self.sat_lit(aig, *s);
            solver.add_clause(&[l, !out])?;
            big.push(!l);
        }
        big.push(out);
        solver.add_clause(&big)
    }

    fn add_clauses_mux<S: SatSolver>(
        &self,
        aig: &Aig,
        solver: &mut S,
        n: u32,
    ) -> anyhow::Result<()> {
        let (c, t, e) = aig.recognize_mux(n);
        let i = self.sat_lit(aig, Signal::from_node(c));
        let lt = self.sat_lit(aig, t);
        let le = self.sat_lit(aig, e);
        let f = self.sat_lit(aig, Signal::from_node(n));
        solver.add_clause(&[!i, !lt, f])?;
        solver.add_clause(&[!i, lt, !f])?;
        solver.add_clause(&[i, !le, f])?;
        solver.add_clause(&[i, le, !f])?;
        if t.node() == e.node() {
            return Ok(());
        }
        // Redundant, but help propagation when both branches agree
        solver.add_clause(&[lt, le, !f])?;
        solver.add_clause(&[!lt, !le, f])
    }
}
