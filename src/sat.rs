//! Incremental SAT queries on a graph
//!
//! The [`SatEngine`] owns a solver instance and translates cones lazily with a [`CnfBuilder`].
//! Proved queries are cached in the solver as unit or binary clauses, so that later queries
//! benefit from them. When the solver grows too large, it is discarded and rebuilt.

pub mod cnf;
pub mod solver;

use clap::{ArgAction, Args};
use log::{debug, trace};
use rustsat::types::Lit;

use crate::error::Result;
use crate::{Aig, Signal};

pub use cnf::CnfBuilder;
pub use solver::{DefaultSolver, SatSolver, SolveOutcome};

/// Parameters of the SAT queries
#[derive(Args, Clone, Debug, PartialEq, Eq)]
pub struct SatParams {
    /// Conflict limit for each SAT query; 0 for no limit
    #[arg(long, default_value_t = 100)]
    pub conflict_limit: u32,

    /// Number of solver variables above which the solver is recycled; 0 to never recycle
    #[arg(long, default_value_t = 2000)]
    pub max_sat_vars: u32,

    /// Minimum number of queries between two solver recycles
    #[arg(long, default_value_t = 200)]
    pub calls_recycle: u32,

    /// Flip the polarity of solver variables according to the structural phase of their node
    #[arg(long, default_value_t = true, action = ArgAction::Set)]
    pub polar_flip: bool,

    /// Use a dedicated encoding for multiplexers
    #[arg(long, default_value_t = true, action = ArgAction::Set)]
    pub use_muxes: bool,

    /// Keep a complete input assignment for every disproved output
    #[arg(long)]
    pub save_cexes: bool,
}

impl Default for SatParams {
    fn default() -> Self {
        SatParams {
            conflict_limit: 100,
            max_sat_vars: 2000,
            calls_recycle: 200,
            polar_flip: true,
            use_muxes: true,
            save_cexes: false,
        }
    }
}

/// Result of a SAT query
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SatStatus {
    /// The queried literals can never be true together
    Proved,
    /// A model was found; it is valid until the next query
    Counterexample,
    /// The conflict limit was reached
    Undetermined,
}

/// Counters of the SAT queries
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SatStats {
    /// Number of queries
    pub nb_calls: usize,
    /// Number of proved queries
    pub nb_proved: usize,
    /// Number of queries with a counterexample
    pub nb_cexes: usize,
    /// Number of queries that reached the conflict limit
    pub nb_undetermined: usize,
    /// Number of solver recycles
    pub nb_recycles: usize,
}

impl SatStats {
    fn record(&mut self, status: SatStatus) {
        match status {
            SatStatus::Proved => self.nb_proved += 1,
            SatStatus::Counterexample => self.nb_cexes += 1,
            SatStatus::Undetermined => self.nb_undetermined += 1,
        }
    }

    /// Accumulate the counters of another engine
    pub fn merge(&mut self, other: &SatStats) {
        self.nb_calls += other.nb_calls;
        self.nb_proved += other.nb_proved;
        self.nb_cexes += other.nb_cexes;
        self.nb_undetermined += other.nb_undetermined;
        self.nb_recycles += other.nb_recycles;
    }
}

/// SAT query engine for one graph
///
/// The graph is passed to each call; it must be the same graph every time.
pub struct SatEngine<S: SatSolver + Default = DefaultSolver> {
    params: SatParams,
    solver: S,
    cnf: CnfBuilder,
    nb_calls_since: u32,
    stats: SatStats,
}

impl<S: SatSolver + Default> SatEngine<S> {
    /// Create an engine for the given graph
    pub fn new(aig: &Aig, params: &SatParams) -> Result<Self> {
        let mut solver = S::default();
        let mut cnf = CnfBuilder::new(aig.nb_nodes(), params.polar_flip, params.use_muxes);
        cnf.reset(&mut solver)?;
        Ok(SatEngine {
            params: params.clone(),
            solver,
            cnf,
            nb_calls_since: 0,
            stats: SatStats::default(),
        })
    }

    /// Query counters
    pub fn stats(&self) -> &SatStats {
        &self.stats
    }

    /// Number of variables in the current solver instance
    pub fn nb_sat_vars(&self) -> u32 {
        self.cnf.nb_vars()
    }

    /// Discard the solver and start again with an empty one
    ///
    /// All clauses are lost, including those caching previous proofs.
    pub fn recycle(&mut self) -> Result<()> {
        debug!(
            "Recycling SAT solver with {} variables after {} calls",
            self.cnf.nb_vars(),
            self.nb_calls_since
        );
        self.solver = S::default();
        self.cnf.reset(&mut self.solver)?;
        self.nb_calls_since = 0;
        self.stats.nb_recycles += 1;
        Ok(())
    }

    fn start_query(&mut self) -> Result<()> {
        self.nb_calls_since += 1;
        self.stats.nb_calls += 1;
        if self.params.max_sat_vars > 0
            && self.cnf.nb_vars() > self.params.max_sat_vars
            && self.nb_calls_since > self.params.calls_recycle
        {
            self.recycle()?;
        }
        Ok(())
    }

    fn solve(&mut self, assumptions: &[Lit]) -> Result<SolveOutcome> {
        let limit = match self.params.conflict_limit {
            0 => None,
            l => Some(l),
        };
        Ok(self.solver.solve_limited(assumptions, limit)?)
    }

    /// Check whether a signal can be true
    ///
    /// Returns [`SatStatus::Proved`] if the signal is constant false. The proof is kept in
    /// the solver as a unit clause.
    pub fn check(&mut self, aig: &Aig, s: Signal) -> Result<SatStatus> {
        if s == Signal::zero() {
            return Ok(SatStatus::Proved);
        }
        if s == Signal::one() {
            return Ok(SatStatus::Counterexample);
        }
        self.start_query()?;
        self.cnf.add_node(aig, &mut self.solver, s.node())?;
        let lit = self.cnf.sat_lit(aig, s);
        let status = match self.solve(&[lit])? {
            SolveOutcome::Unsat => {
                self.solver.add_clause(&[!lit])?;
                SatStatus::Proved
            }
            SolveOutcome::Sat => SatStatus::Counterexample,
            SolveOutcome::Interrupted => SatStatus::Undetermined,
        };
        trace!("Query {s}: {status:?}");
        self.stats.record(status);
        Ok(status)
    }

    /// Check whether two signals can be true together
    ///
    /// Returns [`SatStatus::Proved`] if they are never both true. The proof is kept in the
    /// solver as a binary clause.
    pub fn check_two(&mut self, aig: &Aig, a: Signal, b: Signal) -> Result<SatStatus> {
        if a == Signal::zero() || b == Signal::zero() || a == !b {
            return Ok(SatStatus::Proved);
        }
        if a == Signal::one() || a == b {
            return self.check(aig, b);
        }
        if b == Signal::one() {
            return self.check(aig, a);
        }
        self.start_query()?;
        self.cnf.add_node(aig, &mut self.solver, a.node())?;
        self.cnf.add_node(aig, &mut self.solver, b.node())?;
        let la = self.cnf.sat_lit(aig, a);
        let lb = self.cnf.sat_lit(aig, b);
        let status = match self.solve(&[la, lb])? {
            SolveOutcome::Unsat => {
                self.solver.add_clause(&[!la, !lb])?;
                SatStatus::Proved
            }
            SolveOutcome::Sat => SatStatus::Counterexample,
            SolveOutcome::Interrupted => SatStatus::Undetermined,
        };
        trace!("Query {a} & {b}: {status:?}");
        self.stats.record(status);
        Ok(status)
    }

    /// Value of node n in the last model
    ///
    /// Nodes outside of the translated cones get the value false.
    pub fn model_value(&self, aig: &Aig, n: u32) -> Result<bool> {
        match self.cnf.sat_var(n) {
            None => Ok(false),
            Some(v) => {
                let flip = self.cnf.polar_flip() && aig.phase(n);
                Ok(self.solver.model_value(v)? ^ flip)
            }
        }
    }

    /// Input assignment of the last model
    pub fn counterexample(&self, aig: &Aig) -> Result<Vec<bool>> {
        (0..aig.nb_inputs())
            .map(|i| self.model_value(aig, aig.input(i).node()))
            .collect()
    }
}
