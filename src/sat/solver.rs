//! Interface to the incremental SAT backend

use rustsat::solvers::{LimitConflicts, Solve, SolveIncremental, SolverResult};
use rustsat::types::{Clause, Lit, TernaryVal, Var};
use rustsat_cadical::CaDiCaL;

/// Outcome of a single solver call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolveOutcome {
    /// A model was found
    Sat,
    /// No model exists under the assumptions
    Unsat,
    /// The conflict limit was reached
    Interrupted,
}

/// Minimal interface of an incremental SAT solver, as used by the query engine
///
/// Variables are identified by their index; the caller allocates them.
pub trait SatSolver {
    /// Add a clause permanently
    fn add_clause(&mut self, lits: &[Lit]) -> anyhow::Result<()>;

    /// Solve under assumptions, with an optional limit on the number of conflicts
    fn solve_limited(
        &mut self,
        assumptions: &[Lit],
        conflict_limit: Option<u32>,
    ) -> anyhow::Result<SolveOutcome>;

    /// Value of a variable in the last model
    fn model_value(&self, var: Var) -> anyhow::Result<bool>;
}

/// Default SAT backend
pub type DefaultSolver = CaDiCaL<'static, 'static>;

impl SatSolver for CaDiCaL<'_, '_> {
    fn add_clause(&mut self, lits: &[Lit]) -> anyhow::Result<()> {
        let clause: Clause = lits.iter().copied().collect();
        Solve::add_clause(self, clause)
    }

    fn solve_limited(
        &mut self,
        assumptions: &[Lit],
        conflict_limit: Option<u32>,
    ) -> anyhow::Result<SolveOutcome> {
        self.limit_conflicts(conflict_limit)?;
        let res = self.solve_assumps(assumptions)?;
        Ok(match res {
            SolverResult::Sat => SolveOutcome::Sat,
            SolverResult::Unsat => SolveOutcome::Unsat,
            SolverResult::Interrupted => SolveOutcome::Interrupted,
        })
    }

    fn model_value(&self, var: Var) -> anyhow::Result<bool> {
        Ok(self.lit_val(var.pos_lit())? == TernaryVal::True)
    }
}


#[cfg(test)]
mod tests {
    use rustsat::types::Lit;

    use super::{DefaultSolver, SatSolver, SolveOutcome};

    #[test]
    fn test_cadical() {
        let mut solver = DefaultSolver::default();
        let a = Lit::new(1, false);
        let b = Lit::new(2, false);
        solver.add_clause(&[a, b]).unwrap();
        solver.add_clause(&[!a, b]).unwrap();
        assert_eq!(solver.solve_limited(&[], Some(100)).unwrap(), SolveOutcome::Sat);
        assert!(solver.model_value(b.var()).unwrap());
        assert_eq!(solver.solve_limited(&[!b], None).unwrap(), SolveOutcome::Unsat);
        assert_eq!(solver.solve_limited(&[a], Some(100)).unwrap(), SolveOutcome::Sat);
        assert!(solver.model_value(a.var()).unwrap());
    }
}
