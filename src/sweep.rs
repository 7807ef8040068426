//! SAT sweeping: prove or refute candidate equivalences
//!
//! Each round builds a [`SpecReduction`] of the graph, where every pending node is replaced
//! by its representative and checked against it. The outcomes are folded back into the
//! [`EquivClasses`], and the counterexamples are replayed by simulation to refine the
//! classes before the next round.

mod progress;
mod spec_reduce;

use clap::Args;
use log::{debug, info};
use rand::rngs::SmallRng;
use rand::SeedableRng;

use crate::classes::{EquivClasses, NodeStatus};
use crate::error::Result;
use crate::parallel::solve_round_parallel;
use crate::pattern::{pack_patterns, CexExtractor, CexStore, ExtractStats, PatternLog};
use crate::sat::{DefaultSolver, SatEngine, SatParams, SatSolver, SatStats, SatStatus};
use crate::sim::simulate_nodes;
use crate::{Aig, Signal};

pub(crate) use progress::Progress;
pub use spec_reduce::{spec_reduce, SpecReduction};

/// Parameters of the sweeping loop
#[derive(Args, Clone, Debug, PartialEq, Eq)]
pub struct SweepParams {
    /// Parameters of the SAT queries
    #[command(flatten)]
    pub sat: SatParams,

    /// Number of simulation words per series when replaying counterexamples
    #[arg(long, default_value_t = 15)]
    pub nb_words: usize,

    /// Maximum number of rounds
    #[arg(long, default_value_t = 10)]
    pub max_rounds: usize,

    /// Maximum level of the nodes checked; 0 for no limit
    #[arg(long, default_value_t = 0)]
    pub level_max: u32,

    /// Maximum number of chained replacements in a round; 0 for no limit
    #[arg(long, default_value_t = 1)]
    pub depth_max: u32,

    /// Number of worker threads for the SAT queries
    #[arg(short = 'j', long, default_value_t = 1)]
    pub nb_threads: usize,

    /// Seed for the random simulation words
    #[arg(long, default_value_t = 1)]
    pub seed: u64,

    /// Show a progress bar for each round
    #[arg(long)]
    pub progress: bool,
}

impl Default for SweepParams {
    fn default() -> Self {
        SweepParams {
            sat: SatParams::default(),
            nb_words: 15,
            max_rounds: 10,
            level_max: 0,
            depth_max: 1,
            nb_threads: 1,
            seed: 1,
            progress: false,
        }
    }
}

/// Results of the queries of one round
#[derive(Debug, Clone, Default)]
pub struct RoundResults {
    /// Status of each output
    pub statuses: Vec<SatStatus>,
    /// Complete counterexamples, if requested
    pub cexes: CexStore,
    /// Solver counters
    pub sat_stats: SatStats,
    /// Pattern extraction counters
    pub extract_stats: ExtractStats,
}

/// Outcome of one round on the equivalence classes
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoundOutcome {
    /// Number of nodes proved
    pub nb_proved: usize,
    /// Number of nodes disproved
    pub nb_disproved: usize,
    /// Number of nodes where the solver gave up
    pub nb_failed: usize,
    /// Number of results discarded because they depend on an unproved replacement
    pub nb_masked: usize,
    /// Pairs (representative, node) proved during the round
    pub proved_pairs: Vec<(u32, u32)>,
}

/// Summary of a complete sweep
#[derive(Debug, Clone, Default)]
pub struct SweepReport {
    /// Number of rounds run
    pub nb_rounds: usize,
    /// Pairs (representative, node) proved, in order
    pub proved_pairs: Vec<(u32, u32)>,
    /// Total number of disproved candidates
    pub nb_disproved: usize,
    /// Number of nodes left failed after the last round
    pub nb_failed: usize,
    /// Number of nodes left pending after the last round
    pub nb_pending: usize,
    /// Solver counters over all rounds
    pub sat_stats: SatStats,
}

/// Check every output of a graph in a single solver, storing reduced counterexamples in the log
///
/// This starts a new round in the log.
pub fn solve_round<S: SatSolver + Default>(
    aig: &Aig,
    params: &SatParams,
    log: &mut PatternLog,
    progress: bool,
) -> Result<RoundResults> {
    log.start_round();
    let mut engine = SatEngine::<S>::new(aig, params)?;
    let mut extractor = CexExtractor::new(aig.nb_nodes());
    let mut ret = RoundResults::default();
    let mut bar = Progress::new(progress, aig.nb_outputs());
    for k in 0..aig.nb_outputs() {
        let o = aig.output(k);
        let status = engine.check(aig, o)?;
        match status {
            SatStatus::Counterexample => {
                let pattern = extractor.minimize(aig, &engine, o)?;
                log.store(&pattern);
                if params.save_cexes {
                    ret.cexes.add_cex(k, extractor.full_pattern(aig, &engine, o)?);
                }
            }
            SatStatus::Undetermined => {
                if params.save_cexes {
                    ret.cexes.add_timeout(k);
                }
            }
            SatStatus::Proved => (),
        }
        ret.statuses.push(status);
        bar.update(k + 1, engine.stats().nb_proved, engine.stats().nb_cexes);
    }
    ret.sat_stats = engine.stats().clone();
    ret.extract_stats = extractor.stats().clone();
    Ok(ret)
}

/// Check every output of a graph, keeping a complete counterexample for each unproved output
pub fn solve_outputs(aig: &Aig, params: &SatParams) -> Result<RoundResults> {
    let params = SatParams {
        save_cexes: true,
        ..params.clone()
    };
    let mut log = PatternLog::new();
    solve_round::<DefaultSolver>(aig, &params, &mut log, false)
}

/// Nodes whose result cannot be trusted, because they depend on an unproved replacement
///
/// All transitive fanouts of unproved candidates are marked, except the unproved candidates
/// that do not depend on another one.
fn failure_mask(aig: &Aig, srm: &SpecReduction, statuses: &[SatStatus]) -> Vec<bool> {
    let mut mask = vec![false; aig.nb_nodes()];
    let unproved: Vec<u32> = srm
        .pairs
        .iter()
        .zip(statuses)
        .filter(|(_, s)| **s != SatStatus::Proved)
        .map(|((_, n), _)| *n)
        .collect();
    for &n in &unproved {
        mask[n as usize] = true;
    }
    for n in 1..aig.nb_nodes() as u32 {
        if aig.is_and(n) {
            let m = mask[aig.fanin0(n).ind()] || mask[aig.fanin1(n).ind()];
            mask[n as usize] |= m;
        }
    }
    let roots: Vec<u32> = unproved
        .into_iter()
        .filter(|&n| {
            !aig.is_and(n) || (!mask[aig.fanin0(n).ind()] && !mask[aig.fanin1(n).ind()])
        })
        .collect();
    for n in roots {
        mask[n as usize] = false;
    }
    mask
}

/// Fold the results of a round into the equivalence classes
///
/// A result is only used if neither the node nor its representative depend on an unproved
/// replacement. Disproved nodes must then be refined with [`replay_and_refine`].
/// Pairs that the reduction found structurally identical are proved without a query.
pub fn fold_round(
    aig: &Aig,
    classes: &mut EquivClasses,
    srm: &SpecReduction,
    statuses: &[SatStatus],
) -> RoundOutcome {
    assert_eq!(srm.nb_outputs(), statuses.len());
    let mask = failure_mask(aig, srm, statuses);
    let mut ret = RoundOutcome::default();
    for &(r, n) in &srm.identical {
        assert_eq!(classes.repr(n), Some(r), "Node {n} changed class during the round");
        classes.set_status(n, NodeStatus::Proved);
        ret.proved_pairs.push((r, n));
        ret.nb_proved += 1;
    }
    for (&(r, n), status) in srm.pairs.iter().zip(statuses) {
        assert_eq!(classes.repr(n), Some(r), "Node {n} changed class during the round");
        let trusted = !mask[r as usize] && !mask[n as usize];
        match status {
            SatStatus::Proved if trusted => {
                classes.set_status(n, NodeStatus::Proved);
                ret.proved_pairs.push((r, n));
                ret.nb_proved += 1;
            }
            SatStatus::Counterexample if trusted => {
                classes.set_status(n, NodeStatus::Disproved);
                ret.nb_disproved += 1;
            }
            SatStatus::Undetermined => {
                classes.set_status(n, NodeStatus::Failed);
                ret.nb_failed += 1;
            }
            _ => ret.nb_masked += 1,
        }
    }
    ret
}

/// Replay the patterns of the current round on the graph, and refine the classes
///
/// Returns the number of nodes whose representative changed.
pub fn replay_and_refine(
    aig: &Aig,
    classes: &mut EquivClasses,
    log: &PatternLog,
    nb_words: usize,
    rng: &mut SmallRng,
) -> usize {
    if log.nb_round_patterns() == 0 {
        return 0;
    }
    let packed = pack_patterns(log.round_patterns(), aig.nb_inputs(), nb_words, rng);
    debug!(
        "Replaying {} patterns in {} series of {} words",
        packed.nb_patterns, packed.nb_series, nb_words
    );
    let values = simulate_nodes(aig, &packed.words);
    classes.refine(aig, &values)
}

/// Run sweeping rounds with the default solver until all candidates are resolved
pub fn sweep(aig: &Aig, classes: &mut EquivClasses, params: &SweepParams) -> Result<SweepReport> {
    sweep_with::<DefaultSolver>(aig, classes, params)
}

/// Run sweeping rounds until all candidates are resolved, no progress is made, or the
/// maximum number of rounds is reached
///
/// Failed nodes are retried at the beginning of each round. A node that becomes
/// structurally identical to its representative is proved without a query if only proved
/// replacements were involved; otherwise it is not checked in this round. If a pending
/// replacement keeps masking such a node until the sweep stops, it is reported as pending.
pub fn sweep_with<S: SatSolver + Default>(
    aig: &Aig,
    classes: &mut EquivClasses,
    params: &SweepParams,
) -> Result<SweepReport> {
    let mut rng = SmallRng::seed_from_u64(params.seed);
    let mut log = PatternLog::new();
    let mut report = SweepReport::default();
    for round in 0..params.max_rounds {
        classes.retry_failed();
        if classes.nb_pending() == 0 {
            break;
        }
        let srm = spec_reduce(aig, classes, params.level_max, params.depth_max);
        if srm.nb_outputs() == 0 && srm.identical.is_empty() {
            break;
        }
        let results = if params.nb_threads > 1 {
            solve_round_parallel::<S>(
                &srm.aig,
                &params.sat,
                params.nb_threads,
                &mut log,
                params.progress,
            )?
        } else {
            solve_round::<S>(&srm.aig, &params.sat, &mut log, params.progress)?
        };
        let outcome = fold_round(aig, classes, &srm, &results.statuses);
        let nb_refined = replay_and_refine(aig, classes, &log, params.nb_words, &mut rng);
        info!(
            "Round {}: {} candidates, {} identical, {} proved, {} disproved, {} failed, {} masked, {} patterns, {} refined",
            round,
            srm.nb_outputs(),
            srm.identical.len(),
            outcome.nb_proved,
            outcome.nb_disproved,
            outcome.nb_failed,
            outcome.nb_masked,
            log.nb_round_patterns(),
            nb_refined
        );
        debug!(
            "Round {}: {} SAT calls, {} recycles, {} of {} cone literals kept",
            round,
            results.sat_stats.nb_calls,
            results.sat_stats.nb_recycles,
            results.extract_stats.nb_kept_lits,
            results.extract_stats.nb_cone_lits
        );
        report.nb_rounds += 1;
        report.nb_disproved += outcome.nb_disproved;
        report.sat_stats.merge(&results.sat_stats);
        let progress = outcome.nb_proved + outcome.nb_disproved + nb_refined;
        report.proved_pairs.extend(outcome.proved_pairs);
        if progress == 0 {
            break;
        }
    }
    report.nb_failed = classes.count(NodeStatus::Failed);
    report.nb_pending = classes.nb_pending();
    info!(
        "Sweep done after {} rounds: {} proved, {} disproved, {} failed, {} pending",
        report.nb_rounds,
        report.proved_pairs.len(),
        report.nb_disproved,
        report.nb_failed,
        report.nb_pending
    );
    Ok(report)
}

/// Rebuild the graph with every proved node merged into its representative
pub fn reduce(aig: &Aig, classes: &EquivClasses) -> Aig {
    let mut ret = Aig::new();
    let mut copies = vec![Signal::zero(); aig.nb_nodes()];
    for i in 0..aig.nb_inputs() {
        copies[aig.input(i).ind()] = ret.add_input();
    }
    let copy = |copies: &[Signal], s: Signal| copies[s.ind()] ^ s.is_inverted();
    for n in 1..aig.nb_nodes() as u32 {
        if aig.is_and(n) {
            let a = copy(&copies, aig.fanin0(n));
            let b = copy(&copies, aig.fanin1(n));
            copies[n as usize] = ret.and(a, b);
        }
        if classes.status(n) == NodeStatus::Proved {
            if let Some(r) = classes.repr(n) {
                copies[n as usize] = copies[r as usize] ^ (aig.phase(n) ^ aig.phase(r));
            }
        }
    }
    for o in aig.outputs() {
        ret.add_output(copy(&copies, *o));
    }
    ret
}

#[cfg(test)]
mod tests {
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    use super::{fold_round, reduce, replay_and_refine, solve_outputs, solve_round, sweep};
    use super::{spec_reduce, sweep_with, SweepParams};
    use crate::classes::{EquivClasses, NodeStatus};
    use crate::network::generators::{adder, testcases};
    use crate::pattern::{PatternLit, PatternLog};
    use crate::sat::solver::testing::GiveUpSolver;
    use crate::sat::{DefaultSolver, SatParams, SatStatus};
    use crate::sim::{random_inputs, simulate_comb, simulate_nodes};
    use crate::{Aig, Signal};

    fn init_logger() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn classes_by_simulation(aig: &Aig, nb_words: usize, seed: u64) -> EquivClasses {
        let mut rng = SmallRng::seed_from_u64(seed);
        let values = simulate_nodes(aig, &random_inputs(aig.nb_inputs(), nb_words, &mut rng));
        EquivClasses::from_simulation(aig, &values)
    }

    #[test]
    fn test_associativity_round() {
        init_logger();
        let (aig, x, y) = testcases::and_associativity();
        let mut classes = EquivClasses::new(aig.nb_nodes());
        classes.set_repr(y, Some(x));
        let srm = spec_reduce(&aig, &classes, 0, 1);
        let mut log = PatternLog::new();
        let res = solve_round::<DefaultSolver>(&srm.aig, &SatParams::default(), &mut log, false)
            .unwrap();
        assert_eq!(res.statuses, vec![SatStatus::Proved]);
        assert_eq!(log.nb_round_patterns(), 0);
        let outcome = fold_round(&aig, &mut classes, &srm, &res.statuses);
        assert_eq!(outcome.proved_pairs, vec![(x, y)]);
        assert_eq!(classes.status(y), NodeStatus::Proved);
        assert_eq!(classes.repr(y), Some(x));
    }

    #[test]
    fn test_disproved_round() {
        init_logger();
        let mut aig = Aig::new();
        let a = aig.add_input();
        let b = aig.add_input();
        let c = aig.add_input();
        let x = aig.and(a, b).node();
        let y = aig.and(a, c).node();
        let mut classes = EquivClasses::new(aig.nb_nodes());
        classes.set_repr(y, Some(x));
        let srm = spec_reduce(&aig, &classes, 0, 1);
        let mut log = PatternLog::new();
        let res = solve_round::<DefaultSolver>(&srm.aig, &SatParams::default(), &mut log, false)
            .unwrap();
        assert_eq!(res.statuses, vec![SatStatus::Counterexample]);
        assert_eq!(log.nb_round_patterns(), 1);
        let outcome = fold_round(&aig, &mut classes, &srm, &res.statuses);
        assert_eq!(outcome.nb_disproved, 1);
        assert_eq!(classes.status(y), NodeStatus::Disproved);
        let mut rng = SmallRng::seed_from_u64(5);
        assert_eq!(replay_and_refine(&aig, &mut classes, &log, 1, &mut rng), 1);
        assert_eq!(classes.repr(y), None);
        assert_eq!(classes.status(y), NodeStatus::Unclassified);
    }

    /// y is wrongly grouped with x, and z depends on y but is equivalent to w
    ///
    /// Returns the graph, the classes and the nodes x, y, w and z.
    fn wrong_class_with_fanout() -> (Aig, EquivClasses, [Signal; 4]) {
        let mut aig = Aig::new();
        let a = aig.add_input();
        let b = aig.add_input();
        let c = aig.add_input();
        let x = aig.and(a, b);
        let y = aig.and(a, c);
        let w = aig.and(x, c);
        let z = aig.and(y, b);
        let mut classes = EquivClasses::new(aig.nb_nodes());
        classes.set_repr(y.node(), Some(x.node()));
        classes.set_repr(z.node(), Some(w.node()));
        (aig, classes, [x, y, w, z])
    }

    #[test]
    fn test_mask() {
        let (aig, mut classes, [x, y, w, z]) = wrong_class_with_fanout();
        let srm = spec_reduce(&aig, &classes, 0, 0);
        assert_eq!(srm.pairs, vec![(x.node(), y.node()), (w.node(), z.node())]);
        let mut log = PatternLog::new();
        let res = solve_round::<DefaultSolver>(&srm.aig, &SatParams::default(), &mut log, false)
            .unwrap();
        // With y replaced by x, z computes a & b and differs from w
        assert_eq!(res.statuses, vec![SatStatus::Counterexample; 2]);
        let outcome = fold_round(&aig, &mut classes, &srm, &res.statuses);
        assert_eq!(outcome.nb_disproved, 1);
        assert_eq!(outcome.nb_proved, 0);
        assert_eq!(outcome.nb_masked, 1);
        assert_eq!(classes.status(y.node()), NodeStatus::Disproved);
        assert_eq!(classes.status(z.node()), NodeStatus::Pending);
    }

    #[test]
    fn test_failed_round() {
        let (aig, mut classes, [x, y, w, z]) = wrong_class_with_fanout();
        let srm = spec_reduce(&aig, &classes, 0, 0);
        // The solver gave up on y, so the proof of z cannot be trusted
        let statuses = [SatStatus::Undetermined, SatStatus::Proved];
        let outcome = fold_round(&aig, &mut classes, &srm, &statuses);
        assert_eq!(outcome.nb_failed, 1);
        assert_eq!(outcome.nb_masked, 1);
        assert_eq!(outcome.nb_proved, 0);
        assert!(outcome.proved_pairs.is_empty());
        assert_eq!(classes.status(y.node()), NodeStatus::Failed);
        assert_eq!(classes.status(z.node()), NodeStatus::Pending);
        assert_eq!(classes.repr(y.node()), Some(x.node()));

        // Failed nodes are not replaced until they are retried
        let srm = spec_reduce(&aig, &classes, 0, 0);
        assert_eq!(srm.pairs, vec![(w.node(), z.node())]);
        classes.retry_failed();
        assert_eq!(classes.status(y.node()), NodeStatus::Pending);
        let srm = spec_reduce(&aig, &classes, 0, 0);
        assert_eq!(srm.pairs, vec![(x.node(), y.node()), (w.node(), z.node())]);
    }

    #[test]
    fn test_sweep_gives_up() {
        init_logger();
        let (aig, mut classes, [x, y, w, z]) = wrong_class_with_fanout();
        let report =
            sweep_with::<GiveUpSolver>(&aig, &mut classes, &SweepParams::default()).unwrap();
        // z is cut by the replacement of y, and the round makes no progress
        assert_eq!(report.nb_rounds, 1);
        assert_eq!(report.sat_stats.nb_undetermined, 1);
        assert_eq!(report.nb_failed, 1);
        assert_eq!(report.nb_pending, 1);
        assert!(report.proved_pairs.is_empty());
        assert_eq!(classes.status(y.node()), NodeStatus::Failed);

        // A complete solver picks the failed node up again
        let report = sweep(&aig, &mut classes, &SweepParams::default()).unwrap();
        assert_eq!(report.nb_disproved, 1);
        assert_eq!(report.nb_failed, 0);
        assert_eq!(report.nb_pending, 0);
        assert_eq!(report.proved_pairs, vec![(w.node(), z.node())]);
        assert_ne!(classes.repr(y.node()), Some(x.node()));
    }

    #[test]
    fn test_timeouts_recorded() {
        let (mut aig, _) = testcases::hidden_zero();
        let a = aig.input(0);
        aig.add_output(a);
        let params = SatParams {
            save_cexes: true,
            ..SatParams::default()
        };
        let mut log = PatternLog::new();
        let res = solve_round::<GiveUpSolver>(&aig, &params, &mut log, false).unwrap();
        assert_eq!(res.statuses, vec![SatStatus::Undetermined; 2]);
        assert_eq!(res.sat_stats.nb_undetermined, 2);
        assert_eq!(log.nb_round_patterns(), 0);
        assert_eq!(res.cexes.nb_cexes(), 0);
        assert_eq!(res.cexes.nb_timeouts(), 2);
        for (k, record) in res.cexes.records().iter().enumerate() {
            assert_eq!(record.output, k);
            assert_eq!(record.pattern, None);
        }
    }

    #[test]
    fn test_sweep_identical_after_proof() {
        init_logger();
        let (mut aig, x1, y1) = testcases::and_associativity();
        let d = aig.add_input();
        let r = aig.and(Signal::from_node(x1), d).node();
        let m = aig.and(Signal::from_node(y1), d).node();
        let mut classes = EquivClasses::new(aig.nb_nodes());
        classes.set_repr(y1, Some(x1));
        classes.set_repr(m, Some(r));
        let report = sweep(&aig, &mut classes, &SweepParams::default()).unwrap();
        // m is proved without a query once y1 is proved
        assert_eq!(report.proved_pairs, vec![(x1, y1), (r, m)]);
        assert_eq!(report.sat_stats.nb_calls, 1);
        assert_eq!(report.nb_rounds, 2);
        assert_eq!(report.nb_pending, 0);
        assert_eq!(classes.status(m), NodeStatus::Proved);
    }

    #[test]
    fn test_sweep_inverted_xors() {
        init_logger();
        let len = 5;
        let mut aig = testcases::inverted_xor_chain(len);
        // The same functions built as balanced trees
        let zeros = vec![false; aig.nb_inputs()];
        let inversions = simulate_comb(&aig, &zeros);
        let inputs: Vec<Signal> = (0..aig.nb_inputs()).map(|i| aig.input(i)).collect();
        for k in 0..len {
            let t = aig.xor_n(&inputs[..k + 2]);
            aig.add_output(t ^ inversions[k]);
        }
        let mut classes = classes_by_simulation(&aig, 2, 4);
        let params = SweepParams {
            max_rounds: 100,
            nb_words: 2,
            ..SweepParams::default()
        };
        let report = sweep(&aig, &mut classes, &params).unwrap();
        assert_eq!(report.nb_pending, 0);
        assert_eq!(report.nb_failed, 0);
        let reduced = reduce(&aig, &classes);
        reduced.check();
        for k in 0..len {
            assert_eq!(reduced.output(k), reduced.output(k + len));
        }
    }

    #[test]
    fn test_sweep_adders() {
        init_logger();
        let aig = adder::ripple_carry_pair(4);
        let mut classes = classes_by_simulation(&aig, 2, 1);
        let params = SweepParams {
            max_rounds: 100,
            nb_words: 2,
            ..SweepParams::default()
        };
        let report = sweep(&aig, &mut classes, &params).unwrap();
        assert_eq!(report.nb_pending, 0);
        assert_eq!(report.nb_failed, 0);
        // Every output of the second adder is proved equivalent to the first one
        let reduced = reduce(&aig, &classes);
        reduced.check();
        assert!(reduced.nb_ands() < aig.nb_ands());
        for k in 0..5 {
            assert_eq!(reduced.output(k), reduced.output(k + 5));
        }
        for v in 0..256u32 {
            let inputs: Vec<bool> = (0..8).map(|i| v >> i & 1 != 0).collect();
            assert_eq!(simulate_comb(&aig, &inputs), simulate_comb(&reduced, &inputs));
        }
    }

    #[test]
    fn test_sweep_refines_bad_classes() {
        init_logger();
        let aig = adder::ripple_carry_pair(3);
        // A single simulation word with few inputs leaves many false candidates
        let mut rng = SmallRng::seed_from_u64(9);
        let mut inputs = random_inputs(aig.nb_inputs(), 1, &mut rng);
        for w in inputs.iter_mut().flatten() {
            *w &= 0x3;
        }
        let values = simulate_nodes(&aig, &inputs);
        let mut classes = EquivClasses::from_simulation(&aig, &values);
        assert!(classes.nb_pending() > 0);
        let params = SweepParams {
            max_rounds: 100,
            depth_max: 0,
            ..SweepParams::default()
        };
        let report = sweep(&aig, &mut classes, &params).unwrap();
        assert!(report.nb_disproved > 0);
        assert_eq!(report.nb_pending, 0);
        // Every proved pair is a real equivalence
        let values = simulate_nodes(&aig, &random_inputs(aig.nb_inputs(), 4, &mut rng));
        for &(r, n) in &report.proved_pairs {
            let compl = aig.phase(r) ^ aig.phase(n);
            let mask = if compl { !0 } else { 0 };
            for k in 0..4 {
                assert_eq!(values[r as usize][k] ^ mask, values[n as usize][k]);
            }
        }
    }

    #[test]
    fn test_sweep_parallel() {
        init_logger();
        let aig = adder::ripple_carry_pair(4);
        let params = SweepParams {
            max_rounds: 100,
            nb_threads: 3,
            ..SweepParams::default()
        };
        let mut classes = classes_by_simulation(&aig, 1, 3);
        let report = sweep(&aig, &mut classes, &params).unwrap();
        assert_eq!(report.nb_pending, 0);
        let mut sequential = classes_by_simulation(&aig, 1, 3);
        let params = SweepParams {
            nb_threads: 1,
            ..params
        };
        let seq_report = sweep(&aig, &mut sequential, &params).unwrap();
        let mut pairs = report.proved_pairs.clone();
        let mut seq_pairs = seq_report.proved_pairs.clone();
        pairs.sort();
        seq_pairs.sort();
        assert_eq!(pairs, seq_pairs);
    }

    #[test]
    fn test_solve_outputs() {
        let (aig, _) = testcases::hidden_zero();
        let mut miter = aig.clone();
        let a = miter.input(0);
        miter.add_output(a);
        let res = solve_outputs(&miter, &SatParams::default()).unwrap();
        assert_eq!(res.statuses, vec![SatStatus::Proved, SatStatus::Counterexample]);
        assert_eq!(res.cexes.nb_cexes(), 1);
        assert_eq!(res.cexes.records()[0].output, 1);
        assert_eq!(res.cexes.records()[0].pattern, Some(vec![PatternLit::new(0, true)]));
    }

    #[test]
    fn test_params_cli() {
        use clap::Parser;

        #[derive(Parser)]
        struct Cli {
            #[command(flatten)]
            sweep: SweepParams,
        }

        let cli = Cli::parse_from(["cec"]);
        assert_eq!(cli.sweep, SweepParams::default());
        let cli = Cli::parse_from(["cec", "-j", "4", "--conflict-limit", "1000", "--depth-max", "0"]);
        assert_eq!(cli.sweep.nb_threads, 4);
        assert_eq!(cli.sweep.sat.conflict_limit, 1000);
        assert_eq!(cli.sweep.depth_max, 0);
    }
}
