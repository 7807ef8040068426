//! Dispatch of the queries of a round to worker threads
//!
//! Outputs are handed out through a shared queue. Each worker owns its solver and its
//! extractor, so the graph is the only shared state besides the pattern log, which is
//! locked only to append a pattern.

use std::sync::mpsc;
use std::sync::{Mutex, PoisonError};
use std::thread;

use log::debug;

use crate::error::{CecError, Result};
use crate::pattern::{CexExtractor, ExtractStats, PatternLit, PatternLog};
use crate::sat::{SatEngine, SatParams, SatSolver, SatStats, SatStatus};
use crate::sweep::{Progress, RoundResults};
use crate::Aig;

/// Result of the query on one output
struct JobResult {
    output: usize,
    status: SatStatus,
    full_pattern: Option<Vec<PatternLit>>,
}

/// Run the queries on all outputs of the worker's share of the queue
fn run_worker<S: SatSolver + Default>(
    aig: &Aig,
    params: &SatParams,
    jobs: &Mutex<mpsc::Receiver<usize>>,
    results: mpsc::Sender<JobResult>,
    log: &Mutex<&mut PatternLog>,
) -> Result<(SatStats, ExtractStats)> {
    let mut engine = SatEngine::<S>::new(aig, params)?;
    let mut extractor = CexExtractor::new(aig.nb_nodes());
    loop {
        let job = jobs
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .recv();
        let Ok(k) = job else {
            break;
        };
        let o = aig.output(k);
        let status = engine.check(aig, o)?;
        let mut full_pattern = None;
        if status == SatStatus::Counterexample {
            let pattern = extractor.minimize(aig, &engine, o)?;
            log.lock()
                .unwrap_or_else(PoisonError::into_inner)
                .store(&pattern);
            if params.save_cexes {
                full_pattern = Some(extractor.full_pattern(aig, &engine, o)?);
            }
        }
        let res = JobResult {
            output: k,
            status,
            full_pattern,
        };
        if results.send(res).is_err() {
            break;
        }
    }
    Ok((engine.stats().clone(), extractor.stats().clone()))
}

/// Check every output of a graph using several worker threads
///
/// Proved and counterexample results agree with [`solve_round`](crate::sweep::solve_round).
/// Undetermined results may differ, since each worker has its own cached proofs and its own
/// recycling schedule. The patterns are stored in the log in the order the workers find
/// them, and the counterexamples are recorded by output index.
pub fn solve_round_parallel<S: SatSolver + Default>(
    aig: &Aig,
    params: &SatParams,
    nb_threads: usize,
    log: &mut PatternLog,
    progress: bool,
) -> Result<RoundResults> {
    assert!(nb_threads > 0);
    log.start_round();
    let nb_outputs = aig.nb_outputs();
    let (job_tx, job_rx) = mpsc::channel::<usize>();
    for k in 0..nb_outputs {
        // The receiver is alive until the end of the function
        let _ = job_tx.send(k);
    }
    drop(job_tx);
    let jobs = Mutex::new(job_rx);
    let log = Mutex::new(log);
    let (res_tx, res_rx) = mpsc::channel::<JobResult>();

    let mut statuses = vec![SatStatus::Undetermined; nb_outputs];
    let mut full_patterns: Vec<Option<Vec<PatternLit>>> = vec![None; nb_outputs];
    let mut ret = RoundResults::default();
    let mut bar = Progress::new(progress, nb_outputs);

    thread::scope(|s| {
        let handles: Vec<_> = (0..nb_threads)
            .map(|_| {
                let res_tx = res_tx.clone();
                let jobs = &jobs;
                let log = &log;
                s.spawn(move || run_worker::<S>(aig, params, jobs, res_tx, log))
            })
            .collect();
        drop(res_tx);

        let (mut nb_done, mut nb_proved, mut nb_cexes) = (0, 0, 0);
        for res in res_rx.iter() {
            match res.status {
                SatStatus::Proved => nb_proved += 1,
                SatStatus::Counterexample => nb_cexes += 1,
                SatStatus::Undetermined => (),
            }
            nb_done += 1;
            statuses[res.output] = res.status;
            full_patterns[res.output] = res.full_pattern;
            bar.update(nb_done, nb_proved, nb_cexes);
        }

        let mut first_error = None;
        for (worker, h) in handles.into_iter().enumerate() {
            match h.join() {
                Ok(Ok((sat_stats, extract_stats))) => {
                    debug!(
                        "Worker {}: {} queries, {} proved, {} recycles",
                        worker, sat_stats.nb_calls, sat_stats.nb_proved, sat_stats.nb_recycles
                    );
                    ret.sat_stats.merge(&sat_stats);
                    ret.extract_stats.nb_patterns += extract_stats.nb_patterns;
                    ret.extract_stats.nb_cone_lits += extract_stats.nb_cone_lits;
                    ret.extract_stats.nb_kept_lits += extract_stats.nb_kept_lits;
                }
                Ok(Err(e)) => {
                    first_error.get_or_insert(e);
                }
                Err(_) => {
                    first_error.get_or_insert(CecError::WorkerPanicked { worker });
                }
            }
        }
        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    })?;

    if params.save_cexes {
        for (k, (status, pattern)) in statuses.iter().zip(full_patterns).enumerate() {
            match (status, pattern) {
                (SatStatus::Counterexample, Some(p)) => ret.cexes.add_cex(k, p),
                (SatStatus::Undetermined, _) => ret.cexes.add_timeout(k),
                _ => (),
            }
        }
    }
    ret.statuses = statuses;
    Ok(ret)
}
