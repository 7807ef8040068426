//! Error type for equivalence checking

use thiserror::Error;

/// Errors reported by the equivalence checking engine
///
/// Resource limits are not errors: a query that exhausts its conflict budget is reported as
/// [`SatStatus::Undetermined`](crate::sat::SatStatus::Undetermined).
#[derive(Error, Debug)]
pub enum CecError {
    /// The SAT backend reported an error
    #[error(transparent)]
    Solver(#[from] anyhow::Error),
    /// A worker thread of the parallel dispatcher panicked
    #[error("worker thread {worker} panicked")]
    WorkerPanicked {
        /// Index of the worker in the pool
        worker: usize,
    },
}

/// Result type used throughout the crate
pub type Result<T> = std::result::Result<T, CecError>;
