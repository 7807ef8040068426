//! SAT-based combinational equivalence checking on And-Inverter Graphs
//!
//! This crate proves that nodes of a combinational circuit compute the same function, and
//! finds counterexamples when they do not. Our goal is to provide the core engine of a
//! SAT sweeping flow, usable on its own or as part of a larger logic synthesis tool.
//!
//! # Usage
//!
//! Candidate equivalences are found by random simulation, then proved or disproved with an
//! incremental SAT solver. Each disproof yields a small input pattern, and the patterns are
//! replayed by simulation to split the candidate classes before the next round.
//!
//! ```
//! # use aigcec::{Aig, EquivClasses, sweep, SweepParams};
//! # use aigcec::sim::{random_inputs, simulate_nodes};
//! # use rand::SeedableRng;
//! let mut aig = Aig::new();
//! let a = aig.add_input();
//! let b = aig.add_input();
//! let c = aig.add_input();
//! let ab = aig.and(a, b);
//! let x = aig.and(ab, c);
//! let bc = aig.and(b, c);
//! let y = aig.and(a, bc);
//! aig.add_output(x);
//! aig.add_output(y);
//!
//! let mut rng = rand::rngs::SmallRng::seed_from_u64(1);
//! let values = simulate_nodes(&aig, &random_inputs(aig.nb_inputs(), 1, &mut rng));
//! let mut classes = EquivClasses::from_simulation(&aig, &values);
//! let report = sweep(&aig, &mut classes, &SweepParams::default()).unwrap();
//! assert_eq!(report.proved_pairs, vec![(x.node(), y.node())]);
//! ```
//!
//! # Organization
//!
//! * [`network`] holds the And-Inverter Graph, where inverters are implicit in [`Signal`];
//! * [`sat`] translates graph cones to clauses lazily and runs the queries;
//! * [`pattern`] reduces SAT models to small patterns, logs them and packs them for simulation;
//! * [`classes`] and [`sweep`] hold the candidate classes and the refinement loop;
//! * [`parallel`] dispatches the queries of a round to worker threads.
//!
//! Logging goes through the [log](https://docs.rs/log) facade: rounds are reported at the
//! info level, and solver recycling and pattern packing at the debug level.

#![warn(missing_docs)]

pub mod classes;
pub mod error;
pub mod network;
pub mod parallel;
pub mod pattern;
pub mod sat;
pub mod sim;
pub mod sweep;

pub use classes::{EquivClasses, NodeStatus};
pub use error::{CecError, Result};
pub use network::{Aig, NodeKind, Signal, TravIds};
pub use sat::{SatEngine, SatParams, SatStatus};
pub use sweep::{sweep, SweepParams, SweepReport};
