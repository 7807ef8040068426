//! Representation and handling of And-Inverter Graphs

mod aig;
pub mod generators;
mod signal;
mod trav;

pub use aig::{Aig, NodeKind};
pub use signal::Signal;
pub use trav::TravIds;
