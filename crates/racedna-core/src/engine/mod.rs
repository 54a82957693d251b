pub mod runner;
pub mod timeline;

pub use runner::{calculate_driver_dna, DnaOutcome, DnaRunner, RunSummary};
