//! @ai:module:intent Per-unit outcomes and run summaries
//! @ai:module:layer domain
//! @ai:module:public_api BenchmarkOutcome, OutcomeStatus, ResultSet, RunSummary, summarize

pub mod aggregator;
pub mod types;

pub use aggregator::summarize;
pub use types::{BenchmarkOutcome, OutcomeStatus, ResultSet, RunSummary};
