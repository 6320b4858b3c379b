//! @ai:module:intent Benchmark evaluation harness for language models
//! @ai:module:layer application
//! @ai:module:public_api adapter, benchmark, config, error, evaluation, metrics, report, runner

pub mod adapter;
pub mod benchmark;
pub mod config;
pub mod error;
pub mod evaluation;
pub mod metrics;
pub mod report;
pub mod runner;

pub use adapter::{Adapter, AdapterResolver, ModelAdapter, ModelFamily};
pub use benchmark::{discover, Benchmark, BenchmarkRegistry, BenchmarkUnit};
pub use config::HarnessConfig;
pub use error::{AdapterError, HarnessError};
pub use evaluation::{Evaluation, RunReport};
pub use metrics::{BenchmarkOutcome, ResultSet, RunSummary};
pub use report::{ReportGenerator, ReportPaths};
pub use runner::BenchmarkExecutor;
