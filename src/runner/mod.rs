//! @ai:module:intent Benchmark execution against a resolved adapter
//! @ai:module:layer application
//! @ai:module:public_api BenchmarkExecutor

pub mod executor;

pub use executor::BenchmarkExecutor;
