//! @ai:module:intent Benchmark units: packaging, registration and discovery
//! @ai:module:layer domain
//! @ai:module:public_api Benchmark, BenchmarkUnit, UnitState, BenchmarkRegistry, discover
//! @ai:module:stateless true

pub mod builtin;
pub mod command;
pub mod discovery;
pub mod manifest;
pub mod registry;

pub use builtin::{CaseBenchmark, CaseCheck};
pub use command::CommandBenchmark;
pub use discovery::discover;
pub use manifest::{CaseSpec, UnitManifest, MANIFEST_FILE};
pub use registry::{BenchmarkFactory, BenchmarkRegistry};

use crate::adapter::ModelAdapter;
use async_trait::async_trait;

/// @ai:intent The single entry point a benchmark unit exposes
///
/// Returns a score on the 0-100 scale. Implementations must leave the adapter
/// as they found it; the same instance is handed to every unit in the run.
#[async_trait]
pub trait Benchmark: Send + Sync {
    /// @ai:effects network | compute
    async fn run_benchmark(&self, adapter: &dyn ModelAdapter) -> anyhow::Result<f64>;
}

/// @ai:intent Whether a discovered unit can be executed
pub enum UnitState {
    Ready(Box<dyn Benchmark>),
    Malformed(String),
}

/// @ai:intent A discovered benchmark unit, identified by its directory name
pub struct BenchmarkUnit {
    pub name: String,
    pub kind: Option<String>,
    pub description: Option<String>,
    pub state: UnitState,
}

impl BenchmarkUnit {
    /// @ai:effects pure
    pub fn ready(name: impl Into<String>, benchmark: Box<dyn Benchmark>) -> Self {
        Self {
            name: name.into(),
            kind: None,
            description: None,
            state: UnitState::Ready(benchmark),
        }
    }

    /// @ai:effects pure
    pub fn malformed(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: None,
            description: None,
            state: UnitState::Malformed(reason.into()),
        }
    }

    /// @ai:effects pure
    pub fn is_ready(&self) -> bool {
        matches!(self.state, UnitState::Ready(_))
    }

    /// @ai:intent Reason the unit cannot run, if any
    /// @ai:effects pure
    pub fn malformed_reason(&self) -> Option<&str> {
        match &self.state {
            UnitState::Ready(_) => None,
            UnitState::Malformed(reason) => Some(reason),
        }
    }
}

impl std::fmt::Debug for BenchmarkUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BenchmarkUnit")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("malformed", &self.malformed_reason())
            .finish()
    }
}
