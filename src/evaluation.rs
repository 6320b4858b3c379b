//! @ai:module:intent Composition root: resolve, discover, execute, report
//! @ai:module:layer application
//! @ai:module:public_api Evaluation, RunReport
//! @ai:module:stateless false

use crate::adapter::{AdapterResolver, ModelAdapter};
use crate::benchmark::{discover, BenchmarkRegistry, BenchmarkUnit};
use crate::config::HarnessConfig;
use crate::metrics::ResultSet;
use crate::report::{ReportGenerator, ReportPaths};
use crate::runner::BenchmarkExecutor;
use anyhow::Result;

/// @ai:intent Outcome of a completed run
#[derive(Debug, Clone)]
pub struct RunReport {
    pub results: ResultSet,
    pub paths: ReportPaths,
}

/// @ai:intent One evaluation run of a model over every benchmark unit
pub struct Evaluation {
    config: HarnessConfig,
    registry: BenchmarkRegistry,
    dry_run: bool,
}

impl Evaluation {
    /// @ai:intent Evaluation with the built-in benchmark kinds
    /// @ai:effects pure
    pub fn new(config: HarnessConfig) -> Self {
        Self::with_registry(config, BenchmarkRegistry::with_builtins())
    }

    /// @ai:effects pure
    pub fn with_registry(config: HarnessConfig, registry: BenchmarkRegistry) -> Self {
        Self {
            config,
            registry,
            dry_run: false,
        }
    }

    /// @ai:intent Swap real backends for the dry-run adapter
    /// @ai:effects pure
    pub fn dry_run(mut self, enabled: bool) -> Self {
        self.dry_run = enabled;
        self
    }

    /// @ai:effects pure
    pub fn config(&self) -> &HarnessConfig {
        &self.config
    }

    /// @ai:effects pure
    pub fn registry_mut(&mut self) -> &mut BenchmarkRegistry {
        &mut self.registry
    }

    /// @ai:intent Units under the configured benchmarks root, in run order
    /// @ai:effects fs:read
    pub fn discover(&self) -> crate::error::Result<Vec<BenchmarkUnit>> {
        discover(&self.config.paths.benchmarks_dir, &self.registry)
    }

    /// @ai:intent Resolve the model, then run every unit against it
    /// @ai:pre model_id names a supported model family
    /// @ai:post on resolution failure nothing under the benchmarks or results roots is touched
    /// @ai:effects network, fs:read, fs:write
    pub async fn run(&self, model_id: &str) -> Result<RunReport> {
        let resolver = AdapterResolver::new(&self.config);

        let adapter = if self.dry_run {
            tracing::info!("Running in dry-run mode");
            resolver.resolve_dry_run(model_id)?
        } else {
            resolver.resolve(model_id).await?
        };

        tracing::info!("Using {} adapter for {}", adapter.backend(), model_id);
        self.run_with_adapter(&adapter).await
    }

    /// @ai:intent Discover, execute and report with an already initialized adapter
    /// @ai:effects network, fs:read, fs:write
    pub async fn run_with_adapter(&self, adapter: &dyn ModelAdapter) -> Result<RunReport> {
        let units = self.discover()?;

        if units.is_empty() {
            tracing::warn!(
                "No benchmark units found in {}",
                self.config.paths.benchmarks_dir.display()
            );
        }

        let outcomes = BenchmarkExecutor::new().execute(adapter, &units).await?;
        let results = ResultSet::new(adapter.identifier(), outcomes);

        let paths = ReportGenerator::new().generate_all(&results, &self.config)?;

        let summary = results.summary();
        tracing::info!(
            "Evaluation of {} complete: {} benchmarks, {} failed, mean score {:.1}",
            results.model,
            summary.benchmark_count,
            summary.failed,
            summary.mean_score
        );

        Ok(RunReport { results, paths })
    }
}
