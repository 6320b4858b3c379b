//! @ai:module:intent Registration table from benchmark kind to factory
//! @ai:module:layer application
//! @ai:module:public_api BenchmarkRegistry, BenchmarkFactory
//! @ai:module:stateless false

use crate::benchmark::builtin::CaseBenchmark;
use crate::benchmark::command::CommandBenchmark;
use crate::benchmark::manifest::UnitManifest;
use crate::benchmark::Benchmark;
use anyhow::Result;
use std::collections::BTreeMap;
use std::path::Path;

/// Builds a benchmark from its manifest and unit directory.
pub type BenchmarkFactory =
    Box<dyn Fn(&UnitManifest, &Path) -> Result<Box<dyn Benchmark>> + Send + Sync>;

/// @ai:intent Kind name -> factory table, populated by explicit registration
///
/// A unit whose manifest omits `kind` is looked up under its own directory
/// name, so registering a kind named after a unit binds that unit directly.
pub struct BenchmarkRegistry {
    factories: BTreeMap<String, BenchmarkFactory>,
}

impl BenchmarkRegistry {
    /// @ai:intent Empty registry
    /// @ai:effects pure
    pub fn new() -> Self {
        Self {
            factories: BTreeMap::new(),
        }
    }

    /// @ai:intent Registry with exact_match, contains, regex and command kinds
    /// @ai:effects pure
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry
            .register("exact_match", build_exact_match)
            .register("contains", build_contains)
            .register("regex", build_regex)
            .register("command", build_command);
        registry
    }

    /// @ai:intent Register or replace a kind
    /// @ai:effects state:write
    pub fn register<F>(&mut self, kind: impl Into<String>, factory: F) -> &mut Self
    where
        F: Fn(&UnitManifest, &Path) -> Result<Box<dyn Benchmark>> + Send + Sync + 'static,
    {
        let kind = kind.into();

        if self.factories.insert(kind.clone(), Box::new(factory)).is_some() {
            tracing::debug!("Replaced benchmark kind {}", kind);
        }
        self
    }

    /// @ai:effects pure
    pub fn contains(&self, kind: &str) -> bool {
        self.factories.contains_key(kind)
    }

    /// @ai:intent Registered kinds in name order
    /// @ai:effects pure
    pub fn kinds(&self) -> impl Iterator<Item = &str> {
        self.factories.keys().map(String::as_str)
    }

    /// @ai:intent Instantiate the benchmark for a unit
    /// @ai:effects fs:read
    pub fn build(&self, kind: &str, manifest: &UnitManifest, unit_dir: &Path) -> Result<Box<dyn Benchmark>> {
        let factory = self
            .factories
            .get(kind)
            .ok_or_else(|| anyhow::anyhow!("unknown benchmark kind `{}`", kind))?;

        factory(manifest, unit_dir)
    }
}

fn build_exact_match(manifest: &UnitManifest, _dir: &Path) -> Result<Box<dyn Benchmark>> {
    Ok(Box::new(CaseBenchmark::exact_match(manifest)?))
}

fn build_contains(manifest: &UnitManifest, _dir: &Path) -> Result<Box<dyn Benchmark>> {
    Ok(Box::new(CaseBenchmark::contains(manifest)?))
}

fn build_regex(manifest: &UnitManifest, _dir: &Path) -> Result<Box<dyn Benchmark>> {
    Ok(Box::new(CaseBenchmark::regex(manifest)?))
}

fn build_command(manifest: &UnitManifest, dir: &Path) -> Result<Box<dyn Benchmark>> {
    Ok(Box::new(CommandBenchmark::from_manifest(manifest, dir)?))
}

impl Default for BenchmarkRegistry {
    fn default() -> Self {
        Self::with_builtins()
    }
}
