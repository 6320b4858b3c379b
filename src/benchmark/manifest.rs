//! @ai:module:intent benchmark.toml manifest describing one benchmark unit
//! @ai:module:layer domain
//! @ai:module:public_api UnitManifest, BenchmarkSection, CaseSpec, MANIFEST_FILE
//! @ai:module:stateless true

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// File every benchmark unit directory must contain.
pub const MANIFEST_FILE: &str = "benchmark.toml";

/// @ai:intent Parsed benchmark.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UnitManifest {
    #[serde(default)]
    pub benchmark: BenchmarkSection,
    #[serde(default)]
    pub cases: Vec<CaseSpec>,
}

/// @ai:intent [benchmark] table
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BenchmarkSection {
    /// Registered kind; the unit's directory name when omitted
    pub kind: Option<String>,
    pub description: Option<String>,
    /// Kind-specific settings, decoded by the kind's factory
    #[serde(default)]
    pub options: toml::Table,
}

/// @ai:intent One [[cases]] entry
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CaseSpec {
    pub prompt: String,
    pub expected: Option<String>,
    pub pattern: Option<String>,
    pub test: Option<String>,
}

impl UnitManifest {
    /// @ai:intent Read and parse the manifest inside a unit directory
    /// @ai:effects fs:read
    pub fn load(unit_dir: &Path) -> Result<Self> {
        let path = unit_dir.join(MANIFEST_FILE);

        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display()))?;

        toml::from_str(&content).with_context(|| format!("Failed to parse {}", path.display()))
    }

    /// @ai:intent Kind this unit is bound to
    /// @ai:effects pure
    pub fn kind_or<'a>(&'a self, unit_name: &'a str) -> &'a str {
        self.benchmark.kind.as_deref().unwrap_or(unit_name)
    }

    /// @ai:intent Decode the options table into a kind's settings type
    /// @ai:effects pure
    pub fn options<T: DeserializeOwned>(&self) -> Result<T> {
        toml::Value::Table(self.benchmark.options.clone())
            .try_into::<T>()
            .context("Invalid [benchmark.options]")
    }

    /// @ai:intent Require at least one case
    /// @ai:effects pure
    pub fn non_empty_cases(&self) -> Result<&[CaseSpec]> {
        if self.cases.is_empty() {
            anyhow::bail!("benchmark has no [[cases]]");
        }
        Ok(&self.cases)
    }
}

impl CaseSpec {
    /// @ai:intent Fetch a field a kind requires, naming the case when it is missing
    /// @ai:effects pure
    pub fn require<'a>(&'a self, field: &'a Option<String>, name: &str, index: usize) -> Result<&'a str> {
        field
            .as_deref()
            .with_context(|| format!("case {} is missing `{}`", index + 1, name))
    }
}
