//! @ai:module:intent JSON report generation
//! @ai:module:layer infrastructure
//! @ai:module:public_api JsonReporter
//! @ai:module:stateless true

use crate::metrics::ResultSet;
use anyhow::Result;
use serde::Serialize;
use std::path::Path;

/// @ai:intent Trait for JSON report generation
pub trait JsonReporterTrait: Send + Sync {
    /// @ai:intent Generate JSON report from results
    fn generate(&self, results: &ResultSet, output_path: &Path) -> Result<()>;
}

/// @ai:intent Generates JSON reports from results
pub struct JsonReporter;

/// Full result set plus the summary, as written to disk.
#[derive(Serialize)]
struct JsonDocument<'a> {
    #[serde(flatten)]
    results: &'a ResultSet,
    summary: crate::metrics::RunSummary,
}

impl JsonReporter {
    /// @ai:intent Create a new JSON reporter
    /// @ai:effects pure
    pub fn new() -> Self {
        Self
    }
}

impl Default for JsonReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl JsonReporterTrait for JsonReporter {
    /// @ai:intent Generate JSON report to file
    /// @ai:effects fs:write
    fn generate(&self, results: &ResultSet, output_path: &Path) -> Result<()> {
        let document = JsonDocument {
            results,
            summary: results.summary(),
        };
        let json = serde_json::to_string_pretty(&document)?;
        std::fs::write(output_path, json)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::BenchmarkOutcome;
    use tempfile::TempDir;

    #[test]
    fn test_generate_json_report() {
        let reporter = JsonReporter::new();
        let temp = TempDir::new().unwrap();
        let output = temp.path().join("results_gpt4.json");

        let mut addition = BenchmarkOutcome::completed("addition", 75.0);
        addition.generations = 4;
        addition.failed_generations = 1;

        let results = ResultSet {
            model: "gpt4".to_string(),
            timestamp: "2026-01-19T00:00:00Z".to_string(),
            outcomes: vec![addition, BenchmarkOutcome::failed("parsing", "missing `expected`")],
        };

        reporter.generate(&results, &output).unwrap();

        let content = std::fs::read_to_string(&output).unwrap();
        let back: ResultSet = serde_json::from_str(&content).unwrap();
        assert_eq!(back, results);

        let value: serde_json::Value = serde_json::from_str(&content).unwrap();
        assert_eq!(value["summary"]["failed"], 1);
        assert_eq!(value["outcomes"][1]["reason"], "missing `expected`");
    }
}
