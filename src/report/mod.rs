//! @ai:module:intent Report generation for evaluation results
//! @ai:module:layer infrastructure
//! @ai:module:public_api ReportGenerator, ReportPaths, CsvReporter, JsonReporter, MarkdownReporter, ChartGenerator, parse_csv

pub mod charts;
pub mod csv_report;
pub mod json_report;
pub mod markdown_report;

pub use charts::{ChartGenerator, ChartGeneratorTrait};
pub use csv_report::{parse_csv, CsvReport, CsvReporter, CsvReporterTrait, CSV_HEADER};
pub use json_report::{JsonReporter, JsonReporterTrait};
pub use markdown_report::{MarkdownReporter, MarkdownReporterTrait};

use crate::config::HarnessConfig;
use crate::metrics::ResultSet;
use anyhow::{Context, Result};
use std::path::PathBuf;

/// @ai:intent Files written for one run
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReportPaths {
    pub csv: PathBuf,
    pub json: Option<PathBuf>,
    pub markdown: Option<PathBuf>,
    pub chart: Option<PathBuf>,
}

/// @ai:intent Combined report generator
pub struct ReportGenerator {
    csv: CsvReporter,
    json: JsonReporter,
    markdown: MarkdownReporter,
    charts: ChartGenerator,
}

impl ReportGenerator {
    /// @ai:intent Create a new report generator
    /// @ai:effects pure
    pub fn new() -> Self {
        Self {
            csv: CsvReporter::new(),
            json: JsonReporter::new(),
            markdown: MarkdownReporter::new(),
            charts: ChartGenerator::new(),
        }
    }

    /// @ai:intent Write the CSV, then every enabled auxiliary report
    /// @ai:post the CSV exists whenever this returns Ok
    /// @ai:effects fs:write
    pub fn generate_all(&self, results: &ResultSet, config: &HarnessConfig) -> Result<ReportPaths> {
        let output_dir = config.paths.results_dir.as_path();
        std::fs::create_dir_all(output_dir)
            .with_context(|| format!("Failed to create {}", output_dir.display()))?;

        let stem = format!("results_{}", sanitize_model_id(&results.model));
        let path_for = |ext: &str| output_dir.join(format!("{}.{}", stem, ext));

        let mut paths = ReportPaths {
            csv: path_for("csv"),
            ..Default::default()
        };

        self.csv.generate(results, &paths.csv)?;

        if config.report.json {
            let path = path_for("json");
            self.json.generate(results, &path)?;
            paths.json = Some(path);
        }

        if config.report.markdown {
            let path = path_for("md");
            self.markdown.generate(results, &path)?;
            paths.markdown = Some(path);
        }

        if config.report.chart {
            let path = path_for("png");
            match self.charts.generate(results, &path) {
                Ok(()) => paths.chart = Some(path),
                Err(e) => tracing::warn!("Skipping chart {}: {:#}", path.display(), e),
            }
        }

        tracing::info!("Reports generated in {}", output_dir.display());
        Ok(paths)
    }
}

impl Default for ReportGenerator {
    fn default() -> Self {
        Self::new()
    }
}

/// @ai:intent Map a model identifier onto a portable file-name fragment
/// @ai:effects pure
pub fn sanitize_model_id(model: &str) -> String {
    let sanitized: String = model
        .chars()
        .map(|c| match c {
            'a'..='z' | 'A'..='Z' | '0'..='9' | '-' | '_' | '.' => c,
            _ => '_',
        })
        .collect();

    if sanitized.is_empty() || sanitized.chars().all(|c| c == '.') {
        "_".repeat(sanitized.len().max(1))
    } else {
        sanitized
    }
}
