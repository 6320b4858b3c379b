//! @ai:module:intent Markdown report generation
//! @ai:module:layer infrastructure
//! @ai:module:public_api MarkdownReporter
//! @ai:module:stateless true

use crate::metrics::{OutcomeStatus, ResultSet};
use anyhow::Result;
use std::fmt::Write as FmtWrite;
use std::path::Path;

/// @ai:intent Trait for Markdown report generation
pub trait MarkdownReporterTrait: Send + Sync {
    /// @ai:intent Generate Markdown report from results
    fn generate(&self, results: &ResultSet, output_path: &Path) -> Result<()>;
}

/// @ai:intent Generates Markdown reports from results
pub struct MarkdownReporter;

impl MarkdownReporter {
    /// @ai:intent Create a new Markdown reporter
    /// @ai:effects pure
    pub fn new() -> Self {
        Self
    }

    /// @ai:intent Keep table cells on one line and free of column breaks
    /// @ai:effects pure
    fn escape_cell(text: &str) -> String {
        text.replace('|', "\\|").replace(['\r', '\n'], " ")
    }

    /// @ai:intent Generate overall summary section
    /// @ai:effects pure
    fn generate_summary(results: &ResultSet) -> String {
        let summary = results.summary();
        let mut output = String::new();

        writeln!(output, "# Evaluation Results").unwrap();
        writeln!(output).unwrap();
        writeln!(output, "**Date:** {}", results.timestamp).unwrap();
        writeln!(output, "**Model:** {}", results.model).unwrap();
        writeln!(output).unwrap();
        writeln!(output, "## Summary").unwrap();
        writeln!(output).unwrap();
        writeln!(output, "| Metric | Value |").unwrap();
        writeln!(output, "|--------|-------|").unwrap();
        writeln!(output, "| Benchmarks | {} |", summary.benchmark_count).unwrap();
        writeln!(output, "| Completed | {} |", summary.completed).unwrap();
        writeln!(output, "| Failed | {} |", summary.failed).unwrap();
        writeln!(output, "| Mean Score | {:.1} |", summary.mean_score).unwrap();
        writeln!(output, "| Generations | {} |", summary.generations).unwrap();
        writeln!(output, "| Failed Generations | {} |", summary.failed_generations).unwrap();
        writeln!(output).unwrap();

        output
    }

    /// @ai:intent Generate per-benchmark table
    /// @ai:effects pure
    fn generate_benchmark_table(results: &ResultSet) -> String {
        let mut output = String::new();

        writeln!(output, "## Benchmarks").unwrap();
        writeln!(output).unwrap();

        if results.is_empty() {
            writeln!(output, "No benchmarks were found.").unwrap();
            writeln!(output).unwrap();
            return output;
        }

        writeln!(
            output,
            "| Benchmark | Score | Status | Generations | Failed Generations | Duration |"
        )
        .unwrap();
        writeln!(output, "|-----------|-------|--------|-------------|--------------------|----------|").unwrap();

        for outcome in &results.outcomes {
            let status = match &outcome.status {
                OutcomeStatus::Completed => "completed".to_string(),
                OutcomeStatus::Failed { reason } => format!("failed: {}", Self::escape_cell(reason)),
            };

            writeln!(
                output,
                "| {} | {:.1} | {} | {} | {} | {}ms |",
                Self::escape_cell(&outcome.name),
                outcome.score,
                status,
                outcome.generations,
                outcome.failed_generations,
                outcome.duration_ms
            )
            .unwrap();
        }

        writeln!(output).unwrap();
        output
    }
}

impl Default for MarkdownReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl MarkdownReporterTrait for MarkdownReporter {
    /// @ai:intent Generate Markdown report to file
    /// @ai:effects fs:write
    fn generate(&self, results: &ResultSet, output_path: &Path) -> Result<()> {
        let mut content = String::new();

        content.push_str(&Self::generate_summary(results));
        content.push_str(&Self::generate_benchmark_table(results));

        std::fs::write(output_path, content)?;
        Ok(())
    }
}
