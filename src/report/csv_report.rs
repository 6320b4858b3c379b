//! @ai:module:intent The tabular results artifact: one row per benchmark unit
//! @ai:module:layer infrastructure
//! @ai:module:public_api CsvReporter, CsvReport, parse_csv, CSV_HEADER
//! @ai:module:stateless true

use crate::metrics::ResultSet;
use anyhow::{Context, Result};
use std::path::Path;

pub const CSV_HEADER: [&str; 2] = ["Benchmark", "Score out of 100"];

/// @ai:intent Trait for CSV report generation
pub trait CsvReporterTrait: Send + Sync {
    /// @ai:intent Write the results table to a file
    fn generate(&self, results: &ResultSet, output_path: &Path) -> Result<()>;
}

/// @ai:intent Writes `Benchmark,Score out of 100` tables
pub struct CsvReporter;

impl CsvReporter {
    /// @ai:effects pure
    pub fn new() -> Self {
        Self
    }

    /// @ai:intent Render rows in execution order
    /// @ai:effects pure
    pub fn render(results: &ResultSet) -> String {
        let mut output = format!("{},{}\n", CSV_HEADER[0], CSV_HEADER[1]);

        for (name, score) in results.rows() {
            output.push_str(&escape_field(name));
            output.push(',');
            output.push_str(&format_score(score));
            output.push('\n');
        }

        output
    }
}

impl Default for CsvReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl CsvReporterTrait for CsvReporter {
    /// @ai:effects fs:write
    fn generate(&self, results: &ResultSet, output_path: &Path) -> Result<()> {
        std::fs::write(output_path, Self::render(results))
            .with_context(|| format!("Failed to write {}", output_path.display()))?;
        Ok(())
    }
}

/// Shortest decimal form that parses back to the same value.
fn format_score(score: f64) -> String {
    let score = if score == 0.0 { 0.0 } else { score };
    format!("{}", score)
}

fn escape_field(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

/// @ai:intent A CSV report read back from disk
#[derive(Debug, Clone, PartialEq)]
pub struct CsvReport {
    pub header: Vec<String>,
    pub rows: Vec<(String, f64)>,
}

/// @ai:intent Parse a results table written by CsvReporter
/// @ai:effects pure
pub fn parse_csv(content: &str) -> Result<CsvReport> {
    let mut records = parse_records(content)?.into_iter();

    let header = records.next().context("CSV report is empty")?;
    if header.len() != CSV_HEADER.len() {
        anyhow::bail!("CSV header has {} columns, expected 2", header.len());
    }

    let rows = records
        .enumerate()
        .map(|(i, record)| match <[String; 2]>::try_from(record) {
            Ok([name, score]) => {
                let score = score
                    .parse::<f64>()
                    .with_context(|| format!("row {} has an invalid score `{}`", i + 1, score))?;
                Ok((name, score))
            }
            Err(record) => anyhow::bail!("row {} has {} columns, expected 2", i + 1, record.len()),
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(CsvReport { header, rows })
}

fn parse_records(content: &str) -> Result<Vec<Vec<String>>> {
    let mut records = Vec::new();
    let mut record = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut chars = content.chars().peekable();

    while let Some(c) = chars.next() {
        if in_quotes {
            match c {
                '"' if chars.peek() == Some(&'"') => {
                    chars.next();
                    field.push('"');
                }
                '"' => in_quotes = false,
                _ => field.push(c),
            }
            continue;
        }

        match c {
            '"' if field.is_empty() => in_quotes = true,
            ',' => record.push(std::mem::take(&mut field)),
            '\r' if chars.peek() == Some(&'\n') => {}
            '\n' => {
                record.push(std::mem::take(&mut field));
                records.push(std::mem::take(&mut record));
            }
            _ => field.push(c),
        }
    }

    if in_quotes {
        anyhow::bail!("unterminated quoted field");
    }

    if !field.is_empty() || !record.is_empty() {
        record.push(field);
        records.push(record);
    }

    Ok(records)
}
