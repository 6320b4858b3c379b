//! @ai:module:intent Prompt/answer benchmark kinds scored by pass rate
//! @ai:module:layer application
//! @ai:module:public_api CaseBenchmark, CaseCheck
//! @ai:module:stateless true

use crate::adapter::ModelAdapter;
use crate::benchmark::manifest::UnitManifest;
use crate::benchmark::Benchmark;
use anyhow::{Context, Result};
use async_trait::async_trait;
use regex::Regex;
use serde::Deserialize;

/// @ai:intent How a single case decides pass or fail
#[derive(Debug, Clone)]
pub enum CaseCheck {
    ExactMatch { expected: String, case_sensitive: bool },
    Contains(String),
    Matches(Regex),
}

impl CaseCheck {
    /// @ai:effects pure
    pub fn passes(&self, output: &str) -> bool {
        match self {
            CaseCheck::ExactMatch {
                expected,
                case_sensitive: true,
            } => output.trim() == expected.trim(),
            CaseCheck::ExactMatch {
                expected,
                case_sensitive: false,
            } => output.trim().to_lowercase() == expected.trim().to_lowercase(),
            CaseCheck::Contains(needle) => output.contains(needle.as_str()),
            CaseCheck::Matches(re) => re.is_match(output),
        }
    }
}

#[derive(Debug, Deserialize)]
struct ExactMatchOptions {
    #[serde(default = "default_case_sensitive")]
    case_sensitive: bool,
}

fn default_case_sensitive() -> bool {
    true
}

#[derive(Debug, Clone)]
struct Case {
    prompt: String,
    check: CaseCheck,
}

/// @ai:intent Runs every case through the adapter and reports the percentage that pass
/// @ai:invariant a failure sentinel counts as a failed case
#[derive(Debug, Clone)]
pub struct CaseBenchmark {
    cases: Vec<Case>,
}

impl CaseBenchmark {
    /// @ai:intent Build from (prompt, check) pairs
    /// @ai:pre cases is not empty
    /// @ai:effects pure
    pub fn new(cases: Vec<(String, CaseCheck)>) -> Result<Self> {
        if cases.is_empty() {
            anyhow::bail!("benchmark has no cases");
        }

        Ok(Self {
            cases: cases
                .into_iter()
                .map(|(prompt, check)| Case { prompt, check })
                .collect(),
        })
    }

    /// @ai:intent `exact_match` kind: trimmed output equals `expected`
    /// @ai:effects pure
    pub fn exact_match(manifest: &UnitManifest) -> Result<Self> {
        let options: ExactMatchOptions = manifest.options()?;

        Self::from_cases(manifest, |case, i| {
            Ok(CaseCheck::ExactMatch {
                expected: case.require(&case.expected, "expected", i)?.to_string(),
                case_sensitive: options.case_sensitive,
            })
        })
    }

    /// @ai:intent `contains` kind: output contains `expected`
    /// @ai:effects pure
    pub fn contains(manifest: &UnitManifest) -> Result<Self> {
        Self::from_cases(manifest, |case, i| {
            Ok(CaseCheck::Contains(
                case.require(&case.expected, "expected", i)?.to_string(),
            ))
        })
    }

    /// @ai:intent `regex` kind: output matches `pattern`
    /// @ai:effects pure
    pub fn regex(manifest: &UnitManifest) -> Result<Self> {
        Self::from_cases(manifest, |case, i| {
            let pattern = case.require(&case.pattern, "pattern", i)?;
            let re = Regex::new(pattern)
                .with_context(|| format!("case {} has an invalid pattern", i + 1))?;
            Ok(CaseCheck::Matches(re))
        })
    }

    fn from_cases<F>(manifest: &UnitManifest, check_for: F) -> Result<Self>
    where
        F: Fn(&crate::benchmark::CaseSpec, usize) -> Result<CaseCheck>,
    {
        let cases = manifest
            .non_empty_cases()?
            .iter()
            .enumerate()
            .map(|(i, case)| Ok((case.prompt.clone(), check_for(case, i)?)))
            .collect::<Result<Vec<_>>>()?;

        Self::new(cases)
    }
}

#[async_trait]
impl Benchmark for CaseBenchmark {
    async fn run_benchmark(&self, adapter: &dyn ModelAdapter) -> Result<f64> {
        let mut passed = 0usize;

        for (i, case) in self.cases.iter().enumerate() {
            let output = adapter
                .generate_solution(&case.prompt)
                .await
                .with_context(|| format!("case {}", i + 1))?;

            match output {
                Some(text) if case.check.passes(&text) => passed += 1,
                Some(_) => {}
                None => tracing::debug!("Case {} got no generation, counted as failed", i + 1),
            }
        }

        Ok(passed as f64 / self.cases.len() as f64 * 100.0)
    }
}
