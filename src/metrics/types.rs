//! @ai:module:intent Result types for one evaluation run
//! @ai:module:layer domain
//! @ai:module:public_api BenchmarkOutcome, OutcomeStatus, ResultSet, RunSummary
//! @ai:module:stateless true

use serde::{Deserialize, Serialize};

/// @ai:intent Whether a unit produced a score of its own
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum OutcomeStatus {
    Completed,
    Failed { reason: String },
}

/// @ai:intent Score and bookkeeping for a single benchmark unit
/// @ai:invariant score is finite and within 0..=100; failed outcomes score 0
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BenchmarkOutcome {
    pub name: String,
    pub score: f64,
    #[serde(flatten)]
    pub status: OutcomeStatus,
    /// Generations the unit requested from the adapter
    pub generations: u32,
    /// Generations that came back as the failure sentinel
    pub failed_generations: u32,
    pub duration_ms: u64,
}

impl BenchmarkOutcome {
    /// @ai:effects pure
    pub fn completed(name: impl Into<String>, score: f64) -> Self {
        Self {
            name: name.into(),
            score,
            status: OutcomeStatus::Completed,
            generations: 0,
            failed_generations: 0,
            duration_ms: 0,
        }
    }

    /// @ai:effects pure
    pub fn failed(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            score: 0.0,
            status: OutcomeStatus::Failed {
                reason: reason.into(),
            },
            generations: 0,
            failed_generations: 0,
            duration_ms: 0,
        }
    }

    /// @ai:effects pure
    pub fn is_failed(&self) -> bool {
        matches!(self.status, OutcomeStatus::Failed { .. })
    }

    /// @ai:effects pure
    pub fn failure_reason(&self) -> Option<&str> {
        match &self.status {
            OutcomeStatus::Completed => None,
            OutcomeStatus::Failed { reason } => Some(reason),
        }
    }
}

/// @ai:intent Ordered, write-once record of a run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultSet {
    pub model: String,
    pub timestamp: String,
    pub outcomes: Vec<BenchmarkOutcome>,
}

impl ResultSet {
    /// @ai:intent Stamp outcomes with the current time
    /// @ai:effects time
    pub fn new(model: impl Into<String>, outcomes: Vec<BenchmarkOutcome>) -> Self {
        Self {
            model: model.into(),
            timestamp: chrono::Utc::now().to_rfc3339(),
            outcomes,
        }
    }

    /// @ai:intent (name, score) rows in execution order
    /// @ai:effects pure
    pub fn rows(&self) -> impl Iterator<Item = (&str, f64)> + '_ {
        self.outcomes.iter().map(|o| (o.name.as_str(), o.score))
    }

    /// @ai:effects pure
    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    /// @ai:effects pure
    pub fn summary(&self) -> RunSummary {
        crate::metrics::aggregator::summarize(&self.outcomes)
    }
}

/// @ai:intent Headline numbers for a run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    pub benchmark_count: usize,
    pub completed: usize,
    pub failed: usize,
    /// Mean over every unit, failed units included at 0
    pub mean_score: f64,
    pub generations: u32,
    pub failed_generations: u32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_failed_outcome_scores_zero() {
        let outcome = BenchmarkOutcome::failed("parsing", "boom");
        assert_eq!(outcome.score, 0.0);
        assert!(outcome.is_failed());
        assert_eq!(outcome.failure_reason(), Some("boom"));
    }

    #[test]
    fn test_rows_keep_order() {
        let results = ResultSet::new(
            "gpt2",
            vec![
                BenchmarkOutcome::completed("addition", 100.0),
                BenchmarkOutcome::failed("parsing", "boom"),
            ],
        );

        let rows: Vec<_> = results.rows().collect();
        assert_eq!(rows, vec![("addition", 100.0), ("parsing", 0.0)]);
    }

    #[test]
    fn test_timestamp_is_rfc3339() {
        let results = ResultSet::new("gpt2", vec![]);
        assert!(chrono::DateTime::parse_from_rfc3339(&results.timestamp).is_ok());
    }

    #[test]
    fn test_status_serializes_inline() {
        let json = serde_json::to_value(BenchmarkOutcome::failed("parsing", "boom")).unwrap();
        assert_eq!(json["status"], "failed");
        assert_eq!(json["reason"], "boom");

        let back: BenchmarkOutcome = serde_json::from_value(json).unwrap();
        assert_eq!(back.failure_reason(), Some("boom"));
    }
}
