//! @ai:module:intent Reduce per-unit outcomes to a run summary
//! @ai:module:layer application
//! @ai:module:public_api summarize
//! @ai:module:stateless true

use crate::metrics::types::{BenchmarkOutcome, RunSummary};

/// @ai:intent Calculate average of an iterator of f64
/// @ai:effects pure
fn average<I: Iterator<Item = f64>>(iter: I) -> f64 {
    let (sum, count) = iter.fold((0.0, 0u32), |(s, c), v| (s + v, c + 1));

    if count == 0 {
        0.0
    } else {
        sum / count as f64
    }
}

/// @ai:intent Counts and mean score over all outcomes
/// @ai:effects pure
pub fn summarize(outcomes: &[BenchmarkOutcome]) -> RunSummary {
    let failed = outcomes.iter().filter(|o| o.is_failed()).count();

    RunSummary {
        benchmark_count: outcomes.len(),
        completed: outcomes.len() - failed,
        failed,
        mean_score: average(outcomes.iter().map(|o| o.score)),
        generations: outcomes.iter().map(|o| o.generations).sum(),
        failed_generations: outcomes.iter().map(|o| o.failed_generations).sum(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_average() {
        assert_eq!(average(vec![1.0, 2.0, 3.0].into_iter()), 2.0);
        assert_eq!(average(std::iter::empty()), 0.0);
    }

    #[test]
    fn test_summarize_counts_failed_units_at_zero() {
        let mut addition = BenchmarkOutcome::completed("addition", 100.0);
        addition.generations = 4;
        addition.failed_generations = 1;
        let mut strings = BenchmarkOutcome::completed("strings", 50.0);
        strings.generations = 2;

        let summary = summarize(&[
            addition,
            strings,
            BenchmarkOutcome::failed("parsing", "boom"),
        ]);

        assert_eq!(
            summary,
            RunSummary {
                benchmark_count: 3,
                completed: 2,
                failed: 1,
                mean_score: 50.0,
                generations: 6,
                failed_generations: 1,
            }
        );
    }

    #[test]
    fn test_empty_run() {
        assert_eq!(summarize(&[]), RunSummary::default());
    }
}
