//! @ai:module:intent Run discovered benchmark units against one shared adapter
//! @ai:module:layer application
//! @ai:module:public_api BenchmarkExecutor
//! @ai:module:stateless true

use crate::adapter::ModelAdapter;
use crate::benchmark::{BenchmarkUnit, UnitState};
use crate::error::{fatal_adapter_error, AdapterError, Result};
use crate::metrics::{BenchmarkOutcome, OutcomeStatus};
use async_trait::async_trait;
use futures::FutureExt;
use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;
use std::time::Instant;

/// @ai:intent Sequential, isolated execution of benchmark units
///
/// A unit that errors, panics or reports a score outside 0..=100 is recorded
/// as failed with score 0 and the run moves on. Only a fatal adapter error
/// stops the run.
pub struct BenchmarkExecutor;

impl BenchmarkExecutor {
    /// @ai:effects pure
    pub fn new() -> Self {
        Self
    }

    /// @ai:intent Invoke every unit once, in order, with the same adapter
    /// @ai:post outcomes.len() == units.len() unless an AdapterError aborts the run
    /// @ai:effects network | compute | fs
    pub async fn execute(
        &self,
        adapter: &dyn ModelAdapter,
        units: &[BenchmarkUnit],
    ) -> Result<Vec<BenchmarkOutcome>> {
        let mut outcomes = Vec::with_capacity(units.len());

        for (i, unit) in units.iter().enumerate() {
            tracing::info!("[{}/{}] Running benchmark {}", i + 1, units.len(), unit.name);

            let outcome = self.execute_unit(adapter, unit).await?;

            match &outcome.status {
                OutcomeStatus::Completed => {
                    tracing::info!("Benchmark {} scored {:.1}", outcome.name, outcome.score)
                }
                OutcomeStatus::Failed { reason } => {
                    tracing::warn!("Benchmark {} failed: {}", outcome.name, reason)
                }
            }

            outcomes.push(outcome);
        }

        Ok(outcomes)
    }

    async fn execute_unit(
        &self,
        adapter: &dyn ModelAdapter,
        unit: &BenchmarkUnit,
    ) -> Result<BenchmarkOutcome> {
        let benchmark = match &unit.state {
            UnitState::Ready(benchmark) => benchmark,
            UnitState::Malformed(reason) => {
                return Ok(BenchmarkOutcome::failed(
                    &unit.name,
                    format!("malformed benchmark: {}", reason),
                ));
            }
        };

        let tracked = TrackedAdapter::new(adapter);
        let start = Instant::now();

        let result = AssertUnwindSafe(benchmark.run_benchmark(&tracked))
            .catch_unwind()
            .await;

        let duration_ms = start.elapsed().as_millis() as u64;

        // The adapter is unusable after a fatal error even if the benchmark swallowed it.
        if let Some(fatal) = tracked.take_fatal() {
            tracing::error!("Benchmark {} hit a fatal adapter error: {}", unit.name, fatal);
            return Err(fatal.into());
        }

        let mut outcome = match result {
            Ok(Ok(score)) if is_valid_score(score) => BenchmarkOutcome::completed(&unit.name, score),
            Ok(Ok(score)) => {
                BenchmarkOutcome::failed(&unit.name, format!("score {} is outside 0..=100", score))
            }
            Ok(Err(e)) => {
                if let Some(fatal) = fatal_adapter_error(&e) {
                    return Err(fatal.clone().into());
                }
                BenchmarkOutcome::failed(&unit.name, format!("{:#}", e))
            }
            Err(payload) => BenchmarkOutcome::failed(
                &unit.name,
                format!("panicked: {}", panic_message(payload.as_ref())),
            ),
        };

        outcome.generations = tracked.generations.load(Ordering::Relaxed);
        outcome.failed_generations = tracked.failed_generations.load(Ordering::Relaxed);
        outcome.duration_ms = duration_ms;

        Ok(outcome)
    }
}

impl Default for BenchmarkExecutor {
    fn default() -> Self {
        Self::new()
    }
}

fn is_valid_score(score: f64) -> bool {
    score.is_finite() && (0.0..=100.0).contains(&score)
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    payload
        .downcast_ref::<&str>()
        .map(|s| s.to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown panic payload".to_string())
}

/// @ai:intent Pass-through adapter that counts calls for one unit
struct TrackedAdapter<'a> {
    inner: &'a dyn ModelAdapter,
    generations: AtomicU32,
    failed_generations: AtomicU32,
    fatal: Mutex<Option<AdapterError>>,
}

impl<'a> TrackedAdapter<'a> {
    fn new(inner: &'a dyn ModelAdapter) -> Self {
        Self {
            inner,
            generations: AtomicU32::new(0),
            failed_generations: AtomicU32::new(0),
            fatal: Mutex::new(None),
        }
    }

    fn take_fatal(&self) -> Option<AdapterError> {
        self.fatal.lock().ok().and_then(|mut fatal| fatal.take())
    }
}

#[async_trait]
impl<'a> ModelAdapter for TrackedAdapter<'a> {
    fn identifier(&self) -> &str {
        self.inner.identifier()
    }

    async fn generate_solution(&self, prompt: &str) -> std::result::Result<Option<String>, AdapterError> {
        self.generations.fetch_add(1, Ordering::Relaxed);

        let result = self.inner.generate_solution(prompt).await;

        match &result {
            Ok(None) => {
                self.failed_generations.fetch_add(1, Ordering::Relaxed);
            }
            Err(e) => {
                if let Ok(mut fatal) = self.fatal.lock() {
                    fatal.get_or_insert_with(|| e.clone());
                }
            }
            Ok(Some(_)) => {}
        }

        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::MockAdapter;
    use crate::benchmark::Benchmark;
    use crate::error::HarnessError;
    use pretty_assertions::assert_eq;
    use std::sync::atomic::AtomicUsize;
    use std::sync::Arc;

    struct Fixed(f64);

    #[async_trait]
    impl Benchmark for Fixed {
        async fn run_benchmark(&self, _adapter: &dyn ModelAdapter) -> anyhow::Result<f64> {
            Ok(self.0)
        }
    }

    struct Failing;

    #[async_trait]
    impl Benchmark for Failing {
        async fn run_benchmark(&self, _adapter: &dyn ModelAdapter) -> anyhow::Result<f64> {
            anyhow::bail!("could not parse expected output")
        }
    }

    struct Panicking;

    #[async_trait]
    impl Benchmark for Panicking {
        async fn run_benchmark(&self, _adapter: &dyn ModelAdapter) -> anyhow::Result<f64> {
            panic!("index out of bounds")
        }
    }

    /// Asks `n` prompts and scores the share of non-sentinel replies.
    struct Asking(u32);

    #[async_trait]
    impl Benchmark for Asking {
        async fn run_benchmark(&self, adapter: &dyn ModelAdapter) -> anyhow::Result<f64> {
            let mut answered = 0;
            for i in 0..self.0 {
                if adapter.generate_solution(&format!("prompt {}", i)).await?.is_some() {
                    answered += 1;
                }
            }
            Ok(answered as f64 / self.0 as f64 * 100.0)
        }
    }

    struct Counting(Arc<AtomicUsize>);

    #[async_trait]
    impl Benchmark for Counting {
        async fn run_benchmark(&self, _adapter: &dyn ModelAdapter) -> anyhow::Result<f64> {
            self.0.fetch_add(1, Ordering::SeqCst);
            Ok(100.0)
        }
    }

    struct Broken;

    #[async_trait]
    impl ModelAdapter for Broken {
        fn identifier(&self) -> &str {
            "gpt2"
        }

        async fn generate_solution(&self, _prompt: &str) -> std::result::Result<Option<String>, AdapterError> {
            Err(AdapterError::Backend {
                model: "gpt2".to_string(),
                message: "CUDA out of memory".to_string(),
            })
        }
    }

    /// Swallows adapter errors instead of propagating them.
    struct Swallowing;

    #[async_trait]
    impl Benchmark for Swallowing {
        async fn run_benchmark(&self, adapter: &dyn ModelAdapter) -> anyhow::Result<f64> {
            let _ = adapter.generate_solution("prompt").await;
            Ok(0.0)
        }
    }

    fn unit(name: &str, benchmark: impl Benchmark + 'static) -> BenchmarkUnit {
        BenchmarkUnit::ready(name, Box::new(benchmark))
    }

    fn scores(outcomes: &[BenchmarkOutcome]) -> Vec<(&str, f64, bool)> {
        outcomes
            .iter()
            .map(|o| (o.name.as_str(), o.score, o.is_failed()))
            .collect()
    }

    #[tokio::test]
    async fn test_failing_unit_is_isolated() {
        let adapter = MockAdapter::new("gpt2-small", "4");
        let units = vec![unit("addition", Fixed(100.0)), unit("parsing", Failing)];

        let outcomes = BenchmarkExecutor::new().execute(&adapter, &units).await.unwrap();

        assert_eq!(
            scores(&outcomes),
            vec![("addition", 100.0, false), ("parsing", 0.0, true)]
        );
        assert!(outcomes[1]
            .failure_reason()
            .unwrap()
            .contains("could not parse expected output"));
    }

    #[tokio::test]
    async fn test_panic_is_recorded_as_failure() {
        let adapter = MockAdapter::new("gpt2", "");
        let units = vec![unit("a", Panicking), unit("b", Fixed(42.5))];

        let outcomes = BenchmarkExecutor::new().execute(&adapter, &units).await.unwrap();

        assert_eq!(scores(&outcomes), vec![("a", 0.0, true), ("b", 42.5, false)]);
        assert_eq!(outcomes[0].failure_reason(), Some("panicked: index out of bounds"));
    }

    #[tokio::test]
    async fn test_out_of_range_scores_are_rejected() {
        let adapter = MockAdapter::new("gpt2", "");
        let units = vec![
            unit("over", Fixed(150.0)),
            unit("under", Fixed(-1.0)),
            unit("nan", Fixed(f64::NAN)),
            unit("edge", Fixed(0.0)),
        ];

        let outcomes = BenchmarkExecutor::new().execute(&adapter, &units).await.unwrap();

        assert_eq!(
            scores(&outcomes),
            vec![
                ("over", 0.0, true),
                ("under", 0.0, true),
                ("nan", 0.0, true),
                ("edge", 0.0, false),
            ]
        );
    }

    #[tokio::test]
    async fn test_malformed_unit_is_not_invoked() {
        let adapter = MockAdapter::new("gpt2", "");
        let units = vec![
            BenchmarkUnit::malformed("broken", "missing benchmark.toml"),
            unit("ok", Fixed(100.0)),
        ];

        let outcomes = BenchmarkExecutor::new().execute(&adapter, &units).await.unwrap();

        assert_eq!(scores(&outcomes), vec![("broken", 0.0, true), ("ok", 100.0, false)]);
        assert_eq!(
            outcomes[0].failure_reason(),
            Some("malformed benchmark: missing benchmark.toml")
        );
        assert!(adapter.prompts().is_empty());
    }

    #[tokio::test]
    async fn test_generations_are_counted_per_unit() {
        let adapter = MockAdapter::scripted(
            "gpt4",
            vec![Some("a".to_string()), None, Some("b".to_string()), Some("c".to_string())],
        );
        let units = vec![unit("first", Asking(2)), unit("second", Asking(2))];

        let outcomes = BenchmarkExecutor::new().execute(&adapter, &units).await.unwrap();

        let counts: Vec<_> = outcomes
            .iter()
            .map(|o| (o.generations, o.failed_generations, o.score))
            .collect();
        assert_eq!(counts, vec![(2, 1, 50.0), (2, 0, 100.0)]);
    }

    #[tokio::test]
    async fn test_fatal_adapter_error_aborts_run() {
        let later = Arc::new(AtomicUsize::new(0));
        let units = vec![unit("first", Asking(1)), unit("second", Counting(later.clone()))];

        let err = BenchmarkExecutor::new().execute(&Broken, &units).await.unwrap_err();

        assert!(matches!(err, HarnessError::Adapter(AdapterError::Backend { .. })));
        assert_eq!(later.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_swallowed_fatal_error_still_aborts() {
        let units = vec![unit("quiet", Swallowing)];

        let err = BenchmarkExecutor::new().execute(&Broken, &units).await.unwrap_err();
        assert!(err.to_string().contains("CUDA out of memory"));
    }

    #[tokio::test]
    async fn test_empty_unit_list() {
        let adapter = MockAdapter::new("gpt2", "");
        let outcomes = BenchmarkExecutor::new().execute(&adapter, &[]).await.unwrap();
        assert!(outcomes.is_empty());
    }
}
