//! @ai:module:intent Uniform generation contract over heterogeneous model backends
//! @ai:module:layer infrastructure
//! @ai:module:public_api ModelAdapter, Adapter, LocalAdapter, RemoteChatAdapter, DryRunAdapter, MockAdapter, AdapterResolver
//! @ai:module:stateless false

pub mod fence;
pub mod local;
pub mod rate_limiter;
pub mod remote;
pub mod resolver;

pub use fence::strip_code_fences;
pub use local::LocalAdapter;
pub use rate_limiter::RateLimiter;
pub use remote::{ChatProvider, RemoteChatAdapter};
pub use resolver::{AdapterResolver, ModelFamily};

use crate::error::AdapterError;
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;

/// @ai:intent Capability contract every model backend implements
///
/// `Ok(None)` is the failure sentinel: the backend call failed in a recoverable
/// way and the adapter has already logged it. `Err` means the adapter can no
/// longer be used and the run must stop.
#[async_trait]
pub trait ModelAdapter: Send + Sync {
    /// @ai:intent Model identifier this adapter is bound to
    fn identifier(&self) -> &str;

    /// @ai:intent Generate a solution for one prompt
    /// @ai:effects network | compute
    async fn generate_solution(&self, prompt: &str) -> Result<Option<String>, AdapterError>;
}

/// @ai:intent Closed set of adapter variants produced by the resolver
pub enum Adapter {
    Local(LocalAdapter),
    Remote(RemoteChatAdapter),
    DryRun(DryRunAdapter),
}

impl Adapter {
    /// @ai:intent Short backend label for logs and reports
    /// @ai:effects pure
    pub fn backend(&self) -> &'static str {
        match self {
            Adapter::Local(_) => "local",
            Adapter::Remote(remote) => remote.provider().as_str(),
            Adapter::DryRun(_) => "dry-run",
        }
    }
}

#[async_trait]
impl ModelAdapter for Adapter {
    fn identifier(&self) -> &str {
        match self {
            Adapter::Local(adapter) => adapter.identifier(),
            Adapter::Remote(adapter) => adapter.identifier(),
            Adapter::DryRun(adapter) => adapter.identifier(),
        }
    }

    async fn generate_solution(&self, prompt: &str) -> Result<Option<String>, AdapterError> {
        match self {
            Adapter::Local(adapter) => adapter.generate_solution(prompt).await,
            Adapter::Remote(adapter) => adapter.generate_solution(prompt).await,
            Adapter::DryRun(adapter) => adapter.generate_solution(prompt).await,
        }
    }
}

/// Text every dry-run generation returns.
pub const DRY_RUN_RESPONSE: &str = "[DRY RUN] No model call made";

/// @ai:intent Adapter that makes no backend calls, for validating benchmark wiring
pub struct DryRunAdapter {
    identifier: String,
}

impl DryRunAdapter {
    /// @ai:effects pure
    pub fn new(identifier: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
        }
    }
}

#[async_trait]
impl ModelAdapter for DryRunAdapter {
    fn identifier(&self) -> &str {
        &self.identifier
    }

    async fn generate_solution(&self, _prompt: &str) -> Result<Option<String>, AdapterError> {
        Ok(Some(DRY_RUN_RESPONSE.to_string()))
    }
}

/// @ai:intent Scripted adapter for tests
///
/// Replies are consumed in order; once the script is exhausted every call
/// returns the fallback reply.
pub struct MockAdapter {
    identifier: String,
    script: Mutex<VecDeque<Option<String>>>,
    fallback: Option<String>,
    prompts: Mutex<Vec<String>>,
}

impl MockAdapter {
    /// @ai:intent Create a mock that answers every prompt with the same text
    /// @ai:effects pure
    pub fn new(identifier: impl Into<String>, response: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            script: Mutex::new(VecDeque::new()),
            fallback: Some(response.into()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// @ai:intent Create a mock that replays the given replies, then the failure sentinel
    /// @ai:effects pure
    pub fn scripted(identifier: impl Into<String>, replies: Vec<Option<String>>) -> Self {
        Self {
            identifier: identifier.into(),
            script: Mutex::new(replies.into()),
            fallback: None,
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// @ai:intent Prompts received so far
    /// @ai:effects pure
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().map(|p| p.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl ModelAdapter for MockAdapter {
    fn identifier(&self) -> &str {
        &self.identifier
    }

    async fn generate_solution(&self, prompt: &str) -> Result<Option<String>, AdapterError> {
        if let Ok(mut prompts) = self.prompts.lock() {
            prompts.push(prompt.to_string());
        }

        let next = self
            .script
            .lock()
            .ok()
            .and_then(|mut script| script.pop_front());

        Ok(next.unwrap_or_else(|| self.fallback.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_adapter_replays_script_then_sentinel() {
        let adapter = MockAdapter::scripted(
            "gpt2-small",
            vec![Some("4".to_string()), None, Some("9".to_string())],
        );

        assert_eq!(adapter.generate_solution("a").await.unwrap().as_deref(), Some("4"));
        assert_eq!(adapter.generate_solution("b").await.unwrap(), None);
        assert_eq!(adapter.generate_solution("c").await.unwrap().as_deref(), Some("9"));
        assert_eq!(adapter.generate_solution("d").await.unwrap(), None);
        assert_eq!(adapter.prompts(), vec!["a", "b", "c", "d"]);
    }

    #[tokio::test]
    async fn test_dry_run_variant_dispatch() {
        let adapter = Adapter::DryRun(DryRunAdapter::new("gpt4"));

        assert_eq!(adapter.identifier(), "gpt4");
        assert_eq!(adapter.backend(), "dry-run");
        assert_eq!(
            adapter.generate_solution("prompt").await.unwrap().as_deref(),
            Some(DRY_RUN_RESPONSE)
        );
    }
}
