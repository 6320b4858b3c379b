//! @ai:module:intent Adapter for a model hosted by a local inference runtime
//! @ai:module:layer infrastructure
//! @ai:module:public_api LocalAdapter
//! @ai:module:stateless false

use crate::adapter::ModelAdapter;
use crate::config::LocalConfig;
use crate::error::AdapterError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

const BACKEND: &str = "local";

#[derive(Debug, Serialize)]
struct ShowRequest<'a> {
    model: &'a str,
}

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
    /// -1 keeps the weights resident until the runtime is stopped
    keep_alive: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    options: Option<GenerateOptions>,
}

#[derive(Debug, Serialize)]
struct GenerateOptions {
    temperature: f32,
    seed: u64,
    num_predict: u32,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    response: String,
    #[serde(default)]
    eval_count: u32,
    #[serde(default)]
    eval_duration: u64,
}

/// @ai:intent Adapter bound to one locally hosted model
///
/// Weights live inside the local runtime; the adapter checks they exist and
/// loads them during construction. Any failure while generating means the
/// runtime is in a bad state (out of memory, crashed, hung) and is fatal.
pub struct LocalAdapter {
    identifier: String,
    runtime_tag: String,
    endpoint: String,
    client: reqwest::Client,
    options: GenerateOptionsConfig,
}

#[derive(Debug, Clone, Copy)]
struct GenerateOptionsConfig {
    seed: u64,
    max_tokens: u32,
}

impl LocalAdapter {
    /// @ai:intent Connect to the runtime, verify the weights exist and load them
    /// @ai:effects network, compute
    pub async fn load(identifier: &str, config: &LocalConfig) -> Result<Self, AdapterError> {
        let runtime_tag = config.runtime_tag(identifier).to_string();
        let endpoint = config.endpoint.trim_end_matches('/').to_string();

        let init_err = |message: String| AdapterError::Init {
            model: identifier.to_string(),
            backend: BACKEND,
            message,
        };

        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| init_err(e.to_string()))?;

        tracing::info!("Checking local runtime at {} for {}", endpoint, runtime_tag);

        let show = client
            .post(format!("{}/api/show", endpoint))
            .json(&ShowRequest { model: &runtime_tag })
            .send()
            .await
            .map_err(|e| init_err(format!("local runtime unreachable at {}: {}", endpoint, e)))?;

        if show.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(init_err(format!(
                "weights for '{}' are not available locally",
                runtime_tag
            )));
        }

        if !show.status().is_success() {
            let status = show.status();
            let body = show.text().await.unwrap_or_default();
            return Err(init_err(format!("model lookup failed ({}): {}", status, body)));
        }

        let warmup = client
            .post(format!("{}/api/generate", endpoint))
            .json(&GenerateRequest {
                model: &runtime_tag,
                prompt: "",
                stream: false,
                keep_alive: -1,
                options: None,
            })
            .send()
            .await
            .map_err(|e| init_err(format!("failed to load weights: {}", e)))?;

        if !warmup.status().is_success() {
            let status = warmup.status();
            let body = warmup.text().await.unwrap_or_default();
            return Err(init_err(format!("failed to load weights ({}): {}", status, body)));
        }

        tracing::info!("Local adapter ready: {} -> {}", identifier, runtime_tag);

        Ok(Self {
            identifier: identifier.to_string(),
            runtime_tag,
            endpoint,
            client,
            options: GenerateOptionsConfig {
                seed: config.seed,
                max_tokens: config.max_tokens,
            },
        })
    }

    /// @ai:effects pure
    pub fn runtime_tag(&self) -> &str {
        &self.runtime_tag
    }

    fn backend_err(&self, message: String) -> AdapterError {
        AdapterError::Backend {
            model: self.identifier.clone(),
            message,
        }
    }
}

#[async_trait]
impl ModelAdapter for LocalAdapter {
    fn identifier(&self) -> &str {
        &self.identifier
    }

    /// @ai:intent One greedy, seeded generation pass on the local runtime
    /// @ai:effects compute
    async fn generate_solution(&self, prompt: &str) -> Result<Option<String>, AdapterError> {
        let request = GenerateRequest {
            model: &self.runtime_tag,
            prompt,
            stream: false,
            keep_alive: -1,
            options: Some(GenerateOptions {
                temperature: 0.0,
                seed: self.options.seed,
                num_predict: self.options.max_tokens,
            }),
        };

        let response = self
            .client
            .post(format!("{}/api/generate", self.endpoint))
            .json(&request)
            .send()
            .await
            .map_err(|e| self.backend_err(e.to_string()))?;

        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(self.backend_err(format!("generation failed ({}): {}", status, body)));
        }

        let body: GenerateResponse = response
            .json()
            .await
            .map_err(|e| self.backend_err(format!("undecodable generation: {}", e)))?;

        tracing::debug!(
            "{}: {} tokens in {}ms",
            self.runtime_tag,
            body.eval_count,
            body.eval_duration / 1_000_000
        );

        Ok(Some(body.response))
    }
}
