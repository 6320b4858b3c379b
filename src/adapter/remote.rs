//! @ai:module:intent Remote chat-completion adapter (OpenAI and Anthropic style APIs)
//! @ai:module:layer infrastructure
//! @ai:module:public_api RemoteChatAdapter, ChatProvider
//! @ai:module:stateless false

use crate::adapter::fence::strip_code_fences;
use crate::adapter::rate_limiter::{retry_after, RateLimiter};
use crate::adapter::ModelAdapter;
use crate::config::RemoteConfig;
use crate::error::AdapterError;
use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// @ai:intent Wire protocol spoken by the remote endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatProvider {
    OpenAi,
    Anthropic,
}

impl ChatProvider {
    /// @ai:effects pure
    pub fn as_str(&self) -> &'static str {
        match self {
            ChatProvider::OpenAi => "openai",
            ChatProvider::Anthropic => "anthropic",
        }
    }

    /// @ai:intent Environment variable holding the API key
    /// @ai:effects pure
    pub fn credential_variable(&self) -> &'static str {
        match self {
            ChatProvider::OpenAi => "OPENAI_API_KEY",
            ChatProvider::Anthropic => "ANTHROPIC_API_KEY",
        }
    }

    /// @ai:intent Look up the API key through `lookup`; blank values count as missing
    /// @ai:effects pure
    pub fn credential<F>(&self, lookup: F) -> Result<String, AdapterError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let variable = self.credential_variable();

        lookup(variable)
            .filter(|key| !key.trim().is_empty())
            .ok_or(AdapterError::MissingCredential { variable })
    }

    /// @ai:effects pure
    fn endpoint<'a>(&self, config: &'a RemoteConfig) -> &'a str {
        match self {
            ChatProvider::OpenAi => &config.openai_endpoint,
            ChatProvider::Anthropic => &config.anthropic_endpoint,
        }
    }
}

#[derive(Debug, Serialize)]
struct Message<'a> {
    role: &'static str,
    content: &'a str,
}

/// @ai:intent OpenAI chat completion request body
#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    temperature: f32,
    messages: Vec<Message<'a>>,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

/// @ai:intent Anthropic messages request body
#[derive(Debug, Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    temperature: f32,
    messages: Vec<Message<'a>>,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    #[serde(default)]
    content: Vec<ContentBlock>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(default)]
    text: Option<String>,
}

/// @ai:intent Adapter bound to one remote chat model
/// @ai:invariant generate_solution never returns Err; every failure becomes the sentinel
pub struct RemoteChatAdapter {
    identifier: String,
    api_model: String,
    provider: ChatProvider,
    client: reqwest::Client,
    config: RemoteConfig,
    rate_limiter: RateLimiter,
    api_key: String,
}

impl RemoteChatAdapter {
    /// @ai:intent Create an adapter, reading the provider credential from the environment
    /// @ai:pre the provider's API key variable is set
    /// @ai:effects env
    pub fn new(
        identifier: &str,
        api_model: &str,
        provider: ChatProvider,
        config: RemoteConfig,
    ) -> Result<Self, AdapterError> {
        let api_key = provider.credential(|variable| std::env::var(variable).ok())?;

        Self::with_api_key(identifier, api_model, provider, config, api_key)
    }

    /// @ai:intent Create an adapter with an explicit API key
    /// @ai:effects pure
    pub fn with_api_key(
        identifier: &str,
        api_model: &str,
        provider: ChatProvider,
        config: RemoteConfig,
        api_key: String,
    ) -> Result<Self, AdapterError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| AdapterError::Init {
                model: identifier.to_string(),
                backend: provider.as_str(),
                message: e.to_string(),
            })?;

        tracing::info!(
            "Remote adapter ready: {} -> {} via {}",
            identifier,
            api_model,
            provider.as_str()
        );

        Ok(Self {
            identifier: identifier.to_string(),
            api_model: api_model.to_string(),
            provider,
            client,
            rate_limiter: RateLimiter::new(config.requests_per_minute),
            config,
            api_key,
        })
    }

    /// @ai:effects pure
    pub fn provider(&self) -> ChatProvider {
        self.provider
    }

    /// @ai:intent Issue exactly one request and return the raw completion text
    /// @ai:effects network
    async fn request(&self, content: &str) -> Result<String> {
        let endpoint = self.provider.endpoint(&self.config);
        let messages = vec![Message {
            role: "user",
            content,
        }];

        let builder = match self.provider {
            ChatProvider::OpenAi => self
                .client
                .post(endpoint)
                .bearer_auth(&self.api_key)
                .json(&ChatCompletionRequest {
                    model: &self.api_model,
                    max_tokens: self.config.max_tokens,
                    temperature: self.config.temperature,
                    messages,
                }),
            ChatProvider::Anthropic => self
                .client
                .post(endpoint)
                .header("x-api-key", &self.api_key)
                .header("anthropic-version", "2023-06-01")
                .json(&MessagesRequest {
                    model: &self.api_model,
                    max_tokens: self.config.max_tokens,
                    temperature: self.config.temperature,
                    messages,
                }),
        };

        let response = builder
            .send()
            .await
            .with_context(|| format!("Failed to send request to {}", endpoint))?;

        let status = response.status();

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            self.rate_limiter
                .back_off(retry_after(response.headers()))
                .await;
        }

        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            anyhow::bail!("{} API error ({}): {}", self.provider.as_str(), status, error_text);
        }

        match self.provider {
            ChatProvider::OpenAi => {
                let body: ChatCompletionResponse = response
                    .json()
                    .await
                    .context("Failed to parse chat completion response")?;

                body.choices
                    .into_iter()
                    .next()
                    .and_then(|choice| choice.message.content)
                    .context("Chat completion returned no message content")
            }
            ChatProvider::Anthropic => {
                let body: MessagesResponse = response
                    .json()
                    .await
                    .context("Failed to parse messages response")?;

                let text: Vec<String> = body.content.into_iter().filter_map(|b| b.text).collect();

                if text.is_empty() {
                    anyhow::bail!("Messages response contained no text blocks");
                }
                Ok(text.join("\n"))
            }
        }
    }
}

#[async_trait]
impl ModelAdapter for RemoteChatAdapter {
    fn identifier(&self) -> &str {
        &self.identifier
    }

    /// @ai:intent One rate-limited request; failures are logged and become None
    /// @ai:effects network
    async fn generate_solution(&self, prompt: &str) -> Result<Option<String>, AdapterError> {
        self.rate_limiter.acquire().await;

        let content = format!("{}{}", prompt, self.config.instruction_suffix);

        match self.request(&content).await {
            Ok(text) => Ok(Some(strip_code_fences(&text))),
            Err(e) => {
                tracing::warn!("Generation failed for {}: {:#}", self.identifier, e);
                Ok(None)
            }
        }
    }
}
