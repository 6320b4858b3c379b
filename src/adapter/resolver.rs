//! @ai:module:intent Map a model identifier onto a ready adapter
//! @ai:module:layer application
//! @ai:module:public_api AdapterResolver, ModelFamily
//! @ai:module:stateless true

use crate::adapter::{Adapter, ChatProvider, DryRunAdapter, LocalAdapter, RemoteChatAdapter};
use crate::config::HarnessConfig;
use crate::error::{HarnessError, Result};

/// @ai:intent Model families the harness knows how to drive
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelFamily {
    /// GPT-2 checkpoints served by the local runtime
    Gpt2,
    /// GPT-4 models behind the OpenAI chat completions API
    Gpt4,
    /// Claude models behind the Anthropic messages API
    Claude,
}

impl ModelFamily {
    /// @ai:intent Classify an identifier by its prefix
    /// @ai:post Err(UnsupportedModel) carries the identifier verbatim
    /// @ai:effects pure
    pub fn classify(identifier: &str) -> Result<Self> {
        if identifier.trim().is_empty() {
            return Err(HarnessError::EmptyModelIdentifier);
        }

        if identifier.starts_with("gpt2") {
            Ok(ModelFamily::Gpt2)
        } else if identifier.starts_with("gpt4") || identifier.starts_with("gpt-4") {
            Ok(ModelFamily::Gpt4)
        } else if identifier.starts_with("claude") {
            Ok(ModelFamily::Claude)
        } else {
            Err(HarnessError::UnsupportedModel(identifier.to_string()))
        }
    }

    /// @ai:intent Model name to send to a remote API
    /// @ai:effects pure
    pub fn api_model_name(&self, identifier: &str) -> String {
        match self {
            ModelFamily::Gpt4 => match identifier.strip_prefix("gpt4") {
                Some(rest) => format!("gpt-4{}", rest),
                None => identifier.to_string(),
            },
            ModelFamily::Gpt2 | ModelFamily::Claude => identifier.to_string(),
        }
    }
}

/// @ai:intent Builds fully initialized adapters from identifiers
pub struct AdapterResolver<'a> {
    config: &'a HarnessConfig,
}

impl<'a> AdapterResolver<'a> {
    /// @ai:effects pure
    pub fn new(config: &'a HarnessConfig) -> Self {
        Self { config }
    }

    /// @ai:intent Classify, then perform all backend setup for the chosen variant
    /// @ai:post no I/O happens when classification fails
    /// @ai:effects network, env
    pub async fn resolve(&self, identifier: &str) -> Result<Adapter> {
        let family = ModelFamily::classify(identifier)?;
        tracing::info!("Resolving {} as {:?}", identifier, family);

        let adapter = match family {
            ModelFamily::Gpt2 => Adapter::Local(LocalAdapter::load(identifier, &self.config.local).await?),
            ModelFamily::Gpt4 => Adapter::Remote(RemoteChatAdapter::new(
                identifier,
                &family.api_model_name(identifier),
                ChatProvider::OpenAi,
                self.config.remote.clone(),
            )?),
            ModelFamily::Claude => Adapter::Remote(RemoteChatAdapter::new(
                identifier,
                &family.api_model_name(identifier),
                ChatProvider::Anthropic,
                self.config.remote.clone(),
            )?),
        };

        Ok(adapter)
    }

    /// @ai:intent Classify the identifier but skip backend setup
    /// @ai:effects pure
    pub fn resolve_dry_run(&self, identifier: &str) -> Result<Adapter> {
        ModelFamily::classify(identifier)?;
        Ok(Adapter::DryRun(DryRunAdapter::new(identifier)))
    }
}
