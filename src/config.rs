//! @ai:module:intent Configuration structs for the evaluation harness
//! @ai:module:layer infrastructure
//! @ai:module:public_api HarnessConfig, LocalConfig, RemoteConfig, PathConfig, ReportConfig
//! @ai:module:stateless true

use crate::error::{HarnessError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Configuration file picked up from the working directory when no path is given.
pub const DEFAULT_CONFIG_FILE: &str = "evalkit.toml";

/// @ai:intent Main configuration for the harness
/// @ai:effects pure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HarnessConfig {
    #[serde(default)]
    pub local: LocalConfig,
    #[serde(default)]
    pub remote: RemoteConfig,
    #[serde(default)]
    pub paths: PathConfig,
    #[serde(default)]
    pub report: ReportConfig,
}

/// @ai:intent Settings for the locally hosted model runtime
/// @ai:effects pure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocalConfig {
    #[serde(default = "default_local_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_local_timeout")]
    pub timeout_secs: u64,
    #[serde(default = "default_local_max_tokens")]
    pub max_tokens: u32,
    #[serde(default)]
    pub seed: u64,
    /// Model identifier -> tag known to the local runtime
    #[serde(default)]
    pub aliases: BTreeMap<String, String>,
}

/// @ai:intent Settings for remote chat-completion APIs
/// @ai:effects pure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoteConfig {
    #[serde(default = "default_openai_endpoint")]
    pub openai_endpoint: String,
    #[serde(default = "default_anthropic_endpoint")]
    pub anthropic_endpoint: String,
    #[serde(default = "default_remote_max_tokens")]
    pub max_tokens: u32,
    #[serde(default)]
    pub temperature: f32,
    #[serde(default = "default_remote_timeout")]
    pub timeout_secs: u64,
    #[serde(default = "default_rate_limit")]
    pub requests_per_minute: u32,
    #[serde(default = "default_instruction_suffix")]
    pub instruction_suffix: String,
}

/// @ai:intent Input and output directories
/// @ai:effects pure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathConfig {
    #[serde(default = "default_benchmarks_dir")]
    pub benchmarks_dir: PathBuf,
    #[serde(default = "default_results_dir")]
    pub results_dir: PathBuf,
}

/// @ai:intent Which auxiliary report sinks run next to the CSV report
/// @ai:effects pure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    #[serde(default = "default_true")]
    pub json: bool,
    #[serde(default = "default_true")]
    pub markdown: bool,
    #[serde(default)]
    pub chart: bool,
}

impl Default for LocalConfig {
    fn default() -> Self {
        Self {
            endpoint: default_local_endpoint(),
            timeout_secs: default_local_timeout(),
            max_tokens: default_local_max_tokens(),
            seed: 0,
            aliases: BTreeMap::new(),
        }
    }
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            openai_endpoint: default_openai_endpoint(),
            anthropic_endpoint: default_anthropic_endpoint(),
            max_tokens: default_remote_max_tokens(),
            temperature: 0.0,
            timeout_secs: default_remote_timeout(),
            requests_per_minute: default_rate_limit(),
            instruction_suffix: default_instruction_suffix(),
        }
    }
}

impl Default for PathConfig {
    fn default() -> Self {
        Self {
            benchmarks_dir: default_benchmarks_dir(),
            results_dir: default_results_dir(),
        }
    }
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            json: true,
            markdown: true,
            chart: false,
        }
    }
}

fn default_local_endpoint() -> String {
    "http://localhost:11434".to_string()
}

fn default_local_timeout() -> u64 {
    300
}

fn default_local_max_tokens() -> u32 {
    256
}

fn default_openai_endpoint() -> String {
    "https://api.openai.com/v1/chat/completions".to_string()
}

fn default_anthropic_endpoint() -> String {
    "https://api.anthropic.com/v1/messages".to_string()
}

fn default_remote_max_tokens() -> u32 {
    1024
}

fn default_remote_timeout() -> u64 {
    120
}

fn default_rate_limit() -> u32 {
    60
}

fn default_instruction_suffix() -> String {
    "\n\nRespond with the code only. Do not include explanations, comments about the code, or any other text."
        .to_string()
}

fn default_benchmarks_dir() -> PathBuf {
    PathBuf::from("benchmarks")
}

fn default_results_dir() -> PathBuf {
    PathBuf::from("results")
}

fn default_true() -> bool {
    true
}

impl LocalConfig {
    /// @ai:intent Upper bound for a single local generation
    /// @ai:effects pure
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// @ai:intent Tag the local runtime knows this model under
    /// @ai:effects pure
    pub fn runtime_tag<'a>(&'a self, identifier: &'a str) -> &'a str {
        self.aliases
            .get(identifier)
            .map(String::as_str)
            .unwrap_or(identifier)
    }
}

impl RemoteConfig {
    /// @ai:intent Upper bound for a single remote request
    /// @ai:effects pure
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl HarnessConfig {
    /// @ai:intent Load configuration from a TOML file
    /// @ai:pre path exists and is readable
    /// @ai:effects fs:read
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| HarnessError::Config {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        toml::from_str(&content).map_err(|e| HarnessError::Config {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// @ai:intent Save configuration to a TOML file
    /// @ai:effects fs:write
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self).map_err(|e| HarnessError::Config {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// @ai:intent Load the explicit config, else evalkit.toml if present, else defaults
    /// @ai:effects fs:read
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(p) => Self::load(p),
            None => {
                let default_path = Path::new(DEFAULT_CONFIG_FILE);

                if default_path.exists() {
                    Self::load(default_path)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    #[test]
    fn test_partial_file_fills_defaults() {
        let config: HarnessConfig = toml::from_str(
            r#"
[paths]
benchmarks_dir = "suites"

[local.aliases]
"gpt2-small" = "gpt2"
"#,
        )
        .unwrap();

        assert_eq!(config.paths.benchmarks_dir, PathBuf::from("suites"));
        assert_eq!(config.paths.results_dir, PathBuf::from("results"));
        assert_eq!(config.remote.requests_per_minute, 60);
        assert!(config.report.json);
        assert!(!config.report.chart);
        assert_eq!(config.local.runtime_tag("gpt2-small"), "gpt2");
        assert_eq!(config.local.runtime_tag("gpt2-medium"), "gpt2-medium");
    }

    #[test]
    fn test_save_then_load() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("evalkit.toml");

        let mut config = HarnessConfig::default();
        config.remote.max_tokens = 512;
        config.local.aliases.insert("gpt2-xl".to_string(), "gpt2:xl".to_string());
        config.save(&path).unwrap();

        let loaded = HarnessConfig::load(&path).unwrap();
        assert_eq!(loaded.remote.max_tokens, 512);
        assert_eq!(loaded.local.runtime_tag("gpt2-xl"), "gpt2:xl");
    }

    #[test]
    fn test_load_reports_path_on_bad_toml() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("broken.toml");
        std::fs::write(&path, "[paths\nbenchmarks_dir = 3").unwrap();

        let err = HarnessConfig::load(&path).unwrap_err();
        assert!(err.to_string().contains("broken.toml"));
    }
}
