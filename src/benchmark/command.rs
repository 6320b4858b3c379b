//! @ai:module:intent Benchmark kind that executes generated code against a test snippet
//! @ai:module:layer infrastructure
//! @ai:module:public_api CommandBenchmark
//! @ai:module:stateless true

use crate::adapter::ModelAdapter;
use crate::benchmark::manifest::UnitManifest;
use crate::benchmark::Benchmark;
use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tempfile::TempDir;

#[derive(Debug, Clone, Deserialize)]
struct CommandOptions {
    #[serde(default = "default_program")]
    program: String,
    #[serde(default)]
    args: Vec<String>,
    #[serde(default = "default_file_name")]
    file_name: String,
    #[serde(default = "default_timeout")]
    timeout_secs: u64,
}

fn default_program() -> String {
    "python3".to_string()
}

fn default_file_name() -> String {
    "solution.py".to_string()
}

fn default_timeout() -> u64 {
    30
}

#[derive(Debug, Clone)]
struct CommandCase {
    prompt: String,
    test: String,
}

/// @ai:intent Runs `<program> <args..> <file>` on solution + test; exit 0 passes
///
/// Generated code runs unsandboxed with the harness's privileges.
#[derive(Debug, Clone)]
pub struct CommandBenchmark {
    program: PathBuf,
    args: Vec<String>,
    file_name: String,
    timeout: Duration,
    working_dir: PathBuf,
    cases: Vec<CommandCase>,
}

impl CommandBenchmark {
    /// @ai:intent `command` kind factory
    /// @ai:pre the configured program is installed
    /// @ai:effects fs:read
    pub fn from_manifest(manifest: &UnitManifest, unit_dir: &Path) -> Result<Self> {
        let options: CommandOptions = manifest.options()?;

        let program = find_program(&options.program).with_context(|| {
            format!("program `{}` not found on PATH", options.program)
        })?;

        if options.file_name.contains(['/', '\\']) {
            anyhow::bail!("file_name must be a bare file name, got `{}`", options.file_name);
        }

        let cases = manifest
            .non_empty_cases()?
            .iter()
            .enumerate()
            .map(|(i, case)| {
                Ok(CommandCase {
                    prompt: case.prompt.clone(),
                    test: case.require(&case.test, "test", i)?.to_string(),
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            program,
            args: options.args,
            file_name: options.file_name,
            timeout: Duration::from_secs(options.timeout_secs),
            working_dir: unit_dir.to_path_buf(),
            cases,
        })
    }

    /// @ai:intent Write solution and test to a scratch file and run it
    /// @ai:effects fs:write, process
    async fn passes(&self, solution: &str, test: &str) -> Result<bool> {
        let temp_dir = TempDir::new()?;
        let source_path = temp_dir.path().join(&self.file_name);
        tokio::fs::write(&source_path, format!("{solution}\n\n{test}\n")).await?;

        let mut command = tokio::process::Command::new(&self.program);
        command
            .args(&self.args)
            .arg(&source_path)
            .current_dir(&self.working_dir)
            .stdin(std::process::Stdio::null())
            .kill_on_drop(true);

        match tokio::time::timeout(self.timeout, command.output()).await {
            Ok(output) => {
                let output = output
                    .with_context(|| format!("Failed to run {}", self.program.display()))?;

                if !output.status.success() {
                    tracing::debug!(
                        "Test failed ({}): {}",
                        output.status,
                        truncate_for_log(&String::from_utf8_lossy(&output.stderr), 200)
                    );
                }
                Ok(output.status.success())
            }
            Err(_) => {
                tracing::debug!("Test timed out after {:?}", self.timeout);
                Ok(false)
            }
        }
    }
}

#[async_trait]
impl Benchmark for CommandBenchmark {
    async fn run_benchmark(&self, adapter: &dyn ModelAdapter) -> Result<f64> {
        let mut passed = 0usize;

        for (i, case) in self.cases.iter().enumerate() {
            let solution = adapter
                .generate_solution(&case.prompt)
                .await
                .with_context(|| format!("case {}", i + 1))?;

            let Some(solution) = solution else {
                continue;
            };

            if self.passes(&solution, &case.test).await? {
                passed += 1;
            }
        }

        Ok(passed as f64 / self.cases.len() as f64 * 100.0)
    }
}

/// @ai:intent Resolve a program name the way a shell would
/// @ai:effects fs:read, env
fn find_program(program: &str) -> Option<PathBuf> {
    let candidate = Path::new(program);

    if candidate.components().count() > 1 {
        return candidate.is_file().then(|| candidate.to_path_buf());
    }

    let path_var = std::env::var_os("PATH")?;
    std::env::split_paths(&path_var)
        .map(|dir| dir.join(program))
        .find(|path| path.is_file())
}

fn truncate_for_log(s: &str, max_len: usize) -> String {
    if s.len() <= max_len {
        s.to_string()
    } else {
        let mut end = max_len;
        while !s.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}...", &s[..end])
    }
}
