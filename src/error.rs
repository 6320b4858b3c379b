//! @ai:module:intent Define error types for resolution, adapters and discovery
//! @ai:module:layer domain
//! @ai:module:public_api HarnessError, AdapterError, Result
//! @ai:module:stateless true

use std::path::PathBuf;
use thiserror::Error;

/// @ai:intent Errors that abort an evaluation run
#[derive(Error, Debug)]
pub enum HarnessError {
    #[error("Model identifier must not be empty")]
    EmptyModelIdentifier,

    #[error("Unsupported model: {0}")]
    UnsupportedModel(String),

    #[error(transparent)]
    Adapter(#[from] AdapterError),

    #[error("Failed to read benchmarks directory {path}: {source}")]
    BenchmarksRoot {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid configuration {path}: {message}")]
    Config { path: PathBuf, message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// @ai:intent Unrecoverable adapter failures
/// @ai:invariant recoverable remote failures never become an AdapterError, they become the failure sentinel
#[derive(Error, Debug, Clone)]
pub enum AdapterError {
    #[error("Missing credential: environment variable {variable} is not set")]
    MissingCredential { variable: &'static str },

    #[error("Failed to initialize {backend} adapter for {model}: {message}")]
    Init {
        model: String,
        backend: &'static str,
        message: String,
    },

    #[error("Local backend failure for {model}: {message}")]
    Backend { model: String, message: String },
}

pub type Result<T> = std::result::Result<T, HarnessError>;

/// @ai:intent Find a fatal adapter error anywhere in an anyhow error chain
/// @ai:effects pure
pub fn fatal_adapter_error(err: &anyhow::Error) -> Option<&AdapterError> {
    err.chain().find_map(|cause| cause.downcast_ref::<AdapterError>())
}
