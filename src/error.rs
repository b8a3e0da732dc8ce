use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PlugseekError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Regex error: {0}")]
    Regex(#[from] regex::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid query: {0}")]
    Validation(String),

    #[error("Catalog entry '{name}' failed validation: {reason}")]
    Schema { name: String, reason: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to process catalog '{path}': {source}")]
    Catalog {
        path: PathBuf,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, PlugseekError>;
