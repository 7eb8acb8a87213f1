//! Error types for cloudinit-config

use thiserror::Error;

/// Main error type for rendering and its surrounding plumbing
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid attribute configuration: {0}")]
    Config(String),

    #[error("Invalid declaration: {0}")]
    Schema(String),

    #[error("Invalid boundary {boundary:?}: {reason}")]
    Boundary { boundary: String, reason: String },

    #[error("error writing part block {index}: {source}")]
    PartWrite {
        index: usize,
        #[source]
        source: std::io::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid data: {0}")]
    InvalidData(String),
}

impl ConfigError {
    /// Create a boundary error
    pub fn boundary(boundary: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Boundary {
            boundary: boundary.into(),
            reason: reason.into(),
        }
    }

    /// Wrap an I/O failure that happened while writing part `index`
    pub fn part_write(index: usize, source: std::io::Error) -> Self {
        Self::PartWrite { index, source }
    }

    /// Whether this error stems from the user's declaration rather than the runtime
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            Self::Config(_) | Self::Schema(_) | Self::Boundary { .. } | Self::Yaml(_) | Self::Json(_)
        )
    }
}
