//! Render state persistence and change detection
//!
//! A render's result is stored as JSON alongside the inputs that force a new
//! document. On the next render the stored identifier is compared with the
//! fresh one; a pinned boundary and a pure renderer mean unchanged inputs
//! always produce a no-op.

use crate::ConfigError;
use crate::config::Configuration;
use crate::render::RenderedDocument;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use tokio::fs;
use tracing::{debug, info};

/// Persisted result of one render
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderState {
    /// CRC-32 identifier of `rendered`
    pub id: String,
    /// Final rendered document
    pub rendered: String,
    pub gzip: bool,
    pub base64_encode: bool,
    pub boundary: String,
}

impl RenderState {
    /// Build the state for a finished render of `config`
    pub fn new(config: &Configuration, document: &RenderedDocument) -> Self {
        Self {
            id: document.id.clone(),
            rendered: document.content.clone(),
            gzip: config.gzip(),
            base64_encode: config.base64_encode(),
            boundary: config.boundary().to_string(),
        }
    }
}

/// What applying a new render to stored state amounts to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Change {
    /// No previous state
    Create,
    /// Identical document
    NoOp,
    /// Any input changed; the document is replaced wholesale
    Replace,
}

impl fmt::Display for Change {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Change::Create => write!(f, "create"),
            Change::NoOp => write!(f, "no-op"),
            Change::Replace => write!(f, "replace"),
        }
    }
}

/// Compare stored state with a fresh render
pub fn plan(previous: Option<&RenderState>, next: &RenderState) -> Change {
    match previous {
        None => Change::Create,
        Some(prev) if prev == next => Change::NoOp,
        Some(prev) => {
            debug!("Render changed: id {} -> {}", prev.id, next.id);
            Change::Replace
        }
    }
}

/// Read stored state; a missing file means no previous render
pub async fn load_state(path: impl AsRef<Path>) -> Result<Option<RenderState>, ConfigError> {
    let path = path.as_ref();

    if !path.exists() {
        debug!("No render state at {}", path.display());
        return Ok(None);
    }

    let content = fs::read_to_string(path).await?;
    let state = serde_json::from_str(&content)?;
    Ok(Some(state))
}

/// Write state as pretty JSON, creating parent directories
pub async fn save_state(path: impl AsRef<Path>, state: &RenderState) -> Result<(), ConfigError> {
    let path = path.as_ref();

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).await?;
    }

    let json = serde_json::to_string_pretty(state)?;
    fs::write(path, json).await?;

    info!("Saved render state {} to {}", state.id, path.display());
    Ok(())
}
