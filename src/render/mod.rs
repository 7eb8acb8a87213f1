//! Multi-part user-data rendering
//!
//! Turns a [`Configuration`] into the MIME multi-part document cloud-init
//! consumes. Rendering is a pure function of its input:
//! - defaults are filled into a copy of the configuration
//! - the configuration is validated
//! - parts are written in order under the pinned boundary
//! - the document is optionally gzipped, then optionally base64-encoded
//! - an identifier is derived from the final string

pub mod id;
pub mod multipart;
pub mod part;

pub use id::derive_id;
pub use multipart::{MultipartWriter, validate_boundary};
pub use part::{PartHeaders, canonical_header_key, part_headers};

use crate::ConfigError;
use crate::config::{Configuration, Part, validate, with_defaults};
use base64::Engine;
use flate2::Compression;
use flate2::write::GzEncoder;
use std::io::Write;
use tracing::{debug, info};

/// Output of a render call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedDocument {
    /// Final document, possibly gzipped and base64-encoded
    pub content: String,
    /// CRC-32 of `content`, base-10
    pub id: String,
}

/// Every check `render` makes before writing output
pub fn check_renderable(config: &Configuration) -> Result<(), ConfigError> {
    validate(config)?;
    validate_boundary(config.boundary())
}

/// Render a configuration into a multi-part MIME document
pub fn render(config: &Configuration) -> Result<RenderedDocument, ConfigError> {
    let config = with_defaults(config);
    check_renderable(&config)?;

    let bytes = if config.gzip() {
        let encoder = GzEncoder::new(Vec::new(), Compression::default());
        let encoder = write_multipart(encoder, config.boundary(), &config.parts)?;
        // The encoder buffers internally; only finish() yields complete output.
        encoder.finish()?
    } else {
        write_multipart(Vec::new(), config.boundary(), &config.parts)?
    };
    debug!(
        "Rendered {} bytes (gzip: {})",
        bytes.len(),
        config.gzip()
    );

    let content = if config.base64_encode() {
        base64::engine::general_purpose::STANDARD.encode(&bytes)
    } else {
        String::from_utf8(bytes).map_err(|e| {
            ConfigError::InvalidData(format!("Rendered document is not UTF-8: {}", e))
        })?
    };

    let id = derive_id(&content);
    info!("Rendered {} parts, id {}", config.parts.len(), id);

    Ok(RenderedDocument { content, id })
}

/// Write the multipart envelope and every part into `writer`
///
/// The boundary is checked before any byte is written.
pub fn write_multipart<W: Write>(
    writer: W,
    boundary: &str,
    parts: &[Part],
) -> Result<W, ConfigError> {
    let mut mime = MultipartWriter::new(writer, boundary)?;
    debug!("Using MIME boundary: {}", mime.boundary());

    let preamble = format!(
        "Content-Type: multipart/mixed; boundary=\"{}\"\nMIME-Version: 1.0\r\n\r\n",
        mime.boundary()
    );
    mime.get_mut().write_all(preamble.as_bytes())?;

    for (i, part) in parts.iter().enumerate() {
        part::write_part(&mut mime, i, part)?;
    }

    Ok(mime.finish()?)
}
