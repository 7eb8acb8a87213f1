//! Rendered user-data decoding
//!
//! Reverses the render pipeline so a stored document can be inspected:
//! - Base64 text is decoded
//! - Gzip compressed data is decompressed
//! - The MIME multipart message is split into parts

pub mod mime;

pub use mime::{MimePart, parse_multipart};

use crate::ConfigError;
use crate::config::Configuration;
use base64::Engine;
use flate2::read::GzDecoder;
use std::io::Read;
use tracing::debug;

/// A rendered document taken apart again
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedDocument {
    /// Whether the input was base64 text
    pub base64_encoded: bool,
    /// Whether the (decoded) bytes were gzip-compressed
    pub gzipped: bool,
    /// Boundary named in the envelope
    pub boundary: String,
    /// The plain multipart text
    pub text: String,
    /// Parts in document order
    pub parts: Vec<MimePart>,
}

impl DecodedDocument {
    /// Rebuild the configuration this document was rendered from
    pub fn to_configuration(&self) -> Configuration {
        Configuration {
            parts: self.parts.iter().map(MimePart::to_part).collect(),
            gzip: Some(self.gzipped),
            base64_encode: Some(self.base64_encoded),
            boundary: Some(self.boundary.clone()),
        }
    }
}

/// Decode a rendered document of any supported encoding
pub fn decode_rendered(rendered: &str) -> Result<DecodedDocument, ConfigError> {
    let base64_encoded = !looks_like_multipart(rendered);
    let data = if base64_encoded {
        decode_base64(rendered)?
    } else {
        rendered.as_bytes().to_vec()
    };

    let gzipped = is_gzip(&data);
    let data = decompress_if_needed(data)?;

    let text = String::from_utf8(data)
        .map_err(|e| ConfigError::InvalidData(format!("UTF-8 decode error: {}", e)))?;
    let (boundary, parts) = parse_multipart(&text)?;

    Ok(DecodedDocument {
        base64_encoded,
        gzipped,
        boundary,
        text,
        parts,
    })
}

/// Plain multipart output starts with its envelope header
fn looks_like_multipart(data: &str) -> bool {
    data.trim_start()
        .get(..13)
        .is_some_and(|prefix| prefix.eq_ignore_ascii_case("content-type:"))
}

fn is_gzip(data: &[u8]) -> bool {
    data.len() >= 2 && data[0] == 0x1f && data[1] == 0x8b
}

/// Decompress gzip data if needed
fn decompress_if_needed(data: Vec<u8>) -> Result<Vec<u8>, ConfigError> {
    if !is_gzip(&data) {
        return Ok(data);
    }

    debug!("Decompressing gzip user-data");
    let mut decoder = GzDecoder::new(data.as_slice());
    let mut decompressed = Vec::new();
    decoder
        .read_to_end(&mut decompressed)
        .map_err(|e| ConfigError::InvalidData(format!("Gzip decompression failed: {}", e)))?;
    Ok(decompressed)
}

/// Decode base64 data
fn decode_base64(data: &str) -> Result<Vec<u8>, ConfigError> {
    let cleaned: String = data.chars().filter(|c| !c.is_whitespace()).collect();

    base64::engine::general_purpose::STANDARD
        .decode(&cleaned)
        .map_err(|e| ConfigError::InvalidData(format!("Base64 decode error: {}", e)))
}
