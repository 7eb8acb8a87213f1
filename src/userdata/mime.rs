//! MIME multipart parsing for rendered user-data
//!
//! Reads back documents produced by the renderer (and other cloud-init
//! multi-part archives) so they can be inspected or compared.

use crate::ConfigError;
use crate::config::Part;
use std::collections::BTreeMap;
use tracing::debug;

/// A single part from a MIME multipart message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MimePart {
    /// Raw MIME type string
    pub content_type: String,
    /// Content of this part, transfer-decoded
    pub content: String,
    /// Optional filename from Content-Disposition
    pub filename: Option<String>,
    /// Optional X-Merge-Type value
    pub merge_type: Option<String>,
    /// All headers, names lower-cased
    pub headers: BTreeMap<String, String>,
}

impl MimePart {
    /// Convert back into a renderable part
    pub fn to_part(&self) -> Part {
        Part {
            content_type: Some(self.content_type.clone()),
            content: self.content.clone(),
            filename: self.filename.clone(),
            merge_type: self.merge_type.clone(),
        }
    }
}

/// Parse a MIME multipart message into its boundary and parts
pub fn parse_multipart(data: &str) -> Result<(String, Vec<MimePart>), ConfigError> {
    let boundary = find_boundary(data)?;
    debug!("Found MIME boundary: {}", boundary);

    // Body sections start after the envelope headers.
    let body_start = header_end(data).map_or(0, |(_, body)| body);
    let body = &data[body_start..];

    let opening = format!("--{}", boundary);
    let Some(start) = body.find(&opening) else {
        return Err(ConfigError::InvalidData(format!(
            "No delimiter for boundary {:?}",
            boundary
        )));
    };

    let mut parts = Vec::new();
    let separator = format!("\r\n--{}", boundary);
    let mut closed = false;

    for section in body[start + opening.len()..].split(&separator) {
        if section.starts_with("--") {
            closed = true;
            break;
        }
        let section = section
            .strip_prefix("\r\n")
            .or_else(|| section.strip_prefix('\n'))
            .unwrap_or(section);
        parts.push(parse_part(section)?);
    }

    if !closed {
        return Err(ConfigError::InvalidData(
            "Missing MIME close delimiter".to_string(),
        ));
    }

    debug!("Parsed {} MIME parts", parts.len());
    Ok((boundary, parts))
}

/// Byte offsets of the header/body split: (end of headers, start of body)
fn header_end(data: &str) -> Option<(usize, usize)> {
    data.find("\r\n\r\n").map(|idx| (idx, idx + 4))
}

/// Find the boundary string from the envelope Content-Type header
#[allow(clippy::collapsible_if)]
fn find_boundary(data: &str) -> Result<String, ConfigError> {
    for line in data.lines() {
        let line_lower = line.to_lowercase();

        if line_lower.starts_with("content-type:") && line_lower.contains("multipart/") {
            if let Some(boundary) = extract_param(line, "boundary=") {
                return Ok(boundary);
            }
        }

        // Stop at first empty line (end of headers)
        if line.trim().is_empty() {
            break;
        }
    }

    Err(ConfigError::InvalidData(
        "No MIME boundary found".to_string(),
    ))
}

/// Extract a `name=value` or `name="value"` parameter from a header value
fn extract_param(value: &str, name: &str) -> Option<String> {
    // ASCII-only folding keeps byte offsets valid for `value`.
    let lower = value.to_ascii_lowercase();
    let idx = lower.find(name)?;
    let after = &value[idx + name.len()..];

    let param = if let Some(quoted) = after.strip_prefix('"') {
        let end = quoted.find('"')?;
        &quoted[..end]
    } else {
        let end = after
            .find(|c: char| c == ';' || c.is_whitespace())
            .unwrap_or(after.len());
        &after[..end]
    };

    Some(param.to_string())
}

/// Parse a single MIME part
fn parse_part(data: &str) -> Result<MimePart, ConfigError> {
    let (headers_str, body) = match header_end(data) {
        Some((end, body)) => (&data[..end], &data[body..]),
        // Headers with an empty body: the blank line is the section's tail.
        None => (data.strip_suffix("\r\n").unwrap_or(data), ""),
    };

    let mut headers = BTreeMap::new();
    for line in headers_str.split("\r\n") {
        if let Some((name, value)) = line.split_once(':') {
            headers.insert(name.trim().to_lowercase(), value.trim().to_string());
        }
    }

    let content_type = headers
        .get("content-type")
        .cloned()
        .unwrap_or_else(|| crate::config::DEFAULT_CONTENT_TYPE.to_string());

    let filename = headers
        .get("content-disposition")
        .and_then(|cd| extract_param(cd, "filename="));

    let merge_type = headers.get("x-merge-type").cloned();

    let content = match headers.get("content-transfer-encoding").map(String::as_str) {
        Some("base64") => decode_base64(body)?,
        _ => body.to_string(),
    };

    Ok(MimePart {
        content_type,
        content,
        filename,
        merge_type,
        headers,
    })
}

/// Decode a base64 part body
fn decode_base64(data: &str) -> Result<String, ConfigError> {
    use base64::Engine;

    let clean: String = data.chars().filter(|c| !c.is_whitespace()).collect();

    let decoded = base64::engine::general_purpose::STANDARD
        .decode(&clean)
        .map_err(|e| ConfigError::InvalidData(format!("Base64 decode error: {}", e)))?;

    String::from_utf8(decoded)
        .map_err(|e| ConfigError::InvalidData(format!("UTF-8 decode error: {}", e)))
}
