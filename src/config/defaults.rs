//! Default filling for render configurations

use super::{
    Configuration, DEFAULT_BASE64_ENCODE, DEFAULT_BOUNDARY, DEFAULT_CONTENT_TYPE, DEFAULT_GZIP,
    Part,
};

/// Return a copy of `config` with every unset optional value filled in
///
/// Explicit values, including an explicit `false`, are never overwritten. A
/// part's content type counts as unset when it is empty. The input is left
/// untouched so callers may reuse their part list.
pub fn with_defaults(config: &Configuration) -> Configuration {
    Configuration {
        parts: config.parts.iter().map(part_with_defaults).collect(),
        gzip: Some(config.gzip.unwrap_or(DEFAULT_GZIP)),
        base64_encode: Some(config.base64_encode.unwrap_or(DEFAULT_BASE64_ENCODE)),
        boundary: Some(
            config
                .boundary
                .clone()
                .unwrap_or_else(|| DEFAULT_BOUNDARY.to_string()),
        ),
    }
}

fn part_with_defaults(part: &Part) -> Part {
    let content_type = match part.content_type.as_deref() {
        Some(ct) if !ct.is_empty() => ct.to_string(),
        _ => DEFAULT_CONTENT_TYPE.to_string(),
    };

    Part {
        content_type: Some(content_type),
        ..part.clone()
    }
}
