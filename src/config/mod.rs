//! Render configuration types
//!
//! A [`Configuration`] is the one canonical input shape shared by every call
//! site: the declaration loader deserializes into it, the default-filler
//! returns a new one, and the renderer consumes it. Unset optional values are
//! `None` until [`with_defaults`] fills them.

pub mod defaults;
pub mod loader;
pub mod validate;

pub use defaults::with_defaults;
pub use loader::{load_configuration, parse_configuration, read_source};
pub use validate::{check_schema, validate};

use serde::{Deserialize, Serialize};

/// Boundary used when none is declared
pub const DEFAULT_BOUNDARY: &str = "MIMEBOUNDARY";

/// Content type used for parts that declare none (or an empty one)
pub const DEFAULT_CONTENT_TYPE: &str = "text/plain";

/// Whether output is gzip-compressed by default
pub const DEFAULT_GZIP: bool = true;

/// Whether output is base64-encoded by default
pub const DEFAULT_BASE64_ENCODE: bool = true;

/// One content block destined for one MIME body section
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Part {
    /// MIME content type reported in the part header
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,

    /// Body content, written verbatim
    pub content: String,

    /// File name reported through `Content-Disposition`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,

    /// Opaque `X-Merge-Type` value for cloud-init's merger
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub merge_type: Option<String>,
}

impl Part {
    /// Create a part with the given body and nothing else set
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content_type: None,
            content: content.into(),
            filename: None,
            merge_type: None,
        }
    }

    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    pub fn with_filename(mut self, filename: impl Into<String>) -> Self {
        self.filename = Some(filename.into());
        self
    }

    pub fn with_merge_type(mut self, merge_type: impl Into<String>) -> Self {
        self.merge_type = Some(merge_type.into());
        self
    }

    /// Effective content type; empty and unset both mean `text/plain`
    pub fn content_type(&self) -> &str {
        match self.content_type.as_deref() {
            Some(ct) if !ct.is_empty() => ct,
            _ => DEFAULT_CONTENT_TYPE,
        }
    }

    /// File name, if one was given and it is not empty
    pub fn filename(&self) -> Option<&str> {
        self.filename.as_deref().filter(|f| !f.is_empty())
    }

    /// Merge type, if one was given and it is not empty
    pub fn merge_type(&self) -> Option<&str> {
        self.merge_type.as_deref().filter(|m| !m.is_empty())
    }
}

/// Aggregate render input
///
/// Parts are rendered in declaration order. Declaration files name the list
/// `part` (one entry per `part` block); `parts` is accepted as well.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Configuration {
    /// Ordered content parts
    #[serde(rename = "part", alias = "parts", default)]
    pub parts: Vec<Part>,

    /// Gzip the multipart document before encoding
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gzip: Option<bool>,

    /// Base64-encode the (possibly gzipped) document
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base64_encode: Option<bool>,

    /// Pinned multipart boundary
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub boundary: Option<String>,
}

impl Configuration {
    /// Create a configuration with the given parts and all knobs unset
    pub fn new(parts: Vec<Part>) -> Self {
        Self {
            parts,
            ..Self::default()
        }
    }

    pub fn with_gzip(mut self, gzip: bool) -> Self {
        self.gzip = Some(gzip);
        self
    }

    pub fn with_base64_encode(mut self, base64_encode: bool) -> Self {
        self.base64_encode = Some(base64_encode);
        self
    }

    pub fn with_boundary(mut self, boundary: impl Into<String>) -> Self {
        self.boundary = Some(boundary.into());
        self
    }

    /// Plain-text output: no gzip, no base64
    pub fn plain(self) -> Self {
        self.with_gzip(false).with_base64_encode(false)
    }

    pub fn gzip(&self) -> bool {
        self.gzip.unwrap_or(DEFAULT_GZIP)
    }

    pub fn base64_encode(&self) -> bool {
        self.base64_encode.unwrap_or(DEFAULT_BASE64_ENCODE)
    }

    pub fn boundary(&self) -> &str {
        self.boundary.as_deref().unwrap_or(DEFAULT_BOUNDARY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_part_effective_content_type() {
        assert_eq!(Part::new("x").content_type(), "text/plain");
        assert_eq!(
            Part::new("x").with_content_type("").content_type(),
            "text/plain"
        );
        assert_eq!(
            Part::new("x")
                .with_content_type("text/cloud-config")
                .content_type(),
            "text/cloud-config"
        );
    }

    #[test]
    fn test_empty_optional_strings_are_absent() {
        let part = Part::new("x").with_filename("").with_merge_type("");
        assert_eq!(part.filename(), None);
        assert_eq!(part.merge_type(), None);
    }

    #[test]
    fn test_configuration_accessor_defaults() {
        let config = Configuration::new(vec![Part::new("x")]);
        assert!(config.gzip());
        assert!(config.base64_encode());
        assert_eq!(config.boundary(), "MIMEBOUNDARY");

        let plain = config.plain().with_boundary("//");
        assert!(!plain.gzip());
        assert!(!plain.base64_encode());
        assert_eq!(plain.boundary(), "//");
    }

    #[test]
    fn test_deserialize_part_blocks() {
        let yaml = r##"
gzip: false
base64_encode: false
part:
  - content_type: text/x-shellscript
    content: baz
  - content: "#cloud-config\nhostname: test"
    filename: cfg.yaml
    merge_type: list()+dict()+str()
"##;
        let config: Configuration = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.parts.len(), 2);
        assert_eq!(config.gzip, Some(false));
        assert_eq!(config.boundary, None);
        assert_eq!(config.parts[1].filename(), Some("cfg.yaml"));
        assert_eq!(config.parts[1].merge_type(), Some("list()+dict()+str()"));
    }

    #[test]
    fn test_deserialize_parts_alias_and_unknown_fields() {
        let json = r#"{"parts": [{"content": "a"}]}"#;
        let config: Configuration = serde_json::from_str(json).unwrap();
        assert_eq!(config.parts, vec![Part::new("a")]);

        let json = r#"{"part": [{"content": "a"}], "gzipp": true}"#;
        assert!(serde_json::from_str::<Configuration>(json).is_err());
    }

    #[test]
    fn test_part_requires_content() {
        let yaml = "part:\n  - content_type: text/plain\n";
        assert!(serde_yaml::from_str::<Configuration>(yaml).is_err());
    }
}
