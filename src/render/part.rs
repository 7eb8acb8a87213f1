//! Part encoding
//!
//! Builds the header block for one [`Part`] and writes its body as 7bit text.

use super::multipart::MultipartWriter;
use crate::ConfigError;
use crate::config::Part;
use std::collections::BTreeMap;
use std::io::{self, Write};
use tracing::debug;

/// Transfer encoding declared for every part
pub const TRANSFER_ENCODING: &str = "7bit";

/// Part header block, kept in canonical key order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PartHeaders {
    headers: BTreeMap<String, String>,
}

impl PartHeaders {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a header, normalizing the field name's case
    pub fn set(&mut self, name: &str, value: impl Into<String>) {
        self.headers.insert(canonical_header_key(name), value.into());
    }

    /// Look up a header by any-case name
    pub fn get(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&canonical_header_key(name))
            .map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.headers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.headers.is_empty()
    }

    /// Iterate headers in emission order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.headers.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Write `Name: value\r\n` lines in emission order
    pub fn write_to<W: Write>(&self, w: &mut W) -> io::Result<()> {
        for (name, value) in self.iter() {
            write!(w, "{}: {}\r\n", name, value)?;
        }
        Ok(())
    }
}

/// Normalize a header field name: first letter and letters after `-` upper
/// case, everything else lower case. Names containing characters outside the
/// token set are returned unchanged.
pub fn canonical_header_key(name: &str) -> String {
    let is_token = |b: u8| b.is_ascii_alphanumeric() || b"!#$%&'*+-.^_`|~".contains(&b);
    if name.is_empty() || !name.bytes().all(is_token) {
        return name.to_string();
    }

    let mut upper = true;
    name.chars()
        .map(|c| {
            let out = if upper {
                c.to_ascii_uppercase()
            } else {
                c.to_ascii_lowercase()
            };
            upper = c == '-';
            out
        })
        .collect()
}

/// Header block for a part
pub fn part_headers(part: &Part) -> PartHeaders {
    let mut headers = PartHeaders::new();

    headers.set("Content-Type", part.content_type());
    headers.set("MIME-Version", "1.0");
    headers.set("Content-Transfer-Encoding", TRANSFER_ENCODING);

    if let Some(filename) = part.filename() {
        headers.set(
            "Content-Disposition",
            format!("attachment; filename=\"{}\"", filename),
        );
    }

    if let Some(merge_type) = part.merge_type() {
        headers.set("X-Merge-Type", merge_type);
    }

    headers
}

/// Write one part; `index` is only used to give errors context
pub fn write_part<W: Write>(
    mime: &mut MultipartWriter<W>,
    index: usize,
    part: &Part,
) -> Result<(), ConfigError> {
    let headers = part_headers(part);
    debug!(
        "Writing part {} ({}, {} bytes)",
        index,
        part.content_type(),
        part.content.len()
    );

    mime.create_part(&headers)
        .and_then(|body| body.write_all(part.content.as_bytes()))
        .map_err(|e| ConfigError::part_write(index, e))
}
