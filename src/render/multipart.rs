//! Multipart body writer with a pinned boundary
//!
//! Emits RFC 2046 delimiters the way standard MIME writers do: the first part
//! opens with `--boundary\r\n`, later parts with `\r\n--boundary\r\n`, and the
//! close delimiter is `\r\n--boundary--\r\n`. The boundary is never generated;
//! output must stay byte-stable across renders.

use super::part::PartHeaders;
use crate::ConfigError;
use std::io::{self, Write};

/// Longest boundary RFC 2046 allows
pub const MAX_BOUNDARY_LEN: usize = 70;

/// Check a boundary token against RFC 2046 `bchars`
pub fn validate_boundary(boundary: &str) -> Result<(), ConfigError> {
    if boundary.is_empty() || boundary.len() > MAX_BOUNDARY_LEN {
        return Err(ConfigError::boundary(boundary, "invalid boundary length"));
    }

    let last = boundary.len() - 1;
    for (i, b) in boundary.bytes().enumerate() {
        let ok = match b {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' => true,
            b'\'' | b'(' | b')' | b'+' | b'_' | b',' | b'-' | b'.' | b'/' | b':' | b'='
            | b'?' => true,
            // Space may not end the token.
            b' ' => i != last,
            _ => false,
        };
        if !ok {
            return Err(ConfigError::boundary(boundary, "invalid boundary character"));
        }
    }

    Ok(())
}

/// Writes body parts separated by a fixed boundary
#[derive(Debug)]
pub struct MultipartWriter<W: Write> {
    inner: W,
    boundary: String,
    parts: usize,
}

impl<W: Write> MultipartWriter<W> {
    /// Wrap `inner`, rejecting an invalid boundary before anything is written
    pub fn new(inner: W, boundary: &str) -> Result<Self, ConfigError> {
        validate_boundary(boundary)?;
        Ok(Self {
            inner,
            boundary: boundary.to_string(),
            parts: 0,
        })
    }

    pub fn boundary(&self) -> &str {
        &self.boundary
    }

    /// Number of parts started so far
    pub fn part_count(&self) -> usize {
        self.parts
    }

    /// Direct access to the underlying writer, for the envelope preamble
    pub fn get_mut(&mut self) -> &mut W {
        &mut self.inner
    }

    /// Start a new part and return the writer its body goes to
    pub fn create_part(&mut self, headers: &PartHeaders) -> io::Result<&mut W> {
        if self.parts == 0 {
            write!(self.inner, "--{}\r\n", self.boundary)?;
        } else {
            write!(self.inner, "\r\n--{}\r\n", self.boundary)?;
        }
        headers.write_to(&mut self.inner)?;
        self.inner.write_all(b"\r\n")?;

        self.parts += 1;
        Ok(&mut self.inner)
    }

    /// Write the close delimiter and hand back the underlying writer
    pub fn finish(mut self) -> io::Result<W> {
        write!(self.inner, "\r\n--{}--\r\n", self.boundary)?;
        self.inner.flush()?;
        Ok(self.inner)
    }
}
