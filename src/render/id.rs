//! Rendered document identifier

/// CRC-32 (IEEE) of `rendered`, as a base-10 string
///
/// A change-detection fingerprint only; it is not collision-free.
pub fn derive_id(rendered: &str) -> String {
    crc32fast::hash(rendered.as_bytes()).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_checksums() {
        assert_eq!(derive_id(""), "0");
        assert_eq!(derive_id("123456789"), "3421780262");
    }

    #[test]
    fn test_sensitive_to_content() {
        assert_ne!(derive_id("echo a"), derive_id("echo b"));
        assert_eq!(derive_id("echo a"), derive_id("echo a"));
    }
}
