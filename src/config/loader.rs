//! Declaration loader
//!
//! Reads a render declaration from a YAML or JSON file (or stdin) and checks
//! it against the declaration schema.

use super::{Configuration, check_schema};
use crate::ConfigError;
use std::path::Path;
use tokio::fs;
use tokio::io::AsyncReadExt;
use tracing::{debug, info};

/// Path that selects stdin instead of a file
pub const STDIN_PATH: &str = "-";

/// Serialization format of a declaration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeclarationFormat {
    Yaml,
    Json,
}

impl DeclarationFormat {
    /// Pick the format from a file extension; anything but `.json` is YAML
    pub fn from_path(path: impl AsRef<Path>) -> Self {
        match path.as_ref().extension() {
            Some(ext) if ext.eq_ignore_ascii_case("json") => Self::Json,
            _ => Self::Yaml,
        }
    }
}

/// Parse and schema-check a declaration held in memory
pub fn parse_configuration(
    text: &str,
    format: DeclarationFormat,
) -> Result<Configuration, ConfigError> {
    let config: Configuration = match format {
        DeclarationFormat::Yaml => serde_yaml::from_str(text)?,
        DeclarationFormat::Json => serde_json::from_str(text)?,
    };

    check_schema(&config)?;
    debug!("Parsed declaration with {} parts", config.parts.len());
    Ok(config)
}

/// Read a whole file as text, `-` meaning stdin
pub async fn read_source(path: impl AsRef<Path>) -> Result<String, ConfigError> {
    let path = path.as_ref();

    if path.as_os_str() == STDIN_PATH {
        let mut text = String::new();
        tokio::io::stdin().read_to_string(&mut text).await?;
        Ok(text)
    } else {
        Ok(fs::read_to_string(path).await?)
    }
}

/// Load and schema-check a declaration file, `-` meaning stdin
pub async fn load_configuration(path: impl AsRef<Path>) -> Result<Configuration, ConfigError> {
    let path = path.as_ref();
    let text = read_source(path).await?;

    let config = parse_configuration(&text, DeclarationFormat::from_path(path))?;
    info!("Loaded declaration from {}", path.display());
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_format_from_path() {
        assert_eq!(DeclarationFormat::from_path("a.json"), DeclarationFormat::Json);
        assert_eq!(DeclarationFormat::from_path("a.JSON"), DeclarationFormat::Json);
        assert_eq!(DeclarationFormat::from_path("a.yaml"), DeclarationFormat::Yaml);
        assert_eq!(DeclarationFormat::from_path("a"), DeclarationFormat::Yaml);
    }

    #[test]
    fn test_parse_rejects_missing_parts() {
        let err = parse_configuration("gzip: false\n", DeclarationFormat::Yaml).unwrap_err();
        assert!(matches!(err, ConfigError::Schema(_)));
    }

    #[test]
    fn test_parse_rejects_bad_yaml() {
        let err = parse_configuration("part: [", DeclarationFormat::Yaml).unwrap_err();
        assert!(matches!(err, ConfigError::Yaml(_)));
    }

    #[tokio::test]
    async fn test_load_yaml_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("userdata.yaml");

        fs::write(
            &path,
            "boundary: //\npart:\n  - content_type: text/x-shellscript\n    content: baz\n",
        )
        .await
        .unwrap();

        let config = load_configuration(&path).await.unwrap();
        assert_eq!(config.boundary(), "//");
        assert_eq!(config.parts[0].content_type(), "text/x-shellscript");
    }

    #[tokio::test]
    async fn test_load_json_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("userdata.json");

        fs::write(
            &path,
            r#"{"gzip": false, "base64_encode": false, "part": [{"content": "baz"}]}"#,
        )
        .await
        .unwrap();

        let config = load_configuration(&path).await.unwrap();
        assert!(!config.gzip());
        assert_eq!(config.parts[0].content, "baz");
    }

    #[tokio::test]
    async fn test_read_source_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("rendered.txt");
        fs::write(&path, "Q29udGVudA==").await.unwrap();

        assert_eq!(read_source(&path).await.unwrap(), "Q29udGVudA==");
        assert!(matches!(
            read_source(temp.path().join("missing")).await,
            Err(ConfigError::Io(_))
        ));
    }

    #[tokio::test]
    async fn test_load_missing_file() {
        let err = load_configuration("/nonexistent/userdata.yaml")
            .await
            .unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
