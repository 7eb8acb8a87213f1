//! Configuration validation
//!
//! Two layers live here:
//! - [`validate`] is the renderer's own check on option combinations.
//! - [`check_schema`] holds the structural rules a declaration must satisfy
//!   before it is handed to the renderer (part count, boundary presence).

use super::{Configuration, with_defaults};
use crate::ConfigError;

/// Reject configurations that combine incompatible options
///
/// Unset values are defaulted first, so an unset `base64_encode` with an
/// explicit `gzip: true` passes, while an explicit `base64_encode: false`
/// under the default gzip does not.
pub fn validate(config: &Configuration) -> Result<(), ConfigError> {
    let config = with_defaults(config);

    if config.gzip() && !config.base64_encode() {
        return Err(ConfigError::Config(
            "Expected base64_encode to be set to true when gzip is true".to_string(),
        ));
    }

    Ok(())
}

/// Structural checks for a declaration
///
/// Empty part content is accepted and renders as an empty body.
pub fn check_schema(config: &Configuration) -> Result<(), ConfigError> {
    if config.parts.is_empty() {
        return Err(ConfigError::Schema(
            "at least one part block is required".to_string(),
        ));
    }

    if config.boundary.as_deref() == Some("") {
        return Err(ConfigError::Schema(
            "boundary must be at least 1 character long".to_string(),
        ));
    }

    Ok(())
}
