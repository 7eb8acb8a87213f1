//! cloudinit-config library
//!
//! Renders ordered content parts into the multi-part MIME document cloud-init
//! accepts as user-data.
//!
//! # Design Principles
//!
//! - **Deterministic**: pinned boundary, canonical header order, no clocks
//! - **Pure**: one [`Configuration`] in, one [`RenderedDocument`] or error out
//! - **Compatible**: output layout matches what cloud-init already parses
//!
//! ```
//! use cloudinit_config::{Configuration, Part, render};
//!
//! let config = Configuration::new(vec![
//!     Part::new("#!/bin/sh\necho hi").with_content_type("text/x-shellscript"),
//! ])
//! .plain();
//!
//! let doc = render(&config).unwrap();
//! assert!(doc.content.contains("--MIMEBOUNDARY--"));
//! ```

pub mod config;
pub mod render;
pub mod state;
pub mod userdata;

mod error;

pub use config::{Configuration, Part};
pub use error::ConfigError;
pub use render::{RenderedDocument, check_renderable, derive_id, render};
pub use userdata::{DecodedDocument, decode_rendered};
