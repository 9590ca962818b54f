//! Infrastructure module root.
//! Cross-cutting concerns: errors and configuration.

pub mod config;
pub mod error;

pub use config::{ConfigManager, ExportFormat, SigningConfiguration};
pub use error::{SignError, SignResult};
