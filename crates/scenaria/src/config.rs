//! Configuration types for compiling and exporting Scenaria models.
//!
//! All types implement [`serde::Deserialize`] so they can be loaded from
//! external sources; every field has a default, so an empty document is a
//! valid configuration.
//!
//! # Overview
//!
//! - [`AppConfig`] - Top-level configuration combining parser and export settings.
//! - [`ParserConfig`] - Controls elaboration: annotation resolution and re-declarations.
//! - [`ExportConfig`] - Controls how the model is written out.
//!
//! # Example
//!
//! ```
//! # use scenaria::config::AppConfig;
//! let config = AppConfig::default();
//! assert!(config.parser().resolve_annotations());
//! assert!(config.export().pretty());
//! ```

use serde::Deserialize;

use scenaria_parser::{ElaborateConfig, Redeclaration};

/// Top-level application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Parser configuration section.
    #[serde(default)]
    parser: ParserConfig,

    /// Export configuration section.
    #[serde(default)]
    export: ExportConfig,
}

impl AppConfig {
    /// Creates a new [`AppConfig`] from its sections.
    pub fn new(parser: ParserConfig, export: ExportConfig) -> Self {
        Self { parser, export }
    }

    /// Returns the parser configuration.
    pub fn parser(&self) -> &ParserConfig {
        &self.parser
    }

    /// Returns the export configuration.
    pub fn export(&self) -> &ExportConfig {
        &self.export
    }
}

/// How a re-declared actor, annotation or container id is treated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RedeclarationPolicy {
    /// The later declaration replaces the earlier one.
    #[default]
    Replace,
    /// Re-declaring an id is an error.
    Reject,
}

impl From<RedeclarationPolicy> for Redeclaration {
    fn from(policy: RedeclarationPolicy) -> Self {
        match policy {
            RedeclarationPolicy::Replace => Redeclaration::Replace,
            RedeclarationPolicy::Reject => Redeclaration::Reject,
        }
    }
}

/// Elaboration settings.
#[derive(Debug, Clone, Deserialize)]
pub struct ParserConfig {
    /// Merge annotation properties into actors after assembly.
    #[serde(default = "default_true")]
    resolve_annotations: bool,

    /// Policy for re-declared ids.
    #[serde(default)]
    redeclaration: RedeclarationPolicy,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self::new(true, RedeclarationPolicy::default())
    }
}

impl ParserConfig {
    pub fn new(resolve_annotations: bool, redeclaration: RedeclarationPolicy) -> Self {
        Self {
            resolve_annotations,
            redeclaration,
        }
    }

    pub fn resolve_annotations(&self) -> bool {
        self.resolve_annotations
    }

    pub fn redeclaration(&self) -> RedeclarationPolicy {
        self.redeclaration
    }

    /// The [`ElaborateConfig`] handed to the parser.
    pub fn elaborate_config(&self) -> ElaborateConfig {
        ElaborateConfig::new(self.resolve_annotations, self.redeclaration.into())
    }
}

/// Output settings for the exported model.
#[derive(Debug, Clone, Deserialize)]
pub struct ExportConfig {
    /// Indent the JSON output.
    #[serde(default = "default_true")]
    pretty: bool,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self::new(true)
    }
}

impl ExportConfig {
    pub fn new(pretty: bool) -> Self {
        Self { pretty }
    }

    pub fn pretty(&self) -> bool {
        self.pretty
    }
}

fn default_true() -> bool {
    true
}
