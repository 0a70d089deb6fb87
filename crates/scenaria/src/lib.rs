//! Scenaria - a textual language for software-architecture models.
//!
//! Sources describe actors, channels, data flows, annotations, containers
//! and scenarios. This crate compiles them into a [`SystemModel`] and
//! exports the model for the layout and rendering side.

pub mod config;

mod error;
mod export;

pub use scenaria_core::{annotations, identifier, ids, model};

pub use error::ScenariaError;
pub use export::{Error as ExportError, Exporter, json::JsonExporter};

use log::{debug, info, trace};

use config::AppConfig;
use model::SystemModel;

/// Builder for compiling and exporting Scenaria models.
///
/// # Examples
///
/// ```rust
/// use scenaria::{ModelBuilder, config::AppConfig};
///
/// let source = "agent 'Web' as web; store 'DB' as db; web --> db;";
///
/// let builder = ModelBuilder::new(AppConfig::default());
/// let model = builder.parse(source).expect("Failed to parse");
/// let json = builder.to_json(&model).expect("Failed to export");
/// assert!(json.contains("\"write:web->db\""));
/// ```
#[derive(Debug, Default)]
pub struct ModelBuilder {
    config: AppConfig,
}

impl ModelBuilder {
    /// Create a new model builder with the given configuration.
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    /// Compile source code into a system model.
    ///
    /// # Errors
    ///
    /// Returns [`ScenariaError::Parse`] for lexical, syntax or semantic
    /// errors; the error keeps the source for rendering.
    pub fn parse(&self, source: &str) -> Result<SystemModel, ScenariaError> {
        info!("Parsing model");

        let elaborate_config = self.config.parser().elaborate_config();
        let model = scenaria_parser::parse(source, elaborate_config)
            .map_err(|err| ScenariaError::new_parse_error(err, source))?;

        debug!(actors = model.actors().len(); "Model parsed successfully");
        trace!(model:?; "Parsed model");

        Ok(model)
    }

    /// Serialize a model to JSON, indented unless the export configuration
    /// says otherwise.
    ///
    /// # Errors
    ///
    /// Returns [`ScenariaError::Export`] if serialization fails.
    pub fn to_json(&self, model: &SystemModel) -> Result<String, ScenariaError> {
        let exporter = JsonExporter::new(self.config.export().pretty());
        let json = exporter.export(model)?;
        info!(bytes = json.len(); "Model exported");
        Ok(json)
    }
}

/// Create a parse function with the default configuration.
///
/// Each call of the returned function starts from fresh symbol tables.
///
/// ```
/// let parse = scenaria::create_parser();
/// let model = parse("user 'Shopper' as s;").unwrap();
/// assert_eq!(model.actors()[0].caption(), "Shopper");
/// ```
pub fn create_parser() -> impl Fn(&str) -> Result<SystemModel, ScenariaError> {
    let builder = ModelBuilder::default();
    move |source| builder.parse(source)
}
