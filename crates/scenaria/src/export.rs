//! Writing a [`SystemModel`] out for downstream consumers.
//!
//! The layout and rendering side reads the model as JSON; see [`json`].

pub mod json;

use thiserror::Error;

use scenaria_core::model::SystemModel;

/// Errors raised while exporting a model.
#[derive(Debug, Error)]
pub enum Error {
    #[error("failed to serialize model: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// A target format for a compiled model.
pub trait Exporter {
    /// Render `model` into the exporter's format.
    fn export(&self, model: &SystemModel) -> Result<String, Error>;
}
