//! CLI logic for the Scenaria compiler.
//!
//! Reads a Scenaria source file, compiles it into a system model and writes
//! the model out as JSON.

pub mod error_adapter;

mod args;
mod config;

pub use args::Args;

use std::{fs, path::Path};

use log::info;

use scenaria::{ModelBuilder, ScenariaError};

/// Run the Scenaria CLI application
///
/// The model is named after the input file's stem.
///
/// # Errors
///
/// Returns `ScenariaError` for:
/// - File I/O errors
/// - Configuration loading errors
/// - Lexical, syntax and semantic errors in the source
/// - Export errors
pub fn run(args: &Args) -> Result<(), ScenariaError> {
    info!(
        input_path = args.input,
        output_path = args.output;
        "Processing model"
    );

    let app_config = config::load_config(args.config.as_ref())?;

    let source = fs::read_to_string(&args.input)?;

    let builder = ModelBuilder::new(app_config);
    let mut model = builder.parse(&source)?;
    if let Some(stem) = Path::new(&args.input).file_stem() {
        model = model.with_name(stem.to_string_lossy());
    }
    let json = builder.to_json(&model)?;

    fs::write(&args.output, json)?;

    info!(output_file = args.output; "Model exported successfully");

    Ok(())
}
