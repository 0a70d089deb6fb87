//! # Scenaria Parser
//!
//! Compiler front-end for the Scenaria architecture language. This crate
//! turns source text into a validated [`SystemModel`].
//!
//! ## Usage
//!
//! ```
//! # use scenaria_parser::{parse, ElaborateConfig, error::ParseError};
//!
//! fn main() -> Result<(), ParseError> {
//!     let source = "
//!         agent 'Browser' as web;
//!         agent 'API' as api;
//!         store 'Orders' as orders;
//!         web -('GET /orders')-> api;
//!         api --> orders;
//!     ";
//!
//!     let model = parse(source, ElaborateConfig::default())?;
//!     assert_eq!(model.actors().len(), 3);
//!     Ok(())
//! }
//! ```

mod context;
mod elaborate;
pub mod error;
mod lexer;
mod parser;
mod parser_types;
mod span;
mod tokens;

pub use elaborate::{ElaborateConfig, Redeclaration};
pub use span::{Span, Spanned};

use log::debug;

use scenaria_core::model::SystemModel;

use elaborate::Builder;
use error::ParseError;

/// Parse source text into a system model.
///
/// The pipeline runs in three steps:
///
/// 1. **Tokenize** - Convert source text to tokens, collecting every lexical error
/// 2. **Parse** - Build the syntax tree; nothing is elaborated if this fails
/// 3. **Elaborate** - Resolve references, build the symbol tables and assemble
///    the model, then resolve annotations if `config` asks for it
///
/// Every call starts from empty symbol tables, so parsing the same source
/// twice yields equal models.
///
/// # Errors
///
/// Returns a [`ParseError`] holding one diagnostic per lexical error, or the
/// single syntax or semantic diagnostic that stopped the parse.
pub fn parse(source: &str, config: ElaborateConfig) -> Result<SystemModel, ParseError> {
    let tokens = lexer::tokenize(source)?;
    debug!(tokens = tokens.len(); "Tokenized source");

    let program = parser::build_program(&tokens)?;
    debug!(statements = program.statements.len(); "Parsed program");

    let builder = Builder::new(config);
    Ok(builder.build(&program)?)
}
