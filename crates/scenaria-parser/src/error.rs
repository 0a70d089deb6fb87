//! Diagnostics for the Scenaria compiler front-end.
//!
//! Every phase reports problems as [`Diagnostic`]s: an [`ErrorCode`], a
//! message, labeled source spans and optional help. The
//! lexer may report several diagnostics at once, so the public entry points
//! return a [`ParseError`] that wraps one or more of them.
//!
//! # Example
//!
//! ```
//! # use scenaria_parser::error::{Diagnostic, ErrorCode};
//! # use scenaria_parser::Span;
//!
//! let diag = Diagnostic::error("`db` is not an agent or user")
//!     .with_code(ErrorCode::E201)
//!     .with_label(Span::new(12..14), "store used as channel endpoint")
//!     .with_help("channels connect agents and users; use `-->` to write to a store");
//! ```

mod collector;
mod diagnostic;
mod error_code;
mod label;
mod parse_error;

pub(crate) use collector::DiagnosticCollector;
pub(crate) use parse_error::Result;

pub use diagnostic::Diagnostic;
pub use error_code::ErrorCode;
pub use label::Label;
pub use parse_error::ParseError;
