//! The diagnostic type shared by every phase.

use thiserror::Error;

use crate::{
    error::{ErrorCode, Label},
    span::Span,
};

/// A single error with its source locations.
///
/// Every diagnostic is fatal: a parse that reports one yields no model.
///
/// Rendered by a reporter it reads like:
///
/// ```text
/// error[E201]: `db` cannot be a channel endpoint
///   --> shop.scn:4:8
///    |
///  4 | web -('query')-> db;
///    |                  ^^ store used as channel endpoint
///    |
///  2 | store 'Orders' as db;
///    | --------------------- declared as a store here
///    |
///    = help: use `web --> db` to write to a store
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("error{}: {message}", code_tag(.code))]
pub struct Diagnostic {
    code: Option<ErrorCode>,
    message: String,
    labels: Vec<Label>,
    help: Option<String>,
}

fn code_tag(code: &Option<ErrorCode>) -> String {
    code.map(|code| format!("[{code}]")).unwrap_or_default()
}

impl Diagnostic {
    /// Create an error diagnostic.
    ///
    /// ```
    /// # use scenaria_parser::error::{Diagnostic, ErrorCode};
    /// # use scenaria_parser::Span;
    /// let diag = Diagnostic::error("undefined identifier `gw`")
    ///     .with_code(ErrorCode::E200)
    ///     .with_label(Span::new(0..2), "not declared");
    /// assert_eq!(diag.to_string(), "error[E200]: undefined identifier `gw`");
    /// ```
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            code: None,
            message: message.into(),
            labels: Vec::new(),
            help: None,
        }
    }

    pub fn code(&self) -> Option<ErrorCode> {
        self.code
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn labels(&self) -> &[Label] {
        &self.labels
    }

    pub fn help(&self) -> Option<&str> {
        self.help.as_deref()
    }

    /// Span of the first primary label.
    pub fn primary_span(&self) -> Option<Span> {
        self.labels
            .iter()
            .find(|label| label.is_primary())
            .map(Label::span)
    }

    pub fn with_code(mut self, code: ErrorCode) -> Self {
        self.code = Some(code);
        self
    }

    pub fn with_label(mut self, span: Span, message: impl Into<String>) -> Self {
        self.labels.push(Label::primary(span, message));
        self
    }

    pub fn with_secondary_label(mut self, span: Span, message: impl Into<String>) -> Self {
        self.labels.push(Label::secondary(span, message));
        self
    }

    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_without_code() {
        let diag = Diagnostic::error("incomplete input");
        assert_eq!(diag.to_string(), "error: incomplete input");
    }

    #[test]
    fn test_builder_chain() {
        let diag = Diagnostic::error("actor `gw` is defined multiple times")
            .with_code(ErrorCode::E301)
            .with_label(Span::new(40..60), "duplicate definition")
            .with_secondary_label(Span::new(0..20), "first defined here")
            .with_help("rename one of the actors");

        assert_eq!(diag.code(), Some(ErrorCode::E301));
        assert_eq!(diag.labels().len(), 2);
        assert_eq!(diag.primary_span(), Some(Span::new(40..60)));
        assert_eq!(diag.help(), Some("rename one of the actors"));
    }
}
