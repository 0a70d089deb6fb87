//! Turns a [`ScenariaError`] into reports miette can render.
//!
//! A parse error becomes one [`Report`] per diagnostic, carrying the source
//! text so the labeled spans can be drawn. A source with several lexical
//! errors therefore produces several reports. Every other error becomes a
//! single report without source code.

use std::fmt;

use miette::{Diagnostic as MietteDiagnostic, LabeledSpan, SourceCode, SourceSpan};

use scenaria::ScenariaError;
use scenaria_parser::error::{Diagnostic, Label};

/// A single renderable problem.
#[derive(Debug)]
pub struct Report<'a> {
    message: String,
    code: Option<String>,
    help: Option<String>,
    labels: Vec<LabeledSpan>,
    src: Option<&'a str>,
}

impl<'a> Report<'a> {
    fn from_diagnostic(diag: &Diagnostic, src: &'a str) -> Self {
        Self {
            message: diag.message().to_owned(),
            code: diag.code().map(|code| code.to_string()),
            help: diag.help().map(str::to_owned),
            labels: diag.labels().iter().map(labeled_span).collect(),
            src: Some(src),
        }
    }

    fn from_error(err: &ScenariaError) -> Self {
        let (code, help) = match err {
            ScenariaError::Io(_) => (
                "scenaria::io",
                Some("check that the input file exists and the output path is writable"),
            ),
            ScenariaError::Config(_) => (
                "scenaria::config",
                Some(
                    "known keys are `parser.resolve_annotations`, `parser.redeclaration` \
                     and `export.pretty`",
                ),
            ),
            ScenariaError::Export(_) => ("scenaria::export", None),
            ScenariaError::Parse { .. } => ("scenaria::parse", None),
        };
        Self {
            message: err.to_string(),
            code: Some(code.to_owned()),
            help: help.map(str::to_owned),
            labels: Vec::new(),
            src: None,
        }
    }
}

impl fmt::Display for Report<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for Report<'_> {}

impl MietteDiagnostic for Report<'_> {
    fn code<'b>(&'b self) -> Option<Box<dyn fmt::Display + 'b>> {
        self.code
            .as_ref()
            .map(|code| Box::new(code) as Box<dyn fmt::Display>)
    }

    fn help<'b>(&'b self) -> Option<Box<dyn fmt::Display + 'b>> {
        self.help
            .as_ref()
            .map(|help| Box::new(help) as Box<dyn fmt::Display>)
    }

    fn source_code(&self) -> Option<&dyn SourceCode> {
        self.src.as_ref().map(|src| src as &dyn SourceCode)
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        if self.labels.is_empty() {
            return None;
        }
        Some(Box::new(self.labels.iter().cloned()))
    }
}

fn labeled_span(label: &Label) -> LabeledSpan {
    let span = label.span();
    let at = SourceSpan::new(span.start().into(), span.len());
    let message = Some(label.message().to_owned());
    if label.is_primary() {
        LabeledSpan::new_primary_with_span(message, at)
    } else {
        LabeledSpan::new_with_span(message, at)
    }
}

/// All reports for `err`, in the order they should be shown.
pub fn reports(err: &ScenariaError) -> Vec<Report<'_>> {
    match err {
        ScenariaError::Parse { err: parse_err, src } => parse_err
            .diagnostics()
            .iter()
            .map(|diag| Report::from_diagnostic(diag, src))
            .collect(),
        _ => vec![Report::from_error(err)],
    }
}

#[cfg(test)]
mod tests {
    use scenaria::ModelBuilder;
    use scenaria_parser::{
        Span,
        error::{ErrorCode, ParseError},
    };

    use super::*;

    fn code(report: &Report<'_>) -> Option<String> {
        report.code().map(|c| c.to_string())
    }

    #[test]
    fn test_lexer_errors_are_reported_separately() {
        let err = ModelBuilder::default()
            .parse("agent 'A' as a; # 'open")
            .unwrap_err();

        let reports = reports(&err);
        assert_eq!(reports.len(), 2);
        assert_eq!(code(&reports[0]).as_deref(), Some("E002"));
        assert_eq!(code(&reports[1]).as_deref(), Some("E001"));
        assert!(reports.iter().all(|report| report.source_code().is_some()));
    }

    #[test]
    fn test_config_error_has_code_and_help() {
        let err = ScenariaError::Config("bad value".to_string());

        let reports = reports(&err);
        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].to_string(), "Configuration error: bad value");
        assert_eq!(code(&reports[0]).as_deref(), Some("scenaria::config"));
        assert!(reports[0].help().is_some());
        assert!(reports[0].source_code().is_none());
        assert!(reports[0].labels().is_none());
    }

    #[test]
    fn test_primary_and_secondary_labels() {
        let diag = Diagnostic::error("duplicate definition of actor `a`")
            .with_code(ErrorCode::E301)
            .with_label(Span::new(30..31), "defined again here")
            .with_secondary_label(Span::new(13..14), "first defined here");
        let err = ScenariaError::new_parse_error(
            ParseError::from(diag),
            "agent 'A' as a; agent 'B' as a;",
        );

        let reports = reports(&err);
        let labels: Vec<_> = reports[0].labels().unwrap().collect();
        assert_eq!(labels.len(), 2);
        assert!(labels[0].primary());
        assert!(!labels[1].primary());
        assert_eq!(labels[1].offset(), 13);
        assert_eq!(labels[1].label(), Some("first defined here"));
    }

    #[test]
    fn test_graphical_rendering_includes_code_and_help() {
        let err = ModelBuilder::default()
            .parse("agent 'A' as a; note for ghost: 'boo';")
            .unwrap_err();
        let reports = reports(&err);

        let mut rendered = String::new();
        miette::GraphicalReportHandler::new_themed(miette::GraphicalTheme::unicode_nocolor())
            .render_report(&mut rendered, &reports[0])
            .unwrap();
        assert!(rendered.contains("E200"), "{rendered}");
        assert!(rendered.contains("undefined identifier `ghost`"), "{rendered}");
    }
}
