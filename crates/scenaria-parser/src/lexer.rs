//! Lexical analyzer for Scenaria source text.
//!
//! [`tokenize`] turns source text into [`PositionedToken`]s. It keeps going
//! after a bad character or a broken text literal so that every lexical
//! problem in a file is reported in one pass.

use winnow::{
    Parser as _,
    combinator::{alt, cut_err, not, peek, preceded, repeat, terminated},
    error::{ContextError, ErrMode, ModalResult},
    stream::{LocatingSlice, Location, Stream},
    token::{literal, none_of, one_of, take_while},
};

use crate::{
    error::{Diagnostic, DiagnosticCollector, ErrorCode, ParseError},
    span::Span,
    tokens::{PositionedToken, Token},
};

/// Diagnostic details attached to winnow errors with `.context()`.
#[derive(Debug, Clone, PartialEq, Eq)]
struct LexerDiagnostic {
    code: ErrorCode,
    message: &'static str,
    help: Option<&'static str>,
    /// Offset where the offending construct starts.
    start: usize,
}

type Input<'a> = LocatingSlice<&'a str>;
type IResult<O> = ModalResult<O, ContextError<LexerDiagnostic>>;

/// Parse the escape after a backslash inside a text literal.
fn text_escape(input: &mut Input<'_>) -> IResult<char> {
    let escape_start = input.current_token_start();

    '\\'.parse_next(input)?;

    cut_err(one_of(['\'', '\\', 'n', 't']).map(|c| match c {
        'n' => '\n',
        't' => '\t',
        other => other,
    }))
    .context(LexerDiagnostic {
        code: ErrorCode::E003,
        message: "invalid escape sequence",
        help: Some("valid escapes are `\\'`, `\\\\`, `\\n` and `\\t`"),
        start: escape_start,
    })
    .parse_next(input)
}

/// Parse a single-quoted text literal.
///
/// A literal may hold any character except a line break. Once the opening
/// quote is seen the literal is committed, so a missing closing quote is
/// reported instead of being retried as other tokens.
fn text_literal<'a>(input: &mut Input<'a>) -> IResult<Token<'a>> {
    let start = input.current_token_start();

    '\''.parse_next(input)?;

    let content = repeat(0.., alt((text_escape, none_of(['\'', '\\', '\n', '\r'])))).fold(
        String::new,
        |mut text, c| {
            text.push(c);
            text
        },
    );

    cut_err(terminated(content, '\''))
        .context(LexerDiagnostic {
            code: ErrorCode::E001,
            message: "unterminated text literal",
            help: Some("close the text with `'` on the same line"),
            start,
        })
        .map(Token::Text)
        .parse_next(input)
}

/// Parse a `//` comment up to the end of the line.
fn line_comment<'a>(input: &mut Input<'a>) -> IResult<Token<'a>> {
    preceded("//", take_while(0.., |c| c != '\n'))
        .map(Token::LineComment)
        .parse_next(input)
}

fn is_identifier_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Parse a reserved word, only when it is not the prefix of a longer word.
fn keyword<'a>(input: &mut Input<'a>) -> IResult<Token<'a>> {
    terminated(
        alt((
            literal("agent").value(Token::Agent),
            literal("store").value(Token::Store),
            literal("user").value(Token::User),
            literal("as").value(Token::As),
            literal("note").value(Token::Note),
            literal("for").value(Token::For),
            literal("is").value(Token::Is),
            literal("container").value(Token::Container),
        )),
        peek(not(one_of(is_identifier_char))),
    )
    .parse_next(input)
}

fn identifier<'a>(input: &mut Input<'a>) -> IResult<Token<'a>> {
    (
        one_of(|c: char| c.is_ascii_alphabetic() || c == '_'),
        take_while(0.., is_identifier_char),
    )
        .take()
        .map(Token::Identifier)
        .parse_next(input)
}

/// Parse arrows and dashes, longest first.
fn operator<'a>(input: &mut Input<'a>) -> IResult<Token<'a>> {
    alt((
        literal("-->").value(Token::WriteArrow),
        literal("--<").value(Token::ResponseArrow),
        literal("<--").value(Token::ReadArrow),
        literal("->").value(Token::Arrow),
        literal("<-").value(Token::LeftArrow),
        literal("--").value(Token::DoubleDash),
        literal("-\\").value(Token::AsyncArrow),
        '-'.value(Token::Dash),
    ))
    .parse_next(input)
}

fn punctuation<'a>(input: &mut Input<'a>) -> IResult<Token<'a>> {
    alt((
        '('.value(Token::LeftParen),
        ')'.value(Token::RightParen),
        '{'.value(Token::LeftBrace),
        '}'.value(Token::RightBrace),
        '@'.value(Token::At),
        ':'.value(Token::Colon),
        ';'.value(Token::Semicolon),
        ','.value(Token::Comma),
    ))
    .parse_next(input)
}

fn whitespace<'a>(input: &mut Input<'a>) -> IResult<Token<'a>> {
    take_while(1.., |c: char| c.is_whitespace() && c != '\n')
        .value(Token::Whitespace)
        .parse_next(input)
}

fn newline<'a>(input: &mut Input<'a>) -> IResult<Token<'a>> {
    '\n'.value(Token::Newline).parse_next(input)
}

fn positioned_token<'a>(input: &mut Input<'a>) -> IResult<PositionedToken<'a>> {
    let start = input.current_token_start();

    let token = alt((
        line_comment, // before `-` operators and punctuation
        text_literal,
        operator,
        keyword, // before identifier
        identifier,
        punctuation,
        newline, // before whitespace
        whitespace,
    ))
    .parse_next(input)?;

    let end = input.current_token_start();
    Ok(PositionedToken::new(token, Span::new(start..end)))
}

/// Accumulates tokens and diagnostics while lexing.
struct Lexer<'a> {
    tokens: Vec<PositionedToken<'a>>,
    diagnostics: DiagnosticCollector,
}

impl<'a> Lexer<'a> {
    fn new() -> Self {
        Self {
            tokens: Vec::new(),
            diagnostics: DiagnosticCollector::new(),
        }
    }

    fn tokenize(&mut self, mut input: Input<'a>) {
        while input.eof_offset() > 0 {
            match positioned_token(&mut input) {
                Ok(token) => self.tokens.push(token),
                Err(err) => {
                    let error_pos = input.current_token_start();
                    let diagnostic = Self::convert_err_mode(err, error_pos);
                    let inside_text = diagnostic.code() == Some(ErrorCode::E003);
                    self.diagnostics.emit(diagnostic);

                    if inside_text {
                        Self::skip_rest_of_text(&mut input);
                    } else if input.eof_offset() > 0 {
                        input.next_token();
                    }
                }
            }
        }
    }

    /// Skip past the closing quote of a text literal, or to the end of the line.
    fn skip_rest_of_text(input: &mut Input<'a>) {
        while let Some(c) = input.peek_token() {
            if c == '\n' {
                break;
            }
            input.next_token();
            if c == '\'' {
                break;
            }
        }
    }

    fn finish(self) -> Result<Vec<PositionedToken<'a>>, ParseError> {
        self.diagnostics.finish().map(|()| self.tokens)
    }

    /// Build a diagnostic from the innermost [`LexerDiagnostic`] of `err`.
    ///
    /// Errors without one are unexpected characters.
    fn convert_err_mode(
        err: ErrMode<ContextError<LexerDiagnostic>>,
        error_pos: usize,
    ) -> Diagnostic {
        let context_error = match err {
            ErrMode::Backtrack(ctx) | ErrMode::Cut(ctx) => ctx,
            ErrMode::Incomplete(_) => ContextError::new(),
        };

        if let Some(LexerDiagnostic {
            code,
            message,
            help,
            start,
        }) = context_error.context().next()
        {
            let span = Span::new(*start..error_pos.max(start + 1));
            let mut diag = Diagnostic::error(*message)
                .with_code(*code)
                .with_label(span, code.description());
            if let Some(help) = help {
                diag = diag.with_help(*help);
            }
            return diag;
        }

        let span = Span::new(error_pos..error_pos.saturating_add(1));
        Diagnostic::error("unexpected character")
            .with_code(ErrorCode::E002)
            .with_label(span, ErrorCode::E002.description())
    }
}

/// Split `input` into tokens, reporting every lexical error found.
pub fn tokenize(input: &str) -> Result<Vec<PositionedToken<'_>>, ParseError> {
    let mut lexer = Lexer::new();
    lexer.tokenize(LocatingSlice::new(input));
    lexer.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn single_token(input: &str) -> Token<'_> {
        let mut located = LocatingSlice::new(input);
        match positioned_token(&mut located) {
            Ok(positioned) => positioned.token,
            Err(err) => panic!("failed to lex {input:?}: {err:?}"),
        }
    }

    fn meaningful(input: &str) -> Vec<Token<'_>> {
        tokenize(input)
            .unwrap()
            .into_iter()
            .map(|t| t.token)
            .filter(|t| !t.is_trivia())
            .collect()
    }

    fn codes(input: &str) -> Vec<ErrorCode> {
        tokenize(input)
            .unwrap_err()
            .diagnostics()
            .iter()
            .filter_map(Diagnostic::code)
            .collect()
    }

    #[test]
    fn test_keywords() {
        assert_eq!(single_token("agent"), Token::Agent);
        assert_eq!(single_token("store"), Token::Store);
        assert_eq!(single_token("user"), Token::User);
        assert_eq!(single_token("as"), Token::As);
        assert_eq!(single_token("note"), Token::Note);
        assert_eq!(single_token("for"), Token::For);
        assert_eq!(single_token("is"), Token::Is);
        assert_eq!(single_token("container"), Token::Container);
    }

    #[test]
    fn test_keyword_word_boundaries() {
        assert_eq!(single_token("agents"), Token::Identifier("agents"));
        assert_eq!(single_token("user_db"), Token::Identifier("user_db"));
        assert_eq!(single_token("island"), Token::Identifier("island"));
        assert_eq!(single_token("format"), Token::Identifier("format"));
        assert_eq!(single_token("color"), Token::Identifier("color"));
    }

    #[test]
    fn test_operators() {
        assert_eq!(single_token("-->"), Token::WriteArrow);
        assert_eq!(single_token("<--"), Token::ReadArrow);
        assert_eq!(single_token("--<"), Token::ResponseArrow);
        assert_eq!(single_token("->"), Token::Arrow);
        assert_eq!(single_token("<-"), Token::LeftArrow);
        assert_eq!(single_token("--"), Token::DoubleDash);
        assert_eq!(single_token("-\\"), Token::AsyncArrow);
        assert_eq!(single_token("-"), Token::Dash);
    }

    #[test]
    fn test_call_shapes() {
        assert_eq!(
            meaningful("aa -('get')-> bb"),
            vec![
                Token::Identifier("aa"),
                Token::Dash,
                Token::LeftParen,
                Token::Text("get".to_owned()),
                Token::RightParen,
                Token::Arrow,
                Token::Identifier("bb"),
            ]
        );
        assert_eq!(
            meaningful("aa --('ok')--< bb"),
            vec![
                Token::Identifier("aa"),
                Token::DoubleDash,
                Token::LeftParen,
                Token::Text("ok".to_owned()),
                Token::RightParen,
                Token::ResponseArrow,
                Token::Identifier("bb"),
            ]
        );
        assert_eq!(
            meaningful("aa <-'rows'- db"),
            vec![
                Token::Identifier("aa"),
                Token::LeftArrow,
                Token::Text("rows".to_owned()),
                Token::Dash,
                Token::Identifier("db"),
            ]
        );
    }

    #[test]
    fn test_text_literals() {
        assert_eq!(single_token("''"), Token::Text(String::new()));
        assert_eq!(
            single_token("'BB (Failure)'"),
            Token::Text("BB (Failure)".to_owned())
        );
        assert_eq!(
            single_token("'cdc:data moved'"),
            Token::Text("cdc:data moved".to_owned())
        );
        assert_eq!(
            single_token("'it\\'s\\n\\tdone \\\\'"),
            Token::Text("it's\n\tdone \\".to_owned())
        );
    }

    #[test]
    fn test_comments_are_trivia() {
        let tokens = tokenize("agent 'A' as a; // the -> gateway\n").unwrap();
        assert!(matches!(
            tokens[tokens.len() - 2].token,
            Token::LineComment(" the -> gateway")
        ));
        assert!(tokens[tokens.len() - 2].is_trivia());
    }

    #[test]
    fn test_token_spans() {
        let tokens = tokenize("note for gw").unwrap();
        assert_eq!(tokens[0].span, Span::new(0..4));
        assert_eq!(tokens[2].span, Span::new(5..8));
        assert_eq!(tokens[4].span, Span::new(9..11));
    }

    #[test]
    fn test_unterminated_text() {
        assert_eq!(codes("agent 'Gateway as gw;\n"), vec![ErrorCode::E001]);
    }

    #[test]
    fn test_invalid_escape_recovers_at_closing_quote() {
        assert_eq!(codes("agent 'a\\qb' as a;"), vec![ErrorCode::E003]);
    }

    #[test]
    fn test_errors_are_collected() {
        let err = tokenize("agent # as a;\nuser $ as u;").unwrap_err();
        assert_eq!(err.diagnostics().len(), 2);
        assert!(
            err.diagnostics()
                .iter()
                .all(|d| d.code() == Some(ErrorCode::E002))
        );
        assert_eq!(err.diagnostics()[0].primary_span(), Some(Span::new(6..7)));
    }
}

#[cfg(test)]
mod proptest_tests {
    use proptest::prelude::*;

    use super::*;

    fn identifier_strategy() -> impl Strategy<Value = String> {
        "[a-zA-Z_][a-zA-Z0-9_]{0,20}".prop_filter("avoid keywords", |s| {
            !matches!(
                s.as_str(),
                "agent" | "store" | "user" | "as" | "note" | "for" | "is" | "container"
            )
        })
    }

    fn text_strategy() -> impl Strategy<Value = String> {
        "[^'\\\\\n\r]{0,30}"
    }

    proptest! {
        #[test]
        fn identifiers_lex_as_one_token(id in identifier_strategy()) {
            let tokens = tokenize(&id).unwrap();
            prop_assert_eq!(tokens.len(), 1);
            prop_assert_eq!(&tokens[0].token, &Token::Identifier(id.as_str()));
        }

        #[test]
        fn plain_text_round_trips(text in text_strategy()) {
            let source = format!("'{text}'");
            let tokens = tokenize(&source).unwrap();
            prop_assert_eq!(tokens.len(), 1);
            prop_assert_eq!(&tokens[0].token, &Token::Text(text));
        }
    }
}
