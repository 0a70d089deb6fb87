//! Tokens produced by the [`lexer`](super::lexer).

use std::fmt;

use winnow::stream::Location;

use crate::span::Span;

/// Tokens of the Scenaria language.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token<'src> {
    // Keywords
    Agent,
    Store,
    User,
    As,
    Note,
    For,
    Is,
    Container,

    // Literals
    /// A single-quoted text literal with escapes already resolved.
    Text(String),
    Identifier(&'src str),

    // Operators
    WriteArrow,    // -->
    ReadArrow,     // <--
    ResponseArrow, // --<
    Arrow,         // ->
    LeftArrow,     // <-
    DoubleDash,    // --
    AsyncArrow,    // -\
    Dash,          // -

    // Punctuation
    LeftParen,  // (
    RightParen, // )
    LeftBrace,  // {
    RightBrace, // }
    At,         // @
    Colon,      // :
    Semicolon,  // ;
    Comma,      // ,

    LineComment(&'src str),
    Whitespace,
    Newline,
}

impl Token<'_> {
    /// Whether the parser skips this token between meaningful ones.
    pub fn is_trivia(&self) -> bool {
        matches!(
            self,
            Token::Whitespace | Token::Newline | Token::LineComment(_)
        )
    }
}

/// A token with the span it was lexed from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PositionedToken<'src> {
    pub token: Token<'src>,
    pub span: Span,
}

impl<'src> PositionedToken<'src> {
    pub fn new(token: Token<'src>, span: Span) -> Self {
        Self { token, span }
    }
}

impl<'src> std::ops::Deref for PositionedToken<'src> {
    type Target = Token<'src>;

    fn deref(&self) -> &Self::Target {
        &self.token
    }
}

impl fmt::Display for PositionedToken<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.token.fmt(f)
    }
}

impl Location for PositionedToken<'_> {
    fn previous_token_end(&self) -> usize {
        self.span.start()
    }

    fn current_token_start(&self) -> usize {
        self.span.start()
    }
}

impl fmt::Display for Token<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Agent => write!(f, "agent"),
            Token::Store => write!(f, "store"),
            Token::User => write!(f, "user"),
            Token::As => write!(f, "as"),
            Token::Note => write!(f, "note"),
            Token::For => write!(f, "for"),
            Token::Is => write!(f, "is"),
            Token::Container => write!(f, "container"),

            Token::Text(text) => write!(f, "'{text}'"),
            Token::Identifier(name) => write!(f, "{name}"),

            Token::WriteArrow => write!(f, "-->"),
            Token::ReadArrow => write!(f, "<--"),
            Token::ResponseArrow => write!(f, "--<"),
            Token::Arrow => write!(f, "->"),
            Token::LeftArrow => write!(f, "<-"),
            Token::DoubleDash => write!(f, "--"),
            Token::AsyncArrow => write!(f, "-\\"),
            Token::Dash => write!(f, "-"),

            Token::LeftParen => write!(f, "("),
            Token::RightParen => write!(f, ")"),
            Token::LeftBrace => write!(f, "{{"),
            Token::RightBrace => write!(f, "}}"),
            Token::At => write!(f, "@"),
            Token::Colon => write!(f, ":"),
            Token::Semicolon => write!(f, ";"),
            Token::Comma => write!(f, ","),

            Token::LineComment(comment) => write!(f, "//{comment}"),
            Token::Whitespace => write!(f, " "),
            Token::Newline => write!(f, "\\n"),
        }
    }
}
