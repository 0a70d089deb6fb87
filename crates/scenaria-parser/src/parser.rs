//! Parser for Scenaria source tokens.
//!
//! This module turns the token stream from the [`lexer`](super::lexer) into
//! the syntax tree defined in [`parser_types`](super::parser_types). Parsing
//! has no side effects: any syntax error is reported before semantic actions
//! run. The public entry point is [`build_program`].
//!
//! Every statement form starts with a distinguishing prefix (a keyword, an
//! operator after the first identifier, a text literal). Once that prefix is
//! seen the parser commits, so errors point at the construct being written
//! instead of at the start of the statement.

use winnow::{
    Parser as _,
    combinator::{alt, opt, repeat, separated, terminated},
    error::{ContextError, ErrMode},
    stream::{Stream, TokenSlice},
    token::any,
};

use scenaria_core::{
    identifier::Id,
    model::{ActorKind, ChannelKind, DataFlowKind, PropertyKey},
};

use crate::{
    error::{Diagnostic, ErrorCode},
    parser_types::{
        ActorDecl, AnnotationDef, Assignment, Call, ContainerDef, Flow, NoteDecl, Program,
        Property, ScenarioDef, Statement, Step,
    },
    span::{Span, Spanned},
    tokens::{PositionedToken, Token},
};

/// Context attached to parser errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Context {
    /// What the parser expected at the failure point.
    Label(&'static str),
    /// Remaining token count (`eof_offset()`) where the failing construct starts.
    StartOffset(usize),
}

type Input<'src> = TokenSlice<'src, PositionedToken<'src>>;
type IResult<O> = std::result::Result<O, ErrMode<ContextError<Context>>>;

/// Run `f` committed to the current construct.
///
/// Any failure becomes a cut error remembering `start`, so alternatives are
/// not retried and the diagnostic span begins at the construct.
fn committed<'src, O, F>(input: &mut Input<'src>, start: usize, f: F) -> IResult<O>
where
    F: FnOnce(&mut Input<'src>) -> IResult<O>,
{
    match f(input) {
        Ok(o) => Ok(o),
        Err(ErrMode::Backtrack(mut e)) | Err(ErrMode::Cut(mut e)) => {
            e.push(Context::StartOffset(start));
            Err(ErrMode::Cut(e))
        }
        Err(e) => Err(e),
    }
}

fn ws_comment<'src>(input: &mut Input<'src>) -> IResult<()> {
    any.verify(|token: &PositionedToken<'_>| token.is_trivia())
        .void()
        .parse_next(input)
}

fn ws_comments0<'src>(input: &mut Input<'src>) -> IResult<()> {
    repeat(0.., ws_comment).parse_next(input)
}

/// Parse exactly `expected` after optional trivia, returning its span.
fn punct<'src>(
    expected: Token<'static>,
    label: &'static str,
) -> impl FnMut(&mut Input<'src>) -> IResult<Span> {
    move |input: &mut Input<'src>| {
        ws_comments0.parse_next(input)?;
        any.verify_map(|token: &PositionedToken<'_>| {
            (token.token == expected).then_some(token.span)
        })
        .context(Context::Label(label))
        .parse_next(input)
    }
}

fn semicolon<'src>(input: &mut Input<'src>) -> IResult<Span> {
    punct(Token::Semicolon, "`;`").parse_next(input)
}

/// A `;` that must follow a program-level statement.
fn required_semicolon<'src>(input: &mut Input<'src>) -> IResult<Span> {
    let start = input.eof_offset();
    committed(input, start, semicolon)
}

fn identifier<'src>(input: &mut Input<'src>) -> IResult<Spanned<Id>> {
    ws_comments0.parse_next(input)?;
    any.verify_map(|token: &PositionedToken<'_>| match &token.token {
        Token::Identifier(name) => Some(Spanned::new(Id::new(name), token.span)),
        _ => None,
    })
    .context(Context::Label("identifier"))
    .parse_next(input)
}

fn text<'src>(input: &mut Input<'src>) -> IResult<Spanned<String>> {
    ws_comments0.parse_next(input)?;
    any.verify_map(|token: &PositionedToken<'_>| match &token.token {
        Token::Text(text) => Some(Spanned::new(text.clone(), token.span)),
        _ => None,
    })
    .context(Context::Label("text literal"))
    .parse_next(input)
}

fn actor_kind<'src>(input: &mut Input<'src>) -> IResult<Spanned<ActorKind>> {
    ws_comments0.parse_next(input)?;
    any.verify_map(|token: &PositionedToken<'_>| {
        let kind = match token.token {
            Token::Agent => ActorKind::Agent,
            Token::Store => ActorKind::Store,
            Token::User => ActorKind::User,
            _ => return None,
        };
        Some(Spanned::new(kind, token.span))
    })
    .parse_next(input)
}

/// `->` or `-\`
fn channel_arrow<'src>(input: &mut Input<'src>) -> IResult<ChannelKind> {
    ws_comments0.parse_next(input)?;
    any.verify_map(|token: &PositionedToken<'_>| match token.token {
        Token::Arrow => Some(ChannelKind::RequestResponse),
        Token::AsyncArrow => Some(ChannelKind::Async),
        _ => None,
    })
    .context(Context::Label("`->` or `-\\`"))
    .parse_next(input)
}

/// `-->` or `<--`
fn flow_arrow<'src>(input: &mut Input<'src>) -> IResult<DataFlowKind> {
    ws_comments0.parse_next(input)?;
    any.verify_map(|token: &PositionedToken<'_>| match token.token {
        Token::WriteArrow => Some(DataFlowKind::Write),
        Token::ReadArrow => Some(DataFlowKind::Read),
        _ => None,
    })
    .parse_next(input)
}

/// Property keys are plain identifiers restricted to the closed key set.
fn property_key<'src>(input: &mut Input<'src>) -> IResult<Spanned<PropertyKey>> {
    ws_comments0.parse_next(input)?;
    any.verify_map(|token: &PositionedToken<'_>| match &token.token {
        Token::Identifier(name) => name
            .parse::<PropertyKey>()
            .ok()
            .map(|key| Spanned::new(key, token.span)),
        _ => None,
    })
    .context(Context::Label("property key `color` or `prototype`"))
    .parse_next(input)
}

/// `@Name`
fn annotation_ref<'src>(input: &mut Input<'src>) -> IResult<Spanned<Id>> {
    punct(Token::At, "`@`").parse_next(input)?;
    identifier
        .context(Context::Label("annotation name"))
        .parse_next(input)
}

/// `is @A, @B`
fn is_clause<'src>(input: &mut Input<'src>) -> IResult<Vec<Spanned<Id>>> {
    let start = input.eof_offset();
    punct(Token::Is, "`is`").parse_next(input)?;
    committed(input, start, |input| {
        separated(1.., annotation_ref, punct(Token::Comma, "`,`")).parse_next(input)
    })
}

/// `agent 'Caption' as id [is @A, ...]`
fn actor_decl<'src>(input: &mut Input<'src>) -> IResult<Spanned<Statement>> {
    let start = input.eof_offset();
    let kind = actor_kind.parse_next(input)?;

    committed(input, start, |input| {
        let caption = text
            .context(Context::Label("actor caption"))
            .parse_next(input)?;
        punct(Token::As, "`as`").parse_next(input)?;
        let id = identifier
            .context(Context::Label("actor identifier"))
            .parse_next(input)?;
        let annotations = opt(is_clause).parse_next(input)?.unwrap_or_default();

        let end = annotations.last().map_or(id.span(), Spanned::span);
        let span = kind.span().union(end);
        Ok(Spanned::new(
            Statement::Actor(ActorDecl {
                kind,
                caption,
                id,
                annotations,
            }),
            span,
        ))
    })
}

/// `note for id: 'text'`
fn note_decl<'src>(input: &mut Input<'src>) -> IResult<Spanned<Statement>> {
    let start = input.eof_offset();
    let keyword = punct(Token::Note, "`note`").parse_next(input)?;

    committed(input, start, |input| {
        punct(Token::For, "`for`").parse_next(input)?;
        let target = identifier.parse_next(input)?;
        punct(Token::Colon, "`:`").parse_next(input)?;
        let content = text
            .context(Context::Label("note text"))
            .parse_next(input)?;

        let span = keyword.union(content.span());
        Ok(Spanned::new(
            Statement::Note(NoteDecl {
                target,
                text: content,
            }),
            span,
        ))
    })
}

/// `id is @A, @B`
fn assignment<'src>(input: &mut Input<'src>) -> IResult<Spanned<Statement>> {
    let target = identifier.parse_next(input)?;
    let annotations = is_clause.parse_next(input)?;

    let end = annotations.last().map_or(target.span(), Spanned::span);
    let span = target.span().union(end);
    Ok(Spanned::new(
        Statement::Assignment(Assignment {
            target,
            annotations,
        }),
        span,
    ))
}

/// `from -('label')-> to` or `from -('label')-\ to`
fn call<'src>(input: &mut Input<'src>) -> IResult<Spanned<Statement>> {
    let start = input.eof_offset();
    let from = identifier.parse_next(input)?;
    punct(Token::Dash, "`-`").parse_next(input)?;
    punct(Token::LeftParen, "`(`").parse_next(input)?;

    committed(input, start, |input| {
        let label = opt(text).parse_next(input)?;
        punct(Token::RightParen, "`)`").parse_next(input)?;
        let kind = channel_arrow.parse_next(input)?;
        let to = identifier
            .context(Context::Label("channel target"))
            .parse_next(input)?;

        let span = from.span().union(to.span());
        Ok(Spanned::new(
            Statement::Call(Call {
                kind,
                from,
                to,
                text: label,
            }),
            span,
        ))
    })
}

/// `left --> right` or `left <-- right`
fn flow<'src>(input: &mut Input<'src>) -> IResult<Spanned<Statement>> {
    let start = input.eof_offset();
    let left = identifier.parse_next(input)?;
    let kind = flow_arrow.parse_next(input)?;

    committed(input, start, |input| {
        let right = identifier
            .context(Context::Label("data flow target"))
            .parse_next(input)?;

        let span = left.span().union(right.span());
        Ok(Spanned::new(Statement::Flow(Flow { kind, left, right }), span))
    })
}

/// `color: 'red'`
fn property<'src>(input: &mut Input<'src>) -> IResult<Property> {
    let start = input.eof_offset();
    let key = property_key.parse_next(input)?;

    committed(input, start, |input| {
        punct(Token::Colon, "`:`").parse_next(input)?;
        let value = text
            .context(Context::Label("property value"))
            .parse_next(input)?;
        Ok(Property { key, value })
    })
}

/// `@Name { property; ... }`
fn annotation_def<'src>(input: &mut Input<'src>) -> IResult<Spanned<Statement>> {
    let start = input.eof_offset();
    let at = punct(Token::At, "`@`").parse_next(input)?;

    committed(input, start, |input| {
        let id = identifier
            .context(Context::Label("annotation name"))
            .parse_next(input)?;
        punct(Token::LeftBrace, "`{`").parse_next(input)?;
        let properties: Vec<Property> =
            repeat(0.., terminated(property, opt(semicolon))).parse_next(input)?;
        let close = punct(Token::RightBrace, "property or `}`").parse_next(input)?;

        Ok(Spanned::new(
            Statement::Annotation(AnnotationDef { id, properties }),
            at.union(close),
        ))
    })
}

/// Statements inside `{ ... }`, where `;` is optional.
fn block_statements<'src>(input: &mut Input<'src>) -> IResult<Vec<Spanned<Statement>>> {
    repeat(0.., terminated(statement, opt(semicolon))).parse_next(input)
}

/// `container 'Name' as id { statements }`
fn container_def<'src>(input: &mut Input<'src>) -> IResult<Spanned<Statement>> {
    let start = input.eof_offset();
    let keyword = punct(Token::Container, "`container`").parse_next(input)?;

    committed(input, start, |input| {
        let name = text
            .context(Context::Label("container name"))
            .parse_next(input)?;
        punct(Token::As, "`as`").parse_next(input)?;
        let id = identifier
            .context(Context::Label("container identifier"))
            .parse_next(input)?;
        punct(Token::LeftBrace, "`{`").parse_next(input)?;
        let body = block_statements.parse_next(input)?;
        let close = punct(Token::RightBrace, "statement or `}`").parse_next(input)?;

        Ok(Spanned::new(
            Statement::Container(ContainerDef { name, id, body }),
            keyword.union(close),
        ))
    })
}

/// `from -('msg')-> to` or `from -('msg')-\ to`
fn request_step<'src>(input: &mut Input<'src>) -> IResult<Spanned<Step>> {
    let start = input.eof_offset();
    let from = identifier.parse_next(input)?;
    punct(Token::Dash, "`-`").parse_next(input)?;
    punct(Token::LeftParen, "`(`").parse_next(input)?;

    committed(input, start, |input| {
        let message = opt(text).parse_next(input)?;
        punct(Token::RightParen, "`)`").parse_next(input)?;
        let kind = channel_arrow.parse_next(input)?;
        let to = identifier.parse_next(input)?;

        let span = from.span().union(to.span());
        Ok(Spanned::new(
            Step::Request {
                kind,
                from,
                to,
                message,
            },
            span,
        ))
    })
}

/// `from --('msg')--< to`
fn response_step<'src>(input: &mut Input<'src>) -> IResult<Spanned<Step>> {
    let start = input.eof_offset();
    let from = identifier.parse_next(input)?;
    punct(Token::DoubleDash, "`--`").parse_next(input)?;

    committed(input, start, |input| {
        punct(Token::LeftParen, "`(`").parse_next(input)?;
        let message = opt(text).parse_next(input)?;
        punct(Token::RightParen, "`)`").parse_next(input)?;
        punct(Token::ResponseArrow, "`--<`").parse_next(input)?;
        let to = identifier.parse_next(input)?;

        let span = from.span().union(to.span());
        Ok(Spanned::new(Step::Response { from, to, message }, span))
    })
}

/// `left -'msg'-> right`
fn write_step<'src>(input: &mut Input<'src>) -> IResult<Spanned<Step>> {
    let start = input.eof_offset();
    let left = identifier.parse_next(input)?;
    punct(Token::Dash, "`-`").parse_next(input)?;
    let message = text.parse_next(input)?;

    committed(input, start, |input| {
        punct(Token::Arrow, "`->`").parse_next(input)?;
        let right = identifier.parse_next(input)?;

        let span = left.span().union(right.span());
        Ok(Spanned::new(
            Step::Data {
                kind: DataFlowKind::Write,
                left,
                right,
                message,
            },
            span,
        ))
    })
}

/// `left <-'msg'- right`
fn read_step<'src>(input: &mut Input<'src>) -> IResult<Spanned<Step>> {
    let start = input.eof_offset();
    let left = identifier.parse_next(input)?;
    punct(Token::LeftArrow, "`<-`").parse_next(input)?;

    committed(input, start, |input| {
        let message = text
            .context(Context::Label("step message"))
            .parse_next(input)?;
        punct(Token::Dash, "`-`").parse_next(input)?;
        let right = identifier.parse_next(input)?;

        let span = left.span().union(right.span());
        Ok(Spanned::new(
            Step::Data {
                kind: DataFlowKind::Read,
                left,
                right,
                message,
            },
            span,
        ))
    })
}

fn step<'src>(input: &mut Input<'src>) -> IResult<Spanned<Step>> {
    alt((request_step, write_step, response_step, read_step)).parse_next(input)
}

/// `'Name' { steps }`
fn scenario_def<'src>(input: &mut Input<'src>) -> IResult<Spanned<Statement>> {
    let start = input.eof_offset();
    let name = text.parse_next(input)?;

    committed(input, start, |input| {
        punct(Token::LeftBrace, "`{` opening the scenario").parse_next(input)?;
        let steps: Vec<Spanned<Step>> =
            repeat(0.., terminated(step, opt(semicolon))).parse_next(input)?;
        let close = punct(Token::RightBrace, "scenario step or `}`").parse_next(input)?;

        let span = name.span().union(close);
        Ok(Spanned::new(
            Statement::Scenario(ScenarioDef { name, steps }),
            span,
        ))
    })
}

fn statement<'src>(input: &mut Input<'src>) -> IResult<Spanned<Statement>> {
    alt((
        actor_decl,
        note_decl,
        container_def,
        annotation_def,
        scenario_def,
        assignment,
        call,
        flow,
    ))
    .parse_next(input)
}

fn program<'src>(input: &mut Input<'src>) -> IResult<Vec<Spanned<Statement>>> {
    let statements: Vec<Spanned<Statement>> =
        repeat(0.., terminated(statement, required_semicolon)).parse_next(input)?;

    ws_comments0.parse_next(input)?;
    if input.eof_offset() > 0 {
        let mut e = ContextError::new();
        e.push(Context::Label("statement"));
        e.push(Context::StartOffset(input.eof_offset()));
        return Err(ErrMode::Cut(e));
    }

    Ok(statements)
}

/// Union of the spans of the non-trivia tokens in `tokens`.
fn meaningful_span(tokens: &[PositionedToken<'_>]) -> Option<Span> {
    let mut meaningful = tokens.iter().filter(|t| !t.is_trivia());
    let first = meaningful.next()?.span;
    let last = meaningful.next_back().map_or(first, |t| t.span);
    Some(first.union(last))
}

fn convert_error(
    error: ErrMode<ContextError<Context>>,
    tokens: &[PositionedToken<'_>],
    current_remaining: usize,
) -> Diagnostic {
    let context = match error {
        ErrMode::Backtrack(e) | ErrMode::Cut(e) => e,
        ErrMode::Incomplete(_) => ContextError::new(),
    };

    let end_offset = tokens.len() - current_remaining;
    let start_offset = context
        .context()
        .find_map(|ctx| match ctx {
            Context::StartOffset(remaining) => Some(tokens.len() - remaining),
            Context::Label(_) => None,
        })
        .unwrap_or(end_offset)
        .min(end_offset);

    let expected: Vec<String> = context
        .context()
        .filter_map(|ctx| match ctx {
            Context::Label(label) => Some(format!("expected {label}")),
            Context::StartOffset(_) => None,
        })
        .collect();
    let expected = if expected.is_empty() {
        "expected statement".to_string()
    } else {
        expected.join(" → ")
    };

    let offending = tokens[end_offset..].iter().find(|t| !t.is_trivia());

    match offending {
        Some(token) => {
            let consumed = meaningful_span(&tokens[start_offset..end_offset]);
            let span = consumed.map_or(token.span, |span| span.union(token.span));

            Diagnostic::error(format!("unexpected token `{}`: {expected}", token.token))
                .with_code(ErrorCode::E100)
                .with_label(span, ErrorCode::E100.description())
                .with_help("check the statement syntax near this token")
        }
        None => {
            let span = meaningful_span(&tokens[start_offset..end_offset])
                .or_else(|| meaningful_span(tokens))
                .unwrap_or_default();

            Diagnostic::error(format!("incomplete input: {expected}"))
                .with_code(ErrorCode::E101)
                .with_label(span, ErrorCode::E101.description())
                .with_help("the source ended before this construct was complete")
        }
    }
}

/// Build the syntax tree of a whole source file.
pub fn build_program<'src>(tokens: &'src [PositionedToken<'src>]) -> Result<Program, Diagnostic> {
    let mut token_slice = TokenSlice::new(tokens);

    match program.parse_next(&mut token_slice) {
        Ok(statements) => Ok(Program {
            statements,
            span: meaningful_span(tokens).unwrap_or_default(),
        }),
        Err(e) => {
            let current_remaining = token_slice.eof_offset();
            Err(convert_error(e, tokens, current_remaining))
        }
    }
}
