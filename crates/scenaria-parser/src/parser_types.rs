//! Syntax tree produced by the [`parser`](super::parser).
//!
//! The tree mirrors the surface syntax one-to-one: every statement form of
//! the language is a [`Statement`] variant and every scenario step form is a
//! [`Step`] variant. Names and texts keep their spans so later phases can
//! point diagnostics at them.

use scenaria_core::{
    identifier::Id,
    model::{ActorKind, ChannelKind, DataFlowKind, PropertyKey},
};

use crate::span::{Span, Spanned};

/// `agent 'Caption' as id is @A, @B`
#[derive(Debug, Clone, PartialEq)]
pub struct ActorDecl {
    pub kind: Spanned<ActorKind>,
    pub caption: Spanned<String>,
    pub id: Spanned<Id>,
    pub annotations: Vec<Spanned<Id>>,
}

/// `note for id: 'text'`
#[derive(Debug, Clone, PartialEq)]
pub struct NoteDecl {
    pub target: Spanned<Id>,
    pub text: Spanned<String>,
}

/// `id is @A, @B`
#[derive(Debug, Clone, PartialEq)]
pub struct Assignment {
    pub target: Spanned<Id>,
    pub annotations: Vec<Spanned<Id>>,
}

/// `from -('label')-> to` or `from -('label')-\ to`
#[derive(Debug, Clone, PartialEq)]
pub struct Call {
    pub kind: ChannelKind,
    pub from: Spanned<Id>,
    pub to: Spanned<Id>,
    pub text: Option<Spanned<String>>,
}

/// `left --> right` (write) or `left <-- right` (read).
///
/// Operands are kept in source order; which of them must be the store
/// depends on `kind`.
#[derive(Debug, Clone, PartialEq)]
pub struct Flow {
    pub kind: DataFlowKind,
    pub left: Spanned<Id>,
    pub right: Spanned<Id>,
}

/// `color: 'red'`
#[derive(Debug, Clone, PartialEq)]
pub struct Property {
    pub key: Spanned<PropertyKey>,
    pub value: Spanned<String>,
}

/// `@Name { color: 'red'; prototype: 'db' }`
#[derive(Debug, Clone, PartialEq)]
pub struct AnnotationDef {
    pub id: Spanned<Id>,
    pub properties: Vec<Property>,
}

/// `container 'Name' as id { ... }`
#[derive(Debug, Clone, PartialEq)]
pub struct ContainerDef {
    pub name: Spanned<String>,
    pub id: Spanned<Id>,
    pub body: Vec<Spanned<Statement>>,
}

/// `'Scenario name' { steps }`
#[derive(Debug, Clone, PartialEq)]
pub struct ScenarioDef {
    pub name: Spanned<String>,
    pub steps: Vec<Spanned<Step>>,
}

/// A statement at program level or inside a container body.
#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    Actor(ActorDecl),
    Note(NoteDecl),
    Assignment(Assignment),
    Call(Call),
    Flow(Flow),
    Annotation(AnnotationDef),
    Container(ContainerDef),
    Scenario(ScenarioDef),
}

/// One step of a scenario.
#[derive(Debug, Clone, PartialEq)]
pub enum Step {
    /// `from -('msg')-> to` or `from -('msg')-\ to`
    Request {
        kind: ChannelKind,
        from: Spanned<Id>,
        to: Spanned<Id>,
        message: Option<Spanned<String>>,
    },
    /// `from --('msg')--< to`, answering an earlier `from -(...)-> to`.
    Response {
        from: Spanned<Id>,
        to: Spanned<Id>,
        message: Option<Spanned<String>>,
    },
    /// `left -'msg'-> right` (write) or `left <-'msg'- right` (read).
    Data {
        kind: DataFlowKind,
        left: Spanned<Id>,
        right: Spanned<Id>,
        message: Spanned<String>,
    },
}

/// A parsed source file.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Program {
    pub statements: Vec<Spanned<Statement>>,
    pub span: Span,
}
