//! Elaboration of the syntax tree into a [`SystemModel`].
//!
//! The [`Builder`] walks the program statement by statement, validates every
//! reference against the symbol tables in its [`ParseContext`] and registers
//! the resulting entities. The first semantic error aborts the whole parse;
//! there is no partial model.

use log::{debug, info, trace, warn};

use scenaria_core::{
    annotations::resolve_annotations,
    identifier::Id,
    ids::{channel_id, flow_id},
    model::{
        self, Actor, Annotation, Channel, ChannelKind, Container, DataFlow, DataFlowKind,
        Properties, Scenario, StepKind, SystemModel,
    },
};

use crate::{
    context::{MemberRef, ParseContext},
    error::{Diagnostic, ErrorCode, Result},
    parser_types::{
        self, ActorDecl, AnnotationDef, Assignment, Call, ContainerDef, Flow, NoteDecl, Program,
        ScenarioDef, Statement,
    },
    span::Spanned,
};

const CHANNEL_HELP: &str = "channels connect agents and users; use `-->` to write to a store";
const WRITE_HELP: &str = "a write goes from an agent or user into a store: `actor --> store`";
const READ_HELP: &str = "a read goes from a store to an agent or user: `store <-- actor`";

/// What happens when an actor, annotation or container id is declared twice.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Redeclaration {
    /// The later declaration replaces the earlier one.
    #[default]
    Replace,
    /// A second declaration is an error.
    Reject,
}

/// Configuration for the elaboration phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ElaborateConfig {
    /// Merge annotation properties into actors after assembly.
    pub resolve_annotations: bool,
    /// Policy for re-declared ids.
    pub redeclaration: Redeclaration,
}

impl ElaborateConfig {
    pub fn new(resolve_annotations: bool, redeclaration: Redeclaration) -> Self {
        Self {
            resolve_annotations,
            redeclaration,
        }
    }
}

impl Default for ElaborateConfig {
    fn default() -> Self {
        Self::new(true, Redeclaration::default())
    }
}

pub struct Builder {
    cfg: ElaborateConfig,
    ctx: ParseContext,
}

impl Builder {
    pub fn new(cfg: ElaborateConfig) -> Self {
        Self {
            cfg,
            ctx: ParseContext::new(),
        }
    }

    // ============================================================================
    // Main Entry Methods
    // ============================================================================

    pub fn build(mut self, program: &Program) -> Result<SystemModel> {
        debug!(statements = program.statements.len(); "Elaborating program");
        self.elaborate_statements(&program.statements)?;

        let Self { cfg, ctx } = self;
        let mut model = ctx.into_model("");
        if cfg.resolve_annotations {
            debug!("Resolving annotations");
            resolve_annotations(&mut model);
        }

        info!(
            actors = model.actors().len(),
            channels = model.channels().len(),
            data_flows = model.data_flows().len(),
            scenarios = model.scenarios().len(),
            containers = model.containers().len();
            "Model assembled",
        );
        Ok(model)
    }

    fn elaborate_statements(&mut self, statements: &[Spanned<Statement>]) -> Result<()> {
        statements
            .iter()
            .try_for_each(|statement| self.elaborate_statement(statement))
    }

    fn elaborate_statement(&mut self, statement: &Spanned<Statement>) -> Result<()> {
        match statement.inner() {
            Statement::Actor(decl) => self.declare_actor(decl),
            Statement::Note(note) => self.attach_note(note),
            Statement::Assignment(assignment) => self.assign_annotations(assignment),
            Statement::Call(call) => self.declare_channel(call),
            Statement::Flow(flow) => self.declare_data_flow(flow),
            Statement::Annotation(def) => self.define_annotation(def),
            Statement::Container(def) => self.define_container(def),
            Statement::Scenario(def) => self.build_scenario(def),
        }
    }

    // ============================================================================
    // Declarations
    // ============================================================================

    fn declare_actor(&mut self, decl: &ActorDecl) -> Result<()> {
        let id = *decl.id.inner();
        self.check_redeclaration(
            &decl.id,
            &[MemberRef::Actor(id), MemberRef::Container(id)],
            "actor",
        )?;

        let actor = Actor::new(id, *decl.kind.inner(), decl.caption.inner().as_str())
            .with_annotations(decl.annotations.iter().map(|reference| *reference.inner()));
        debug!(actor:% = id, kind:% = actor.kind(); "Declared actor");

        if self.ctx.insert_actor(actor, decl.id.span()) {
            warn!(actor:% = id; "Replacing earlier actor declaration");
        }
        Ok(())
    }

    fn attach_note(&mut self, note: &NoteDecl) -> Result<()> {
        let actor = self.actor_mut(&note.target)?;
        if actor.note().is_some() {
            trace!(actor:% = actor.id(); "Replacing note");
        }
        actor.set_note(note.text.inner().as_str());
        Ok(())
    }

    fn assign_annotations(&mut self, assignment: &Assignment) -> Result<()> {
        let actor = self.actor_mut(&assignment.target)?;
        actor.push_annotations(
            assignment
                .annotations
                .iter()
                .map(|reference| *reference.inner()),
        );
        trace!(actor:% = actor.id(), count = assignment.annotations.len(); "Assigned annotations");
        Ok(())
    }

    fn declare_channel(&mut self, call: &Call) -> Result<()> {
        let from = self.active_endpoint(&call.from, CHANNEL_HELP)?;
        let to = self.active_endpoint(&call.to, CHANNEL_HELP)?;
        let text = call.text.as_ref().map_or("", |text| text.inner().as_str());

        let channel = Channel::new(call.kind, from, to, text);
        let id = channel.id();
        debug!(channel:% = id; "Declared channel");
        if self.ctx.insert_channel(channel) {
            warn!(channel:% = id; "Replacing earlier channel declaration");
        }
        Ok(())
    }

    fn declare_data_flow(&mut self, flow: &Flow) -> Result<()> {
        let (from, to) = self.flow_endpoints(flow.kind, &flow.left, &flow.right)?;

        let data_flow = DataFlow::new(flow.kind, from, to);
        let id = data_flow.id();
        debug!(data_flow:% = id; "Declared data flow");
        if self.ctx.insert_data_flow(data_flow) {
            warn!(data_flow:% = id; "Replacing earlier data flow declaration");
        }
        Ok(())
    }

    fn define_annotation(&mut self, def: &AnnotationDef) -> Result<()> {
        let id = *def.id.inner();
        self.check_redeclaration(&def.id, &[MemberRef::Annotation(id)], "annotation")?;

        let properties: Properties = def
            .properties
            .iter()
            .map(|property| (*property.key.inner(), property.value.inner().clone()))
            .collect();
        debug!(annotation:% = id, properties = properties.len(); "Defined annotation");

        if self
            .ctx
            .insert_annotation(Annotation::new(id, properties), def.id.span())
        {
            warn!(annotation:% = id; "Replacing earlier annotation definition");
        }
        Ok(())
    }

    fn define_container(&mut self, def: &ContainerDef) -> Result<()> {
        let id = *def.id.inner();
        self.check_redeclaration(
            &def.id,
            &[MemberRef::Container(id), MemberRef::Actor(id)],
            "container",
        )?;

        debug!(container:% = id; "Entering container");
        self.ctx.enter_container(id, def.id.span());
        self.elaborate_statements(&def.body)?;
        let members = self.ctx.leave_container();
        trace!(container:% = id, actors = members.actors.len(); "Leaving container");

        let container = Container::new(id, def.name.inner().as_str(), members);
        if self.ctx.insert_container(container, def.id.span()) {
            warn!(container:% = id; "Replacing earlier container definition");
        }
        Ok(())
    }

    // ============================================================================
    // Scenarios
    // ============================================================================

    fn build_scenario(&mut self, def: &ScenarioDef) -> Result<()> {
        let steps = def
            .steps
            .iter()
            .map(|step| self.build_step(step))
            .collect::<Result<Vec<_>>>()?;

        debug!(scenario = def.name.inner().as_str(), steps = steps.len(); "Built scenario");
        self.ctx.push_scenario(Scenario::new(def.name.inner().as_str(), steps));
        Ok(())
    }

    fn build_step(&mut self, step: &Spanned<parser_types::Step>) -> Result<model::Step> {
        match step.inner() {
            parser_types::Step::Request {
                kind,
                from,
                to,
                message,
            } => {
                let from = self.active_endpoint(from, CHANNEL_HELP)?;
                let to = self.active_endpoint(to, CHANNEL_HELP)?;

                let id = channel_id(*kind, from, to);
                if !self.ctx.contains_channel(id) {
                    trace!(channel:% = id; "Creating channel for scenario step");
                    self.ctx.insert_channel(Channel::new(*kind, from, to, ""));
                }
                Ok(model::Step::new(StepKind::Req, id, optional_message(message)))
            }
            parser_types::Step::Response { from, to, message } => {
                let requester = self.active_endpoint(from, CHANNEL_HELP)?;
                let responder = self.active_endpoint(to, CHANNEL_HELP)?;

                let id = channel_id(ChannelKind::RequestResponse, requester, responder);
                if !self.ctx.contains_channel(id) {
                    return Err(Diagnostic::error(format!(
                        "response without a prior request from `{requester}` to `{responder}`"
                    ))
                    .with_code(ErrorCode::E202)
                    .with_label(step.span(), "no request/response channel to answer on")
                    .with_help(format!(
                        "add a request step `{requester} -('...')-> {responder}` before this \
                         response, or declare that channel"
                    )));
                }
                Ok(model::Step::new(StepKind::Res, id, optional_message(message)))
            }
            parser_types::Step::Data {
                kind,
                left,
                right,
                message,
            } => {
                let (from, to) = self.flow_endpoints(*kind, left, right)?;

                let id = flow_id(*kind, from, to);
                if !self.ctx.contains_data_flow(id) {
                    trace!(data_flow:% = id; "Creating data flow for scenario step");
                    self.ctx.insert_data_flow(DataFlow::new(*kind, from, to));
                }
                let step_kind = match kind {
                    DataFlowKind::Read => StepKind::DataRead,
                    DataFlowKind::Write => StepKind::DataWrite,
                };
                Ok(model::Step::new(step_kind, id, message.inner().as_str()))
            }
        }
    }

    // ============================================================================
    // Validation Helpers
    // ============================================================================

    fn check_redeclaration(
        &self,
        id: &Spanned<Id>,
        existing: &[MemberRef],
        what: &str,
    ) -> Result<()> {
        if self.cfg.redeclaration == Redeclaration::Replace {
            return Ok(());
        }
        let Some(first) = existing
            .iter()
            .find_map(|member| self.ctx.definition(*member))
        else {
            return Ok(());
        };

        Err(
            Diagnostic::error(format!("duplicate definition of {what} `{}`", id.inner()))
                .with_code(ErrorCode::E301)
                .with_label(id.span(), "defined again here")
                .with_secondary_label(first, "first defined here")
                .with_help("rename one of the definitions"),
        )
    }

    fn actor(&self, id: &Spanned<Id>) -> Result<&Actor> {
        let key = *id.inner();
        self.ctx
            .actor(key)
            .ok_or_else(|| missing_actor(id, self.ctx.is_container(key)))
    }

    fn actor_mut(&mut self, id: &Spanned<Id>) -> Result<&mut Actor> {
        let key = *id.inner();
        let is_container = self.ctx.is_container(key);
        self.ctx
            .actor_mut(key)
            .ok_or_else(|| missing_actor(id, is_container))
    }

    /// An agent or user that can take part in a channel or drive a data flow.
    fn active_endpoint(&self, id: &Spanned<Id>, help: &str) -> Result<Id> {
        let actor = self.actor(id)?;
        if actor.kind().is_active() {
            return Ok(actor.id());
        }
        Err(
            Diagnostic::error(format!("invalid endpoint: `{}` is a store", actor.id()))
                .with_code(ErrorCode::E201)
                .with_label(id.span(), "expected an agent or user")
                .with_help(help),
        )
    }

    fn store_endpoint(&self, id: &Spanned<Id>, help: &str) -> Result<Id> {
        let actor = self.actor(id)?;
        if actor.kind().is_store() {
            return Ok(actor.id());
        }
        Err(Diagnostic::error(format!(
            "invalid endpoint: `{}` is {} {}, not a store",
            actor.id(),
            article(actor.kind()),
            actor.kind()
        ))
        .with_code(ErrorCode::E201)
        .with_label(id.span(), "expected a store")
        .with_help(help))
    }

    /// Validate the operands of a data flow and return its `(from, to)`.
    ///
    /// The left operand is always `from`: the actor for a write, the store
    /// for a read.
    fn flow_endpoints(
        &self,
        kind: DataFlowKind,
        left: &Spanned<Id>,
        right: &Spanned<Id>,
    ) -> Result<(Id, Id)> {
        match kind {
            DataFlowKind::Write => Ok((
                self.active_endpoint(left, WRITE_HELP)?,
                self.store_endpoint(right, WRITE_HELP)?,
            )),
            DataFlowKind::Read => Ok((
                self.store_endpoint(left, READ_HELP)?,
                self.active_endpoint(right, READ_HELP)?,
            )),
        }
    }
}

fn missing_actor(id: &Spanned<Id>, is_container: bool) -> Diagnostic {
    if is_container {
        Diagnostic::error(format!("`{}` is a container, not an actor", id.inner()))
            .with_code(ErrorCode::E203)
            .with_label(id.span(), "container used where an actor is expected")
    } else {
        Diagnostic::error(format!("undefined identifier `{}`", id.inner()))
            .with_code(ErrorCode::E200)
            .with_label(id.span(), "not declared")
            .with_help("declare it first, e.g. `agent 'Name' as id;`")
    }
}

fn article(kind: model::ActorKind) -> &'static str {
    match kind {
        model::ActorKind::Agent => "an",
        model::ActorKind::User | model::ActorKind::Store => "a",
    }
}

fn optional_message(message: &Option<Spanned<String>>) -> &str {
    message
        .as_ref()
        .map_or("", |message| message.inner().as_str())
}
