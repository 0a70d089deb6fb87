//! Symbol tables filled while elaborating a program.
//!
//! A [`ParseContext`] is created fresh for every parse and owned by the
//! [`Builder`](crate::elaborate::Builder); nothing survives between parses.
//!
//! Containment is built in two phases. While a container body is being
//! elaborated, every entity registered at that level is recorded in an open
//! frame. When the container itself is registered, its members are taken from
//! that frame and the membership map points each of them at the container.
//! Back-references are only written into the entities during
//! [`ParseContext::into_model`], so a re-declaration elsewhere simply moves
//! the entity instead of leaving a stale reference behind.

use std::collections::HashMap;

use indexmap::IndexMap;

use scenaria_core::{
    identifier::Id,
    model::{Actor, Annotation, Channel, Container, DataFlow, Members, Scenario, SystemModel},
};

use crate::span::Span;

/// Key of an entity that can be a container member.
///
/// Each kind has its own id space, so the kind is part of the key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum MemberRef {
    Actor(Id),
    Channel(Id),
    DataFlow(Id),
    Annotation(Id),
    Container(Id),
}

#[derive(Debug, Default)]
pub(crate) struct ParseContext {
    actors: IndexMap<Id, Actor>,
    channels: IndexMap<Id, Channel>,
    data_flows: IndexMap<Id, DataFlow>,
    annotations: IndexMap<Id, Annotation>,
    containers: IndexMap<Id, Container>,
    scenarios: Vec<Scenario>,
    /// Immediate enclosing container of every contained entity.
    membership: IndexMap<MemberRef, Id>,
    /// Entities registered so far in each container body being elaborated.
    open_frames: Vec<Vec<MemberRef>>,
    /// Span of the first definition of actors, annotations and containers.
    definitions: HashMap<MemberRef, Span>,
}

impl ParseContext {
    pub fn new() -> Self {
        Self::default()
    }

    // ============================================================================
    // Lookups
    // ============================================================================

    pub fn actor(&self, id: Id) -> Option<&Actor> {
        self.actors.get(&id)
    }

    pub fn actor_mut(&mut self, id: Id) -> Option<&mut Actor> {
        self.actors.get_mut(&id)
    }

    pub fn is_container(&self, id: Id) -> bool {
        self.containers.contains_key(&id)
    }

    pub fn contains_channel(&self, id: Id) -> bool {
        self.channels.contains_key(&id)
    }

    pub fn contains_data_flow(&self, id: Id) -> bool {
        self.data_flows.contains_key(&id)
    }

    /// Where `member` was first defined, if it has been defined at all.
    pub fn definition(&self, member: MemberRef) -> Option<Span> {
        self.definitions.get(&member).copied()
    }

    // ============================================================================
    // Registration
    // ============================================================================

    /// Register an actor, replacing any earlier actor with the same id.
    ///
    /// Returns `true` when an earlier actor was replaced.
    pub fn insert_actor(&mut self, actor: Actor, span: Span) -> bool {
        let id = actor.id();
        self.define(MemberRef::Actor(id), span);
        self.place(MemberRef::Actor(id));
        self.actors.insert(id, actor).is_some()
    }

    /// Register a channel, replacing any earlier channel with the same id.
    pub fn insert_channel(&mut self, channel: Channel) -> bool {
        let id = channel.id();
        self.place(MemberRef::Channel(id));
        self.channels.insert(id, channel).is_some()
    }

    /// Register a data flow, replacing any earlier flow with the same id.
    pub fn insert_data_flow(&mut self, flow: DataFlow) -> bool {
        let id = flow.id();
        self.place(MemberRef::DataFlow(id));
        self.data_flows.insert(id, flow).is_some()
    }

    /// Register an annotation, replacing any earlier annotation with the same id.
    pub fn insert_annotation(&mut self, annotation: Annotation, span: Span) -> bool {
        let id = annotation.id();
        self.define(MemberRef::Annotation(id), span);
        self.place(MemberRef::Annotation(id));
        self.annotations.insert(id, annotation).is_some()
    }

    pub fn push_scenario(&mut self, scenario: Scenario) {
        self.scenarios.push(scenario);
    }

    // ============================================================================
    // Containment
    // ============================================================================

    /// Start recording the members of the body of container `id`.
    ///
    /// The container counts as defined from here on, so its own body cannot
    /// silently reuse its id.
    pub fn enter_container(&mut self, id: Id, span: Span) {
        self.define(MemberRef::Container(id), span);
        self.open_frames.push(Vec::new());
    }

    /// Stop recording the current container body and return its members
    /// grouped by kind, in registration order.
    pub fn leave_container(&mut self) -> Members {
        let frame = self.open_frames.pop().unwrap_or_default();

        let mut members = Members::default();
        for member in frame {
            match member {
                MemberRef::Actor(id) => members.actors.push(id),
                MemberRef::Channel(id) => members.channels.push(id),
                MemberRef::DataFlow(id) => members.data_flows.push(id),
                MemberRef::Annotation(id) => members.annotations.push(id),
                MemberRef::Container(id) => members.containers.push(id),
            }
        }
        members
    }

    /// Register a container whose body has been elaborated and make it the
    /// immediate container of all its members.
    ///
    /// Returns `true` when an earlier container with the same id was replaced.
    /// Members of the replaced container that are not members of the new one
    /// become top-level.
    pub fn insert_container(&mut self, container: Container, span: Span) -> bool {
        let id = container.id();
        self.define(MemberRef::Container(id), span);

        self.membership.retain(|_, parent| *parent != id);
        let members = container.members();
        let children = members
            .actors
            .iter()
            .map(|&child| MemberRef::Actor(child))
            .chain(members.channels.iter().map(|&child| MemberRef::Channel(child)))
            .chain(members.data_flows.iter().map(|&child| MemberRef::DataFlow(child)))
            .chain(members.annotations.iter().map(|&child| MemberRef::Annotation(child)))
            .chain(members.containers.iter().map(|&child| MemberRef::Container(child)));
        for child in children {
            self.membership.insert(child, id);
        }

        self.place(MemberRef::Container(id));
        self.containers.insert(id, container).is_some()
    }

    fn define(&mut self, member: MemberRef, span: Span) {
        self.definitions.entry(member).or_insert(span);
    }

    /// Put `member` at the current nesting level.
    ///
    /// An entity lives where it was last registered, so it is first removed
    /// from any enclosing container it was recorded in before.
    fn place(&mut self, member: MemberRef) {
        self.membership.shift_remove(&member);
        for frame in &mut self.open_frames {
            frame.retain(|recorded| *recorded != member);
        }
        if let Some(frame) = self.open_frames.last_mut() {
            frame.push(member);
        }
    }

    // ============================================================================
    // Assembly
    // ============================================================================

    /// Assemble the model from the tables, in declaration order.
    ///
    /// Every entity gets its container back-reference from the membership map
    /// and member lists keep only entities whose immediate container is the
    /// listing container.
    pub fn into_model(self, name: &str) -> SystemModel {
        let Self {
            actors,
            channels,
            data_flows,
            annotations,
            containers,
            scenarios,
            membership,
            ..
        } = self;

        let parent = |member: MemberRef| membership.get(&member).copied();

        let actors = actors
            .into_values()
            .map(|actor| {
                let container = parent(MemberRef::Actor(actor.id()));
                actor.with_container(container)
            })
            .collect();
        let channels = channels
            .into_values()
            .map(|channel| {
                let container = parent(MemberRef::Channel(channel.id()));
                channel.with_container(container)
            })
            .collect();
        let data_flows = data_flows
            .into_values()
            .map(|flow| {
                let container = parent(MemberRef::DataFlow(flow.id()));
                flow.with_container(container)
            })
            .collect();
        let annotations = annotations
            .into_iter()
            .map(|(id, annotation)| {
                let container = parent(MemberRef::Annotation(id));
                (id, annotation.with_container(container))
            })
            .collect();
        let containers = containers
            .into_iter()
            .map(|(id, container)| {
                let owned_by = |member: MemberRef| parent(member) == Some(id);
                let members = container.members();
                let members = Members {
                    actors: retain_ids(&members.actors, MemberRef::Actor, &owned_by),
                    channels: retain_ids(&members.channels, MemberRef::Channel, &owned_by),
                    data_flows: retain_ids(&members.data_flows, MemberRef::DataFlow, &owned_by),
                    annotations: retain_ids(&members.annotations, MemberRef::Annotation, &owned_by),
                    containers: retain_ids(&members.containers, MemberRef::Container, &owned_by),
                };
                let assembled = Container::new(id, container.name(), members)
                    .with_container(parent(MemberRef::Container(id)));
                (id, assembled)
            })
            .collect();

        SystemModel::new(
            name,
            actors,
            channels,
            data_flows,
            scenarios,
            annotations,
            containers,
        )
    }
}

fn retain_ids(
    ids: &[Id],
    member: fn(Id) -> MemberRef,
    owned_by: &impl Fn(MemberRef) -> bool,
) -> Vec<Id> {
    ids.iter()
        .copied()
        .filter(|&id| owned_by(member(id)))
        .collect()
}

#[cfg(test)]
mod tests {
    use scenaria_core::model::{ActorKind, ChannelKind};

    use super::*;

    fn agent(id: &str) -> Actor {
        Actor::new(Id::new(id), ActorKind::Agent, id)
    }

    fn span() -> Span {
        Span::new(0..1)
    }

    #[test]
    fn test_container_members_and_back_references() {
        let mut ctx = ParseContext::new();
        ctx.enter_container(Id::new("c"), span());
        ctx.insert_actor(agent("a"), span());
        ctx.insert_actor(agent("b"), span());
        ctx.insert_channel(Channel::new(
            ChannelKind::Async,
            Id::new("a"),
            Id::new("b"),
            "",
        ));
        let members = ctx.leave_container();
        ctx.insert_container(Container::new(Id::new("c"), "C", members), span());
        ctx.insert_actor(agent("top"), span());

        let model = ctx.into_model("");
        let container = model.container(Id::new("c")).unwrap();
        assert_eq!(container.actors(), &[Id::new("a"), Id::new("b")]);
        assert_eq!(container.channels().len(), 1);
        assert_eq!(model.actor(Id::new("a")).unwrap().container(), Some(Id::new("c")));
        assert_eq!(model.actor(Id::new("top")).unwrap().container(), None);
        assert_eq!(model.channels()[0].container(), Some(Id::new("c")));
    }

    #[test]
    fn test_redeclaration_moves_actor_out_of_container() {
        let mut ctx = ParseContext::new();
        ctx.enter_container(Id::new("c"), span());
        ctx.insert_actor(agent("a"), span());
        let members = ctx.leave_container();
        ctx.insert_container(Container::new(Id::new("c"), "C", members), span());

        assert!(ctx.insert_actor(agent("a"), Span::new(5..6)));

        let model = ctx.into_model("");
        assert!(model.container(Id::new("c")).unwrap().actors().is_empty());
        assert_eq!(model.actor(Id::new("a")).unwrap().container(), None);
    }

    #[test]
    fn test_redeclaration_inside_nested_container() {
        let mut ctx = ParseContext::new();
        ctx.enter_container(Id::new("outer"), span());
        ctx.insert_actor(agent("a"), span());
        ctx.enter_container(Id::new("inner"), span());
        ctx.insert_actor(agent("a"), span());
        let inner = ctx.leave_container();
        ctx.insert_container(Container::new(Id::new("inner"), "Inner", inner), span());
        let outer = ctx.leave_container();
        ctx.insert_container(Container::new(Id::new("outer"), "Outer", outer), span());

        let model = ctx.into_model("");
        let outer = model.container(Id::new("outer")).unwrap();
        assert!(outer.actors().is_empty());
        assert_eq!(outer.containers(), &[Id::new("inner")]);
        assert_eq!(model.actor(Id::new("a")).unwrap().container(), Some(Id::new("inner")));
        assert_eq!(
            model.container(Id::new("inner")).unwrap().container(),
            Some(Id::new("outer"))
        );
    }

    #[test]
    fn test_first_definition_span_is_kept() {
        let mut ctx = ParseContext::new();
        ctx.insert_actor(agent("a"), Span::new(0..3));
        ctx.insert_actor(agent("a"), Span::new(10..13));
        assert_eq!(ctx.definition(MemberRef::Actor(Id::new("a"))), Some(Span::new(0..3)));
        assert_eq!(ctx.definition(MemberRef::Container(Id::new("a"))), None);
    }

    #[test]
    fn test_container_is_defined_before_its_body() {
        let mut ctx = ParseContext::new();
        ctx.enter_container(Id::new("c"), Span::new(13..14));
        assert_eq!(ctx.definition(MemberRef::Container(Id::new("c"))), Some(Span::new(13..14)));

        let members = ctx.leave_container();
        ctx.insert_container(Container::new(Id::new("c"), "C", members), Span::new(40..41));
        assert_eq!(ctx.definition(MemberRef::Container(Id::new("c"))), Some(Span::new(13..14)));
    }
}
