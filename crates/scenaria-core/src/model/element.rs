//! Model entities: actors, channels, data flows, annotations and containers.

use std::{fmt, str::FromStr};

use indexmap::IndexMap;
use serde::Serialize;

use crate::{
    identifier::Id,
    ids::{channel_id, flow_id},
};

/// The role an actor plays in the architecture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ActorKind {
    /// A running process or service.
    Agent,
    /// An external party, usually a human.
    User,
    /// A holder of persistent state.
    Store,
}

impl ActorKind {
    /// Whether this actor can take part in a channel or be the active side
    /// of a data flow.
    pub fn is_active(self) -> bool {
        matches!(self, Self::Agent | Self::User)
    }

    pub fn is_store(self) -> bool {
        matches!(self, Self::Store)
    }
}

impl fmt::Display for ActorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Agent => write!(f, "agent"),
            Self::User => write!(f, "user"),
            Self::Store => write!(f, "store"),
        }
    }
}

/// Keys an annotation may define and an actor may own.
///
/// The set is closed; the grammar cannot express any other key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PropertyKey {
    Color,
    Prototype,
}

impl PropertyKey {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Color => "color",
            Self::Prototype => "prototype",
        }
    }
}

impl FromStr for PropertyKey {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "color" => Ok(Self::Color),
            "prototype" => Ok(Self::Prototype),
            _ => Err("Unsupported property key"),
        }
    }
}

impl fmt::Display for PropertyKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ordered property bag shared by actors and annotations.
pub type Properties = IndexMap<PropertyKey, String>;

/// A participant in the model: an agent, a user or a store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Actor {
    id: Id,
    kind: ActorKind,
    caption: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    note: Option<String>,
    annotations: Vec<Id>,
    properties: Properties,
    #[serde(skip_serializing_if = "Option::is_none")]
    container: Option<Id>,
}

impl Actor {
    /// Create an actor with no note, annotations, properties or container.
    pub fn new(id: Id, kind: ActorKind, caption: impl Into<String>) -> Self {
        Self {
            id,
            kind,
            caption: caption.into(),
            note: None,
            annotations: Vec::new(),
            properties: Properties::new(),
            container: None,
        }
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }

    pub fn with_annotations(mut self, annotations: impl IntoIterator<Item = Id>) -> Self {
        self.annotations.extend(annotations);
        self
    }

    /// Give the actor its own property; annotation resolution never overrides it.
    pub fn with_property(mut self, key: PropertyKey, value: impl Into<String>) -> Self {
        self.properties.insert(key, value.into());
        self
    }

    pub fn with_container(mut self, container: Option<Id>) -> Self {
        self.container = container;
        self
    }

    /// Replace the actor's note.
    pub fn set_note(&mut self, note: impl Into<String>) {
        self.note = Some(note.into());
    }

    /// Append annotation references, keeping their order.
    pub fn push_annotations(&mut self, annotations: impl IntoIterator<Item = Id>) {
        self.annotations.extend(annotations);
    }

    pub fn id(&self) -> Id {
        self.id
    }

    pub fn kind(&self) -> ActorKind {
        self.kind
    }

    pub fn caption(&self) -> &str {
        &self.caption
    }

    pub fn note(&self) -> Option<&str> {
        self.note.as_deref()
    }

    /// Referenced annotation ids in reference order.
    pub fn annotations(&self) -> &[Id] {
        &self.annotations
    }

    pub fn properties(&self) -> &Properties {
        &self.properties
    }

    pub fn property(&self, key: PropertyKey) -> Option<&str> {
        self.properties.get(&key).map(String::as_str)
    }

    /// Id of the immediately enclosing container, `None` when top-level.
    pub fn container(&self) -> Option<Id> {
        self.container
    }

    /// Insert `value` under `key` unless the actor already owns that key.
    ///
    /// Returns `true` when the property was inserted.
    pub(crate) fn merge_property(&mut self, key: PropertyKey, value: &str) -> bool {
        if self.properties.contains_key(&key) {
            return false;
        }
        self.properties.insert(key, value.to_owned());
        true
    }
}

/// Communication style of a channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChannelKind {
    /// Synchronous request/response.
    #[serde(rename = "req_res")]
    RequestResponse,
    /// Fire-and-forget.
    Async,
}

impl ChannelKind {
    /// Tag used in derived channel ids.
    pub fn tag(self) -> &'static str {
        match self {
            Self::RequestResponse => "req_res",
            Self::Async => "async",
        }
    }
}

impl fmt::Display for ChannelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// A directed communication channel between two active actors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Channel {
    id: Id,
    kind: ChannelKind,
    from: Id,
    to: Id,
    text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    container: Option<Id>,
}

impl Channel {
    /// Create a channel; its id is derived from `(kind, from, to)`.
    pub fn new(kind: ChannelKind, from: Id, to: Id, text: impl Into<String>) -> Self {
        Self {
            id: channel_id(kind, from, to),
            kind,
            from,
            to,
            text: text.into(),
            container: None,
        }
    }

    pub fn with_container(mut self, container: Option<Id>) -> Self {
        self.container = container;
        self
    }

    pub fn id(&self) -> Id {
        self.id
    }

    pub fn kind(&self) -> ChannelKind {
        self.kind
    }

    pub fn from(&self) -> Id {
        self.from
    }

    pub fn to(&self) -> Id {
        self.to
    }

    /// Label text; empty when the channel is unlabeled.
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn label(&self) -> Option<&str> {
        (!self.text.is_empty()).then_some(self.text.as_str())
    }

    pub fn container(&self) -> Option<Id> {
        self.container
    }
}

/// Direction of a data flow relative to its store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DataFlowKind {
    /// Data leaves a store towards an agent or user.
    Read,
    /// Data goes from an agent or user into a store.
    Write,
}

impl DataFlowKind {
    pub fn tag(self) -> &'static str {
        match self {
            Self::Read => "read",
            Self::Write => "write",
        }
    }
}

impl fmt::Display for DataFlowKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// A read or write between an active actor and a store.
///
/// For [`DataFlowKind::Write`] `to` is the store; for [`DataFlowKind::Read`]
/// `from` is the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DataFlow {
    id: Id,
    kind: DataFlowKind,
    from: Id,
    to: Id,
    #[serde(skip_serializing_if = "Option::is_none")]
    container: Option<Id>,
}

impl DataFlow {
    pub fn new(kind: DataFlowKind, from: Id, to: Id) -> Self {
        Self {
            id: flow_id(kind, from, to),
            kind,
            from,
            to,
            container: None,
        }
    }

    pub fn with_container(mut self, container: Option<Id>) -> Self {
        self.container = container;
        self
    }

    pub fn id(&self) -> Id {
        self.id
    }

    pub fn kind(&self) -> DataFlowKind {
        self.kind
    }

    pub fn from(&self) -> Id {
        self.from
    }

    pub fn to(&self) -> Id {
        self.to
    }

    /// The store side of the flow.
    pub fn store(&self) -> Id {
        match self.kind {
            DataFlowKind::Read => self.from,
            DataFlowKind::Write => self.to,
        }
    }

    pub fn container(&self) -> Option<Id> {
        self.container
    }
}

/// A named, reusable bundle of properties.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Annotation {
    id: Id,
    properties: Properties,
    #[serde(skip_serializing_if = "Option::is_none")]
    container: Option<Id>,
}

impl Annotation {
    pub fn new(id: Id, properties: Properties) -> Self {
        Self {
            id,
            properties,
            container: None,
        }
    }

    pub fn with_container(mut self, container: Option<Id>) -> Self {
        self.container = container;
        self
    }

    pub fn id(&self) -> Id {
        self.id
    }

    pub fn properties(&self) -> &Properties {
        &self.properties
    }

    pub fn property(&self, key: PropertyKey) -> Option<&str> {
        self.properties.get(&key).map(String::as_str)
    }

    pub fn container(&self) -> Option<Id> {
        self.container
    }
}

/// Member ids of a container, grouped by entity kind.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Members {
    pub actors: Vec<Id>,
    pub channels: Vec<Id>,
    pub data_flows: Vec<Id>,
    pub annotations: Vec<Id>,
    pub containers: Vec<Id>,
}

impl Members {
    pub fn is_empty(&self) -> bool {
        self.actors.is_empty()
            && self.channels.is_empty()
            && self.data_flows.is_empty()
            && self.annotations.is_empty()
            && self.containers.is_empty()
    }
}

/// A named grouping of entities. Containers nest to form a tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Container {
    id: Id,
    name: String,
    #[serde(flatten)]
    members: Members,
    #[serde(skip_serializing_if = "Option::is_none")]
    container: Option<Id>,
}

impl Container {
    pub fn new(id: Id, name: impl Into<String>, members: Members) -> Self {
        Self {
            id,
            name: name.into(),
            members,
            container: None,
        }
    }

    pub fn with_container(mut self, container: Option<Id>) -> Self {
        self.container = container;
        self
    }

    pub fn id(&self) -> Id {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn members(&self) -> &Members {
        &self.members
    }

    pub fn actors(&self) -> &[Id] {
        &self.members.actors
    }

    pub fn channels(&self) -> &[Id] {
        &self.members.channels
    }

    pub fn data_flows(&self) -> &[Id] {
        &self.members.data_flows
    }

    pub fn annotations(&self) -> &[Id] {
        &self.members.annotations
    }

    /// Ids of the containers nested directly inside this one.
    pub fn containers(&self) -> &[Id] {
        &self.members.containers
    }

    /// Id of the parent container, `None` when top-level.
    pub fn container(&self) -> Option<Id> {
        self.container
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channel_id_ignores_text() {
        let first = Channel::new(ChannelKind::RequestResponse, "a".into(), "b".into(), "one");
        let second = Channel::new(ChannelKind::RequestResponse, "a".into(), "b".into(), "two");
        assert_eq!(first.id(), second.id());
        assert_eq!(first.label(), Some("one"));
    }

    #[test]
    fn test_unlabeled_channel() {
        let channel = Channel::new(ChannelKind::Async, "a".into(), "b".into(), "");
        assert_eq!(channel.text(), "");
        assert_eq!(channel.label(), None);
    }

    #[test]
    fn test_data_flow_store_side() {
        let write = DataFlow::new(DataFlowKind::Write, "a".into(), "db".into());
        let read = DataFlow::new(DataFlowKind::Read, "db".into(), "a".into());
        assert_eq!(write.store(), "db");
        assert_eq!(read.store(), "db");
        assert_ne!(write.id(), read.id());
    }

    #[test]
    fn test_merge_property_keeps_existing() {
        let mut actor = Actor::new("vi".into(), ActorKind::Agent, "Vizzini")
            .with_property(PropertyKey::Color, "black");

        assert!(!actor.merge_property(PropertyKey::Color, "red"));
        assert!(actor.merge_property(PropertyKey::Prototype, "villain"));
        assert_eq!(actor.property(PropertyKey::Color), Some("black"));
        assert_eq!(actor.property(PropertyKey::Prototype), Some("villain"));
    }

    #[test]
    fn test_property_key_from_str() {
        assert_eq!("color".parse::<PropertyKey>(), Ok(PropertyKey::Color));
        assert_eq!("prototype".parse::<PropertyKey>(), Ok(PropertyKey::Prototype));
        assert!("shape".parse::<PropertyKey>().is_err());
    }

    #[test]
    fn test_actor_kind_roles() {
        assert!(ActorKind::Agent.is_active());
        assert!(ActorKind::User.is_active());
        assert!(!ActorKind::Store.is_active());
        assert!(ActorKind::Store.is_store());
    }
}
