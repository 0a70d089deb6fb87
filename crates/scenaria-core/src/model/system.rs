//! The assembled system model handed to layout and rendering.

use indexmap::IndexMap;
use serde::Serialize;

use crate::{
    identifier::Id,
    model::{Actor, Annotation, Channel, Container, DataFlow, Scenario},
};

/// The complete IR produced by compiling a Scenaria source.
///
/// Actors, channels and data flows keep declaration order. Annotations and
/// containers are keyed by id, also in declaration order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SystemModel {
    name: String,
    actors: Vec<Actor>,
    channels: Vec<Channel>,
    data_flows: Vec<DataFlow>,
    scenarios: Vec<Scenario>,
    annotations: IndexMap<Id, Annotation>,
    containers: IndexMap<Id, Container>,
}

impl SystemModel {
    pub fn new(
        name: impl Into<String>,
        actors: Vec<Actor>,
        channels: Vec<Channel>,
        data_flows: Vec<DataFlow>,
        scenarios: Vec<Scenario>,
        annotations: IndexMap<Id, Annotation>,
        containers: IndexMap<Id, Container>,
    ) -> Self {
        Self {
            name: name.into(),
            actors,
            channels,
            data_flows,
            scenarios,
            annotations,
            containers,
        }
    }

    /// Rename the model, e.g. after the file it was compiled from.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn actors(&self) -> &[Actor] {
        &self.actors
    }

    pub(crate) fn actors_mut(&mut self) -> &mut [Actor] {
        &mut self.actors
    }

    pub fn channels(&self) -> &[Channel] {
        &self.channels
    }

    pub fn data_flows(&self) -> &[DataFlow] {
        &self.data_flows
    }

    pub fn scenarios(&self) -> &[Scenario] {
        &self.scenarios
    }

    pub fn annotations(&self) -> &IndexMap<Id, Annotation> {
        &self.annotations
    }

    pub fn containers(&self) -> &IndexMap<Id, Container> {
        &self.containers
    }

    pub fn actor(&self, id: Id) -> Option<&Actor> {
        self.actors.iter().find(|actor| actor.id() == id)
    }

    pub fn channel(&self, id: Id) -> Option<&Channel> {
        self.channels.iter().find(|channel| channel.id() == id)
    }

    pub fn data_flow(&self, id: Id) -> Option<&DataFlow> {
        self.data_flows.iter().find(|flow| flow.id() == id)
    }

    pub fn annotation(&self, id: Id) -> Option<&Annotation> {
        self.annotations.get(&id)
    }

    pub fn container(&self, id: Id) -> Option<&Container> {
        self.containers.get(&id)
    }

    /// Actors that are not inside any container.
    pub fn top_level_actors(&self) -> impl Iterator<Item = &Actor> {
        self.actors
            .iter()
            .filter(|actor| actor.container().is_none())
    }

    /// Containers that are not nested inside another container.
    pub fn top_level_containers(&self) -> impl Iterator<Item = &Container> {
        self.containers
            .values()
            .filter(|container| container.container().is_none())
    }
}
