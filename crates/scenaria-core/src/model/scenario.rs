//! Scenarios: named, ordered walks over the static model.

use std::fmt;

use serde::Serialize;

use crate::identifier::Id;

/// Message shown for a step written without text.
pub const EMPTY_MESSAGE: &str = "--";

/// What a scenario step does on its relationship.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StepKind {
    /// A request travelling over a channel.
    Req,
    /// The response to an earlier request on a request/response channel.
    Res,
    /// Data read from a store.
    DataRead,
    /// Data written to a store.
    DataWrite,
}

impl fmt::Display for StepKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Req => write!(f, "req"),
            Self::Res => write!(f, "res"),
            Self::DataRead => write!(f, "data_read"),
            Self::DataWrite => write!(f, "data_write"),
        }
    }
}

/// One step of a scenario.
///
/// `relation` is the id of the channel or data flow the step runs over.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Step {
    kind: StepKind,
    #[serde(rename = "channel")]
    relation: Id,
    message: String,
}

impl Step {
    /// Create a step; an empty message becomes [`EMPTY_MESSAGE`].
    pub fn new(kind: StepKind, relation: Id, message: impl Into<String>) -> Self {
        let message = message.into();
        let message = if message.is_empty() {
            EMPTY_MESSAGE.to_owned()
        } else {
            message
        };
        Self {
            kind,
            relation,
            message,
        }
    }

    pub fn kind(&self) -> StepKind {
        self.kind
    }

    pub fn relation(&self) -> Id {
        self.relation
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// A named sequence of steps.
///
/// Several scenarios may share a name, so scenarios are kept in a list rather
/// than keyed by name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Scenario {
    name: String,
    steps: Vec<Step>,
}

impl Scenario {
    pub fn new(name: impl Into<String>, steps: Vec<Step>) -> Self {
        Self {
            name: name.into(),
            steps,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_message_placeholder() {
        let step = Step::new(StepKind::Req, Id::new("aa-req_res->bb"), "");
        assert_eq!(step.message(), EMPTY_MESSAGE);

        let step = Step::new(StepKind::Res, Id::new("aa-req_res->bb"), "ok");
        assert_eq!(step.message(), "ok");
    }
}
