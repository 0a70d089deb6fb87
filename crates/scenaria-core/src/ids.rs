//! Deterministic identifiers for channels and data flows.
//!
//! A relationship's id depends only on its kind and its ordered endpoints,
//! never on its label. Declarations and scenario steps that describe the same
//! relationship therefore land on the same id, which is how re-declarations
//! replace earlier ones and how scenario steps reuse existing relationships.
//!
//! Actor identifiers only contain `[A-Za-z0-9_]`, so the separators used here
//! keep derived ids unambiguous.

use crate::{
    identifier::Id,
    model::{ChannelKind, DataFlowKind},
};

/// Id of the channel of `kind` going from `from` to `to`.
///
/// ```
/// use scenaria_core::{ids::channel_id, identifier::Id, model::ChannelKind};
///
/// let id = channel_id(ChannelKind::RequestResponse, Id::new("aa"), Id::new("bb"));
/// assert_eq!(id, "aa-req_res->bb");
/// ```
pub fn channel_id(kind: ChannelKind, from: Id, to: Id) -> Id {
    Id::new(&format!("{from}-{}->{to}", kind.tag()))
}

/// Id of the data flow of `kind` going from `from` to `to`.
///
/// ```
/// use scenaria_core::{ids::flow_id, identifier::Id, model::DataFlowKind};
///
/// let id = flow_id(DataFlowKind::Write, Id::new("a"), Id::new("db"));
/// assert_eq!(id, "write:a->db");
/// ```
pub fn flow_id(kind: DataFlowKind, from: Id, to: Id) -> Id {
    Id::new(&format!("{}:{from}->{to}", kind.tag()))
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn test_channel_id_depends_on_kind() {
        let (a, b) = (Id::new("a"), Id::new("b"));
        assert_ne!(
            channel_id(ChannelKind::RequestResponse, a, b),
            channel_id(ChannelKind::Async, a, b)
        );
    }

    #[test]
    fn test_flow_id_depends_on_kind() {
        let (a, s) = (Id::new("a"), Id::new("s"));
        assert_ne!(
            flow_id(DataFlowKind::Write, a, s),
            flow_id(DataFlowKind::Read, a, s)
        );
    }

    fn identifier_strategy() -> impl Strategy<Value = String> {
        "[A-Za-z_][A-Za-z0-9_]{0,12}"
    }

    proptest! {
        #[test]
        fn channel_ids_are_deterministic(a in identifier_strategy(), b in identifier_strategy()) {
            let (from, to) = (Id::new(&a), Id::new(&b));
            prop_assert_eq!(
                channel_id(ChannelKind::Async, from, to),
                channel_id(ChannelKind::Async, from, to)
            );
        }

        #[test]
        fn channel_ids_are_directional(a in identifier_strategy(), b in identifier_strategy()) {
            prop_assume!(a != b);
            let (from, to) = (Id::new(&a), Id::new(&b));
            prop_assert_ne!(
                channel_id(ChannelKind::RequestResponse, from, to),
                channel_id(ChannelKind::RequestResponse, to, from)
            );
        }

        #[test]
        fn flow_ids_are_directional(a in identifier_strategy(), b in identifier_strategy()) {
            prop_assume!(a != b);
            let (from, to) = (Id::new(&a), Id::new(&b));
            prop_assert_ne!(
                flow_id(DataFlowKind::Write, from, to),
                flow_id(DataFlowKind::Write, to, from)
            );
        }
    }
}
