//! Annotation resolution.
//!
//! Actors reference annotations by id. Resolution copies the properties of
//! every referenced annotation onto the actor, without ever replacing a
//! property the actor already has. Because of that rule the actor's own
//! properties always win, and for a key defined by several annotations the
//! one referenced first wins.

use log::{trace, warn};

use crate::model::SystemModel;

/// Merge annotation properties into every actor of `model`.
///
/// Running it again on an already resolved model changes nothing.
/// References to undefined annotations are skipped.
pub fn resolve_annotations(model: &mut SystemModel) {
    let annotations = model.annotations().clone();

    for actor in model.actors_mut() {
        let references = actor.annotations().to_vec();
        for reference in references {
            let Some(annotation) = annotations.get(&reference) else {
                warn!(actor:% = actor.id(), annotation:% = reference; "Skipping undefined annotation");
                continue;
            };

            for (key, value) in annotation.properties() {
                if actor.merge_property(*key, value) {
                    trace!(actor:% = actor.id(), key = key.as_str(); "Applied annotation property");
                }
            }
        }
    }
}
