//! Handler resolution.
//!
//! Turns an instructor, its model's payload variants, and the bound view's
//! method surface into three tables: update actions (one per variant), the
//! initial-bind sequence, and tag handlers. Every lookup goes through an
//! ordered index, so the same input always resolves the same way.

mod index;


use crate::{
    diag::{Diagnostic, DiagnosticSink},
    naming,
    node::{InstructorDescriptor, ViewSurface},
    taxonomy::PayloadVariant,
};
use diffbind_core::dispatch::{Action, HandlerArg};
use index::HandlerIndex;
use tracing::debug;

///
/// Resolution
///

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Resolution {
    /// `(variant name, action)` in taxonomy order, one per variant.
    pub updates: Vec<(String, Action)>,

    /// Initial-bind actions in taxonomy order; unresolved leaves are absent.
    pub initial: Vec<Action>,

    /// `(tag type key, handler)` in method declaration order.
    pub tags: Vec<(String, String)>,

    /// Variants whose update entry resolved to a no-op.
    pub misses: Vec<String>,
}

/// Resolve every table for one instructor. Update-path misses are reported
/// to `sink` as warnings; initial-bind misses are silent.
pub fn resolve(
    instructor: &InstructorDescriptor,
    variants: &[PayloadVariant],
    view: &ViewSurface,
    sink: &mut dyn DiagnosticSink,
) -> Resolution {
    let handlers = HandlerIndex::new(instructor);
    let mut resolution = Resolution::default();

    for variant in variants {
        let action = match resolve_update(instructor, &handlers, view, variant) {
            Some(action) => action,
            None => {
                let setter = naming::method_key(
                    &instructor.setter_prefix,
                    &variant.leaf_name,
                    &instructor.suffix,
                );
                sink.report(Diagnostic::warning(
                    &instructor.key,
                    format!(
                        "no handler or `{setter}` view method for `{}`; `{}` is ignored",
                        variant.path, variant.name
                    ),
                ));
                resolution.misses.push(variant.name.clone());

                Action::NoOp
            }
        };
        resolution.updates.push((variant.name.clone(), action));

        if let Some(action) = resolve_initial(instructor, &handlers, view, variant) {
            resolution.initial.push(action);
        }
    }

    resolution.tags = instructor
        .tags()
        .map(|(handler, tag)| (tag.to_string(), handler.to_string()))
        .collect();

    debug!(
        instructor = %instructor.key,
        updates = resolution.updates.len(),
        initial = resolution.initial.len(),
        tags = resolution.tags.len(),
        misses = resolution.misses.len(),
        "resolved dispatch tables"
    );

    resolution
}

// Update path: single-field no-arg, single-field bool(false), multi-field,
// then the `<prefix><Leaf><suffix>` setter with matching nullability.
fn resolve_update(
    instructor: &InstructorDescriptor,
    handlers: &HandlerIndex<'_>,
    view: &ViewSurface,
    variant: &PayloadVariant,
) -> Option<Action> {
    let leaf = variant.leaf_name.as_str();

    handlers
        .no_arg(leaf)
        .map(|h| Action::handler(h, HandlerArg::None))
        .or_else(|| {
            handlers
                .legacy_bool(leaf)
                .map(|h| Action::handler(h, HandlerArg::Bool(false)))
        })
        .or_else(|| handlers.multi(leaf).map(|h| Action::handler(h, HandlerArg::None)))
        .or_else(|| view_method(view, &instructor.setter_prefix, &instructor.suffix, variant))
}

// Initial path: same handler precedence with bool(true), then the binder,
// then the setter.
fn resolve_initial(
    instructor: &InstructorDescriptor,
    handlers: &HandlerIndex<'_>,
    view: &ViewSurface,
    variant: &PayloadVariant,
) -> Option<Action> {
    let leaf = variant.leaf_name.as_str();

    handlers
        .no_arg(leaf)
        .map(|h| Action::handler(h, HandlerArg::None))
        .or_else(|| {
            handlers
                .legacy_bool(leaf)
                .map(|h| Action::handler(h, HandlerArg::Bool(true)))
        })
        .or_else(|| handlers.multi(leaf).map(|h| Action::handler(h, HandlerArg::None)))
        .or_else(|| view_method(view, &instructor.bind_prefix, &instructor.suffix, variant))
        .or_else(|| view_method(view, &instructor.setter_prefix, &instructor.suffix, variant))
}

fn view_method(
    view: &ViewSurface,
    prefix: &str,
    suffix: &str,
    variant: &PayloadVariant,
) -> Option<Action> {
    let key = naming::method_key(prefix, &variant.leaf_name, suffix);

    view.find_unary(&key, variant.nullable)
        .map(|m| Action::view(&m.name, variant.path.clone()))
}
