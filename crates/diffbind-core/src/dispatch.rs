use crate::{
    model::{LeafPath, ModelInstance},
    payload::Notification,
    value::Value,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::trace;

///
/// HandlerArg
///
/// Argument passed to an instructor handler. `Bool(false)` marks an
/// incremental update, `Bool(true)` marks the initial bind.
///

#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub enum HandlerArg {
    None,
    Bool(bool),
}

///
/// Action
///
/// Resolved effect of one table entry. `View` reads its argument from the
/// payload's new value on the update path and from the model's current leaf
/// on the initial-bind path.
///

#[derive(Clone, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub enum Action {
    Handler { name: String, arg: HandlerArg },
    View { method: String, leaf: LeafPath },
    NoOp,
}

impl Action {
    pub fn handler(name: impl Into<String>, arg: HandlerArg) -> Self {
        Self::Handler {
            name: name.into(),
            arg,
        }
    }

    pub fn view(method: impl Into<String>, leaf: LeafPath) -> Self {
        Self::View {
            method: method.into(),
            leaf,
        }
    }
}

///
/// BindTarget
///
/// Trampoline from resolved actions to the instructor and its bound view.
/// Hosts implement this with a direct call per known name.
///

pub trait BindTarget {
    fn call_handler(&mut self, handler: &str, arg: HandlerArg);

    fn call_view(&mut self, method: &str, value: Value);
}

///
/// Dispatcher
///

pub trait Dispatcher: Send + Sync {
    fn model_key(&self) -> &str;

    fn instructor_key(&self) -> &str;

    /// Dispatch incremental notifications. An empty list means the host asked
    /// for a plain bind, so `on_empty` runs instead.
    fn inspect_payloads(
        &self,
        notifications: &[Notification],
        target: &mut dyn BindTarget,
        on_empty: &mut dyn FnMut(),
    );

    /// Populate a freshly attached view from the model's current state.
    fn bind(&self, model: &dyn ModelInstance, target: &mut dyn BindTarget);
}

///
/// DispatchTable
///
/// The three static tables resolved at generation time for one instructor:
/// field-keyed update actions, the initial-bind sequence, and tag handlers.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DispatchTable {
    model_key: String,
    instructor_key: String,
    updates: BTreeMap<String, Action>,
    update_order: Vec<String>,
    initial: Vec<Action>,
    tags: BTreeMap<String, String>,
}

impl DispatchTable {
    /// Build the table. The first entry for a variant or tag wins, and
    /// identical initial-bind actions collapse into their first occurrence.
    pub fn new(
        model_key: impl Into<String>,
        instructor_key: impl Into<String>,
        updates: Vec<(String, Action)>,
        initial: Vec<Action>,
        tags: Vec<(String, String)>,
    ) -> Self {
        let mut update_map = BTreeMap::new();
        let mut update_order = Vec::new();
        for (variant, action) in updates {
            if !update_map.contains_key(&variant) {
                update_order.push(variant.clone());
                update_map.insert(variant, action);
            }
        }

        let mut deduped: Vec<Action> = Vec::with_capacity(initial.len());
        for action in initial {
            if !deduped.contains(&action) {
                deduped.push(action);
            }
        }

        let mut tag_map = BTreeMap::new();
        for (tag, handler) in tags {
            tag_map.entry(tag).or_insert(handler);
        }

        Self {
            model_key: model_key.into(),
            instructor_key: instructor_key.into(),
            updates: update_map,
            update_order,
            initial: deduped,
            tags: tag_map,
        }
    }

    #[must_use]
    pub fn update_action(&self, variant: &str) -> Option<&Action> {
        self.updates.get(variant)
    }

    /// Update entries in taxonomy order.
    pub fn update_entries(&self) -> impl Iterator<Item = (&str, &Action)> {
        self.update_order
            .iter()
            .filter_map(|v| self.updates.get(v).map(|a| (v.as_str(), a)))
    }

    #[must_use]
    pub fn initial_actions(&self) -> &[Action] {
        &self.initial
    }

    #[must_use]
    pub fn tag_handler(&self, tag_key: &str) -> Option<&str> {
        self.tags.get(tag_key).map(String::as_str)
    }

    pub fn tag_entries(&self) -> impl Iterator<Item = (&str, &str)> {
        self.tags.iter().map(|(t, h)| (t.as_str(), h.as_str()))
    }
}

impl Dispatcher for DispatchTable {
    fn model_key(&self) -> &str {
        &self.model_key
    }

    fn instructor_key(&self) -> &str {
        &self.instructor_key
    }

    fn inspect_payloads(
        &self,
        notifications: &[Notification],
        target: &mut dyn BindTarget,
        on_empty: &mut dyn FnMut(),
    ) {
        if notifications.is_empty() {
            on_empty();
            return;
        }

        for notification in notifications {
            match notification {
                Notification::Field(payload) => match self.updates.get(&payload.variant) {
                    Some(Action::Handler { name, arg }) => target.call_handler(name, *arg),
                    Some(Action::View { method, .. }) => {
                        target.call_view(method, payload.new_value.clone());
                    }
                    Some(Action::NoOp) => {}
                    None => trace!(
                        model = %self.model_key,
                        variant = %payload.variant,
                        "ignoring payload with no update entry"
                    ),
                },
                Notification::Tag(tag) => match self.tags.get(tag) {
                    Some(handler) => target.call_handler(handler, HandlerArg::None),
                    None => trace!(model = %self.model_key, %tag, "ignoring unregistered tag"),
                },
            }
        }
    }

    fn bind(&self, model: &dyn ModelInstance, target: &mut dyn BindTarget) {
        for action in &self.initial {
            match action {
                Action::Handler { name, arg } => target.call_handler(name, *arg),
                Action::View { method, leaf } => target.call_view(method, model.leaf(leaf)),
                Action::NoOp => {}
            }
        }
    }
}
