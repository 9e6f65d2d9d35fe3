use crate::{model::LeafPath, value::Value};
use derive_more::From;
use serde::{Deserialize, Serialize};

///
/// Payload
///
/// One field-level change notification: the variant name
/// (`"<Leaf>Changed"` / `"<Leaf>In<Owner>Changed"`), the leaf it came from,
/// and the leaf's new value.
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Payload {
    pub variant: String,
    pub leaf: LeafPath,
    pub new_value: Value,
}

impl Payload {
    pub fn new(variant: impl Into<String>, leaf: LeafPath, new_value: impl Into<Value>) -> Self {
        Self {
            variant: variant.into(),
            leaf,
            new_value: new_value.into(),
        }
    }
}

///
/// Notification
///
/// A runtime value arriving at a dispatcher. It is either a field payload or
/// an instance of an external tag type, never both.
///

#[derive(Clone, Debug, Eq, From, PartialEq)]
pub enum Notification {
    Field(Payload),

    #[from(skip)]
    Tag(String),
}

impl Notification {
    pub fn tag(tag_key: impl Into<String>) -> Self {
        Self::Tag(tag_key.into())
    }
}

///
/// Incoming
///
/// Raw notification list as handed over by a list host. Hosts that coalesce
/// several change batches pass the batch itself as the first element.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Incoming {
    One(Notification),
    Batch(Vec<Notification>),
}

/// Normalise raw host notifications into one flat list.
///
/// An empty input yields an empty list. When the first element is a batch,
/// that batch is the notification list; otherwise every element is taken in
/// order, with any later batches flattened in place.
#[must_use]
pub fn extract_payloads(incoming: &[Incoming]) -> Vec<Notification> {
    match incoming.first() {
        None => Vec::new(),
        Some(Incoming::Batch(batch)) => batch.clone(),
        Some(Incoming::One(_)) => incoming
            .iter()
            .flat_map(|item| match item {
                Incoming::One(n) => vec![n.clone()],
                Incoming::Batch(batch) => batch.clone(),
            })
            .collect(),
    }
}
