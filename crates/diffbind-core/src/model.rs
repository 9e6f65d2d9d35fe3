use crate::value::Value;
use serde::{Deserialize, Serialize};
use std::{collections::BTreeMap, fmt};

///
/// LeafPath
///
/// Location of one compared leaf: either a top-level field, or a nested
/// field reached through an embedded owner field.
///

#[derive(Clone, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub struct LeafPath {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,
    pub field: String,
}

impl LeafPath {
    pub fn top(field: impl Into<String>) -> Self {
        Self {
            owner: None,
            field: field.into(),
        }
    }

    pub fn nested(owner: impl Into<String>, field: impl Into<String>) -> Self {
        Self {
            owner: Some(owner.into()),
            field: field.into(),
        }
    }

    #[must_use]
    pub const fn is_nested(&self) -> bool {
        self.owner.is_some()
    }
}

impl fmt::Display for LeafPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.owner {
            Some(owner) => write!(f, "{owner}.{}", self.field),
            None => f.write_str(&self.field),
        }
    }
}

///
/// ModelInstance
///
/// Read access to one model instance, as needed by comparison and initial
/// binding. Generated code implements this for each declared model type.
///
/// Implementations must preserve safe navigation: when the owner of a nested
/// leaf is null, the leaf reads as `Value::Null` rather than failing.
///
/// Generated implementations read each leaf with `Value::from`, so every
/// leaf type must implement `Into<Value>`. The primitive types are covered
/// here; a host type used as a leaf (an enum, a newtype) needs its own
/// `impl From<T> for Value`.
///

pub trait ModelInstance {
    /// Fully-qualified model key of this instance's type.
    fn model_key(&self) -> &str;

    /// Current value of one leaf.
    fn leaf(&self, path: &LeafPath) -> Value;
}

///
/// Record
///
/// Map-backed model instance. Embedded fields are stored as `Value::Struct`
/// (or `Value::Null` when the embedding is absent).
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Record {
    model_key: String,
    fields: BTreeMap<String, Value>,
}

impl Record {
    pub fn new(model_key: impl Into<String>) -> Self {
        Self {
            model_key: model_key.into(),
            fields: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn with(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set(field, value);
        self
    }

    pub fn set(&mut self, field: impl Into<String>, value: impl Into<Value>) {
        self.fields.insert(field.into(), value.into());
    }

    #[must_use]
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }
}

impl ModelInstance for Record {
    fn model_key(&self) -> &str {
        &self.model_key
    }

    fn leaf(&self, path: &LeafPath) -> Value {
        match &path.owner {
            None => self.fields.get(&path.field).cloned().unwrap_or_default(),
            Some(owner) => self
                .fields
                .get(owner)
                .map_or(Value::Null, |embedded| embedded.field(&path.field)),
        }
    }
}
