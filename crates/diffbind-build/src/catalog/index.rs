use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

///
/// UnitIndex
///
/// Everything one unit registered: model key to comparison-engine
/// reference, model key to dispatcher reference, and instructor key to model
/// key. References are Rust paths to the generated constructors.
///

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct UnitIndex {
    pub unit: String,

    #[serde(default)]
    pub engines: BTreeMap<String, String>,

    #[serde(default)]
    pub dispatchers: BTreeMap<String, String>,

    #[serde(default)]
    pub instructors: BTreeMap<String, String>,
}

impl UnitIndex {
    pub fn new(unit: impl Into<String>) -> Self {
        Self {
            unit: unit.into(),
            ..Self::default()
        }
    }

    /// Register a comparison engine; returns false if the model already has one.
    pub fn register_engine(&mut self, model_key: &str, reference: impl Into<String>) -> bool {
        if self.engines.contains_key(model_key) {
            return false;
        }
        self.engines.insert(model_key.to_string(), reference.into());

        true
    }

    /// Register a dispatcher; returns false if the model already has one.
    pub fn register_dispatcher(
        &mut self,
        model_key: &str,
        instructor_key: &str,
        reference: impl Into<String>,
    ) -> bool {
        if self.dispatchers.contains_key(model_key) {
            return false;
        }
        self.dispatchers
            .insert(model_key.to_string(), reference.into());
        self.instructors
            .insert(instructor_key.to_string(), model_key.to_string());

        true
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.engines.is_empty() && self.dispatchers.is_empty()
    }
}
