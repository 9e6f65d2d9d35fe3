use crate::{
    model::{LeafPath, ModelInstance},
    payload::Payload,
};
use serde::{Deserialize, Serialize};

///
/// ComparisonEngine
///
/// List-diffing identity, content equality, and payload diff for one model.
/// `new` is accepted as any model instance; a candidate of another model type
/// is never the same item and never produces payloads.
///

pub trait ComparisonEngine: Send + Sync {
    fn model_key(&self) -> &str;

    /// Same model type and equal identity-field values.
    fn are_items_the_same(&self, old: &dyn ModelInstance, new: &dyn ModelInstance) -> bool;

    /// Same model type and every compared leaf equal.
    fn are_contents_the_same(&self, old: &dyn ModelInstance, new: &dyn ModelInstance) -> bool;

    /// Payloads for every compared leaf that differs, in taxonomy order.
    fn change_payloads(&self, old: &dyn ModelInstance, new: &dyn ModelInstance) -> Vec<Payload>;
}

///
/// ComparedLeaf
///
/// One non-identity, non-excluded leaf together with the payload variant it
/// produces when it changes.
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct ComparedLeaf {
    pub variant: String,
    pub path: LeafPath,
    pub nullable: bool,
}

impl ComparedLeaf {
    pub fn new(variant: impl Into<String>, path: LeafPath, nullable: bool) -> Self {
        Self {
            variant: variant.into(),
            path,
            nullable,
        }
    }
}

///
/// ComparisonPlan
///
/// Static comparison table synthesized at generation time: the identity leaf
/// and the ordered compared leaves. Evaluating the plan is the comparison
/// engine; there is no per-call discovery of fields.
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct ComparisonPlan {
    model_key: String,
    identity: LeafPath,
    leaves: Vec<ComparedLeaf>,
}

impl ComparisonPlan {
    pub fn new(model_key: impl Into<String>, identity: LeafPath, leaves: Vec<ComparedLeaf>) -> Self {
        Self {
            model_key: model_key.into(),
            identity,
            leaves,
        }
    }

    #[must_use]
    pub const fn identity(&self) -> &LeafPath {
        &self.identity
    }

    #[must_use]
    pub fn leaves(&self) -> &[ComparedLeaf] {
        &self.leaves
    }

    fn is_candidate(&self, old: &dyn ModelInstance, new: &dyn ModelInstance) -> bool {
        old.model_key() == self.model_key && new.model_key() == self.model_key
    }
}

impl ComparisonEngine for ComparisonPlan {
    fn model_key(&self) -> &str {
        &self.model_key
    }

    fn are_items_the_same(&self, old: &dyn ModelInstance, new: &dyn ModelInstance) -> bool {
        self.is_candidate(old, new) && old.leaf(&self.identity) == new.leaf(&self.identity)
    }

    fn are_contents_the_same(&self, old: &dyn ModelInstance, new: &dyn ModelInstance) -> bool {
        self.is_candidate(old, new)
            && self
                .leaves
                .iter()
                .all(|leaf| old.leaf(&leaf.path) == new.leaf(&leaf.path))
    }

    fn change_payloads(&self, old: &dyn ModelInstance, new: &dyn ModelInstance) -> Vec<Payload> {
        if !self.is_candidate(old, new) {
            return Vec::new();
        }

        self.leaves
            .iter()
            .filter_map(|leaf| {
                let new_value = new.leaf(&leaf.path);

                (old.leaf(&leaf.path) != new_value)
                    .then(|| Payload::new(leaf.variant.clone(), leaf.path.clone(), new_value))
            })
            .collect()
    }
}
