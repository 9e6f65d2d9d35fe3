//! Payload taxonomy.
//!
//! The variant order is a contract: every diffed top-level field in
//! declaration order, then each embedding's nested leaves, embeddings in
//! declaration order. Emitted tables follow it, so identical input always
//! regenerates identical output.

use crate::{naming, node::ModelDescriptor};
use diffbind_core::model::LeafPath;

///
/// PayloadVariant
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PayloadVariant {
    /// `<Leaf>Changed`, unique within the model.
    pub name: String,

    /// PascalCase leaf name used for handler and view-method lookup.
    pub leaf_name: String,
    pub path: LeafPath,

    /// Effective nullability, owner-aware for embedded leaves.
    pub nullable: bool,
    pub raw_type: String,
}

impl PayloadVariant {
    /// Rendered type of the carried value.
    #[must_use]
    pub fn rendered_type(&self) -> String {
        naming::render_type(&self.raw_type, self.nullable)
    }
}

/// Ordered payload variants for a model.
#[must_use]
pub fn payload_variants(model: &ModelDescriptor) -> Vec<PayloadVariant> {
    let top = model
        .fields
        .iter()
        .filter(|f| {
            f.name != model.identity && !model.is_excluded(&f.name) && !model.is_embedded(&f.name)
        })
        .map(|f| {
            let leaf_name = naming::leaf_name(&f.name);

            PayloadVariant {
                name: naming::variant_name(&leaf_name),
                leaf_name,
                path: LeafPath::top(&f.name),
                nullable: f.nullable,
                raw_type: f.raw_type.clone(),
            }
        });

    let nested = model.embedded.iter().flat_map(|owner| {
        owner.nested.iter().map(move |f| {
            let leaf_name = naming::embedded_leaf_name(&owner.owner, &f.name);

            PayloadVariant {
                name: naming::variant_name(&leaf_name),
                leaf_name,
                path: LeafPath::nested(&owner.owner, &f.name),
                nullable: owner.effective_nullable(f),
                raw_type: f.raw_type.clone(),
            }
        })
    });

    top.chain(nested).collect()
}
