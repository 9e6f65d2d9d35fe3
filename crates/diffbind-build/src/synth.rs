//! Synthesis of the static runtime tables from resolved descriptors.
//!
//! The emitted artifacts are a rendering of exactly these values, so what a
//! test executes in memory is what the generated code builds.

use diffbind_core::{
    compare::{ComparedLeaf, ComparisonPlan},
    dispatch::DispatchTable,
    model::LeafPath,
};
use diffbind_schema::{
    node::{InstructorDescriptor, ModelDescriptor},
    resolve::Resolution,
    taxonomy::PayloadVariant,
};

/// Comparison plan for a model: its identity leaf plus one compared leaf per
/// payload variant, in taxonomy order.
#[must_use]
pub fn comparison_plan(model: &ModelDescriptor, variants: &[PayloadVariant]) -> ComparisonPlan {
    ComparisonPlan::new(
        model.key.clone(),
        LeafPath::top(&model.identity),
        variants
            .iter()
            .map(|v| ComparedLeaf::new(v.name.clone(), v.path.clone(), v.nullable))
            .collect(),
    )
}

/// Dispatch table for an instructor from its resolved tables.
#[must_use]
pub fn dispatch_table(instructor: &InstructorDescriptor, resolution: &Resolution) -> DispatchTable {
    DispatchTable::new(
        instructor.model.clone(),
        instructor.key.clone(),
        resolution.updates.clone(),
        resolution.initial.clone(),
        resolution.tags.clone(),
    )
}
