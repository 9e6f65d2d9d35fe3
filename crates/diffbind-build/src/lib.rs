//! Build-time backend: turns the descriptors and resolutions from
//! `diffbind-schema` into text artifacts, and runs the two-phase catalog
//! merge across units.
//!
//! Every unit persists a snapshot of its own registrations (Phase 1). The
//! unit that declares the catalog aggregator merges all pending snapshots
//! and emits the process-wide catalog instead (Phase 2).

pub mod catalog;
pub mod config;
pub mod emit;
pub mod error;
pub mod pipeline;
pub mod synth;

mod macros;

// re-exports
pub use error::BuildError;
pub use pipeline::{GeneratedUnit, generate, run};

///
/// Prelude
///

pub mod prelude {
    pub use crate::{
        catalog::{MergeReport, MergedCatalog, UnitIndex, merge_snapshots, persist_snapshot},
        config::{BuildConfig, CollisionPolicy},
        emit::{Artifact, INDEX_FILE},
        error::{BuildError, MergeWarning},
        pipeline::{GeneratedUnit, generate},
    };
}
