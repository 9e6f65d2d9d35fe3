//! Cross-unit catalog assembly.
//!
//! Phase 1 runs in every unit that is not the aggregator: the local index is
//! persisted as a snapshot in the shared directory. Phase 2 runs in the
//! aggregator only: every snapshot is loaded, unioned with the local index,
//! and deleted, and the merged catalog is emitted once.

mod index;
mod merge;
mod snapshot;


pub use index::*;
pub use merge::*;
pub use snapshot::*;
