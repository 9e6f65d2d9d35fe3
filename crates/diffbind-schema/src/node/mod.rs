//! In-memory descriptors produced by extraction.
//!
//! Descriptors are built once per declaration, never mutated afterwards, and
//! passed explicitly through taxonomy, resolution, and synthesis. Nothing
//! here is kept in global state.

mod instructor;
mod model;
mod view;

pub use instructor::*;
pub use model::*;
pub use view::*;
