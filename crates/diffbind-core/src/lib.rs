//! Runtime surface for diffbind: dynamic values, payloads, comparison
//! engines, dispatchers, and the catalog resolvers that generated code links
//! against.
//!
//! In general:
//! - `diffbind-schema` decides *what exists* (descriptors, taxonomy, resolution)
//! - `diffbind-build` decides *what is emitted*
//! - `diffbind-core` defines *what runs*

pub mod catalog;
pub mod compare;
pub mod dispatch;
pub mod error;
pub mod model;
pub mod payload;
pub mod value;

// re-exports
pub use error::ResolveError;

///
/// Prelude
///
/// Domain vocabulary used by generated artifacts and by hosts that consume
/// them. Errors and builders stay one module level down.
///

pub mod prelude {
    pub use crate::{
        catalog::{CachedRegistry, Catalog, CatalogResolver, DirectRegistry},
        compare::{ComparedLeaf, ComparisonEngine, ComparisonPlan},
        dispatch::{Action, BindTarget, DispatchTable, Dispatcher, HandlerArg},
        model::{LeafPath, ModelInstance, Record},
        payload::{Incoming, Notification, Payload, extract_payloads},
        value::Value,
    };
}
