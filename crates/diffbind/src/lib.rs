//! ## Crate layout
//! - `build`: generation pipeline, emitters, and the cross-unit catalog merge.
//! - `core`: runtime values, payloads, comparison engines, dispatchers, and
//!   catalog resolvers.
//! - `schema`: declared-type input, descriptor extraction, validation,
//!   payload taxonomy, and handler resolution.
//!
//! Generated artifacts name runtime items through `::diffbind::core`, so a
//! host only depends on this crate.

pub use diffbind_build as build;
pub use diffbind_core as core;
pub use diffbind_schema as schema;

//
// Consts
//

/// Workspace version re-export for downstream tooling/tests.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

//
// Macros
//

pub use diffbind_build::build;

///
/// Prelude
///
/// Runtime surface used by hosts and by generated code.
///

pub mod prelude {
    pub use crate::core::{
        ResolveError,
        catalog::{
            CachedRegistry, Catalog, CatalogResolver, DirectRegistry, DispatcherRef, EngineRef,
        },
        compare::{ComparedLeaf, ComparisonEngine, ComparisonPlan},
        dispatch::{Action, BindTarget, DispatchTable, Dispatcher, HandlerArg},
        model::{LeafPath, ModelInstance, Record},
        payload::{Incoming, Notification, Payload, extract_payloads},
        value::Value,
    };
}

///
/// Design Prelude
///
/// Build-time surface: declarations in, artifacts and diagnostics out.
///

pub mod design {
    pub mod prelude {
        pub use crate::{
            build::{
                BuildError, GeneratedUnit,
                config::{BuildConfig, CollisionPolicy},
                emit::Artifact,
                generate,
            },
            schema::{
                ShapeError,
                decl::{
                    Attribute, Constructor, DeclKind, Declarations, Method, Param, TypeDecl,
                    TypeRef, Visibility,
                },
                diag::{CollectingSink, Diagnostic, DiagnosticSink, Severity, TracingSink},
            },
        };
    }
}
