//! Build-time front end: declared-type input, descriptor extraction,
//! validation, payload taxonomy, and handler resolution.

pub mod decl;
pub mod diag;
pub mod error;
pub mod extract;
pub mod naming;
pub mod node;
pub mod resolve;
pub mod taxonomy;
pub mod validate;

pub use error::ShapeError;

///
/// Prelude
///

pub mod prelude {
    pub use crate::{
        decl::{
            Attribute, Constructor, DeclKind, Declarations, Method, Param, TypeDecl, TypeRef,
            Visibility,
        },
        diag::{CollectingSink, Diagnostic, DiagnosticSink, Severity, TracingSink},
        error::ShapeError,
        extract::{extract_instructor, extract_model, extract_view},
        node::*,
        resolve::{Resolution, resolve},
        taxonomy::{PayloadVariant, payload_variants},
        validate::Verdict,
    };
}
