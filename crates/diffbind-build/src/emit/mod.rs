//! Text artifact emission.
//!
//! Artifacts are token streams rendered with `to_string()`. Generated code
//! names runtime items through the `::diffbind` facade, and every host-facing
//! path or identifier is parsed with `syn` first, so a bad name is a build
//! error rather than broken output.

mod catalog;
mod dispatch;
mod model;
mod registry;

pub use catalog::{CATALOG_FILE, catalog_artifact, unavailable_catalog_artifact};
pub use dispatch::dispatch_artifact;
pub use model::comparison_artifact;
pub use registry::{REGISTRY_FILE, RegistryEntries, registry_artifact};

use crate::error::BuildError;
use diffbind_core::model::LeafPath;
use diffbind_schema::naming;
use proc_macro2::{Ident, TokenStream};
use quote::quote;

/// Index file that mounts every other artifact.
pub const INDEX_FILE: &str = "diffbind.rs";

///
/// Artifact
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Artifact {
    pub file_name: String,
    pub contents: String,
}

impl Artifact {
    pub fn new(file_name: impl Into<String>, tokens: &TokenStream) -> Self {
        Self {
            file_name: file_name.into(),
            contents: tokens.to_string(),
        }
    }
}

/// Generated item name for a model: `<snake simple name>_<suffix>`.
#[must_use]
pub fn item_name(model_key: &str, suffix: &str) -> String {
    format!("{}_{suffix}", naming::snake(naming::simple_name(model_key)))
}

/// Index file including every artifact from `OUT_DIR`.
#[must_use]
pub fn index_artifact(artifacts: &[Artifact]) -> Artifact {
    let includes = artifacts.iter().map(|a| {
        let file = format!("/{}", a.file_name);
        quote! {
            include!(concat!(env!("OUT_DIR"), #file));
        }
    });

    Artifact::new(INDEX_FILE, &quote! { #(#includes)* })
}

pub(crate) fn path(reference: &str) -> Result<syn::Path, BuildError> {
    syn::parse_str(reference).map_err(|_| BuildError::invalid_reference(reference))
}

pub(crate) fn ident(name: &str) -> Result<Ident, BuildError> {
    syn::parse_str(name).map_err(|_| BuildError::invalid_reference(name))
}

pub(crate) fn leaf_path(leaf: &LeafPath) -> TokenStream {
    let field = &leaf.field;

    match &leaf.owner {
        Some(owner) => quote! { ::diffbind::core::model::LeafPath::nested(#owner, #field) },
        None => quote! { ::diffbind::core::model::LeafPath::top(#field) },
    }
}
