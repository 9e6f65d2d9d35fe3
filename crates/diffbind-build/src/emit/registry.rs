use super::{Artifact, ident};
use crate::error::BuildError;
use quote::quote;

pub const REGISTRY_FILE: &str = "registry.rs";

///
/// RegistryEntries
///
/// This unit's own constructors by generated item name, for the direct
/// lookup path that needs no aggregator.
///

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct RegistryEntries {
    /// `(model key, constructor fn)`
    pub engines: Vec<(String, String)>,

    /// `(model key, instructor key, constructor fn)`
    pub dispatchers: Vec<(String, String, String)>,
}

/// `registry.rs`: `pub fn registry() -> DirectRegistry`.
pub fn registry_artifact(entries: &RegistryEntries) -> Result<Artifact, BuildError> {
    let mut chain = quote!();

    for (model_key, ctor) in &entries.engines {
        let ctor = ident(ctor)?;
        chain.extend(quote! {
            .engine(#model_key, || -> ::diffbind::core::catalog::EngineRef {
                ::std::sync::Arc::new(self::#ctor())
            })
        });
    }

    for (model_key, instructor_key, ctor) in &entries.dispatchers {
        let ctor = ident(ctor)?;
        chain.extend(quote! {
            .dispatcher(#model_key, #instructor_key, || -> ::diffbind::core::catalog::DispatcherRef {
                ::std::sync::Arc::new(self::#ctor())
            })
        });
    }

    let tokens = quote! {
        #[must_use]
        pub fn registry() -> ::diffbind::core::catalog::DirectRegistry {
            ::diffbind::core::catalog::DirectRegistry::new()
                #chain
        }
    };

    Ok(Artifact::new(REGISTRY_FILE, &tokens))
}
