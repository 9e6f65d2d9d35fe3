use super::{Artifact, path};
use crate::{catalog::MergedCatalog, error::BuildError};
use quote::quote;

pub const CATALOG_FILE: &str = "catalog.rs";

/// `catalog.rs`: the process-wide `CATALOG` resolver whose loader builds
/// the merged catalog from every collected reference.
pub fn catalog_artifact(catalog: &MergedCatalog) -> Result<Artifact, BuildError> {
    let mut chain = quote!();

    for entry in catalog.engines.values() {
        let ctor = path(&entry.reference)?;
        chain.extend(quote! { .engine(#ctor()) });
    }
    for entry in catalog.dispatchers.values() {
        let ctor = path(&entry.reference)?;
        chain.extend(quote! { .dispatcher(#ctor()) });
    }

    let tokens = quote! {
        pub static CATALOG: ::diffbind::core::catalog::CatalogResolver =
            ::diffbind::core::catalog::CatalogResolver::new(__diffbind_load_catalog);

        fn __diffbind_load_catalog() -> ::diffbind::core::catalog::Catalog {
            ::diffbind::core::catalog::Catalog::builder()
                #chain
                .build()
        }
    };

    Ok(Artifact::new(CATALOG_FILE, &tokens))
}

/// `catalog.rs` for a unit that only contributes a snapshot. The aggregator
/// owns the merged catalog, so this unit's `CATALOG` has no loader and every
/// lookup through it fails with `CatalogUnavailable`.
#[must_use]
pub fn unavailable_catalog_artifact() -> Artifact {
    let tokens = quote! {
        pub static CATALOG: ::diffbind::core::catalog::CatalogResolver =
            ::diffbind::core::catalog::CatalogResolver::unavailable();
    };

    Artifact::new(CATALOG_FILE, &tokens)
}
