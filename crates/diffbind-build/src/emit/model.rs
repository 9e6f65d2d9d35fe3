use super::{Artifact, ident, item_name, leaf_path, path};
use crate::error::BuildError;
use diffbind_core::{compare::ComparisonPlan, model::LeafPath};
use diffbind_schema::node::ModelDescriptor;
use proc_macro2::TokenStream;
use quote::{format_ident, quote};

/// `<model>_comparison.rs`: the `ModelInstance` impl for the declared type
/// and the constructor of its comparison plan.
pub fn comparison_artifact(
    model: &ModelDescriptor,
    plan: &ComparisonPlan,
) -> Result<Artifact, BuildError> {
    let fn_name = item_name(&model.key, "comparison");
    let fn_ident = format_ident!("{fn_name}");
    let ty = path(&model.key)?;
    let key = &model.key;

    // identity first, then every compared leaf
    let mut arms = quote!();
    for leaf in std::iter::once(plan.identity()).chain(plan.leaves().iter().map(|l| &l.path)) {
        arms.extend(leaf_arm(model, leaf)?);
    }

    let identity = leaf_path(plan.identity());
    let leaves = plan.leaves().iter().map(|leaf| {
        let variant = &leaf.variant;
        let path = leaf_path(&leaf.path);
        let nullable = leaf.nullable;

        quote! {
            ::diffbind::core::compare::ComparedLeaf::new(#variant, #path, #nullable)
        }
    });

    let tokens = quote! {
        impl ::diffbind::core::model::ModelInstance for #ty {
            fn model_key(&self) -> &str {
                #key
            }

            fn leaf(
                &self,
                path: &::diffbind::core::model::LeafPath,
            ) -> ::diffbind::core::value::Value {
                match (path.owner.as_deref(), path.field.as_str()) {
                    #arms
                    _ => ::diffbind::core::value::Value::Null,
                }
            }
        }

        #[must_use]
        pub fn #fn_ident() -> ::diffbind::core::compare::ComparisonPlan {
            ::diffbind::core::compare::ComparisonPlan::new(
                #key,
                #identity,
                vec![#(#leaves),*],
            )
        }
    };

    Ok(Artifact::new(format!("{fn_name}.rs"), &tokens))
}

// One match arm reading a leaf. A nested leaf under a nullable owner reads
// as `Null` when the owner is absent.
fn leaf_arm(model: &ModelDescriptor, leaf: &LeafPath) -> Result<TokenStream, BuildError> {
    let field_name = &leaf.field;
    let field = ident(field_name)?;

    let Some(owner_name) = &leaf.owner else {
        return Ok(quote! {
            (None, #field_name) => ::diffbind::core::value::Value::from(
                ::std::clone::Clone::clone(&self.#field)
            ),
        });
    };

    let owner = ident(owner_name)?;
    let owner_nullable = model
        .embedded(owner_name)
        .is_some_and(|e| e.owner_nullable);

    let read = if owner_nullable {
        quote! {
            self.#owner.as_ref().map_or(
                ::diffbind::core::value::Value::Null,
                |owner| ::diffbind::core::value::Value::from(
                    ::std::clone::Clone::clone(&owner.#field)
                ),
            )
        }
    } else {
        quote! {
            ::diffbind::core::value::Value::from(
                ::std::clone::Clone::clone(&self.#owner.#field)
            )
        }
    };

    Ok(quote! {
        (Some(#owner_name), #field_name) => #read,
    })
}
