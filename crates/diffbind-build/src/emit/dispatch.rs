use super::{Artifact, item_name, leaf_path};
use diffbind_core::dispatch::{Action, DispatchTable, Dispatcher, HandlerArg};
use proc_macro2::TokenStream;
use quote::{format_ident, quote};

/// `<model>_dispatch.rs`: the constructor of one instructor's dispatch
/// table with every resolved action baked in.
#[must_use]
pub fn dispatch_artifact(table: &DispatchTable) -> Artifact {
    let fn_name = item_name(table.model_key(), "dispatch");
    let fn_ident = format_ident!("{fn_name}");
    let model_key = table.model_key();
    let instructor_key = table.instructor_key();

    let updates = table.update_entries().map(|(variant, action)| {
        let action = action_tokens(action);
        quote! { (#variant.to_string(), #action) }
    });
    let initial = table.initial_actions().iter().map(action_tokens);
    let tags = table
        .tag_entries()
        .map(|(tag, handler)| quote! { (#tag.to_string(), #handler.to_string()) });

    let tokens = quote! {
        #[must_use]
        pub fn #fn_ident() -> ::diffbind::core::dispatch::DispatchTable {
            ::diffbind::core::dispatch::DispatchTable::new(
                #model_key,
                #instructor_key,
                vec![#(#updates),*],
                vec![#(#initial),*],
                vec![#(#tags),*],
            )
        }
    };

    Artifact::new(format!("{fn_name}.rs"), &tokens)
}

fn action_tokens(action: &Action) -> TokenStream {
    match action {
        Action::Handler { name, arg } => {
            let arg = match arg {
                HandlerArg::None => quote! { ::diffbind::core::dispatch::HandlerArg::None },
                HandlerArg::Bool(b) => quote! { ::diffbind::core::dispatch::HandlerArg::Bool(#b) },
            };
            quote! { ::diffbind::core::dispatch::Action::handler(#name, #arg) }
        }
        Action::View { method, leaf } => {
            let leaf = leaf_path(leaf);
            quote! { ::diffbind::core::dispatch::Action::view(#method, #leaf) }
        }
        Action::NoOp => quote! { ::diffbind::core::dispatch::Action::NoOp },
    }
}
