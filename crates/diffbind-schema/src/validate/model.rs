use super::{AdvisoryRule, FatalRule, Verdict, classify};
use crate::{
    decl::{Attribute, DeclKind, Declarations, Param, TypeDecl},
    naming,
};
use std::collections::BTreeMap;

// Priority order matters: the first rule that fires is the only one reported.
const FATAL: &[FatalRule] = &[
    not_concrete_record,
    not_public,
    incompatible_param,
    no_fields,
    excluded_and_embedded,
    embedded_identity,
    primitive_embedded,
    invalid_embedded_type,
    duplicate_leaf_name,
];

const ADVISORY: &[AdvisoryRule] = &[multiple_identities, excluded_identity];

/// Classify a model declaration.
#[must_use]
pub fn validate_model(decl: &TypeDecl, decls: &Declarations) -> Verdict {
    classify(decl, decls, FATAL, ADVISORY)
}

pub(crate) fn params(decl: &TypeDecl) -> &[Param] {
    decl.primary_constructor()
        .map(|c| c.params.as_slice())
        .unwrap_or_default()
}

/// The identity parameter: the first tagged one, else the first declared.
pub(crate) fn identity_param(decl: &TypeDecl) -> Option<&Param> {
    let fields = params(decl);

    fields
        .iter()
        .find(|p| p.has(&Attribute::Identity))
        .or_else(|| fields.first())
}

fn not_concrete_record(decl: &TypeDecl, _: &Declarations) -> Option<String> {
    let concrete = !decl.is_abstract && decl.kind == DeclKind::Class;

    (!concrete || decl.primary_constructor().is_none()).then(|| {
        "model must be a concrete record type with exactly one constructor".to_string()
    })
}

fn not_public(decl: &TypeDecl, _: &Declarations) -> Option<String> {
    let ctor_public = decl
        .primary_constructor()
        .is_some_and(|c| c.visibility.is_public());

    (!decl.visibility.is_public() || !ctor_public)
        .then(|| "model type and its constructor must be public".to_string())
}

fn incompatible_param(decl: &TypeDecl, _: &Declarations) -> Option<String> {
    params(decl).iter().find_map(|p| {
        if p.variadic {
            Some(format!("field `{}` must not be variadic", p.name))
        } else if !p.visibility.is_public() || !p.ty.visibility.is_public() {
            Some(format!("field `{}` and its type `{}` must be public", p.name, p.ty.key))
        } else {
            None
        }
    })
}

fn no_fields(decl: &TypeDecl, _: &Declarations) -> Option<String> {
    params(decl)
        .is_empty()
        .then(|| "model must declare at least one field".to_string())
}

fn excluded_and_embedded(decl: &TypeDecl, _: &Declarations) -> Option<String> {
    params(decl)
        .iter()
        .find(|p| p.has(&Attribute::Excluded) && p.has(&Attribute::Embedded))
        .map(|p| format!("field `{}` cannot be both excluded and embedded", p.name))
}

fn embedded_identity(decl: &TypeDecl, _: &Declarations) -> Option<String> {
    identity_param(decl)
        .filter(|p| p.has(&Attribute::Embedded))
        .map(|p| format!("identity field `{}` cannot be embedded", p.name))
}

fn primitive_embedded(decl: &TypeDecl, _: &Declarations) -> Option<String> {
    params(decl)
        .iter()
        .find(|p| p.has(&Attribute::Embedded) && naming::is_primitive(&p.ty.key))
        .map(|p| format!("embedded field `{}` must not be primitive", p.name))
}

fn invalid_embedded_type(decl: &TypeDecl, decls: &Declarations) -> Option<String> {
    params(decl)
        .iter()
        .filter(|p| p.has(&Attribute::Embedded))
        .find_map(|p| check_embedded(p, decls))
}

// The embedded type must resolve to a public record whose own constructor
// exposes only public fields.
fn check_embedded(param: &Param, decls: &Declarations) -> Option<String> {
    let key = &param.ty.key;
    let Some(embedded) = decls.get(key) else {
        return Some(format!(
            "embedded field `{}` has unresolvable type `{key}`",
            param.name
        ));
    };

    if !embedded.visibility.is_public() || embedded.is_abstract {
        return Some(format!("embedded type `{key}` must be a public concrete type"));
    }

    let Some(ctor) = embedded.primary_constructor() else {
        return Some(format!(
            "embedded type `{key}` must declare exactly one constructor"
        ));
    };

    ctor.params
        .iter()
        .any(|p| p.variadic || !p.visibility.is_public())
        .then(|| format!("embedded type `{key}` must expose only public fields"))
}

// Two diffed fields must not canonicalise to the same leaf name, otherwise
// they would share one payload variant and one handler key.
fn duplicate_leaf_name(decl: &TypeDecl, decls: &Declarations) -> Option<String> {
    let identity = identity_param(decl).map(|p| p.name.as_str());
    let mut seen: BTreeMap<String, String> = BTreeMap::new();

    for param in params(decl) {
        if Some(param.name.as_str()) == identity || param.has(&Attribute::Excluded) {
            continue;
        }

        let leaves: Vec<(String, String)> = if param.has(&Attribute::Embedded) {
            decls
                .get(&param.ty.key)
                .map(params)
                .unwrap_or_default()
                .iter()
                .filter(|nested| !nested.has(&Attribute::Excluded))
                .map(|nested| {
                    (
                        naming::embedded_leaf_name(&param.name, &nested.name),
                        format!("{}.{}", param.name, nested.name),
                    )
                })
                .collect()
        } else {
            vec![(naming::leaf_name(&param.name), param.name.clone())]
        };

        for (leaf, origin) in leaves {
            if let Some(first) = seen.get(&leaf) {
                return Some(format!(
                    "fields `{first}` and `{origin}` both produce `{}`",
                    naming::variant_name(&leaf)
                ));
            }
            seen.insert(leaf, origin);
        }
    }

    None
}

fn multiple_identities(decl: &TypeDecl, _: &Declarations) -> Vec<String> {
    let tagged: Vec<&str> = params(decl)
        .iter()
        .filter(|p| p.has(&Attribute::Identity))
        .map(|p| p.name.as_str())
        .collect();

    match tagged.as_slice() {
        [first, _, ..] => vec![format!(
            "several fields are tagged identity ({}); using `{first}`",
            tagged.join(", ")
        )],
        _ => Vec::new(),
    }
}

fn excluded_identity(decl: &TypeDecl, _: &Declarations) -> Vec<String> {
    identity_param(decl)
        .filter(|p| p.has(&Attribute::Excluded))
        .map(|p| {
            format!(
                "identity field `{}` is also excluded; it is still used for item identity",
                p.name
            )
        })
        .into_iter()
        .collect()
}
