use super::{
    AdvisoryRule, FatalRule, Verdict, classify,
    model::{identity_param, params},
};
use crate::{
    decl::{Attribute, DeclKind, Declarations, Method, TypeDecl},
    naming,
};
use std::collections::BTreeSet;

const FATAL: &[FatalRule] = &[
    not_concrete,
    not_public,
    invalid_field_handler,
    invalid_tag_handler,
    invalid_view,
    invalid_target,
];

const ADVISORY: &[AdvisoryRule] = &[empty_multi_field, unknown_targets];

/// Classify an instructor declaration.
#[must_use]
pub fn validate_instructor(decl: &TypeDecl, decls: &Declarations) -> Verdict {
    classify(decl, decls, FATAL, ADVISORY)
}

fn not_concrete(decl: &TypeDecl, _: &Declarations) -> Option<String> {
    let concrete =
        !decl.is_abstract && matches!(decl.kind, DeclKind::Class | DeclKind::Object);

    (!concrete).then(|| "instructor must be a concrete type".to_string())
}

fn not_public(decl: &TypeDecl, _: &Declarations) -> Option<String> {
    (!decl.visibility.is_public()).then(|| "instructor must be public".to_string())
}

fn invalid_field_handler(decl: &TypeDecl, _: &Declarations) -> Option<String> {
    decl.methods
        .iter()
        .filter(|m| m.is_field_handler())
        .find_map(|m| {
            if !m.visibility.is_public() {
                Some(format!("handler `{}` must be public", m.name))
            } else if !takes_no_arg_or_bool(m) {
                Some(format!(
                    "handler `{}` must take no arguments or a single boolean",
                    m.name
                ))
            } else {
                None
            }
        })
}

fn takes_no_arg_or_bool(method: &Method) -> bool {
    match method.params.as_slice() {
        [] => true,
        [only] => naming::is_bool(&only.ty.key, only.ty.nullable),
        _ => false,
    }
}

fn invalid_tag_handler(decl: &TypeDecl, _: &Declarations) -> Option<String> {
    decl.methods
        .iter()
        .filter(|m| m.is_tag_handler())
        .find(|m| !m.visibility.is_public() || !m.params.is_empty())
        .map(|m| {
            format!(
                "tag handler `{}` must be public and take no arguments",
                m.name
            )
        })
}

fn invalid_view(decl: &TypeDecl, decls: &Declarations) -> Option<String> {
    let Some(view) = decl.bound_view() else {
        return Some("instructor must declare a bound view".to_string());
    };

    match decls.get(view) {
        None => Some(format!("bound view `{view}` is unresolvable")),
        Some(v) if !v.visibility.is_public() => {
            Some(format!("bound view `{view}` must be public"))
        }
        Some(_) => None,
    }
}

fn invalid_target(decl: &TypeDecl, decls: &Declarations) -> Option<String> {
    let model = decl.instructor_model()?;

    (!decls.get(model).is_some_and(TypeDecl::is_model))
        .then(|| format!("target model `{model}` is not a declared model"))
}

fn empty_multi_field(decl: &TypeDecl, _: &Declarations) -> Vec<String> {
    decl.methods
        .iter()
        .filter(|m| {
            m.attributes
                .iter()
                .any(|a| matches!(a, Attribute::BindOnFields { fields } if fields.is_empty()))
        })
        .map(|m| format!("handler `{}` binds no fields", m.name))
        .collect()
}

fn unknown_targets(decl: &TypeDecl, decls: &Declarations) -> Vec<String> {
    let Some(model) = decl.instructor_model().and_then(|m| decls.get(m)) else {
        return Vec::new();
    };
    let leaves = diffed_leaf_names(model, decls);

    let mut warnings = Vec::new();
    for method in &decl.methods {
        for attribute in &method.attributes {
            let targets: &[String] = match attribute {
                Attribute::BindOn { field } => std::slice::from_ref(field),
                Attribute::BindOnFields { fields } => fields.as_slice(),
                _ => continue,
            };

            for target in targets {
                if !leaves.contains(&naming::pascal(target)) {
                    warnings.push(format!(
                        "handler `{}` targets `{target}`, which is not a diffed field of `{}`",
                        method.name, model.key
                    ));
                }
            }
        }
    }

    warnings
}

// Leaf names a payload can carry: every top-level field except the identity,
// excluded, and embedded ones, plus the nested leaves of each embedding.
fn diffed_leaf_names(model: &TypeDecl, decls: &Declarations) -> BTreeSet<String> {
    let identity = identity_param(model).map(|p| p.name.as_str());

    let mut leaves = BTreeSet::new();
    for param in params(model) {
        if Some(param.name.as_str()) == identity || param.has(&Attribute::Excluded) {
            continue;
        }

        if param.has(&Attribute::Embedded) {
            for nested in decls.get(&param.ty.key).map(params).unwrap_or_default() {
                if !nested.has(&Attribute::Excluded) {
                    leaves.insert(naming::embedded_leaf_name(&param.name, &nested.name));
                }
            }
        } else {
            leaves.insert(naming::leaf_name(&param.name));
        }
    }

    leaves
}
