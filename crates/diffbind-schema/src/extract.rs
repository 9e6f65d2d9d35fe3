//! Descriptor extraction.
//!
//! A pure read of declared metadata: each entry point validates the
//! declaration, forwards the verdict to the sink, and on success builds the
//! immutable descriptor the rest of the pipeline consumes.

use crate::{
    decl::{Attribute, Declarations, Param, TypeDecl},
    diag::DiagnosticSink,
    error::ShapeError,
    naming,
    node::{
        ArgMode, EmbeddedFieldDescriptor, FieldDescriptor, HandlerBinding, InstructorDescriptor,
        ModelDescriptor, NamingDefaults, ViewSurface,
    },
    validate::{self, identity_param, params},
};
use tracing::debug;

/// Validate and extract a model declaration.
pub fn extract_model(
    decl: &TypeDecl,
    decls: &Declarations,
    sink: &mut dyn DiagnosticSink,
) -> Result<ModelDescriptor, ShapeError> {
    validate::validate_model(decl, decls).report(&decl.key, sink)?;

    let identity = identity_param(decl)
        .ok_or_else(|| ShapeError::new(&decl.key, "model must declare at least one field"))?;

    let fields = params(decl);
    let embedded = fields
        .iter()
        .filter(|p| p.has(&Attribute::Embedded))
        .map(|p| extract_embedded(&decl.key, p, decls))
        .collect::<Result<Vec<_>, _>>()?;

    let descriptor = ModelDescriptor {
        key: decl.key.clone(),
        fields: fields.iter().map(field).collect(),
        identity: identity.name.clone(),
        excluded: fields
            .iter()
            .filter(|p| p.has(&Attribute::Excluded))
            .map(|p| p.name.clone())
            .collect(),
        embedded,
    };

    debug!(
        model = %descriptor.key,
        fields = descriptor.fields.len(),
        identity = %descriptor.identity,
        embedded = descriptor.embedded.len(),
        "extracted model"
    );

    Ok(descriptor)
}

fn field(param: &Param) -> FieldDescriptor {
    FieldDescriptor {
        name: param.name.clone(),
        nullable: param.ty.nullable,
        primitive: naming::is_primitive(&param.ty.key),
        raw_type: param.ty.key.clone(),
    }
}

fn extract_embedded(
    model: &str,
    param: &Param,
    decls: &Declarations,
) -> Result<EmbeddedFieldDescriptor, ShapeError> {
    let embedded = decls.get(&param.ty.key).ok_or_else(|| {
        ShapeError::new(
            model,
            format!("embedded type `{}` is unresolvable", param.ty.key),
        )
    })?;

    Ok(EmbeddedFieldDescriptor {
        owner: param.name.clone(),
        owner_nullable: param.ty.nullable,
        owner_type: param.ty.key.clone(),
        nested: params(embedded)
            .iter()
            .filter(|p| !p.has(&Attribute::Excluded))
            .map(field)
            .collect(),
    })
}

/// Validate and extract an instructor declaration. View-binding overrides
/// that are absent fall back to `defaults`.
pub fn extract_instructor(
    decl: &TypeDecl,
    decls: &Declarations,
    defaults: &NamingDefaults,
    sink: &mut dyn DiagnosticSink,
) -> Result<InstructorDescriptor, ShapeError> {
    validate::validate_instructor(decl, decls).report(&decl.key, sink)?;

    let model = decl
        .instructor_model()
        .ok_or_else(|| ShapeError::new(&decl.key, "instructor must name its model"))?;

    let (view, prefix, bind_prefix, suffix) = decl
        .attributes
        .iter()
        .find_map(|a| match a {
            Attribute::BindView {
                view,
                prefix,
                bind_prefix,
                suffix,
            } => Some((view, prefix, bind_prefix, suffix)),
            _ => None,
        })
        .ok_or_else(|| ShapeError::new(&decl.key, "instructor must declare a bound view"))?;

    let descriptor = InstructorDescriptor {
        key: decl.key.clone(),
        model: model.to_string(),
        view: view.clone(),
        setter_prefix: prefix.clone().unwrap_or_else(|| defaults.setter_prefix.clone()),
        bind_prefix: bind_prefix
            .clone()
            .unwrap_or_else(|| defaults.bind_prefix.clone()),
        suffix: suffix.clone().unwrap_or_else(|| defaults.suffix.clone()),
        bindings: bindings(decl),
    };

    debug!(
        instructor = %descriptor.key,
        model = %descriptor.model,
        view = %descriptor.view,
        bindings = descriptor.bindings.len(),
        "extracted instructor"
    );

    Ok(descriptor)
}

// Handler bindings in method declaration order; a method may carry several.
fn bindings(decl: &TypeDecl) -> Vec<HandlerBinding> {
    let mut out = Vec::new();

    for method in &decl.methods {
        for attribute in &method.attributes {
            let binding = match attribute {
                Attribute::BindOn { field } => HandlerBinding::SingleField {
                    handler: method.name.clone(),
                    target: field.clone(),
                    arg_mode: if method.params.is_empty() {
                        ArgMode::NoArg
                    } else {
                        ArgMode::LegacyBoolArg
                    },
                },
                Attribute::BindOnFields { fields } => HandlerBinding::MultiField {
                    handler: method.name.clone(),
                    targets: fields.iter().cloned().collect(),
                },
                Attribute::BindOnTag { tag } => HandlerBinding::Tag {
                    handler: method.name.clone(),
                    tag: tag.clone(),
                },
                _ => continue,
            };

            out.push(binding);
        }
    }

    out
}

/// Public method surface of the instructor's bound view.
pub fn extract_view(
    instructor: &InstructorDescriptor,
    decls: &Declarations,
) -> Result<ViewSurface, ShapeError> {
    decls
        .get(&instructor.view)
        .map(ViewSurface::from_decl)
        .ok_or_else(|| {
            ShapeError::new(
                &instructor.key,
                format!("bound view `{}` is unresolvable", instructor.view),
            )
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        decl::{Method, TypeRef},
        diag::CollectingSink,
    };

    fn color_pair() -> TypeDecl {
        TypeDecl::class("app::ColorPair").constructor(vec![
            Param::new("left", TypeRef::of("String")),
            Param::new("right", TypeRef::of("String").nullable()),
            Param::new("cache", TypeRef::of("String")).tagged(Attribute::Excluded),
        ])
    }

    #[test]
    fn identity_defaults_to_first_declared_field() {
        let decls: Declarations = [TypeDecl::class("app::Row")
            .tagged(Attribute::Model)
            .constructor(vec![
                Param::new("b", TypeRef::of("i32")),
                Param::new("a", TypeRef::of("i32")),
            ])]
        .into_iter()
        .collect();

        let mut sink = CollectingSink::new();
        let row = extract_model(decls.get("app::Row").unwrap(), &decls, &mut sink).unwrap();

        assert_eq!(row.identity, "b");
        assert!(sink.diagnostics().is_empty());
    }

    #[test]
    fn explicit_identity_and_embedded_nested_fields() {
        let decls: Declarations = [
            TypeDecl::class("app::Card")
                .tagged(Attribute::Model)
                .constructor(vec![
                    Param::new("title", TypeRef::of("String")),
                    Param::new("id", TypeRef::of("u64")).tagged(Attribute::Identity),
                    Param::new("colors", TypeRef::of("app::ColorPair").nullable())
                        .tagged(Attribute::Embedded),
                ]),
            color_pair(),
        ]
        .into_iter()
        .collect();

        let mut sink = CollectingSink::new();
        let card = extract_model(decls.get("app::Card").unwrap(), &decls, &mut sink).unwrap();

        assert_eq!(card.identity, "id");
        let colors = card.embedded("colors").expect("embedded owner");
        assert!(colors.owner_nullable);

        let nested: Vec<_> = colors.nested.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(nested, ["left", "right"], "excluded nested fields are dropped");
        assert!(colors.effective_nullable(&colors.nested[0]));
    }

    #[test]
    fn fatal_shape_reports_and_returns_error() {
        let decls: Declarations = [TypeDecl::class("app::Bad")
            .tagged(Attribute::Model)
            .abstract_()
            .constructor(vec![Param::new("a", TypeRef::of("i32"))])]
        .into_iter()
        .collect();

        let mut sink = CollectingSink::new();
        let err = extract_model(decls.get("app::Bad").unwrap(), &decls, &mut sink).unwrap_err();

        assert_eq!(err.declaration, "app::Bad");
        assert_eq!(sink.fatals().count(), 1);
    }

    #[test]
    fn instructor_bindings_follow_method_order_and_defaults() {
        let decls: Declarations = [
            TypeDecl::class("app::Row")
                .tagged(Attribute::Model)
                .constructor(vec![
                    Param::new("id", TypeRef::of("u64")),
                    Param::new("title", TypeRef::of("String")),
                    Param::new("likes", TypeRef::of("u32")),
                ]),
            TypeDecl::class("app::RowView").method(Method::new("set_title").param("v", TypeRef::of("String"))),
            TypeDecl::class("app::RowInstructor")
                .tagged(Attribute::Instructor {
                    model: "app::Row".into(),
                })
                .tagged(Attribute::BindView {
                    view: "app::RowView".into(),
                    prefix: None,
                    bind_prefix: Some("show".into()),
                    suffix: None,
                })
                .method(
                    Method::new("on_likes")
                        .param("initial", TypeRef::of("bool"))
                        .tagged(Attribute::BindOn {
                            field: "likes".into(),
                        }),
                )
                .method(Method::new("on_selected").tagged(Attribute::BindOnTag {
                    tag: "app::Selected".into(),
                })),
        ]
        .into_iter()
        .collect();

        let mut sink = CollectingSink::new();
        let decl = decls.get("app::RowInstructor").unwrap();
        let instructor =
            extract_instructor(decl, &decls, &NamingDefaults::default(), &mut sink).unwrap();

        assert_eq!(instructor.setter_prefix, "set");
        assert_eq!(instructor.bind_prefix, "show");
        assert_eq!(instructor.suffix, "");
        assert_eq!(
            instructor.bindings,
            vec![
                HandlerBinding::SingleField {
                    handler: "on_likes".into(),
                    target: "likes".into(),
                    arg_mode: ArgMode::LegacyBoolArg,
                },
                HandlerBinding::Tag {
                    handler: "on_selected".into(),
                    tag: "app::Selected".into(),
                },
            ]
        );

        let view = extract_view(&instructor, &decls).unwrap();
        assert!(view.find_unary("SetTitle", false).is_some());
    }
}
