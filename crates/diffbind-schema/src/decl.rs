//! Declared-type input surface.
//!
//! This is the only thing the generator reads from the host build: declared
//! types with their visibility, constructors, methods, and attached
//! attributes. Hosts hand it over in memory or as JSON.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

///
/// Visibility
///

#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Visibility {
    #[default]
    Public,
    Internal,
    Private,
}

impl Visibility {
    #[must_use]
    pub const fn is_public(self) -> bool {
        matches!(self, Self::Public)
    }
}

///
/// DeclKind
///

#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DeclKind {
    #[default]
    Class,
    Interface,
    Object,
    Enum,
}

///
/// Attribute
///
/// Metadata tags attached to declarations, parameters, and methods.
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
#[remain::sorted]
pub enum Attribute {
    /// Handler for one field. Arity (none, or one boolean) picks the arg mode.
    BindOn { field: String },

    /// Handler shared by several fields.
    BindOnFields { fields: Vec<String> },

    /// Handler for an external tag type, outside field diffing.
    BindOnTag { tag: String },

    /// Bound view type plus naming-convention overrides.
    BindView {
        view: String,
        #[serde(default)]
        prefix: Option<String>,
        #[serde(default)]
        bind_prefix: Option<String>,
        #[serde(default)]
        suffix: Option<String>,
    },

    /// The single aggregator declaration that triggers the catalog merge.
    Catalog,

    /// Parameter whose own fields are compared as separate leaves.
    Embedded,

    /// Parameter never compared and never diffed.
    Excluded,

    /// Parameter used for list identity.
    Identity,

    /// Instructor for the given model key.
    Instructor { model: String },

    /// UI record type.
    Model,
}

///
/// TypeRef
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct TypeRef {
    pub key: String,

    #[serde(default)]
    pub nullable: bool,

    #[serde(default)]
    pub visibility: Visibility,
}

impl TypeRef {
    pub fn of(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            nullable: false,
            visibility: Visibility::Public,
        }
    }

    #[must_use]
    pub const fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    #[must_use]
    pub const fn with_visibility(mut self, visibility: Visibility) -> Self {
        self.visibility = visibility;
        self
    }
}

///
/// Param
///
/// A constructor or method parameter. For constructors the visibility is the
/// visibility of the property the parameter declares.
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Param {
    pub name: String,
    pub ty: TypeRef,

    #[serde(default)]
    pub visibility: Visibility,

    #[serde(default)]
    pub variadic: bool,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attributes: Vec<Attribute>,
}

impl Param {
    pub fn new(name: impl Into<String>, ty: TypeRef) -> Self {
        Self {
            name: name.into(),
            ty,
            visibility: Visibility::Public,
            variadic: false,
            attributes: Vec::new(),
        }
    }

    #[must_use]
    pub fn tagged(mut self, attribute: Attribute) -> Self {
        self.attributes.push(attribute);
        self
    }

    #[must_use]
    pub const fn variadic(mut self) -> Self {
        self.variadic = true;
        self
    }

    #[must_use]
    pub const fn with_visibility(mut self, visibility: Visibility) -> Self {
        self.visibility = visibility;
        self
    }

    #[must_use]
    pub fn has(&self, attribute: &Attribute) -> bool {
        self.attributes.contains(attribute)
    }
}

///
/// Constructor
///

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct Constructor {
    #[serde(default)]
    pub visibility: Visibility,
    pub params: Vec<Param>,
}

impl Constructor {
    #[must_use]
    pub const fn new(params: Vec<Param>) -> Self {
        Self {
            visibility: Visibility::Public,
            params,
        }
    }
}

///
/// Method
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Method {
    pub name: String,

    #[serde(default)]
    pub visibility: Visibility,

    #[serde(default)]
    pub params: Vec<Param>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attributes: Vec<Attribute>,
}

impl Method {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            visibility: Visibility::Public,
            params: Vec::new(),
            attributes: Vec::new(),
        }
    }

    #[must_use]
    pub fn param(mut self, name: impl Into<String>, ty: TypeRef) -> Self {
        self.params.push(Param::new(name, ty));
        self
    }

    #[must_use]
    pub fn tagged(mut self, attribute: Attribute) -> Self {
        self.attributes.push(attribute);
        self
    }

    #[must_use]
    pub const fn with_visibility(mut self, visibility: Visibility) -> Self {
        self.visibility = visibility;
        self
    }

    /// True for the handler roles that take part in field-keyed dispatch.
    #[must_use]
    pub fn is_field_handler(&self) -> bool {
        self.attributes.iter().any(|a| {
            matches!(
                a,
                Attribute::BindOn { .. } | Attribute::BindOnFields { .. }
            )
        })
    }

    #[must_use]
    pub fn is_tag_handler(&self) -> bool {
        self.attributes
            .iter()
            .any(|a| matches!(a, Attribute::BindOnTag { .. }))
    }
}

///
/// TypeDecl
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct TypeDecl {
    pub key: String,

    #[serde(default)]
    pub kind: DeclKind,

    #[serde(default)]
    pub visibility: Visibility,

    #[serde(default)]
    pub is_abstract: bool,

    #[serde(default)]
    pub constructors: Vec<Constructor>,

    #[serde(default)]
    pub methods: Vec<Method>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attributes: Vec<Attribute>,
}

impl TypeDecl {
    pub fn class(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            kind: DeclKind::Class,
            visibility: Visibility::Public,
            is_abstract: false,
            constructors: Vec::new(),
            methods: Vec::new(),
            attributes: Vec::new(),
        }
    }

    #[must_use]
    pub fn tagged(mut self, attribute: Attribute) -> Self {
        self.attributes.push(attribute);
        self
    }

    #[must_use]
    pub fn constructor(mut self, params: Vec<Param>) -> Self {
        self.constructors.push(Constructor::new(params));
        self
    }

    #[must_use]
    pub fn method(mut self, method: Method) -> Self {
        self.methods.push(method);
        self
    }

    #[must_use]
    pub const fn with_kind(mut self, kind: DeclKind) -> Self {
        self.kind = kind;
        self
    }

    #[must_use]
    pub const fn with_visibility(mut self, visibility: Visibility) -> Self {
        self.visibility = visibility;
        self
    }

    #[must_use]
    pub const fn abstract_(mut self) -> Self {
        self.is_abstract = true;
        self
    }

    #[must_use]
    pub fn has(&self, attribute: &Attribute) -> bool {
        self.attributes.contains(attribute)
    }

    #[must_use]
    pub fn is_model(&self) -> bool {
        self.has(&Attribute::Model)
    }

    #[must_use]
    pub fn is_aggregator(&self) -> bool {
        self.has(&Attribute::Catalog)
    }

    /// Target model key, when tagged as an instructor.
    #[must_use]
    pub fn instructor_model(&self) -> Option<&str> {
        self.attributes.iter().find_map(|a| match a {
            Attribute::Instructor { model } => Some(model.as_str()),
            _ => None,
        })
    }

    /// Bound view type key, when tagged with a view binding.
    #[must_use]
    pub fn bound_view(&self) -> Option<&str> {
        self.attributes.iter().find_map(|a| match a {
            Attribute::BindView { view, .. } => Some(view.as_str()),
            _ => None,
        })
    }

    /// The primary constructor, when the declaration has exactly one.
    #[must_use]
    pub fn primary_constructor(&self) -> Option<&Constructor> {
        match self.constructors.as_slice() {
            [only] => Some(only),
            _ => None,
        }
    }

    /// Unqualified name (last `::` or `.` segment of the key).
    #[must_use]
    pub fn simple_name(&self) -> &str {
        crate::naming::simple_name(&self.key)
    }
}

///
/// Declarations
///
/// Symbol table for one build invocation, in discovery order.
///

#[derive(Clone, Debug, Default)]
pub struct Declarations {
    types: Vec<TypeDecl>,
    index: BTreeMap<String, usize>,
}

impl Declarations {
    #[must_use]
    pub fn new(types: Vec<TypeDecl>) -> Self {
        let mut index = BTreeMap::new();
        for (i, decl) in types.iter().enumerate() {
            index.entry(decl.key.clone()).or_insert(i);
        }

        Self { types, index }
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let types: Vec<TypeDecl> = serde_json::from_str(json)?;

        Ok(Self::new(types))
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&TypeDecl> {
        self.index.get(key).map(|&i| &self.types[i])
    }

    pub fn iter(&self) -> impl Iterator<Item = &TypeDecl> {
        self.types.iter()
    }

    pub fn models(&self) -> impl Iterator<Item = &TypeDecl> {
        self.types.iter().filter(|d| d.is_model())
    }

    pub fn instructors(&self) -> impl Iterator<Item = &TypeDecl> {
        self.types.iter().filter(|d| d.instructor_model().is_some())
    }

    /// The aggregator declaration, if this unit carries one.
    #[must_use]
    pub fn aggregator(&self) -> Option<&TypeDecl> {
        self.types.iter().find(|d| d.is_aggregator())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.types.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

impl FromIterator<TypeDecl> for Declarations {
    fn from_iter<I: IntoIterator<Item = TypeDecl>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
