use crate::{decl::TypeDecl, naming};
use std::collections::BTreeMap;

///
/// ViewMethod
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ViewMethod {
    pub name: String,
    pub arity: usize,

    /// Nullability of the first parameter, when there is one.
    pub first_param_nullable: Option<bool>,
}

impl ViewMethod {
    /// Exactly one parameter, with the given nullability.
    #[must_use]
    pub fn accepts(&self, nullable: bool) -> bool {
        self.arity == 1 && self.first_param_nullable == Some(nullable)
    }
}

///
/// ViewSurface
///
/// Public method surface of a bound view type, pre-indexed by canonical
/// (PascalCase) name. Overloads keep declaration order.
///

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct ViewSurface {
    pub key: String,
    index: BTreeMap<String, Vec<ViewMethod>>,
}

impl ViewSurface {
    #[must_use]
    pub fn from_decl(decl: &TypeDecl) -> Self {
        Self::new(
            decl.key.clone(),
            decl.methods
                .iter()
                .filter(|m| m.visibility.is_public())
                .map(|m| ViewMethod {
                    name: m.name.clone(),
                    arity: m.params.len(),
                    first_param_nullable: m.params.first().map(|p| p.ty.nullable),
                }),
        )
    }

    pub fn new(key: impl Into<String>, methods: impl IntoIterator<Item = ViewMethod>) -> Self {
        let mut index: BTreeMap<String, Vec<ViewMethod>> = BTreeMap::new();
        for method in methods {
            index
                .entry(naming::pascal(&method.name))
                .or_default()
                .push(method);
        }

        Self {
            key: key.into(),
            index,
        }
    }

    /// First method under `canonical_name` that takes one parameter of the
    /// given nullability.
    #[must_use]
    pub fn find_unary(&self, canonical_name: &str, nullable: bool) -> Option<&ViewMethod> {
        self.index
            .get(canonical_name)?
            .iter()
            .find(|m| m.accepts(nullable))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.index.values().map(Vec::len).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }
}
