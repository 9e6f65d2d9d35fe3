use crate::naming;
use std::collections::BTreeSet;

///
/// FieldDescriptor
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FieldDescriptor {
    pub name: String,
    pub nullable: bool,
    pub primitive: bool,

    /// Declared type key, for rendering only.
    pub raw_type: String,
}

impl FieldDescriptor {
    #[must_use]
    pub fn leaf_name(&self) -> String {
        naming::leaf_name(&self.name)
    }
}

///
/// EmbeddedFieldDescriptor
///
/// One embedded field and the nested leaves drawn from its type's own
/// constructor (minus nested fields tagged excluded).
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct EmbeddedFieldDescriptor {
    pub owner: String,
    pub owner_nullable: bool,
    pub owner_type: String,
    pub nested: Vec<FieldDescriptor>,
}

impl EmbeddedFieldDescriptor {
    /// A nested leaf is nullable when either it or its owner is.
    #[must_use]
    pub const fn effective_nullable(&self, nested: &FieldDescriptor) -> bool {
        self.owner_nullable || nested.nullable
    }
}

///
/// ModelDescriptor
///
/// Invariants, enforced by extraction:
/// - exactly one identity field, and it is one of `fields`
/// - no field is both excluded and embedded
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ModelDescriptor {
    pub key: String,

    /// Constructor parameters in declaration order.
    pub fields: Vec<FieldDescriptor>,
    pub identity: String,
    pub excluded: BTreeSet<String>,

    /// Embedded fields in declaration order.
    pub embedded: Vec<EmbeddedFieldDescriptor>,
}

impl ModelDescriptor {
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|f| f.name == name)
    }

    #[must_use]
    pub fn identity_field(&self) -> Option<&FieldDescriptor> {
        self.field(&self.identity)
    }

    #[must_use]
    pub fn is_excluded(&self, name: &str) -> bool {
        self.excluded.contains(name)
    }

    #[must_use]
    pub fn embedded(&self, name: &str) -> Option<&EmbeddedFieldDescriptor> {
        self.embedded.iter().find(|e| e.owner == name)
    }

    #[must_use]
    pub fn is_embedded(&self, name: &str) -> bool {
        self.embedded(name).is_some()
    }

    pub fn embedded_keys(&self) -> impl Iterator<Item = &str> {
        self.embedded.iter().map(|e| e.owner.as_str())
    }

    #[must_use]
    pub fn simple_name(&self) -> &str {
        naming::simple_name(&self.key)
    }
}
