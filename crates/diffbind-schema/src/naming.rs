//! Naming and convention helpers.
//!
//! Leaf and method names are compared in PascalCase, so `set_likes`,
//! `setLikes`, and `SetLikes` all canonicalise to `SetLikes`.

use convert_case::{Case, Casing};

/// Suffix shared by every payload variant name.
pub const VARIANT_SUFFIX: &str = "Changed";

/// Joins an embedded leaf to its owner: `<Leaf>In<Owner>`.
pub const EMBEDDED_JOIN: &str = "In";

/// Type names treated as primitive, both Rust scalars and the host-neutral
/// spellings hosts commonly report.
const PRIMITIVES: &[&str] = &[
    "()", "Any", "Boolean", "Byte", "Char", "Double", "Float", "Int", "Long", "Number", "Short",
    "String", "Unit", "bool", "char", "f32", "f64", "i128", "i16", "i32", "i64", "i8", "isize",
    "str", "u128", "u16", "u32", "u64", "u8", "usize",
];

/// Canonical PascalCase form used for every name comparison.
#[must_use]
pub fn pascal(name: &str) -> String {
    name.to_case(Case::Pascal)
}

/// Canonical snake_case form, used for generated item names.
#[must_use]
pub fn snake(name: &str) -> String {
    name.to_case(Case::Snake)
}

/// Leaf name of a top-level field.
#[must_use]
pub fn leaf_name(field: &str) -> String {
    pascal(field)
}

/// Leaf name of a nested field inside an embedded owner.
#[must_use]
pub fn embedded_leaf_name(owner: &str, field: &str) -> String {
    format!("{}{EMBEDDED_JOIN}{}", pascal(field), pascal(owner))
}

/// Payload variant name for a leaf name.
#[must_use]
pub fn variant_name(leaf_name: &str) -> String {
    format!("{leaf_name}{VARIANT_SUFFIX}")
}

/// Canonical key of a conventional view method: `<prefix><Leaf><suffix>`.
#[must_use]
pub fn method_key(prefix: &str, leaf_name: &str, suffix: &str) -> String {
    pascal(&format!("{prefix}{leaf_name}{suffix}"))
}

/// Last path segment of a `::`- or `.`-separated type key.
#[must_use]
pub fn simple_name(key: &str) -> &str {
    let after_colons = key.rsplit("::").next().unwrap_or(key);

    after_colons.rsplit('.').next().unwrap_or(after_colons)
}

/// Primitive classification of a type key (generic arguments ignored).
#[must_use]
pub fn is_primitive(type_key: &str) -> bool {
    let base = type_key.split('<').next().unwrap_or(type_key).trim();

    PRIMITIVES.contains(&simple_name(base))
}

/// A non-nullable boolean type key.
#[must_use]
pub fn is_bool(type_key: &str, nullable: bool) -> bool {
    !nullable && matches!(simple_name(type_key), "bool" | "Boolean")
}

/// Render a type for emitted code; nullable types render as `Option<T>`.
#[must_use]
pub fn render_type(type_key: &str, nullable: bool) -> String {
    if nullable {
        format!("Option<{type_key}>")
    } else {
        type_key.to_string()
    }
}
