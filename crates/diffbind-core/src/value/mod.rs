#[cfg(test)]
mod tests;

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

///
/// Value
///
/// Dynamic leaf value carried by payloads and read from model instances.
/// `Null` doubles as "absent" for nested leaves under a null embedding.
///
/// Equality is structural; floats compare by bit pattern so that every value
/// is equal to itself (a diff of an instance against itself is always empty).
///

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    Uint(u64),
    BigInt(i128),
    BigUint(u128),
    Float(f64),
    Text(String),
    List(Vec<Self>),
    Struct(BTreeMap<String, Self>),
}

impl Value {
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Safe navigation into a struct value.
    /// Anything that is not a struct, or a missing member, reads as `Null`.
    #[must_use]
    pub fn field(&self, name: &str) -> Self {
        match self {
            Self::Struct(members) => members.get(name).cloned().unwrap_or_default(),
            _ => Self::Null,
        }
    }

    #[must_use]
    pub const fn as_struct(&self) -> Option<&BTreeMap<String, Self>> {
        match self {
            Self::Struct(members) => Some(members),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            _ => None,
        }
    }

    /// Build a struct value from `(name, value)` pairs.
    pub fn structure<I, K, V>(members: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Self>,
    {
        Self::Struct(
            members
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Null, Self::Null) => true,
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::Int(a), Self::Int(b)) => a == b,
            (Self::Uint(a), Self::Uint(b)) => a == b,
            (Self::BigInt(a), Self::BigInt(b)) => a == b,
            (Self::BigUint(a), Self::BigUint(b)) => a == b,
            (Self::Float(a), Self::Float(b)) => a.to_bits() == b.to_bits(),
            (Self::Text(a), Self::Text(b)) => a == b,
            (Self::List(a), Self::List(b)) => a == b,
            (Self::Struct(a), Self::Struct(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for Value {}

//
// ──────────────────────────
// CONVERSIONS
// ──────────────────────────
//

macro_rules! impl_from_widened {
    ($variant:ident, $wide:ty; $($ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for Value {
                fn from(v: $ty) -> Self {
                    Self::$variant(<$wide>::from(v))
                }
            }
        )*
    };
}

impl_from_widened!(Int, i64; i8, i16, i32, i64);
impl_from_widened!(Uint, u64; u8, u16, u32, u64);
impl_from_widened!(Float, f64; f32, f64);
impl_from_widened!(BigInt, i128; i128);
impl_from_widened!(BigUint, u128; u128);

// Pointer-sized integers join the 64-bit family whenever they fit.
impl From<isize> for Value {
    fn from(v: isize) -> Self {
        i64::try_from(v).map_or_else(|_| Self::BigInt(v as i128), Self::Int)
    }
}

impl From<usize> for Value {
    fn from(v: usize) -> Self {
        u64::try_from(v).map_or_else(|_| Self::BigUint(v as u128), Self::Uint)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<char> for Value {
    fn from(v: char) -> Self {
        Self::Text(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::Text(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::Text(v.to_string())
    }
}

impl From<&String> for Value {
    fn from(v: &String) -> Self {
        Self::Text(v.clone())
    }
}

impl<T: Into<Self>> From<Vec<T>> for Value {
    fn from(v: Vec<T>) -> Self {
        Self::List(v.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Self>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Self::Null, Into::into)
    }
}

impl From<BTreeMap<String, Self>> for Value {
    fn from(v: BTreeMap<String, Self>) -> Self {
        Self::Struct(v)
    }
}
