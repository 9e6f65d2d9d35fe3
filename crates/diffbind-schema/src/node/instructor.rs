use derive_more::Display;
use std::collections::BTreeSet;

///
/// NamingDefaults
///
/// Prefixes (and suffix) used when an instructor's view binding omits them.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct NamingDefaults {
    pub setter_prefix: String,
    pub bind_prefix: String,
    pub suffix: String,
}

impl Default for NamingDefaults {
    fn default() -> Self {
        Self {
            setter_prefix: "set".to_string(),
            bind_prefix: "bind".to_string(),
            suffix: String::new(),
        }
    }
}

///
/// ArgMode
///

#[derive(Clone, Copy, Debug, Display, Eq, PartialEq)]
pub enum ArgMode {
    /// Handler takes no arguments.
    NoArg,

    /// Handler takes one boolean: `true` on initial bind, `false` on update.
    LegacyBoolArg,
}

///
/// HandlerBinding
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum HandlerBinding {
    SingleField {
        handler: String,
        target: String,
        arg_mode: ArgMode,
    },
    MultiField {
        handler: String,
        targets: BTreeSet<String>,
    },
    Tag {
        handler: String,
        tag: String,
    },
}

impl HandlerBinding {
    #[must_use]
    pub fn handler(&self) -> &str {
        match self {
            Self::SingleField { handler, .. }
            | Self::MultiField { handler, .. }
            | Self::Tag { handler, .. } => handler,
        }
    }
}

///
/// InstructorDescriptor
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct InstructorDescriptor {
    pub key: String,
    pub model: String,
    pub view: String,
    pub setter_prefix: String,
    pub bind_prefix: String,
    pub suffix: String,

    /// Handler bindings in method declaration order.
    pub bindings: Vec<HandlerBinding>,
}

impl InstructorDescriptor {
    pub fn single_field(&self) -> impl Iterator<Item = (&str, &str, ArgMode)> {
        self.bindings.iter().filter_map(|b| match b {
            HandlerBinding::SingleField {
                handler,
                target,
                arg_mode,
            } => Some((handler.as_str(), target.as_str(), *arg_mode)),
            _ => None,
        })
    }

    pub fn multi_field(&self) -> impl Iterator<Item = (&str, &BTreeSet<String>)> {
        self.bindings.iter().filter_map(|b| match b {
            HandlerBinding::MultiField { handler, targets } => Some((handler.as_str(), targets)),
            _ => None,
        })
    }

    pub fn tags(&self) -> impl Iterator<Item = (&str, &str)> {
        self.bindings.iter().filter_map(|b| match b {
            HandlerBinding::Tag { handler, tag } => Some((handler.as_str(), tag.as_str())),
            _ => None,
        })
    }
}
