use derive_more::Display;
use diffbind_schema::ShapeError;
use std::{io, path::PathBuf};
use thiserror::Error as ThisError;

///
/// BuildError
///

#[derive(Debug, ThisError)]
pub enum BuildError {
    #[error("invalid config {}: {source}", path.display())]
    Config {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid declarations {}: {source}", path.display())]
    Declarations {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("io error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("cannot write snapshot {}: {source}", path.display())]
    Snapshot {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid reference `{reference}`")]
    InvalidReference { reference: String },

    #[error(transparent)]
    Shape(#[from] ShapeError),
}

impl BuildError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn invalid_reference(reference: impl Into<String>) -> Self {
        Self::InvalidReference {
            reference: reference.into(),
        }
    }
}

///
/// EntryKind
///

#[derive(Clone, Copy, Debug, Display, Eq, PartialEq)]
pub enum EntryKind {
    #[display("comparison engine")]
    Engine,

    #[display("dispatcher")]
    Dispatcher,

    #[display("instructor")]
    Instructor,
}

///
/// MergeWarning
///
/// Degradations during the catalog merge. They are reported, never fatal.
///

#[derive(Clone, Debug, Display, Eq, PartialEq)]
pub enum MergeWarning {
    #[display("{kind} `{key}` registered twice: kept `{kept}` ({kept_unit}), dropped `{dropped}` ({dropped_unit})")]
    Collision {
        kind: EntryKind,
        key: String,
        kept: String,
        kept_unit: String,
        dropped: String,
        dropped_unit: String,
    },

    #[display("malformed snapshot {}: {message}", path.display())]
    MalformedSnapshot { path: PathBuf, message: String },
}
