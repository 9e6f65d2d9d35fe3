use derive_more::Display;
use thiserror::Error as ThisError;

///
/// ArtifactKind
///

#[derive(Clone, Copy, Debug, Display, Eq, PartialEq)]
pub enum ArtifactKind {
    #[display("comparison engine")]
    ComparisonEngine,

    #[display("dispatcher")]
    Dispatcher,
}

///
/// ResolveError
///
/// Failures of the runtime lookup surface. Catalog-based and direct
/// resolution fail differently: only the catalog path can report that no
/// merged catalog exists at all.
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum ResolveError {
    /// No aggregator unit ran for this build, so there is no merged catalog.
    #[error("no merged catalog is available for this build; use direct resolution instead")]
    CatalogUnavailable,

    #[error("no {kind} registered for '{key}'")]
    NotFound { kind: ArtifactKind, key: String },
}

impl ResolveError {
    pub(crate) fn engine_not_found(key: &str) -> Self {
        Self::NotFound {
            kind: ArtifactKind::ComparisonEngine,
            key: key.to_string(),
        }
    }

    pub(crate) fn dispatcher_not_found(key: &str) -> Self {
        Self::NotFound {
            kind: ArtifactKind::Dispatcher,
            key: key.to_string(),
        }
    }

    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}
