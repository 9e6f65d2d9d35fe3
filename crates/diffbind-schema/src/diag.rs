//! Diagnostics channel: `(declaration, severity, message)` triples.

use derive_more::Display;
use tracing::{error, warn};

///
/// Severity
///

#[derive(Clone, Copy, Debug, Display, Eq, Ord, PartialEq, PartialOrd)]
pub enum Severity {
    Warning,
    Fatal,
}

///
/// Diagnostic
///

#[derive(Clone, Debug, Display, Eq, PartialEq)]
#[display("{severity} {declaration}: {message}")]
pub struct Diagnostic {
    pub declaration: String,
    pub severity: Severity,
    pub message: String,
}

impl Diagnostic {
    pub fn warning(declaration: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            declaration: declaration.into(),
            severity: Severity::Warning,
            message: message.into(),
        }
    }

    pub fn fatal(declaration: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            declaration: declaration.into(),
            severity: Severity::Fatal,
            message: message.into(),
        }
    }

    #[must_use]
    pub const fn is_fatal(&self) -> bool {
        matches!(self.severity, Severity::Fatal)
    }
}

///
/// DiagnosticSink
///

pub trait DiagnosticSink {
    fn report(&mut self, diagnostic: Diagnostic);
}

///
/// CollectingSink
///
/// Keeps every diagnostic in arrival order.
///

#[derive(Clone, Debug, Default)]
pub struct CollectingSink {
    diagnostics: Vec<Diagnostic>,
}

impl CollectingSink {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter().filter(|d| !d.is_fatal())
    }

    pub fn fatals(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter().filter(|d| d.is_fatal())
    }

    /// Diagnostics attached to one declaration.
    pub fn for_declaration<'a>(&'a self, key: &'a str) -> impl Iterator<Item = &'a Diagnostic> {
        self.diagnostics.iter().filter(move |d| d.declaration == key)
    }

    #[must_use]
    pub fn into_inner(self) -> Vec<Diagnostic> {
        self.diagnostics
    }
}

impl DiagnosticSink for CollectingSink {
    fn report(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }
}

///
/// TracingSink
///
/// Forwards diagnostics to `tracing`, which is how build scripts surface them.
///

#[derive(Clone, Copy, Debug, Default)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn report(&mut self, diagnostic: Diagnostic) {
        match diagnostic.severity {
            Severity::Warning => {
                warn!(declaration = %diagnostic.declaration, "{}", diagnostic.message);
            }
            Severity::Fatal => {
                error!(declaration = %diagnostic.declaration, "{}", diagnostic.message);
            }
        }
    }
}
