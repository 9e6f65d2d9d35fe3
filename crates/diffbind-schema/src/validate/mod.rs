//! Declaration validation.
//!
//! Each declaration kind has a fixed, ordered list of fatal rules; the first
//! one that fires is the verdict. Advisory rules are all collected and only
//! matter when no fatal rule fired.

mod instructor;
mod model;


pub use instructor::validate_instructor;
pub use model::validate_model;
pub(crate) use model::{identity_param, params};

use crate::{
    decl::{Declarations, TypeDecl},
    diag::{Diagnostic, DiagnosticSink},
    error::ShapeError,
};

/// A fatal rule: `Some(message)` when the declaration violates it.
pub(crate) type FatalRule = fn(&TypeDecl, &Declarations) -> Option<String>;

/// An advisory rule: zero or more warning messages.
pub(crate) type AdvisoryRule = fn(&TypeDecl, &Declarations) -> Vec<String>;

///
/// Verdict
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Verdict {
    Clear,
    Warning(Vec<String>),
    Fatal(String),
}

impl Verdict {
    #[must_use]
    pub const fn is_fatal(&self) -> bool {
        matches!(self, Self::Fatal(_))
    }

    /// Forward the verdict to `sink` against `declaration`. A fatal verdict
    /// is also returned as a `ShapeError` so the caller skips the declaration.
    pub fn report(self, declaration: &str, sink: &mut dyn DiagnosticSink) -> Result<(), ShapeError> {
        match self {
            Self::Clear => Ok(()),
            Self::Warning(messages) => {
                for message in messages {
                    sink.report(Diagnostic::warning(declaration, message));
                }

                Ok(())
            }
            Self::Fatal(message) => {
                sink.report(Diagnostic::fatal(declaration, message.clone()));

                Err(ShapeError::new(declaration, message))
            }
        }
    }
}

// Run the fatal list with short-circuit, then the advisory list.
pub(crate) fn classify(
    decl: &TypeDecl,
    decls: &Declarations,
    fatal: &[FatalRule],
    advisory: &[AdvisoryRule],
) -> Verdict {
    if let Some(message) = fatal.iter().find_map(|rule| rule(decl, decls)) {
        return Verdict::Fatal(message);
    }

    let warnings: Vec<String> = advisory.iter().flat_map(|rule| rule(decl, decls)).collect();
    if warnings.is_empty() {
        Verdict::Clear
    } else {
        Verdict::Warning(warnings)
    }
}
