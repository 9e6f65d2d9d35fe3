use thiserror::Error as ThisError;

///
/// ShapeError
///
/// A declaration does not meet the structural contract. Fatal for that
/// declaration only; the rest of the unit still generates.
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
#[error("{declaration}: {message}")]
pub struct ShapeError {
    pub declaration: String,
    pub message: String,
}

impl ShapeError {
    pub fn new(declaration: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            declaration: declaration.into(),
            message: message.into(),
        }
    }
}
