use std::fmt::{self, Display};

use crate::environment::EnvironmentError;
use crate::host::HostError;
use crate::lexer::Position;

#[derive(Debug, Clone, PartialEq)]
pub struct RuntimeError {
    pub message: String,
    pub position: Position,
}

impl RuntimeError {
    pub fn new(message: impl Into<String>, position: Position) -> Self {
        RuntimeError { message: message.into(), position }
    }
}

impl Display for RuntimeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "runtime error at {}: {}", self.position, self.message)
    }
}

impl std::error::Error for RuntimeError {}

/// Converting from `EnvironmentError`/`HostError` needs a position, which
/// those error types don't carry — use [`RuntimeError::new`] with the
/// position of the AST node that triggered the lookup instead.
pub(crate) trait AtPosition {
    fn at(self, position: Position) -> RuntimeError;
}

impl AtPosition for EnvironmentError {
    fn at(self, position: Position) -> RuntimeError {
        RuntimeError::new(self.0, position)
    }
}

impl AtPosition for HostError {
    fn at(self, position: Position) -> RuntimeError {
        RuntimeError::new(self.0, position)
    }
}

pub type RuntimeResult<T> = Result<T, RuntimeError>;
