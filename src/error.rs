use std::fmt::{self, Display};

use crate::evaluator::RuntimeError;
use crate::lexer::LexError;
use crate::parser::ParseError;

/// The union of everything that can go wrong running a Chiron program,
/// for the CLI boundary to report with a single exit path.
#[derive(Debug)]
pub enum ChironError {
    Lex(LexError),
    Parse(ParseError),
    Runtime(RuntimeError),
}

impl From<LexError> for ChironError {
    fn from(err: LexError) -> Self {
        ChironError::Lex(err)
    }
}

impl From<ParseError> for ChironError {
    fn from(err: ParseError) -> Self {
        ChironError::Parse(err)
    }
}

impl From<RuntimeError> for ChironError {
    fn from(err: RuntimeError) -> Self {
        ChironError::Runtime(err)
    }
}

impl Display for ChironError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChironError::Lex(err) => write!(f, "{err}"),
            ChironError::Parse(err) => write!(f, "{err}"),
            ChironError::Runtime(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for ChironError {}
