use colored::Colorize;
use std::{error::Error, fmt::Display};

use crate::lexer::Position;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    pub message: String,
    pub position: Position,
    /// The offending source line, captured at error time so `Display` can
    /// render a caret excerpt without the error outliving the source.
    pub line_text: Option<String>,
}

impl ParseError {
    pub fn new(message: impl Into<String>, position: Position, line_text: Option<&str>) -> Self {
        ParseError {
            message: message.into(),
            position,
            line_text: line_text.map(str::to_string),
        }
    }
}

impl Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let Some(line_str) = &self.line_text else {
            return write!(f, "{} at {}", self.message, self.position);
        };

        let margin = format!("{}", self.position.line).len();
        let fill = " ".repeat(margin);
        let padding = " ".repeat(self.position.column.saturating_sub(1));
        let caret = "^".red();

        write!(
            f,
            "{fill} |\n{line} |{line_str}\n{fill} |{padding}{caret} {message}",
            line = self.position.line,
            message = self.message,
        )
    }
}

impl Error for ParseError {}

pub type ParseResult<T> = Result<T, ParseError>;
