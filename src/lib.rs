pub mod ast;
pub mod callable;
pub mod environment;
pub mod error;
pub mod evaluator;
pub mod host;
pub mod lexer;
pub mod parser;
pub mod value;

use std::cell::RefCell;
use std::rc::Rc;

pub use error::ChironError;

use evaluator::Evaluator;
use host::OutputSink;
use lexer::Lexer;
use parser::Parser;
use value::Value;

/// Runs a full Chiron program end to end: lex, parse, evaluate. `out` is
/// where `std.io.print` (and anything else that writes) sends its output —
/// the CLI wires this to stdout, tests wire it to an in-memory buffer.
pub fn run_source(source: &str, out: OutputSink) -> Result<Value, ChironError> {
    let tokens = Lexer::new(source).lex()?;
    let program = Parser::new(tokens, source).parse_program()?;
    let evaluator = Evaluator::new(out);
    Ok(evaluator.run_program(&program)?)
}

/// Convenience entry point for tests: runs `source` and returns everything
/// written to the output sink as a UTF-8 string.
pub fn run_and_capture(source: &str) -> Result<String, ChironError> {
    let buffer: OutputSink = Rc::new(RefCell::new(Vec::new()));
    run_source(source, Rc::clone(&buffer))?;
    let bytes = buffer.borrow().clone();
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}
