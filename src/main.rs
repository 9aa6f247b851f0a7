//! # Chiron
//!
//! This binary is the runtime entry point for Chiron. It reads a single
//! source file, runs it end to end (lex, parse, evaluate) and reports any
//! failure with a nonzero exit code. It owns no language semantics of its
//! own — that all lives in the `chiron` library.
extern crate chiron;

mod cli;

use cli::Cli;

use std::cell::RefCell;
use std::fs;
use std::io::{self, Write};
use std::process::ExitCode;
use std::rc::Rc;

use log::error;

fn main() -> ExitCode {
    let args = Cli::init();

    simple_logger::init_with_level(args.verbosity.into()).unwrap();

    let source = match fs::read_to_string(&args.file) {
        Ok(source) => source,
        Err(err) => {
            error!("could not read {}: {err}", args.file.display());
            return ExitCode::FAILURE;
        }
    };

    let stdout: Rc<RefCell<dyn Write>> = Rc::new(RefCell::new(io::stdout()));

    match chiron::run_source(&source, stdout) {
        Ok(_) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{err}");
            ExitCode::FAILURE
        }
    }
}
