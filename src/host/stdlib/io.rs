use std::io::Write as _;
use std::rc::Rc;

use crate::host::{HostError, HostExport, HostFunction, HostModule, HostModuleHandle, OutputSink};
use crate::value::Value;

/// `std.io`: the bundled module exposing `print` and `input`, the only two
/// names the original stdlib's `io` module exports.
#[derive(Debug)]
struct IoModule {
    out: OutputSink,
}

pub fn module(out: OutputSink) -> HostModuleHandle {
    Rc::new(IoModule { out })
}

impl HostModule for IoModule {
    fn path(&self) -> &str {
        "std.io"
    }

    fn public_names(&self) -> Vec<String> {
        vec!["print".to_string(), "input".to_string()]
    }

    fn get(&self, name: &str) -> Option<HostExport> {
        match name {
            "print" => Some(HostExport::Function(Rc::new(Print { out: self.out.clone() }))),
            "input" => Some(HostExport::Function(Rc::new(Input { out: self.out.clone() }))),
            _ => None,
        }
    }
}

#[derive(Debug)]
struct Print {
    out: OutputSink,
}

impl HostFunction for Print {
    fn name(&self) -> &str {
        "print"
    }

    fn call(&self, positional: Vec<Value>, keyword: Vec<(String, Value)>) -> Result<Value, HostError> {
        if !keyword.is_empty() {
            return Err(HostError("print: keyword arguments are not supported".into()));
        }
        let rendered: Vec<String> = positional.iter().map(Value::to_string).collect();
        let mut out = self.out.borrow_mut();
        writeln!(out, "{}", rendered.join(" ")).map_err(|e| HostError(e.to_string()))?;
        Ok(Value::Unit)
    }
}

#[derive(Debug)]
struct Input {
    out: OutputSink,
}

impl HostFunction for Input {
    fn name(&self) -> &str {
        "input"
    }

    fn call(&self, positional: Vec<Value>, keyword: Vec<(String, Value)>) -> Result<Value, HostError> {
        if positional.len() > 1 || !keyword.is_empty() {
            return Err(HostError("input: expected at most one positional prompt argument".into()));
        }
        if let Some(prompt) = positional.first() {
            let mut out = self.out.borrow_mut();
            write!(out, "{prompt}").map_err(|e| HostError(e.to_string()))?;
            out.flush().map_err(|e| HostError(e.to_string()))?;
        }
        let mut line = String::new();
        std::io::stdin()
            .read_line(&mut line)
            .map_err(|e| HostError(e.to_string()))?;
        if line.ends_with('\n') {
            line.pop();
            if line.ends_with('\r') {
                line.pop();
            }
        }
        Ok(Value::Str(line))
    }
}
