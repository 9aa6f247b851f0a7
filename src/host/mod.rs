pub mod stdlib;

use std::cell::RefCell;
use std::fmt::{self, Debug, Display};
use std::io::Write;
use std::rc::Rc;

use crate::value::Value;

/// Where `std.io.print` (and anything else that writes) sends its output.
/// A real CLI run wires this to stdout; tests wire it to an in-memory
/// buffer so program output can be asserted on without a subprocess.
pub type OutputSink = Rc<RefCell<dyn Write>>;

/// Something went wrong inside host-provided code: a bad argument count, an
/// unknown module path, an unknown export. Kept separate from
/// `RuntimeError` so the host bridge has no dependency on the evaluator.
#[derive(Debug, Clone)]
pub struct HostError(pub String);

impl Display for HostError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for HostError {}

/// A callable implemented in the host language rather than parsed from
/// Chiron source, e.g. `std.io.print`.
pub trait HostFunction: Debug {
    fn name(&self) -> &str;

    fn call(&self, positional: Vec<Value>, keyword: Vec<(String, Value)>) -> Result<Value, HostError>;
}

/// An exported symbol on a host module. A callable export binds into the
/// callable namespace on import; anything else binds into the variable
/// namespace (see spec §6 export contract).
#[derive(Debug, Clone)]
pub enum HostExport {
    Function(Rc<dyn HostFunction>),
    Value(Value),
}

/// A named collection of values and callables reachable via `import`.
///
/// `public_names` drives wildcard `from path import *`: in the absence of a
/// separate manifest, the convention is "everything not prefixed with `_`."
pub trait HostModule: Debug {
    fn path(&self) -> &str;

    fn public_names(&self) -> Vec<String>;

    fn get(&self, name: &str) -> Option<HostExport>;
}

pub type HostModuleHandle = Rc<dyn HostModule>;

/// Resolves dotted module paths to host modules. The `std.` prefix routes
/// to the bundled registry below; anything else is the host's general
/// module system, which is out of scope here and always reports "not
/// found" rather than pretending to resolve it.
#[derive(Debug)]
pub struct HostRegistry {
    out: OutputSink,
}

impl HostRegistry {
    pub fn new(out: OutputSink) -> Self {
        HostRegistry { out }
    }

    pub fn resolve(&self, path: &str) -> Result<HostModuleHandle, HostError> {
        if let Some(bundled) = path.strip_prefix("std.") {
            return stdlib::resolve_bundled(bundled, self.out.clone())
                .ok_or_else(|| HostError(format!("no bundled module 'std.{bundled}'")));
        }
        if path == "std" {
            return Err(HostError("'std' is a namespace, not a module: import a member of it".into()));
        }
        Err(HostError(format!(
            "module '{path}' is not available (the host's general module system is not part of this runtime)"
        )))
    }
}
