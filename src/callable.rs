use std::rc::Rc;

use crate::ast::{Param, Statement};
use crate::environment::Environment;

/// A user-defined function or procedure.
///
/// `closure` is the environment in effect at the point the callable was
/// declared, not the caller's environment — each invocation builds a fresh
/// environment whose parent is this one, giving Chiron functions proper
/// lexical closures.
#[derive(Debug)]
pub struct Callable {
    pub name: String,
    pub params: Vec<Param>,
    pub body: Vec<Statement>,
    pub closure: Rc<Environment>,
}

impl Callable {
    pub fn new(name: String, params: Vec<Param>, body: Vec<Statement>, closure: Rc<Environment>) -> Self {
        Callable { name, params, body, closure }
    }

    pub fn arity(&self) -> usize {
        self.params.len()
    }
}
