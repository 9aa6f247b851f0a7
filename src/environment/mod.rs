use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt::{self, Display};
use std::rc::Rc;

use crate::callable::Callable;
use crate::host::HostModuleHandle;
use crate::value::Value;

/// A node in the parent-chained scope tree.
///
/// Each node owns three independent namespaces — variables, callables,
/// modules — so `x` the variable and `x` the callable never collide.
/// `define_*` only ever touches the current node; `get_*`/`set_*` walk
/// ancestors. The parent link is a strong `Rc`: this tree only ever grows
/// child -> parent edges, never the reverse, so there is no cycle for a
/// weak pointer to break.
#[derive(Debug)]
pub struct Environment {
    parent: Option<Rc<Environment>>,
    variables: RefCell<HashMap<String, Value>>,
    callables: RefCell<HashMap<String, Rc<Callable>>>,
    modules: RefCell<HashMap<String, HostModuleHandle>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvironmentError(pub String);

impl Display for EnvironmentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for EnvironmentError {}

impl Environment {
    pub fn root() -> Rc<Environment> {
        Rc::new(Environment {
            parent: None,
            variables: RefCell::new(HashMap::new()),
            callables: RefCell::new(HashMap::new()),
            modules: RefCell::new(HashMap::new()),
        })
    }

    pub fn child(parent: &Rc<Environment>) -> Rc<Environment> {
        Rc::new(Environment {
            parent: Some(Rc::clone(parent)),
            variables: RefCell::new(HashMap::new()),
            callables: RefCell::new(HashMap::new()),
            modules: RefCell::new(HashMap::new()),
        })
    }

    // -- variables --------------------------------------------------------

    pub fn define_var(&self, name: impl Into<String>, value: Value) {
        self.variables.borrow_mut().insert(name.into(), value);
    }

    pub fn get_var(&self, name: &str) -> Result<Value, EnvironmentError> {
        if let Some(value) = self.variables.borrow().get(name) {
            return Ok(value.clone());
        }
        match &self.parent {
            Some(parent) => parent.get_var(name),
            None => Err(EnvironmentError(format!("name '{name}' is not defined"))),
        }
    }

    pub fn set_var(&self, name: &str, value: Value) -> Result<(), EnvironmentError> {
        if self.variables.borrow().contains_key(name) {
            self.variables.borrow_mut().insert(name.to_string(), value);
            return Ok(());
        }
        match &self.parent {
            Some(parent) => parent.set_var(name, value),
            None => Err(EnvironmentError(format!("cannot assign to undefined name '{name}'"))),
        }
    }

    // -- callables ----------------------------------------------------------

    pub fn define_func(&self, name: impl Into<String>, callable: Rc<Callable>) {
        self.callables.borrow_mut().insert(name.into(), callable);
    }

    pub fn get_func(&self, name: &str) -> Result<Rc<Callable>, EnvironmentError> {
        if let Some(callable) = self.callables.borrow().get(name) {
            return Ok(Rc::clone(callable));
        }
        match &self.parent {
            Some(parent) => parent.get_func(name),
            None => Err(EnvironmentError(format!("callable '{name}' is not defined"))),
        }
    }

    // -- modules --------------------------------------------------------

    pub fn define_module(&self, name: impl Into<String>, module: HostModuleHandle) {
        self.modules.borrow_mut().insert(name.into(), module);
    }

    pub fn get_module(&self, name: &str) -> Result<HostModuleHandle, EnvironmentError> {
        if let Some(module) = self.modules.borrow().get(name) {
            return Ok(Rc::clone(module));
        }
        match &self.parent {
            Some(parent) => parent.get_module(name),
            None => Err(EnvironmentError(format!("module '{name}' is not imported"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn define_then_get_in_same_scope() {
        let env = Environment::root();
        env.define_var("x", Value::Integer(1));
        assert!(matches!(env.get_var("x"), Ok(Value::Integer(1))));
    }

    #[test]
    fn get_walks_parent_chain() {
        let parent = Environment::root();
        parent.define_var("x", Value::Integer(7));
        let child = Environment::child(&parent);
        assert!(matches!(child.get_var("x"), Ok(Value::Integer(7))));
    }

    #[test]
    fn get_errors_past_root() {
        let env = Environment::root();
        assert!(env.get_var("missing").is_err());
    }

    #[test]
    fn define_never_touches_ancestor() {
        let parent = Environment::root();
        let child = Environment::child(&parent);
        child.define_var("y", Value::Integer(1));
        assert!(parent.get_var("y").is_err());
    }

    #[test]
    fn set_updates_defining_scope_not_child() {
        let parent = Environment::root();
        parent.define_var("x", Value::Integer(1));
        let child = Environment::child(&parent);
        child.set_var("x", Value::Integer(2)).unwrap();
        assert!(matches!(parent.get_var("x"), Ok(Value::Integer(2))));
        assert!(child.variables.borrow().is_empty());
    }

    #[test]
    fn set_never_creates() {
        let env = Environment::root();
        assert!(env.set_var("nope", Value::Integer(1)).is_err());
    }

    #[test]
    fn variable_and_callable_namespaces_are_independent() {
        let env = Environment::root();
        env.define_var("f", Value::Integer(1));
        assert!(env.get_func("f").is_err());
    }
}
