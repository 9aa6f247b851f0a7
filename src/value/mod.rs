mod hashable;

pub use hashable::HashableValue;

use std::{
    cell::RefCell,
    fmt::{self, Display},
    rc::Rc,
};

use indexmap::IndexMap;

use crate::{callable::Callable, host::HostModuleHandle};

/// A Chiron runtime value. Arrays and maps use interior mutability
/// (`Rc<RefCell<_>>`) since Chiron values are reference-like once captured
/// by a binding — the same array bound under two names observes mutations
/// through either.
#[derive(Debug, Clone)]
pub enum Value {
    Integer(i64),
    Float(f64),
    Boolean(bool),
    Char(char),
    Str(String),
    Array(Rc<RefCell<Vec<Value>>>),
    Tuple(Rc<Vec<Value>>),
    Map(Rc<RefCell<IndexMap<HashableValue, Value>>>),
    HostFunction(Rc<dyn crate::host::HostFunction>),
    UserFunction(Rc<Callable>),
    HostModule(HostModuleHandle),
    Unit,
}

impl Value {
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Integer(_) => "int",
            Value::Float(_) => "float",
            Value::Boolean(_) => "bool",
            Value::Char(_) => "char",
            Value::Str(_) => "str",
            Value::Array(_) => "array",
            Value::Tuple(_) => "tuple",
            Value::Map(_) => "map",
            Value::HostFunction(_) => "callable",
            Value::UserFunction(_) => "callable",
            Value::HostModule(_) => "module",
            Value::Unit => "unit",
        }
    }

    /// Truthiness used by `if`/`while`/`for` conditions and by `and`/`or`.
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Integer(n) => *n != 0,
            Value::Float(f) => *f != 0.0,
            Value::Boolean(b) => *b,
            Value::Char(c) => *c != '\0',
            Value::Str(s) => !s.is_empty(),
            Value::Array(a) => !a.borrow().is_empty(),
            Value::Tuple(t) => !t.is_empty(),
            Value::Map(m) => !m.borrow().is_empty(),
            Value::HostFunction(_) | Value::UserFunction(_) | Value::HostModule(_) => true,
            Value::Unit => false,
        }
    }

    /// The hashable projection of this value, used as a map key. Returns
    /// `None` for the non-hashable subset (array, map, host objects).
    pub fn as_hashable(&self) -> Option<HashableValue> {
        HashableValue::from_value(self)
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Integer(n) => write!(f, "{n}"),
            Value::Float(x) => write!(f, "{x}"),
            Value::Boolean(b) => write!(f, "{b}"),
            Value::Char(c) => write!(f, "{c}"),
            Value::Str(s) => write!(f, "{s}"),
            Value::Array(items) => {
                write!(f, "[")?;
                for (i, item) in items.borrow().iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{item}")?;
                }
                write!(f, "]")
            }
            Value::Tuple(items) => {
                write!(f, "(")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{item}")?;
                }
                write!(f, ")")
            }
            Value::Map(entries) => {
                write!(f, "{{")?;
                for (i, (key, value)) in entries.borrow().iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{key}: {value}")?;
                }
                write!(f, "}}")
            }
            Value::HostFunction(func) => write!(f, "<host function {}>", func.name()),
            Value::UserFunction(callable) => write!(f, "<function {}>", callable.name),
            Value::HostModule(module) => write!(f, "<module {}>", module.path()),
            Value::Unit => write!(f, "unit"),
        }
    }
}
