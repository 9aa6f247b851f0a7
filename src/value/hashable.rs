use std::fmt::{self, Display};
use std::hash::{Hash, Hasher};

use super::Value;

/// The hashable subset of [`Value`], used as map literal keys.
///
/// Floats hash on their bit pattern rather than comparing by `==`, which is
/// the usual workaround for `f64` not implementing `Eq`; two floats that are
/// bit-identical hash and compare equal, `NaN` included.
#[derive(Debug, Clone)]
pub enum HashableValue {
    Integer(i64),
    Float(u64),
    Boolean(bool),
    Char(char),
    Str(String),
    Tuple(Vec<HashableValue>),
}

impl HashableValue {
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Integer(n) => Some(HashableValue::Integer(*n)),
            Value::Float(f) => Some(HashableValue::Float(f.to_bits())),
            Value::Boolean(b) => Some(HashableValue::Boolean(*b)),
            Value::Char(c) => Some(HashableValue::Char(*c)),
            Value::Str(s) => Some(HashableValue::Str(s.clone())),
            Value::Tuple(items) => items
                .iter()
                .map(HashableValue::from_value)
                .collect::<Option<Vec<_>>>()
                .map(HashableValue::Tuple),
            Value::Array(_)
            | Value::Map(_)
            | Value::HostFunction(_)
            | Value::UserFunction(_)
            | Value::HostModule(_)
            | Value::Unit => None,
        }
    }

    pub fn into_value(self) -> Value {
        match self {
            HashableValue::Integer(n) => Value::Integer(n),
            HashableValue::Float(bits) => Value::Float(f64::from_bits(bits)),
            HashableValue::Boolean(b) => Value::Boolean(b),
            HashableValue::Char(c) => Value::Char(c),
            HashableValue::Str(s) => Value::Str(s),
            HashableValue::Tuple(items) => {
                Value::Tuple(std::rc::Rc::new(items.into_iter().map(Self::into_value).collect()))
            }
        }
    }
}

impl PartialEq for HashableValue {
    fn eq(&self, other: &Self) -> bool {
        use HashableValue::*;
        match (self, other) {
            (Integer(a), Integer(b)) => a == b,
            (Float(a), Float(b)) => a == b,
            (Boolean(a), Boolean(b)) => a == b,
            (Char(a), Char(b)) => a == b,
            (Str(a), Str(b)) => a == b,
            (Tuple(a), Tuple(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for HashableValue {}

impl Hash for HashableValue {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            HashableValue::Integer(n) => n.hash(state),
            HashableValue::Float(bits) => bits.hash(state),
            HashableValue::Boolean(b) => b.hash(state),
            HashableValue::Char(c) => c.hash(state),
            HashableValue::Str(s) => s.hash(state),
            HashableValue::Tuple(items) => items.hash(state),
        }
    }
}

impl Display for HashableValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HashableValue::Integer(n) => write!(f, "{n}"),
            HashableValue::Float(bits) => write!(f, "{}", f64::from_bits(*bits)),
            HashableValue::Boolean(b) => write!(f, "{b}"),
            HashableValue::Char(c) => write!(f, "{c}"),
            HashableValue::Str(s) => write!(f, "{s}"),
            HashableValue::Tuple(items) => {
                write!(f, "(")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{item}")?;
                }
                write!(f, ")")
            }
        }
    }
}
