extern crate derive_more;
use crate::reader;
use crate::tokens::Token;
use derive_more::{Deref, DerefMut};
use itertools::Itertools;
use std::borrow::Borrow;
use std::fmt;
use std::fmt::Formatter;
use std::rc::Rc;

#[derive(Deref, DerefMut, Debug, Clone, Default, PartialEq)]
pub struct ValueList(pub Vec<Value>);

#[derive(Deref, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Clone)]
pub struct Symbol(pub String);

// Lets an Environment keyed by Symbol be queried with a plain &str.
impl Borrow<str> for Symbol {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Symbol {
    fn from(name: &str) -> Self {
        Symbol(name.into())
    }
}

impl From<String> for Symbol {
    fn from(name: String) -> Self {
        Symbol(name)
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A function stored by `define`.
///
/// There is no captured environment: the body is evaluated in a copy of
/// whatever environment the caller is using at the time of the call.
#[derive(Clone, Debug, PartialEq)]
pub struct Closure {
    pub name: Symbol,
    pub parameters: Vec<Symbol>,
    pub body: Token,
}

impl fmt::Display for Closure {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "#<function {} ({})>",
            self.name,
            self.parameters.iter().join(" ")
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Result of looking up something that isn't there.
    Absent,
    Number(f64),
    Bool(bool),
    String(String),
    List(Rc<ValueList>),
    Closure(Rc<Closure>),
}

pub(crate) fn truthy(value: &Value) -> bool {
    use Value::*;
    match value {
        Absent => false,
        Bool(b) => *b,
        Number(n) => *n != 0.0 && !n.is_nan(),
        String(s) => !s.is_empty(),
        List(_) | Closure(_) => true,
    }
}

/// Identity equality used by `eql`.
///
/// Lists and closures are only equal to themselves, never to a structurally
/// identical copy.
pub(crate) fn strictly_equal(lhs: &Value, rhs: &Value) -> bool {
    use Value::*;
    match (lhs, rhs) {
        (Absent, Absent) => true,
        (Number(x), Number(y)) => x == y,
        (Bool(x), Bool(y)) => x == y,
        (String(x), String(y)) => x == y,
        (List(x), List(y)) => Rc::ptr_eq(x, y),
        (Closure(x), Closure(y)) => Rc::ptr_eq(x, y),
        (_, _) => false,
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum TypeMismatch {
    NotAList(&'static str),
}

impl fmt::Display for TypeMismatch {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            TypeMismatch::NotAList(found) => write!(f, "expected a list but got {}", found),
        }
    }
}

impl Value {
    pub fn typename(&self) -> &'static str {
        use Value::*;
        match self {
            Absent => "absent",
            Number(_) => "number",
            Bool(_) => "boolean",
            String(_) => "string",
            List(_) => "list",
            Closure(_) => "function",
        }
    }

    pub(crate) fn as_list(&self) -> Result<&ValueList, TypeMismatch> {
        match self {
            Value::List(list) => Ok(list),
            other => Err(TypeMismatch::NotAList(other.typename())),
        }
    }

    pub(crate) fn as_closure(&self) -> Option<&Rc<Closure>> {
        match self {
            Value::Closure(c) => Some(c),
            _ => None,
        }
    }

    /// Numeric coercion shared by arithmetic and ordering. Anything that
    /// has no sensible number becomes NaN rather than an error.
    pub(crate) fn to_number(&self) -> f64 {
        match self {
            Value::Number(n) => *n,
            Value::Bool(true) => 1.0,
            Value::Bool(false) => 0.0,
            Value::String(s) => {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    0.0
                } else {
                    reader::parse_number(trimmed).unwrap_or(f64::NAN)
                }
            }
            Value::Absent | Value::List(_) | Value::Closure(_) => f64::NAN,
        }
    }
}

impl Value {
    pub fn wrap_list(elements: Vec<Value>) -> Self {
        Self::List(Rc::new(ValueList(elements)))
    }
    pub fn new_string(contents: &str) -> Self {
        Self::String(String::from(contents))
    }
}
