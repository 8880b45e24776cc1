use crate::types::{Symbol, Value};
use derive_more::{Deref, DerefMut};
use itertools::Itertools;
use std::collections::HashMap;
use std::fmt;

// There's no parent pointer here, unlike most Lisp environments. Scoping is
// dynamic: a function body sees whatever its caller can see. So a nested scope
// is just a copy of the map, which keeps lookup trivial at the cost of cloning
// on every call. Lists and functions sit behind `Rc`, so I haven't found that
// to matter.

/// Name to value bindings.
///
/// `let` and function calls work on a [`scope`](Environment::scope): a
/// shallow copy, so bindings and `set`s made inside never reach the parent.
/// Top-level `set` and `define` write straight into the environment handed
/// to the statement loop.
#[derive(Deref, DerefMut, Debug, Clone, Default, PartialEq)]
pub struct Environment(HashMap<Symbol, Value>);

impl Environment {
    pub fn new() -> Self {
        Self::default()
    }

    /// Missing names are not an error; they evaluate to `Value::Absent`.
    pub fn lookup(&self, name: &str) -> Value {
        self.0.get(name).cloned().unwrap_or(Value::Absent)
    }

    pub fn set<T>(&mut self, key: T, value: Value) -> Option<Value>
    where
        T: Into<Symbol>,
    {
        self.0.insert(key.into(), value)
    }

    /// A fresh environment starting with the same bindings as this one.
    pub fn scope(&self) -> Self {
        self.clone()
    }

    /// Values are never mutated in place, so a clone is a deep snapshot.
    pub fn snapshot(&self) -> Self {
        self.clone()
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{{{}}}",
            self.0
                .iter()
                .sorted_by(|(a, _), (b, _)| a.cmp(b))
                .map(|(name, value)| format!("{}: {}", name, value))
                .join(", ")
        )
    }
}
