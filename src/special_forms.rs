use crate::environment::Environment;
use crate::evaluator::{evaluate, evaluate_or_absent, Error, Result};
use crate::primitives::Primitive;
use crate::tokens::Token;
use crate::types::{truthy, Closure, Symbol, Value};
use bimap::BiMap;
use std::fmt;
use std::rc::Rc;

/// Every symbol the evaluator treats specially when it heads a form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpecialForm {
    Let,
    Set,
    Define,
    If,
    /// Forms that evaluate (some of) their arguments up front.
    Primitive(Primitive),
}

lazy_static! {
    static ref NAMES: BiMap<&'static str, SpecialForm> = {
        use Primitive::*;
        let mut m = BiMap::new();
        m.insert("let", SpecialForm::Let);
        m.insert("set", SpecialForm::Set);
        m.insert("define", SpecialForm::Define);
        m.insert("if", SpecialForm::If);
        for &(name, primitive) in [
            // Working with lists
            ("list", List),
            ("first", First),
            ("rest", Rest),
            ("last", Last),
            ("cons", Cons),
            ("append", Append),
            ("length", Length),
            // Arithmetic
            ("+", Add),
            ("-", Subtract),
            ("*", Multiply),
            ("/", Divide),
            ("%", Remainder),
            // Comparisons
            (">", Greater),
            ("<", Less),
            (">=", GreaterOrEqual),
            ("<=", LessOrEqual),
            ("eql", Eql),
            // Logic
            ("or", Or),
            ("and", And),
        ]
        .iter()
        {
            m.insert(name, SpecialForm::Primitive(primitive));
        }
        m
    };
}

impl SpecialForm {
    pub fn from_name(name: &str) -> Option<Self> {
        NAMES.get_by_left(name).copied()
    }

    pub fn name(self) -> &'static str {
        NAMES.get_by_right(&self).copied().unwrap_or("<unnamed>")
    }
}

impl fmt::Display for SpecialForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum LetError {
    BindingsNotAList,
    /// The binding at this position isn't a list headed by a symbol.
    BadBinding(usize),
}

impl fmt::Display for LetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LetError::BindingsNotAList => write!(f, "bindings must be a list of (name value) pairs"),
            LetError::BadBinding(i) => write!(f, "binding {} is not a (name value) pair", i),
        }
    }
}

pub fn apply_let(args: &[Token], env: &mut Environment) -> Result {
    let (bindings, body) = args
        .split_first()
        .ok_or(Error::Let(LetError::BindingsNotAList))?;
    let bindings = bindings
        .as_list()
        .ok_or(Error::Let(LetError::BindingsNotAList))?;

    // Values are computed in the enclosing environment, so one binding can't
    // see another.
    let mut scope = env.scope();
    for (index, binding) in bindings.iter().enumerate() {
        let (name, expr) =
            binding_pair(binding).ok_or(Error::Let(LetError::BadBinding(index)))?;
        let value = evaluate_or_absent(expr, env)?;
        log::trace!("let {} = {}", name, value);
        scope.set(name.clone(), value);
    }

    match body.split_last() {
        Some((last, effects)) => {
            for form in effects {
                evaluate(form, &mut scope)?;
            }
            evaluate(last, &mut scope)
        }
        None => Ok(Value::Absent),
    }
}

fn binding_pair(binding: &Token) -> Option<(&Symbol, Option<&Token>)> {
    let pair = binding.as_list()?;
    let name = pair.first()?.as_symbol()?;
    Some((name, pair.get(1)))
}

#[derive(Debug, Clone, PartialEq)]
pub enum SetError {
    TargetNotASymbol,
}

impl fmt::Display for SetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SetError::TargetNotASymbol => write!(f, "can only set a symbol"),
        }
    }
}

/// Writes into `env` itself rather than a copy. At top level that is the
/// shared environment, so later statements see the new value.
pub fn apply_set(args: &[Token], env: &mut Environment) -> Result {
    let target = args
        .first()
        .and_then(Token::as_symbol)
        .ok_or(Error::Set(SetError::TargetNotASymbol))?;
    let value = evaluate_or_absent(args.get(1), env)?;
    log::debug!("set {} to {}", target, value);
    env.set(target.clone(), value.clone());
    Ok(value)
}

#[derive(Debug, Clone, PartialEq)]
pub enum DefineError {
    SignatureNotAList,
    NameNotASymbol,
    ParameterNotASymbol(usize),
}

impl fmt::Display for DefineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DefineError::SignatureNotAList => write!(f, "expected (name parameters...)"),
            DefineError::NameNotASymbol => write!(f, "function name must be a symbol"),
            DefineError::ParameterNotASymbol(i) => write!(f, "parameter {} is not a symbol", i),
        }
    }
}

pub fn apply_define(args: &[Token], env: &mut Environment) -> Result {
    let signature = args
        .first()
        .and_then(Token::as_list)
        .ok_or(Error::Define(DefineError::SignatureNotAList))?;
    let name = signature
        .first()
        .and_then(Token::as_symbol)
        .ok_or(Error::Define(DefineError::NameNotASymbol))?;
    let parameters = signature[1..]
        .iter()
        .enumerate()
        .map(|(index, parameter)| {
            parameter
                .as_symbol()
                .cloned()
                .ok_or(Error::Define(DefineError::ParameterNotASymbol(index)))
        })
        .collect::<Result<Vec<Symbol>>>()?;
    // A missing body behaves like `()`.
    let body = args.get(1).cloned().unwrap_or_else(|| Token::List(Vec::new()));

    let closure = Closure {
        name: name.clone(),
        parameters,
        body,
    };
    log::debug!("define {}", closure);
    env.set(name.clone(), Value::Closure(Rc::new(closure)));
    Ok(Value::String(name.0.clone()))
}

pub fn apply_if(args: &[Token], env: &mut Environment) -> Result {
    let condition = evaluate_or_absent(args.first(), env)?;
    if truthy(&condition) {
        evaluate_or_absent(args.get(1), env)
    } else {
        match args.get(2) {
            Some(otherwise) => evaluate(otherwise, env),
            None => Ok(Value::Bool(false)),
        }
    }
}
