use crate::environment::Environment;
use crate::evaluator;
use crate::parser::{self, Statement, StructuralError};
use std::fmt;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    Structural(StructuralError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Structural(e) => write!(f, "{}", e),
        }
    }
}

impl From<StructuralError> for Error {
    fn from(e: StructuralError) -> Self {
        Self::Structural(e)
    }
}

/// The outcome of running one statement.
#[derive(Debug)]
pub struct Evaluation {
    pub statement: Statement,
    pub value: evaluator::Result,
    /// The environment right after this statement, in debug runs only.
    pub env: Option<Environment>,
}

pub fn parse(source: &str) -> Result<Vec<Statement>> {
    Ok(parser::split(source)?)
}

/// Evaluate `statements` in order against the shared `env`, so each one
/// sees the `set`s and `define`s of those before it. A failing statement
/// doesn't stop the rest.
pub fn interpret(statements: Vec<Statement>, env: &mut Environment, debug: bool) -> Vec<Evaluation> {
    let mut evaluations = Vec::with_capacity(statements.len());
    for statement in statements {
        let value = evaluator::evaluate(&statement.root, env);
        match &value {
            Ok(v) => log::debug!("{} => {}", statement.source, v),
            Err(e) => log::info!("{} failed: {}", statement.source, e),
        }
        let snapshot = match debug {
            true => Some(env.snapshot()),
            false => None,
        };
        evaluations.push(Evaluation {
            statement,
            value,
            env: snapshot,
        });
    }
    evaluations
}

/// Parse and evaluate a whole program. Unbalanced brackets anywhere mean
/// nothing is evaluated.
pub fn run(source: &str, env: &mut Environment, debug: bool) -> Result<Vec<Evaluation>> {
    let statements = parse(source)?;
    Ok(interpret(statements, env, debug))
}
