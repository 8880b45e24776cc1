use crate::printer;
use crate::types::Symbol;
use itertools::Itertools;
use std::fmt;

/// One node of the tree produced by the reader. Never mutated after reading.
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    NumberLiteral(f64),
    StringLiteral(String),
    Symbol(Symbol),
    /// A bracketed form, or the synthetic wrapper around a whole statement.
    List(Vec<Token>),
}

impl Token {
    pub fn new_symbol(name: &str) -> Self {
        Self::Symbol(Symbol::from(name))
    }

    pub fn new_string(contents: &str) -> Self {
        Self::StringLiteral(String::from(contents))
    }

    pub(crate) fn as_symbol(&self) -> Option<&Symbol> {
        match self {
            Token::Symbol(s) => Some(s),
            _ => None,
        }
    }

    pub(crate) fn as_list(&self) -> Option<&[Token]> {
        match self {
            Token::List(children) => Some(children),
            _ => None,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Token::NumberLiteral(_) => "number",
            Token::StringLiteral(_) => "string",
            Token::Symbol(_) => "symbol",
            Token::List(_) => "list",
        }
    }
}

// Serializes back to source text. String literals are written without
// escapes because the reader doesn't interpret any.
impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::NumberLiteral(n) => write!(f, "{}", printer::format_number(*n)),
            Token::StringLiteral(s) => write!(f, "\"{}\"", s),
            Token::Symbol(s) => write!(f, "{}", s),
            Token::List(children) => write!(f, "({})", children.iter().join(" ")),
        }
    }
}
