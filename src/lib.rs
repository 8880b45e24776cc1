#[macro_use]
extern crate lazy_static;

pub mod cmdline;
pub mod environment;
pub mod evaluator;
pub mod interpreter;
pub mod parser;
pub mod primitives;
pub mod printer;
pub mod reader;
pub mod special_forms;
mod strings;
pub mod tokens;
pub mod types;

pub use environment::Environment;
pub use types::Value;
