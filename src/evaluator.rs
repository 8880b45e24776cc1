use crate::environment::Environment;
use crate::primitives::Arity;
use crate::special_forms::{self, DefineError, LetError, SetError, SpecialForm};
use crate::tokens::Token;
use crate::types::{Closure, Symbol, TypeMismatch, Value};
use itertools::Itertools;

use std::fmt;

pub type Result<T = Value> = std::result::Result<T, Error>;

/// Everything that can go wrong evaluating a single statement. None of
/// these stop the statements after it from running.
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// A list form was given something that isn't a list.
    TypeMismatch(&'static str, TypeMismatch),
    Let(LetError),
    Define(DefineError),
    Set(SetError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::TypeMismatch(form, e) => write!(f, "type mismatch in {}: {}", form, e),
            Error::Let(e) => write!(f, "let: {}", e),
            Error::Define(e) => write!(f, "define: {}", e),
            Error::Set(e) => write!(f, "set: {}", e),
        }
    }
}

/// Evaluate `node` against `env`.
///
/// Unknown symbols and calls to undefined functions are not errors: they
/// evaluate to `Value::Absent`.
pub fn evaluate(node: &Token, env: &mut Environment) -> Result {
    log::trace!("evaluate {}", node);
    match node {
        Token::NumberLiteral(n) => Ok(Value::Number(*n)),
        Token::StringLiteral(s) => Ok(Value::String(s.clone())),
        Token::Symbol(s) => Ok(env.lookup(s)),
        Token::List(children) => evaluate_form(children, env),
    }
}

pub(crate) fn evaluate_or_absent(node: Option<&Token>, env: &mut Environment) -> Result {
    match node {
        Some(node) => evaluate(node, env),
        None => Ok(Value::Absent),
    }
}

fn evaluate_form(children: &[Token], env: &mut Environment) -> Result {
    let (head, args) = match children.split_first() {
        Some(split) => split,
        None => return Ok(Value::Absent),
    };
    match head {
        Token::Symbol(name) => match SpecialForm::from_name(name) {
            Some(form) => apply_special_form(form, args, env),
            None => apply_named(name, args, env),
        },
        // Not symbol-headed. I considered making this an error, but a
        // statement root wraps everything read from its text, so `(f 1)`
        // arrives here as `((f 1))`. Only the first item counts.
        _ => evaluate(head, env),
    }
}

fn apply_special_form(form: SpecialForm, args: &[Token], env: &mut Environment) -> Result {
    log::trace!("apply ({} {})", form, args.iter().join(" "));
    match form {
        SpecialForm::Let => special_forms::apply_let(args, env),
        SpecialForm::Set => special_forms::apply_set(args, env),
        SpecialForm::Define => special_forms::apply_define(args, env),
        SpecialForm::If => special_forms::apply_if(args, env),
        SpecialForm::Primitive(primitive) => {
            let operands = evaluate_operands(primitive.arity(), args, env)?;
            primitive.apply(&operands)
        }
    }
}

fn evaluate_operands(arity: Arity, args: &[Token], env: &mut Environment) -> Result<Vec<Value>> {
    match arity {
        Arity::Exactly(n) => (0..n)
            .map(|index| evaluate_or_absent(args.get(index), env))
            .collect(),
        Arity::Any => args.iter().map(|arg| evaluate(arg, env)).collect(),
    }
}

// A symbol-headed form that isn't special: call it if it names a closure,
// otherwise hand back whatever the symbol is bound to.
fn apply_named(name: &Symbol, args: &[Token], env: &mut Environment) -> Result {
    let value = env.lookup(name);
    match value.as_closure() {
        Some(closure) => apply_closure(closure, args, env),
        None => Ok(value),
    }
}

/// Call `closure` with unevaluated `args`.
///
/// Runs in a copy of the caller's environment. Arguments are evaluated in
/// that copy one at a time and bound straight away, so a later argument can
/// see an earlier parameter. Arguments beyond the parameter list are never
/// evaluated; missing ones are `Absent`.
pub fn apply_closure(closure: &Closure, args: &[Token], env: &Environment) -> Result {
    log::trace!("call {} with {}", closure, pretty_print_args(args));
    let mut scope = env.scope();
    for (index, parameter) in closure.parameters.iter().enumerate() {
        let value = evaluate_or_absent(args.get(index), &mut scope)?;
        scope.set(parameter.clone(), value);
    }
    let result = evaluate(&closure.body, &mut scope);
    match &result {
        Ok(value) => log::trace!("call to {} resulted in {}", closure.name, value),
        Err(e) => log::trace!("call to {} failed: {}", closure.name, e),
    }
    result
}

pub(crate) fn pretty_print_args(args: &[Token]) -> String {
    match args.len() {
        0 => "no args".into(),
        1 => args[0].to_string(),
        _ => format!("\n\t{}", args.iter().join("\n\t")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reader::read;
    use crate::types::strictly_equal;

    fn eval_all(source: &str, env: &mut Environment) -> Vec<Result> {
        read(source).iter().map(|node| evaluate(node, env)).collect()
    }

    fn eval_str(source: &str) -> Result {
        let mut env = Environment::new();
        eval_all(source, &mut env).pop().unwrap_or(Ok(Value::Absent))
    }

    fn numbers(xs: &[f64]) -> Value {
        Value::wrap_list(xs.iter().copied().map(Value::Number).collect())
    }

    #[test]
    fn literals() {
        assert_eq!(eval_str("42"), Ok(Value::Number(42.0)));
        assert_eq!(eval_str(r#""sid""#), Ok(Value::new_string("sid")));
    }

    #[test]
    fn unknown_symbols_are_absent() {
        assert_eq!(eval_str("nope"), Ok(Value::Absent));
        assert_eq!(eval_str("(nope 1 2)"), Ok(Value::Absent));
    }

    #[test]
    fn addition() {
        assert_eq!(eval_str("(+ 2 3)"), Ok(Value::Number(5.0)));
    }

    #[test]
    fn list_construction() {
        assert_eq!(
            eval_str(r#"(list 1 (+ 2 3) 4 "sid")"#),
            Ok(Value::wrap_list(vec![
                Value::Number(1.0),
                Value::Number(5.0),
                Value::Number(4.0),
                Value::new_string("sid"),
            ]))
        );
    }

    #[test]
    fn list_access() {
        assert_eq!(eval_str("(first (list 1 2 3))"), Ok(Value::Number(1.0)));
        assert_eq!(eval_str("(rest (list 1 2 3))"), Ok(numbers(&[2.0, 3.0])));
        assert_eq!(eval_str("(last (list 1 2 3))"), Ok(Value::Number(3.0)));
        assert_eq!(
            eval_str("(cons 2 (list 1 2 3))"),
            Ok(numbers(&[2.0, 1.0, 2.0, 3.0]))
        );
        assert_eq!(eval_str("(length (list 1 2))"), Ok(Value::Number(2.0)));
    }

    #[test]
    fn first_of_a_number_is_a_type_error() {
        assert_eq!(
            eval_str("(first 5)"),
            Err(Error::TypeMismatch("first", TypeMismatch::NotAList("number")))
        );
        assert_eq!(
            eval_str("(rest)"),
            Err(Error::TypeMismatch("rest", TypeMismatch::NotAList("absent")))
        );
    }

    #[test]
    fn arithmetic_folds() {
        assert_eq!(eval_str("(+)"), Ok(Value::Number(0.0)));
        assert_eq!(eval_str("(*)"), Ok(Value::Number(1.0)));
        assert_eq!(eval_str("(-)"), Ok(Value::Number(0.0)));
        assert_eq!(eval_str("(- 5)"), Ok(Value::Number(-5.0)));
        assert_eq!(eval_str("(- 10 2 3)"), Ok(Value::Number(5.0)));
        assert_eq!(eval_str("(* 2 3 4)"), Ok(Value::Number(24.0)));
        assert_eq!(eval_str("(/ 10 2)"), Ok(Value::Number(0.0)));
    }

    #[test]
    fn comparisons_only_look_at_two_arguments() {
        assert_eq!(eval_str("(> 4 2 100)"), Ok(Value::Bool(true)));
        assert_eq!(eval_str("(eql 1 1 2)"), Ok(Value::Bool(true)));
    }

    #[test]
    fn extra_arguments_to_fixed_forms_are_not_evaluated() {
        let mut env = Environment::new();
        eval_all("(first (list 1) (set x 1))", &mut env);
        assert_eq!(env.lookup("x"), Value::Absent);
    }

    #[test]
    fn logic_is_not_short_circuited() {
        let mut env = Environment::new();
        let results = eval_all("(or 1 (set x 2)) (and false (set y 3))", &mut env);
        assert_eq!(results[0], Ok(Value::Bool(true)));
        assert_eq!(results[1], Ok(Value::Bool(false)));
        assert_eq!(env.lookup("x"), Value::Number(2.0));
        assert_eq!(env.lookup("y"), Value::Number(3.0));
    }

    #[test]
    fn functions() {
        let mut env = Environment::new();
        let results = eval_all(
            "(define (square x) (* x x)) (square 2) (set x 40) (square x)",
            &mut env,
        );
        assert_eq!(results[1], Ok(Value::Number(4.0)));
        assert_eq!(results[3], Ok(Value::Number(1600.0)));
        assert_eq!(env.lookup("x"), Value::Number(40.0));
    }

    #[test]
    fn parameters_do_not_leak_into_the_caller() {
        let mut env = Environment::new();
        eval_all("(define (f y) (set z y)) (f 1)", &mut env);
        assert_eq!(env.lookup("y"), Value::Absent);
        assert_eq!(env.lookup("z"), Value::Absent);
    }

    #[test]
    fn free_variables_are_resolved_in_the_caller() {
        let mut env = Environment::new();
        let results = eval_all(
            "(define (get-n) n) (get-n) (let ((n 7)) (get-n)) (set n 1) (get-n)",
            &mut env,
        );
        assert_eq!(results[1], Ok(Value::Absent));
        assert_eq!(results[2], Ok(Value::Number(7.0)));
        assert_eq!(results[4], Ok(Value::Number(1.0)));
    }

    #[test]
    fn later_arguments_see_earlier_parameters() {
        let mut env = Environment::new();
        let results = eval_all("(define (pair a b) (list a b)) (pair 1 a)", &mut env);
        assert_eq!(results[1], Ok(numbers(&[1.0, 1.0])));
    }

    #[test]
    fn missing_arguments_are_absent() {
        let mut env = Environment::new();
        let results = eval_all("(define (id a) a) (id)", &mut env);
        assert_eq!(results[1], Ok(Value::Absent));
    }

    #[test]
    fn recursion() {
        let mut env = Environment::new();
        let results = eval_all(
            "(define (! x) (if (< x 1) 1 (* x (! (- x 1))))) (! 5)",
            &mut env,
        );
        assert_eq!(results[1], Ok(Value::Number(120.0)));
    }

    #[test]
    fn bracketed_variable_is_its_value() {
        let mut env = Environment::new();
        env.set("x", Value::Number(40.0));
        assert_eq!(eval_all("(x)", &mut env)[0], Ok(Value::Number(40.0)));
        assert_eq!(eval_all("(x 1 2)", &mut env)[0], Ok(Value::Number(40.0)));
    }

    #[test]
    fn only_functions_are_called() {
        let mut env = Environment::new();
        let results = eval_all(
            "(set xs (list 1 2)) (xs 3) (define (double x) (* 2 x)) (set twice double) (twice 4)",
            &mut env,
        );
        assert!(strictly_equal(results[1].as_ref().unwrap(), &env.lookup("xs")));
        assert_eq!(results[4], Ok(Value::Number(8.0)));
    }

    #[test]
    fn list_headed_form_evaluates_only_its_first_item() {
        let mut env = Environment::new();
        let results = eval_all("((+ 1 2) (set x 1)) (5 6)", &mut env);
        assert_eq!(results[0], Ok(Value::Number(3.0)));
        assert_eq!(results[1], Ok(Value::Number(5.0)));
        assert_eq!(env.lookup("x"), Value::Absent);
    }

    #[test]
    fn empty_form_is_absent() {
        assert_eq!(eval_str("()"), Ok(Value::Absent));
    }

    #[test]
    fn special_forms_win_over_definitions() {
        let mut env = Environment::new();
        let results = eval_all("(define (list x) 0) (list 1)", &mut env);
        assert_eq!(results[1], Ok(numbers(&[1.0])));
    }
}
