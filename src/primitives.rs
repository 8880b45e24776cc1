use crate::evaluator;
use crate::special_forms::SpecialForm;
use crate::types::{strictly_equal, truthy, TypeMismatch, Value};
use std::cmp::Ordering;

/// Forms whose arguments are evaluated before the form itself runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Primitive {
    List,
    First,
    Rest,
    Last,
    Cons,
    Append,
    Length,
    Add,
    Subtract,
    Multiply,
    Divide,
    Remainder,
    Greater,
    Less,
    GreaterOrEqual,
    LessOrEqual,
    Eql,
    Or,
    And,
}

/// How many argument nodes get evaluated. `Exactly(n)` evaluates the first
/// `n` (missing ones become `Absent`) and never looks at the rest.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    Exactly(usize),
    Any,
}

impl Primitive {
    pub fn arity(self) -> Arity {
        use Primitive::*;
        match self {
            First | Rest | Last | Length => Arity::Exactly(1),
            Cons | Greater | Less | GreaterOrEqual | LessOrEqual | Eql => Arity::Exactly(2),
            List | Append | Add | Subtract | Multiply | Divide | Remainder | Or | And => {
                Arity::Any
            }
        }
    }

    pub fn name(self) -> &'static str {
        SpecialForm::Primitive(self).name()
    }

    pub fn apply(self, args: &[Value]) -> evaluator::Result {
        use Primitive::*;
        log::trace!("call {} with {}", self.name(), pretty_print_args(args));
        let result = match self {
            List => Ok(list_(args)),
            First => first_(args),
            Rest => rest_(args),
            Last => last_(args),
            Cons => cons_(args),
            Append => append_(args),
            Length => length_(args),
            Add => Ok(sum_(args)),
            Subtract => Ok(sub_(args)),
            Multiply => Ok(mul_(args)),
            Divide => Ok(div_(args)),
            Remainder => Ok(rem_(args)),
            Greater => Ok(compare_gt(args)),
            Less => Ok(compare_lt(args)),
            GreaterOrEqual => Ok(compare_ge(args)),
            LessOrEqual => Ok(compare_le(args)),
            Eql => Ok(eql_(args)),
            Or => Ok(Value::Bool(args.iter().any(truthy))),
            And => Ok(Value::Bool(args.iter().all(truthy))),
        };
        result.map_err(|e| evaluator::Error::TypeMismatch(self.name(), e))
    }
}

fn pretty_print_args(args: &[Value]) -> String {
    use itertools::Itertools;
    match args.len() {
        0 => "no args".into(),
        _ => args.iter().join(" "),
    }
}

fn nth_list(args: &[Value], n: usize) -> Result<&[Value], TypeMismatch> {
    match args.get(n) {
        Some(value) => value.as_list().map(|list| list.as_slice()),
        None => Err(TypeMismatch::NotAList(Value::Absent.typename())),
    }
}

fn list_(args: &[Value]) -> Value {
    Value::wrap_list(args.to_vec())
}

fn first_(args: &[Value]) -> Result<Value, TypeMismatch> {
    let list = nth_list(args, 0)?;
    Ok(list.first().cloned().unwrap_or(Value::Absent))
}

fn rest_(args: &[Value]) -> Result<Value, TypeMismatch> {
    let list = nth_list(args, 0)?;
    Ok(Value::wrap_list(list.iter().skip(1).cloned().collect()))
}

fn last_(args: &[Value]) -> Result<Value, TypeMismatch> {
    let list = nth_list(args, 0)?;
    Ok(list.last().cloned().unwrap_or(Value::Absent))
}

// Prepends one element. Unlike append, the head is never spread.
fn cons_(args: &[Value]) -> Result<Value, TypeMismatch> {
    let head = args.get(0).cloned().unwrap_or(Value::Absent);
    let tail = nth_list(args, 1)?;

    let mut elements = Vec::with_capacity(tail.len() + 1);
    elements.push(head);
    elements.extend(tail.iter().cloned());
    Ok(Value::wrap_list(elements))
}

fn append_(args: &[Value]) -> Result<Value, TypeMismatch> {
    let mut output = Vec::new();
    for arg in args {
        output.extend(arg.as_list()?.iter().cloned());
    }
    Ok(Value::wrap_list(output))
}

fn length_(args: &[Value]) -> Result<Value, TypeMismatch> {
    let list = nth_list(args, 0)?;
    Ok(Value::Number(list.len() as f64))
}

fn numbers(args: &[Value]) -> impl Iterator<Item = f64> + '_ {
    args.iter().map(Value::to_number)
}

fn sum_(args: &[Value]) -> Value {
    Value::Number(numbers(args).fold(0.0, |acc, x| acc + x))
}

fn sub_(args: &[Value]) -> Value {
    let nums = numbers(args).collect::<Vec<_>>();
    let value = match nums.split_first() {
        None => 0.0,
        Some((x, [])) => -x,
        Some((x, rest)) => x - rest.iter().fold(0.0, |acc, y| acc + y),
    };
    Value::Number(value)
}

fn mul_(args: &[Value]) -> Value {
    Value::Number(numbers(args).fold(1.0, |acc, x| acc * x))
}

// Division and remainder fold from 0, so `(/ 10 2)` is 0 / 10 / 2. That's
// almost certainly not what anyone wants, but programs written against this
// language rely on exactly what it does today. I'd rather leave it visibly odd
// (and tested) than quietly change the answer.
fn div_(args: &[Value]) -> Value {
    Value::Number(numbers(args).fold(0.0, |acc, x| acc / x))
}

fn rem_(args: &[Value]) -> Value {
    Value::Number(numbers(args).fold(0.0, |acc, x| acc % x))
}

/// Two strings order lexicographically, anything else numerically. `None`
/// when either side is NaN.
fn compare(args: &[Value]) -> Option<Ordering> {
    let absent = Value::Absent;
    let lhs = args.get(0).unwrap_or(&absent);
    let rhs = args.get(1).unwrap_or(&absent);
    match (lhs, rhs) {
        (Value::String(x), Value::String(y)) => Some(x.cmp(y)),
        (x, y) => x.to_number().partial_cmp(&y.to_number()),
    }
}

macro_rules! comparison_primitive {
    ($NAME:ident, $($ordering:ident),+) => {
        paste::item! {
            fn [<compare_ $NAME:lower>](args: &[Value]) -> Value {
                Value::Bool(matches!(compare(args), $(Some(Ordering::$ordering))|+))
            }
        }
    };
}

comparison_primitive!(GT, Greater);
comparison_primitive!(LT, Less);
comparison_primitive!(GE, Greater, Equal);
comparison_primitive!(LE, Less, Equal);

fn eql_(args: &[Value]) -> Value {
    let absent = Value::Absent;
    let lhs = args.get(0).unwrap_or(&absent);
    let rhs = args.get(1).unwrap_or(&absent);
    Value::Bool(strictly_equal(lhs, rhs))
}
