use crate::strings;
use crate::types::Value;
use itertools::Itertools;
use std::fmt;

/// The form the REPL and batch runner echo back: strings quoted and escaped
/// so that what you see could be typed in again.
pub fn pr_str(value: &Value) -> String {
    match value {
        Value::Absent => String::from("absent"),
        Value::Number(n) => format_number(*n),
        Value::Bool(b) => b.to_string(),
        Value::String(s) => strings::string_repr(s),
        Value::List(elements) => format!("({})", elements.iter().map(pr_str).join(" ")),
        Value::Closure(c) => c.to_string(),
    }
}

/// Integers print without a fraction; the non-finite values print as
/// `NaN`, `Infinity` and `-Infinity`.
///
/// Very large and very small magnitudes switch to exponent form with an
/// explicit sign on the exponent (`1e+21`, `1.5e-7`), which is what people
/// used to JavaScript's number printing will expect to see. Rust's `{:e}`
/// already picks the shortest round-tripping mantissa, so I only have to
/// patch up the sign.
pub fn format_number(n: f64) -> String {
    if n.is_nan() {
        String::from("NaN")
    } else if n.is_infinite() {
        String::from(if n > 0.0 { "Infinity" } else { "-Infinity" })
    } else if n == 0.0 {
        // Covers -0 as well.
        String::from("0")
    } else if n.abs() >= 1e21 || n.abs() < 1e-6 {
        let formatted = format!("{:e}", n);
        match formatted.find('e') {
            Some(e) if !formatted[e + 1..].starts_with('-') => {
                format!("{}e+{}", &formatted[..e], &formatted[e + 1..])
            }
            _ => formatted,
        }
    } else {
        n.to_string()
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", pr_str(self))
    }
}
