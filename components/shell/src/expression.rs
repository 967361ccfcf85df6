//! Expression evaluation
//!
//! ```text
//! Expression := Term ('+' Term)?
//! Term       := ['-'] Digit+ | VariableName
//! ```
//!
//! Only the first `+` splits the expression. Anything after it is a single
//! right-hand term, so `a+b+c` looks up a variable literally named `b+c`.

use ohnebs_hal::numfmt::parse_i32;

use crate::variables::VariableStore;
use crate::{Result, ShellError};

/// Evaluate one term
///
/// Surrounding spaces are ignored. A term starting with a digit or `-` is an
/// integer literal and always evaluates; anything else must name a stored
/// variable.
pub fn evaluate_term(term: &str, vars: &VariableStore) -> Result<i32> {
    let term = term.trim_matches(' ');

    match term.as_bytes().first() {
        Some(b) if b.is_ascii_digit() || *b == b'-' => Ok(parse_i32(term)),
        _ => vars.get(term).ok_or(ShellError::InvalidExpression),
    }
}

/// Evaluate `term` or `term+term`, wrapping on overflow
pub fn evaluate(expr: &str, vars: &VariableStore) -> Result<i32> {
    let Some((lhs, rhs)) = expr.split_once('+') else {
        return evaluate_term(expr, vars);
    };

    match (evaluate_term(lhs, vars), evaluate_term(rhs, vars)) {
        (Ok(a), Ok(b)) => Ok(a.wrapping_add(b)),
        _ => Err(ShellError::InvalidExpression),
    }
}
