//! Pure evaluation of a (previous, operation, current) triple.

use super::format::{format_number, parse_operand};
use super::operation::Operation;

/// Compute `previous <operation> current` and render it as text.
///
/// Both operands are parsed as `f64`. If either is empty or malformed the
/// result is the empty string, which signals "not computable" without
/// raising. Division by zero follows float semantics.
///
/// # Example
///
/// ```rust
/// use keycalc::core::{evaluate, Operation};
///
/// assert_eq!(evaluate("2", Operation::Add, "3"), "5");
/// assert_eq!(evaluate("7", Operation::Divide, "2"), "3.5");
/// assert_eq!(evaluate("5", Operation::Divide, "0"), "Infinity");
/// assert_eq!(evaluate("", Operation::Add, "3"), "");
/// ```
pub fn evaluate(previous: &str, operation: Operation, current: &str) -> String {
    match (parse_operand(previous), parse_operand(current)) {
        (Some(lhs), Some(rhs)) => format_number(operation.apply(lhs, rhs)),
        _ => String::new(),
    }
}
