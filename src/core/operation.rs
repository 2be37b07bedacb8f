//! Binary arithmetic operations selectable on the keypad.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A pending binary operation.
///
/// The "no operation" case is represented as `Option::<Operation>::None`
/// on [`CalculatorState`](super::CalculatorState), so the evaluator can
/// never be handed an operation without arithmetic meaning.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, Serialize, Deserialize)]
pub enum Operation {
    Add,
    Subtract,
    Multiply,
    Divide,
}

impl Operation {
    /// Symbol shown in the pending-operator row and in history expressions.
    pub fn symbol(&self) -> char {
        match self {
            Self::Add => '+',
            Self::Subtract => '-',
            Self::Multiply => '×',
            Self::Divide => '÷',
        }
    }

    /// Parse an operator key. Accepts both the display symbols and the
    /// ASCII forms found on a keyboard.
    ///
    /// # Example
    ///
    /// ```rust
    /// use keycalc::core::Operation;
    ///
    /// assert_eq!(Operation::from_symbol('*'), Some(Operation::Multiply));
    /// assert_eq!(Operation::from_symbol('÷'), Some(Operation::Divide));
    /// assert_eq!(Operation::from_symbol('x'), None);
    /// ```
    pub fn from_symbol(symbol: char) -> Option<Self> {
        match symbol {
            '+' => Some(Self::Add),
            '-' => Some(Self::Subtract),
            '*' | '×' => Some(Self::Multiply),
            '/' | '÷' => Some(Self::Divide),
            _ => None,
        }
    }

    /// Apply the operation with IEEE-754 semantics.
    ///
    /// Division by zero yields an infinity (or NaN for `0 / 0`), never a panic.
    pub fn apply(&self, lhs: f64, rhs: f64) -> f64 {
        match self {
            Self::Add => lhs + rhs,
            Self::Subtract => lhs - rhs,
            Self::Multiply => lhs * rhs,
            Self::Divide => lhs / rhs,
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}
