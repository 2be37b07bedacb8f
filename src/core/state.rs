//! The calculator's single source of truth.
//!
//! `CalculatorState` is replaced wholesale on every transition; nothing
//! mutates it in place. It carries just enough to drive a two-operand
//! calculator: the operand being typed, the left operand once an operator
//! was chosen, the pending operator, and the overwrite flag.

use super::format::format_operand;
use super::operation::Operation;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Display and arithmetic state of the calculator.
///
/// # Example
///
/// ```rust
/// use keycalc::core::CalculatorState;
///
/// let state = CalculatorState::initial();
/// assert_eq!(state.current_operand, "0");
/// assert_eq!(state.previous_operand, "");
/// assert!(state.operation.is_none());
/// assert!(!state.overwrite);
/// ```
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct CalculatorState {
    /// Operand being entered, as canonical decimal text. `""` is empty and
    /// distinct from `"0"`.
    pub current_operand: String,
    /// Left operand once an operator has been chosen; `""` otherwise.
    pub previous_operand: String,
    /// Pending operator, if any.
    pub operation: Option<Operation>,
    /// When set, the next digit replaces `current_operand` instead of
    /// extending it.
    pub overwrite: bool,
}

/// Ways a state can break the textual operand invariants.
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum StateViolation {
    MultipleDecimalPoints(String),
    RedundantLeadingZero(String),
    InvalidCharacter(String),
}

impl fmt::Display for StateViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MultipleDecimalPoints(text) => {
                write!(f, "operand '{text}' has more than one decimal point")
            }
            Self::RedundantLeadingZero(text) => {
                write!(f, "operand '{text}' has a redundant leading zero")
            }
            Self::InvalidCharacter(text) => {
                write!(f, "operand '{text}' contains a non-decimal character")
            }
        }
    }
}

impl Default for CalculatorState {
    fn default() -> Self {
        Self::initial()
    }
}

impl CalculatorState {
    /// The reset state: `"0"` on display, no pending operator.
    pub fn initial() -> Self {
        Self {
            current_operand: "0".to_string(),
            previous_operand: String::new(),
            operation: None,
            overwrite: false,
        }
    }

    /// State holding an externally produced value, ready to be overwritten
    /// by the next digit.
    pub fn with_result(value: impl Into<String>) -> Self {
        Self {
            current_operand: value.into(),
            overwrite: true,
            ..Self::initial()
        }
    }

    /// Whether `Evaluate` has everything it needs.
    pub fn can_evaluate(&self) -> bool {
        self.operation.is_some()
            && !self.current_operand.is_empty()
            && !self.previous_operand.is_empty()
    }

    /// Expression text for the pending triple, e.g. `"2 + 3"`.
    ///
    /// Returns `None` when there is nothing to evaluate.
    pub fn expression(&self) -> Option<String> {
        let operation = self.operation?;
        if !self.can_evaluate() {
            return None;
        }
        Some(format!(
            "{} {} {}",
            self.previous_operand,
            operation.symbol(),
            self.current_operand
        ))
    }

    /// Main display row: the grouped current operand, or `"0"` when empty.
    ///
    /// # Example
    ///
    /// ```rust
    /// use keycalc::core::CalculatorState;
    ///
    /// let state = CalculatorState::with_result("1234.5");
    /// assert_eq!(state.display(), "1,234.5");
    /// ```
    pub fn display(&self) -> String {
        if self.current_operand.is_empty() {
            "0".to_string()
        } else {
            format_operand(&self.current_operand)
        }
    }

    /// Upper display row, e.g. `"1,200 ×"`. Absent when no operator is
    /// pending.
    pub fn pending_row(&self) -> Option<String> {
        self.operation.map(|operation| {
            format!(
                "{} {}",
                format_operand(&self.previous_operand),
                operation.symbol()
            )
        })
    }

    /// Check the textual invariants of keypad-entered operands.
    ///
    /// Only meaningful for states built from key entry. Results of
    /// evaluation may legitimately hold `Infinity`, `NaN` or solver text
    /// and are not validated.
    pub fn validate(&self) -> Result<(), StateViolation> {
        validate_operand(&self.current_operand)?;
        validate_operand(&self.previous_operand)
    }
}

fn validate_operand(text: &str) -> Result<(), StateViolation> {
    let digits = text.strip_prefix('-').unwrap_or(text);
    if !digits.chars().all(|c| c.is_ascii_digit() || c == '.') {
        return Err(StateViolation::InvalidCharacter(text.to_string()));
    }
    if digits.matches('.').count() > 1 {
        return Err(StateViolation::MultipleDecimalPoints(text.to_string()));
    }
    let mut chars = digits.chars();
    if let (Some('0'), Some(next)) = (chars.next(), chars.next()) {
        if next.is_ascii_digit() {
            return Err(StateViolation::RedundantLeadingZero(text.to_string()));
        }
    }
    Ok(())
}
