//! User actions understood by the calculator state machine.

use super::guard::Guard;
use super::operation::Operation;
use super::state::CalculatorState;
use serde::{Deserialize, Serialize};

/// One discrete user action. Each variant carries only its own payload.
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
pub enum Action {
    /// Append a digit `0`-`9` or a decimal point.
    AddDigit(char),
    /// Select an operator, folding any pending operation first.
    ChooseOperation(Operation),
    /// Reset to the initial state.
    Clear,
    /// Remove the last entered character.
    DeleteDigit,
    /// Compute the pending operation.
    Evaluate,
    /// Install an externally computed value.
    SetResult(String),
    /// Divide the current operand by one hundred.
    Percentage,
    /// Negate the current operand.
    ToggleSign,
}

impl Action {
    /// Stable name for logging.
    pub fn name(&self) -> &'static str {
        match self {
            Self::AddDigit(_) => "AddDigit",
            Self::ChooseOperation(_) => "ChooseOperation",
            Self::Clear => "Clear",
            Self::DeleteDigit => "DeleteDigit",
            Self::Evaluate => "Evaluate",
            Self::SetResult(_) => "SetResult",
            Self::Percentage => "Percentage",
            Self::ToggleSign => "ToggleSign",
        }
    }

    /// Precondition for this action to change the state.
    ///
    /// When the guard fails the action is a no-op.
    ///
    /// # Example
    ///
    /// ```rust
    /// use keycalc::core::{Action, CalculatorState};
    ///
    /// let state = CalculatorState::initial();
    /// assert!(!Action::Evaluate.guard().check(&state));
    /// assert!(Action::AddDigit('7').guard().check(&state));
    /// assert!(!Action::AddDigit('0').guard().check(&state));
    /// ```
    pub fn guard(&self) -> Guard<CalculatorState> {
        match self {
            Self::AddDigit(digit) => {
                let digit = *digit;
                let key = Guard::new(move |_: &CalculatorState| is_digit_key(digit));
                let entry = Guard::new(move |s: &CalculatorState| {
                    s.overwrite
                        || !((digit == '0' && s.current_operand == "0")
                            || (digit == '.' && s.current_operand.contains('.')))
                });
                key.and(entry)
            }
            Self::ChooseOperation(_) => Guard::new(|s: &CalculatorState| {
                !(s.current_operand.is_empty() && s.previous_operand.is_empty())
            }),
            Self::Clear | Self::SetResult(_) => Guard::always(),
            Self::DeleteDigit => {
                Guard::new(|s: &CalculatorState| s.overwrite || !s.current_operand.is_empty())
            }
            Self::Evaluate => Guard::new(CalculatorState::can_evaluate),
            Self::Percentage => Guard::new(|s: &CalculatorState| !s.current_operand.is_empty()),
            Self::ToggleSign => Guard::new(|s: &CalculatorState| {
                !s.current_operand.is_empty() && s.current_operand != "0"
            }),
        }
    }
}

/// Keys accepted by [`Action::AddDigit`].
pub fn is_digit_key(key: char) -> bool {
    key.is_ascii_digit() || key == '.'
}
