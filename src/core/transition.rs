//! The calculator reducer.
//!
//! `transition` maps a state and an action to the next state. It is pure
//! and total: every pair has a defined result, and an action whose guard
//! fails returns the state unchanged.

use super::action::Action;
use super::evaluate::evaluate;
use super::format::{format_number, parse_operand};
use super::state::CalculatorState;

/// Apply one action to a state, producing the next state.
///
/// Chained operators fold left without precedence, so `2 + 3 × 4` is
/// `(2 + 3) × 4`.
///
/// # Example
///
/// ```rust
/// use keycalc::core::{transition, Action, CalculatorState, Operation};
///
/// let actions = [
///     Action::AddDigit('2'),
///     Action::ChooseOperation(Operation::Add),
///     Action::AddDigit('3'),
///     Action::ChooseOperation(Operation::Multiply),
///     Action::AddDigit('4'),
///     Action::Evaluate,
/// ];
///
/// let state = actions
///     .iter()
///     .fold(CalculatorState::initial(), |s, a| transition(&s, a));
///
/// assert_eq!(state.current_operand, "20");
/// assert!(state.overwrite);
/// ```
pub fn transition(state: &CalculatorState, action: &Action) -> CalculatorState {
    if !action.guard().check(state) {
        return state.clone();
    }

    match action {
        Action::AddDigit(digit) => add_digit(state, *digit),
        Action::ChooseOperation(operation) => {
            let mut next = state.clone();
            if state.current_operand.is_empty() {
                next.operation = Some(*operation);
            } else if state.previous_operand.is_empty() {
                next.previous_operand = std::mem::take(&mut next.current_operand);
                next.operation = Some(*operation);
            } else {
                next.previous_operand = fold_pending(state);
                next.current_operand.clear();
                next.operation = Some(*operation);
            }
            next
        }
        Action::Clear => CalculatorState::initial(),
        Action::DeleteDigit => {
            let mut next = state.clone();
            if state.overwrite {
                next.overwrite = false;
                next.current_operand = "0".to_string();
            } else if state.current_operand.chars().count() == 1 {
                next.current_operand = "0".to_string();
            } else {
                next.current_operand.pop();
            }
            next
        }
        Action::Evaluate => CalculatorState {
            current_operand: fold_pending(state),
            previous_operand: String::new(),
            operation: None,
            overwrite: true,
        },
        Action::SetResult(value) => CalculatorState::with_result(value.clone()),
        Action::Percentage => CalculatorState {
            current_operand: format_number(numeric(&state.current_operand) / 100.0),
            overwrite: true,
            ..state.clone()
        },
        Action::ToggleSign => CalculatorState {
            current_operand: format_number(-numeric(&state.current_operand)),
            ..state.clone()
        },
    }
}

/// Apply a sequence of actions in order.
pub fn replay<'a, I>(state: &CalculatorState, actions: I) -> CalculatorState
where
    I: IntoIterator<Item = &'a Action>,
{
    actions
        .into_iter()
        .fold(state.clone(), |current, action| transition(&current, action))
}

fn add_digit(state: &CalculatorState, digit: char) -> CalculatorState {
    let mut next = state.clone();
    if state.overwrite {
        next.current_operand = digit.to_string();
        next.overwrite = false;
    } else if digit != '.' && matches!(state.current_operand.as_str(), "0" | "-0") {
        // Keep the sign, replace the lone zero.
        next.current_operand.pop();
        next.current_operand.push(digit);
    } else {
        next.current_operand.push(digit);
    }
    next
}

fn fold_pending(state: &CalculatorState) -> String {
    match state.operation {
        Some(operation) => evaluate(&state.previous_operand, operation, &state.current_operand),
        None => state.current_operand.clone(),
    }
}

// Unparsable text becomes NaN so sign and percentage degrade to "NaN".
fn numeric(text: &str) -> f64 {
    parse_operand(text).unwrap_or(f64::NAN)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Operation;

    fn keys(text: &str) -> Vec<Action> {
        text.chars()
            .map(|c| match c {
                '=' => Action::Evaluate,
                '<' => Action::DeleteDigit,
                'c' => Action::Clear,
                '%' => Action::Percentage,
                '~' => Action::ToggleSign,
                c => match Operation::from_symbol(c) {
                    Some(op) => Action::ChooseOperation(op),
                    None => Action::AddDigit(c),
                },
            })
            .collect()
    }

    fn run(text: &str) -> CalculatorState {
        replay(&CalculatorState::initial(), &keys(text))
    }

    #[test]
    fn digits_append() {
        assert_eq!(run("123").current_operand, "123");
        assert_eq!(run("1.05").current_operand, "1.05");
    }

    #[test]
    fn leading_zero_is_replaced() {
        assert_eq!(run("05").current_operand, "5");
        assert_eq!(run("000").current_operand, "0");
        assert_eq!(run("0.0").current_operand, "0.0");
    }

    #[test]
    fn second_decimal_point_ignored() {
        assert_eq!(run("1.2.3").current_operand, "1.23");
    }

    #[test]
    fn choose_operation_moves_operand() {
        let state = run("12+");
        assert_eq!(state.previous_operand, "12");
        assert_eq!(state.current_operand, "");
        assert_eq!(state.operation, Some(Operation::Add));
    }

    #[test]
    fn operator_substitution_before_operand() {
        let state = run("12+-*");
        assert_eq!(state.previous_operand, "12");
        assert_eq!(state.operation, Some(Operation::Multiply));
    }

    #[test]
    fn chained_operations_fold_left() {
        let state = run("2+3*");
        assert_eq!(state.previous_operand, "5");
        assert_eq!(state.current_operand, "");
        assert_eq!(run("2+3*4=").current_operand, "20");
    }

    #[test]
    fn choose_operation_on_empty_state_is_noop() {
        let empty = CalculatorState {
            current_operand: String::new(),
            ..CalculatorState::initial()
        };
        let next = transition(&empty, &Action::ChooseOperation(Operation::Add));
        assert_eq!(next, empty);
    }

    #[test]
    fn evaluate_sets_overwrite() {
        let state = run("9/3=");
        assert_eq!(state.current_operand, "3");
        assert_eq!(state.previous_operand, "");
        assert_eq!(state.operation, None);
        assert!(state.overwrite);
    }

    #[test]
    fn evaluate_without_operation_is_noop() {
        let before = run("9");
        assert_eq!(transition(&before, &Action::Evaluate), before);
        let pending = run("9+");
        assert_eq!(transition(&pending, &Action::Evaluate), pending);
    }

    #[test]
    fn digit_after_result_replaces() {
        assert_eq!(run("2+2=7").current_operand, "7");
        assert!(!run("2+2=7").overwrite);
    }

    #[test]
    fn operator_after_result_continues_from_it() {
        assert_eq!(run("2+2=*3=").current_operand, "12");
    }

    #[test]
    fn delete_boundaries() {
        assert_eq!(run("5<").current_operand, "0");
        assert_eq!(run("123<").current_operand, "12");

        let empty = run("5+");
        assert_eq!(transition(&empty, &Action::DeleteDigit), empty);

        let result = run("6*7=");
        let deleted = transition(&result, &Action::DeleteDigit);
        assert_eq!(deleted.current_operand, "0");
        assert!(!deleted.overwrite);
    }

    #[test]
    fn clear_resets() {
        assert_eq!(run("12+3c"), CalculatorState::initial());
    }

    #[test]
    fn set_result_matches_keypad_result_shape() {
        let injected = transition(&run("1+"), &Action::SetResult("42".to_string()));
        let keypad = run("40+2=");
        assert_eq!(injected, keypad);
    }

    #[test]
    fn percentage_divides_and_overwrites() {
        let state = run("50%");
        assert_eq!(state.current_operand, "0.5");
        assert!(state.overwrite);
        assert_eq!(run("50%3").current_operand, "3");
    }

    #[test]
    fn toggle_sign_negates() {
        assert_eq!(run("8~").current_operand, "-8");
        assert_eq!(run("8~~").current_operand, "8");
        assert_eq!(run("0.").current_operand, "0.");
        assert_eq!(run("0.~").current_operand, "0");
    }

    #[test]
    fn percentage_of_zero_starts_fresh_entry() {
        let state = transition(&CalculatorState::initial(), &Action::Percentage);
        assert_eq!(state.current_operand, "0");
        assert!(state.overwrite);

        let next = transition(&state, &Action::AddDigit('.'));
        assert_eq!(next.current_operand, ".");
        assert!(!next.overwrite);
    }

    #[test]
    fn signed_zero_is_replaced_keeping_sign() {
        let state = run("5~<0");
        assert_eq!(state.current_operand, "-0");

        let next = transition(&state, &Action::AddDigit('5'));
        assert_eq!(next.current_operand, "-5");
        assert_eq!(next.validate(), Ok(()));

        assert_eq!(run("5~<00").current_operand, "-0");
        assert_eq!(run("5~<0.5").current_operand, "-0.5");
    }

    #[test]
    fn sign_and_percentage_noops() {
        let zero = CalculatorState::initial();
        assert_eq!(transition(&zero, &Action::ToggleSign), zero);

        let empty = run("3+");
        assert_eq!(transition(&empty, &Action::ToggleSign), empty);
        assert_eq!(transition(&empty, &Action::Percentage), empty);
    }

    #[test]
    fn malformed_result_propagates_without_panic() {
        let state = transition(
            &CalculatorState::initial(),
            &Action::SetResult("Error".to_string()),
        );
        let chained = replay(&state, &keys("+2="));
        assert_eq!(chained.current_operand, "");
        assert_eq!(transition(&state, &Action::ToggleSign).current_operand, "NaN");
    }

    #[test]
    fn division_by_zero_result() {
        assert_eq!(run("5/0=").current_operand, "Infinity");
    }
}
