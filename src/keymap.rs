//! Key bindings.
//!
//! Every key maps to at most one action. Keys with no binding are ignored.

use crate::core::{is_digit_key, Action, Operation};

/// A key press from the input surface.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Key {
    Char(char),
    Enter,
    Backspace,
    Escape,
}

/// Map a key to its action.
///
/// # Example
///
/// ```rust
/// use keycalc::core::{Action, Operation};
/// use keycalc::keymap::{action_for, Key};
///
/// assert_eq!(action_for(Key::Char('7')), Some(Action::AddDigit('7')));
/// assert_eq!(
///     action_for(Key::Char('*')),
///     Some(Action::ChooseOperation(Operation::Multiply))
/// );
/// assert_eq!(action_for(Key::Enter), Some(Action::Evaluate));
/// assert_eq!(action_for(Key::Char(' ')), None);
/// ```
pub fn action_for(key: Key) -> Option<Action> {
    match key {
        Key::Enter | Key::Char('=') => Some(Action::Evaluate),
        Key::Backspace => Some(Action::DeleteDigit),
        Key::Escape => Some(Action::Clear),
        Key::Char('%') => Some(Action::Percentage),
        Key::Char('~') => Some(Action::ToggleSign),
        Key::Char(c) if is_digit_key(c) => Some(Action::AddDigit(c)),
        Key::Char(c) => Operation::from_symbol(c).map(Action::ChooseOperation),
    }
}

/// Read a line of key text.
///
/// Characters stand for themselves, except `c` (clear, like Escape) and
/// `<` (Backspace).
pub fn parse_keys(line: &str) -> Vec<Key> {
    line.chars()
        .map(|c| match c {
            'c' | 'C' => Key::Escape,
            '<' => Key::Backspace,
            c => Key::Char(c),
        })
        .collect()
}

/// Actions for a line of key text, skipping unbound keys.
pub fn actions_for_line(line: &str) -> Vec<Action> {
    parse_keys(line).into_iter().filter_map(action_for).collect()
}
