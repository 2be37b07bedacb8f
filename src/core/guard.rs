//! Guard predicates for action preconditions.
//!
//! Guards are pure boolean functions that decide whether an action changes
//! the state at all. An action whose guard fails is an identity transition,
//! which keeps `transition` total without any error path.

use std::fmt;

/// Pure predicate that determines if an action may take effect.
///
/// # Example
///
/// ```rust
/// use keycalc::core::{CalculatorState, Guard};
///
/// let has_operand = Guard::new(|s: &CalculatorState| !s.current_operand.is_empty());
///
/// assert!(has_operand.check(&CalculatorState::initial()));
/// assert!(!has_operand.check(&CalculatorState::with_result("")));
/// ```
pub struct Guard<S> {
    predicate: Box<dyn Fn(&S) -> bool + Send + Sync>,
}

impl<S> Guard<S> {
    /// Create a guard from a pure predicate function.
    ///
    /// The predicate must be deterministic and free of side effects.
    pub fn new<F>(predicate: F) -> Self
    where
        F: Fn(&S) -> bool + Send + Sync + 'static,
    {
        Guard {
            predicate: Box::new(predicate),
        }
    }

    /// Guard that never blocks.
    pub fn always() -> Self {
        Self::new(|_| true)
    }

    /// Check if the guard allows the action on this state.
    pub fn check(&self, state: &S) -> bool {
        (self.predicate)(state)
    }
}

impl<S: 'static> Guard<S> {
    /// Combine two guards; both must pass.
    pub fn and(self, other: Guard<S>) -> Self {
        Self::new(move |state| self.check(state) && other.check(state))
    }
}

impl<S> fmt::Debug for Guard<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Guard").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::CalculatorState;

    #[test]
    fn guard_allows_matching_states() {
        let guard = Guard::new(|s: &CalculatorState| s.overwrite);

        assert!(guard.check(&CalculatorState::with_result("1")));
        assert!(!guard.check(&CalculatorState::initial()));
    }

    #[test]
    fn always_allows() {
        let state = CalculatorState::initial();
        assert!(Guard::always().check(&state));
    }

    #[test]
    fn and_requires_both() {
        let nonzero = Guard::new(|s: &CalculatorState| s.current_operand != "0");
        let nonempty = Guard::new(|s: &CalculatorState| !s.current_operand.is_empty());
        let guard = nonzero.and(nonempty);

        assert!(guard.check(&CalculatorState::with_result("5")));
        assert!(!guard.check(&CalculatorState::with_result("0")));
        assert!(!guard.check(&CalculatorState::with_result("")));
    }

    #[test]
    fn guard_is_deterministic() {
        let state = CalculatorState::with_result("12");
        let guard = Guard::new(|s: &CalculatorState| s.current_operand.len() > 1);

        assert_eq!(guard.check(&state), guard.check(&state));
    }
}
