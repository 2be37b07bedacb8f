//! Builder for constructing calculator sessions.

use crate::builder::error::BuildError;
use crate::core::{format_number, parse_operand, CalculatorState, History};
use crate::effects::Session;

/// Builder for constructing sessions with a fluent API.
///
/// # Example
///
/// ```rust
/// use keycalc::builder::SessionBuilder;
///
/// let session = SessionBuilder::new().seed("12.5").build().unwrap();
/// assert_eq!(session.state().current_operand, "12.5");
/// assert!(session.state().overwrite);
/// ```
#[derive(Clone, Debug, Default)]
pub struct SessionBuilder {
    initial: Option<CalculatorState>,
    seed: Option<String>,
    history: History,
}

impl SessionBuilder {
    /// Create a new builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an explicit state. It must satisfy the keypad invariants.
    pub fn initial(mut self, state: CalculatorState) -> Self {
        self.initial = Some(state);
        self
    }

    /// Start from a value, as if it had just been injected with `SetResult`.
    pub fn seed(mut self, value: impl Into<String>) -> Self {
        self.seed = Some(value.into());
        self
    }

    /// Start with existing history.
    pub fn history(mut self, history: History) -> Self {
        self.history = history;
        self
    }

    /// Build the session.
    /// Returns an error if the starting point is invalid.
    pub fn build(self) -> Result<Session, BuildError> {
        let state = match (self.initial, self.seed) {
            (Some(_), Some(_)) => return Err(BuildError::ConflictingStart),
            (Some(state), None) => {
                state.validate().map_err(BuildError::InvalidInitialState)?;
                state
            }
            (None, Some(seed)) => {
                let value = parse_operand(&seed).ok_or(BuildError::InvalidSeed(seed))?;
                CalculatorState::with_result(format_number(value))
            }
            (None, None) => CalculatorState::initial(),
        };

        Ok(Session::from_parts(state, self.history))
    }
}
