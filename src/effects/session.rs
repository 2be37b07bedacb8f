//! Calculator session that executes actions and records history.

use crate::core::{evaluate, transition, Action, CalculatorState, History, HistoryItem};
use crate::effects::env::Environment;
use stillwater::effect::{BoxedEffect, Effect};
use stillwater::prelude::*;
use tracing::{debug, info};

/// Outcome of dispatching one action, ready to be applied.
#[derive(Clone, Debug, PartialEq)]
pub struct Dispatched {
    /// The action that was dispatched
    pub action: Action,
    /// State after the transition
    pub state: CalculatorState,
    /// History entry produced by the action, if it completed a calculation
    pub entry: Option<HistoryItem>,
}

/// Errors that can occur while driving a session
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("Keypad is locked while the query '{query}' is being solved")]
    Busy { query: String },

    #[error("Solver query is empty")]
    EmptyQuery,

    #[error("A solver query is already pending: '{query}'")]
    QueryPending { query: String },
}

/// Shell-owned calculator session.
///
/// Holds the current state, the calculation history and the pending
/// solver query. Actions go through the pure reducer; the only effect is
/// stamping history entries with an id and timestamp from the environment.
#[derive(Clone, Debug, Default)]
pub struct Session {
    state: CalculatorState,
    history: History,
    pending_query: Option<String>,
}

impl Session {
    /// Create a session in the initial state with empty history
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn from_parts(state: CalculatorState, history: History) -> Self {
        Self {
            state,
            history,
            pending_query: None,
        }
    }

    /// Get current state (pure)
    pub fn state(&self) -> &CalculatorState {
        &self.state
    }

    /// Get calculation history (pure)
    pub fn history(&self) -> &History {
        &self.history
    }

    /// The solver query awaiting an answer, if any
    pub fn pending_query(&self) -> Option<&str> {
        self.pending_query.as_deref()
    }

    /// Whether keypad actions are currently refused
    pub fn is_busy(&self) -> bool {
        self.pending_query.is_some()
    }

    /// Plan the dispatch of one action.
    ///
    /// Returns an effect; after running it, call `apply()` to update the
    /// session. `Evaluate` computes its result with the evaluator directly
    /// so the history entry carries exactly the value the reducer installs.
    /// `SetResult` records the pending solver query as an AI-generated entry.
    pub fn dispatch<Env: Environment>(
        &self,
        action: Action,
    ) -> BoxedEffect<Dispatched, SessionError, Env> {
        if let Some(query) = &self.pending_query {
            if !matches!(action, Action::SetResult(_)) {
                return fail(SessionError::Busy {
                    query: query.clone(),
                })
                .boxed();
            }
        }

        let record = match &action {
            Action::Evaluate => match (self.state.operation, self.state.expression()) {
                (Some(operation), Some(expression)) => {
                    let result = evaluate(
                        &self.state.previous_operand,
                        operation,
                        &self.state.current_operand,
                    );
                    Some((expression, result, false))
                }
                _ => None,
            },
            Action::SetResult(value) => Some(match &self.pending_query {
                Some(query) => (query.clone(), value.clone(), true),
                None => (value.clone(), value.clone(), false),
            }),
            _ => None,
        };

        let state = transition(&self.state, &action);

        let Some((expression, result, ai_generated)) = record else {
            return pure(Dispatched {
                action,
                state,
                entry: None,
            })
            .boxed();
        };

        from_fn(move |env: &Env| {
            Ok(Dispatched {
                action: action.clone(),
                state: state.clone(),
                entry: Some(HistoryItem {
                    id: env.next_id(),
                    expression: expression.clone(),
                    result: result.clone(),
                    timestamp: env.now(),
                    ai_generated,
                }),
            })
        })
        .boxed()
    }

    /// Apply the result from dispatch() to update the session.
    pub fn apply(&mut self, dispatched: Dispatched) {
        let Dispatched {
            action,
            state,
            entry,
        } = dispatched;

        if let Some(entry) = entry {
            info!(
                expression = %entry.expression,
                result = %entry.result,
                ai_generated = entry.ai_generated,
                "recorded calculation"
            );
            self.history = self.history.record(entry);
        }

        if matches!(action, Action::SetResult(_)) {
            self.pending_query = None;
        }

        debug!(
            action = action.name(),
            current = %state.current_operand,
            previous = %state.previous_operand,
            overwrite = state.overwrite,
            "dispatched action"
        );
        self.state = state;
    }

    /// Dispatch an action and apply its outcome in one step.
    pub async fn send<Env: Environment>(
        &mut self,
        action: Action,
        env: &Env,
    ) -> Result<&CalculatorState, SessionError> {
        let dispatched = self.dispatch(action).run(env).await?;
        self.apply(dispatched);
        Ok(&self.state)
    }

    /// Dispatch several actions in order, stopping at the first error.
    pub async fn send_all<Env, I>(
        &mut self,
        actions: I,
        env: &Env,
    ) -> Result<&CalculatorState, SessionError>
    where
        Env: Environment,
        I: IntoIterator<Item = Action>,
    {
        for action in actions {
            self.send(action, env).await?;
        }
        Ok(&self.state)
    }

    /// Mark a solver query as pending and lock the keypad until its answer
    /// arrives through `SetResult`.
    pub fn begin_query(&mut self, query: &str) -> Result<(), SessionError> {
        let query = query.trim();
        if query.is_empty() {
            return Err(SessionError::EmptyQuery);
        }
        if let Some(pending) = &self.pending_query {
            return Err(SessionError::QueryPending {
                query: pending.clone(),
            });
        }
        debug!(query, "solver query pending");
        self.pending_query = Some(query.to_string());
        Ok(())
    }

    /// Drop every history entry.
    pub fn clear_history(&mut self) {
        info!(cleared = self.history.len(), "history cleared");
        self.history = self.history.clear();
    }
}
