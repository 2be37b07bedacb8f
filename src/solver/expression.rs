//! Offline solver that evaluates free-form arithmetic with meval.

use super::{Solver, SolverError};
use crate::core::format_number;
use async_trait::async_trait;

/// Leading phrases stripped from a query before evaluation.
const QUESTION_PREFIXES: &[&str] = &[
    "what is",
    "what's",
    "whats",
    "calculate",
    "compute",
    "evaluate",
    "solve",
];

/// Spelled-out operators and the symbols meval understands.
const WORD_OPERATORS: &[(&str, &str)] = &[
    (" to the power of ", " ^ "),
    (" multiplied by ", " * "),
    (" divided by ", " / "),
    (" plus ", " + "),
    (" minus ", " - "),
    (" times ", " * "),
    (" over ", " / "),
    (" x ", " * "),
    (" squared", " ^ 2"),
    (" cubed", " ^ 3"),
];

/// Answers arithmetic queries locally, without a network service.
///
/// Handles keypad symbols, a few spelled-out operators and the functions
/// meval supports (`sqrt`, `sin`, `ln`, ...). Word problems are reported
/// as unsolvable.
///
/// # Example
///
/// ```rust
/// use keycalc::solver::{ExpressionSolver, Solver};
///
/// let rt = tokio::runtime::Runtime::new().unwrap();
/// let answer = rt
///     .block_on(ExpressionSolver::new().solve("what is 6 times 7?"))
///     .unwrap();
/// assert_eq!(answer, "42");
/// ```
#[derive(Clone, Copy, Debug, Default)]
pub struct ExpressionSolver;

impl ExpressionSolver {
    pub fn new() -> Self {
        Self
    }

    /// Rewrite a query into an expression meval can parse.
    pub fn normalize(query: &str) -> String {
        let mut text = query.trim().to_lowercase();

        for prefix in QUESTION_PREFIXES {
            if let Some(rest) = text.strip_prefix(prefix) {
                text = rest.trim_start().to_string();
                break;
            }
        }

        let text = text.trim_end_matches(['?', '=', '.', ' ']);
        let mut text = format!(" {text} ");
        for (word, symbol) in WORD_OPERATORS {
            text = text.replace(word, symbol);
        }

        text.replace('×', "*")
            .replace('÷', "/")
            .replace(',', "")
            .trim()
            .to_string()
    }
}

#[async_trait]
impl Solver for ExpressionSolver {
    fn name(&self) -> &str {
        "expression"
    }

    async fn solve(&self, query: &str) -> Result<String, SolverError> {
        let expression = Self::normalize(query);
        meval::eval_str(&expression)
            .map(format_number)
            .map_err(|_| SolverError::Unsolvable(query.trim().to_string()))
    }
}
