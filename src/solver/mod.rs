//! Natural-language solver boundary.
//!
//! The solver is the only asynchronous collaborator of the calculator. A
//! shell marks a query as pending on its session, awaits [`ask`], and feeds
//! whatever text comes back into the session with `Action::SetResult`.
//! `ask` never fails: errors and timeouts turn into display strings so a
//! failed query is recorded exactly like an answered one.

mod command;
mod expression;
mod gemini;

pub use command::CommandSolver;
pub use expression::ExpressionSolver;
pub use gemini::{
    request_body, GeminiSolver, GenerateRequest, DEFAULT_API_KEY_ENV, DEFAULT_ENDPOINT,
    DEFAULT_MODEL, TEMPERATURE,
};

use crate::config::{SolverBackend, SolverConfig};
use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};

/// Instruction handed to text-completion backends so they answer like a
/// calculator rather than a chat assistant.
pub const SYSTEM_INSTRUCTION: &str = "You are a precise mathematical assistant.
1. Solve the user's math problem.
2. Return ONLY the numerical result or a very brief error message (e.g., \"Invalid input\").
3. Do not add markdown, explanations, or chatter unless explicitly asked for an explanation.
4. If the input is simple arithmetic (e.g., \"5 + 5\"), just return \"10\".
5. If the input is a complex word problem, solve it and return just the final number.";

/// Errors a solver backend can report
#[derive(Debug, Error)]
pub enum SolverError {
    #[error("Credential variable '{variable}' is not set")]
    MissingCredentials { variable: String },

    #[error("Solver did not answer within {0:?}")]
    Timeout(Duration),

    #[error("Could not solve '{0}'")]
    Unsolvable(String),

    #[error("Solver backend failed: {0}")]
    Backend(String),

    #[error("No solver is configured")]
    Unavailable,

    #[error("Solver returned an empty answer")]
    EmptyAnswer,

    #[error("Solver I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Solver request failed: {0}")]
    Http(#[from] reqwest::Error),
}

impl SolverError {
    /// Text shown in place of an answer when solving fails.
    pub fn display_text(&self) -> &'static str {
        match self {
            Self::MissingCredentials { .. } => "Error: API Key Missing",
            _ => "Error",
        }
    }
}

/// A backend that turns a free-text query into a numeric answer.
#[async_trait]
pub trait Solver: Send + Sync {
    /// Short backend name for logging.
    fn name(&self) -> &str;

    /// Solve one query. The answer should be a decimal number, but callers
    /// accept any text.
    async fn solve(&self, query: &str) -> Result<String, SolverError>;
}

/// Solver used when the configuration turns solving off.
#[derive(Clone, Copy, Debug, Default)]
pub struct DisabledSolver;

#[async_trait]
impl Solver for DisabledSolver {
    fn name(&self) -> &str {
        "disabled"
    }

    async fn solve(&self, _query: &str) -> Result<String, SolverError> {
        Err(SolverError::Unavailable)
    }
}

/// Build the solver selected by the configuration.
pub fn from_config(config: &SolverConfig) -> Result<Box<dyn Solver>, SolverError> {
    let solver: Box<dyn Solver> = match config.backend {
        SolverBackend::Expression => Box::new(ExpressionSolver::new()),
        SolverBackend::Command => Box::new(CommandSolver::new(
            &config.command,
            config.api_key_env.clone(),
        )?),
        SolverBackend::Gemini => Box::new(GeminiSolver::new(
            config.endpoint.clone(),
            config.model.clone(),
            config
                .api_key_env
                .clone()
                .unwrap_or_else(|| DEFAULT_API_KEY_ENV.to_string()),
        )),
        SolverBackend::None => Box::new(DisabledSolver),
    };
    debug!(solver = solver.name(), "solver configured");
    Ok(solver)
}

/// Ask a solver, bounded by `timeout`, and always come back with text.
///
/// The answer is trimmed. An empty answer, an error or a timeout is logged
/// and replaced by [`SolverError::display_text`].
pub async fn ask(solver: &dyn Solver, query: &str, timeout: Duration) -> String {
    let outcome = match tokio::time::timeout(timeout, solver.solve(query)).await {
        Ok(result) => result,
        Err(_) => Err(SolverError::Timeout(timeout)),
    };

    let answer = outcome.and_then(|answer| {
        let answer = answer.trim();
        if answer.is_empty() {
            Err(SolverError::EmptyAnswer)
        } else {
            Ok(answer.to_string())
        }
    });

    match answer {
        Ok(answer) => {
            debug!(solver = solver.name(), query, answer = %answer, "solver answered");
            answer
        }
        Err(error) => {
            warn!(solver = solver.name(), query, %error, "solver failed");
            error.display_text().to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SolverConfig;

    struct FixedSolver(&'static str);

    #[async_trait]
    impl Solver for FixedSolver {
        fn name(&self) -> &str {
            "fixed"
        }

        async fn solve(&self, _query: &str) -> Result<String, SolverError> {
            Ok(self.0.to_string())
        }
    }

    struct SlowSolver;

    #[async_trait]
    impl Solver for SlowSolver {
        fn name(&self) -> &str {
            "slow"
        }

        async fn solve(&self, _query: &str) -> Result<String, SolverError> {
            tokio::time::sleep(Duration::from_secs(60)).await;
            Ok("1".to_string())
        }
    }

    struct LockedSolver;

    #[async_trait]
    impl Solver for LockedSolver {
        fn name(&self) -> &str {
            "locked"
        }

        async fn solve(&self, _query: &str) -> Result<String, SolverError> {
            Err(SolverError::MissingCredentials {
                variable: "API_KEY".to_string(),
            })
        }
    }

    #[tokio::test]
    async fn answer_is_trimmed() {
        let answer = ask(&FixedSolver("  42\n"), "six times seven", Duration::from_secs(1)).await;
        assert_eq!(answer, "42");
    }

    #[tokio::test]
    async fn empty_answer_becomes_error() {
        let answer = ask(&FixedSolver("   "), "anything", Duration::from_secs(1)).await;
        assert_eq!(answer, "Error");
    }

    #[tokio::test]
    async fn timeout_becomes_error() {
        let answer = ask(&SlowSolver, "anything", Duration::from_millis(50)).await;
        assert_eq!(answer, "Error");
    }

    #[tokio::test]
    async fn missing_credentials_have_their_own_text() {
        let answer = ask(&LockedSolver, "anything", Duration::from_secs(1)).await;
        assert_eq!(answer, "Error: API Key Missing");
    }

    #[tokio::test]
    async fn disabled_solver_reports_error() {
        let answer = ask(&DisabledSolver, "1 + 1", Duration::from_secs(1)).await;
        assert_eq!(answer, "Error");
    }

    #[test]
    fn from_config_picks_backend() {
        let solver = from_config(&SolverConfig::default()).unwrap();
        assert_eq!(solver.name(), "expression");

        let disabled = SolverConfig {
            backend: SolverBackend::None,
            ..SolverConfig::default()
        };
        assert_eq!(from_config(&disabled).unwrap().name(), "disabled");
    }

    #[tokio::test]
    async fn gemini_backend_checks_key_before_request() {
        let config = SolverConfig {
            backend: SolverBackend::Gemini,
            api_key_env: Some("KEYCALC_TEST_FROM_CONFIG_UNSET".to_string()),
            ..SolverConfig::default()
        };
        let solver = from_config(&config).unwrap();
        assert_eq!(solver.name(), "gemini");

        let answer = ask(solver.as_ref(), "2 + 2", Duration::from_secs(1)).await;
        assert_eq!(answer, "Error: API Key Missing");
    }

    #[test]
    fn command_backend_requires_command() {
        let config = SolverConfig {
            backend: SolverBackend::Command,
            command: Vec::new(),
            ..SolverConfig::default()
        };
        assert!(matches!(from_config(&config), Err(SolverError::Backend(_))));
    }
}
