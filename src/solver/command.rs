//! Solver that delegates to an external text-completion program.

use super::{Solver, SolverError, SYSTEM_INSTRUCTION};
use async_trait::async_trait;
use std::process::Stdio;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

/// Environment variable carrying [`SYSTEM_INSTRUCTION`] to the child.
pub const INSTRUCTION_ENV: &str = "KEYCALC_SYSTEM_INSTRUCTION";

/// Runs a configured command per query: the query goes to stdin, the answer
/// is read from stdout.
///
/// This is how a hosted model is wired in: point the command at any CLI
/// client for the service. When `api_key_env` is set, the variable must be
/// present or the query fails with `MissingCredentials` before anything is
/// spawned.
#[derive(Clone, Debug)]
pub struct CommandSolver {
    program: String,
    args: Vec<String>,
    api_key_env: Option<String>,
}

impl CommandSolver {
    pub fn new(argv: &[String], api_key_env: Option<String>) -> Result<Self, SolverError> {
        let (program, args) = argv
            .split_first()
            .ok_or_else(|| SolverError::Backend("no solver command configured".to_string()))?;

        Ok(Self {
            program: program.clone(),
            args: args.to_vec(),
            api_key_env,
        })
    }

    fn check_credentials(&self) -> Result<(), SolverError> {
        match &self.api_key_env {
            Some(variable) if std::env::var_os(variable).is_none() => {
                Err(SolverError::MissingCredentials {
                    variable: variable.clone(),
                })
            }
            _ => Ok(()),
        }
    }
}

#[async_trait]
impl Solver for CommandSolver {
    fn name(&self) -> &str {
        "command"
    }

    async fn solve(&self, query: &str) -> Result<String, SolverError> {
        self.check_credentials()?;

        let mut child = Command::new(&self.program)
            .args(&self.args)
            .env(INSTRUCTION_ENV, SYSTEM_INSTRUCTION)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()?;

        // A command may exit without reading its input.
        if let Some(mut stdin) = child.stdin.take() {
            if let Err(error) = stdin.write_all(query.as_bytes()).await {
                if error.kind() != std::io::ErrorKind::BrokenPipe {
                    return Err(error.into());
                }
            }
        }

        let output = child.wait_with_output().await?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(SolverError::Backend(format!(
                "'{}' exited with {}: {}",
                self.program,
                output.status,
                stderr.trim()
            )));
        }

        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }
}
