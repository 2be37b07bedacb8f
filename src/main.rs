//! Terminal front end for keycalc.
//!
//! Reads key text and `?` queries line by line, drives a `Session`, and
//! prints the two display rows after every line.

use anyhow::{bail, Context, Result};
use clap::Parser;
use keycalc::builder::SessionBuilder;
use keycalc::config::{Config, DisplayConfig};
use keycalc::core::{Action, CalculatorState, History};
use keycalc::effects::{Session, SystemEnv};
use keycalc::keymap::actions_for_line;
use keycalc::solver::{self, Solver};
use std::path::PathBuf;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing_subscriber::EnvFilter;

const HELP: &str = "\
keys      digits . + - * / × ÷ = % ~   c clears, < deletes
?QUERY    ask the solver, e.g. ?what is 15% of 80
:history  list calculations (:history json for JSON)
:clear-history
:quit";

#[derive(Debug, Parser)]
#[command(name = "keycalc", version, about = "Keypad calculator with a natural-language solver")]
struct Cli {
    /// Config file (defaults to the user config directory)
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Key text to enter non-interactively, e.g. "2+3*4="
    #[arg(long, value_name = "KEYS", allow_hyphen_values = true)]
    keys: Option<String>,

    /// Query to send to the solver non-interactively
    #[arg(long, value_name = "QUERY")]
    ask: Option<String>,

    /// Start from this value instead of 0
    #[arg(long, value_name = "VALUE", allow_hyphen_values = true)]
    seed: Option<String>,

    /// Print the state as JSON
    #[arg(long)]
    json: bool,

    /// Log more (-v info, -vv debug); RUST_LOG overrides
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

enum Flow {
    Continue,
    Quit,
}

struct Shell {
    session: Session,
    solver: Box<dyn Solver>,
    config: Config,
    env: SystemEnv,
    json: bool,
}

impl Shell {
    async fn enter_keys(&mut self, line: &str) -> Result<()> {
        self.session
            .send_all(actions_for_line(line), &self.env)
            .await?;
        Ok(())
    }

    async fn ask(&mut self, query: &str) -> Result<()> {
        self.session.begin_query(query)?;
        let answer = solver::ask(
            self.solver.as_ref(),
            query.trim(),
            self.config.solver.timeout(),
        )
        .await;
        self.session
            .send(Action::SetResult(answer), &self.env)
            .await?;
        Ok(())
    }

    async fn handle_line(&mut self, line: &str) -> Result<Flow> {
        let line = line.trim();
        if let Some(query) = line.strip_prefix('?') {
            self.ask(query).await?;
        } else if let Some(command) = line.strip_prefix(':') {
            match command.split_whitespace().collect::<Vec<_>>().as_slice() {
                ["quit" | "q"] => return Ok(Flow::Quit),
                ["history"] => println!("{}", render_history(self.session.history(), &self.config.display)),
                ["history", "json"] => {
                    println!("{}", serde_json::to_string_pretty(self.session.history())?)
                }
                ["clear-history"] => self.session.clear_history(),
                ["help"] => println!("{HELP}"),
                _ => bail!("unknown command ':{command}', try :help"),
            }
            return Ok(Flow::Continue);
        } else {
            self.enter_keys(line).await?;
        }

        println!("{}", self.render()?);
        Ok(Flow::Continue)
    }

    fn render(&self) -> Result<String> {
        let state = self.session.state();
        if self.json {
            return Ok(serde_json::to_string(state)?);
        }
        Ok(render_state(state, &self.config.display))
    }

    async fn interactive(&mut self) -> Result<()> {
        let mut stdout = tokio::io::stdout();
        let mut lines = BufReader::new(tokio::io::stdin()).lines();

        println!("{}", self.render()?);
        loop {
            stdout.write_all(b"> ").await?;
            stdout.flush().await?;

            let Some(line) = lines.next_line().await? else {
                break;
            };
            match self.handle_line(&line).await {
                Ok(Flow::Quit) => break,
                Ok(Flow::Continue) => {}
                Err(error) => eprintln!("error: {error:#}"),
            }
        }
        Ok(())
    }
}

fn render_state(state: &CalculatorState, display: &DisplayConfig) -> String {
    let (pending, current) = if display.group_digits {
        (state.pending_row(), state.display())
    } else {
        let pending = state
            .operation
            .map(|operation| format!("{} {}", state.previous_operand, operation.symbol()));
        let current = if state.current_operand.is_empty() {
            "0".to_string()
        } else {
            state.current_operand.clone()
        };
        (pending, current)
    };
    format!("{}\n{}", pending.unwrap_or_default(), current)
}

fn render_history(history: &History, display: &DisplayConfig) -> String {
    if history.is_empty() {
        return "No calculations yet".to_string();
    }

    let items: Vec<_> = if display.newest_first {
        history.newest_first().collect()
    } else {
        history.items().iter().collect()
    };

    items
        .iter()
        .map(|item| {
            let source = if item.ai_generated { " [solver]" } else { "" };
            format!(
                "{} {} = {}{}",
                item.timestamp.format("%H:%M:%S"),
                item.expression,
                item.result,
                source
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = match &cli.config {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    }
    .context("loading configuration")?;

    let solver = solver::from_config(&config.solver).context("configuring solver")?;

    let mut builder = SessionBuilder::new();
    if let Some(seed) = &cli.seed {
        builder = builder.seed(seed.clone());
    }
    let session = builder.build().context("starting session")?;

    let mut shell = Shell {
        session,
        solver,
        config,
        env: SystemEnv,
        json: cli.json,
    };

    if cli.ask.is_none() && cli.keys.is_none() {
        return shell.interactive().await;
    }

    if let Some(query) = &cli.ask {
        shell.ask(query).await?;
    }
    if let Some(keys) = &cli.keys {
        shell.enter_keys(keys).await?;
    }
    println!("{}", shell.render()?);
    Ok(())
}
