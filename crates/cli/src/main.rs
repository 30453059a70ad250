//! Scenario runner entry point.
//!
//! Loads a scenario RON file, then either replays a scripted action list
//! (`run`) or hands the action menu to the user on stdin (`play`). Every
//! step prints the returned observation; logs go to stderr.

use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use fabula_content::loaders::{ConfigLoader, ScenarioLoader};
use fabula_core::Simulation;

#[derive(Parser)]
#[command(name = "fabula", version, about = "Run entity-tree scenario simulations")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Replay a scripted action list and print each observation.
    Run {
        /// Scenario RON file.
        scenario: PathBuf,

        /// Driver config TOML overriding the scenario's own policy.
        #[arg(long)]
        config: Option<PathBuf>,

        /// An action to perform, in order. Repeatable.
        #[arg(long = "do", value_name = "ACTION")]
        actions: Vec<String>,

        /// File with one action per line; used when no --do is given.
        #[arg(long)]
        script: Option<PathBuf>,
    },

    /// Play a scenario interactively on stdin (type `quit` to leave).
    Play {
        /// Scenario RON file.
        scenario: PathBuf,

        /// Driver config TOML overriding the scenario's own policy.
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    match Cli::parse().command {
        Command::Run {
            scenario,
            config,
            actions,
            script,
        } => {
            let mut sim = load_simulation(&scenario, config.as_deref())?;
            let actions = if actions.is_empty() {
                match &script {
                    Some(path) => read_script(path)?,
                    None => Vec::new(),
                }
            } else {
                actions
            };
            run(&mut sim, &actions)
        }
        Command::Play { scenario, config } => {
            let mut sim = load_simulation(&scenario, config.as_deref())?;
            play(&mut sim)
        }
    }
}

fn load_simulation(scenario: &Path, config: Option<&Path>) -> Result<Simulation> {
    let mut sim = ScenarioLoader::load_simulation(scenario)?;
    if let Some(path) = config {
        let overrides = ConfigLoader::load(path)?;
        sim = sim.with_config(overrides);
    }
    Ok(sim)
}

/// One action per line; blank lines and `#` comments are skipped.
fn read_script(path: &Path) -> Result<Vec<String>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read script {}", path.display()))?;
    Ok(parse_script(&content))
}

fn parse_script(content: &str) -> Vec<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_owned)
        .collect()
}

fn run(sim: &mut Simulation, actions: &[String]) -> Result<()> {
    println!("{}", sim.observation());
    for action in actions {
        tracing::debug!(%action, "step");
        println!("> {action}");
        println!("{}", sim.step(action));
    }
    Ok(())
}

fn play(sim: &mut Simulation) -> Result<()> {
    println!("{}", sim.observation());
    println!("[actions: {}]", sim.actions().commands().join(", "));

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    loop {
        write!(stdout, "> ")?;
        stdout.flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        let action = line.trim();
        if action.is_empty() {
            continue;
        }
        if action == "quit" || action == "exit" {
            break;
        }
        println!("{}", sim.step(action));
    }
    Ok(())
}
