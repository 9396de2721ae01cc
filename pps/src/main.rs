//! `pps`: create Python projects and save/sync them with git using
//! simplified commands.
//!
//! Every command prints a per-step report on stdout. Diagnostics go to stderr
//! (`RUST_LOG=pps=debug` for detail). Exit codes are listed in
//! [`pps::exit_codes`].

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use serde::Serialize;

use pps::core::classifier::OutcomeClass;
use pps::core::report::WorkflowResult;
use pps::error::StarterResult;
use pps::exit_codes;
use pps::init::init_project;
use pps::io::config::{CONFIG_FILE_NAME, load_config};
use pps::io::process::SystemRunner;
use pps::logging;
use pps::save::save_changes;
use pps::status::project_status;
use pps::sync::sync_changes;
use pps::workflow::Workflow;

#[derive(Parser)]
#[command(
    name = "pps",
    version,
    about = "Create Python projects and manage them with simple git commands"
)]
struct Cli {
    /// Config file (default: .pps.toml in the current directory, if present).
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Print the result as JSON instead of text.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Create a new project with src/ layout, git repository and virtual environment.
    #[command(alias = "init")]
    New {
        /// Project name: lowercase letters, digits and underscores (e.g. my_project).
        name: String,
        /// Directory to create the project in (default: current directory).
        #[arg(short, long)]
        dir: Option<PathBuf>,
    },
    /// Stage every change and commit it (git add + git commit).
    Save {
        /// Describe the changes you made.
        #[arg(short, long)]
        message: String,
        /// Project directory (default: current directory).
        #[arg(short, long)]
        dir: Option<PathBuf>,
    },
    /// Pull remote changes, then push yours (git pull + git push).
    Sync {
        /// Project directory (default: current directory).
        #[arg(short, long)]
        dir: Option<PathBuf>,
    },
    /// Show what changed and check the project layout.
    Status {
        /// Project directory (default: current directory).
        #[arg(short, long)]
        dir: Option<PathBuf>,
    },
}

#[derive(Serialize)]
struct JsonReport<'a> {
    success: bool,
    #[serde(flatten)]
    result: &'a WorkflowResult,
}

fn main() {
    logging::init();
    let cli = Cli::parse();
    let code = match run(&cli) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("error: {err:#}");
            err.kind().exit_code()
        }
    };
    std::process::exit(code);
}

fn run(cli: &Cli) -> StarterResult<i32> {
    let cwd = std::env::current_dir().context("read current directory")?;
    let config_path = cli
        .config
        .clone()
        .unwrap_or_else(|| cwd.join(CONFIG_FILE_NAME));
    let config = load_config(&config_path)?;
    let runner = SystemRunner::new(config.output_limit_bytes);
    let workflow = Workflow::new(&runner, &config);

    let dir_or_cwd = |dir: &Option<PathBuf>| dir.clone().unwrap_or_else(|| cwd.clone());
    let result = match &cli.command {
        Command::New { name, dir } => init_project(&workflow, name, &dir_or_cwd(dir))?,
        Command::Save { message, dir } => save_changes(&workflow, &dir_or_cwd(dir), message)?,
        Command::Sync { dir } => sync_changes(&workflow, &dir_or_cwd(dir))?,
        Command::Status { dir } => project_status(&workflow, &dir_or_cwd(dir))?,
    };

    if cli.json {
        let report = JsonReport {
            success: result.success(),
            result: &result,
        };
        let payload = serde_json::to_string_pretty(&report).context("serialize report")?;
        println!("{payload}");
    } else {
        print!("{}", render_text(&result));
    }

    Ok(if result.success() {
        exit_codes::OK
    } else {
        exit_codes::TOOL_FAILURE
    })
}

/// Plain-text rendering: one line per step, raw tool output under failures,
/// then notes and any warnings not already shown as a step.
fn render_text(result: &WorkflowResult) -> String {
    let mut out = String::new();
    for step in &result.steps {
        let tag = match (&step.outcome, step.recovered) {
            (OutcomeClass::Success, _) => "ok",
            (OutcomeClass::BenignNoop, _) => "info",
            (OutcomeClass::Failure(_), true) => "warn",
            (OutcomeClass::Failure(_), false) => "error",
        };
        out.push_str(&format!("[{tag}] {}: {}\n", step.name, step.message));
        if let Some(failure) = step.outcome.failure() {
            for line in failure.output.lines() {
                out.push_str(&format!("    | {line}\n"));
            }
        }
    }
    for note in &result.notes {
        if !note.is_empty() {
            out.push_str(note);
            out.push('\n');
        }
    }
    let step_messages: Vec<&str> = result
        .steps
        .iter()
        .filter(|s| s.recovered)
        .map(|s| s.message.as_str())
        .collect();
    for warning in &result.warnings {
        if !step_messages.contains(&warning.as_str()) {
            out.push_str(&format!("[warn] {warning}\n"));
        }
    }
    out
}
