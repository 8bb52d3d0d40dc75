//! `automaton` CLI entry-point.
//!
//! Available sub-commands:
//! - `run`      — execute a workflow IR file end-to-end.
//! - `validate` — load and topologically sort a workflow without touching
//!   the registry, resolver, or executor.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing::info;

use engine::config::{EngineConfig, Mode};
use engine::{driver, loader};
use registry::{ActionRegistry, QuarantineList};

#[derive(Parser)]
#[command(name = "automaton", about = "Sequential DAG workflow execution engine", version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Execute a workflow IR file.
    Run {
        /// Path to the workflow IR file (JSON or YAML).
        workflow: PathBuf,

        /// Skip input resolution and handler invocation; populate the
        /// context with `{dryRun: true}` placeholders for every node.
        #[arg(long)]
        dry_run: bool,

        /// Gates template-literal syntax and quarantine enforcement.
        /// Falls back to `AUTOMATOR_MODE`, then `explore`.
        #[arg(long, value_enum)]
        mode: Option<ModeArg>,

        /// Force the mock-IO overlay for this run.
        #[arg(long)]
        mock_io: bool,

        /// Newline-delimited JSON quarantine list. Falls back to an empty
        /// list when absent.
        #[arg(long)]
        quarantine_file: Option<PathBuf>,

        /// Override the metrics journal's directory; falls back to
        /// `AUTOMATOR_RUNS_DIR`, then `./runs`.
        #[arg(long)]
        runs_dir: Option<PathBuf>,
    },
    /// Validate a workflow's shape and print its topological order.
    Validate {
        /// Path to the workflow IR file (JSON or YAML).
        workflow: PathBuf,
    },
}

#[derive(Clone, Copy, clap::ValueEnum)]
enum ModeArg {
    Explore,
    Verify,
    Prod,
}

impl From<ModeArg> for Mode {
    fn from(value: ModeArg) -> Self {
        match value {
            ModeArg::Explore => Mode::Explore,
            ModeArg::Verify => Mode::Verify,
            ModeArg::Prod => Mode::Prod,
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    match cli.command {
        Command::Run {
            workflow,
            dry_run,
            mode,
            mock_io,
            quarantine_file,
            runs_dir,
        } => run(workflow, dry_run, mode.map(Mode::from), mock_io, quarantine_file, runs_dir).await,
        Command::Validate { workflow } => validate(workflow),
    }
}

async fn run(
    workflow_path: PathBuf,
    dry_run: bool,
    mode: Option<Mode>,
    mock_io: bool,
    quarantine_file: Option<PathBuf>,
    runs_dir: Option<PathBuf>,
) -> ExitCode {
    let config = EngineConfig::from_env_and_flags(mode, mock_io, dry_run, runs_dir, quarantine_file);
    info!(mode = %config.mode, dry_run, mock_io = config.mock_io, "starting run");

    let workflow = match loader::load_workflow(&workflow_path) {
        Ok(workflow) => workflow,
        Err(err) => return fail(&format!("NODE_FAILED: {err}"), 2),
    };

    let registry = ActionRegistry::builtin();
    let quarantine = match &config.quarantine_file {
        Some(path) => QuarantineList::load_from_file(path),
        None => QuarantineList::empty(),
    };

    match driver::run_workflow(&workflow_path, &workflow, &config, &registry, &quarantine).await {
        Ok(()) => {
            println!("OK");
            ExitCode::SUCCESS
        }
        Err(err) => fail(&err.terminal_line(), err.exit_code()),
    }
}

fn validate(workflow_path: PathBuf) -> ExitCode {
    let workflow = match loader::load_workflow(&workflow_path) {
        Ok(workflow) => workflow,
        Err(err) => return fail(&format!("NODE_FAILED: {err}"), 2),
    };

    match engine::validate_dag(&workflow) {
        Ok(order) => {
            println!("execution order: {}", order.join(", "));
            ExitCode::SUCCESS
        }
        Err(engine::DagError::Cycle(ids)) => {
            fail(&format!("NODE_FAILED: cycle detected: {}", ids.join(", ")), 3)
        }
        Err(err) => fail(&format!("NODE_FAILED: {err}"), 3),
    }
}

fn fail(message: &str, exit_code: i32) -> ExitCode {
    println!("{message}");
    ExitCode::from(exit_code as u8)
}
