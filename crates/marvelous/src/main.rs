//! CLI entry point for marvelous.

use std::io;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use marvelous_app::{Board, StdinPrompt};
use marvelous_core::TaskStatus;
use tracing::debug;
use tracing_subscriber::{EnvFilter, fmt::format::FmtSpan};

mod commands;
mod config;
mod tui;

/// Two-list task board backed by a REST task store.
#[derive(Parser, Debug)]
#[command(
    name = "marvelous",
    version,
    about = "marvelous: a to-do board backed by a REST task store"
)]
struct Cli {
    /// Root URL of the task store.
    #[arg(long, env = "MARVELOUS_BASE_URL", global = true)]
    base_url: Option<String>,

    /// Configuration file (defaults to the platform config directory).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    cmd: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Launch the interactive board (default).
    Tui,

    /// List tasks.
    Ls {
        /// Only show tasks whose content contains this text (case-insensitive).
        #[arg(long)]
        search: Option<String>,
        /// Only show one list.
        #[arg(long)]
        status: Option<TaskStatus>,
        #[arg(long, value_enum, default_value_t = LsFormat::Table)]
        format: LsFormat,
    },

    /// Add a task to the to-do list.
    Add { content: String },

    /// Mark a task as done.
    Done { id: String },

    /// Move a done task back to the to-do list.
    Undo { id: String },

    /// Delete every task.
    Purge {
        /// Do not ask for confirmation.
        #[arg(long)]
        yes: bool,
    },

    /// Write a configuration file with the default settings.
    InitConfig {
        /// Destination (defaults to the platform config directory).
        #[arg(long)]
        output: Option<PathBuf>,
        /// Overwrite an existing file without asking.
        #[arg(long)]
        force: bool,
    },
}

/// Output format of `ls`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum LsFormat {
    Table,
    Json,
}

fn main() -> Result<()> {
    let Cli { base_url, config, cmd } = Cli::parse();
    let cmd = cmd.unwrap_or(Command::Tui);

    if should_install_tracing(&cmd) {
        install_tracing();
    }

    execute_command(base_url, config.as_deref(), cmd)
}

fn execute_command(base_url: Option<String>, config_path: Option<&Path>, command: Command) -> Result<()> {
    if let Command::InitConfig { output, force } = &command {
        return config::init_config(output.as_deref(), *force);
    }

    let config = config::load_config(config_path)?.unwrap_or_default();
    let remote = config.remote.with_base_url_override(base_url);
    let store = remote.connect()?;
    debug!(base_url = %remote.base_url, "using task store");

    match command {
        Command::Tui => tui::run(store, config.tui.keybindings),
        other => {
            let runtime = tokio::runtime::Runtime::new().context("failed to start async runtime")?;
            runtime.block_on(async move {
                let mut board = Board::new(store);
                let mut out = io::stdout();
                let mut prompt = StdinPrompt::stdio();
                commands::run(other, &mut board, &mut out, &mut prompt).await
            })
        }
    }
}

const fn should_install_tracing(cmd: &Command) -> bool {
    !matches!(cmd, Command::Tui)
}

fn install_tracing() {
    // RUST_LOG is honoured; INFO is the default. Logs go to stderr so stdout stays parseable.
    let filter = EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into());
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .with_span_events(FmtSpan::NONE)
        .compact()
        .try_init();
}
