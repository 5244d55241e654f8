//! CLI entry point for taskdeck.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, fmt::format::FmtSpan};

use config::StoreConfig;
use taskdeck_app::TaskService;
use taskdeck_store_rest::RestStore;

mod commands;
mod config;

/// Deadline-aware tasks against a remote REST store.
#[derive(Parser, Debug)]
#[command(
    name = "taskdeck",
    version,
    about = "taskdeck: tasks and tags kept in a PostgREST-style backend"
)]
struct Cli {
    /// Path to a config file (defaults to the platform config dir).
    #[arg(long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List tasks by deadline priority.
    Ls {
        /// Show completed tasks instead of pending ones.
        #[arg(long)]
        done: bool,
    },

    /// Create a new task.
    Add {
        #[arg(long)]
        name: String,
        #[arg(long)]
        description: Option<String>,
        /// Due date as YYYY-MM-DD-HH:MM or YYYY-MM-DD.
        #[arg(long)]
        due: Option<String>,
        #[arg(short = 't', long = "tag")]
        tags: Vec<String>,
    },

    /// Rewrite an existing task's fields.
    Edit {
        id: i64,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        description: Option<String>,
        /// Due date as YYYY-MM-DD-HH:MM or YYYY-MM-DD.
        #[arg(long)]
        due: Option<String>,
        #[arg(short = 't', long = "tag")]
        tags: Vec<String>,
    },

    /// Flip a task between pending and completed.
    Done { id: i64 },

    /// Delete a task.
    Rm { id: i64 },

    /// Show full details for one task.
    Show { id: i64 },

    /// Find tasks whose tag names contain a term.
    Search { term: String },

    /// List tags with task counts.
    Tags,

    /// Create a tag.
    TagAdd {
        #[arg(long)]
        name: String,
        #[arg(long)]
        description: Option<String>,
    },

    /// Rename a tag.
    TagRename {
        id: i64,
        #[arg(long)]
        name: String,
        #[arg(long)]
        description: Option<String>,
    },

    /// Delete a tag, detaching it from every task.
    TagRm { id: i64 },
}

fn main() -> Result<()> {
    let Cli { config, cmd } = Cli::parse();

    install_tracing();

    let store_config = StoreConfig::load(config.as_deref())?;
    let store = RestStore::new(
        &store_config.base_url,
        store_config.api_key,
        store_config.user_id,
    )?;
    let mut service = TaskService::new(store);
    commands::run(cmd, &mut service)
}

fn install_tracing() {
    let filter = EnvFilter::from_default_env().add_directive(tracing::Level::WARN.into());
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_span_events(FmtSpan::NONE)
        .compact()
        .try_init();
}
