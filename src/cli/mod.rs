// Sui-Lite Binder: CLI Module
//
// Command-line interface using clap derive macros. Every option has an
// environment fallback so a launcher script can configure the process
// without arguments. Subcommands: serve (default), identity.

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::launcher::DEFAULT_WORKER_THREADS;
use crate::service::DEFAULT_ATTR_PATH;

pub use commands::execute;

/// Sui-Lite Binder: diagnostic endpoint for helper-process audits.
#[derive(Parser, Debug)]
#[command(name = "sui-lite-binder")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Directory holding the service registry sockets
    /// [default: $XDG_RUNTIME_DIR/sui-lite/services].
    #[arg(long, env = "SUI_LITE_REGISTRY_DIR", global = true)]
    pub registry_dir: Option<PathBuf>,

    /// Security attribute file of this process.
    #[arg(long, env = "SUI_LITE_ATTR_PATH", default_value = DEFAULT_ATTR_PATH, global = true)]
    pub attr_path: PathBuf,

    /// Number of transport worker threads.
    #[arg(long, env = "SUI_LITE_WORKERS", default_value_t = DEFAULT_WORKER_THREADS, global = true)]
    pub workers: usize,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Register the endpoint and stay resident (the default).
    Serve,

    /// Print the identity this process would report, as JSON.
    Identity,
}

// ─── Tests ───────────────────────────────────────────────────────────────────
