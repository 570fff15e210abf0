// Sui-Lite Binder: CLI Command Handlers
//
// `serve` resolves the launch configuration and hands control to the
// launcher, which only returns once the process is told to stop.
// `identity` prints what GET_INFO would report, without registering.

use crate::error::Result;
use crate::launcher::{self, LaunchConfig};
use crate::registry::SocketRegistry;
use crate::service::{ProcessIdentity, SystemIdentity};

use super::{Cli, Commands};

/// Execute the parsed CLI command.
pub fn execute(cli: Cli) -> Result<()> {
    let config = resolve_config(&cli);
    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => cmd_serve(&config),
        Commands::Identity => cmd_identity(&config),
    }
}

fn resolve_config(cli: &Cli) -> LaunchConfig {
    LaunchConfig {
        registry_dir: cli
            .registry_dir
            .clone()
            .unwrap_or_else(SocketRegistry::default_dir),
        attr_path: cli.attr_path.clone(),
        worker_threads: cli.workers,
    }
}

fn cmd_serve(config: &LaunchConfig) -> Result<()> {
    tracing::debug!(
        registry = %config.registry_dir.display(),
        attr_path = %config.attr_path.display(),
        workers = config.worker_threads,
        "Launch configuration"
    );
    launcher::launch(config)?;
    Ok(())
}

fn cmd_identity(config: &LaunchConfig) -> Result<()> {
    let identity = SystemIdentity::with_attr_path(&config.attr_path);
    let snapshot = ProcessIdentity::capture(&identity);
    println!("{}", serde_json::to_string_pretty(&snapshot)?);
    Ok(())
}

// ─── Tests ───────────────────────────────────────────────────────────────────
