// Sui-Lite Binder: Application Entry Point
//
// Initializes structured logging and dispatches to the command handler.
// With no arguments the process registers the diagnostic endpoint and
// stays resident until it receives SIGTERM or SIGINT.

use clap::Parser;
use tracing_subscriber::EnvFilter;

use sui_lite_binder::cli::{execute, Cli};

fn main() {
    // RUST_LOG=sui_lite_binder=debug also logs every transaction frame
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("sui_lite_binder=info")),
        )
        .with_target(false)
        .init();

    let cli = Cli::parse();

    if let Err(e) = execute(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
