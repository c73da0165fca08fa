#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

mod commands;
mod config;

use std::process;

use crate::config::Cli;

// Tracing target constants
pub const TRACING_TARGET_CONFIG: &str = "ugcflow_cli::config";
pub const TRACING_TARGET_COMMAND: &str = "ugcflow_cli::command";

#[tokio::main]
async fn main() {
    let Err(error) = run().await else {
        process::exit(0);
    };

    tracing::debug!(
        target: TRACING_TARGET_COMMAND,
        error = ?error,
        "command terminated with error"
    );
    eprintln!("Error: {error:#}");

    process::exit(1);
}

/// Main application entry point.
async fn run() -> anyhow::Result<()> {
    let cli = Cli::init();

    Cli::init_tracing();
    cli.log();

    let (command, session) = cli.into_parts()?;
    let mut stdout = std::io::stdout().lock();
    command.run(&session, &mut stdout).await
}
