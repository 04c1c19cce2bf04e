//! tuskarctl (tuskar) - command-line client for the Tuskar management API.

use anyhow::Result;
use clap::Parser;

mod commands;
mod config;
mod error;
mod output;

use commands::Cli;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Err(e) = cli.run().await {
        error::print_error(&e);
        if !error::is_command_error(&e) {
            tracing::error!(error = ?e, "exiting due to an error");
            std::process::exit(1);
        }
        // Known command errors keep the non-error exit path.
    }

    Ok(())
}
